//! Drawing stages, applied back to front: background, card, chrome, code,
//! lint overlay.

pub mod background;
pub mod canvas;
pub mod card;
pub mod chrome;
pub mod code;
pub mod lints;

pub use canvas::{encode_png, Canvas};
