pub mod color;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod lint;
pub mod metrics;
pub mod render;
pub mod snapshot;
pub mod text;

pub use config::{load as load_config, RenderConfig};
pub use diagnostics::Diagnostic;
pub use error::{Error, Result};
pub use snapshot::{generate, generate_with, render_snapshot, Snapshot};
pub use text::{BlockFace, FontFace, Typeface};
