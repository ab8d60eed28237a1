//! Syntax highlighting: Dart tokenizer plus flattening into colored leaves.

pub mod flatten;
pub mod grammar;
pub mod token;

pub use flatten::{flatten_line, flattened_text, StyleClass, Token};
pub use token::{TokenContent, TokenNode, TypedToken};

/// Tokenizes and flattens each line independently.
pub fn highlight_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<Token>> {
    lines
        .iter()
        .map(|line| flatten_line(&grammar::tokenize(line.as_ref())))
        .collect()
}
