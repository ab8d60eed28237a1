//! Token flattening: nested tokenizer output to `(text, class)` leaves.

use std::fmt;

use serde::Deserialize;

use super::token::{TokenContent, TokenNode};

/// Color class a leaf token is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleClass {
    Keyword,
    Function,
    Method,
    String,
    Number,
    Comment,
    ClassName,
    Variable,
    Operator,
    Punctuation,
    Plain,
}

impl StyleClass {
    pub const ALL: [Self; 11] = [
        Self::Keyword,
        Self::Function,
        Self::Method,
        Self::String,
        Self::Number,
        Self::Comment,
        Self::ClassName,
        Self::Variable,
        Self::Operator,
        Self::Punctuation,
        Self::Plain,
    ];

    /// Maps a grammar rule name onto a class. Names without a color of their
    /// own (`string-literal`, `interpolation`, ...) return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "keyword" => Self::Keyword,
            "function" => Self::Function,
            "method" => Self::Method,
            "string" => Self::String,
            "number" => Self::Number,
            "comment" => Self::Comment,
            "class-name" => Self::ClassName,
            "variable" => Self::Variable,
            "operator" => Self::Operator,
            "punctuation" => Self::Punctuation,
            _ => return None,
        };
        Some(class)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Function => "function",
            Self::Method => "method",
            Self::String => "string",
            Self::Number => "number",
            Self::Comment => "comment",
            Self::ClassName => "class-name",
            Self::Variable => "variable",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flattened leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: StyleClass,
}

impl Token {
    pub fn new(text: impl Into<String>, class: StyleClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// Flattens one tokenized line, depth-first and in source order.
///
/// A typed node's class is its own kind when that names a class, else its
/// alias, else whatever the nearest classified ancestor resolved to. Bare
/// strings always take the inherited class. Traversal uses an explicit stack,
/// so nesting depth is unbounded.
pub fn flatten_line(nodes: &[TokenNode]) -> Vec<Token> {
    let mut out = Vec::new();
    let mut stack: Vec<(&TokenNode, StyleClass)> =
        nodes.iter().rev().map(|node| (node, StyleClass::Plain)).collect();

    while let Some((node, inherited)) = stack.pop() {
        match node {
            TokenNode::Text(text) => push_leaf(&mut out, text, inherited),
            TokenNode::Typed(token) => {
                let class = StyleClass::from_name(&token.kind)
                    .or_else(|| token.alias.as_deref().and_then(StyleClass::from_name))
                    .unwrap_or(inherited);
                match &token.content {
                    TokenContent::Text(text) => push_leaf(&mut out, text, class),
                    TokenContent::Node(child) => stack.push((child, class)),
                    TokenContent::List(children) => {
                        stack.extend(children.iter().rev().map(|child| (child, class)));
                    }
                }
            }
        }
    }
    out
}

fn push_leaf(out: &mut Vec<Token>, text: &str, class: StyleClass) {
    if !text.is_empty() {
        out.push(Token::new(text, class));
    }
}

/// Concatenated text of a flattened line.
pub fn flattened_text(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.text.as_str()).collect()
}
