//! Raw tokenizer output.
//!
//! A tokenized line is a sequence of [`TokenNode`]s. Typed nodes may wrap a
//! string, a single nested node, or a list of nodes, to any depth.

/// One element of a tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenNode {
    /// Text the grammar did not classify.
    Text(String),
    /// A classified span.
    Typed(TypedToken),
}

/// A classified span and its (possibly nested) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedToken {
    /// Grammar rule name, e.g. `keyword` or `string-literal`.
    pub kind: String,
    /// Secondary class a theme may color by, e.g. `function` for metadata.
    pub alias: Option<String>,
    pub content: TokenContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenContent {
    Text(String),
    Node(Box<TokenNode>),
    List(Vec<TokenNode>),
}

impl TokenNode {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn typed(kind: impl Into<String>, content: TokenContent) -> Self {
        Self::Typed(TypedToken {
            kind: kind.into(),
            alias: None,
            content,
        })
    }

    /// Concatenation of every leaf string below this node.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        self.push_source(&mut out);
        out
    }

    fn push_source(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Typed(token) => token.content.push_source(out),
        }
    }
}

impl TokenContent {
    fn push_source(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Node(node) => node.push_source(out),
            Self::List(nodes) => nodes.iter().for_each(|node| node.push_source(out)),
        }
    }
}

/// Source text of a whole tokenized line.
pub fn line_source(nodes: &[TokenNode]) -> String {
    nodes.iter().map(TokenNode::source_text).collect()
}
