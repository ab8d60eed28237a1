//! Regex-driven Dart grammar producing nested token trees.
//!
//! Rules run in declaration order over the text no earlier rule claimed.
//! Greedy rules (comments, string literals) run first as a group and the
//! earliest match among them wins, so `"//"` inside a string and quotes inside
//! a comment are both handled. A named capture `t` marks the token inside a
//! wider match; text before it stays unclaimed (lookbehind) and text after it
//! is not consumed (lookahead).

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::token::{TokenContent, TokenNode, TypedToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrammarId {
    Dart,
    ClassName,
    Namespace,
    Generics,
    StringLiteral,
    Interpolation,
}

struct Rule {
    kind: &'static str,
    alias: Option<&'static str>,
    pattern: Regex,
    greedy: bool,
    inside: Option<GrammarId>,
}

impl Rule {
    fn new(kind: &'static str, pattern: &str) -> Self {
        Self {
            kind,
            alias: None,
            pattern: Regex::new(pattern).expect("grammar patterns are valid regexes"),
            greedy: false,
            inside: None,
        }
    }

    fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    fn inside(mut self, grammar: GrammarId) -> Self {
        self.inside = Some(grammar);
        self
    }

    /// Byte range of the token within `haystack`, if any non-empty one exists.
    fn find(&self, haystack: &str) -> Option<Range<usize>> {
        let caps = self.pattern.captures(haystack)?;
        let token = caps.name("t").or_else(|| caps.get(0))?;
        (!token.is_empty()).then(|| token.range())
    }
}

struct Grammar {
    rules: Vec<Rule>,
}

const PACKAGE_PREFIX: &str = r"(?:^|[^\w.])(?P<t>(?:[a-z]\w*\s*\.\s*)*(?:[A-Z]\w*\s*\.\s*)*";
const KEYWORD_STAR: &str = r"\b(?:async|sync|yield)\*";
const KEYWORDS: &str = r"\b(?:abstract|assert|async|await|break|case|catch|class|const|continue|covariant|default|deferred|do|dynamic|else|enum|export|extends|extension|external|factory|final|finally|for|get|hide|if|implements|import|in|interface|library|mixin|new|null|on|operator|part|rethrow|return|set|show|static|super|switch|sync|this|throw|try|typedef|var|void|while|with|yield)\b";

fn class_name_rule() -> Rule {
    Rule::new(
        "class-name",
        &format!(r"{PACKAGE_PREFIX}[A-Z](?:[\d_A-Z]*[a-z]\w*)?\b)"),
    )
    .inside(GrammarId::ClassName)
}

static DART: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![
        Rule::new("comment", r"(?:^|[^\\])(?P<t>/\*[\s\S]*?(?:\*/|$))").greedy(),
        Rule::new("comment", r"(?:^|[^\\:])(?P<t>//.*)").greedy(),
        Rule::new(
            "string-literal",
            r##"r?(?:"""[\s\S]*?"""|'''[\s\S]*?'''|"(?:\\.|[^\\\r\n"])*"|'(?:\\.|[^\\\r\n'])*')"##,
        )
        .greedy()
        .inside(GrammarId::StringLiteral),
        Rule::new("metadata", r"@\w+").alias("function"),
        Rule::new(
            "generics",
            r"<(?:[\w\s,.&?]|<(?:[\w\s,.&?]|<(?:[\w\s,.&?]|<[\w\s,.&?]*>)*>)*>)*>",
        )
        .inside(GrammarId::Generics),
        class_name_rule(),
        Rule::new(
            "class-name",
            &format!(r"{PACKAGE_PREFIX}[A-Z]\w*)\s+\w+\s*[;,=()]"),
        )
        .inside(GrammarId::ClassName),
        Rule::new("keyword", KEYWORD_STAR),
        Rule::new("keyword", KEYWORDS),
        Rule::new("boolean", r"\b(?:false|true)\b"),
        Rule::new("function", r"\b(?P<t>\w+)\("),
        Rule::new(
            "number",
            r"(?i)\b0x[\da-f]+\b|(?:\b\d+(?:\.\d*)?|\B\.\d+)(?:e[+-]?\d+)?",
        ),
        Rule::new(
            "operator",
            r"\bis!|\b(?:as|is)\b|\+\+|--|&&|\|\||<<=?|>>=?|~(?:/=?)?|[+\-*/%&^|=!<>]=?|\?",
        ),
        Rule::new("punctuation", r"[{}\[\];(),.:]"),
    ],
});

static CLASS_NAME: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![
        Rule::new("namespace", r"^[a-z]\w*(?:\s*\.\s*[a-z]\w*)*(?:\s*\.)?")
            .inside(GrammarId::Namespace),
    ],
});

static NAMESPACE: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![Rule::new("punctuation", r"\.")],
});

static GENERICS: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![
        class_name_rule(),
        Rule::new("keyword", KEYWORD_STAR),
        Rule::new("keyword", KEYWORDS),
        Rule::new("punctuation", r"[<>(),.:]"),
        Rule::new("operator", r"[?&|]"),
    ],
});

static STRING_LITERAL: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![
        Rule::new(
            "interpolation",
            r"(?:^|[^\\])(?:\\{2})*(?P<t>\$(?:\w+|\{(?:[^{}]|\{[^{}]*\})*\}))",
        )
        .inside(GrammarId::Interpolation),
        Rule::new("string", r"[\s\S]+"),
    ],
});

static INTERPOLATION: Lazy<Grammar> = Lazy::new(|| Grammar {
    rules: vec![
        Rule::new("punctuation", r"^\$\{?|\}$"),
        Rule::new("expression", r"[\s\S]+").inside(GrammarId::Dart),
    ],
});

fn grammar(id: GrammarId) -> &'static Grammar {
    match id {
        GrammarId::Dart => &DART,
        GrammarId::ClassName => &CLASS_NAME,
        GrammarId::Namespace => &NAMESPACE,
        GrammarId::Generics => &GENERICS,
        GrammarId::StringLiteral => &STRING_LITERAL,
        GrammarId::Interpolation => &INTERPOLATION,
    }
}

enum Piece {
    Plain(Range<usize>),
    Token(TokenNode),
}

/// Tokenizes one line of Dart source.
pub fn tokenize(line: &str) -> Vec<TokenNode> {
    tokenize_with(line, grammar(GrammarId::Dart))
}

fn tokenize_with(text: &str, grammar: &Grammar) -> Vec<TokenNode> {
    let mut pieces = vec![Piece::Plain(0..text.len())];

    let greedy: Vec<&Rule> = grammar.rules.iter().filter(|rule| rule.greedy).collect();
    if !greedy.is_empty() {
        pieces = split_pieces(pieces, |range, out| split_greedy(text, range, &greedy, out));
    }
    for rule in grammar.rules.iter().filter(|rule| !rule.greedy) {
        pieces = split_pieces(pieces, |range, out| split_greedy(text, range, &[rule], out));
    }

    pieces
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Plain(range) if range.is_empty() => None,
            Piece::Plain(range) => Some(TokenNode::Text(text[range].to_string())),
            Piece::Token(node) => Some(node),
        })
        .collect()
}

fn split_pieces(
    pieces: Vec<Piece>,
    mut split: impl FnMut(Range<usize>, &mut Vec<Piece>),
) -> Vec<Piece> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::Plain(range) => split(range, &mut out),
            token => out.push(token),
        }
    }
    out
}

/// Repeatedly claims the earliest match of any of `rules` inside `range`.
/// Each remainder is searched as a fresh fragment, so `^` anchors at the end
/// of the previous token.
fn split_greedy(text: &str, range: Range<usize>, rules: &[&Rule], out: &mut Vec<Piece>) {
    let mut start = range.start;
    while start < range.end {
        let haystack = &text[start..range.end];
        let earliest = rules
            .iter()
            .filter_map(|rule| rule.find(haystack).map(|found| (found, *rule)))
            .min_by_key(|(found, _)| found.start);
        let Some((found, rule)) = earliest else {
            break;
        };
        out.push(Piece::Plain(start..start + found.start));
        out.push(Piece::Token(make_token(rule, &haystack[found.clone()])));
        start += found.end;
    }
    out.push(Piece::Plain(start..range.end));
}

fn make_token(rule: &Rule, matched: &str) -> TokenNode {
    let content = match rule.inside {
        Some(id) => {
            let mut nodes = tokenize_with(matched, grammar(id));
            match nodes.as_slice() {
                [TokenNode::Text(_)] => match nodes.pop() {
                    Some(TokenNode::Text(text)) => TokenContent::Text(text),
                    _ => TokenContent::Text(matched.to_string()),
                },
                _ => TokenContent::List(nodes),
            }
        }
        None => TokenContent::Text(matched.to_string()),
    };
    TokenNode::Typed(TypedToken {
        kind: rule.kind.to_string(),
        alias: rule.alias.map(str::to_string),
        content,
    })
}
