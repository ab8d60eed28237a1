use code_snapshot::highlight::{
    flatten_line, flattened_text, grammar, highlight_lines, StyleClass, Token, TokenNode,
};

const SOURCE: &str = r#"import 'package:http/http.dart' as http;

/// Fetches the greeting for [name].
@immutable
class Greeter<T extends Object?> {
  final Map<String, List<int>> cache = {};
  static const double ratio = 1.5e-3;

  Future<String> greet(String name) async {
    final response = await http.get(Uri.parse('https://example.com/$name'));
    if (response.statusCode != 200 && !cache.isEmpty) return "fail: ${response.body}";
    return 'Hello, ${name.toUpperCase()}!'; /* inline */
  }
}
"#;

fn class_of(tokens: &[Token], text: &str) -> Option<StyleClass> {
    tokens.iter().find(|t| t.text == text).map(|t| t.class)
}

#[test]
fn every_line_flattens_losslessly() {
    for line in SOURCE.lines() {
        let nodes = grammar::tokenize(line);
        let flat = flatten_line(&nodes);
        assert_eq!(flattened_text(&flat), line, "line {line:?}");
        assert!(flat.iter().all(|t| !t.text.is_empty()));
    }
}

#[test]
fn highlight_lines_keeps_line_count() {
    let lines: Vec<&str> = SOURCE.lines().collect();
    let highlighted = highlight_lines(&lines);
    assert_eq!(highlighted.len(), lines.len());
    assert!(highlighted[1].is_empty());
}

#[test]
fn representative_classes() {
    let lines: Vec<&str> = SOURCE.lines().collect();
    let highlighted = highlight_lines(&lines);

    assert_eq!(class_of(&highlighted[0], "import"), Some(StyleClass::Keyword));
    assert_eq!(
        class_of(&highlighted[0], "'package:http/http.dart'"),
        Some(StyleClass::String)
    );
    assert_eq!(class_of(&highlighted[0], "as"), Some(StyleClass::Operator));
    assert_eq!(
        class_of(&highlighted[2], "/// Fetches the greeting for [name]."),
        Some(StyleClass::Comment)
    );
    assert_eq!(class_of(&highlighted[3], "@immutable"), Some(StyleClass::Function));
    assert_eq!(class_of(&highlighted[4], "class"), Some(StyleClass::Keyword));
    assert_eq!(class_of(&highlighted[4], "Greeter"), Some(StyleClass::ClassName));
    assert_eq!(class_of(&highlighted[6], "1.5e-3"), Some(StyleClass::Number));
    assert_eq!(class_of(&highlighted[8], "greet"), Some(StyleClass::Function));
    assert_eq!(class_of(&highlighted[8], "async"), Some(StyleClass::Keyword));
    assert_eq!(class_of(&highlighted[10], "!="), Some(StyleClass::Operator));
    assert_eq!(class_of(&highlighted[10], "200"), Some(StyleClass::Number));
    assert_eq!(class_of(&highlighted[11], "/* inline */"), Some(StyleClass::Comment));
}

#[test]
fn interpolated_expression_is_highlighted_inside_string() {
    let line = "    return 'Hello, ${name.toUpperCase()}!';";
    let flat = flatten_line(&grammar::tokenize(line));
    assert_eq!(class_of(&flat, "'Hello, "), Some(StyleClass::String));
    assert_eq!(class_of(&flat, "${"), Some(StyleClass::Punctuation));
    assert_eq!(class_of(&flat, "toUpperCase"), Some(StyleClass::Function));
    assert_eq!(class_of(&flat, "!'"), Some(StyleClass::String));
}

#[test]
fn tokenizer_output_nests() {
    let nodes = grammar::tokenize("var s = 'a$b';");
    let nested = nodes.iter().any(|node| match node {
        TokenNode::Typed(token) => token.kind == "string-literal",
        TokenNode::Text(_) => false,
    });
    assert!(nested);
}
