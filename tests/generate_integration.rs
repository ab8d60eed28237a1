use std::fs;

use code_snapshot::config::RawConfig;
use code_snapshot::{generate_with, BlockFace, Diagnostic, Error, RenderConfig};

const SNIPPET: &str = "\
import 'dart:io';

void main() {
  final file = File('data.txt');
  print(file.readAsStringSync());
}
";

fn config_for(dir: &tempfile::TempDir, extra_styling: &str) -> RenderConfig {
    let input = dir.path().join("main.dart");
    let output = dir.path().join("out/nested/snap.png");
    let raw = format!(
        "input:\n  file: \"{}\"\n  startLine: 3\n  endLine: 10\n  lints:\n    - start: {{line: 4, char: 9}}\n      end: {{line: 4, char: 13}}\n      type: warning\n      message: unused variable\noutput:\n  path: \"{}\"\nstyling:\n  fileName: main.dart\n  showLintMessages: true\n{extra_styling}",
        input.display(),
        output.display()
    );
    RawConfig::from_yaml_str(&raw).unwrap().resolve().unwrap()
}

#[tokio::test]
async fn writes_png_into_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.dart"), SNIPPET).unwrap();
    let config = config_for(&dir, "  imageBorderRadius: 12\n");

    let snapshot = generate_with(&config, &BlockFace::default()).await.unwrap();

    let written = dir.path().join("out/nested/snap.png");
    assert!(written.is_file());
    let decoded = image::open(&written).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), snapshot.image.dimensions());
    assert_eq!(
        decoded.dimensions(),
        (snapshot.layout.canvas_width, snapshot.layout.canvas_height)
    );
    // rounded outer corners are cleared
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);

    assert!(snapshot.layout.lint_panel.is_some());
    assert!(
        snapshot
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::LineRangeClamped { requested_end: 10, available: 6 }))
    );
}

#[tokio::test]
async fn rendering_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.dart"), SNIPPET).unwrap();
    let config = config_for(&dir, "");
    let face = BlockFace::default();

    generate_with(&config, &face).await.unwrap();
    let first = fs::read(&config.output.path).unwrap();
    generate_with(&config, &face).await.unwrap();
    let second = fs::read(&config.output.path).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "");

    match generate_with(&config, &BlockFace::default()).await {
        Err(Error::InputFileNotFound(path)) => assert_eq!(path, dir.path().join("main.dart")),
        other => panic!("expected InputFileNotFound, got {other:?}"),
    }
    assert!(!config.output.path.exists());
}
