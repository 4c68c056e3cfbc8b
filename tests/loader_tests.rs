use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use yschema::file::loader::{load_schema_file, load_yaml_file};
use yschema::schema::TypeUtil;

const SCHEMA: &str = include_str!("fixtures/schema.yaml");
const DOCUMENT: &str = include_str!("fixtures/application.yaml");

#[test]
fn test_load_plain_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("application.yaml");
    fs::write(&path, DOCUMENT).unwrap();

    let doc = load_yaml_file(&path).unwrap();
    assert!(doc.value().is_object());
    assert!(doc.get("server").is_some());
}

#[test]
fn test_load_gzipped_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("application.yaml.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DOCUMENT.as_bytes()).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let doc = load_yaml_file(&path).unwrap();
    assert_eq!(doc.child_count(), 5);
}

#[test]
fn test_corrupted_gzip_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml.gz");
    fs::write(&path, b"not gzip at all").unwrap();

    assert!(load_yaml_file(&path).is_err());
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = load_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_invalid_yaml_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "key: [unclosed\n").unwrap();

    let err = load_yaml_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
}

#[test]
fn test_load_schema_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(&path, SCHEMA).unwrap();

    let registry = load_schema_file(&path).unwrap();
    let root = registry.root().unwrap();
    assert_eq!(registry.nice_type_name(root), "Config");
    assert!(registry.lookup("LogLevel").is_some());
}

#[test]
fn test_schema_with_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(
        &path,
        "types:\n  Config:\n    properties:\n      server: Missing\n",
    )
    .unwrap();

    let err = load_schema_file(&path).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to load schema"));
    assert!(message.contains("Missing"));
}
