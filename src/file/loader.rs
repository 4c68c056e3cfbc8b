//! Loading YAML documents and schema definitions from disk or stdin.
//!
//! Files ending in `.gz` are decompressed transparently, and gzip input on
//! stdin is recognised by its magic bytes.

use crate::document::node::YamlNode;
use crate::document::parser::parse_yaml;
use crate::schema::{parse_schema, SchemaRegistry};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Loads and parses a YAML document from the filesystem.
///
/// # Examples
///
/// ```no_run
/// use yschema::file::loader::load_yaml_file;
///
/// let doc = load_yaml_file("application.yaml").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents are not valid YAML
pub fn load_yaml_file<P: AsRef<Path>>(path: P) -> Result<YamlNode> {
    let path_ref = path.as_ref();
    let content = read_text_file(path_ref)?;
    parse_yaml(&content).with_context(|| format!("Failed to parse {}", path_ref.display()))
}

/// Loads a schema definition file and builds its registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or
/// describes an inconsistent schema (unknown or duplicate types).
pub fn load_schema_file<P: AsRef<Path>>(path: P) -> Result<SchemaRegistry> {
    let path_ref = path.as_ref();
    let content = read_text_file(path_ref)?;
    let registry = parse_schema(&content)
        .with_context(|| format!("Failed to load schema {}", path_ref.display()))?;
    debug!(
        "loaded schema {} ({} types)",
        path_ref.display(),
        registry.len()
    );
    Ok(registry)
}

/// Loads and parses a YAML document from standard input.
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input is neither UTF-8 nor gzip-compressed UTF-8
/// - The input is not valid YAML
pub fn load_yaml_from_stdin() -> Result<YamlNode> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = decode_bytes(buffer)?;
    parse_yaml(&content).context("Failed to parse YAML from stdin")
}

/// Reads a file as text, decompressing it if it has a `.gz` extension.
fn read_text_file(path: &Path) -> Result<String> {
    if is_gzipped(path) {
        read_gzipped_file(path)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Converts raw input to text, checking for gzip magic bytes (0x1f 0x8b).
fn decode_bytes(buffer: Vec<u8>) -> Result<String> {
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")
    }
}

/// Reads and decompresses a gzipped file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The file is not valid gzip format (corrupted)
/// - The decompressed content is not valid UTF-8
fn read_gzipped_file(path: &Path) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open gzipped file {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("app.yaml.gz")));
        assert!(!is_gzipped(Path::new("app.yaml")));
        assert!(!is_gzipped(Path::new("gz")));
    }

    #[test]
    fn test_decode_plain_bytes() {
        let text = decode_bytes(b"a: 1\n".to_vec()).unwrap();
        assert_eq!(text, "a: 1\n");
    }

    #[test]
    fn test_decode_gzip_bytes() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"a: 1\n").unwrap();
        let compressed = encoder.finish().unwrap();
        assert_eq!(decode_bytes(compressed).unwrap(), "a: 1\n");
    }

    #[test]
    fn test_decode_invalid_utf8_fails() {
        assert!(decode_bytes(vec![0xff, 0xfe, 0x00]).is_err());
    }
}
