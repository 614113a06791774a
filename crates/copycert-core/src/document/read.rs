use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::DocumentInfo;

/// A document loaded for scoring, with the fingerprint of its exact text.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    /// Raw markup-bearing text as read.
    pub text: String,

    pub size_bytes: u64,

    /// SHA-256 hex of `text`.
    pub fingerprint: String,
}

impl DocumentContext {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: None,
            size_bytes: text.len() as u64,
            fingerprint: fingerprint(&text),
            text,
        }
    }

    /// Report-facing metadata. Drops the text itself.
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            path: self.path.clone(),
            size_bytes: self.size_bytes,
            fingerprint: self.fingerprint.clone(),
        }
    }
}

/// SHA-256 hex of the document text. Ties a result to the text it scored.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Read a document as UTF-8. The fingerprint depends only on its contents.
pub fn read_document(path: &Path) -> Result<DocumentContext> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;

    let mut ctx = DocumentContext::from_text(text);
    ctx.path = Some(path.display().to_string());
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_document(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_text_and_computes_stable_fingerprint() {
        let file = temp_document(b"abc");
        let ctx = read_document(file.path()).expect("document read succeeds");

        assert_eq!(ctx.text, "abc");
        assert_eq!(ctx.size_bytes, 3);
        // echo -n "abc" | sha256sum
        assert_eq!(
            ctx.fingerprint,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn different_texts_produce_different_fingerprints() {
        let a = read_document(temp_document(b"Buy now.").path()).unwrap();
        let b = read_document(temp_document(b"Buy now!").path()).unwrap();
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(read_document(Path::new("non_existent_copy.html")).is_err());
    }

    #[test]
    fn non_utf8_file_returns_error() {
        let file = temp_document(&[0xff, 0xfe, 0xfd]);
        assert!(read_document(file.path()).is_err());
    }

    #[test]
    fn info_keeps_path_and_fingerprint() {
        let file = temp_document(b"Hello.");
        let ctx = read_document(file.path()).unwrap();
        let info = ctx.info();
        assert_eq!(info.fingerprint, ctx.fingerprint);
        assert_eq!(info.size_bytes, 6);
        assert!(info.path.is_some());
    }
}
