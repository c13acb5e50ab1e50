//! Uploaded artifacts as seen by classifiers.

use std::path::Path;

/// An uploaded file handed to a classifier.
///
/// Synthetic strategies only read `file_name`; remote classifiers upload the
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            bytes,
            content_type,
        }
    }

    /// An artifact with no content, identified by name only.
    pub fn named(file_name: impl Into<String>) -> Self {
        Self::new(file_name, Vec::new())
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The string identifying this artifact for deterministic strategies.
    pub fn identifier(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}
