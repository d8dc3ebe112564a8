//! Captured file content

use crate::hash::{hash_bytes, Blake3Hash};
use serde::{Deserialize, Serialize};

/// A blob represents a captured file's full contents
///
/// Files that decode as UTF-8 are kept as text so the history document stays
/// readable; anything else is kept byte-for-byte (hex-encoded on disk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "data", rename_all = "lowercase")]
pub enum Blob {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Binary(#[serde(with = "hex")] Vec<u8>),
}

impl Blob {
    /// Create a blob from raw bytes, preferring the text form
    pub fn from_bytes(data: Vec<u8>) -> Self {
        match String::from_utf8(data) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Binary(err.into_bytes()),
        }
    }

    /// Get the content as bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the blob is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the content is text
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Digest of the content, identical to hashing the file on disk
    pub fn digest(&self) -> Blake3Hash {
        hash_bytes(self.as_bytes())
    }
}

impl From<&str> for Blob {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
