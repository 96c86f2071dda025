//! Chunk output type.

use serde::{Deserialize, Serialize};

/// A contiguous run of whole sentences from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position within the document.
    pub index: usize,
    pub text: String,
    /// Length of `text` in characters.
    pub length: usize,
    /// Character offset of the first sentence in the chunked text.
    pub char_offset: usize,
}

impl Chunk {
    pub(crate) fn new(index: usize, text: String, char_offset: usize) -> Self {
        let length = text.chars().count();
        Self {
            index,
            text,
            length,
            char_offset,
        }
    }

    /// Label used when citing this chunk as an answer source.
    pub fn label(&self) -> String {
        format!("Chunk {}", self.index + 1)
    }
}
