//! Sentence-greedy chunking.
//!
//! Sentences are packed into chunks in order until the next one would push the
//! chunk past the size limit. A sentence is never split, so one sentence longer
//! than the limit becomes a chunk of its own.

mod helpers;
mod types;

pub use types::Chunk;

use helpers::split_sentences;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

const JOINER: &str = " ";

/// Split `text` into ordered chunks of at most `max_chunk_size` characters.
///
/// Always returns at least one chunk; text with no sentences yields a single
/// empty chunk. A `max_chunk_size` of zero is treated as one.
pub fn chunk(text: &str, max_chunk_size: usize) -> Vec<Chunk> {
    let max = max_chunk_size.max(1);
    let sentences = split_sentences(text);

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buf = String::new();
    let mut buf_chars = 0usize;
    let mut buf_offset = 0usize;

    for sentence in sentences {
        let len = sentence.char_len();
        if buf.is_empty() {
            buf.push_str(sentence.text);
            buf_chars = len;
            buf_offset = sentence.char_offset;
        } else if buf_chars + JOINER.len() + len <= max {
            buf.push_str(JOINER);
            buf.push_str(sentence.text);
            buf_chars += JOINER.len() + len;
        } else {
            let index = chunks.len();
            chunks.push(Chunk::new(index, std::mem::take(&mut buf), buf_offset));
            buf.push_str(sentence.text);
            buf_chars = len;
            buf_offset = sentence.char_offset;
        }
    }

    if !buf.is_empty() || chunks.is_empty() {
        let index = chunks.len();
        chunks.push(Chunk::new(index, buf, buf_offset));
    }

    tracing::trace!(chunks = chunks.len(), max, "chunked text");
    chunks
}

#[cfg(test)]
mod tests;
