//! Word-window chunking for plot text.
//!
//! Plots are split into fixed-size windows of whitespace-separated words so
//! every chunk fits the embedding model input and retrieval granularity stays
//! uniform across short and long records.

use crate::dataset::Record;

/// Default number of words per chunk.
pub const DEFAULT_MAX_WORDS: usize = 300;

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Maximum number of words in a chunk.
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

/// A slice of a record's plot, ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Title of the record the chunk came from.
    pub title: String,
    /// Zero-based position of this chunk within its record.
    pub chunk_id: u32,
    /// Chunk text.
    pub text: String,
}

/// Split text into windows of at most `max_words` words.
///
/// Words are separated by any whitespace and rejoined with single spaces.
/// Empty input yields a single empty chunk. A `max_words` of zero is treated
/// as one.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    words
        .chunks(max_words.max(1))
        .map(|window| window.join(" "))
        .collect()
}

/// Chunk a single record, numbering chunks from zero.
pub fn chunk_record(record: &Record, config: &ChunkingConfig) -> Vec<Chunk> {
    chunk_text(&record.plot, config.max_words)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| Chunk {
            title: record.title.clone(),
            chunk_id: idx as u32,
            text,
        })
        .collect()
}

/// Chunk every record and flatten the result, preserving record order.
pub fn chunk_records(records: &[Record], config: &ChunkingConfig) -> Vec<Chunk> {
    records
        .iter()
        .flat_map(|record| chunk_record(record, config))
        .collect()
}
