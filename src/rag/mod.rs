//! RAG (Retrieval-Augmented Generation) for grounded answers about movie plots.
//!
//! Retrieval and prompt assembly live in [`context`], recovery of the model's
//! JSON reply in [`structured`], and the end-to-end flow in [`RagEngine`].

pub mod context;
mod response;
pub mod structured;

pub use context::{format_context_for_prompt, Retriever};
pub use response::{Answer, RagEngine};
pub use structured::{recover, Recovery, StructuredAnswer, FALLBACK_REASONING};

use crate::vector_store::SearchResult;
use serde::Serialize;

/// A retrieved chunk with its position in the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    /// One-based relevance rank.
    pub rank: usize,
    /// Title of the source record.
    pub title: String,
    /// Position of the chunk within its record.
    pub chunk_id: u32,
    /// Chunk text.
    pub text: String,
    /// Similarity score.
    pub score: f32,
}

impl ContextChunk {
    fn from_result(rank: usize, result: SearchResult) -> Self {
        Self {
            rank,
            title: result.chunk.metadata.title,
            chunk_id: result.chunk.metadata.chunk_id,
            text: result.chunk.text,
            score: result.score,
        }
    }
}
