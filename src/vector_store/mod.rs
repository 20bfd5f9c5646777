//! Vector store abstraction for plotrag.
//!
//! Provides a trait-based interface for different vector database backends,
//! plus [`Collection`], which embeds text on write and on query.

mod collection;
mod memory;
mod sqlite;

pub use collection::Collection;
pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::{PlotRagError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside each chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Title of the source record.
    pub title: String,
    /// Position of the chunk within its record.
    pub chunk_id: u32,
}

/// A chunk as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Identifier, unique within the collection.
    pub id: i64,
    /// Chunk text.
    pub text: String,
    /// Chunk metadata.
    pub metadata: ChunkMetadata,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: StoredChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
///
/// A store instance is bound to a single named collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Store a chunk, replacing any chunk with the same id.
    async fn upsert(&self, chunk: &StoredChunk) -> Result<()>;

    /// Bulk upsert chunks.
    async fn upsert_batch(&self, chunks: &[StoredChunk]) -> Result<usize>;

    /// Return up to `limit` chunks ordered by descending similarity.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Get total chunk count.
    async fn count(&self) -> Result<usize>;

    /// Remove every chunk in the collection.
    async fn clear(&self) -> Result<usize>;

    /// Replace the whole collection with `chunks` in one step.
    ///
    /// Either every old chunk is gone and every new one is stored, or the
    /// collection is left as it was. Returns the number of chunks removed.
    async fn replace_all(&self, chunks: &[StoredChunk]) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score every candidate against the query and keep the best `limit`.
///
/// Ties keep the lower id first so results are stable across runs. A stored
/// vector whose length differs from the query's was produced by another
/// embedding model, which is an error rather than a zero score.
pub(crate) fn rank(
    query_embedding: &[f32],
    candidates: impl IntoIterator<Item = StoredChunk>,
    limit: usize,
) -> Result<Vec<SearchResult>> {
    let mut results = Vec::new();
    for chunk in candidates {
        if chunk.embedding.len() != query_embedding.len() {
            return Err(PlotRagError::VectorStore(format!(
                "Embedding dimension mismatch: query has {}, chunk {} has {}. Re-ingest with --reset after changing the embedding model",
                query_embedding.len(),
                chunk.id,
                chunk.embedding.len()
            )));
        }
        let score = cosine_similarity(query_embedding, &chunk.embedding);
        results.push(SearchResult { chunk, score });
    }

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    results.truncate(limit);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: i64, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            id,
            text: format!("chunk {}", id),
            metadata: ChunkMetadata {
                title: "Movie".to_string(),
                chunk_id: id as u32,
            },
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let results = rank(
            &[1.0, 0.0],
            vec![
                chunk(0, vec![0.0, 1.0]),
                chunk(1, vec![1.0, 0.0]),
                chunk(2, vec![1.0, 1.0]),
            ],
            2,
        )
        .unwrap();

        let ids: Vec<i64> = results.iter().map(|r| r.chunk.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_rank_breaks_ties_by_id() {
        let results = rank(
            &[1.0, 0.0],
            vec![chunk(7, vec![2.0, 0.0]), chunk(3, vec![1.0, 0.0])],
            10,
        )
        .unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.chunk.id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn test_rank_with_nan_scores_is_total() {
        let results = rank(
            &[1.0, 0.0],
            vec![
                chunk(0, vec![f32::NAN, 0.0]),
                chunk(1, vec![1.0, 0.0]),
                chunk(2, vec![f32::NAN, 1.0]),
                chunk(3, vec![0.0, 1.0]),
            ],
            10,
        )
        .unwrap();

        assert_eq!(results.len(), 4);
        let ids: Vec<i64> = results.iter().filter(|r| !r.score.is_nan()).map(|r| r.chunk.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_rank_rejects_dimension_mismatch() {
        let err = rank(
            &[1.0, 0.0, 0.0],
            vec![chunk(0, vec![1.0, 0.0, 0.0]), chunk(1, vec![1.0, 0.0])],
            10,
        )
        .unwrap_err();

        assert!(matches!(err, PlotRagError::VectorStore(ref msg) if msg.contains("dimension mismatch")));
    }

    #[test]
    fn test_rank_empty_store_is_ok() {
        assert!(rank(&[1.0], Vec::new(), 5).unwrap().is_empty());
    }
}
