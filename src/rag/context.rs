//! Retrieval and context assembly.

use super::ContextChunk;
use crate::error::{PlotRagError, Result};
use crate::vector_store::Collection;
use tracing::{debug, instrument};

/// Separator placed between context blocks in the prompt.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Fetches the chunks most similar to a query.
#[derive(Clone)]
pub struct Retriever {
    collection: Collection,
}

impl Retriever {
    /// Create a new retriever over a collection.
    pub fn new(collection: Collection) -> Self {
        Self { collection }
    }

    /// Return up to `top_k` chunks in descending similarity order.
    ///
    /// A store holding fewer than `top_k` chunks yields what it has.
    #[instrument(skip(self, query))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ContextChunk>> {
        if top_k == 0 {
            return Err(PlotRagError::InvalidInput("top_k must be a positive integer".to_string()));
        }

        let results = self.collection.query(query, top_k).await?;
        debug!("Retrieved {} of {} requested chunks", results.len(), top_k);

        Ok(results
            .into_iter()
            .enumerate()
            .map(|(i, r)| ContextChunk::from_result(i + 1, r))
            .collect())
    }
}

/// Format context chunks as labeled blocks for the prompt.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            format!(
                "Title: {}\nChunk ID: {}\nPlot snippet: {}",
                chunk.title, chunk.chunk_id, chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
