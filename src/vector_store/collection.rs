//! A named collection that embeds text on write and on query.

use super::{ChunkMetadata, SearchResult, StoredChunk, VectorStore};
use crate::embedding::Embedder;
use crate::error::{PlotRagError, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Pairs a vector store with the embedder that produces its vectors.
///
/// Callers hand over text and metadata only; embeddings are computed here,
/// so the same model is used for documents and queries.
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl Collection {
    /// Create a collection over a store and an embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        self.store.collection()
    }

    /// Embed and upsert documents given as parallel arrays.
    #[instrument(skip_all, fields(collection = %self.name(), count = ids.len()))]
    pub async fn add(
        &self,
        ids: &[i64],
        documents: &[String],
        metadatas: &[ChunkMetadata],
    ) -> Result<usize> {
        let chunks = self.embed_chunks(ids, documents, metadatas).await?;
        if chunks.is_empty() {
            return Ok(0);
        }
        self.store.upsert_batch(&chunks).await
    }

    /// Embed the documents, then swap them in for the whole collection.
    ///
    /// Nothing is removed unless every document was embedded. Returns the
    /// number of chunks that were replaced.
    #[instrument(skip_all, fields(collection = %self.name(), count = ids.len()))]
    pub async fn replace(
        &self,
        ids: &[i64],
        documents: &[String],
        metadatas: &[ChunkMetadata],
    ) -> Result<usize> {
        let chunks = self.embed_chunks(ids, documents, metadatas).await?;
        self.store.replace_all(&chunks).await
    }

    async fn embed_chunks(
        &self,
        ids: &[i64],
        documents: &[String],
        metadatas: &[ChunkMetadata],
    ) -> Result<Vec<StoredChunk>> {
        if ids.len() != documents.len() || ids.len() != metadatas.len() {
            return Err(PlotRagError::InvalidInput(format!(
                "Mismatched lengths: {} ids, {} documents, {} metadatas",
                ids.len(),
                documents.len(),
                metadatas.len()
            )));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.embedder.embed_batch(documents).await?;
        if embeddings.len() != documents.len() {
            return Err(PlotRagError::Embedding(format!(
                "Expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }

        Ok(ids
            .iter()
            .zip(documents)
            .zip(metadatas)
            .zip(embeddings)
            .map(|(((id, text), metadata), embedding)| StoredChunk {
                id: *id,
                text: text.clone(),
                metadata: metadata.clone(),
                embedding,
            })
            .collect())
    }

    /// Embed the query text and return the `n_results` nearest chunks.
    #[instrument(skip(self, text), fields(collection = %self.name()))]
    pub async fn query(&self, text: &str, n_results: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(text).await?;
        let results = self.store.search(&query_embedding, n_results).await?;
        debug!("Query matched {} chunks", results.len());
        Ok(results)
    }

    /// Number of chunks in the collection.
    pub async fn count(&self) -> Result<usize> {
        self.store.count().await
    }
}
