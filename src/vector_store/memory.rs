//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, SearchResult, StoredChunk, VectorStore};
use crate::error::{PlotRagError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    collection: String,
    chunks: RwLock<BTreeMap<i64, StoredChunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store for the named collection.
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            chunks: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<i64, StoredChunk>>> {
        self.chunks
            .read()
            .map_err(|e| PlotRagError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<i64, StoredChunk>>> {
        self.chunks
            .write()
            .map_err(|e| PlotRagError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(&self, chunk: &StoredChunk) -> Result<()> {
        self.write()?.insert(chunk.id, chunk.clone());
        Ok(())
    }

    async fn upsert_batch(&self, chunks: &[StoredChunk]) -> Result<usize> {
        let mut store = self.write()?;
        for chunk in chunks {
            store.insert(chunk.id, chunk.clone());
        }
        Ok(chunks.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let chunks = self.read()?;
        rank(query_embedding, chunks.values().cloned(), limit)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut chunks = self.write()?;
        let removed = chunks.len();
        chunks.clear();
        Ok(removed)
    }

    async fn replace_all(&self, chunks: &[StoredChunk]) -> Result<usize> {
        let mut store = self.write()?;
        let removed = store.len();
        *store = chunks.iter().map(|c| (c.id, c.clone())).collect();
        Ok(removed)
    }
}
