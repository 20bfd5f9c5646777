//! SQLite-based vector store implementation.
//!
//! Embeddings are stored as little-endian `f32` blobs and similarity is
//! computed in Rust over every row of the collection.

use super::{rank, ChunkMetadata, SearchResult, StoredChunk, VectorStore};
use crate::error::{PlotRagError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS chunks (
        collection TEXT NOT NULL,
        id INTEGER NOT NULL,
        title TEXT NOT NULL,
        chunk_id INTEGER NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL,
        PRIMARY KEY (collection, id)
    );

    CREATE INDEX IF NOT EXISTS idx_chunks_title ON chunks(collection, title);
"#;

const UPSERT: &str = r#"
    INSERT OR REPLACE INTO chunks
    (collection, id, title, chunk_id, content, embedding, indexed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    collection: String,
}

impl SqliteVectorStore {
    /// Open (or create) the database at `path`, bound to `collection`.
    #[instrument(skip_all, fields(collection = %collection))]
    pub fn open(path: &Path, collection: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory(collection: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.to_string(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PlotRagError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn insert(&self, conn: &Connection, chunk: &StoredChunk, indexed_at: &str) -> Result<()> {
        conn.execute(
            UPSERT,
            params![
                self.collection,
                chunk.id,
                chunk.metadata.title,
                chunk.metadata.chunk_id,
                chunk.text,
                Self::embedding_to_bytes(&chunk.embedding),
                indexed_at,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    #[instrument(skip(self, chunk), fields(id = chunk.id))]
    async fn upsert(&self, chunk: &StoredChunk) -> Result<()> {
        let conn = self.lock()?;
        self.insert(&conn, chunk, &Utc::now().to_rfc3339())?;
        debug!("Upserted chunk {}", chunk.id);
        Ok(())
    }

    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    async fn upsert_batch(&self, chunks: &[StoredChunk]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        let indexed_at = Utc::now().to_rfc3339();

        for chunk in chunks {
            self.insert(&tx, chunk, &indexed_at)?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks into {}", chunks.len(), self.collection);
        Ok(chunks.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, chunk_id, content, embedding
            FROM chunks
            WHERE collection = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![self.collection], |row| {
            let embedding_bytes: Vec<u8> = row.get(4)?;
            Ok(StoredChunk {
                id: row.get(0)?,
                metadata: ChunkMetadata {
                    title: row.get(1)?,
                    chunk_id: row.get(2)?,
                },
                text: row.get(3)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
            })
        })?;

        let candidates = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        let results = rank(query_embedding, candidates, limit)?;

        debug!("Found {} matching chunks", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![self.collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM chunks WHERE collection = ?1",
            params![self.collection],
        )?;

        info!("Deleted {} chunks from {}", deleted, self.collection);
        Ok(deleted)
    }

    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    async fn replace_all(&self, chunks: &[StoredChunk]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        let indexed_at = Utc::now().to_rfc3339();

        let deleted = tx.execute(
            "DELETE FROM chunks WHERE collection = ?1",
            params![self.collection],
        )?;
        for chunk in chunks {
            self.insert(&tx, chunk, &indexed_at)?;
        }

        tx.commit()?;
        info!(
            "Replaced {} chunks with {} in {}",
            deleted,
            chunks.len(),
            self.collection
        );
        Ok(deleted)
    }
}
