//! Ingestion pipeline: dataset rows to persisted, retrievable chunks.

use crate::chunking::{chunk_records, ChunkingConfig};
use crate::config::DatasetSettings;
use crate::dataset::{load_records, Record};
use crate::error::Result;
use crate::vector_store::{ChunkMetadata, Collection};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Summary of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records read from the dataset.
    pub records: usize,
    /// Chunks produced from those records.
    pub chunks: usize,
    /// Chunks written to the store.
    pub upserted: usize,
    /// Chunks removed before writing, when a reset was requested.
    pub cleared: usize,
}

/// Chunks records and writes them into a collection.
pub struct Ingestor {
    collection: Collection,
    config: ChunkingConfig,
}

impl Ingestor {
    /// Create a new ingestor.
    pub fn new(collection: Collection, config: ChunkingConfig) -> Self {
        Self { collection, config }
    }

    /// Load the dataset sample from `path` and ingest it.
    ///
    /// A missing dataset fails before the store is touched. With `reset`, the
    /// new chunks replace the whole collection so a smaller sample leaves no
    /// stale rows. The old chunks are only dropped once embedding succeeded.
    #[instrument(skip(self, path, settings), fields(path = %path.display()))]
    pub async fn ingest_file(
        &self,
        path: &Path,
        settings: &DatasetSettings,
        reset: bool,
    ) -> Result<IngestReport> {
        let records = load_records(path, settings)?;
        self.write(&records, reset).await
    }

    /// Chunk the records and upsert every chunk in one batch.
    ///
    /// Ids are assigned sequentially across the flattened chunk list, starting
    /// at zero, independent of each chunk's position within its record.
    pub async fn ingest_records(&self, records: &[Record]) -> Result<IngestReport> {
        self.write(records, false).await
    }

    #[instrument(skip_all, fields(records = records.len()))]
    async fn write(&self, records: &[Record], reset: bool) -> Result<IngestReport> {
        let chunks = chunk_records(records, &self.config);
        info!("Generated {} chunks from {} records", chunks.len(), records.len());

        if chunks.is_empty() && !reset {
            warn!("Nothing to ingest");
            return Ok(IngestReport {
                records: records.len(),
                ..IngestReport::default()
            });
        }

        let ids: Vec<i64> = (0..chunks.len() as i64).collect();
        let (documents, metadatas): (Vec<String>, Vec<ChunkMetadata>) = chunks
            .into_iter()
            .map(|chunk| {
                (
                    chunk.text,
                    ChunkMetadata {
                        title: chunk.title,
                        chunk_id: chunk.chunk_id,
                    },
                )
            })
            .unzip();

        let (upserted, cleared) = if reset {
            let cleared = self.collection.replace(&ids, &documents, &metadatas).await?;
            info!("Cleared {} chunks from {}", cleared, self.collection.name());
            (documents.len(), cleared)
        } else {
            (self.collection.add(&ids, &documents, &metadatas).await?, 0)
        };
        info!("Inserted {} chunks into {}", upserted, self.collection.name());

        Ok(IngestReport {
            records: records.len(),
            chunks: documents.len(),
            upserted,
            cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::error::PlotRagError;
    use crate::testing::KeywordEmbedder;
    use crate::vector_store::{MemoryVectorStore, VectorStore};
    use std::io::Write;
    use std::sync::Arc;

    fn words(prefix: &str, n: usize) -> String {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect::<Vec<_>>().join(" ")
    }

    fn setup(max_words: usize) -> (Ingestor, Arc<MemoryVectorStore>, Arc<KeywordEmbedder>) {
        setup_with(max_words, KeywordEmbedder::default())
    }

    fn setup_with(
        max_words: usize,
        embedder: KeywordEmbedder,
    ) -> (Ingestor, Arc<MemoryVectorStore>, Arc<KeywordEmbedder>) {
        let store = Arc::new(MemoryVectorStore::new("movie_plots"));
        let embedder = Arc::new(embedder);
        let collection = Collection::new(store.clone(), embedder.clone());
        (Ingestor::new(collection, ChunkingConfig { max_words }), store, embedder)
    }

    #[tokio::test]
    async fn test_ids_are_global_and_chunk_ids_per_record() {
        let (ingestor, store, embedder) = setup(300);
        let records = vec![
            Record::new("Long Movie", &words("a", 650)),
            Record::new("Short Movie", "A dog finds its way home."),
        ];

        let report = ingestor.ingest_records(&records).await.unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.chunks, 4);
        assert_eq!(report.upserted, 4);
        assert_eq!(embedder.embedded(), 4);

        let mut stored: Vec<_> = store
            .search(&vec![1.0; embedder.dimensions()], 10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.chunk)
            .collect();
        stored.sort_by_key(|c| c.id);

        let layout: Vec<(i64, &str, u32, usize)> = stored
            .iter()
            .map(|c| (c.id, c.metadata.title.as_str(), c.metadata.chunk_id, c.text.split_whitespace().count()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (0, "Long Movie", 0, 300),
                (1, "Long Movie", 1, 300),
                (2, "Long Movie", 2, 50),
                (3, "Short Movie", 0, 6),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_dataset_fails_before_touching_store() {
        let (ingestor, store, embedder) = setup(300);
        store
            .upsert(&crate::vector_store::StoredChunk {
                id: 0,
                text: "keep me".to_string(),
                metadata: ChunkMetadata { title: "Kept".to_string(), chunk_id: 0 },
                embedding: vec![1.0],
            })
            .await
            .unwrap();

        let err = ingestor
            .ingest_file(Path::new("/no/such/plots.csv"), &DatasetSettings::default(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, PlotRagError::DatasetNotFound(_)));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(embedder.embedded(), 0);
    }

    #[tokio::test]
    async fn test_ingest_file_with_reset() {
        let (ingestor, store, _) = setup(3);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Title,Plot\nHeat,one two three four\nUp,a balloon house\nCars,vroom\n").unwrap();

        let settings = DatasetSettings {
            sample_size: 2,
            ..DatasetSettings::default()
        };

        let first = ingestor.ingest_file(file.path(), &settings, false).await.unwrap();
        assert_eq!(first, IngestReport { records: 2, chunks: 3, upserted: 3, cleared: 0 });

        let second = ingestor.ingest_file(file.path(), &settings, true).await.unwrap();
        assert_eq!(second.cleared, 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reset_keeps_index_when_embedding_fails() {
        let (ingestor, store, _) = setup_with(300, KeywordEmbedder::failing());
        store
            .upsert_batch(&[
                crate::vector_store::StoredChunk {
                    id: 0,
                    text: "old plot".to_string(),
                    metadata: ChunkMetadata { title: "Heat".to_string(), chunk_id: 0 },
                    embedding: vec![1.0],
                },
                crate::vector_store::StoredChunk {
                    id: 1,
                    text: "older plot".to_string(),
                    metadata: ChunkMetadata { title: "Up".to_string(), chunk_id: 0 },
                    embedding: vec![1.0],
                },
            ])
            .await
            .unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Title,Plot\nCars,vroom\n").unwrap();

        let err = ingestor
            .ingest_file(file.path(), &DatasetSettings::default(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, PlotRagError::OpenAI(_)));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reingest_without_reset_overwrites_same_ids() {
        let (ingestor, store, _) = setup(300);
        let records = vec![Record::new("Heat", "a heist goes wrong")];

        ingestor.ingest_records(&records).await.unwrap();
        ingestor.ingest_records(&records).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
    }
}
