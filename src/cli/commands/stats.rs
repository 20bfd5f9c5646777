//! Stats command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use anyhow::Result;

/// Run the stats command.
pub async fn run_stats(settings: Settings) -> Result<()> {
    let db_path = settings.store_db_path();
    let store = SqliteVectorStore::open(&db_path, &settings.vector_store.collection)?;
    let count = store.count().await?;

    Output::header("Vector store");
    Output::kv("Path", &db_path.display().to_string());
    Output::kv("Collection", store.collection());
    Output::kv("Chunks", &count.to_string());
    Output::kv("Dataset", &settings.dataset_path().display().to_string());
    Output::kv("Chunk size", &format!("{} words", settings.chunking.max_words));

    if count == 0 {
        Output::info("Collection is empty. Run 'plotrag ingest' to build it.");
    }

    Ok(())
}
