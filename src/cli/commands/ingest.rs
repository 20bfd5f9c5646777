//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::PathBuf;

/// Run the ingest command.
pub async fn run_ingest(
    dataset: Option<String>,
    limit: Option<usize>,
    reset: bool,
    settings: Settings,
) -> Result<()> {
    let dataset = dataset.map(|d| Settings::expand_path(&d));

    if let Err(e) = preflight::check(Operation::Ingest, &settings, dataset.as_deref()) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    if limit == Some(0) {
        anyhow::bail!("--limit must be at least 1");
    }

    let path: PathBuf = dataset.clone().unwrap_or_else(|| settings.dataset_path());
    let sample = limit.unwrap_or(settings.dataset.sample_size);
    Output::info(&format!("Ingesting up to {} records from {}", sample, path.display()));

    let orchestrator = Orchestrator::new(settings)?;
    let collection = orchestrator.settings().vector_store.collection.clone();

    let spinner = Output::spinner("Chunking and embedding plots...");
    let result = orchestrator.ingest(Some(path), limit, reset).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success("Ingestion completed successfully!");
            Output::kv("Collection", &collection);
            Output::kv("Records", &report.records.to_string());
            Output::kv("Chunks", &report.chunks.to_string());
            Output::kv("Upserted", &report.upserted.to_string());
            if reset {
                Output::kv("Cleared", &report.cleared.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
