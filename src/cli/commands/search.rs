//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, top_k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings, None) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let top_k = top_k.unwrap_or(settings.retrieval.top_k);
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.retriever().retrieve(query, top_k).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) if chunks.is_empty() => {
            Output::warning("No chunks found. Run 'plotrag ingest' to build the index.");
        }
        Ok(chunks) => {
            Output::success(&format!("Found {} results", chunks.len()));
            for chunk in &chunks {
                Output::search_result(chunk.rank, &chunk.title, chunk.chunk_id, chunk.score, &chunk.text);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
