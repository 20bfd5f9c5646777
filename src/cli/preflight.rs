//! Pre-flight checks before expensive operations.
//!
//! Validates that required inputs and credentials are available before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{PlotRagError, Result};
use crate::openai::api_key;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires the dataset and an API key for embeddings.
    Ingest,
    /// Asking questions requires an API key for embeddings and generation.
    Ask,
    /// Search requires an API key for query embeddings.
    Search,
    /// Statistics read the local store only.
    Stats,
}

/// Run pre-flight checks for the given operation.
///
/// For ingestion the dataset is checked first, so a missing file is reported
/// before anything else.
pub fn check(operation: Operation, settings: &Settings, dataset: Option<&std::path::Path>) -> Result<()> {
    match operation {
        Operation::Ingest => {
            let path = dataset.map(|p| p.to_path_buf()).unwrap_or_else(|| settings.dataset_path());
            if !path.exists() {
                return Err(PlotRagError::DatasetNotFound(path));
            }
            api_key(&settings.llm)?;
        }
        Operation::Ask | Operation::Search => {
            api_key(&settings.llm)?;
        }
        Operation::Stats => {}
    }
    Ok(())
}
