//! plotrag - grounded answers about movie plots
//!
//! A small retrieval-augmented generation pipeline over a movie plot dataset.
//!
//! # Overview
//!
//! Two flows share one persistent vector store:
//!
//! - Ingestion loads the first N dataset rows, splits each plot into word
//!   windows, embeds them and writes them to a named collection.
//! - Querying embeds a question, retrieves the nearest chunks, asks a language
//!   model to answer from that context only, and recovers its JSON reply.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `dataset` - CSV loading
//! - `chunking` - Word-window chunking
//! - `embedding` - Embedding generation
//! - `generation` - Language model calls
//! - `vector_store` - Vector storage and collections
//! - `ingest` - Ingestion pipeline
//! - `rag` - Retrieval, prompt assembly and answer recovery
//! - `orchestrator` - Collaborator wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use plotrag::config::Settings;
//! use plotrag::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let generator = orchestrator.default_generator(None)?;
//!     let answer = orchestrator
//!         .answer(generator, "Who owns the nightclub in Casablanca?", 5)
//!         .await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ingest;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{PlotRagError, Result};
