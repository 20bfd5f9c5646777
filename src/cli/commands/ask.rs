//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{AskArgs, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};

/// Run the ask command, printing the answer as pretty JSON on stdout.
pub async fn run_ask(args: &AskArgs, settings: Settings) -> Result<()> {
    let question = args
        .query
        .as_deref()
        .context("--query is required to ask a question")?;

    if let Err(e) = preflight::check(Operation::Ask, &settings, None) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let top_k = args.top_k.unwrap_or(settings.retrieval.top_k);
    let orchestrator = Orchestrator::new(settings)?;
    let generator = orchestrator.default_generator(args.model.as_deref())?;

    let spinner = Output::spinner("Searching movie plots...");
    let result = orchestrator.answer(generator, question, top_k).await;
    spinner.finish_and_clear();

    let answer = match result {
        Ok(answer) => answer,
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    };

    let answer = if args.show_contexts {
        answer
    } else {
        answer.without_contexts()
    };

    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}
