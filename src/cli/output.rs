//! CLI output formatting utilities.
//!
//! Status lines go to stderr so stdout carries only command results.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        eprintln!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a retrieved chunk.
    pub fn search_result(rank: usize, title: &str, chunk_id: u32, score: f32, content: &str) {
        println!(
            "\n{} {} {} (chunk {}, score: {:.3})",
            style(format!("[{}]", rank)).green(),
            style(title).bold(),
            style(">>").dim(),
            chunk_id,
            score
        );
        println!("   {}", content_preview(content, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
