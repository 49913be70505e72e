//! Explain command
//!
//! Sends the target file to the assistance service and prints the
//! explanation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::ui;
use crate::ui::{colors, symbols};

pub async fn run(config: Config, workspace: &Path, file: &Path) -> Result<()> {
    if !file.exists() {
        ui::print_error(&format!("File not found: {}", file.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    print_header(file);

    let actions = super::action_log(&config);
    actions.record(
        "request_explanation",
        serde_json::json!({"path": file.display().to_string()}),
    );
    let service = super::build_service(&config, workspace, Some(file), actions)?;

    ui::print_thinking("Analyzing code");
    let reply = service.code_explanation(&content).await;
    ui::clear_line();
    ui::render_reply(&reply);

    Ok(())
}

fn print_header(file: &Path) {
    println!();
    println!(
        "{}{}  {} Explaining: {}{}",
        colors::PRIMARY,
        colors::BOLD,
        symbols::FILE,
        file.display(),
        colors::RESET
    );
    println!(
        "{}  ╰{}─{}",
        colors::MUTED,
        "─".repeat(50),
        colors::RESET
    );
}
