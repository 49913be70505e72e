//! Refactor command
//!
//! Asks the assistance service for before/after refactoring proposals
//! for the target file.

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

    println!();
    println!(
        "{}{}  {} Refactoring: {}{}",
        colors::PRIMARY,
        colors::BOLD,
        symbols::FILE,
        file.display(),
        colors::RESET
    );

    let actions = super::action_log(&config);
    actions.record(
        "request_refactoring",
        serde_json::json!({"path": file.display().to_string()}),
    );
    let service = super::build_service(&config, workspace, Some(file), actions)?;

    ui::print_thinking("Reviewing code");
    let reply = service.refactoring_suggestions(&content).await;
    ui::clear_line();
    ui::render_reply(&reply);

    Ok(())
}
