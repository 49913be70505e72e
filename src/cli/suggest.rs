//! Inline suggestion command
//!
//! Produces completion candidates for the text before the cursor,
//! defaulting to the last line of the target file.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::ui;

pub async fn run(
    config: Config,
    workspace: &Path,
    file: &Path,
    prefix: Option<String>,
) -> Result<()> {
    if !file.exists() {
        ui::print_error(&format!("File not found: {}", file.display()));
        return Ok(());
    }

    let prefix = match prefix {
        Some(p) => p,
        None => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            content.lines().last().unwrap_or("").to_string()
        }
    };

    let actions = super::action_log(&config);
    actions.record(
        "request_suggestions",
        serde_json::json!({"path": file.display().to_string()}),
    );
    let service = super::build_service(&config, workspace, Some(file), actions)?;

    ui::print_thinking("Completing");
    let reply = service.inline_suggestions(&prefix).await;
    ui::clear_line();
    ui::render_reply(&reply);

    Ok(())
}
