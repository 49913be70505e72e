//! Interactive chat command
//!
//! A terminal conversation with the assistance service. Each message is
//! dispatched with the current workspace context attached.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::ui;
use crate::ui::colors;

pub async fn run(
    config: Config,
    workspace: &Path,
    file: Option<&Path>,
    prompt: Option<String>,
) -> Result<()> {
    let actions = super::action_log(&config);
    if let Some(file) = file {
        actions.record(
            "open_file",
            serde_json::json!({"path": file.display().to_string()}),
        );
    }
    let service = super::build_service(&config, workspace, file, actions.clone())?;

    // One-shot mode
    if let Some(prompt) = prompt {
        ui::print_user_message(&prompt);
        ui::print_thinking("DevSpark AI is thinking");
        let reply = service.process_chat_message(&prompt).await;
        ui::clear_line();
        ui::render_reply(&reply);
        return Ok(());
    }

    print_welcome(file);

    let stdin = io::stdin();
    loop {
        print!("{}> {}", colors::PRIMARY, colors::RESET);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        match message {
            "exit" | "quit" => {
                ui::print_success("Goodbye!");
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "context" => {
                print_context(&service);
                continue;
            }
            _ => {}
        }

        actions.record("chat_message", serde_json::json!({"length": message.len()}));
        ui::print_user_message(message);
        ui::print_thinking("DevSpark AI is thinking");
        let reply = service.process_chat_message(message).await;
        ui::clear_line();
        ui::render_reply(&reply);
    }

    Ok(())
}

fn print_welcome(file: Option<&Path>) {
    println!();
    println!(
        "{}{}  DevSpark AI{}",
        colors::AI_ACCENT,
        colors::BOLD,
        colors::RESET
    );
    if let Some(file) = file {
        println!(
            "{}  │ Editing: {}{}{}",
            colors::MUTED,
            colors::FG,
            file.display(),
            colors::RESET
        );
    }
    println!(
        "{}  │ Type a message, or 'help', 'context', 'exit'{}",
        colors::MUTED,
        colors::RESET
    );
    ui::print_divider();
}

fn print_help() {
    println!();
    println!(
        "{}{}  Available Commands:{}",
        colors::PRIMARY,
        colors::BOLD,
        colors::RESET
    );
    println!("{}  help     Show this help{}", colors::FG, colors::RESET);
    println!(
        "{}  context  Show the current context window{}",
        colors::FG,
        colors::RESET
    );
    println!("{}  exit     Leave the chat{}", colors::FG, colors::RESET);
}

fn print_context(service: &crate::ai::AiService) {
    let items = service.collect_context();
    println!();
    println!(
        "{}{}  Context window ({} items):{}",
        colors::PRIMARY,
        colors::BOLD,
        items.len(),
        colors::RESET
    );
    for item in items {
        println!(
            "{}  • {}{}{} @ {}{}",
            colors::MUTED,
            colors::FG,
            item.kind,
            colors::MUTED,
            item.timestamp.to_rfc3339(),
            colors::RESET
        );
    }
}
