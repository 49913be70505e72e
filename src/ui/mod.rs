//! Shared CLI presentation helpers
//!
//! One canonical home for the design-system colors and the bubble
//! printers used by every command.

use std::io::{self, Write};

use crate::ai::backend::AiReply;

// ANSI color codes from design system
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

pub mod symbols {
    pub const AI_ICON: &str = "󰌤";
    pub const FILE: &str = "󰈙";
    pub const SUCCESS: &str = "󰄂";
    pub const ERROR: &str = "󰅚";
    pub const DIVIDER: &str = "─";
    pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

/// Print a horizontal divider
pub fn print_divider() {
    println!(
        "{}{}{}",
        colors::MUTED,
        symbols::DIVIDER.repeat(55),
        colors::RESET
    );
}

/// Print user message bubble
pub fn print_user_message(content: &str) {
    println!();
    println!(
        "{}{}  You {}{}",
        colors::PRIMARY,
        colors::BOLD,
        colors::RESET,
        colors::MUTED
    );
    for line in content.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!(
        "{}  ╰{}─{}",
        colors::MUTED,
        symbols::DIVIDER.repeat(50),
        colors::RESET
    );
}

/// Print an assistant bubble with a title and body
pub fn print_ai_message(title: &str, content: &str) {
    println!();
    println!(
        "{}{}  {} {} {}{}",
        colors::AI_ACCENT,
        colors::BOLD,
        symbols::AI_ICON,
        title,
        colors::RESET,
        colors::MUTED
    );
    for line in content.lines() {
        println!("{}  │ {}{}", colors::MUTED, colors::FG, line);
    }
    println!(
        "{}  ╰{}─{}",
        colors::MUTED,
        symbols::DIVIDER.repeat(50),
        colors::RESET
    );
}

/// Print thinking indicator
pub fn print_thinking(label: &str) {
    print!(
        "\r{}  {} {} {}{}",
        colors::AI_ACCENT,
        symbols::AI_ICON,
        label,
        symbols::SPINNER[0],
        colors::RESET
    );
    io::stdout().flush().ok();
}

/// Clear the current line
pub fn clear_line() {
    print!("\r{}\r", " ".repeat(60));
    io::stdout().flush().ok();
}

/// Print error message
pub fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR,
        symbols::ERROR,
        message,
        colors::RESET
    );
}

/// Print success message
pub fn print_success(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::SUCCESS,
        symbols::SUCCESS,
        message,
        colors::RESET
    );
}

/// Render a typed reply to the terminal
pub fn render_reply(reply: &AiReply) {
    match reply {
        AiReply::Text { message } => print_ai_message("DevSpark AI", message),
        AiReply::Code {
            message,
            language,
            code,
        } => {
            print_ai_message("DevSpark AI", message);
            println!("{}  ```{}{}", colors::MUTED, language, colors::RESET);
            for line in code.lines() {
                println!("{}  {}{}", colors::FG, line, colors::RESET);
            }
            println!("{}  ```{}", colors::MUTED, colors::RESET);
        }
        AiReply::Suggestions { suggestions } => {
            if suggestions.is_empty() {
                print_ai_message("Suggestions", "No suggestions for this position.");
                return;
            }
            println!();
            println!(
                "{}{}  {} Suggestions{}",
                colors::AI_ACCENT,
                colors::BOLD,
                symbols::AI_ICON,
                colors::RESET
            );
            for suggestion in suggestions {
                println!(
                    "{}  • {}{}{}: {}{}",
                    colors::MUTED,
                    colors::FG,
                    suggestion.label,
                    colors::MUTED,
                    suggestion.documentation,
                    colors::RESET
                );
                for line in suggestion.insert_text.lines() {
                    println!("{}      {}{}", colors::MUTED, line, colors::RESET);
                }
            }
        }
        AiReply::Explanation { explanation } => print_ai_message("Explanation", explanation),
        AiReply::Refactoring { suggestions } => {
            println!();
            println!(
                "{}{}  {} Refactoring Suggestions{}",
                colors::AI_ACCENT,
                colors::BOLD,
                symbols::AI_ICON,
                colors::RESET
            );
            for (n, suggestion) in suggestions.iter().enumerate() {
                println!();
                println!(
                    "{}  {}. {}{}{}",
                    colors::MUTED,
                    n + 1,
                    colors::FG,
                    suggestion.title,
                    colors::RESET
                );
                println!("{}     {}{}", colors::MUTED, suggestion.description, colors::RESET);
                if !suggestion.before.is_empty() {
                    println!("{}     before:{}", colors::ERROR, colors::RESET);
                    for line in suggestion.before.lines() {
                        println!("{}       {}{}", colors::MUTED, line, colors::RESET);
                    }
                }
                if !suggestion.after.is_empty() {
                    println!("{}     after:{}", colors::SUCCESS, colors::RESET);
                    for line in suggestion.after.lines() {
                        println!("{}       {}{}", colors::MUTED, line, colors::RESET);
                    }
                }
            }
        }
        AiReply::Error { message } => print_error(message),
    }
}
