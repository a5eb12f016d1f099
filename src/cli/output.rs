use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

fn label(kind: MessageKind) -> Option<(&'static str, &'static str)> {
    match kind {
        MessageKind::Info => Some(("INFO", "[i]")),
        MessageKind::Success => Some(("SUCCESS", "[+]")),
        MessageKind::Warning => Some(("WARNING", "[!]")),
        MessageKind::Error => Some(("ERROR", "[x]")),
        MessageKind::Hint | MessageKind::Section => None,
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match (kind, label(kind)) {
        (MessageKind::Section, _) => format!("=== {} ===", text.trim()),
        (MessageKind::Hint, _) => format!("  {text}"),
        (_, Some((label, icon))) => format!("{label}: {icon} {text}"),
        (_, None) => text,
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.dimmed().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Unlabelled line, used for tables and free text.
pub fn line(message: impl fmt::Display) {
    println!("{message}");
}

/// Disables ANSI styling, e.g. when commands are piped in.
pub fn disable_color() {
    colored::control::set_override(false);
}
