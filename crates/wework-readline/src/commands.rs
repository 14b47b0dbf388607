//! REPL input classification, completion and hints.

/// A slash command the REPL understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: &'static str,
    /// Placeholder for the free-text argument, if the command takes one.
    pub argument: Option<&'static str>,
}

pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand { name: "/open", argument: None },
    SlashCommand { name: "/close", argument: None },
    SlashCommand { name: "/reset", argument: None },
    SlashCommand { name: "/history", argument: None },
    SlashCommand { name: "/health", argument: None },
    SlashCommand { name: "/status", argument: None },
    SlashCommand { name: "/legacy", argument: Some("<description>") },
];

fn lookup(name: &str) -> Option<&'static SlashCommand> {
    SLASH_COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// Command names starting with `prefix`. Empty once an argument is being typed.
pub fn completions(prefix: &str) -> Vec<&'static str> {
    if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
        return Vec::new();
    }
    SLASH_COMMANDS
        .iter()
        .map(|cmd| cmd.name)
        .filter(|name| name.starts_with(prefix))
        .collect()
}

/// Inline hint for the text left of the cursor.
///
/// Completes a partial command name, or shows the argument placeholder once a
/// command that takes one is followed by a space.
pub fn hint(prefix: &str) -> Option<String> {
    if !prefix.starts_with('/') {
        return None;
    }

    match prefix.split_once(' ') {
        None => {
            if let Some(cmd) = lookup(prefix) {
                return cmd.argument.map(|arg| format!(" {arg}"));
            }
            let mut matches = completions(prefix).into_iter();
            match (matches.next(), matches.next()) {
                (Some(name), None) => Some(name[prefix.len()..].to_string()),
                _ => None,
            }
        }
        Some((name, rest)) if rest.is_empty() => lookup(name)?.argument.map(str::to_string),
        Some(_) => None,
    }
}

/// Whether `line` begins with a command the REPL knows.
pub fn is_known(line: &str) -> bool {
    let name = line.split(char::is_whitespace).next().unwrap_or_default();
    lookup(name).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Open,
    Close,
    Reset,
    History,
    Health,
    Status,
    /// Query for the legacy help-and-support API.
    Legacy(String),
    Unknown(String),
    /// Anything else is a chat message.
    Chat(String),
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed == "quit" || trimmed == "exit" {
        return Command::Quit;
    }
    if !trimmed.starts_with('/') {
        return Command::Chat(trimmed.to_string());
    }

    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((trimmed, ""));

    match name {
        "/open" => Command::Open,
        "/close" => Command::Close,
        "/reset" => Command::Reset,
        "/history" => Command::History,
        "/health" => Command::Health,
        "/status" => Command::Status,
        "/legacy" => Command::Legacy(rest.to_string()),
        other => Command::Unknown(other.to_string()),
    }
}
