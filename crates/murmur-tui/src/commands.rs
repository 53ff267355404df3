//! Slash command parsing for the input line.
//!
//! Anything not starting with `/` is a message. Parsing is pure; the input
//! state turns commands into app events.

use murmur_app::{ContactId, SortMode};

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text for the open conversation.
    Message {
        /// Message body.
        content: String,
    },
    /// `/search [term]`; no term clears the filter.
    Search {
        /// Filter term.
        term: String,
    },
    /// `/sort [name|recent|unread]`; no mode cycles.
    Sort {
        /// Explicit mode, if given.
        mode: Option<SortMode>,
    },
    /// `/fav [id]`; no id targets the open conversation.
    Favorite {
        /// Explicit contact.
        contact_id: Option<ContactId>,
    },
    /// `/go <path>`.
    Navigate {
        /// Route path, e.g. `/chat/3`.
        path: String,
    },
    /// `/theme`.
    ToggleTheme,
    /// `/clear`: dismiss every notification.
    ClearNotifications,
    /// `/online` or `/offline`.
    Connectivity {
        /// New connectivity flag.
        online: bool,
    },
    /// `/receive <text>`: simulate an incoming message in the open
    /// conversation.
    Receive {
        /// Message body.
        content: String,
    },
    /// `/quit`.
    Quit,
    /// Unrecognised `/command`.
    Unknown {
        /// The raw input.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What was wrong.
        error: String,
    },
}

/// Parse one line of input.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.strip_prefix('/') else {
        return Command::Message { content: input.to_string() };
    };
    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();

    match name {
        "search" => Command::Search { term: args.to_string() },
        "sort" => parse_sort(args),
        "fav" => parse_favorite(args),
        "go" if args.is_empty() => {
            Command::InvalidArgs { command: "go", error: "expected a path".to_string() }
        },
        "go" => Command::Navigate { path: args.to_string() },
        "theme" => Command::ToggleTheme,
        "clear" => Command::ClearNotifications,
        "online" => Command::Connectivity { online: true },
        "offline" => Command::Connectivity { online: false },
        "receive" if args.is_empty() => {
            Command::InvalidArgs { command: "receive", error: "expected message text".to_string() }
        },
        "receive" => Command::Receive { content: args.to_string() },
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: input.to_string() },
    }
}

fn parse_sort(args: &str) -> Command {
    if args.is_empty() {
        return Command::Sort { mode: None };
    }
    match args.parse::<SortMode>() {
        Ok(mode) => Command::Sort { mode: Some(mode) },
        Err(e) => Command::InvalidArgs { command: "sort", error: e.to_string() },
    }
}

fn parse_favorite(args: &str) -> Command {
    if args.is_empty() {
        return Command::Favorite { contact_id: None };
    }
    match args.parse::<ContactId>() {
        Ok(id) => Command::Favorite { contact_id: Some(id) },
        Err(_) => {
            Command::InvalidArgs { command: "fav", error: format!("invalid contact id {args:?}") }
        },
    }
}
