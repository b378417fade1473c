//! Console commands.
//!
//! Lines starting with `?` are handled locally; everything else is a script.

pub const QUIT: &str = "?q";
pub const HELP: &str = "?h";
pub const BINDINGS: &str = "?b";
pub const LANGUAGES: &str = "?l";
pub const LANGUAGE_PREFIX: char = '?';

/// Line-continuation marker at the end of an input line.
pub const CONTINUATION: &str = " .";

pub const HELP_TEXT: &[&str] = &[
    "-= Console Specific =-",
    "?<language-name>: jump to engine",
    "?l: list of available languages",
    "?b: print bindings",
    "?h: help",
    "?q: quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Bindings,
    Languages,
    /// Switch the active script language.
    Language(String),
    Script(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        match input {
            QUIT => Command::Quit,
            HELP => Command::Help,
            BINDINGS => Command::Bindings,
            LANGUAGES => Command::Languages,
            _ => match input.strip_prefix(LANGUAGE_PREFIX) {
                Some("") => Command::Help,
                Some(lang) => Command::Language(lang.trim().to_string()),
                None => Command::Script(input.to_string()),
            },
        }
    }
}
