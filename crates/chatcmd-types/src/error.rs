//! Error types for chatcmd.

use std::io;

use crate::literal::LiteralKind;
use crate::messages::{MessageCatalog, Msg};

/// Errors produced while interpreting a chat command.
///
/// Every variant is recovered into an error reply by the dispatcher; none of
/// them crosses the interpreter boundary as a failure.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Argument required")]
    ArgRequired,

    #[error("{0} arguments required")]
    ArgsRequired(usize),

    #[error("This command does not accept arguments")]
    NoArgsAccepted,

    #[error("Too many arguments, at most {0} accepted")]
    TooManyArgs(usize),

    #[error("Invalid action")]
    InvalidAction,

    #[error("Invalid argument")]
    InvalidArgument,

    #[error("Invalid {0}")]
    InvalidLiteral(LiteralKind),

    #[error("Unterminated quote")]
    UnterminatedQuote,

    /// Error text reported by a subsystem, passed through verbatim.
    #[error("{0}")]
    Handler(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ChatError {
    /// Render the error through a message catalog.
    ///
    /// Handler errors keep the subsystem's own text; ambient errors (config,
    /// I/O) fall back to their `Display` form.
    pub fn render(&self, catalog: &dyn MessageCatalog) -> String {
        match self {
            Self::UnknownCommand(name) => {
                format!("{} /{name}", catalog.text(Msg::UnknownCommand))
            },
            Self::ArgRequired => catalog.text(Msg::ArgRequired).into_owned(),
            Self::ArgsRequired(n) => catalog.format(Msg::ArgsRequired, n),
            Self::NoArgsAccepted => catalog.text(Msg::NoArgsRequired).into_owned(),
            Self::TooManyArgs(n) => catalog.format(Msg::ArgsExtra, n),
            Self::InvalidAction => catalog.text(Msg::InvalidAction).into_owned(),
            Self::InvalidArgument => catalog.text(Msg::InvalidArgument).into_owned(),
            Self::InvalidLiteral(kind) => catalog.text(kind.message()).into_owned(),
            Self::UnterminatedQuote => catalog.text(Msg::UnterminatedQuote).into_owned(),
            Self::Handler(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::DefaultCatalog;

    #[test]
    fn unknown_command_display() {
        let e = ChatError::UnknownCommand("bogus".into());
        assert_eq!(format!("{e}"), "Unknown command: /bogus");
    }

    #[test]
    fn args_required_display() {
        let e = ChatError::ArgsRequired(3);
        assert_eq!(format!("{e}"), "3 arguments required");
    }

    #[test]
    fn too_many_args_display() {
        let e = ChatError::TooManyArgs(1);
        assert_eq!(format!("{e}"), "Too many arguments, at most 1 accepted");
    }

    #[test]
    fn invalid_literal_display() {
        let e = ChatError::InvalidLiteral(LiteralKind::Tth);
        assert_eq!(format!("{e}"), "Invalid TTH");
    }

    #[test]
    fn render_matches_display_for_default_catalog() {
        let cat = DefaultCatalog;
        for e in [
            ChatError::UnknownCommand("x".into()),
            ChatError::ArgRequired,
            ChatError::ArgsRequired(2),
            ChatError::NoArgsAccepted,
            ChatError::TooManyArgs(4),
            ChatError::InvalidAction,
            ChatError::InvalidArgument,
            ChatError::UnterminatedQuote,
        ] {
            assert_eq!(e.render(&cat), e.to_string());
        }
    }

    #[test]
    fn render_slots_literal_uses_catalog_text() {
        let e = ChatError::InvalidLiteral(LiteralKind::SlotCount);
        assert_eq!(e.render(&DefaultCatalog), "Invalid number of slots");
    }

    #[test]
    fn handler_text_passes_through() {
        let e = ChatError::Handler("database unavailable".into());
        assert_eq!(e.render(&DefaultCatalog), "database unavailable");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: ChatError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn config_error_renders_display_text() {
        let e = ChatError::Config("chatcmd.toml: bad key".into());
        assert_eq!(e.render(&DefaultCatalog), "config error: chatcmd.toml: bad key");
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(ChatError::InvalidAction);
        assert!(r.is_err());
    }
}
