//! Tokenizer: turns a chat line into a [`ParsedCommand`].

use chatcmd_types::config::QuotePolicy;
use chatcmd_types::error::{ChatError, Result};

use crate::catalog::{CommandId, ContextFlags};
use crate::names;

/// Prefix that marks a chat line as a command.
pub const COMMAND_PREFIX: char = '/';

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// `None` when the name is not in the name index.
    pub command: Option<CommandId>,
    /// `args[0]` is the lowercased name as typed; the rest are arguments.
    pub args: Vec<String>,
    /// Chat window the line came from; 0 when unknown.
    pub frame_id: u64,
}

impl ParsedCommand {
    /// The command name as typed, lowercased.
    pub fn name(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }

    /// Argument count, command name excluded.
    pub fn arg_count(&self) -> usize {
        self.args.len().saturating_sub(1)
    }

    /// Argument `i`, counting the command name as 0.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn with_frame_id(mut self, frame_id: u64) -> Self {
        self.frame_id = frame_id;
        self
    }
}

/// Command-line whitespace: space, tab, CR and LF.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn trim(s: &str) -> &str {
    s.trim_matches(is_whitespace)
}

/// Parse a chat line.
///
/// Returns `Ok(None)` if the line is not a command at all. An unrecognized
/// name yields a command of `None` with `args[0]` set to the typed name.
/// Shell-style splitting fails on an unterminated quote under
/// [`QuotePolicy::Strict`].
pub fn parse_command(line: &str, quotes: QuotePolicy) -> Result<Option<ParsedCommand>> {
    let Some(rest) = line.trim_start_matches(is_whitespace).strip_prefix(COMMAND_PREFIX) else {
        return Ok(None);
    };
    let (name, raw) = match rest.find(is_whitespace) {
        Some(i) => (&rest[..i], trim(&rest[i + 1..])),
        None => (rest, ""),
    };
    let name = name.to_lowercase();

    let Some(id) = names::lookup(&name) else {
        log::debug!("unrecognized command name {name:?}");
        return Ok(Some(ParsedCommand {
            command: None,
            args: vec![name],
            frame_id: 0,
        }));
    };

    let mut args = vec![name];
    if !raw.is_empty() {
        let flags = id.descriptor().flags;
        if flags.contains(ContextFlags::GET_FIRST_ARG) {
            split_first(raw, &mut args);
        } else if flags.contains(ContextFlags::SPLIT_ARGS) {
            args.extend(split_shell(raw, quotes)?);
        } else {
            args.push(raw.to_string());
        }
    }
    log::debug!("parsed {id:?} with {} argument(s)", args.len() - 1);
    Ok(Some(ParsedCommand {
        command: Some(id),
        args,
        frame_id: 0,
    }))
}

/// First-argument mode: one short token, then the trimmed remainder.
fn split_first(raw: &str, args: &mut Vec<String>) {
    match raw.find(is_whitespace) {
        Some(i) => {
            args.push(raw[..i].to_string());
            let tail = trim(&raw[i + 1..]);
            if !tail.is_empty() {
                args.push(tail.to_string());
            }
        },
        None => args.push(raw.to_string()),
    }
}

/// Shell-style mode: whitespace-separated tokens; `"` toggles a quoted run
/// and is dropped from the output. Empty tokens are discarded.
pub fn split_shell(raw: &str, quotes: QuotePolicy) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in raw.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if !quoted && is_whitespace(c) => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            c => current.push(c),
        }
    }

    if quoted && quotes == QuotePolicy::Strict {
        return Err(ChatError::UnterminatedQuote);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
