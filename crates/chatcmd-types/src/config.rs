//! Interpreter configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ChatError, Result};

/// How the shell-style tokenizer treats a quote that is never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePolicy {
    /// Reject the line with an "unterminated quote" error.
    #[default]
    Strict,
    /// Keep the quoted state to end of line and append the rest verbatim.
    Legacy,
}

/// Tunables for parsing, dispatch, and help rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Unterminated-quote handling for shell-style commands.
    pub quotes: QuotePolicy,
    /// First-argument keyword that makes an info command's reply public.
    pub public_keyword: String,
    /// Wrap aliases in `*` in help output.
    pub mark_aliases: bool,
    /// Template for `/ratio`; expands `%[ratio]`, `%[up]` and `%[down]`.
    pub ratio_message: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            quotes: QuotePolicy::Strict,
            public_keyword: "pub".to_string(),
            mark_aliases: false,
            ratio_message: "ratio: %[ratio] (uploaded: %[up] | downloaded: %[down])".to_string(),
        }
    }
}

/// Parse an interpreter config from TOML text. Missing keys take defaults.
pub fn parse_config(toml_str: &str) -> Result<InterpreterConfig> {
    toml::from_str(toml_str).map_err(|e| ChatError::Config(format!("chatcmd.toml: {e}")))
}

/// Read and parse an interpreter config file.
pub fn load_config(path: &Path) -> Result<InterpreterConfig> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    log::debug!("loaded interpreter config from {}", path.display());
    Ok(config)
}
