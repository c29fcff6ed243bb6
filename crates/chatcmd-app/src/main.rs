//! chatcmd headless shell.
//!
//! Reads chat lines from stdin and runs them through the command interpreter
//! against an in-memory client core. Lines that are not commands are echoed
//! as chat. `CHATCMD_CONFIG` names an interpreter config file,
//! `CHATCMD_NICK` the local nick, and `CHATCMD_JSON=1` switches replies to
//! one JSON object per line.

mod frame_commands;
mod output;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use chatcmd_services::MemoryCore;
use chatcmd_terminal::{CommandRegistry, Environment, Reply, register_builtins};
use chatcmd_types::config::{InterpreterConfig, load_config};
use chatcmd_types::messages::DefaultCatalog;

use frame_commands::register_frame_commands;
use output::render_reply;

/// Chat window id the shell reports for every line.
const SHELL_FRAME_ID: u64 = 1;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var_os("CHATCMD_CONFIG").map(PathBuf::from) {
        Some(path) => load_config(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => InterpreterConfig::default(),
    };
    let nick = std::env::var("CHATCMD_NICK").unwrap_or_else(|_| "chatcmd".to_string());
    let json = std::env::var("CHATCMD_JSON").is_ok_and(|v| v == "1");
    log::info!("Starting chatcmd shell as {nick} (quotes: {:?})", config.quotes);

    let core = MemoryCore::new();
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    register_frame_commands(&mut registry, &nick);

    let env = Environment {
        config: &config,
        catalog: &DefaultCatalog,
        core: &core,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let reply = registry
            .execute_in_frame(&line, SHELL_FRAME_ID, &env)
            .unwrap_or_else(|| Reply::public(line.clone()));
        if let Some(text) = render_reply(&reply, &nick, json)? {
            writeln!(stdout, "{text}")?;
        }
    }
    log::info!("stdin closed, exiting");
    Ok(())
}
