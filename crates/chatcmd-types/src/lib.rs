//! Foundation types for chatcmd.
//!
//! This crate holds the pieces shared by every chatcmd crate: the error
//! taxonomy, message catalog keys, interpreter configuration, and the typed
//! literals (hashes, client ids, addresses) that command arguments parse into.

pub mod config;
pub mod error;
pub mod literal;
pub mod messages;
