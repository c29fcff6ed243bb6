//! Arity validation against the command catalog.

use chatcmd_types::error::{ChatError, Result};

use crate::catalog::CommandDescriptor;
use crate::parser::ParsedCommand;

/// Check the argument count of `pc` against `desc`. Pure.
pub fn check_arguments(pc: &ParsedCommand, desc: &CommandDescriptor) -> Result<()> {
    let count = pc.arg_count();
    if count < desc.min_args {
        return Err(if desc.min_args > 1 {
            ChatError::ArgsRequired(desc.min_args)
        } else {
            ChatError::ArgRequired
        });
    }
    if count > desc.max_args {
        return Err(if desc.max_args == 0 {
            ChatError::NoArgsAccepted
        } else {
            ChatError::TooManyArgs(desc.max_args)
        });
    }
    Ok(())
}
