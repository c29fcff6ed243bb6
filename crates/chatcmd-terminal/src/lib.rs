//! Chat command interpreter.
//!
//! A line starting with `/` is tokenized against the command catalog,
//! arity-checked, and dispatched through a registry keyed by command
//! identifier. Handlers reach the client only through the service traits of
//! `chatcmd-services`, so the interpreter itself never touches hashing, the
//! database or the DHT.

pub mod actions;
pub mod catalog;
mod commands;
mod dev_commands;
mod dht_commands;
mod help;
mod info_commands;
mod interpreter;
pub mod names;
mod net_commands;
pub mod parser;
mod tth_commands;
mod user_commands;
pub mod validate;

/// Register the built-in handlers (and every family below) into a registry.
pub use commands::register_builtins;
/// Register the debugging commands (disable, bloom, http, ...) into a registry.
pub use dev_commands::register_dev_commands;
/// Register `/dht` into a registry.
pub use dht_commands::register_dht_commands;
/// Register the client information commands into a registry.
pub use info_commands::register_info_commands;
/// Register network and connection commands into a registry.
pub use net_commands::register_net_commands;
/// Register `/tth` into a registry.
pub use tth_commands::register_tth_commands;
/// Register `/user` into a registry.
pub use user_commands::register_user_commands;

pub use catalog::{CommandDescriptor, CommandId, ContextFlags};
pub use help::{build_help, help_text};
/// A handler for one command identifier.
pub use interpreter::Command;
/// Registry of handlers with parse-validate-dispatch.
pub use interpreter::CommandRegistry;
/// Read-only context passed to every handler.
pub use interpreter::Environment;
pub use interpreter::{Reply, ReplyKind};
pub use parser::{ParsedCommand, parse_command};

#[cfg(test)]
mod testing {
    use chatcmd_services::Core;
    use chatcmd_types::config::InterpreterConfig;
    use chatcmd_types::messages::DefaultCatalog;

    use crate::{CommandRegistry, Environment, Reply, register_builtins};

    pub(crate) fn run_in_frame_with(
        core: &dyn Core,
        config: &InterpreterConfig,
        line: &str,
        frame_id: u64,
    ) -> Reply {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        let env = Environment {
            config,
            catalog: &DefaultCatalog,
            core,
        };
        reg.execute_in_frame(line, frame_id, &env)
            .expect("test line should be a command")
    }

    pub(crate) fn run_with(core: &dyn Core, config: &InterpreterConfig, line: &str) -> Reply {
        run_in_frame_with(core, config, line, 0)
    }

    pub(crate) fn run_in_frame(core: &dyn Core, line: &str, frame_id: u64) -> Reply {
        run_in_frame_with(core, &InterpreterConfig::default(), line, frame_id)
    }

    pub(crate) fn run(core: &dyn Core, line: &str) -> Reply {
        run_with(core, &InterpreterConfig::default(), line)
    }
}
