//! Chat frame handlers for the headless shell.
//!
//! The interpreter leaves window-level commands to its host. The shell
//! stands in for a hub window and handles the ones that make sense on a
//! terminal.

use chatcmd_terminal::{Command, CommandId, CommandRegistry, Environment, ParsedCommand, Reply};
use chatcmd_types::error::Result;

/// Register the shell's frame commands into a registry.
pub fn register_frame_commands(reg: &mut CommandRegistry, nick: &str) {
    reg.register(Box::new(SayCmd));
    reg.register(Box::new(MeCmd {
        nick: nick.to_string(),
    }));
    reg.register(Box::new(PrivateMessageCmd {
        nick: nick.to_string(),
    }));
    reg.register(Box::new(ClearCmd));
}

struct SayCmd;
impl Command for SayCmd {
    fn id(&self) -> CommandId {
        CommandId::Say
    }
    fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
        Ok(Reply::public(pc.arg(1).unwrap_or("")))
    }
}

struct MeCmd {
    nick: String,
}
impl Command for MeCmd {
    fn id(&self) -> CommandId {
        CommandId::Me
    }
    fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
        Ok(Reply::public(format!("* {} {}", self.nick, pc.arg(1).unwrap_or(""))))
    }
}

struct PrivateMessageCmd {
    nick: String,
}
impl Command for PrivateMessageCmd {
    fn id(&self) -> CommandId {
        CommandId::PrivateMessage
    }
    fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
        let to = pc.arg(1).unwrap_or("");
        let text = pc.arg(2).unwrap_or("");
        log::info!("private message to {to}");
        Ok(Reply::local(format!("<{}> -> {to}: {text}", self.nick)))
    }
}

struct ClearCmd;
impl Command for ClearCmd {
    fn id(&self) -> CommandId {
        CommandId::Clear
    }
    fn execute(&self, _pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
        Ok(Reply::no_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcmd_services::NullCore;
    use chatcmd_terminal::ReplyKind;
    use chatcmd_types::config::InterpreterConfig;
    use chatcmd_types::messages::DefaultCatalog;

    fn run(line: &str) -> Reply {
        let mut reg = CommandRegistry::new();
        register_frame_commands(&mut reg, "alice");
        let config = InterpreterConfig::default();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &NullCore,
        };
        reg.execute(line, &env).unwrap()
    }

    #[test]
    fn pm_splits_first_argument_only() {
        assert_eq!(
            run("/pm john hello   there  friend"),
            Reply::local("<alice> -> john: hello   there  friend")
        );
    }

    #[test]
    fn pm_without_message() {
        assert_eq!(run("/pm john"), Reply::error("2 arguments required"));
    }

    #[test]
    fn say_and_me_are_public() {
        assert_eq!(run("/say hi all"), Reply::public("hi all"));
        assert_eq!(run("/me waves"), Reply::public("* alice waves"));
    }

    #[test]
    fn clear_prints_nothing() {
        assert_eq!(run("/cls").kind, ReplyKind::NoText);
    }

    #[test]
    fn unregistered_frame_command_is_unknown() {
        assert_eq!(run("/join example.org"), Reply::error("Unknown command: /join"));
    }
}
