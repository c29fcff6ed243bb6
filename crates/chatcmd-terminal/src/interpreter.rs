//! Command trait, registry, and dispatch logic.
//!
//! A line goes through the tokenizer, the name index, the catalog's arity
//! check, and finally the handler registered for its [`CommandId`]. Every
//! failure along the way becomes an error [`Reply`]; nothing escapes
//! [`CommandRegistry::dispatch`] as an `Err`.

use std::collections::HashMap;

use chatcmd_services::{
    ConnectionService, Core, DhtService, DiagnosticsService, GeoIpService, HashDatabase,
    IpBanService, NetworkService, QueueService, SettingsService, ShareService, SystemInfoService,
    UserService,
};
use chatcmd_types::config::InterpreterConfig;
use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::messages::{MessageCatalog, Msg};

use crate::catalog::CommandId;
use crate::parser::{ParsedCommand, parse_command};
use crate::validate::check_arguments;

/// How the caller should present a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Shown only to the invoking user.
    LocalText,
    /// Eligible for broadcast to the chat.
    PublicText,
    /// Shown locally in error style.
    ErrorMessage,
    /// Succeeded; nothing to show.
    NoText,
}

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

impl Reply {
    pub fn local(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::LocalText,
        }
    }

    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::PublicText,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::ErrorMessage,
        }
    }

    pub fn no_text() -> Self {
        Self {
            text: String::new(),
            kind: ReplyKind::NoText,
        }
    }

    /// Public if `public`, otherwise local.
    pub fn visible(text: impl Into<String>, public: bool) -> Self {
        if public {
            Self::public(text)
        } else {
            Self::local(text)
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ReplyKind::ErrorMessage
    }
}

/// Everything a handler may read: configuration, message text, and the
/// client subsystems.
pub struct Environment<'a> {
    pub config: &'a InterpreterConfig,
    pub catalog: &'a dyn MessageCatalog,
    pub core: &'a dyn Core,
}

impl<'a> Environment<'a> {
    /// Catalog text for `key`.
    pub fn text(&self, key: Msg) -> String {
        self.catalog.text(key).into_owned()
    }

    /// Catalog text for `key` with `{0}` replaced.
    pub fn format(&self, key: Msg, arg: &dyn std::fmt::Display) -> String {
        self.catalog.format(key, arg)
    }

    /// Whether `args[1]` asks for a public reply.
    pub fn is_public(&self, pc: &ParsedCommand) -> bool {
        pc.arg(1)
            .is_some_and(|a| a.eq_ignore_ascii_case(&self.config.public_keyword))
    }

    fn unavailable(&self, what: &str) -> ChatError {
        ChatError::Handler(self.format(Msg::ServiceUnavailable, &what))
    }

    // -- Subsystem access; absent subsystems become handler errors --

    pub fn share(&self) -> Result<&'a dyn ShareService> {
        self.core.share().ok_or_else(|| self.unavailable("Share manager"))
    }

    pub fn hash_db(&self) -> Result<&'a dyn HashDatabase> {
        self.core.hash_db().ok_or_else(|| self.unavailable("Hash database"))
    }

    pub fn queue(&self) -> Result<&'a dyn QueueService> {
        self.core.queue().ok_or_else(|| self.unavailable("Download queue"))
    }

    pub fn dht(&self) -> Result<&'a dyn DhtService> {
        self.core.dht().ok_or_else(|| self.unavailable("DHT"))
    }

    pub fn connections(&self) -> Result<&'a dyn ConnectionService> {
        self.core
            .connections()
            .ok_or_else(|| self.unavailable("Connection manager"))
    }

    pub fn ip_bans(&self) -> Result<&'a dyn IpBanService> {
        self.core.ip_bans().ok_or_else(|| self.unavailable("IP ban list"))
    }

    pub fn users(&self) -> Result<&'a dyn UserService> {
        self.core.users().ok_or_else(|| self.unavailable("User manager"))
    }

    pub fn settings(&self) -> Result<&'a dyn SettingsService> {
        self.core.settings().ok_or_else(|| self.unavailable("Settings"))
    }

    pub fn system(&self) -> Result<&'a dyn SystemInfoService> {
        self.core
            .system()
            .ok_or_else(|| self.unavailable("System information"))
    }

    pub fn geoip(&self) -> Result<&'a dyn GeoIpService> {
        self.core.geoip().ok_or_else(|| self.unavailable("Geo-IP database"))
    }

    pub fn network(&self) -> Result<&'a dyn NetworkService> {
        self.core.network().ok_or_else(|| self.unavailable("Network"))
    }

    pub fn diagnostics(&self) -> Result<&'a dyn DiagnosticsService> {
        self.core
            .diagnostics()
            .ok_or_else(|| self.unavailable("Diagnostics"))
    }
}

/// A handler for one command identifier.
pub trait Command {
    /// The command this handler serves.
    fn id(&self) -> CommandId;

    /// Run an arity-checked command.
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply>;
}

/// Handlers keyed by command identifier.
pub struct CommandRegistry {
    commands: HashMap<CommandId, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a handler. Replaces any existing handler for the same id.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.id(), cmd);
    }

    pub fn is_registered(&self, id: CommandId) -> bool {
        self.commands.contains_key(&id)
    }

    /// Validate and run a parsed command.
    pub fn dispatch(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Reply {
        match self.try_dispatch(pc, env) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("/{}: {e}", pc.name());
                Reply::error(e.render(env.catalog))
            },
        }
    }

    fn try_dispatch(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let unknown = || ChatError::UnknownCommand(pc.name().to_string());
        let id = pc.command.ok_or_else(unknown)?;
        check_arguments(pc, id.descriptor())?;
        let cmd = self.commands.get(&id).ok_or_else(unknown)?;
        log::debug!("dispatching {id:?} (frame {})", pc.frame_id);
        cmd.execute(pc, env)
    }

    /// Parse and run a chat line. Returns `None` if the line is not a command.
    pub fn execute(&self, line: &str, env: &Environment<'_>) -> Option<Reply> {
        self.execute_in_frame(line, 0, env)
    }

    /// Like [`execute`](Self::execute), tagging the command with the chat
    /// window it came from.
    pub fn execute_in_frame(
        &self,
        line: &str,
        frame_id: u64,
        env: &Environment<'_>,
    ) -> Option<Reply> {
        match parse_command(line, env.config.quotes) {
            Ok(Some(pc)) => Some(self.dispatch(&pc.with_frame_id(frame_id), env)),
            Ok(None) => None,
            Err(e) => {
                log::warn!("rejected line: {e}");
                Some(Reply::error(e.render(env.catalog)))
            },
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcmd_services::{MemoryCore, NullCore};
    use chatcmd_types::messages::DefaultCatalog;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Echo {
        id: CommandId,
        calls: Rc<Cell<usize>>,
    }

    impl Command for Echo {
        fn id(&self) -> CommandId {
            self.id
        }
        fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
            self.calls.set(self.calls.get() + 1);
            Ok(Reply::local(pc.args[1..].join("|")))
        }
    }

    struct Failing;

    impl Command for Failing {
        fn id(&self) -> CommandId {
            CommandId::InfoDb
        }
        fn execute(&self, _pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
            Err(ChatError::Handler("database unavailable".into()))
        }
    }

    fn run(reg: &CommandRegistry, line: &str) -> Reply {
        let config = InterpreterConfig::default();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &NullCore,
        };
        reg.execute(line, &env).unwrap()
    }

    fn echo_registry(id: CommandId) -> (CommandRegistry, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Echo {
            id,
            calls: Rc::clone(&calls),
        }));
        (reg, calls)
    }

    #[test]
    fn dispatches_to_registered_handler() {
        let (reg, calls) = echo_registry(CommandId::Dht);
        let reply = run(&reg, "/dht find abc");
        assert_eq!(reply, Reply::local("find|abc"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn arity_error_skips_handler() {
        let (reg, calls) = echo_registry(CommandId::SetSlots);
        let reply = run(&reg, "/slots 1 2");
        assert!(reply.is_error());
        assert_eq!(reply.text, "Too many arguments, at most 1 accepted");
        let reply = run(&reg, "/slots");
        assert_eq!(reply.text, "Argument required");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unknown_name_reports_typed_name() {
        let reg = CommandRegistry::new();
        let reply = run(&reg, "/Bogus stuff");
        assert_eq!(reply, Reply::error("Unknown command: /bogus"));
    }

    #[test]
    fn known_name_without_handler_is_unknown() {
        let reg = CommandRegistry::new();
        let reply = run(&reg, "/pm john hi");
        assert_eq!(reply, Reply::error("Unknown command: /pm"));
    }

    #[test]
    fn handler_error_text_passes_through() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Failing));
        assert_eq!(run(&reg, "/dbinfo"), Reply::error("database unavailable"));
    }

    #[test]
    fn non_command_is_none() {
        let reg = CommandRegistry::new();
        let config = InterpreterConfig::default();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &NullCore,
        };
        assert_eq!(reg.execute("hello there", &env), None);
    }

    #[test]
    fn unterminated_quote_is_error_reply() {
        let (reg, calls) = echo_registry(CommandId::Tth);
        let reply = run(&reg, r#"/tth info "abc"#);
        assert_eq!(reply, Reply::error("Unterminated quote"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn frame_id_reaches_handler() {
        struct Frame;
        impl Command for Frame {
            fn id(&self) -> CommandId {
                CommandId::Help
            }
            fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
                Ok(Reply::local(pc.frame_id.to_string()))
            }
        }
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Frame));
        let config = InterpreterConfig::default();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &NullCore,
        };
        assert_eq!(reg.execute_in_frame("/help", 42, &env).unwrap().text, "42");
    }

    #[test]
    fn register_replaces_existing() {
        let (mut reg, first) = echo_registry(CommandId::Dht);
        let second = Rc::new(Cell::new(0));
        reg.register(Box::new(Echo {
            id: CommandId::Dht,
            calls: Rc::clone(&second),
        }));
        run(&reg, "/dht info");
        assert_eq!((first.get(), second.get()), (0, 1));
    }

    #[test]
    fn is_public_uses_configured_keyword() {
        let mut config = InterpreterConfig::default();
        let core = MemoryCore::new();
        let pc = parse_command("/version PUB", config.quotes).unwrap().unwrap();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &core,
        };
        assert!(env.is_public(&pc));

        config.public_keyword = "all".into();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &core,
        };
        assert!(!env.is_public(&pc));
    }

    #[test]
    fn missing_subsystem_is_handler_error() {
        let config = InterpreterConfig::default();
        let env = Environment {
            config: &config,
            catalog: &DefaultCatalog,
            core: &NullCore,
        };
        let err = env.dht().err().unwrap();
        assert_eq!(err.render(&DefaultCatalog), "DHT is not available");
    }
}
