//! Debugging commands: disable, bloom, http, unknowntags, addtree, divide.

use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::to_int;
use chatcmd_types::messages::Msg;

use crate::actions::{BloomAction, DisableAction, HttpAction, resolve};
use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

pub fn register_dev_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(DisableCmd));
    reg.register(Box::new(BloomCmd));
    reg.register(Box::new(HttpCmd));
    reg.register(Box::new(UnknownTagsCmd));
    reg.register(Box::new(AddTreeCmd));
    reg.register(Box::new(DivideCmd));
}

// ---------------------------------------------------------------------------
// disable
// ---------------------------------------------------------------------------

struct DisableCmd;
impl Command for DisableCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugDisable
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        match resolve::<DisableAction>(pc) {
            Some(DisableAction::Partial) => {
                let disabled = env.diagnostics()?.toggle_partial_list_uploads();
                Ok(Reply::local(format!("Partial list uploads disabled: {disabled}")))
            },
            None => Err(ChatError::InvalidAction),
        }
    }
}

// ---------------------------------------------------------------------------
// bloom
// ---------------------------------------------------------------------------

struct BloomCmd;
impl Command for BloomCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugBloom
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let action = resolve::<BloomAction>(pc).ok_or(ChatError::InvalidAction)?;
        let share = env.share()?;
        let text = match action {
            BloomAction::Info => {
                let info = share.bloom_info();
                let pct = if info.size == 0 {
                    0.0
                } else {
                    info.used as f64 * 100.0 / info.size as f64
                };
                format!("Size: {}, used: {} ({pct:.2}%)", info.size, info.used)
            },
            BloomAction::Match => {
                let text = pc.arg(2).ok_or(ChatError::ArgsRequired(2))?.to_lowercase();
                let verdict = if share.match_bloom(&text) {
                    "Match found"
                } else {
                    "No match"
                };
                format!("{text}: {verdict}")
            },
        };
        Ok(Reply::local(text))
    }
}

// ---------------------------------------------------------------------------
// http
// ---------------------------------------------------------------------------

struct HttpCmd;
impl Command for HttpCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugHttp
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        match resolve::<HttpAction>(pc) {
            Some(HttpAction::Get) => {
                let url = pc.arg(2).ok_or(ChatError::ArgsRequired(2))?;
                let text = match env.network()?.start_http_request(url, pc.frame_id) {
                    Some(id) => {
                        log::info!("http request {id} for {url}");
                        env.format(Msg::HttpRequestStarted, &id)
                    },
                    None => env.text(Msg::HttpRequestFailed),
                };
                Ok(Reply::local(text))
            },
            // Recognised keyword with no client-side implementation.
            Some(HttpAction::Post) | None => Err(ChatError::InvalidAction),
        }
    }
}

// ---------------------------------------------------------------------------
// unknowntags
// ---------------------------------------------------------------------------

struct UnknownTagsCmd;
impl Command for UnknownTagsCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugUnknownTags
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let tags = env.diagnostics()?.unknown_tags();
        if tags.is_empty() {
            return Ok(Reply::local(env.text(Msg::EmptyList)));
        }
        Ok(Reply::local(format!("Dumping collected tags\n{tags}")))
    }
}

// ---------------------------------------------------------------------------
// addtree
// ---------------------------------------------------------------------------

struct AddTreeCmd;
impl Command for AddTreeCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugAddTree
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let path = pc.arg(1).ok_or(ChatError::ArgRequired)?;
        let db = env.hash_db()?;
        let tree = db.hash_file(path).map_err(|e| {
            log::debug!("hashing {path} failed: {e}");
            ChatError::Handler(env.text(Msg::TthError))
        })?;
        db.add_tree(&tree).map_err(|e| {
            log::warn!("storing tree for {path} failed: {e}");
            ChatError::Handler("Unable to add tree".to_string())
        })?;
        Ok(Reply::local(env.format(Msg::TthAdded, &tree.root)))
    }
}

// ---------------------------------------------------------------------------
// divide
// ---------------------------------------------------------------------------

struct DivideCmd;
impl Command for DivideCmd {
    fn id(&self) -> CommandId {
        CommandId::DebugDivide
    }
    fn execute(&self, pc: &ParsedCommand, _env: &Environment<'_>) -> Result<Reply> {
        let a = to_int(pc.arg(1).unwrap_or(""));
        let b = to_int(pc.arg(2).unwrap_or(""));
        let r = a.checked_div(b).ok_or(ChatError::InvalidArgument)?;
        Ok(Reply::local(format!("Your answer is {r}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use chatcmd_services::MemoryCore;
    use chatcmd_types::literal::{HASH_BYTES, Tth};

    #[test]
    fn disable_partial_toggles() {
        let core = MemoryCore::new();
        assert_eq!(
            run(&core, "/disable partial"),
            Reply::local("Partial list uploads disabled: true")
        );
        assert_eq!(
            run(&core, "/disable Partial"),
            Reply::local("Partial list uploads disabled: false")
        );
        assert_eq!(run(&core, "/disable full"), Reply::error("Invalid action"));
    }

    #[test]
    fn bloom_info_percentage() {
        let core = MemoryCore::new()
            .with_shared_file("/s/a", Tth([1; HASH_BYTES]), 1)
            .with_shared_file("/s/b", Tth([2; HASH_BYTES]), 1);
        assert_eq!(
            run(&core, "/bloom info"),
            Reply::local("Size: 1024, used: 2 (0.20%)")
        );
    }

    #[test]
    fn bloom_match_lowercases() {
        let core = MemoryCore::new().with_shared_file("/share/holiday.jpg", Tth([1; HASH_BYTES]), 1);
        assert_eq!(
            run(&core, "/bloom match HOLIDAY"),
            Reply::local("holiday: Match found")
        );
        assert_eq!(run(&core, "/bloom match beach"), Reply::local("beach: No match"));
        assert_eq!(run(&core, "/bloom match"), Reply::error("2 arguments required"));
    }

    #[test]
    fn http_get_forwards_frame() {
        let core = MemoryCore::new();
        let reply = crate::testing::run_in_frame(&core, "/http get http://example.org/", 42);
        assert_eq!(reply, Reply::local("HTTP request 1 started"));
        assert_eq!(core.calls(), vec!["network.http_get http://example.org/ frame=42"]);
    }

    #[test]
    fn http_failures() {
        let core = MemoryCore::new();
        assert_eq!(
            run(&core, "/http get ftp://example.org/"),
            Reply::local("Unable to start HTTP request")
        );
        assert_eq!(run(&core, "/http post http://x/"), Reply::error("Invalid action"));
        assert_eq!(run(&core, "/http"), Reply::error("2 arguments required"));
    }

    #[test]
    fn unknown_tags() {
        assert_eq!(run(&MemoryCore::new(), "/unknowntags"), Reply::local("List is empty"));
        let core = MemoryCore::new().with_unknown_tags("XY=1\n");
        assert_eq!(
            run(&core, "/unknowntags"),
            Reply::local("Dumping collected tags\nXY=1\n")
        );
    }

    #[test]
    fn addtree_hashes_and_stores() {
        let tth = Tth([8; HASH_BYTES]);
        let core = MemoryCore::new().with_disk_file("/tmp/x.bin", tth, 77);
        assert_eq!(
            run(&core, "/addtree /tmp/x.bin"),
            Reply::local(format!("TTH {tth} added to the database"))
        );
        assert!(core.has_tree(&tth));
        assert_eq!(run(&core, "/addtree /tmp/none"), Reply::error("Unable to compute TTH"));
    }

    #[test]
    fn addtree_database_failure() {
        let core = MemoryCore::new()
            .with_disk_file("/tmp/x.bin", Tth([8; HASH_BYTES]), 77)
            .with_hash_db_offline();
        assert_eq!(run(&core, "/addtree /tmp/x.bin"), Reply::error("Unable to add tree"));
    }

    #[test]
    fn divide() {
        let core = MemoryCore::new();
        assert_eq!(run(&core, "/divide 17 5"), Reply::local("Your answer is 3"));
        assert_eq!(run(&core, "/divide -9 3"), Reply::local("Your answer is -3"));
        assert_eq!(run(&core, "/divide 1 0"), Reply::error("Invalid argument"));
        assert_eq!(run(&core, "/divide 1"), Reply::error("2 arguments required"));
    }
}
