//! `/tth info | addtree | rmtree`.

use std::fmt::Write as _;

use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::{Tth, to_int};
use chatcmd_types::messages::Msg;

use crate::actions::{TthAction, resolve};
use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

pub fn register_tth_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(TthCmd));
}

struct TthCmd;
impl Command for TthCmd {
    fn id(&self) -> CommandId {
        CommandId::Tth
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        match resolve::<TthAction>(pc).ok_or(ChatError::InvalidAction)? {
            TthAction::Info => info(pc, env),
            TthAction::AddTree => add_tree(pc, env),
            TthAction::RmTree => remove_tree(pc, env),
        }
    }
}

fn parse_tth(pc: &ParsedCommand) -> Result<Tth> {
    pc.arg(2).ok_or(ChatError::ArgsRequired(2))?.parse()
}

fn info(pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
    let tth = parse_tth(pc)?;
    let mut text = format!("TTH {tth}: ");

    // A failed lookup reads the same as a miss.
    let entry = env.hash_db()?.file_info(&tth).unwrap_or_else(|e| {
        log::debug!("hash database lookup for {tth} failed: {e}");
        None
    });
    match entry {
        Some(entry) => {
            let _ = write!(text, "found in database, flags={}", entry.flags);
            if let Some(path) = &entry.path {
                let _ = write!(text, ", path={path}");
            }
            let _ = writeln!(text, ", tree size={}", entry.tree_size);
        },
        None => text.push_str("not found in database\n"),
    }

    let _ = write!(text, "TTH {tth}: ");
    match env.share()?.file_info(&tth) {
        Some(file) => {
            let _ = writeln!(text, "found in share, path={}, size={}", file.path, file.size);
        },
        None => text.push_str("not found in share\n"),
    }
    Ok(Reply::local(text))
}

fn add_tree(pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
    let (Some(path), Some(size)) = (pc.arg(2), pc.arg(3)) else {
        return Err(ChatError::ArgsRequired(3));
    };
    let size = u64::try_from(to_int(size)).unwrap_or(0);
    let tree = env.hash_db()?.load_tree(path, size)?;
    log::info!("tree {} loaded from {path}", tree.root);
    Ok(Reply::local(env.format(Msg::TthAdded, &tree.root)))
}

fn remove_tree(pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
    let tth = parse_tth(pc)?;
    if env.hash_db()?.remove_tree(&tth)? {
        log::info!("tree {tth} removed");
        Ok(Reply::local(env.text(Msg::Done)))
    } else {
        Ok(Reply::local(format!("TTH {tth}: not found in database")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use chatcmd_services::{HashEntry, MemoryCore};
    use chatcmd_types::literal::HASH_BYTES;

    fn sample() -> Tth {
        Tth([0x5a; HASH_BYTES])
    }

    #[test]
    fn info_all_zero_hash_is_accepted() {
        let zero = "A".repeat(39);
        let reply = run(&MemoryCore::new(), &format!("/tth info {zero}"));
        assert_eq!(
            reply,
            Reply::local(format!(
                "TTH {zero}: not found in database\nTTH {zero}: not found in share\n"
            ))
        );
    }

    #[test]
    fn info_rejects_wrong_length() {
        let core = MemoryCore::new();
        assert_eq!(
            run(&core, &format!("/tth info {}", "A".repeat(38))),
            Reply::error("Invalid TTH")
        );
        assert_eq!(
            run(&core, &format!("/tth info {}", "A".repeat(40))),
            Reply::error("Invalid TTH")
        );
        assert_eq!(run(&core, "/tth info"), Reply::error("2 arguments required"));
    }

    #[test]
    fn info_found_everywhere() {
        let tth = sample();
        let core = MemoryCore::new()
            .with_tree(
                tth,
                HashEntry {
                    flags: 3,
                    path: Some("/share/a.iso".into()),
                    tree_size: 4096,
                },
            )
            .with_shared_file("/share/a.iso", tth, 4096);
        let text = run(&core, &format!("/tth info {tth}")).text;
        assert_eq!(
            text,
            format!(
                "TTH {tth}: found in database, flags=3, path=/share/a.iso, tree size=4096\n\
                 TTH {tth}: found in share, path=/share/a.iso, size=4096\n"
            )
        );
    }

    #[test]
    fn info_database_failure_reads_as_miss() {
        let core = MemoryCore::new().with_hash_db_offline();
        let text = run(&core, &format!("/tth info {}", sample())).text;
        assert!(text.contains("not found in database"));
    }

    #[test]
    fn addtree_loads_and_stores() {
        let tth = sample();
        let core = MemoryCore::new().with_disk_file("/tmp/a.dat", tth, 10);
        assert_eq!(
            run(&core, "/tth addtree /tmp/a.dat 100"),
            Reply::local(format!("TTH {tth} added to the database"))
        );
        assert!(core.has_tree(&tth));
    }

    #[test]
    fn addtree_errors() {
        let core = MemoryCore::new().with_disk_file("/tmp/a.dat", sample(), 10);
        assert_eq!(run(&core, "/tth addtree /tmp/a.dat"), Reply::error("3 arguments required"));
        assert_eq!(run(&core, "/tth addtree /tmp/a.dat x"), Reply::error("Invalid file size"));
        assert_eq!(
            run(&core, "/tth addtree /tmp/b.dat 5"),
            Reply::error("File not found: /tmp/b.dat")
        );
    }

    #[test]
    fn rmtree() {
        let tth = sample();
        let core = MemoryCore::new().with_tree(
            tth,
            HashEntry {
                flags: 0,
                path: None,
                tree_size: 1,
            },
        );
        assert_eq!(run(&core, &format!("/tth rmtree {tth}")), Reply::local("Done"));
        assert!(!core.has_tree(&tth));
        assert_eq!(
            run(&core, &format!("/tth rmtree {tth}")),
            Reply::local(format!("TTH {tth}: not found in database"))
        );
    }

    #[test]
    fn unknown_action() {
        assert_eq!(run(&MemoryCore::new(), "/tth hash x"), Reply::error("Invalid action"));
    }
}
