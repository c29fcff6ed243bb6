//! Built-in commands: help, share and queue upkeep, and settings.

use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::{LiteralKind, to_int};
use chatcmd_types::messages::Msg;

use crate::catalog::CommandId;
use crate::help::help_text;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

/// Register every built-in handler into a registry.
///
/// Frame commands (clear, join, pm, say, ...) are left to the host window.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(RefreshCmd));
    reg.register(Box::new(MakeFileListCmd));
    reg.register(Box::new(ShareFileCmd));
    reg.register(Box::new(SaveQueueCmd));
    reg.register(Box::new(FlushStatsCmd));
    reg.register(Box::new(IgnoreListCmd));
    reg.register(Box::new(GrantsCmd));
    reg.register(Box::new(SlotsCmd));
    reg.register(Box::new(ExtraSlotsCmd));
    reg.register(Box::new(SmallFileSizeCmd));
    reg.register(Box::new(AwayCmd));
    reg.register(Box::new(LimitCmd));
    crate::register_info_commands(reg);
    crate::register_net_commands(reg);
    crate::register_dht_commands(reg);
    crate::register_tth_commands(reg);
    crate::register_user_commands(reg);
    crate::register_dev_commands(reg);
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn id(&self) -> CommandId {
        CommandId::Help
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let mut text = env.text(Msg::AvailableCommands);
        text.push('\n');
        text.push_str(&help_text(env.catalog, env.config.mark_aliases));
        Ok(Reply::local(text))
    }
}

// ---------------------------------------------------------------------------
// refresh / makefilelist
// ---------------------------------------------------------------------------

struct RefreshCmd;
impl Command for RefreshCmd {
    fn id(&self) -> CommandId {
        CommandId::RefreshShare
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        env.share()?.refresh()?;
        log::info!("share refresh started");
        Ok(Reply::local(env.text(Msg::RefreshingShare)))
    }
}

struct MakeFileListCmd;
impl Command for MakeFileListCmd {
    fn id(&self) -> CommandId {
        CommandId::MakeFileList
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        env.share()?.generate_file_list()?;
        Ok(Reply::local(env.text(Msg::Done)))
    }
}

// ---------------------------------------------------------------------------
// sharefile
// ---------------------------------------------------------------------------

struct ShareFileCmd;
impl Command for ShareFileCmd {
    fn id(&self) -> CommandId {
        CommandId::ShareFile
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let path = pc.arg(1).ok_or(ChatError::ArgRequired)?;
        let share = env.share()?;
        let (dir, file_name) = split_path(path);
        if !share.is_directory_shared(dir) {
            return Err(ChatError::Handler(env.text(Msg::DirectoryNotShared)));
        }
        let hash_db = env.hash_db()?;
        let tree = hash_db.hash_file(path).map_err(|e| {
            log::debug!("hashing {path} failed: {e}");
            ChatError::Handler(env.text(Msg::TthError))
        })?;
        share.add_file(path, &tree.root, tree.file_size)?;
        if let Err(e) = hash_db.add_tree(&tree) {
            log::warn!("file shared but tree not stored: {e}");
        }
        log::info!("shared {path} as {}", tree.root);
        let magnet = magnet_link(&tree.root.to_base32(), file_name, tree.file_size);
        Ok(Reply::local(env.format(Msg::FileShared, &magnet)))
    }
}

/// Split a path into its directory (separator included) and file name.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind(['/', '\\']) {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    }
}

fn magnet_link(tth: &str, file_name: &str, size: u64) -> String {
    let mut name = String::with_capacity(file_name.len());
    for b in file_name.bytes() {
        match b {
            b' ' => name.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                name.push(b as char)
            },
            _ => name.push_str(&format!("%{b:02X}")),
        }
    }
    format!("magnet:?xt=urn:tree:tiger:{tth}&xl={size}&dn={name}")
}

// ---------------------------------------------------------------------------
// savequeue / flushdb
// ---------------------------------------------------------------------------

struct SaveQueueCmd;
impl Command for SaveQueueCmd {
    fn id(&self) -> CommandId {
        CommandId::SaveQueue
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        env.queue()?.save()?;
        Ok(Reply::local(env.text(Msg::QueueSaved)))
    }
}

struct FlushStatsCmd;
impl Command for FlushStatsCmd {
    fn id(&self) -> CommandId {
        CommandId::FlushStats
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        env.users()?.flush_ratio();
        Ok(Reply::local(env.text(Msg::Done)))
    }
}

// ---------------------------------------------------------------------------
// ignorelist / grants
// ---------------------------------------------------------------------------

struct IgnoreListCmd;
impl Command for IgnoreListCmd {
    fn id(&self) -> CommandId {
        CommandId::ShowIgnoreList
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let list = env.users()?.ignore_list();
        if list.is_empty() {
            return Ok(Reply::local(env.text(Msg::EmptyList)));
        }
        Ok(Reply::local(format!(
            "{}: {}",
            env.text(Msg::IgnoredUsers),
            list.join(", ")
        )))
    }
}

struct GrantsCmd;
impl Command for GrantsCmd {
    fn id(&self) -> CommandId {
        CommandId::ShowExtraSlots
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let slots = env.users()?.reserved_slots();
        if slots.is_empty() {
            return Ok(Reply::local(env.text(Msg::EmptyList)));
        }
        let lines: Vec<String> = slots
            .iter()
            .map(|s| format!("{}/{} timeout: {}", s.nick, s.cid, s.seconds_left))
            .collect();
        Ok(Reply::local(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// slots / extraslots / smallfilesize
// ---------------------------------------------------------------------------

/// Lenient parse of `arg` as a `u32` no smaller than `min`.
fn parse_at_least(arg: Option<&str>, min: u32, kind: LiteralKind) -> Result<u32> {
    let n = to_int(arg.unwrap_or(""));
    u32::try_from(n)
        .ok()
        .filter(|&n| n >= min)
        .ok_or(ChatError::InvalidLiteral(kind))
}

struct SlotsCmd;
impl Command for SlotsCmd {
    fn id(&self) -> CommandId {
        CommandId::SetSlots
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let n = parse_at_least(pc.arg(1), 1, LiteralKind::SlotCount)?;
        env.settings()?.set_slots(n);
        log::info!("upload slots set to {n}");
        Ok(Reply::local(env.text(Msg::SlotsSet)))
    }
}

struct ExtraSlotsCmd;
impl Command for ExtraSlotsCmd {
    fn id(&self) -> CommandId {
        CommandId::SetExtraSlots
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let n = parse_at_least(pc.arg(1), 1, LiteralKind::SlotCount)?;
        env.settings()?.set_extra_slots(n);
        log::info!("extra slots set to {n}");
        Ok(Reply::local(env.text(Msg::ExtraSlotsSet)))
    }
}

/// Smallest accepted small-file threshold, in KiB.
const MIN_SMALL_FILE_SIZE: u32 = 64;

struct SmallFileSizeCmd;
impl Command for SmallFileSizeCmd {
    fn id(&self) -> CommandId {
        CommandId::SetSmallFileSize
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let n = parse_at_least(pc.arg(1), MIN_SMALL_FILE_SIZE, LiteralKind::SmallFileSize)?;
        env.settings()?.set_small_file_size(n);
        Ok(Reply::local(env.text(Msg::SmallFileSizeSet)))
    }
}

// ---------------------------------------------------------------------------
// away / limit
// ---------------------------------------------------------------------------

struct AwayCmd;
impl Command for AwayCmd {
    fn id(&self) -> CommandId {
        CommandId::Away
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let settings = env.settings()?;
        let message = pc.arg(1).unwrap_or("");
        if settings.is_away() && message.is_empty() {
            settings.set_away(false, "");
            return Ok(Reply::local(env.text(Msg::AwayOff)));
        }
        settings.set_away(true, message);
        let text = format!("{} {message}", env.text(Msg::AwayOn));
        Ok(Reply::local(text.trim_end()))
    }
}

struct LimitCmd;
impl Command for LimitCmd {
    fn id(&self) -> CommandId {
        CommandId::Limit
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let key = if env.settings()?.toggle_throttle() {
            Msg::LimiterOn
        } else {
            Msg::LimiterOff
        };
        Ok(Reply::local(env.text(key)))
    }
}
