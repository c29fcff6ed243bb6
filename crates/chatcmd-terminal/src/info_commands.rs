//! Client information commands: version, uptime, system, speed, cpu, disk
//! space, disks, stats, ratio, dbinfo.
//!
//! All but `dbinfo` reply publicly when the first argument is the public
//! keyword.

use chatcmd_services::{GlobalRatio, SystemInfoService};
use chatcmd_types::error::Result;

use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

type Report = fn(&dyn SystemInfoService) -> String;

/// Register the information commands into a registry.
pub fn register_info_commands(reg: &mut CommandRegistry) {
    let reports: [(CommandId, Report); 8] = [
        (CommandId::InfoVersion, |s| s.version()),
        (CommandId::InfoUptime, |s| s.uptime()),
        (CommandId::InfoSystem, |s| s.system()),
        (CommandId::InfoSpeed, |s| s.speed()),
        (CommandId::InfoCpu, |s| s.cpu()),
        (CommandId::InfoDiskSpace, |s| s.disk_space()),
        (CommandId::InfoStorage, |s| s.storage()),
        (CommandId::InfoStats, |s| s.stats()),
    ];
    for (id, report) in reports {
        reg.register(Box::new(InfoCmd { id, report }));
    }
    reg.register(Box::new(RatioCmd));
    reg.register(Box::new(DbInfoCmd));
}

// ---------------------------------------------------------------------------
// Plain reports
// ---------------------------------------------------------------------------

struct InfoCmd {
    id: CommandId,
    report: Report,
}

impl Command for InfoCmd {
    fn id(&self) -> CommandId {
        self.id
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let text = (self.report)(env.system()?);
        Ok(Reply::visible(text, env.is_public(pc)))
    }
}

// ---------------------------------------------------------------------------
// ratio
// ---------------------------------------------------------------------------

struct RatioCmd;
impl Command for RatioCmd {
    fn id(&self) -> CommandId {
        CommandId::InfoRatio
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let ratio = env.system()?.ratio()?;
        let text = format_ratio(&env.config.ratio_message, ratio);
        Ok(Reply::visible(text, env.is_public(pc)))
    }
}

/// Expand `%[ratio]`, `%[up]` and `%[down]` in `template`.
fn format_ratio(template: &str, ratio: GlobalRatio) -> String {
    let r = if ratio.download > 0 {
        ratio.upload as f64 / ratio.download as f64
    } else {
        0.0
    };
    template
        .replace("%[ratio]", &format!("{r:.2}"))
        .replace("%[up]", &format_bytes(ratio.upload))
        .replace("%[down]", &format_bytes(ratio.download))
}

/// Human-readable byte count with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

// ---------------------------------------------------------------------------
// dbinfo
// ---------------------------------------------------------------------------

struct DbInfoCmd;
impl Command for DbInfoCmd {
    fn id(&self) -> CommandId {
        CommandId::InfoDb
    }
    fn execute(&self, _pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        Ok(Reply::local(env.hash_db()?.db_info()))
    }
}
