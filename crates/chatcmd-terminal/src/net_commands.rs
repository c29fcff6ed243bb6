//! Network and connection commands: geoip, pginfo, ipupdate, ipbans, uconn,
//! queue.

use chatcmd_services::{BanList, IpVersion};
use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::{parse_ip, parse_ip_port, parse_ipv4};
use chatcmd_types::messages::Msg;

use crate::actions::{IpAction, IpBansAction, QueueAction, UconnAction, resolve};
use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

/// Register the network commands into a registry.
pub fn register_net_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(GeoIpCmd));
    reg.register(Box::new(PgInfoCmd));
    reg.register(Box::new(IpUpdateCmd));
    reg.register(Box::new(IpBansCmd));
    reg.register(Box::new(UconnCmd));
    reg.register(Box::new(QueueCmd));
}

// ---------------------------------------------------------------------------
// geoip
// ---------------------------------------------------------------------------

struct GeoIpCmd;
impl Command for GeoIpCmd {
    fn id(&self) -> CommandId {
        CommandId::Geoip
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let ip = parse_ip(pc.arg(1).unwrap_or(""))?;
        let text = match env.geoip()?.locate(ip) {
            Some(loc) if !loc.country.is_empty() || !loc.location.is_empty() => {
                let mut text = String::from("Location: ");
                if !loc.country.is_empty() && !loc.location.is_empty() {
                    text.push_str(&loc.country);
                    text.push_str(", ");
                    text.push_str(&loc.location);
                } else if loc.location.is_empty() {
                    text.push_str(&loc.country);
                } else {
                    text.push_str(&loc.location);
                }
                text
            },
            _ => "Location not found".to_string(),
        };
        Ok(Reply::local(text))
    }
}

// ---------------------------------------------------------------------------
// pginfo
// ---------------------------------------------------------------------------

struct PgInfoCmd;
impl Command for PgInfoCmd {
    fn id(&self) -> CommandId {
        CommandId::PgInfo
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let ip = parse_ipv4(pc.arg(1).unwrap_or(""))?;
        let text = match env.geoip()?.p2p_guard(ip) {
            Some(info) if !info.is_empty() => format!("{ip}: {info}"),
            _ => "IP not found".to_string(),
        };
        Ok(Reply::local(text))
    }
}

// ---------------------------------------------------------------------------
// ipupdate
// ---------------------------------------------------------------------------

struct IpUpdateCmd;
impl Command for IpUpdateCmd {
    fn id(&self) -> CommandId {
        CommandId::IpUpdate
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let net = env.network()?;
        let versions: &[IpVersion] = if pc.arg_count() > 0 {
            match resolve::<IpAction>(pc) {
                Some(IpAction::V4) => &[IpVersion::V4],
                Some(IpAction::V6) => &[IpVersion::V6],
                None => return Err(ChatError::InvalidArgument),
            }
        } else if net.has_ipv6() {
            &[IpVersion::V4, IpVersion::V6]
        } else {
            &[IpVersion::V4]
        };

        let mut lines = Vec::new();
        for &version in versions {
            let line = net.run_ip_test(version, pc.frame_id).unwrap_or_else(|| {
                let n = match version {
                    IpVersion::V4 => 4,
                    IpVersion::V6 => 6,
                };
                env.format(Msg::PortTestErrorGettingIp, &n)
            });
            lines.push(line);
        }
        Ok(Reply::local(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// ipbans
// ---------------------------------------------------------------------------

struct IpBansCmd;
impl Command for IpBansCmd {
    fn id(&self) -> CommandId {
        CommandId::IpBans
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let action = resolve::<IpBansAction>(pc).ok_or(ChatError::InvalidAction)?;
        let bans = env.ip_bans()?;
        if action == IpBansAction::Info {
            let info = bans.info();
            if info.is_empty() {
                return Ok(Reply::local(env.text(Msg::EmptyList)));
            }
            return Ok(Reply::local(format!("Banned addresses:\n{info}")));
        }

        let (Some(list), Some(addr)) = (pc.arg(2), pc.arg(3)) else {
            return Err(ChatError::ArgsRequired(3));
        };
        let list = if list.eq_ignore_ascii_case("tcp") {
            BanList::Tcp
        } else if list.eq_ignore_ascii_case("udp") {
            BanList::Udp
        } else {
            return Err(ChatError::InvalidArgument);
        };
        let addr = parse_ip_port(addr)?;
        match action {
            IpBansAction::Remove => bans.remove_ban(list, addr),
            IpBansAction::Protect => bans.protect(list, addr, true),
            IpBansAction::Unprotect => bans.protect(list, addr, false),
            IpBansAction::Info => {},
        }
        log::info!("ipbans {action:?} {list:?} {addr}");
        Ok(Reply::local(env.text(Msg::Done)))
    }
}

// ---------------------------------------------------------------------------
// uconn
// ---------------------------------------------------------------------------

struct UconnCmd;
impl Command for UconnCmd {
    fn id(&self) -> CommandId {
        CommandId::UserConnections
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let action = resolve::<UconnAction>(pc).ok_or(ChatError::InvalidAction)?;
        let text = match action {
            UconnAction::List => env.connections()?.user_connections(),
            UconnAction::Expect => env.connections()?.expected_connections(),
            UconnAction::Tokens => env.connections()?.tokens(),
            UconnAction::Suppress => {
                let on = env.diagnostics()?.toggle_suppress_user_connections();
                format!("Suppress: {on}")
            },
        };
        if text.is_empty() {
            return Ok(Reply::local(env.text(Msg::EmptyList)));
        }
        Ok(Reply::local(text))
    }
}

// ---------------------------------------------------------------------------
// queue
// ---------------------------------------------------------------------------

struct QueueCmd;
impl Command for QueueCmd {
    fn id(&self) -> CommandId {
        CommandId::Queue
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        match resolve::<QueueAction>(pc) {
            Some(QueueAction::Info) => {
                let info = env.queue()?.info();
                Ok(Reply::local(format!(
                    "Download queue\nTotal files: {}\nRunning downloads: {}\nDirectories: {}\n",
                    info.files, info.running, info.directories
                )))
            },
            None => Err(ChatError::InvalidAction),
        }
    }
}
