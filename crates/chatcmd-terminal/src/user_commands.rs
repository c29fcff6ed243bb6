//! `/user <action> <cid | nick hub> [dir]`.
//!
//! The target is a CID when the second argument parses as one; otherwise the
//! second and third arguments are a nick and hub URL and the CID is derived
//! from them.

use std::fmt::Write as _;

use chatcmd_services::{DirectoryRequest, UserService};
use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::Cid;
use chatcmd_types::messages::Msg;

use crate::actions::{UserAction, resolve};
use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

pub fn register_user_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(UserCmd));
}

/// Who a `/user` line refers to.
struct Target {
    cid: Cid,
    /// Empty when the user was named by CID.
    hub_url: String,
    /// Index of the first argument after the user reference.
    next_arg: usize,
}

impl Target {
    fn from_args(pc: &ParsedCommand, users: &dyn UserService) -> Result<Self> {
        let first = pc.arg(2).ok_or(ChatError::ArgsRequired(2))?;
        if let Ok(cid) = first.parse::<Cid>() {
            return Ok(Self {
                cid,
                hub_url: String::new(),
                next_arg: 3,
            });
        }
        let hub_url = pc
            .arg(3)
            .ok_or_else(|| ChatError::Handler("Hub URL must be specified".to_string()))?;
        Ok(Self {
            cid: users.make_cid(first, hub_url),
            hub_url: hub_url.to_string(),
            next_arg: 4,
        })
    }
}

struct UserCmd;
impl Command for UserCmd {
    fn id(&self) -> CommandId {
        CommandId::User
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let action = resolve::<UserAction>(pc).ok_or(ChatError::InvalidAction)?;
        let users = env.users()?;
        let target = Target::from_args(pc, users)?;

        match action {
            UserAction::Stat => return stats(users, &target.cid),
            UserAction::RemoveStat => {
                users.remove_stats(&target.cid)?;
                log::info!("removed stats for {}", target.cid);
                return Ok(Reply::local(env.text(Msg::Done)));
            },
            _ => {},
        }

        let user = users
            .find_online(&target.cid, &target.hub_url)
            .ok_or_else(|| ChatError::Handler("User not found".to_string()))?;

        let text = match action {
            UserAction::GetList => {
                users.get_list(&user)?;
                "Getting file list".to_string()
            },
            UserAction::MatchQueue | UserAction::DownloadDir => {
                let dir = pc
                    .arg(target.next_arg)
                    .ok_or(ChatError::ArgsRequired(target.next_arg))?;
                let request = if action == UserAction::MatchQueue {
                    DirectoryRequest::MatchQueue
                } else {
                    DirectoryRequest::Download
                };
                env.queue()?.add_directory(&user, dir, request)?;
                "Requesting partial file list".to_string()
            },
            _ => users.report(&user),
        };
        Ok(Reply::local(text))
    }
}

fn stats(users: &dyn UserService, cid: &Cid) -> Result<Reply> {
    let Some(stats) = users.stats(cid)? else {
        return Ok(Reply::local("No information in DB"));
    };
    let mut text = String::new();
    let _ = writeln!(text, "Last IP: {}", stats.last_ip.as_deref().unwrap_or(""));
    let _ = writeln!(text, "Messages: {}", stats.message_count);
    for (nick, hub) in &stats.nicks {
        let _ = writeln!(text, "Nick: {nick}, Hub: {hub}");
    }
    for t in &stats.transfers {
        let _ = writeln!(
            text,
            "IP {}: downloaded={}, uploaded={}",
            t.ip, t.downloaded, t.uploaded
        );
    }
    Ok(Reply::local(text))
}
