//! `/dht` sub-commands.

use std::fmt::Write as _;

use chatcmd_services::DhtNode;
use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::{Cid, Tth, to_int};

use crate::actions::{DhtAction, resolve};
use crate::catalog::CommandId;
use crate::interpreter::{Command, CommandRegistry, Environment, Reply};
use crate::parser::ParsedCommand;

/// Node types above this are hidden from `/dht nodes` unless asked for.
const DEFAULT_MAX_NODE_TYPE: i64 = 4;

pub fn register_dht_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(DhtCmd));
}

struct DhtCmd;
impl Command for DhtCmd {
    fn id(&self) -> CommandId {
        CommandId::Dht
    }
    fn execute(&self, pc: &ParsedCommand, env: &Environment<'_>) -> Result<Reply> {
        let action = resolve::<DhtAction>(pc).ok_or(ChatError::InvalidAction)?;
        let dht = env.dht()?;
        let text = match action {
            DhtAction::Info => {
                let info = dht.info();
                format!(
                    "DHT port: {}\nExternal IP: {} ({})\nConnected: {}\nState: {}\nNodes: {}\n",
                    info.port,
                    info.external_ip,
                    if info.firewalled { "firewalled" } else { "open" },
                    if info.connected { "yes" } else { "no" },
                    info.state,
                    info.node_count,
                )
            },
            DhtAction::Nodes => {
                let max_type = pc.arg(2).map_or(DEFAULT_MAX_NODE_TYPE, to_int);
                let mut nodes: Vec<DhtNode> = dht
                    .nodes()
                    .into_iter()
                    .filter(|n| i64::from(n.node_type) <= max_type)
                    .collect();
                nodes.sort_by(|a, b| a.cid.cmp(&b.cid));
                format_nodes(&nodes)
            },
            DhtAction::Find => {
                let tth: Tth = operand(pc)?.parse()?;
                dht.find_file(&tth);
                "DHT: file search started".to_string()
            },
            DhtAction::FindNode => {
                let cid: Cid = operand(pc)?.parse()?;
                dht.find_node(&cid);
                "DHT: node search started".to_string()
            },
            DhtAction::Ping => {
                let cid: Cid = operand(pc)?.parse()?;
                if !dht.ping_node(&cid) {
                    return Err(ChatError::Handler("Node not found".to_string()));
                }
                "DHT: pinging node".to_string()
            },
            DhtAction::Publish => {
                let tth: Tth = operand(pc)?.parse()?;
                let file = env
                    .share()?
                    .file_info(&tth)
                    .ok_or_else(|| ChatError::Handler("File not found".to_string()))?;
                if !dht.publish_file(&tth, file.size) {
                    return Err(ChatError::Handler("Could not publish this file".to_string()));
                }
                log::info!("dht publish {tth}");
                format!("Publishing file {} ({})", file.path, file.size)
            },
        };
        Ok(Reply::local(text))
    }
}

/// The hash operand following the action keyword.
fn operand(pc: &ParsedCommand) -> Result<&str> {
    pc.arg(2).ok_or(ChatError::ArgsRequired(2))
}

fn format_nodes(nodes: &[DhtNode]) -> String {
    let mut out = format!("Nodes: {}\n", nodes.len());
    for n in nodes {
        let _ = write!(out, "{}: {} {}:{}", n.cid, n.nick, n.ip, n.udp_port);
        if let Some(secs) = n.expires_in {
            let _ = write!(out, " Expires={secs}");
        }
        let _ = write!(out, " Type={}", n.node_type);
        if n.verified {
            out.push_str(" Verified");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use chatcmd_services::MemoryCore;
    use chatcmd_types::literal::HASH_BYTES;
    use std::net::Ipv4Addr;

    fn node(byte: u8, node_type: u32) -> DhtNode {
        DhtNode {
            cid: Cid([byte; HASH_BYTES]),
            nick: format!("n{byte}"),
            ip: Ipv4Addr::new(10, 0, 0, byte),
            udp_port: 6250,
            expires_in: None,
            node_type,
            verified: false,
        }
    }

    #[test]
    fn info_reports_status() {
        let reply = run(&MemoryCore::new(), "/dht info");
        assert_eq!(
            reply,
            Reply::local(
                "DHT port: 6250\nExternal IP: 203.0.113.7 (open)\nConnected: no\nState: 0\nNodes: 0\n"
            )
        );
    }

    #[test]
    fn nodes_sorted_and_filtered() {
        let mut verified = node(3, 1);
        verified.verified = true;
        verified.expires_in = Some(120);
        let core = MemoryCore::new()
            .with_dht_node(verified)
            .with_dht_node(node(1, 0))
            .with_dht_node(node(2, 5));
        let text = run(&core, "/dht nodes").text;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Nodes: 2");
        assert!(lines[1].contains(" n1 10.0.0.1:6250 Type=0"), "{}", lines[1]);
        assert!(lines[2].ends_with("n3 10.0.0.3:6250 Expires=120 Type=1 Verified"));

        let all = run(&core, "/dht nodes 5").text;
        assert!(all.starts_with("Nodes: 3\n"));
    }

    #[test]
    fn find_requires_valid_tth() {
        let core = MemoryCore::new();
        assert_eq!(run(&core, "/dht find"), Reply::error("2 arguments required"));
        assert_eq!(run(&core, "/dht find ABC"), Reply::error("Invalid TTH"));
        assert!(core.calls().is_empty());

        let tth = "A".repeat(39);
        assert_eq!(
            run(&core, &format!("/dht find {tth}")),
            Reply::local("DHT: file search started")
        );
        assert_eq!(core.calls(), vec![format!("dht.find_file {tth}")]);
    }

    #[test]
    fn fnode_rejects_zero_cid() {
        let zero = "A".repeat(39);
        assert_eq!(
            run(&MemoryCore::new(), &format!("/dht fnode {zero}")),
            Reply::error("Invalid CID")
        );
    }

    #[test]
    fn ping_known_and_unknown_nodes() {
        let known = node(7, 0);
        let cid = known.cid;
        let core = MemoryCore::new().with_dht_node(known);
        assert_eq!(
            run(&core, &format!("/dht ping {cid}")),
            Reply::local("DHT: pinging node")
        );
        let other = Cid([9; HASH_BYTES]);
        assert_eq!(run(&core, &format!("/dht ping {other}")), Reply::error("Node not found"));
    }

    #[test]
    fn publish_needs_shared_file() {
        let tth = Tth([4; HASH_BYTES]);
        let core = MemoryCore::new();
        assert_eq!(
            run(&core, &format!("/dht publish {tth}")),
            Reply::error("File not found")
        );
        assert!(core.calls().is_empty());

        let core = MemoryCore::new().with_shared_file("/share/song.mp3", tth, 2048);
        assert_eq!(
            run(&core, &format!("/dht publish {tth}")),
            Reply::local("Publishing file /share/song.mp3 (2048)")
        );
        assert_eq!(core.calls(), vec![format!("dht.publish_file {tth} 2048")]);
    }

    #[test]
    fn lookup_failures_are_error_replies() {
        let tth = Tth([4; HASH_BYTES]);
        let core = MemoryCore::new();
        let ping = run(&core, &format!("/dht ping {}", Cid([9; HASH_BYTES])));
        assert_eq!(ping.kind, crate::ReplyKind::ErrorMessage);
        let publish = run(&core, &format!("/dht publish {tth}"));
        assert_eq!(publish.kind, crate::ReplyKind::ErrorMessage);
    }

    #[test]
    fn unknown_action() {
        assert_eq!(run(&MemoryCore::new(), "/dht join"), Reply::error("Invalid action"));
        assert_eq!(run(&MemoryCore::new(), "/DHT INFO").kind, crate::ReplyKind::LocalText);
    }
}
