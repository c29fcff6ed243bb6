//! Reply rendering for the terminal: plain text or one JSON object per line.

use chatcmd_terminal::{Reply, ReplyKind};
use serde::Serialize;

/// Serializable mirror of a [`Reply`].
#[derive(Debug, Serialize)]
pub struct ReplyRecord<'a> {
    pub kind: &'static str,
    pub text: &'a str,
}

impl<'a> From<&'a Reply> for ReplyRecord<'a> {
    fn from(reply: &'a Reply) -> Self {
        let kind = match reply.kind {
            ReplyKind::LocalText => "local",
            ReplyKind::PublicText => "public",
            ReplyKind::ErrorMessage => "error",
            ReplyKind::NoText => "none",
        };
        Self {
            kind,
            text: &reply.text,
        }
    }
}

/// Text to print for `reply`, or `None` if nothing should be shown.
pub fn render_reply(reply: &Reply, nick: &str, json: bool) -> anyhow::Result<Option<String>> {
    if json {
        return Ok(Some(serde_json::to_string(&ReplyRecord::from(reply))?));
    }
    let text = match reply.kind {
        ReplyKind::NoText => return Ok(None),
        ReplyKind::PublicText => format!("<{nick}> {}", reply.text),
        ReplyKind::ErrorMessage => format!("*** {}", reply.text),
        ReplyKind::LocalText => reply.text.trim_end_matches('\n').to_string(),
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering() {
        assert_eq!(
            render_reply(&Reply::public("hi"), "alice", false).unwrap(),
            Some("<alice> hi".to_string())
        );
        assert_eq!(
            render_reply(&Reply::error("Invalid action"), "alice", false).unwrap(),
            Some("*** Invalid action".to_string())
        );
        assert_eq!(
            render_reply(&Reply::local("a\nb\n"), "alice", false).unwrap(),
            Some("a\nb".to_string())
        );
        assert_eq!(render_reply(&Reply::no_text(), "alice", false).unwrap(), None);
    }

    #[test]
    fn json_rendering() {
        let line = render_reply(&Reply::local("Done"), "alice", true).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["kind"], "local");
        assert_eq!(value["text"], "Done");

        let line = render_reply(&Reply::no_text(), "alice", true).unwrap().unwrap();
        assert!(line.contains("\"none\""));
    }
}
