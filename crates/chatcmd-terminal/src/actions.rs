//! Sub-action vocabularies for commands whose first argument picks an
//! operation (`/dht find`, `/tth info`, ...).
//!
//! Keyword order in each table is a stability contract: the 1-based position
//! of a keyword is its action code, and scripts may depend on those numbers.
//! Append new keywords; never reorder.

use crate::parser::ParsedCommand;

/// A per-command set of sub-actions.
pub trait Action: Sized + Copy {
    /// Lowercase keywords in code order.
    const KEYWORDS: &'static [&'static str];

    /// Action for a 1-based code; `None` for 0 or out of range.
    fn from_code(code: usize) -> Option<Self>;

    /// 1-based action code.
    fn code(self) -> usize;
}

/// Case-insensitive linear scan of `args[1]` over `keywords`.
/// Returns the 1-based position, or 0 if absent or not matched.
pub fn resolve_code(pc: &ParsedCommand, keywords: &[&str]) -> usize {
    let Some(word) = pc.arg(1) else {
        return 0;
    };
    keywords
        .iter()
        .position(|k| k.eq_ignore_ascii_case(word))
        .map_or(0, |i| i + 1)
}

/// Resolve the sub-action of `pc`.
pub fn resolve<A: Action>(pc: &ParsedCommand) -> Option<A> {
    A::from_code(resolve_code(pc, A::KEYWORDS))
}

macro_rules! action_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $kw:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl Action for $name {
            const KEYWORDS: &'static [&'static str] = &[$($kw),+];

            fn from_code(code: usize) -> Option<Self> {
                const ALL: &[$name] = &[$($name::$variant),+];
                code.checked_sub(1).and_then(|i| ALL.get(i)).copied()
            }

            fn code(self) -> usize {
                self as usize + 1
            }
        }
    };
}

action_table! {
    /// `/tth`
    TthAction { Info => "info", AddTree => "addtree", RmTree => "rmtree" }
}

action_table! {
    /// `/uconn`
    UconnAction { List => "list", Expect => "expect", Tokens => "tokens", Suppress => "suppress" }
}

action_table! {
    /// `/dht`
    DhtAction {
        Info => "info",
        Nodes => "nodes",
        Find => "find",
        FindNode => "fnode",
        Ping => "ping",
        Publish => "publish",
    }
}

action_table! {
    /// `/user`
    UserAction {
        Info => "info",
        GetList => "getlist",
        MatchQueue => "mq",
        DownloadDir => "dldir",
        Stat => "stat",
        RemoveStat => "rmstat",
    }
}

action_table! {
    /// `/queue`
    QueueAction { Info => "info" }
}

action_table! {
    /// `/disable`
    DisableAction { Partial => "partial" }
}

action_table! {
    /// `/bloom`
    BloomAction { Info => "info", Match => "match" }
}

action_table! {
    /// `/http`
    HttpAction { Get => "get", Post => "post" }
}

action_table! {
    /// `/ipupdate`
    IpAction { V4 => "v4", V6 => "v6" }
}

action_table! {
    /// `/ipbans`
    IpBansAction { Info => "info", Remove => "remove", Protect => "protect", Unprotect => "unprotect" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(args: &[&str]) -> ParsedCommand {
        ParsedCommand {
            command: None,
            args: args.iter().map(|s| s.to_string()).collect(),
            frame_id: 0,
        }
    }

    #[test]
    fn no_action_argument() {
        assert_eq!(resolve_code(&pc(&["dht"]), DhtAction::KEYWORDS), 0);
        assert_eq!(resolve::<DhtAction>(&pc(&["dht"])), None);
    }

    #[test]
    fn case_insensitive_match() {
        assert_eq!(resolve::<TthAction>(&pc(&["tth", "INFO"])), Some(TthAction::Info));
        assert_eq!(resolve::<DhtAction>(&pc(&["dht", "FNode"])), Some(DhtAction::FindNode));
    }

    #[test]
    fn unmatched_is_zero() {
        assert_eq!(resolve_code(&pc(&["tth", "inf"]), TthAction::KEYWORDS), 0);
        assert_eq!(resolve::<BloomAction>(&pc(&["bloom", "matches"])), None);
    }

    #[test]
    fn codes_follow_keyword_order() {
        assert_eq!(DhtAction::Info.code(), 1);
        assert_eq!(DhtAction::Publish.code(), 6);
        assert_eq!(UserAction::RemoveStat.code(), 6);
        assert_eq!(IpBansAction::Unprotect.code(), 4);
        assert_eq!(resolve_code(&pc(&["user", "dldir"]), UserAction::KEYWORDS), 4);
    }

    #[test]
    fn from_code_bounds() {
        assert_eq!(TthAction::from_code(0), None);
        assert_eq!(TthAction::from_code(3), Some(TthAction::RmTree));
        assert_eq!(TthAction::from_code(4), None);
    }

    #[test]
    fn code_round_trips_through_keywords() {
        fn check<A: Action + PartialEq + std::fmt::Debug>() {
            for (i, kw) in A::KEYWORDS.iter().enumerate() {
                let action = resolve::<A>(&pc(&["x", kw])).unwrap();
                assert_eq!(action.code(), i + 1);
            }
        }
        check::<TthAction>();
        check::<UconnAction>();
        check::<DhtAction>();
        check::<UserAction>();
        check::<QueueAction>();
        check::<DisableAction>();
        check::<BloomAction>();
        check::<HttpAction>();
        check::<IpAction>();
        check::<IpBansAction>();
    }
}
