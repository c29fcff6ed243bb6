//! The command catalog: one grammar descriptor per command identifier.
//!
//! The table is compile-time constant data indexed by [`CommandId`]. Order
//! matters: help output walks it in identifier order.

use chatcmd_types::messages::Msg;

bitflags::bitflags! {
    /// Where a command is legal and how its arguments are split.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u32 {
        /// Valid in hub chat.
        const HUB = 1 << 0;
        /// Valid in private (user) chat.
        const USER = 1 << 1;
        /// Valid in any context, including the system log window.
        const SYSTEM = 1 << 2;
        /// Listed under the general chat section of help.
        const GENERAL_CHAT = 1 << 3;
        /// Only meaningful to a graphical frame.
        const UI = 1 << 4;
        /// Shell-style whitespace/quote splitting.
        const SPLIT_ARGS = 1 << 5;
        /// Split off the first token, keep the remainder whole.
        const GET_FIRST_ARG = 1 << 6;
    }
}

/// Upper bound marker for commands taking any number of arguments.
pub const UNBOUNDED: usize = usize::MAX;

/// Stable identifier of every known command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandId {
    Clear,
    FindText,
    Close,
    Join,
    AddFavorite,
    RemoveFavorite,
    ShowJoins,
    FavShowJoins,
    Timestamps,
    InfoConnection,
    Away,
    Limit,
    SetSlots,
    SetExtraSlots,
    SetSmallFileSize,
    RefreshShare,
    MakeFileList,
    ShareFile,
    SaveQueue,
    FlushStats,
    Password,
    ToggleUserList,
    UserListLocation,
    PrivateMessage,
    GetList,
    GrantExtraSlot,
    UngrantExtraSlot,
    Ccpm,
    IpUpdate,
    InfoVersion,
    InfoUptime,
    InfoSpeed,
    InfoStorage,
    InfoDiskSpace,
    InfoSystem,
    InfoCpu,
    InfoStats,
    InfoRatio,
    InfoDb,
    Search,
    ShowIgnoreList,
    ShowExtraSlots,
    MediaPlayer,
    WebSearch,
    OpenUrl,
    OpenLog,
    Shutdown,
    Whois,
    Geoip,
    PgInfo,
    User,
    UserConnections,
    Queue,
    Dht,
    Tth,
    IpBans,
    DebugAddTree,
    DebugDisable,
    DebugBloom,
    DebugGdiInfo,
    DebugHttp,
    DebugUnknownTags,
    DebugDivide,
    Say,
    Me,
    LastNick,
    Help,
}

impl CommandId {
    /// Number of commands in the catalog.
    pub const COUNT: usize = 67;

    /// Every command, in identifier order.
    pub const ALL: [CommandId; Self::COUNT] = [
        CommandId::Clear,
        CommandId::FindText,
        CommandId::Close,
        CommandId::Join,
        CommandId::AddFavorite,
        CommandId::RemoveFavorite,
        CommandId::ShowJoins,
        CommandId::FavShowJoins,
        CommandId::Timestamps,
        CommandId::InfoConnection,
        CommandId::Away,
        CommandId::Limit,
        CommandId::SetSlots,
        CommandId::SetExtraSlots,
        CommandId::SetSmallFileSize,
        CommandId::RefreshShare,
        CommandId::MakeFileList,
        CommandId::ShareFile,
        CommandId::SaveQueue,
        CommandId::FlushStats,
        CommandId::Password,
        CommandId::ToggleUserList,
        CommandId::UserListLocation,
        CommandId::PrivateMessage,
        CommandId::GetList,
        CommandId::GrantExtraSlot,
        CommandId::UngrantExtraSlot,
        CommandId::Ccpm,
        CommandId::IpUpdate,
        CommandId::InfoVersion,
        CommandId::InfoUptime,
        CommandId::InfoSpeed,
        CommandId::InfoStorage,
        CommandId::InfoDiskSpace,
        CommandId::InfoSystem,
        CommandId::InfoCpu,
        CommandId::InfoStats,
        CommandId::InfoRatio,
        CommandId::InfoDb,
        CommandId::Search,
        CommandId::ShowIgnoreList,
        CommandId::ShowExtraSlots,
        CommandId::MediaPlayer,
        CommandId::WebSearch,
        CommandId::OpenUrl,
        CommandId::OpenLog,
        CommandId::Shutdown,
        CommandId::Whois,
        CommandId::Geoip,
        CommandId::PgInfo,
        CommandId::User,
        CommandId::UserConnections,
        CommandId::Queue,
        CommandId::Dht,
        CommandId::Tth,
        CommandId::IpBans,
        CommandId::DebugAddTree,
        CommandId::DebugDisable,
        CommandId::DebugBloom,
        CommandId::DebugGdiInfo,
        CommandId::DebugHttp,
        CommandId::DebugUnknownTags,
        CommandId::DebugDivide,
        CommandId::Say,
        CommandId::Me,
        CommandId::LastNick,
        CommandId::Help,
    ];

    /// Grammar of this command.
    pub fn descriptor(self) -> &'static CommandDescriptor {
        &DESCRIPTORS[self as usize]
    }
}

/// Grammar of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub flags: ContextFlags,
    /// Inclusive lower bound on argument count, command name excluded.
    pub min_args: usize,
    /// Inclusive upper bound; [`UNBOUNDED`] for no limit.
    pub max_args: usize,
    /// Help text key; `None` hides the command from help.
    pub help: Option<Msg>,
}

macro_rules! flags {
    ($($f:ident)|+) => {
        ContextFlags::empty()$(.union(ContextFlags::$f))+
    };
}

const fn cmd(flags: ContextFlags, min_args: usize, max_args: usize, help: Option<Msg>) -> CommandDescriptor {
    CommandDescriptor {
        flags,
        min_args,
        max_args,
        help,
    }
}

static DESCRIPTORS: [CommandDescriptor; CommandId::COUNT] = [
    cmd(flags!(HUB | USER | GENERAL_CHAT | UI), 0, 0, Some(Msg::HelpClear)),
    cmd(flags!(HUB | USER | GENERAL_CHAT | UI), 0, 1, Some(Msg::HelpFindText)),
    cmd(flags!(HUB | USER | GENERAL_CHAT | UI), 0, 0, Some(Msg::HelpClose)),
    cmd(flags!(HUB | UI), 1, 1, Some(Msg::HelpJoin)),
    cmd(flags!(HUB | USER), 0, 0, Some(Msg::HelpAddFavorite)),
    cmd(flags!(HUB | USER), 0, 0, Some(Msg::HelpRemoveFavorite)),
    cmd(flags!(HUB), 0, 0, Some(Msg::HelpShowJoins)),
    cmd(flags!(HUB), 0, 0, Some(Msg::HelpFavShowJoins)),
    cmd(flags!(HUB | USER | GENERAL_CHAT), 0, 0, Some(Msg::HelpTimestamps)),
    cmd(flags!(HUB), 0, 1, Some(Msg::HelpInfoConnection)),
    cmd(flags!(SYSTEM), 0, 1, Some(Msg::HelpAway)),
    cmd(flags!(SYSTEM), 0, 0, Some(Msg::HelpLimit)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, Some(Msg::HelpSetSlots)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, Some(Msg::HelpSetExtraSlots)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, Some(Msg::HelpSetSmallFileSize)),
    cmd(flags!(SYSTEM), 0, 0, Some(Msg::HelpRefreshShare)),
    cmd(flags!(SYSTEM), 0, 0, None),
    // sharefile takes the path as one remainder argument.
    cmd(flags!(SYSTEM), 1, 1, None),
    cmd(flags!(SYSTEM), 0, 0, Some(Msg::HelpSaveQueue)),
    cmd(flags!(SYSTEM), 0, 0, None),
    cmd(flags!(HUB), 1, 1, Some(Msg::HelpPassword)),
    cmd(flags!(HUB | UI), 0, 0, Some(Msg::HelpToggleUserList)),
    cmd(flags!(HUB | UI), 0, 0, Some(Msg::HelpUserListLocation)),
    cmd(flags!(HUB | GET_FIRST_ARG), 2, 2, Some(Msg::HelpPrivateMessage)),
    cmd(flags!(HUB | USER), 0, 1, Some(Msg::HelpGetList)),
    cmd(flags!(USER), 0, 0, Some(Msg::HelpGrantExtraSlot)),
    cmd(flags!(USER), 0, 0, Some(Msg::HelpUngrantExtraSlot)),
    cmd(flags!(USER), 0, 0, None),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpIpUpdate)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoVersion)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoUptime)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoSpeed)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoStorage)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoDiskSpace)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoSystem)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoCpu)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoStats)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 1, Some(Msg::HelpInfoRatio)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | SPLIT_ARGS), 0, 0, Some(Msg::HelpInfoDb)),
    cmd(flags!(SYSTEM | GENERAL_CHAT | UI), 1, 1, Some(Msg::HelpSearch)),
    cmd(flags!(SYSTEM), 0, 0, Some(Msg::HelpShowIgnoreList)),
    cmd(flags!(SYSTEM), 0, 0, Some(Msg::HelpShowExtraSlots)),
    cmd(flags!(HUB | USER | GENERAL_CHAT | UI), 0, 0, Some(Msg::HelpMediaPlayer)),
    cmd(flags!(SYSTEM | UI), 1, 1, Some(Msg::HelpWebSearch)),
    cmd(flags!(SYSTEM | UI | SPLIT_ARGS), 1, 1, Some(Msg::HelpOpenUrl)),
    cmd(flags!(SYSTEM | UI | SPLIT_ARGS), 0, 1, Some(Msg::HelpOpenLog)),
    cmd(flags!(SYSTEM | UI | SPLIT_ARGS), 0, 0, Some(Msg::HelpShutdown)),
    cmd(flags!(SYSTEM | UI | SPLIT_ARGS), 1, 1, Some(Msg::HelpWhois)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, Some(Msg::HelpGeoip)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, Some(Msg::HelpPgInfo)),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 2, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, 1, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 1, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 0, UNBOUNDED, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 2, UNBOUNDED, None),
    cmd(flags!(SYSTEM), 0, 0, None),
    cmd(flags!(SYSTEM | SPLIT_ARGS), 2, 2, None),
    cmd(flags!(HUB | USER | GENERAL_CHAT), 1, 1, Some(Msg::HelpSay)),
    cmd(flags!(HUB | USER | GENERAL_CHAT), 1, 1, Some(Msg::HelpMe)),
    cmd(flags!(HUB), 1, 1, Some(Msg::HelpLastNick)),
    cmd(flags!(SYSTEM | GENERAL_CHAT), 0, UNBOUNDED, Some(Msg::HelpHelp)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_index_their_own_slot() {
        for (i, id) in CommandId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, i, "{id:?}");
        }
    }

    #[test]
    fn min_never_exceeds_max() {
        for id in CommandId::ALL {
            let d = id.descriptor();
            assert!(d.min_args <= d.max_args, "{id:?}");
        }
    }

    #[test]
    fn split_modes_are_exclusive() {
        for id in CommandId::ALL {
            let f = id.descriptor().flags;
            assert!(
                !(f.contains(ContextFlags::SPLIT_ARGS) && f.contains(ContextFlags::GET_FIRST_ARG)),
                "{id:?}"
            );
        }
    }

    #[test]
    fn every_command_has_a_context() {
        let ctx = ContextFlags::HUB | ContextFlags::USER | ContextFlags::SYSTEM;
        for id in CommandId::ALL {
            assert!(id.descriptor().flags.intersects(ctx), "{id:?}");
        }
    }

    #[test]
    fn slots_grammar() {
        let d = CommandId::SetSlots.descriptor();
        assert_eq!((d.min_args, d.max_args), (1, 1));
        assert!(d.flags.contains(ContextFlags::SPLIT_ARGS));
        assert_eq!(d.help, Some(Msg::HelpSetSlots));
    }

    #[test]
    fn pm_splits_first_argument() {
        let d = CommandId::PrivateMessage.descriptor();
        assert!(d.flags.contains(ContextFlags::GET_FIRST_ARG));
        assert_eq!((d.min_args, d.max_args), (2, 2));
    }

    #[test]
    fn debug_commands_are_hidden() {
        for id in [CommandId::Tth, CommandId::Dht, CommandId::DebugDivide, CommandId::User] {
            assert_eq!(id.descriptor().help, None, "{id:?}");
        }
    }
}
