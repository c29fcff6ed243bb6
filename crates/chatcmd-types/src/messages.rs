//! Message catalog keys.
//!
//! Interpreter code never embeds user-visible prose directly; it names a
//! [`Msg`] key and asks a [`MessageCatalog`] for the locale-resolved text.
//! [`DefaultCatalog`] serves the built-in English strings.
//!
//! Templated messages carry a single `{0}` placeholder.
//!
//! Help strings use the layout `usage\tdescription`, where the usage part is
//! optional. Commands valid in both hub and user chat may carry two variants
//! separated by a newline: the hub text first, the user text second.

use std::borrow::Cow;
use std::fmt;

/// Opaque key into a message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Msg {
    // -- errors --
    UnknownCommand,
    ArgRequired,
    ArgsRequired,
    NoArgsRequired,
    ArgsExtra,
    InvalidAction,
    InvalidArgument,
    InvalidIp,
    InvalidTth,
    InvalidCid,
    InvalidSlots,
    InvalidSize,
    InvalidNumber,
    UnterminatedQuote,
    ServiceUnavailable,

    // -- status --
    Done,
    EmptyList,
    AvailableCommands,
    RefreshingShare,
    QueueSaved,
    IgnoredUsers,
    SlotsSet,
    ExtraSlotsSet,
    SmallFileSizeSet,
    DirectoryNotShared,
    TthError,
    FileShared,
    TthAdded,
    AwayOn,
    AwayOff,
    LimiterOn,
    LimiterOff,
    PortTestErrorGettingIp,
    HttpRequestStarted,
    HttpRequestFailed,
    Aliases,

    // -- help section titles --
    TitleGeneralChat,
    TitleHub,
    TitleUser,
    TitleSystem,

    // -- per-command help --
    HelpClear,
    HelpFindText,
    HelpClose,
    HelpJoin,
    HelpAddFavorite,
    HelpRemoveFavorite,
    HelpShowJoins,
    HelpFavShowJoins,
    HelpTimestamps,
    HelpInfoConnection,
    HelpAway,
    HelpLimit,
    HelpSetSlots,
    HelpSetExtraSlots,
    HelpSetSmallFileSize,
    HelpRefreshShare,
    HelpSaveQueue,
    HelpPassword,
    HelpToggleUserList,
    HelpUserListLocation,
    HelpPrivateMessage,
    HelpGetList,
    HelpGrantExtraSlot,
    HelpUngrantExtraSlot,
    HelpIpUpdate,
    HelpInfoVersion,
    HelpInfoUptime,
    HelpInfoSpeed,
    HelpInfoStorage,
    HelpInfoDiskSpace,
    HelpInfoSystem,
    HelpInfoCpu,
    HelpInfoStats,
    HelpInfoRatio,
    HelpInfoDb,
    HelpSearch,
    HelpShowIgnoreList,
    HelpShowExtraSlots,
    HelpMediaPlayer,
    HelpWebSearch,
    HelpOpenUrl,
    HelpOpenLog,
    HelpShutdown,
    HelpWhois,
    HelpGeoip,
    HelpPgInfo,
    HelpSay,
    HelpMe,
    HelpLastNick,
    HelpHelp,
}

impl Msg {
    /// Built-in English text for this key.
    pub fn default_text(self) -> &'static str {
        match self {
            Msg::UnknownCommand => "Unknown command:",
            Msg::ArgRequired => "Argument required",
            Msg::ArgsRequired => "{0} arguments required",
            Msg::NoArgsRequired => "This command does not accept arguments",
            Msg::ArgsExtra => "Too many arguments, at most {0} accepted",
            Msg::InvalidAction => "Invalid action",
            Msg::InvalidArgument => "Invalid argument",
            Msg::InvalidIp => "Invalid IP address",
            Msg::InvalidTth => "Invalid TTH",
            Msg::InvalidCid => "Invalid CID",
            Msg::InvalidSlots => "Invalid number of slots",
            Msg::InvalidSize => "Invalid size",
            Msg::InvalidNumber => "Invalid number",
            Msg::UnterminatedQuote => "Unterminated quote",
            Msg::ServiceUnavailable => "{0} is not available",

            Msg::Done => "Done",
            Msg::EmptyList => "List is empty",
            Msg::AvailableCommands => "Available commands:",
            Msg::RefreshingShare => "Refreshing share...",
            Msg::QueueSaved => "Download queue saved",
            Msg::IgnoredUsers => "Ignored users",
            Msg::SlotsSet => "Slots set",
            Msg::ExtraSlotsSet => "Extra slots set",
            Msg::SmallFileSizeSet => "Small file size set",
            Msg::DirectoryNotShared => "Directory is not shared",
            Msg::TthError => "Unable to compute TTH",
            Msg::FileShared => "File shared: {0}",
            Msg::TthAdded => "TTH {0} added to the database",
            Msg::AwayOn => "Away mode on:",
            Msg::AwayOff => "Away mode off",
            Msg::LimiterOn => "Transfer rate limiting on",
            Msg::LimiterOff => "Transfer rate limiting off",
            Msg::PortTestErrorGettingIp => "Error getting IPv{0} address",
            Msg::HttpRequestStarted => "HTTP request {0} started",
            Msg::HttpRequestFailed => "Unable to start HTTP request",
            Msg::Aliases => "(aliases: {0})",

            Msg::TitleGeneralChat => "General chat commands:",
            Msg::TitleHub => "Hub commands:",
            Msg::TitleUser => "Private chat commands:",
            Msg::TitleSystem => "System commands:",

            Msg::HelpClear => "Clear the chat window",
            Msg::HelpFindText => "[text]\tFind text in the chat window",
            Msg::HelpClose => "Close the current window",
            Msg::HelpJoin => "<address>\tJoin a hub",
            Msg::HelpAddFavorite => {
                "Add this hub to favorites\nAdd this user to favorites"
            },
            Msg::HelpRemoveFavorite => {
                "Remove this hub from favorites\nRemove this user from favorites"
            },
            Msg::HelpShowJoins => "Toggle join/part notifications",
            Msg::HelpFavShowJoins => "Toggle join/part notifications for favorite users",
            Msg::HelpTimestamps => "Toggle timestamps",
            Msg::HelpInfoConnection => "[pub]\tShow hub connection info",
            Msg::HelpAway => "[message]\tToggle away mode",
            Msg::HelpLimit => "Toggle transfer rate limiting",
            Msg::HelpSetSlots => "<n>\tSet the number of upload slots",
            Msg::HelpSetExtraSlots => "<n>\tSet the number of extra slots for small files",
            Msg::HelpSetSmallFileSize => "<KiB>\tSet the maximum small file size",
            Msg::HelpRefreshShare => "Refresh the share",
            Msg::HelpSaveQueue => "Save the download queue",
            Msg::HelpPassword => "<password>\tSend the hub password",
            Msg::HelpToggleUserList => "Show or hide the user list",
            Msg::HelpUserListLocation => "Move the user list to the other side",
            Msg::HelpPrivateMessage => "<nick> <message>\tSend a private message",
            Msg::HelpGetList => {
                "<nick>\tGet a user's file list\nGet this user's file list"
            },
            Msg::HelpGrantExtraSlot => "Grant an extra slot to this user",
            Msg::HelpUngrantExtraSlot => "Remove the extra slot from this user",
            Msg::HelpIpUpdate => "[v4|v6]\tUpdate the external IP address",
            Msg::HelpInfoVersion => "[pub]\tShow the client version",
            Msg::HelpInfoUptime => "[pub]\tShow client and system uptime",
            Msg::HelpInfoSpeed => "[pub]\tShow average download and upload speed",
            Msg::HelpInfoStorage => "[pub]\tShow disk information",
            Msg::HelpInfoDiskSpace => "[pub]\tShow free disk space",
            Msg::HelpInfoSystem => "[pub]\tShow system information",
            Msg::HelpInfoCpu => "[pub]\tShow CPU information",
            Msg::HelpInfoStats => "[pub]\tShow client statistics",
            Msg::HelpInfoRatio => "[pub]\tShow the upload/download ratio",
            Msg::HelpInfoDb => "Show database information",
            Msg::HelpSearch => "<text>\tSearch for files",
            Msg::HelpShowIgnoreList => "Show the ignore list",
            Msg::HelpShowExtraSlots => "Show granted extra slots",
            Msg::HelpMediaPlayer => "Announce the currently playing track",
            Msg::HelpWebSearch => "<text>\tSearch the web",
            Msg::HelpOpenUrl => "<url>\tOpen a URL",
            Msg::HelpOpenLog => "[system|downloads|uploads]\tOpen a log file",
            Msg::HelpShutdown => "Toggle shutdown after downloads complete",
            Msg::HelpWhois => "<ip>\tLook up an IP address",
            Msg::HelpGeoip => "<ip>\tShow the location of an IP address",
            Msg::HelpPgInfo => "<ip>\tShow P2P Guard information for an IP address",
            Msg::HelpSay => "<text>\tSend text as-is",
            Msg::HelpMe => "<text>\tSend a third-person message",
            Msg::HelpLastNick => "<nick>\tInsert the last nick",
            Msg::HelpHelp => "Show this help",
        }
    }
}

/// Source of locale-resolved message text.
pub trait MessageCatalog {
    /// Text for `key`.
    fn text(&self, key: Msg) -> Cow<'_, str>;

    /// Text for `key` with its `{0}` placeholder replaced by `arg`.
    fn format(&self, key: Msg, arg: &dyn fmt::Display) -> String {
        self.text(key).replace("{0}", &arg.to_string())
    }
}

/// Catalog serving the built-in English strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl MessageCatalog for DefaultCatalog {
    fn text(&self, key: Msg) -> Cow<'_, str> {
        Cow::Borrowed(key.default_text())
    }
}
