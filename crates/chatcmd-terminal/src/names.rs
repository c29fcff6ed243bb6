//! Name index: every typed command name (aliases included) mapped to its
//! [`CommandId`].

use crate::catalog::CommandId;

/// One typed name of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEntry {
    /// Lowercase, unique.
    pub name: &'static str,
    pub command: CommandId,
    /// Preferred display name in help output.
    pub canonical: bool,
}

const fn name(name: &'static str, command: CommandId) -> NameEntry {
    NameEntry {
        name,
        command,
        canonical: false,
    }
}

const fn canonical(name: &'static str, command: CommandId) -> NameEntry {
    NameEntry {
        name,
        command,
        canonical: true,
    }
}

/// Sorted by `name`; [`lookup`] relies on it.
pub static NAMES: &[NameEntry] = &[
    name("addtree", CommandId::DebugAddTree),
    name("away", CommandId::Away),
    name("bloom", CommandId::DebugBloom),
    name("c", CommandId::Clear),
    name("ccpm", CommandId::Ccpm),
    name("clear", CommandId::Clear),
    name("close", CommandId::Close),
    name("cls", CommandId::Clear),
    name("con", CommandId::InfoConnection),
    name("connection", CommandId::InfoConnection),
    name("cpu", CommandId::InfoCpu),
    name("dbinfo", CommandId::InfoDb),
    name("dht", CommandId::Dht),
    name("di", CommandId::InfoStorage),
    name("disable", CommandId::DebugDisable),
    name("disks", CommandId::InfoStorage),
    name("divide", CommandId::DebugDivide),
    name("dsp", CommandId::InfoDiskSpace),
    name("extraslots", CommandId::SetExtraSlots),
    name("fav", CommandId::AddFavorite),
    name("favorite", CommandId::AddFavorite),
    name("favshowjoins", CommandId::FavShowJoins),
    name("find", CommandId::FindText),
    name("flushdb", CommandId::FlushStats),
    name("foobar", CommandId::MediaPlayer),
    name("g", CommandId::WebSearch),
    name("gdiinfo", CommandId::DebugGdiInfo),
    name("geoip", CommandId::Geoip),
    name("getlist", CommandId::GetList),
    name("gl", CommandId::GetList),
    name("google", CommandId::WebSearch),
    name("grant", CommandId::GrantExtraSlot),
    name("grants", CommandId::ShowExtraSlots),
    name("h", CommandId::Help),
    name("help", CommandId::Help),
    name("http", CommandId::DebugHttp),
    name("ignorelist", CommandId::ShowIgnoreList),
    name("il", CommandId::ShowIgnoreList),
    name("ipbans", CommandId::IpBans),
    name("ipupdate", CommandId::IpUpdate),
    name("itunes", CommandId::MediaPlayer),
    name("ja", CommandId::MediaPlayer),
    name("join", CommandId::Join),
    name("limit", CommandId::Limit),
    name("log", CommandId::OpenLog),
    name("makefilelist", CommandId::MakeFileList),
    name("me", CommandId::Me),
    name("mpc", CommandId::MediaPlayer),
    name("n", CommandId::LastNick),
    name("nick", CommandId::LastNick),
    name("password", CommandId::Password),
    name("pginfo", CommandId::PgInfo),
    name("pm", CommandId::PrivateMessage),
    name("qcd", CommandId::MediaPlayer),
    name("queue", CommandId::Queue),
    name("ratio", CommandId::InfoRatio),
    name("refresh", CommandId::RefreshShare),
    name("remfav", CommandId::RemoveFavorite),
    name("removefav", CommandId::RemoveFavorite),
    name("removefavorite", CommandId::RemoveFavorite),
    name("s", CommandId::Search),
    name("savequeue", CommandId::SaveQueue),
    name("say", CommandId::Say),
    name("search", CommandId::Search),
    name("sharefile", CommandId::ShareFile),
    name("showjoins", CommandId::ShowJoins),
    name("shutdown", CommandId::Shutdown),
    name("sl", CommandId::SetSlots),
    name("slots", CommandId::SetSlots),
    name("smallfilesize", CommandId::SetSmallFileSize),
    name("speed", CommandId::InfoSpeed),
    name("sq", CommandId::SaveQueue),
    name("stats", CommandId::InfoStats),
    name("switch", CommandId::UserListLocation),
    name("sysinfo", CommandId::InfoSystem),
    name("systeminfo", CommandId::InfoSystem),
    name("ts", CommandId::Timestamps),
    name("tth", CommandId::Tth),
    name("u", CommandId::OpenUrl),
    name("uconn", CommandId::UserConnections),
    name("ungrant", CommandId::UngrantExtraSlot),
    name("unknowntags", CommandId::DebugUnknownTags),
    name("uptime", CommandId::InfoUptime),
    name("user", CommandId::User),
    name("userlist", CommandId::ToggleUserList),
    name("ut", CommandId::InfoUptime),
    name("ver", CommandId::InfoVersion),
    name("version", CommandId::InfoVersion),
    name("w", CommandId::MediaPlayer),
    name("whois", CommandId::Whois),
    canonical("winamp", CommandId::MediaPlayer),
    name("wmp", CommandId::MediaPlayer),
];

/// Resolve a lowercase command name.
pub fn lookup(name: &str) -> Option<CommandId> {
    NAMES
        .binary_search_by(|e| e.name.cmp(name))
        .ok()
        .map(|i| NAMES[i].command)
}

/// All names of `id`, display name first.
///
/// A canonical entry leads and the rest keep table order. Without one, names
/// are ordered longest first; equal lengths keep table order.
pub fn names_for(id: CommandId) -> Vec<&'static str> {
    let mut names = Vec::new();
    let mut has_canonical = false;
    for entry in NAMES.iter().filter(|e| e.command == id) {
        if entry.canonical {
            has_canonical = true;
            names.insert(0, entry.name);
        } else {
            names.push(entry.name);
        }
    }
    if !has_canonical {
        names.sort_by(|a, b| b.len().cmp(&a.len()));
    }
    names
}
