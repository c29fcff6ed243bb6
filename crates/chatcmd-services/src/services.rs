//! Service traits invoked by command handlers.
//!
//! Each trait is a narrow view of one client subsystem. Handlers reach them
//! through [`Core`], which returns `None` for any subsystem the host process
//! does not provide.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chatcmd_types::error::Result;
use chatcmd_types::literal::{Cid, Tth};

// ---------------------------------------------------------------------------
// Share manager
// ---------------------------------------------------------------------------

/// A file found in the share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub path: String,
    pub size: u64,
}

/// Occupancy of the share's bloom filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomInfo {
    pub size: usize,
    pub used: usize,
}

/// Abstraction over the share manager.
pub trait ShareService {
    /// Start a share refresh.
    fn refresh(&self) -> Result<()>;

    /// Regenerate the own file list.
    fn generate_file_list(&self) -> Result<()>;

    fn is_directory_shared(&self, dir: &str) -> bool;

    /// Add a single already-hashed file to the share.
    fn add_file(&self, path: &str, tth: &Tth, size: u64) -> Result<()>;

    fn file_info(&self, tth: &Tth) -> Option<SharedFile>;

    fn bloom_info(&self) -> BloomInfo;

    /// Test a lower-cased search term against the bloom filter.
    fn match_bloom(&self, text: &str) -> bool;
}

// ---------------------------------------------------------------------------
// Hash database
// ---------------------------------------------------------------------------

/// Hash database record for one TTH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry {
    pub flags: u32,
    pub path: Option<String>,
    pub tree_size: u64,
}

/// Root and file size of a computed Tiger tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TigerTree {
    pub root: Tth,
    pub file_size: u64,
}

/// Abstraction over the hash database and the file hasher.
pub trait HashDatabase {
    /// Look up a TTH. `Err` means the database could not be queried.
    fn file_info(&self, tth: &Tth) -> Result<Option<HashEntry>>;

    /// Hash a file on disk.
    fn hash_file(&self, path: &str) -> Result<TigerTree>;

    /// Store a tree in the database.
    fn add_tree(&self, tree: &TigerTree) -> Result<()>;

    /// Load raw tree leaves from `tree_path`, validate them against
    /// `file_size`, and store the resulting tree.
    fn load_tree(&self, tree_path: &str, file_size: u64) -> Result<TigerTree>;

    /// Remove a stored tree. Returns whether one existed.
    fn remove_tree(&self, tth: &Tth) -> Result<bool>;

    /// Human-readable database statistics.
    fn db_info(&self) -> String;
}

// ---------------------------------------------------------------------------
// Download queue
// ---------------------------------------------------------------------------

/// Download queue counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueInfo {
    pub files: usize,
    pub running: usize,
    pub directories: usize,
}

/// What to do with a partial file list requested for a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRequest {
    /// Match the listing against the download queue.
    MatchQueue,
    /// Queue the whole directory for download.
    Download,
}

/// Abstraction over the download queue.
pub trait QueueService {
    fn save(&self) -> Result<()>;

    fn info(&self) -> QueueInfo;

    /// Request a partial file list of `dir` from `user`.
    fn add_directory(&self, user: &OnlineUser, dir: &str, request: DirectoryRequest) -> Result<()>;
}

// ---------------------------------------------------------------------------
// DHT
// ---------------------------------------------------------------------------

/// DHT status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhtInfo {
    pub port: u16,
    pub external_ip: String,
    pub firewalled: bool,
    pub connected: bool,
    pub state: u32,
    pub node_count: usize,
}

/// A DHT routing table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhtNode {
    pub cid: Cid,
    pub nick: String,
    pub ip: Ipv4Addr,
    pub udp_port: u16,
    /// Seconds until expiry, `None` if the node never expires.
    pub expires_in: Option<u64>,
    pub node_type: u32,
    pub verified: bool,
}

/// Abstraction over the DHT node.
pub trait DhtService {
    fn info(&self) -> DhtInfo;

    fn nodes(&self) -> Vec<DhtNode>;

    fn find_file(&self, tth: &Tth);

    fn find_node(&self, cid: &Cid);

    /// Ping a known node. Returns `false` if the node is not in the table.
    fn ping_node(&self, cid: &Cid) -> bool;

    /// Announce a shared file. Returns `false` if publishing is unavailable.
    fn publish_file(&self, tth: &Tth, size: u64) -> bool;
}

// ---------------------------------------------------------------------------
// Connection manager
// ---------------------------------------------------------------------------

/// Abstraction over the user connection manager's diagnostic dumps.
/// Every method returns an empty string when there is nothing to show.
pub trait ConnectionService {
    fn user_connections(&self) -> String;

    fn expected_connections(&self) -> String;

    fn tokens(&self) -> String;
}

// ---------------------------------------------------------------------------
// IP bans
// ---------------------------------------------------------------------------

/// Which protocol's ban list to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanList {
    Tcp,
    Udp,
}

/// Abstraction over the automatic IP ban lists.
pub trait IpBanService {
    /// Listing of current bans across both lists; empty if none.
    fn info(&self) -> String;

    fn remove_ban(&self, list: BanList, addr: SocketAddr);

    /// Mark or unmark an address as never to be banned.
    fn protect(&self, list: BanList, addr: SocketAddr, protect: bool);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user currently online on some hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineUser {
    pub nick: String,
    pub cid: Cid,
    pub hub_url: String,
}

/// An extra upload slot granted to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedSlot {
    pub nick: String,
    pub cid: Cid,
    pub seconds_left: u64,
}

/// Transfer totals for one IP address of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpTransfer {
    pub ip: String,
    pub downloaded: u64,
    pub uploaded: u64,
}

/// Stored statistics for a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserStats {
    pub last_ip: Option<String>,
    pub message_count: u64,
    /// `(nick, hub)` pairs the user was seen with.
    pub nicks: Vec<(String, String)>,
    pub transfers: Vec<IpTransfer>,
}

/// Abstraction over the client, user and upload managers.
pub trait UserService {
    /// Derive the CID a NMDC user would have on `hub_url`.
    fn make_cid(&self, nick: &str, hub_url: &str) -> Cid;

    /// Find an online user by CID, limited to `hub_url` when it is non-empty.
    fn find_online(&self, cid: &Cid, hub_url: &str) -> Option<OnlineUser>;

    /// Identity report for an online user.
    fn report(&self, user: &OnlineUser) -> String;

    /// Request the full file list.
    fn get_list(&self, user: &OnlineUser) -> Result<()>;

    fn ignore_list(&self) -> Vec<String>;

    fn reserved_slots(&self) -> Vec<ReservedSlot>;

    fn stats(&self, cid: &Cid) -> Result<Option<UserStats>>;

    fn remove_stats(&self, cid: &Cid) -> Result<()>;

    /// Write pending ratio counters to the database.
    fn flush_ratio(&self);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Abstraction over the mutable client settings touched by commands.
pub trait SettingsService {
    fn set_slots(&self, slots: u32);

    fn set_extra_slots(&self, slots: u32);

    fn set_small_file_size(&self, kib: u32);

    fn is_away(&self) -> bool;

    fn set_away(&self, away: bool, message: &str);

    /// Flip transfer rate limiting. Returns the new state.
    fn toggle_throttle(&self) -> bool;
}

// ---------------------------------------------------------------------------
// System information
// ---------------------------------------------------------------------------

/// Lifetime transfer totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalRatio {
    pub upload: u64,
    pub download: u64,
}

/// Abstraction over client and host information reports.
pub trait SystemInfoService {
    fn version(&self) -> String;

    fn uptime(&self) -> String;

    fn system(&self) -> String;

    fn speed(&self) -> String;

    fn cpu(&self) -> String;

    fn disk_space(&self) -> String;

    fn storage(&self) -> String;

    fn stats(&self) -> String;

    fn ratio(&self) -> Result<GlobalRatio>;
}

// ---------------------------------------------------------------------------
// Geo-IP
// ---------------------------------------------------------------------------

/// Location resolved for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub location: String,
}

/// Abstraction over the geo-IP and P2P Guard databases.
pub trait GeoIpService {
    fn locate(&self, ip: IpAddr) -> Option<Location>;

    fn p2p_guard(&self, ip: Ipv4Addr) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// IP protocol version for an external address test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

/// Abstraction over connectivity checks and ad-hoc HTTP downloads.
///
/// `frame_id` identifies the chat window that asked, so asynchronous
/// completions can report back to it.
pub trait NetworkService {
    fn has_ipv6(&self) -> bool;

    /// Start an external IP test. Returns a status line, or `None` if the
    /// test could not be started.
    fn run_ip_test(&self, version: IpVersion, frame_id: u64) -> Option<String>;

    /// Start an HTTP GET. Returns the request id, or `None` on failure.
    fn start_http_request(&self, url: &str, frame_id: u64) -> Option<u64>;
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Debug switches and dumps.
pub trait DiagnosticsService {
    /// Flip suppression of incoming user connections. Returns the new state.
    fn toggle_suppress_user_connections(&self) -> bool;

    /// Flip the "partial list uploads disabled" switch. Returns the new state.
    fn toggle_partial_list_uploads(&self) -> bool;

    /// Collected unknown protocol tags; empty if none.
    fn unknown_tags(&self) -> String;
}

// ---------------------------------------------------------------------------
// Aggregate access
// ---------------------------------------------------------------------------

/// Access to every subsystem a handler may call. Absent subsystems return
/// `None` and the handler reports them as unavailable.
pub trait Core {
    fn share(&self) -> Option<&dyn ShareService> {
        None
    }
    fn hash_db(&self) -> Option<&dyn HashDatabase> {
        None
    }
    fn queue(&self) -> Option<&dyn QueueService> {
        None
    }
    fn dht(&self) -> Option<&dyn DhtService> {
        None
    }
    fn connections(&self) -> Option<&dyn ConnectionService> {
        None
    }
    fn ip_bans(&self) -> Option<&dyn IpBanService> {
        None
    }
    fn users(&self) -> Option<&dyn UserService> {
        None
    }
    fn settings(&self) -> Option<&dyn SettingsService> {
        None
    }
    fn system(&self) -> Option<&dyn SystemInfoService> {
        None
    }
    fn geoip(&self) -> Option<&dyn GeoIpService> {
        None
    }
    fn network(&self) -> Option<&dyn NetworkService> {
        None
    }
    fn diagnostics(&self) -> Option<&dyn DiagnosticsService> {
        None
    }
}

/// A core that provides no subsystems.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCore;

impl Core for NullCore {}
