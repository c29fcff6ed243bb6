//! In-memory core implementation.
//!
//! Useful for unit tests and the headless shell. Every subsystem keeps its
//! state in plain collections seeded through `with_*` builders, and each
//! mutating call is appended to a call log that tests can inspect.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chatcmd_types::error::{ChatError, Result};
use chatcmd_types::literal::{Cid, HASH_BYTES, Tth};

use crate::services::{
    BanList, BloomInfo, ConnectionService, Core, DhtInfo, DhtNode, DhtService,
    DiagnosticsService, DirectoryRequest, GeoIpService, GlobalRatio, HashDatabase, HashEntry,
    IpBanService, IpVersion, Location, NetworkService, OnlineUser, QueueInfo, QueueService,
    ReservedSlot, SettingsService, ShareService, SharedFile, SystemInfoService, TigerTree,
    UserService, UserStats,
};

#[derive(Debug, Clone)]
struct Ban {
    list: BanList,
    addr: SocketAddr,
    protected: bool,
}

/// A fully in-memory client core.
#[derive(Debug)]
pub struct MemoryCore {
    calls: RefCell<Vec<String>>,
    shared_dirs: Vec<String>,
    shared: RefCell<BTreeMap<Tth, SharedFile>>,
    disk: BTreeMap<String, TigerTree>,
    trees: RefCell<BTreeMap<Tth, HashEntry>>,
    hash_db_online: bool,
    queue: RefCell<QueueInfo>,
    dht_nodes: Vec<DhtNode>,
    users: Vec<OnlineUser>,
    ignored: Vec<String>,
    reserved: Vec<ReservedSlot>,
    user_stats: RefCell<BTreeMap<Cid, UserStats>>,
    bans: RefCell<Vec<Ban>>,
    slots: Cell<u32>,
    extra_slots: Cell<u32>,
    small_file_size: Cell<u32>,
    away: Cell<bool>,
    away_message: RefCell<String>,
    throttle: Cell<bool>,
    ratio: GlobalRatio,
    locations: BTreeMap<IpAddr, Location>,
    p2p_guard: BTreeMap<Ipv4Addr, String>,
    ipv6: bool,
    next_http_id: Cell<u64>,
    suppress_user_conn: Cell<bool>,
    partial_disabled: Cell<bool>,
    unknown_tags: String,
}

impl MemoryCore {
    /// Create an empty core with every subsystem online.
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            shared_dirs: Vec::new(),
            shared: RefCell::new(BTreeMap::new()),
            disk: BTreeMap::new(),
            trees: RefCell::new(BTreeMap::new()),
            hash_db_online: true,
            queue: RefCell::new(QueueInfo::default()),
            dht_nodes: Vec::new(),
            users: Vec::new(),
            ignored: Vec::new(),
            reserved: Vec::new(),
            user_stats: RefCell::new(BTreeMap::new()),
            bans: RefCell::new(Vec::new()),
            slots: Cell::new(2),
            extra_slots: Cell::new(3),
            small_file_size: Cell::new(64),
            away: Cell::new(false),
            away_message: RefCell::new(String::new()),
            throttle: Cell::new(false),
            ratio: GlobalRatio::default(),
            locations: BTreeMap::new(),
            p2p_guard: BTreeMap::new(),
            ipv6: false,
            next_http_id: Cell::new(1),
            suppress_user_conn: Cell::new(false),
            partial_disabled: Cell::new(false),
            unknown_tags: String::new(),
        }
    }

    // -- Builders --

    pub fn with_shared_dir(mut self, dir: &str) -> Self {
        self.shared_dirs.push(dir.to_string());
        self
    }

    /// A file on disk that `hash_file`/`load_tree` can find.
    pub fn with_disk_file(mut self, path: &str, root: Tth, file_size: u64) -> Self {
        self.disk.insert(path.to_string(), TigerTree { root, file_size });
        self
    }

    pub fn with_shared_file(self, path: &str, tth: Tth, size: u64) -> Self {
        self.shared.borrow_mut().insert(
            tth,
            SharedFile {
                path: path.to_string(),
                size,
            },
        );
        self
    }

    pub fn with_tree(self, tth: Tth, entry: HashEntry) -> Self {
        self.trees.borrow_mut().insert(tth, entry);
        self
    }

    /// Make every hash database query fail.
    pub fn with_hash_db_offline(mut self) -> Self {
        self.hash_db_online = false;
        self
    }

    pub fn with_queue(self, info: QueueInfo) -> Self {
        *self.queue.borrow_mut() = info;
        self
    }

    pub fn with_dht_node(mut self, node: DhtNode) -> Self {
        self.dht_nodes.push(node);
        self
    }

    pub fn with_online_user(mut self, user: OnlineUser) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_ignored(mut self, nick: &str) -> Self {
        self.ignored.push(nick.to_string());
        self
    }

    pub fn with_reserved_slot(mut self, slot: ReservedSlot) -> Self {
        self.reserved.push(slot);
        self
    }

    pub fn with_user_stats(self, cid: Cid, stats: UserStats) -> Self {
        self.user_stats.borrow_mut().insert(cid, stats);
        self
    }

    pub fn with_ban(self, list: BanList, addr: SocketAddr) -> Self {
        self.bans.borrow_mut().push(Ban {
            list,
            addr,
            protected: false,
        });
        self
    }

    pub fn with_ratio(mut self, ratio: GlobalRatio) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_location(mut self, ip: IpAddr, location: Location) -> Self {
        self.locations.insert(ip, location);
        self
    }

    pub fn with_p2p_guard(mut self, ip: Ipv4Addr, text: &str) -> Self {
        self.p2p_guard.insert(ip, text.to_string());
        self
    }

    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    pub fn with_unknown_tags(mut self, tags: &str) -> Self {
        self.unknown_tags = tags.to_string();
        self
    }

    // -- Inspection --

    /// Mutating calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn slots(&self) -> u32 {
        self.slots.get()
    }

    pub fn extra_slots(&self) -> u32 {
        self.extra_slots.get()
    }

    pub fn small_file_size(&self) -> u32 {
        self.small_file_size.get()
    }

    pub fn has_tree(&self, tth: &Tth) -> bool {
        self.trees.borrow().contains_key(tth)
    }

    pub fn is_protected(&self, list: BanList, addr: SocketAddr) -> bool {
        self.bans
            .borrow()
            .iter()
            .any(|b| b.list == list && b.addr == addr && b.protected)
    }

    pub fn ban_count(&self) -> usize {
        self.bans.borrow().len()
    }

    fn record(&self, call: String) {
        log::trace!("memory core: {call}");
        self.calls.borrow_mut().push(call);
    }

    fn require_db(&self) -> Result<()> {
        if self.hash_db_online {
            Ok(())
        } else {
            Err(ChatError::Handler("Hash database unavailable".to_string()))
        }
    }
}

impl Default for MemoryCore {
    fn default() -> Self {
        Self::new()
    }
}

/// FNV-1a, used to derive stable CIDs for nick/hub pairs.
fn fnv1a(seed: u64, data: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325 ^ seed;
    for &b in data {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl ShareService for MemoryCore {
    fn refresh(&self) -> Result<()> {
        self.record("share.refresh".to_string());
        Ok(())
    }

    fn generate_file_list(&self) -> Result<()> {
        self.record("share.generate_file_list".to_string());
        Ok(())
    }

    fn is_directory_shared(&self, dir: &str) -> bool {
        self.shared_dirs
            .iter()
            .any(|d| dir.starts_with(d.as_str()))
    }

    fn add_file(&self, path: &str, tth: &Tth, size: u64) -> Result<()> {
        self.record(format!("share.add_file {path}"));
        self.shared.borrow_mut().insert(
            *tth,
            SharedFile {
                path: path.to_string(),
                size,
            },
        );
        Ok(())
    }

    fn file_info(&self, tth: &Tth) -> Option<SharedFile> {
        self.shared.borrow().get(tth).cloned()
    }

    fn bloom_info(&self) -> BloomInfo {
        BloomInfo {
            size: 1024,
            used: self.shared.borrow().len(),
        }
    }

    fn match_bloom(&self, text: &str) -> bool {
        self.shared
            .borrow()
            .values()
            .any(|f| f.path.to_lowercase().contains(text))
    }
}

impl HashDatabase for MemoryCore {
    fn file_info(&self, tth: &Tth) -> Result<Option<HashEntry>> {
        self.require_db()?;
        Ok(self.trees.borrow().get(tth).cloned())
    }

    fn hash_file(&self, path: &str) -> Result<TigerTree> {
        self.disk
            .get(path)
            .copied()
            .ok_or_else(|| ChatError::Handler(format!("File not found: {path}")))
    }

    fn add_tree(&self, tree: &TigerTree) -> Result<()> {
        self.require_db()?;
        self.record(format!("hash_db.add_tree {}", tree.root));
        self.trees.borrow_mut().insert(
            tree.root,
            HashEntry {
                flags: 0,
                path: None,
                tree_size: tree.file_size,
            },
        );
        Ok(())
    }

    fn load_tree(&self, tree_path: &str, file_size: u64) -> Result<TigerTree> {
        let stored = self.hash_file(tree_path)?;
        if file_size == 0 {
            return Err(ChatError::Handler("Invalid file size".to_string()));
        }
        let tree = TigerTree {
            root: stored.root,
            file_size,
        };
        self.add_tree(&tree)?;
        Ok(tree)
    }

    fn remove_tree(&self, tth: &Tth) -> Result<bool> {
        self.require_db()?;
        self.record(format!("hash_db.remove_tree {tth}"));
        Ok(self.trees.borrow_mut().remove(tth).is_some())
    }

    fn db_info(&self) -> String {
        format!("Hash database: {} trees", self.trees.borrow().len())
    }
}

impl QueueService for MemoryCore {
    fn save(&self) -> Result<()> {
        self.record("queue.save".to_string());
        Ok(())
    }

    fn info(&self) -> QueueInfo {
        *self.queue.borrow()
    }

    fn add_directory(&self, user: &OnlineUser, dir: &str, request: DirectoryRequest) -> Result<()> {
        self.record(format!("queue.add_directory {} {dir} {request:?}", user.nick));
        self.queue.borrow_mut().directories += 1;
        Ok(())
    }
}

impl DhtService for MemoryCore {
    fn info(&self) -> DhtInfo {
        DhtInfo {
            port: 6250,
            external_ip: "203.0.113.7".to_string(),
            firewalled: false,
            connected: !self.dht_nodes.is_empty(),
            state: 0,
            node_count: self.dht_nodes.len(),
        }
    }

    fn nodes(&self) -> Vec<DhtNode> {
        self.dht_nodes.clone()
    }

    fn find_file(&self, tth: &Tth) {
        self.record(format!("dht.find_file {tth}"));
    }

    fn find_node(&self, cid: &Cid) {
        self.record(format!("dht.find_node {cid}"));
    }

    fn ping_node(&self, cid: &Cid) -> bool {
        self.record(format!("dht.ping_node {cid}"));
        self.dht_nodes.iter().any(|n| n.cid == *cid)
    }

    fn publish_file(&self, tth: &Tth, size: u64) -> bool {
        self.record(format!("dht.publish_file {tth} {size}"));
        true
    }
}

impl ConnectionService for MemoryCore {
    fn user_connections(&self) -> String {
        String::new()
    }

    fn expected_connections(&self) -> String {
        String::new()
    }

    fn tokens(&self) -> String {
        String::new()
    }
}

impl IpBanService for MemoryCore {
    fn info(&self) -> String {
        let bans = self.bans.borrow();
        let mut out = String::new();
        for ban in bans.iter() {
            let proto = match ban.list {
                BanList::Tcp => "TCP",
                BanList::Udp => "UDP",
            };
            out.push_str(&format!("{proto} {}", ban.addr));
            if ban.protected {
                out.push_str(" (protected)");
            }
            out.push('\n');
        }
        out
    }

    fn remove_ban(&self, list: BanList, addr: SocketAddr) {
        self.record(format!("ip_bans.remove {list:?} {addr}"));
        self.bans
            .borrow_mut()
            .retain(|b| !(b.list == list && b.addr == addr));
    }

    fn protect(&self, list: BanList, addr: SocketAddr, protect: bool) {
        self.record(format!("ip_bans.protect {list:?} {addr} {protect}"));
        let mut bans = self.bans.borrow_mut();
        match bans.iter_mut().find(|b| b.list == list && b.addr == addr) {
            Some(ban) => ban.protected = protect,
            None if protect => bans.push(Ban {
                list,
                addr,
                protected: true,
            }),
            None => {},
        }
    }
}

impl UserService for MemoryCore {
    fn make_cid(&self, nick: &str, hub_url: &str) -> Cid {
        let mut key = Vec::with_capacity(nick.len() + hub_url.len() + 1);
        key.extend_from_slice(nick.as_bytes());
        key.push(0);
        key.extend_from_slice(hub_url.as_bytes());
        let mut bytes = [0u8; HASH_BYTES];
        for (i, chunk) in bytes.chunks_mut(8).enumerate() {
            let h = fnv1a(i as u64, &key).to_be_bytes();
            chunk.copy_from_slice(&h[..chunk.len()]);
        }
        bytes[0] |= 1;
        Cid(bytes)
    }

    fn find_online(&self, cid: &Cid, hub_url: &str) -> Option<OnlineUser> {
        self.users
            .iter()
            .find(|u| u.cid == *cid && (hub_url.is_empty() || u.hub_url == hub_url))
            .cloned()
    }

    fn report(&self, user: &OnlineUser) -> String {
        format!(
            "Nick: {}\nCID: {}\nHub: {}",
            user.nick, user.cid, user.hub_url
        )
    }

    fn get_list(&self, user: &OnlineUser) -> Result<()> {
        self.record(format!("users.get_list {}", user.nick));
        Ok(())
    }

    fn ignore_list(&self) -> Vec<String> {
        self.ignored.clone()
    }

    fn reserved_slots(&self) -> Vec<ReservedSlot> {
        self.reserved.clone()
    }

    fn stats(&self, cid: &Cid) -> Result<Option<UserStats>> {
        self.require_db()?;
        Ok(self.user_stats.borrow().get(cid).cloned())
    }

    fn remove_stats(&self, cid: &Cid) -> Result<()> {
        self.require_db()?;
        self.record(format!("users.remove_stats {cid}"));
        self.user_stats.borrow_mut().remove(cid);
        Ok(())
    }

    fn flush_ratio(&self) {
        self.record("users.flush_ratio".to_string());
    }
}

impl SettingsService for MemoryCore {
    fn set_slots(&self, slots: u32) {
        self.record(format!("settings.slots {slots}"));
        self.slots.set(slots);
    }

    fn set_extra_slots(&self, slots: u32) {
        self.record(format!("settings.extra_slots {slots}"));
        self.extra_slots.set(slots);
    }

    fn set_small_file_size(&self, kib: u32) {
        self.record(format!("settings.small_file_size {kib}"));
        self.small_file_size.set(kib);
    }

    fn is_away(&self) -> bool {
        self.away.get()
    }

    fn set_away(&self, away: bool, message: &str) {
        self.record(format!("settings.away {away}"));
        self.away.set(away);
        *self.away_message.borrow_mut() = message.to_string();
    }

    fn toggle_throttle(&self) -> bool {
        let enabled = !self.throttle.get();
        self.record(format!("settings.throttle {enabled}"));
        self.throttle.set(enabled);
        enabled
    }
}

impl SystemInfoService for MemoryCore {
    fn version(&self) -> String {
        format!("chatcmd {}", env!("CARGO_PKG_VERSION"))
    }

    fn uptime(&self) -> String {
        "+me Uptime: 0 min".to_string()
    }

    fn system(&self) -> String {
        format!("+me systeminfo: {} {}", std::env::consts::OS, std::env::consts::ARCH)
    }

    fn speed(&self) -> String {
        "My Speed:\nDownload: 0 B/s\nUpload: 0 B/s".to_string()
    }

    fn cpu(&self) -> String {
        "My CPU: unknown".to_string()
    }

    fn disk_space(&self) -> String {
        "My Disk Space:\nunknown".to_string()
    }

    fn storage(&self) -> String {
        "My Disks:\nunknown".to_string()
    }

    fn stats(&self) -> String {
        format!("Shared files: {}", self.shared.borrow().len())
    }

    fn ratio(&self) -> Result<GlobalRatio> {
        self.require_db()?;
        Ok(self.ratio)
    }
}

impl GeoIpService for MemoryCore {
    fn locate(&self, ip: IpAddr) -> Option<Location> {
        self.locations.get(&ip).cloned()
    }

    fn p2p_guard(&self, ip: Ipv4Addr) -> Option<String> {
        self.p2p_guard.get(&ip).cloned()
    }
}

impl NetworkService for MemoryCore {
    fn has_ipv6(&self) -> bool {
        self.ipv6
    }

    fn run_ip_test(&self, version: IpVersion, frame_id: u64) -> Option<String> {
        self.record(format!("network.ip_test {version:?} frame={frame_id}"));
        match version {
            IpVersion::V4 => Some("Checking IPv4 address...".to_string()),
            IpVersion::V6 if self.ipv6 => Some("Checking IPv6 address...".to_string()),
            IpVersion::V6 => None,
        }
    }

    fn start_http_request(&self, url: &str, frame_id: u64) -> Option<u64> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return None;
        }
        let id = self.next_http_id.get();
        self.next_http_id.set(id + 1);
        self.record(format!("network.http_get {url} frame={frame_id}"));
        Some(id)
    }
}

impl DiagnosticsService for MemoryCore {
    fn toggle_suppress_user_connections(&self) -> bool {
        let v = !self.suppress_user_conn.get();
        self.suppress_user_conn.set(v);
        v
    }

    fn toggle_partial_list_uploads(&self) -> bool {
        let v = !self.partial_disabled.get();
        self.partial_disabled.set(v);
        v
    }

    fn unknown_tags(&self) -> String {
        self.unknown_tags.clone()
    }
}

impl Core for MemoryCore {
    fn share(&self) -> Option<&dyn ShareService> {
        Some(self)
    }
    fn hash_db(&self) -> Option<&dyn HashDatabase> {
        Some(self)
    }
    fn queue(&self) -> Option<&dyn QueueService> {
        Some(self)
    }
    fn dht(&self) -> Option<&dyn DhtService> {
        Some(self)
    }
    fn connections(&self) -> Option<&dyn ConnectionService> {
        Some(self)
    }
    fn ip_bans(&self) -> Option<&dyn IpBanService> {
        Some(self)
    }
    fn users(&self) -> Option<&dyn UserService> {
        Some(self)
    }
    fn settings(&self) -> Option<&dyn SettingsService> {
        Some(self)
    }
    fn system(&self) -> Option<&dyn SystemInfoService> {
        Some(self)
    }
    fn geoip(&self) -> Option<&dyn GeoIpService> {
        Some(self)
    }
    fn network(&self) -> Option<&dyn NetworkService> {
        Some(self)
    }
    fn diagnostics(&self) -> Option<&dyn DiagnosticsService> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tth(byte: u8) -> Tth {
        Tth([byte; HASH_BYTES])
    }

    #[test]
    fn make_cid_is_stable_and_nonzero() {
        let core = MemoryCore::new();
        let a = core.make_cid("john", "dchub://example.org");
        let b = core.make_cid("john", "dchub://example.org");
        let c = core.make_cid("john", "dchub://other.org");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
    }

    #[test]
    fn add_file_then_lookup() {
        let core = MemoryCore::new();
        core.add_file("/share/a.txt", &tth(1), 10).unwrap();
        let info = ShareService::file_info(&core, &tth(1)).unwrap();
        assert_eq!(info.path, "/share/a.txt");
        assert_eq!(core.calls(), vec!["share.add_file /share/a.txt"]);
    }

    #[test]
    fn offline_hash_db_fails_queries() {
        let core = MemoryCore::new().with_hash_db_offline();
        assert!(HashDatabase::file_info(&core, &tth(1)).is_err());
        assert!(core.remove_tree(&tth(1)).is_err());
    }

    #[test]
    fn protect_inserts_missing_entry() {
        let core = MemoryCore::new();
        let addr: SocketAddr = "10.0.0.1:411".parse().unwrap();
        core.protect(BanList::Udp, addr, true);
        assert!(core.is_protected(BanList::Udp, addr));
        assert!(!core.is_protected(BanList::Tcp, addr));
    }

    #[test]
    fn remove_ban_only_touches_matching_list() {
        let addr: SocketAddr = "10.0.0.1:411".parse().unwrap();
        let core = MemoryCore::new()
            .with_ban(BanList::Tcp, addr)
            .with_ban(BanList::Udp, addr);
        core.remove_ban(BanList::Tcp, addr);
        assert_eq!(core.ban_count(), 1);
        assert!(IpBanService::info(&core).starts_with("UDP"));
    }

    #[test]
    fn throttle_toggles() {
        let core = MemoryCore::new();
        assert!(core.toggle_throttle());
        assert!(!core.toggle_throttle());
    }

    #[test]
    fn http_rejects_non_http_urls() {
        let core = MemoryCore::new();
        assert_eq!(core.start_http_request("ftp://x", 0), None);
        assert_eq!(core.start_http_request("http://x", 0), Some(1));
        assert_eq!(core.start_http_request("https://y", 0), Some(2));
    }
}
