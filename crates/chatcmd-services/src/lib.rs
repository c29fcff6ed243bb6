//! Client subsystems seen by the command interpreter.
//!
//! Handlers never talk to a subsystem directly; they go through the narrow
//! traits in [`services`], reached via a [`Core`]. [`MemoryCore`] implements
//! all of them in memory for tests and the headless shell.

pub mod memory;
pub mod services;

pub use memory::MemoryCore;
pub use services::{
    BanList, BloomInfo, ConnectionService, Core, DhtInfo, DhtNode, DhtService, DiagnosticsService,
    DirectoryRequest, GeoIpService, GlobalRatio, HashDatabase, HashEntry, IpBanService,
    IpTransfer, IpVersion, Location, NetworkService, NullCore, OnlineUser, QueueInfo,
    QueueService, ReservedSlot, SettingsService, ShareService, SharedFile, SystemInfoService,
    TigerTree, UserService, UserStats,
};
