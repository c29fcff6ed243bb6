//! Typed command-line literals: content hashes, client ids, IP addresses,
//! and lenient integers.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::{ChatError, Result};
use crate::messages::Msg;

/// Size in bytes of a Tiger hash and of a client identifier.
pub const HASH_BYTES: usize = 24;

/// Length of a base-32 encoded [`HASH_BYTES`] value.
pub const BASE32_LEN: usize = 39;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Which kind of typed argument failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    IpAddress,
    Tth,
    Cid,
    SlotCount,
    SmallFileSize,
    Number,
}

impl LiteralKind {
    /// Catalog key for the "invalid literal" message of this kind.
    pub fn message(self) -> Msg {
        match self {
            LiteralKind::IpAddress => Msg::InvalidIp,
            LiteralKind::Tth => Msg::InvalidTth,
            LiteralKind::Cid => Msg::InvalidCid,
            LiteralKind::SlotCount => Msg::InvalidSlots,
            LiteralKind::SmallFileSize => Msg::InvalidSize,
            LiteralKind::Number => Msg::InvalidNumber,
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LiteralKind::IpAddress => "IP address",
            LiteralKind::Tth => "TTH",
            LiteralKind::Cid => "CID",
            LiteralKind::SlotCount => "number of slots",
            LiteralKind::SmallFileSize => "size",
            LiteralKind::Number => "number",
        })
    }
}

/// Tiger tree hash root of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tth(pub [u8; HASH_BYTES]);

impl Tth {
    pub fn to_base32(&self) -> String {
        encode_base32(&self.0)
    }
}

impl FromStr for Tth {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        decode_hash(s)
            .map(Tth)
            .ok_or(ChatError::InvalidLiteral(LiteralKind::Tth))
    }
}

impl fmt::Display for Tth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base32())
    }
}

/// Client identifier. The all-zero value is reserved and never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(pub [u8; HASH_BYTES]);

impl Cid {
    pub fn to_base32(&self) -> String {
        encode_base32(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl FromStr for Cid {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        decode_hash(s)
            .map(Cid)
            .filter(|cid| !cid.is_zero())
            .ok_or(ChatError::InvalidLiteral(LiteralKind::Cid))
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base32())
    }
}

fn decode_hash(s: &str) -> Option<[u8; HASH_BYTES]> {
    if s.len() != BASE32_LEN {
        return None;
    }
    let mut out = [0u8; HASH_BYTES];
    decode_base32(s, &mut out).then_some(out)
}

/// Decode base-32 (RFC 4648 alphabet, case-insensitive, no padding) into
/// `out`. Returns `false` on an alphabet violation or if `input` does not
/// fill `out` exactly. Trailing pad bits are ignored.
pub fn decode_base32(input: &str, out: &mut [u8]) -> bool {
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    let mut pos = 0;
    for ch in input.bytes() {
        let v = match ch {
            b'A'..=b'Z' => ch - b'A',
            b'a'..=b'z' => ch - b'a',
            b'2'..=b'7' => ch - b'2' + 26,
            _ => return false,
        };
        buffer = (buffer << 5) | u32::from(v);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            if pos == out.len() {
                return false;
            }
            out[pos] = (buffer >> bits) as u8;
            pos += 1;
            buffer &= (1 << bits) - 1;
        }
    }
    pos == out.len()
}

/// Encode bytes as unpadded upper-case base-32.
pub fn encode_base32(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &b in data {
        buffer = (buffer << 8) | u32::from(b);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 31) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 31) as usize] as char);
    }
    out
}

/// Parse an IPv4 or IPv6 address.
pub fn parse_ip(s: &str) -> Result<IpAddr> {
    s.parse()
        .map_err(|_| ChatError::InvalidLiteral(LiteralKind::IpAddress))
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.parse()
        .map_err(|_| ChatError::InvalidLiteral(LiteralKind::IpAddress))
}

/// Parse `ip:port` (IPv6 in brackets). Port zero is rejected.
pub fn parse_ip_port(s: &str) -> Result<SocketAddr> {
    match s.parse::<SocketAddr>() {
        Ok(addr) if addr.port() != 0 => Ok(addr),
        _ => Err(ChatError::InvalidLiteral(LiteralKind::IpAddress)),
    }
}

/// Lenient integer parse: optional sign and leading digits, anything else
/// stops the scan. Yields 0 when no digits are present; saturates on
/// overflow.
pub fn to_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative { -value } else { value }
}
