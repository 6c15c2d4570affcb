//! # Protocol Table
//!
//! The subset of the multiaddr protocol table that transfer addresses use,
//! plus the private-use `urlescape` entry. Codes are the multicodec values,
//! so a stack built here lines up with what other multiaddr implementations
//! report for the same text.

use std::fmt;

use crate::config::{URLESCAPE_PROTOCOL_CODE, URLESCAPE_PROTOCOL_NAME};

/// Shape of the value a protocol component carries in text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Bare marker, e.g. `/http`.
    None,
    /// Exactly one path segment, e.g. `/tcp/443`.
    Single,
    /// Everything that follows, e.g. `/unix/var/run/socket`.
    Path,
}

/// A protocol that may appear in an [`AddressStack`](super::AddressStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ip4,
    Ip6,
    Ip6Zone,
    Dns,
    Dns4,
    Dns6,
    Dnsaddr,
    Tcp,
    Udp,
    Tls,
    Sni,
    Http,
    Https,
    Ws,
    Wss,
    Quic,
    QuicV1,
    P2p,
    Unix,
    /// URL-escaped HTTP path (private-use code).
    UrlEscape,
}

impl Protocol {
    /// Every protocol in the table, in code order.
    pub const ALL: [Protocol; 20] = [
        Protocol::Ip4,
        Protocol::Tcp,
        Protocol::Ip6,
        Protocol::Ip6Zone,
        Protocol::Dns,
        Protocol::Dns4,
        Protocol::Dns6,
        Protocol::Dnsaddr,
        Protocol::Udp,
        Protocol::Unix,
        Protocol::P2p,
        Protocol::Https,
        Protocol::Tls,
        Protocol::Sni,
        Protocol::Quic,
        Protocol::QuicV1,
        Protocol::Ws,
        Protocol::Wss,
        Protocol::Http,
        Protocol::UrlEscape,
    ];

    /// Multicodec code.
    pub const fn code(self) -> u32 {
        match self {
            Protocol::Ip4 => 0x04,
            Protocol::Tcp => 0x06,
            Protocol::Ip6 => 0x29,
            Protocol::Ip6Zone => 0x2a,
            Protocol::Dns => 0x35,
            Protocol::Dns4 => 0x36,
            Protocol::Dns6 => 0x37,
            Protocol::Dnsaddr => 0x38,
            Protocol::Udp => 0x0111,
            Protocol::Unix => 0x0190,
            Protocol::P2p => 0x01a5,
            Protocol::Https => 0x01bb,
            Protocol::Tls => 0x01c0,
            Protocol::Sni => 0x01c1,
            Protocol::Quic => 0x01cc,
            Protocol::QuicV1 => 0x01cd,
            Protocol::Ws => 0x01dd,
            Protocol::Wss => 0x01de,
            Protocol::Http => 0x01e0,
            Protocol::UrlEscape => URLESCAPE_PROTOCOL_CODE,
        }
    }

    /// Name used in the text form.
    pub const fn name(self) -> &'static str {
        match self {
            Protocol::Ip4 => "ip4",
            Protocol::Tcp => "tcp",
            Protocol::Ip6 => "ip6",
            Protocol::Ip6Zone => "ip6zone",
            Protocol::Dns => "dns",
            Protocol::Dns4 => "dns4",
            Protocol::Dns6 => "dns6",
            Protocol::Dnsaddr => "dnsaddr",
            Protocol::Udp => "udp",
            Protocol::Unix => "unix",
            Protocol::P2p => "p2p",
            Protocol::Https => "https",
            Protocol::Tls => "tls",
            Protocol::Sni => "sni",
            Protocol::Quic => "quic",
            Protocol::QuicV1 => "quic-v1",
            Protocol::Ws => "ws",
            Protocol::Wss => "wss",
            Protocol::Http => "http",
            Protocol::UrlEscape => URLESCAPE_PROTOCOL_NAME,
        }
    }

    pub const fn value_kind(self) -> ValueKind {
        match self {
            Protocol::Ip4
            | Protocol::Ip6
            | Protocol::Ip6Zone
            | Protocol::Dns
            | Protocol::Dns4
            | Protocol::Dns6
            | Protocol::Dnsaddr
            | Protocol::Tcp
            | Protocol::Udp
            | Protocol::Sni
            | Protocol::P2p
            | Protocol::UrlEscape => ValueKind::Single,
            Protocol::Unix => ValueKind::Path,
            Protocol::Tls
            | Protocol::Http
            | Protocol::Https
            | Protocol::Ws
            | Protocol::Wss
            | Protocol::Quic
            | Protocol::QuicV1 => ValueKind::None,
        }
    }

    /// Look up a protocol by its text name. `ipfs` is accepted as the legacy
    /// spelling of `p2p`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "ipfs" {
            return Some(Protocol::P2p);
        }
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Network-layer protocols that can start a dialable address.
    pub const fn is_host(self) -> bool {
        matches!(
            self,
            Protocol::Ip4 | Protocol::Ip6 | Protocol::Dns | Protocol::Dns4 | Protocol::Dns6
        )
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
