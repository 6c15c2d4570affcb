//! # Address Stack
//!
//! An [`AddressStack`] is an ordered list of `(protocol, value)` components,
//! parsed from and rendered to the usual multiaddr text form. Order is kept
//! exactly as given, duplicates included; lookups return the first match.

use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use libp2p::{Multiaddr, PeerId};

use super::error::AddressError;
use super::protocol::{Protocol, ValueKind};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// One `(protocol, value)` entry of an address stack.
///
/// Values are validated and canonicalized on construction: IP literals are
/// re-rendered by the standard library, ports must fit in a `u16`, peer IDs
/// must decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    protocol: Protocol,
    value: Option<String>,
}

impl Component {
    /// Build a validated component.
    ///
    /// # Errors
    ///
    /// [`AddressError::MissingValue`] / [`AddressError::UnexpectedValue`] when
    /// the value's presence doesn't match the protocol, and
    /// [`AddressError::InvalidValue`] when the value itself is malformed.
    pub fn new(protocol: Protocol, value: Option<&str>) -> Result<Self, AddressError> {
        let value = match (protocol.value_kind(), value) {
            (ValueKind::None, None) => None,
            (ValueKind::None, Some(_)) => return Err(AddressError::UnexpectedValue(protocol.name())),
            (_, None) => return Err(AddressError::MissingValue(protocol.name())),
            (_, Some(v)) => Some(canonical_value(protocol, v)?),
        };
        Ok(Self { protocol, value })
    }

    /// A component for a marker protocol such as `http` or `tls`.
    pub fn marker(protocol: Protocol) -> Result<Self, AddressError> {
        Self::new(protocol, None)
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.protocol)?;
        match (&self.value, self.protocol.value_kind()) {
            // Path values already carry their leading slash.
            (Some(v), ValueKind::Path) => write!(f, "{}", v),
            (Some(v), _) => write!(f, "/{}", v),
            (None, _) => Ok(()),
        }
    }
}

fn canonical_value(protocol: Protocol, value: &str) -> Result<String, AddressError> {
    let invalid = |reason: String| AddressError::InvalidValue {
        protocol: protocol.name(),
        value: value.to_string(),
        reason,
    };

    match protocol {
        Protocol::Ip4 => Ipv4Addr::from_str(value)
            .map(|ip| ip.to_string())
            .map_err(|e| invalid(e.to_string())),
        Protocol::Ip6 => Ipv6Addr::from_str(value)
            .map(|ip| ip.to_string())
            .map_err(|e| invalid(e.to_string())),
        Protocol::Tcp | Protocol::Udp => u16::from_str(value)
            .map(|port| port.to_string())
            .map_err(|e| invalid(e.to_string())),
        Protocol::P2p => PeerId::from_str(value)
            .map(|id| id.to_string())
            .map_err(|e| invalid(e.to_string())),
        Protocol::Unix => {
            let trimmed = value.trim_start_matches('/');
            if trimmed.is_empty() {
                return Err(invalid("empty path".to_string()));
            }
            Ok(format!("/{}", trimmed))
        }
        Protocol::UrlEscape => {
            if value.contains('/') {
                return Err(invalid("unescaped '/' in path".to_string()));
            }
            Ok(value.to_string())
        }
        _ => {
            if value.is_empty() {
                return Err(invalid("empty value".to_string()));
            }
            if value.contains('/') {
                return Err(invalid("unexpected '/'".to_string()));
            }
            Ok(value.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Dial Target
// ---------------------------------------------------------------------------

/// The network-layer host at the front of an address stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAddr {
    Ip4(Ipv4Addr),
    Ip6 {
        addr: Ipv6Addr,
        zone: Option<String>,
    },
    /// A DNS name, left unresolved.
    Name(String),
}

impl HostAddr {
    /// Render in URL host syntax: IPv6 literals are bracketed (zones escaped
    /// as `%25`), everything else is left alone.
    pub fn to_url_host(&self) -> String {
        match self {
            HostAddr::Ip4(ip) => ip.to_string(),
            HostAddr::Ip6 { addr, zone: None } => format!("[{}]", addr),
            HostAddr::Ip6 {
                addr,
                zone: Some(zone),
            } => format!("[{}%25{}]", addr, zone),
            HostAddr::Name(name) => name.clone(),
        }
    }
}

/// Host plus optional transport port, extracted from the leading components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialTarget {
    pub host: HostAddr,
    /// `tcp` or `udp`, when a port follows the host.
    pub transport: Option<Protocol>,
    pub port: Option<u16>,
}

impl DialTarget {
    /// `host[:port]`, leaving the port off when it equals `default_port`.
    pub fn authority(&self, default_port: Option<u16>) -> String {
        let host = self.host.to_url_host();
        match self.port {
            Some(port) if Some(port) != default_port => format!("{}:{}", host, port),
            _ => host,
        }
    }
}

impl fmt::Display for DialTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority(None))
    }
}

// ---------------------------------------------------------------------------
// Address Stack
// ---------------------------------------------------------------------------

/// Ordered multi-protocol address.
///
/// # Examples
///
/// ```
/// use dealmarket_protocol::address::{AddressStack, Protocol};
///
/// let stack: AddressStack = "/dns/thing.com/tcp/443/tls/http".parse().unwrap();
/// assert!(stack.contains(Protocol::Tls));
/// assert_eq!(stack.value_for(Protocol::Tcp), Some("443"));
/// assert_eq!(stack.to_string(), "/dns/thing.com/tcp/443/tls/http");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressStack {
    components: Vec<Component>,
}

impl AddressStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated component.
    pub fn push(&mut self, protocol: Protocol, value: Option<&str>) -> Result<(), AddressError> {
        self.components.push(Component::new(protocol, value)?);
        Ok(())
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, protocol: Protocol, value: Option<&str>) -> Result<Self, AddressError> {
        self.push(protocol, value)?;
        Ok(self)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.components.iter().map(Component::protocol)
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.protocols().any(|p| p == protocol)
    }

    /// Value of the first component with this protocol. Markers yield `""`.
    pub fn value_for(&self, protocol: Protocol) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.protocol == protocol)
            .map(|c| c.value().unwrap_or(""))
    }

    /// Code → value for every protocol present; first occurrence wins and
    /// markers map to `""`.
    pub fn value_map(&self) -> HashMap<u32, &str> {
        let mut map = HashMap::with_capacity(self.components.len());
        for c in &self.components {
            map.entry(c.protocol.code()).or_insert(c.value().unwrap_or(""));
        }
        map
    }

    /// Split off a trailing `/p2p/<peer-id>`, returning the transport part
    /// and the peer ID. `None` if the stack doesn't end in a peer ID.
    pub fn split_peer_id(&self) -> Option<(AddressStack, PeerId)> {
        let (last, rest) = self.components.split_last()?;
        if last.protocol != Protocol::P2p {
            return None;
        }
        let peer = PeerId::from_str(last.value()?).ok()?;
        Some((
            AddressStack {
                components: rest.to_vec(),
            },
            peer,
        ))
    }

    /// Extract the host and optional port from the leading components.
    ///
    /// Accepts `ip4`, `ip6` (optionally preceded by `ip6zone`), `dns`, `dns4`
    /// or `dns6`, optionally followed by `tcp` or `udp`. Anything after that
    /// is ignored.
    ///
    /// # Errors
    ///
    /// [`AddressError::NotDialable`] if the stack doesn't start with a host.
    pub fn dial_target(&self) -> Result<DialTarget, AddressError> {
        let not_dialable = || AddressError::NotDialable(self.to_string());
        let mut iter = self.components.iter().peekable();

        let first = iter.next().ok_or_else(not_dialable)?;
        let host = match first.protocol {
            Protocol::Ip6Zone => {
                let zone = first.value().unwrap_or("").to_string();
                let ip6 = iter
                    .next()
                    .filter(|c| c.protocol == Protocol::Ip6)
                    .ok_or_else(not_dialable)?;
                HostAddr::Ip6 {
                    addr: parse_ip6(ip6)?,
                    zone: Some(zone),
                }
            }
            Protocol::Ip4 => {
                let raw = first.value().unwrap_or("");
                HostAddr::Ip4(Ipv4Addr::from_str(raw).map_err(|_| not_dialable())?)
            }
            Protocol::Ip6 => HostAddr::Ip6 {
                addr: parse_ip6(first)?,
                zone: None,
            },
            p if p.is_host() => HostAddr::Name(first.value().unwrap_or("").to_string()),
            _ => return Err(not_dialable()),
        };

        let mut target = DialTarget {
            host,
            transport: None,
            port: None,
        };
        if let Some(next) = iter.peek() {
            if matches!(next.protocol, Protocol::Tcp | Protocol::Udp) {
                let port = next
                    .value()
                    .and_then(|v| u16::from_str(v).ok())
                    .ok_or_else(not_dialable)?;
                target.transport = Some(next.protocol);
                target.port = Some(port);
            }
        }
        Ok(target)
    }
}

fn parse_ip6(component: &Component) -> Result<Ipv6Addr, AddressError> {
    let raw = component.value().unwrap_or("");
    Ipv6Addr::from_str(raw).map_err(|e| AddressError::InvalidValue {
        protocol: Protocol::Ip6.name(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

impl FromIterator<Component> for AddressStack {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl FromStr for AddressStack {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        let body = s
            .strip_prefix('/')
            .ok_or_else(|| AddressError::MissingLeadingSlash(s.to_string()))?
            .trim_end_matches('/');
        if body.is_empty() {
            return Err(AddressError::Empty);
        }

        let mut stack = AddressStack::new();
        let mut segments = body.split('/');
        while let Some(name) = segments.next() {
            let protocol =
                Protocol::from_name(name).ok_or_else(|| AddressError::UnknownProtocol(name.to_string()))?;
            match protocol.value_kind() {
                ValueKind::None => stack.push(protocol, None)?,
                ValueKind::Single => {
                    let value = segments
                        .next()
                        .ok_or(AddressError::MissingValue(protocol.name()))?;
                    stack.push(protocol, Some(value))?;
                }
                ValueKind::Path => {
                    let rest: Vec<&str> = segments.by_ref().collect();
                    if rest.is_empty() {
                        return Err(AddressError::MissingValue(protocol.name()));
                    }
                    stack.push(protocol, Some(&rest.join("/")))?;
                }
            }
        }
        Ok(stack)
    }
}

impl fmt::Display for AddressStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.components {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl TryFrom<&Multiaddr> for AddressStack {
    type Error = AddressError;

    fn try_from(ma: &Multiaddr) -> Result<Self, Self::Error> {
        ma.to_string().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_dns_stack() {
        let stack: AddressStack = "/dns/thing.com/tcp/80/http".parse().unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!(
            stack.protocols().collect::<Vec<_>>(),
            vec![Protocol::Dns, Protocol::Tcp, Protocol::Http]
        );
        assert_eq!(stack.to_string(), "/dns/thing.com/tcp/80/http");
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let stack: AddressStack = "/ip4/10.0.0.1/tcp/80/".parse().unwrap();
        assert_eq!(stack.to_string(), "/ip4/10.0.0.1/tcp/80");
    }

    #[test]
    fn ip6_values_are_canonicalized() {
        let stack: AddressStack = "/ip6/2001:0db8:0000::0001/tcp/8080".parse().unwrap();
        assert_eq!(stack.value_for(Protocol::Ip6), Some("2001:db8::1"));
    }

    #[test]
    fn markers_map_to_empty_value() {
        let stack: AddressStack = "/ip4/1.2.3.4/tcp/443/tls/http".parse().unwrap();
        let map = stack.value_map();
        assert_eq!(map.get(&Protocol::Tls.code()), Some(&""));
        assert_eq!(map.get(&Protocol::Http.code()), Some(&""));
        assert_eq!(map.get(&Protocol::Ip4.code()), Some(&"1.2.3.4"));
        assert!(!map.contains_key(&Protocol::Ws.code()));
    }

    #[test]
    fn first_duplicate_wins_and_order_is_kept() {
        let stack: AddressStack = "/dns/a.example/tcp/1/tcp/2".parse().unwrap();
        assert_eq!(stack.value_for(Protocol::Tcp), Some("1"));
        assert_eq!(stack.value_map().get(&Protocol::Tcp.code()), Some(&"1"));
        assert_eq!(stack.to_string(), "/dns/a.example/tcp/1/tcp/2");
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!("".parse::<AddressStack>(), Err(AddressError::Empty));
        assert_eq!("/".parse::<AddressStack>(), Err(AddressError::Empty));
        assert!(matches!(
            "ip4/1.2.3.4".parse::<AddressStack>(),
            Err(AddressError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            "/carrier-pigeon/7".parse::<AddressStack>(),
            Err(AddressError::UnknownProtocol(_))
        ));
        assert_eq!(
            "/ip4/1.2.3.4/tcp".parse::<AddressStack>(),
            Err(AddressError::MissingValue("tcp"))
        );
        assert!(matches!(
            "/ip4/1.2.3.400".parse::<AddressStack>(),
            Err(AddressError::InvalidValue { protocol: "ip4", .. })
        ));
        assert!(matches!(
            "/ip4/1.2.3.4/tcp/70000".parse::<AddressStack>(),
            Err(AddressError::InvalidValue { protocol: "tcp", .. })
        ));
    }

    #[test]
    fn marker_rejects_value() {
        assert_eq!(
            Component::new(Protocol::Http, Some("x")),
            Err(AddressError::UnexpectedValue("http"))
        );
    }

    #[test]
    fn unix_path_swallows_the_rest() {
        let stack: AddressStack = "/unix/var/run/fetch.sock".parse().unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.value_for(Protocol::Unix), Some("/var/run/fetch.sock"));
        assert_eq!(stack.to_string(), "/unix/var/run/fetch.sock");
    }

    #[test]
    fn dial_target_dns_with_port() {
        let stack: AddressStack = "/dns4/example.com/tcp/8080/http".parse().unwrap();
        let target = stack.dial_target().unwrap();
        assert_eq!(target.host, HostAddr::Name("example.com".into()));
        assert_eq!(target.transport, Some(Protocol::Tcp));
        assert_eq!(target.port, Some(8080));
        assert_eq!(target.to_string(), "example.com:8080");
    }

    #[test]
    fn dial_target_ip6_is_bracketed() {
        let with_port: AddressStack = "/ip6/2001:db8::1/udp/9000".parse().unwrap();
        assert_eq!(with_port.dial_target().unwrap().to_string(), "[2001:db8::1]:9000");

        let bare: AddressStack = "/ip6/::1".parse().unwrap();
        assert_eq!(bare.dial_target().unwrap().to_string(), "[::1]");
    }

    #[test]
    fn dial_target_ip6_zone() {
        let stack: AddressStack = "/ip6zone/eth0/ip6/fe80::1/tcp/80".parse().unwrap();
        let target = stack.dial_target().unwrap();
        assert_eq!(target.to_string(), "[fe80::1%25eth0]:80");
    }

    #[test]
    fn dial_target_requires_leading_host() {
        let stack: AddressStack = "/tcp/80/http".parse().unwrap();
        assert!(matches!(stack.dial_target(), Err(AddressError::NotDialable(_))));

        let dangling_zone: AddressStack = "/ip6zone/eth0/tcp/80".parse().unwrap();
        assert!(matches!(
            dangling_zone.dial_target(),
            Err(AddressError::NotDialable(_))
        ));
    }

    #[test]
    fn authority_drops_default_port_only() {
        let stack: AddressStack = "/dns/example.com/tcp/443".parse().unwrap();
        let target = stack.dial_target().unwrap();
        assert_eq!(target.authority(Some(443)), "example.com");
        assert_eq!(target.authority(Some(80)), "example.com:443");
    }

    #[test]
    fn split_peer_id_from_libp2p_address() {
        let peer = libp2p::identity::Keypair::generate_ed25519()
            .public()
            .to_peer_id();
        let text = format!("/ip4/1.2.3.4/tcp/24001/p2p/{}", peer);
        let stack: AddressStack = text.parse().unwrap();

        let (transport, id) = stack.split_peer_id().unwrap();
        assert_eq!(id, peer);
        assert_eq!(transport.to_string(), "/ip4/1.2.3.4/tcp/24001");

        let no_peer: AddressStack = "/ip4/1.2.3.4/tcp/24001".parse().unwrap();
        assert!(no_peer.split_peer_id().is_none());
    }

    #[test]
    fn invalid_peer_id_rejected() {
        assert!(matches!(
            "/ip4/1.2.3.4/tcp/1/p2p/not-a-peer".parse::<AddressStack>(),
            Err(AddressError::InvalidValue { protocol: "p2p", .. })
        ));
    }

    #[test]
    fn converts_from_libp2p_multiaddr() {
        let ma: Multiaddr = "/ip4/127.0.0.1/tcp/4001/ws".parse().unwrap();
        let stack = AddressStack::try_from(&ma).unwrap();
        assert_eq!(stack.to_string(), "/ip4/127.0.0.1/tcp/4001/ws");
        assert!(stack.contains(Protocol::Ws));
    }

    #[test]
    fn builder_preserves_order() {
        let stack = AddressStack::new()
            .with(Protocol::Dns, Some("example.com"))
            .and_then(|s| s.with(Protocol::Tcp, Some("443")))
            .and_then(|s| s.with(Protocol::Tls, None))
            .and_then(|s| s.with(Protocol::Http, None))
            .unwrap();
        assert_eq!(stack.to_string(), "/dns/example.com/tcp/443/tls/http");
    }
}
