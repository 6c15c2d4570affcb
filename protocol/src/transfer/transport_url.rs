//! # Transport URLs
//!
//! The URL inside a transport request is either a conventional URL
//! (`https://client.example/piece.car`) or a multiaddr wrapped in the
//! reserved `libp2p` scheme:
//!
//! ```text
//! libp2p:///ip4/1.2.3.4/tcp/24001/p2p/12D3KooW...
//! libp2p:/ip4/1.2.3.4/tcp/24001/p2p/12D3KooW...
//! ```
//!
//! A libp2p URL must end in exactly one peer ID and carry exactly one
//! transport address in front of it. The authority slashes are optional.

use libp2p::PeerId;

use crate::address::{AddressError, AddressStack, Protocol};
use crate::config::LIBP2P_URL_SCHEME;

use super::error::TransferError;

/// A parsed transport URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportUrl {
    /// `libp2p://<multiaddr>/p2p/<peer-id>`.
    Libp2p {
        peer_id: PeerId,
        /// The transport part, with the peer ID stripped.
        address: AddressStack,
    },
    /// Any other scheme.
    Standard(url::Url),
}

impl TransportUrl {
    /// Parse the URL found in a transport request.
    ///
    /// # Errors
    ///
    /// [`TransferError::TransferUrlInvalid`] carrying the original string and
    /// the nested cause.
    pub fn parse(raw: &str) -> Result<Self, TransferError> {
        let prefix = format!("{}:", LIBP2P_URL_SCHEME);
        match raw.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(&prefix) => {
                let rest = &raw[prefix.len()..];
                Self::parse_libp2p(raw, rest.strip_prefix("//").unwrap_or(rest))
            }
            _ => {
                let parsed = url::Url::parse(raw).map_err(|e| TransferError::url_invalid(raw, e))?;
                Ok(TransportUrl::Standard(parsed))
            }
        }
    }

    fn parse_libp2p(raw: &str, body: &str) -> Result<Self, TransferError> {
        let stack: AddressStack = body
            .parse()
            .map_err(|e: AddressError| TransferError::url_invalid(raw, e))?;
        let (address, peer_id) = stack
            .split_peer_id()
            .ok_or_else(|| TransferError::url_invalid(raw, "missing trailing /p2p/<peer-id>"))?;
        if address.is_empty() {
            return Err(TransferError::url_invalid(raw, "expected one transport address, found none"));
        }
        if address.contains(Protocol::P2p) {
            return Err(TransferError::url_invalid(raw, "expected exactly one peer ID"));
        }
        Ok(TransportUrl::Libp2p { peer_id, address })
    }

    pub fn is_libp2p(&self) -> bool {
        matches!(self, TransportUrl::Libp2p { .. })
    }

    /// The host a fetch would contact, in URL authority form (`host[:port]`).
    ///
    /// For libp2p URLs this resolves the multiaddr. For standard URLs the
    /// host is taken as written in `raw` (no case folding, no punycode) and
    /// the port is kept only when it isn't the scheme's default. `raw` is the
    /// string this URL was parsed from.
    pub fn host(&self, raw: &str) -> Result<String, TransferError> {
        match self {
            TransportUrl::Libp2p { address, .. } => Ok(address.to_url()?.host),
            TransportUrl::Standard(url) => {
                let host = written_host(raw)
                    .or_else(|| url.host_str())
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| TransferError::url_invalid(raw, "url has no host"))?;
                Ok(match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                })
            }
        }
    }
}

/// Host text of `scheme://[userinfo@]host[:port]/...` exactly as written.
///
/// `None` when `raw` has no `//` authority.
fn written_host(raw: &str) -> Option<&str> {
    let (_, rest) = raw.trim().split_once("://")?;
    let end = rest.find(['/', '?', '#', '\\']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    if host_port.starts_with('[') {
        let close = host_port.find(']')?;
        return Some(&host_port[..=close]);
    }
    Some(host_port.rsplit_once(':').map_or(host_port, |(host, _)| host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> PeerId {
        libp2p::identity::Keypair::generate_ed25519()
            .public()
            .to_peer_id()
    }

    #[test]
    fn parses_libp2p_url() {
        let id = peer();
        let raw = format!("libp2p:///ip4/1.2.3.4/tcp/24001/p2p/{}", id);
        match TransportUrl::parse(&raw).unwrap() {
            TransportUrl::Libp2p { peer_id, address } => {
                assert_eq!(peer_id, id);
                assert_eq!(address.to_string(), "/ip4/1.2.3.4/tcp/24001");
            }
            other => panic!("expected libp2p url, got {other:?}"),
        }
    }

    #[test]
    fn libp2p_url_requires_peer_id() {
        let err = TransportUrl::parse("libp2p:///ip4/1.2.3.4/tcp/24001").unwrap_err();
        assert!(matches!(err, TransferError::TransferUrlInvalid { .. }));
    }

    #[test]
    fn libp2p_url_requires_transport_address() {
        let raw = format!("libp2p:///p2p/{}", peer());
        assert!(matches!(
            TransportUrl::parse(&raw),
            Err(TransferError::TransferUrlInvalid { .. })
        ));
    }

    #[test]
    fn libp2p_url_rejects_two_peers() {
        let raw = format!("libp2p:///ip4/1.2.3.4/tcp/1/p2p/{}/p2p/{}", peer(), peer());
        assert!(matches!(
            TransportUrl::parse(&raw),
            Err(TransferError::TransferUrlInvalid { .. })
        ));
    }

    #[test]
    fn libp2p_url_with_bad_multiaddr_keeps_original() {
        let err = TransportUrl::parse("libp2p:///ip4/999.0.0.1/tcp/1").unwrap_err();
        match err {
            TransferError::TransferUrlInvalid { url, .. } => {
                assert_eq!(url, "libp2p:///ip4/999.0.0.1/tcp/1")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn standard_url_host_and_port() {
        let raw = "http://data.example:8080/path/to/root.car";
        let url = TransportUrl::parse(raw).unwrap();
        assert!(!url.is_libp2p());
        assert_eq!(url.host(raw).unwrap(), "data.example:8080");
    }

    #[test]
    fn standard_url_ip6_host_is_bracketed() {
        let raw = "https://[2001:db8::5]:9443/x";
        let url = TransportUrl::parse(raw).unwrap();
        assert_eq!(url.host(raw).unwrap(), "[2001:db8::5]:9443");
    }

    #[test]
    fn libp2p_url_without_authority_slashes() {
        let id = peer();
        let raw = format!("libp2p:/dns/Node.Example/tcp/8080/p2p/{}", id);
        let url = TransportUrl::parse(&raw).unwrap();
        assert!(url.is_libp2p());
        assert_eq!(url.host(&raw).unwrap(), "Node.Example:8080");

        let upper = format!("LIBP2P:///ip4/1.2.3.4/tcp/24001/p2p/{}", id);
        assert!(TransportUrl::parse(&upper).unwrap().is_libp2p());
    }

    #[test]
    fn standard_url_host_is_kept_as_written() {
        let cases = [
            ("http://Example.COM:8080/x", "Example.COM:8080"),
            ("http://Example.COM:80/x", "Example.COM"),
            ("HTTPS://user:pw@Data.Example:443/a.car", "Data.Example"),
            ("http://bücher.example/x", "bücher.example"),
            ("http://[2001:DB8::5]:8080?q=1", "[2001:DB8::5]:8080"),
        ];
        for (raw, host) in cases {
            let url = TransportUrl::parse(raw).unwrap();
            assert_eq!(url.host(raw).unwrap(), host, "url {raw}");
        }
    }

    #[test]
    fn relative_or_hostless_urls_fail() {
        assert!(matches!(
            TransportUrl::parse("/just/a/path"),
            Err(TransferError::TransferUrlInvalid { .. })
        ));
        let raw = "mailto:someone@example.com";
        let url = TransportUrl::parse(raw).unwrap();
        assert!(matches!(url.host(raw), Err(TransferError::TransferUrlInvalid { .. })));
    }
}
