//! # Address Resolution
//!
//! Turns an [`AddressStack`] into the URL a fetcher would dial:
//!
//! ```text
//! /dns/thing.com/tcp/443/tls/http                   → https://thing.com
//! /ip4/192.168.0.1/tcp/80/http                      → http://192.168.0.1
//! /ip6/2001:db8::1/tcp/8080/ws                      → ws://[2001:db8::1]:8080
//! /dns/thing.com/https/urlescape/%2Fpath%2Fto%2Froot → https://thing.com/path/to/root
//! ```
//!
//! Scheme precedence, first match wins:
//!
//! | present            | scheme  |
//! |--------------------|---------|
//! | `https`            | `https` |
//! | `http` + `tls`     | `https` |
//! | `http`             | `http`  |
//! | `wss`              | `wss`   |
//! | `ws` + `tls`       | `wss`   |
//! | `ws`               | `ws`    |
//! | none of the above  | `http`  |

use std::borrow::Cow;
use std::fmt;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};

use super::error::AddressError;
use super::protocol::Protocol;
use super::stack::AddressStack;

/// URL scheme a transfer endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
    Ws,
    Wss,
}

impl Scheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }

    /// Port implied when a URL of this scheme names none.
    pub const fn default_port(self) -> u16 {
        match self {
            Scheme::Http | Scheme::Ws => DEFAULT_HTTP_PORT,
            Scheme::Https | Scheme::Wss => DEFAULT_HTTPS_PORT,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical URL derived from an address stack.
///
/// `host` is in URL authority form: IPv6 literals bracketed, port appended
/// unless it is the scheme's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUrl {
    pub scheme: Scheme,
    pub host: String,
    /// Decoded path, empty when the stack carries none.
    pub path: String,
}

impl ResolvedUrl {
    /// Parse into a [`url::Url`] for callers that want to join paths or add
    /// query strings.
    ///
    /// Fails for zoned IPv6 hosts (`[fe80::1%25eth0]`): the `url` crate has
    /// no zone IDs. The host string and `Display` form still carry the zone.
    pub fn to_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.to_string())
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if !self.path.is_empty() && !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)
    }
}

/// Pick the scheme for a stack per the precedence table in the module docs.
pub fn select_scheme(stack: &AddressStack) -> Scheme {
    let present = stack.value_map();
    let has = |p: Protocol| present.contains_key(&p.code());

    if has(Protocol::Https) {
        Scheme::Https
    } else if has(Protocol::Http) {
        // /tls/http == /https
        if has(Protocol::Tls) {
            Scheme::Https
        } else {
            Scheme::Http
        }
    } else if has(Protocol::Wss) {
        Scheme::Wss
    } else if has(Protocol::Ws) {
        // /tls/ws == /wss
        if has(Protocol::Tls) {
            Scheme::Wss
        } else {
            Scheme::Ws
        }
    } else {
        Scheme::Http
    }
}

/// Strict percent-decoding of a path segment: every `%` must introduce two
/// hex digits and the result must be UTF-8. `None` otherwise.
pub fn unescape_path(escaped: &str) -> Option<String> {
    let bytes = escaped.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(|b| b.is_ascii_hexdigit()));
            if !well_formed {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(escaped)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Resolve an address stack to its canonical URL. Pure; performs no I/O.
///
/// # Errors
///
/// [`AddressError::NotDialable`] if the stack doesn't start with a host.
/// A malformed `urlescape` value is *not* an error: the path is dropped.
pub fn resolve(stack: &AddressStack) -> Result<ResolvedUrl, AddressError> {
    let target = stack.dial_target()?;
    let scheme = select_scheme(stack);

    let path = match stack.value_for(Protocol::UrlEscape) {
        Some(escaped) => unescape_path(escaped).unwrap_or_else(|| {
            debug!(escaped, "dropping malformed url-escaped path");
            String::new()
        }),
        None => String::new(),
    };

    let resolved = ResolvedUrl {
        scheme,
        host: target.authority(Some(scheme.default_port())),
        path,
    };
    debug!(address = %stack, url = %resolved, "resolved multiaddr");
    Ok(resolved)
}

impl AddressStack {
    /// Shorthand for [`resolve`].
    pub fn to_url(&self) -> Result<ResolvedUrl, AddressError> {
        resolve(self)
    }
}
