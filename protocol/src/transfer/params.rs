//! # Transport Parameter Codec
//!
//! A [`Transfer`](super::Transfer) carries its transport parameters as an
//! opaque byte blob whose meaning depends on the transfer type. Both types
//! we support (`http` and `libp2p`) use the same JSON request shape:
//!
//! ```json
//! { "URL": "https://client.example/piece.car", "Headers": { "Authorization": "..." } }
//! ```
//!
//! The wire keys are `URL` / `Headers` for compatibility with existing
//! clients; lowercase spellings are accepted on decode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{TRANSPORT_HTTP, TRANSPORT_LIBP2P};

use super::error::TransferError;

// ---------------------------------------------------------------------------
// Transport Type
// ---------------------------------------------------------------------------

/// Recognized transfer type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Http,
    Libp2p,
}

impl TransportType {
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportType::Http => TRANSPORT_HTTP,
            TransportType::Libp2p => TRANSPORT_LIBP2P,
        }
    }
}

impl FromStr for TransportType {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TRANSPORT_HTTP => Ok(TransportType::Http),
            TRANSPORT_LIBP2P => Ok(TransportType::Libp2p),
            other => Err(TransferError::UnsupportedTransferType(other.to_string())),
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request Shape
// ---------------------------------------------------------------------------

/// What the provider needs to pull the payload: a URL (conventional or
/// `libp2p://` multiaddr form) and any headers to send with the request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    #[serde(rename = "URL", alias = "url")]
    pub url: String,
    #[serde(rename = "Headers", alias = "headers", default)]
    pub headers: BTreeMap<String, String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

// Headers routinely carry bearer tokens; keep them out of logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tagged Params
// ---------------------------------------------------------------------------

/// Decoded transport parameters, tagged by transfer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportParams {
    Http(HttpRequest),
    Libp2p(HttpRequest),
}

impl TransportParams {
    /// Decode `bytes` as the params for `transfer_type`.
    ///
    /// # Errors
    ///
    /// [`TransferError::UnsupportedTransferType`] for unknown tags, checked
    /// before the bytes are looked at. [`TransferError::TransferParamsInvalid`]
    /// if the bytes aren't a request (including a missing `URL` field).
    pub fn decode(transfer_type: &str, bytes: &[u8]) -> Result<Self, TransferError> {
        let kind = TransportType::from_str(transfer_type)?;
        let request: HttpRequest =
            serde_json::from_slice(bytes).map_err(|source| TransferError::TransferParamsInvalid {
                params: String::from_utf8_lossy(bytes).into_owned(),
                source,
            })?;
        Ok(match kind {
            TransportType::Http => TransportParams::Http(request),
            TransportType::Libp2p => TransportParams::Libp2p(request),
        })
    }

    /// Encode to the opaque blob stored in [`Transfer::params`](super::Transfer).
    pub fn encode(&self) -> Result<Vec<u8>, TransferError> {
        serde_json::to_vec(self.request()).map_err(TransferError::TransferParamsEncode)
    }

    pub fn transport_type(&self) -> TransportType {
        match self {
            TransportParams::Http(_) => TransportType::Http,
            TransportParams::Libp2p(_) => TransportType::Libp2p,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        match self {
            TransportParams::Http(r) | TransportParams::Libp2p(r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_go_style_keys() {
        let raw = br#"{"URL":"http://c.example/data.car","Headers":{"Authorization":"Basic x"}}"#;
        let params = TransportParams::decode("http", raw).unwrap();
        assert_eq!(params.transport_type(), TransportType::Http);
        assert_eq!(params.request().url, "http://c.example/data.car");
        assert_eq!(params.request().headers["Authorization"], "Basic x");
    }

    #[test]
    fn decodes_lowercase_keys_and_missing_headers() {
        let raw = br#"{"url":"libp2p:///ip4/1.2.3.4/tcp/1"}"#;
        let params = TransportParams::decode("libp2p", raw).unwrap();
        assert_eq!(params.transport_type(), TransportType::Libp2p);
        assert!(params.request().headers.is_empty());
    }

    #[test]
    fn unsupported_type_checked_before_bytes() {
        let err = TransportParams::decode("ftp", b"not even json").unwrap_err();
        assert!(matches!(err, TransferError::UnsupportedTransferType(t) if t == "ftp"));
    }

    #[test]
    fn missing_url_is_params_invalid() {
        let raw = br#"{"Headers":{}}"#;
        let err = TransportParams::decode("http", raw).unwrap_err();
        match err {
            TransferError::TransferParamsInvalid { params, .. } => {
                assert_eq!(params, r#"{"Headers":{}}"#)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_carried_in_error() {
        let err = TransportParams::decode("http", &[0xff, b'{']).unwrap_err();
        assert!(matches!(err, TransferError::TransferParamsInvalid { .. }));
        assert!(err.to_string().contains("failed to de-serialize"));
    }

    #[test]
    fn encode_uses_wire_keys() {
        let params = TransportParams::Http(HttpRequest::new("https://x.example/p").with_header("A", "b"));
        let bytes = params.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["URL"], "https://x.example/p");
        assert_eq!(value["Headers"]["A"], "b");
    }

    #[test]
    fn debug_hides_header_values() {
        let req = HttpRequest::new("https://x.example").with_header("Authorization", "secret-token");
        let rendered = format!("{:?}", req);
        assert!(rendered.contains("Authorization"));
        assert!(!rendered.contains("secret-token"));
    }
}
