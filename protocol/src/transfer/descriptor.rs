//! # Transfer Descriptor
//!
//! The record a deal proposal carries to say how the provider should fetch
//! the payload. The params blob stays opaque on the wire and is decoded
//! lazily, only when someone actually asks where the transfer goes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::TransferError;
use super::params::{TransportParams, TransportType};
use super::transport_url::TransportUrl;

/// How payload bytes will be fetched for one deal.
///
/// The zero value (`Transfer::default()`) means "offline deal, no transfer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Transfer type tag, e.g. `"http"`.
    #[serde(rename = "type")]
    pub transfer_type: String,
    /// Optional client-chosen correlation ID.
    #[serde(default)]
    pub client_id: String,
    /// Transport-specific parameters; meaningful only given `transfer_type`.
    #[serde(default)]
    pub params: Vec<u8>,
    /// Size of the data to be transferred, in bytes.
    #[serde(default)]
    pub size: u64,
}

impl Transfer {
    /// Build a transfer from decoded params, encoding them into the blob.
    pub fn new(params: &TransportParams, size: u64) -> Result<Self, TransferError> {
        Ok(Self {
            transfer_type: params.transport_type().as_str().to_string(),
            client_id: String::new(),
            params: params.encode()?,
            size,
        })
    }

    /// The zero value, used by offline deals.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::default()
    }

    /// The recognized transport type, if any.
    pub fn transport_type(&self) -> Result<TransportType, TransferError> {
        self.transfer_type.parse()
    }

    /// Decode the params blob.
    pub fn params(&self) -> Result<TransportParams, TransferError> {
        TransportParams::decode(&self.transfer_type, &self.params)
    }

    /// Derive the network host this transfer will contact, without
    /// contacting it.
    ///
    /// Returns `host[:port]` in URL authority form. For `libp2p://` URLs the
    /// host comes from resolving the multiaddr; for anything else it's the
    /// URL's own host.
    ///
    /// # Errors
    ///
    /// - [`TransferError::UnsupportedTransferType`] for unknown type tags.
    /// - [`TransferError::TransferParamsInvalid`] if the params don't decode.
    /// - [`TransferError::TransferUrlInvalid`] if the URL doesn't parse.
    /// - [`TransferError::AddressResolution`] if a multiaddr has no host.
    pub fn host(&self) -> Result<String, TransferError> {
        let params = self.params()?;
        let raw = &params.request().url;
        let url = TransportUrl::parse(raw)?;
        let host = url.host(raw)?;
        debug!(
            transfer_type = %self.transfer_type,
            client_id = %self.client_id,
            libp2p = url.is_libp2p(),
            host = %host,
            "derived transfer host"
        );
        Ok(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::params::HttpRequest;

    fn http_transfer(url: &str) -> Transfer {
        Transfer::new(&TransportParams::Http(HttpRequest::new(url)), 1024).unwrap()
    }

    #[test]
    fn zero_value_is_offline() {
        assert!(Transfer::offline().is_zero());
        assert!(!http_transfer("http://a.example").is_zero());
    }

    #[test]
    fn new_sets_type_and_size() {
        let t = http_transfer("http://a.example").with_client_id("job-7");
        assert_eq!(t.transfer_type, "http");
        assert_eq!(t.size, 1024);
        assert_eq!(t.client_id, "job-7");
        assert_eq!(t.transport_type().unwrap(), TransportType::Http);
    }

    #[test]
    fn host_of_http_url_keeps_port() {
        let t = http_transfer("http://storage.example:7777/root/data.car");
        assert_eq!(t.host().unwrap(), "storage.example:7777");
    }

    #[test]
    fn unsupported_type_fails_for_any_params() {
        for params in [Vec::new(), b"{}".to_vec(), br#"{"URL":"http://x"}"#.to_vec()] {
            let t = Transfer {
                transfer_type: "ftp".into(),
                params,
                ..Default::default()
            };
            assert!(matches!(
                t.host(),
                Err(TransferError::UnsupportedTransferType(ref ty)) if ty == "ftp"
            ));
        }
    }

    #[test]
    fn params_without_url_are_invalid() {
        let t = Transfer {
            transfer_type: "http".into(),
            params: br#"{"Headers":{"a":"b"}}"#.to_vec(),
            ..Default::default()
        };
        assert!(matches!(t.host(), Err(TransferError::TransferParamsInvalid { .. })));
    }

    #[test]
    fn offline_transfer_has_no_host() {
        assert!(matches!(
            Transfer::offline().host(),
            Err(TransferError::UnsupportedTransferType(ref ty)) if ty.is_empty()
        ));
    }

    #[test]
    fn libp2p_transfer_resolves_multiaddr_host() {
        let peer = libp2p::identity::Keypair::generate_ed25519()
            .public()
            .to_peer_id();
        let url = format!("libp2p:///ip4/10.1.2.3/tcp/24001/p2p/{}", peer);
        let t = Transfer::new(&TransportParams::Libp2p(HttpRequest::new(url)), 0).unwrap();
        assert_eq!(t.host().unwrap(), "10.1.2.3:24001");
    }

    #[test]
    fn invalid_url_reports_original_string() {
        let t = http_transfer("not a url");
        match t.host() {
            Err(TransferError::TransferUrlInvalid { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn serde_uses_type_key() {
        let t = http_transfer("http://a.example");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "http");
        let back: Transfer = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
