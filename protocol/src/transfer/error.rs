//! Error types for transfer descriptors.
//!
//! Every variant is a deterministic function of the input: retrying with
//! the same `Transfer` yields the same error. Callers convert these into a
//! protocol-level rejection message rather than aborting.

use thiserror::Error;

use crate::address::AddressError;

/// Boxed nested cause for URL parse failures (either a `url::ParseError` or
/// an [`AddressError`] from a multiaddr body).
pub type UrlCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from decoding or interpreting a [`Transfer`](super::Transfer).
#[derive(Debug, Error)]
pub enum TransferError {
    /// The transfer type tag isn't one we know how to fetch.
    #[error("cannot parse params for unrecognized transfer type '{0}'")]
    UnsupportedTransferType(String),

    /// The opaque params blob isn't a valid transport request.
    #[error("failed to de-serialize transport params bytes '{params}': {source}")]
    TransferParamsInvalid {
        /// The offending bytes, lossily rendered as UTF-8.
        params: String,
        #[source]
        source: serde_json::Error,
    },

    /// The params could not be encoded. Practically unreachable for the
    /// request shapes we produce.
    #[error("failed to serialize transport params: {0}")]
    TransferParamsEncode(#[source] serde_json::Error),

    /// The URL inside the params doesn't parse.
    #[error("cannot parse url '{url}': {source}")]
    TransferUrlInvalid {
        /// The URL exactly as found in the params.
        url: String,
        #[source]
        source: UrlCause,
    },

    /// The multiaddr parsed but doesn't lead with a dialable host.
    #[error("address resolution failed: {0}")]
    AddressResolution(#[from] AddressError),
}

impl TransferError {
    pub(crate) fn url_invalid(url: &str, source: impl Into<UrlCause>) -> Self {
        TransferError::TransferUrlInvalid {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
