//! Error types for multiaddr parsing and dial-target extraction.

use thiserror::Error;

/// Errors produced while parsing or interpreting an [`AddressStack`].
///
/// [`AddressStack`]: super::AddressStack
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address text was empty (or just `/`).
    #[error("empty multiaddr")]
    Empty,

    /// Multiaddr text must start with `/`.
    #[error("multiaddr '{0}' must begin with '/'")]
    MissingLeadingSlash(String),

    /// A protocol name we have no table entry for.
    #[error("unknown protocol '{0}'")]
    UnknownProtocol(String),

    /// A protocol that carries a value appeared without one.
    #[error("protocol '{0}' requires a value")]
    MissingValue(&'static str),

    /// A marker protocol (e.g. `http`) was given a value.
    #[error("protocol '{0}' does not take a value")]
    UnexpectedValue(&'static str),

    /// The value failed the protocol's own validation.
    #[error("invalid value '{value}' for protocol '{protocol}': {reason}")]
    InvalidValue {
        /// Protocol name.
        protocol: &'static str,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The leading components do not form a host (and optional port).
    #[error("{0} is not a dialable host/port address")]
    NotDialable(String),
}
