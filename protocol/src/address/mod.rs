//! # Multi-Protocol Addresses
//!
//! A transfer endpoint can be described either by a conventional URL or by a
//! multiaddr: an ordered, self-describing stack of protocol markers such as
//! `/dns/thing.com/tcp/443/tls/http`. This module parses those stacks and
//! turns them into the canonical `{scheme, host, path}` a fetcher would dial.
//!
//! ## Architecture
//!
//! ```text
//! protocol.rs  Known protocols, their multicodec codes and value shapes
//! stack.rs     AddressStack: ordered (protocol, value) entries + dial target
//! resolve.rs   Scheme selection, path decoding, ResolvedUrl
//! ```
//!
//! ## Design Decisions
//!
//! - The stack is our own type rather than `libp2p::Multiaddr`. Transfer
//!   addresses carry a private-use `urlescape` component that libp2p's closed
//!   protocol enum cannot represent. Conversion *from* a libp2p multiaddr is
//!   provided for callers that already hold one.
//! - Resolution is pure string/struct interpretation. No DNS lookups, no
//!   sockets, nothing that can block.
//! - Scheme detection falls back to `http` when the stack carries no
//!   application marker at all (`/ip4/1.2.3.4/tcp/80`).

pub mod protocol;
pub mod resolve;
pub mod stack;

mod error;

pub use error::AddressError;
pub use protocol::{Protocol, ValueKind};
pub use resolve::{resolve, select_scheme, ResolvedUrl, Scheme};
pub use stack::{AddressStack, Component, DialTarget, HostAddr};
