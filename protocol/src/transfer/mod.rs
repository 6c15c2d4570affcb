//! # Transfer Descriptors
//!
//! Everything a deal proposal says about *how* the payload reaches the
//! provider, and the logic to answer "what host will this transfer contact?"
//! without performing it.
//!
//! ```text
//! Transfer { type, client_id, params, size }
//!     │
//!     ├─ params.rs        decode params blob → TransportParams::{Http, Libp2p}(HttpRequest)
//!     ├─ transport_url.rs HttpRequest.url → TransportUrl::{Libp2p, Standard}
//!     └─ address/         libp2p multiaddr → ResolvedUrl → host
//! ```
//!
//! All of it is pure: no I/O, no shared state, safe to call from any number
//! of tasks at once.

pub mod descriptor;
pub mod params;
pub mod transport_url;

mod error;

pub use descriptor::Transfer;
pub use error::{TransferError, UrlCause};
pub use params::{HttpRequest, TransportParams, TransportType};
pub use transport_url::TransportUrl;
