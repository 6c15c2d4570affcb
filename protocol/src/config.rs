//! # Protocol Configuration & Constants
//!
//! Every protocol-level magic value lives here: transport tags, reserved URL
//! schemes, multiaddr codes we own, libp2p protocol IDs and piece-size
//! arithmetic. If you're hardcoding one of these somewhere else, move it here.

// ---------------------------------------------------------------------------
// Transport Tags
// ---------------------------------------------------------------------------

/// Transfer type for plain HTTP(S) pulls.
pub const TRANSPORT_HTTP: &str = "http";

/// Transfer type for HTTP over a libp2p stream.
pub const TRANSPORT_LIBP2P: &str = "libp2p";

/// Every transfer type the provider knows how to fetch.
pub const SUPPORTED_TRANSPORTS: [&str; 2] = [TRANSPORT_HTTP, TRANSPORT_LIBP2P];

/// URL scheme marking a transport URL whose body is a multiaddr rather than
/// a conventional authority, e.g. `libp2p:///ip4/1.2.3.4/tcp/24001/p2p/12D3Koo...`.
pub const LIBP2P_URL_SCHEME: &str = "libp2p";

// ---------------------------------------------------------------------------
// Multiaddr Protocols
// ---------------------------------------------------------------------------

/// Private-use multiaddr code carrying a URL-escaped HTTP path, so that
/// `/dns/host/tcp/443/https/urlescape/%2Fpath%2Fto%2Froot` can express
/// `https://host/path/to/root`.
pub const URLESCAPE_PROTOCOL_CODE: u32 = 0x30_0200;

/// Text name of [`URLESCAPE_PROTOCOL_CODE`].
pub const URLESCAPE_PROTOCOL_NAME: &str = "urlescape";

/// Port implied by `http://` and `ws://` URLs.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Port implied by `https://` and `wss://` URLs.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

// ---------------------------------------------------------------------------
// Libp2p Protocol IDs
// ---------------------------------------------------------------------------

/// Deal proposal protocol, v1.2.0 (no retention / announce flags).
pub const DEAL_PROTOCOL_V120_ID: &str = "/fil/storage/mk/1.2.0";

/// Deal proposal protocol, v1.2.1. Current.
pub const DEAL_PROTOCOL_V121_ID: &str = "/fil/storage/mk/1.2.1";

/// Deal status query protocol.
pub const DEAL_STATUS_V12_PROTOCOL_ID: &str = "/fil/storage/status/1.2.0";

// ---------------------------------------------------------------------------
// Piece Sizes & Pricing
// ---------------------------------------------------------------------------

/// One gibibyte. Ask prices are quoted per GiB per epoch.
pub const GIB: u64 = 1 << 30;

/// Smallest valid padded piece: a single 128-byte Fr32 quad.
pub const MIN_PADDED_PIECE_SIZE: u64 = 128;

/// Fr32 padding ratio: every 127 bytes of payload occupy 128 bytes padded.
pub const FR32_UNPADDED_CHUNK: u64 = 127;

/// Generic message returned when a rejection arrives without a reason.
pub const DEFAULT_REJECTION_REASON: &str = "deal proposal rejected";

/// Returns `true` if `transfer_type` is one of [`SUPPORTED_TRANSPORTS`].
pub fn is_supported_transport(transfer_type: &str) -> bool {
    SUPPORTED_TRANSPORTS.contains(&transfer_type)
}
