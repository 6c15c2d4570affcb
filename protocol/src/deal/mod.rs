//! # Deal Protocol
//!
//! Records exchanged between a storage client and a provider, and the
//! provider-side status responder.
//!
//! ## Lifecycle
//!
//! ```text
//! DealParams ──▶ DealResponse{accepted, message}
//!                     │
//!                     ▼ (provider side, external)
//!         transfer → commp → add piece → publish → announce
//!                     │
//! DealStatusRequest ──▶ DealStatusResponder ──▶ DealStatusResponse
//! ```
//!
//! Everything past acceptance is owned by the collaborators in
//! [`collaborators`]; this module only models the records and answers status
//! queries from snapshots.

pub mod ask;
pub mod collaborators;
pub mod primitives;
pub mod proposal;
pub mod responder;
pub mod status;

pub use ask::{AskError, AskMismatch, SignedStorageAsk, StorageAsk};
pub use collaborators::{
    AskGetter, ChainDealManager, CommpCalculator, DealPublisher, DealTracker, IndexProvider,
    PieceAdder, PieceData, PieceDealInfo, PublishDealsWaitResult, SignatureVerifier,
};
pub use primitives::{
    Address, ChainEpoch, Cid, DealId, PaddedPieceSize, PieceInfo, PrimitiveError, SectorNumber,
    SigType, Signature, TokenAmount, UnpaddedPieceSize,
};
pub use proposal::{
    ClientDealProposal, DealParams, DealParamsV120, DealProposal, DealResponse, ProposalError,
};
pub use responder::{DealStatusResponder, StatusError};
pub use status::{
    signing_payload, DealStatus, DealStatusRequest, DealStatusResponse, ProviderDealState,
};
