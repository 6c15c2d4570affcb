//! # Collaborator Contracts
//!
//! The deal core never touches sectors, the chain, the index or key material
//! directly. Everything stateful sits behind one of these traits, owned and
//! wired in by whoever embeds the core. Each is object safe so it can be held
//! as `Arc<dyn Trait>` and swapped for a test double.
//!
//! Failures are opaque `anyhow` errors: the core only logs them and turns
//! them into protocol-level error strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use uuid::Uuid;

use super::ask::SignedStorageAsk;
use super::primitives::{
    Address, ChainEpoch, Cid, DealId, PaddedPieceSize, PieceInfo, SectorNumber, Signature,
    UnpaddedPieceSize,
};
use super::proposal::{ClientDealProposal, DealProposal};
use super::status::ProviderDealState;

/// A byte source for piece data.
pub type PieceData = Box<dyn AsyncRead + Send + Unpin>;

/// Links a piece handed to the sealing pipeline back to its deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDealInfo {
    pub deal_uuid: Uuid,
    pub publish_cid: Cid,
    pub deal_id: DealId,
    pub proposal: DealProposal,
    pub start_epoch: ChainEpoch,
    pub end_epoch: ChainEpoch,
    /// Keep an unsealed copy around for fast retrieval.
    pub keep_unsealed: bool,
}

/// Outcome of waiting for a publish message to land on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDealsWaitResult {
    pub deal_id: DealId,
    /// CID of the message that finally landed, which differs from the
    /// submitted one if the message was replaced in the mempool.
    pub final_cid: Cid,
}

/// Hands pieces to the sealing pipeline.
#[async_trait]
pub trait PieceAdder: Send + Sync {
    /// Stream `size` unpadded bytes into a sector. Returns the sector the
    /// piece landed in and its padded size.
    async fn add_piece(
        &self,
        size: UnpaddedPieceSize,
        data: PieceData,
        deal: PieceDealInfo,
    ) -> anyhow::Result<(SectorNumber, PaddedPieceSize)>;
}

/// Computes piece commitments.
#[async_trait]
pub trait CommpCalculator: Send + Sync {
    async fn compute_data_cid(
        &self,
        size: UnpaddedPieceSize,
        data: PieceData,
    ) -> anyhow::Result<PieceInfo>;
}

/// Submits signed proposals for on-chain publication.
#[async_trait]
pub trait DealPublisher: Send + Sync {
    /// Returns the CID of the publish message.
    async fn publish(&self, deal: &ClientDealProposal) -> anyhow::Result<Cid>;
}

/// Watches the chain for deal publication.
#[async_trait]
pub trait ChainDealManager: Send + Sync {
    /// Resolves once the publish message carrying `proposal` is confirmed.
    async fn wait_for_publish_deals(
        &self,
        publish_cid: &Cid,
        proposal: &DealProposal,
    ) -> anyhow::Result<PublishDealsWaitResult>;
}

/// Announces stored deals to the content index.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    fn enabled(&self) -> bool;

    /// Announce a deal; returns the advertisement CID.
    async fn announce_deal(&self, deal: &ProviderDealState) -> anyhow::Result<Cid>;

    /// Start background announcement processing.
    async fn start(&self);
}

/// Source of the provider's current ask.
pub trait AskGetter: Send + Sync {
    /// `None` until an ask has been set.
    fn get_ask(&self) -> Option<SignedStorageAsk>;
}

/// Checks signatures against on-chain addresses.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// `Ok(false)` for a well-formed but wrong signature; `Err` when the
    /// address or signature can't be interpreted at all.
    async fn verify_signature(
        &self,
        signature: &Signature,
        signer: &Address,
        payload: &[u8],
    ) -> anyhow::Result<bool>;
}

/// Read access to the provider's deal records.
#[async_trait]
pub trait DealTracker: Send + Sync {
    /// `Ok(None)` if no deal with this UUID exists.
    async fn deal(&self, deal_uuid: Uuid) -> anyhow::Result<Option<ProviderDealState>>;

    /// Bytes of payload received so far.
    async fn bytes_received(&self, deal_uuid: Uuid) -> anyhow::Result<u64>;

    /// Sealing state of the sector holding the deal's piece.
    async fn sealing_status(&self, deal: &ProviderDealState) -> anyhow::Result<String>;
}
