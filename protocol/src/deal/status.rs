//! # Deal Status Protocol Types
//!
//! ```text
//! Client → Provider: DealStatusRequest  { deal_uuid, signature(deal_uuid bytes) }
//! Provider → Client: DealStatusResponse { deal_uuid, error | deal_status, progress }
//! ```
//!
//! The signature is over the 16 raw bytes of the deal UUID, made with the
//! key behind the proposal's `client` address. A response with a non-empty
//! `error` carries no [`DealStatus`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transfer::Transfer;

use super::primitives::{Cid, DealId, Signature};
use super::proposal::{ClientDealProposal, DealProposal};

/// Query for the current state of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatusRequest {
    pub deal_uuid: Uuid,
    pub signature: Signature,
}

impl DealStatusRequest {
    pub fn new(deal_uuid: Uuid, signature: Signature) -> Self {
        Self {
            deal_uuid,
            signature,
        }
    }

    /// The bytes the client signs: the UUID in binary form.
    pub fn signing_payload(&self) -> [u8; 16] {
        signing_payload(&self.deal_uuid)
    }
}

/// Bytes a client signs to query the status of `deal_uuid`.
pub fn signing_payload(deal_uuid: &Uuid) -> [u8; 16] {
    *deal_uuid.as_bytes()
}

/// Point-in-time snapshot of a deal, as reported to its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatus {
    /// Non-empty if the deal is in the error state.
    #[serde(default)]
    pub error: String,
    /// Name of the last checkpoint the deal reached.
    pub status: String,
    /// Sealing status reported by the sealing subsystem.
    #[serde(default)]
    pub sealing_status: String,
    pub proposal: DealProposal,
    /// CID of the client deal proposal plus signature.
    pub signed_proposal_cid: Cid,
    /// Publish message CID, once the deal has reached the publish stage.
    #[serde(default)]
    pub publish_cid: Option<Cid>,
    /// On-chain deal ID; zero before publication.
    #[serde(default)]
    pub chain_deal_id: DealId,
}

/// Answer to a [`DealStatusRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatusResponse {
    pub deal_uuid: Uuid,
    /// Non-empty if the status couldn't be fetched (e.g. bad signature).
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub deal_status: Option<DealStatus>,
    #[serde(default)]
    pub is_offline: bool,
    #[serde(default)]
    pub transfer_size: u64,
    #[serde(default)]
    pub n_bytes_received: u64,
}

impl DealStatusResponse {
    /// An error response: no status, no progress.
    pub fn error(deal_uuid: Uuid, message: impl Into<String>) -> Self {
        Self {
            deal_uuid,
            error: message.into(),
            deal_status: None,
            is_offline: false,
            transfer_size: 0,
            n_bytes_received: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// The provider's full record of a deal, owned by the deal state machine.
///
/// This is what the status responder and the index provider read from; it
/// carries more than what is reported back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDealState {
    pub deal_uuid: Uuid,
    pub client_deal_proposal: ClientDealProposal,
    pub signed_proposal_cid: Cid,
    pub deal_data_root: Cid,
    pub is_offline: bool,
    #[serde(default)]
    pub transfer: Transfer,
    /// Name of the last checkpoint reached.
    pub checkpoint: String,
    /// Non-empty once the deal has failed.
    #[serde(default)]
    pub err: String,
    #[serde(default)]
    pub publish_cid: Option<Cid>,
    #[serde(default)]
    pub chain_deal_id: DealId,
    #[serde(default)]
    pub sector_id: Option<u64>,
    #[serde(default)]
    pub remove_unsealed_copy: bool,
    #[serde(default)]
    pub skip_ipni_announce: bool,
}

impl ProviderDealState {
    pub fn proposal(&self) -> &DealProposal {
        &self.client_deal_proposal.proposal
    }

    /// Project onto the client-facing snapshot.
    ///
    /// The publish CID and chain deal ID are only reported once publication
    /// has been recorded.
    pub fn to_status(&self, sealing_status: impl Into<String>) -> DealStatus {
        let published = self.publish_cid.is_some();
        DealStatus {
            error: self.err.clone(),
            status: self.checkpoint.clone(),
            sealing_status: sealing_status.into(),
            proposal: self.proposal().clone(),
            signed_proposal_cid: self.signed_proposal_cid.clone(),
            publish_cid: self.publish_cid.clone(),
            chain_deal_id: if published { self.chain_deal_id } else { 0 },
        }
    }
}
