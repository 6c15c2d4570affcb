//! # Deal Proposals
//!
//! The payload a client sends to open a deal, and the provider's one-shot
//! accept/reject answer.
//!
//! ## Protocol Versions
//!
//! ```text
//! /fil/storage/mk/1.2.0  → DealParamsV120
//! /fil/storage/mk/1.2.1  → DealParams (adds remove_unsealed_copy, skip_ipni_announce)
//! ```
//!
//! Older params upgrade losslessly: the added flags default to `false`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{is_supported_transport, DEFAULT_REJECTION_REASON};
use crate::transfer::Transfer;

use super::primitives::{
    Address, ChainEpoch, Cid, PaddedPieceSize, PrimitiveError, Signature, TokenAmount,
};

/// Reasons a [`DealParams`] payload is structurally unacceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    #[error("deal uuid must not be nil")]
    NilDealUuid,

    #[error("offline deal must not carry transfer parameters")]
    OfflineWithTransfer,

    #[error("online deal has unsupported transfer type '{0}'")]
    UnsupportedTransfer(String),

    #[error("deal end epoch {end} is not after start epoch {start}")]
    EmptyDuration { start: ChainEpoch, end: ChainEpoch },

    #[error("deal epochs {start}..{end} are out of range")]
    EpochOverflow { start: ChainEpoch, end: ChainEpoch },

    #[error("total storage fee overflows: {price} per epoch over {duration} epochs")]
    FeeOverflow {
        price: TokenAmount,
        duration: ChainEpoch,
    },

    #[error("invalid piece size: {0}")]
    PieceSize(#[from] PrimitiveError),
}

// ---------------------------------------------------------------------------
// Proposal Terms
// ---------------------------------------------------------------------------

/// The storage terms both parties sign up for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealProposal {
    pub piece_cid: Cid,
    pub piece_size: PaddedPieceSize,
    pub verified_deal: bool,
    pub client: Address,
    pub provider: Address,
    /// Free-form label, usually the payload root CID.
    #[serde(default)]
    pub label: String,
    pub start_epoch: ChainEpoch,
    pub end_epoch: ChainEpoch,
    pub storage_price_per_epoch: TokenAmount,
    pub provider_collateral: TokenAmount,
    pub client_collateral: TokenAmount,
}

impl DealProposal {
    /// Number of epochs the deal is active for. `None` if the epochs are
    /// too far apart to represent.
    pub fn duration(&self) -> Option<ChainEpoch> {
        self.end_epoch.checked_sub(self.start_epoch)
    }

    /// Price per epoch times duration. `None` on overflow.
    pub fn total_storage_fee(&self) -> Option<TokenAmount> {
        self.storage_price_per_epoch.checked_mul(self.duration()?)
    }

    /// Sanity checks that don't need chain state. A proposal that passes has
    /// a representable duration and total fee.
    pub fn validate(&self) -> Result<(), ProposalError> {
        self.piece_size.validate()?;
        let (start, end) = (self.start_epoch, self.end_epoch);
        if end <= start {
            return Err(ProposalError::EmptyDuration { start, end });
        }
        let duration = self
            .duration()
            .ok_or(ProposalError::EpochOverflow { start, end })?;
        if self.total_storage_fee().is_none() {
            return Err(ProposalError::FeeOverflow {
                price: self.storage_price_per_epoch,
                duration,
            });
        }
        Ok(())
    }
}

/// A proposal plus the client's signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDealProposal {
    pub proposal: DealProposal,
    pub client_signature: Signature,
}

// ---------------------------------------------------------------------------
// Deal Params
// ---------------------------------------------------------------------------

/// A deal proposal payload (protocol v1.2.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParams {
    /// Client-generated, unique per deal.
    pub deal_uuid: Uuid,
    pub is_offline: bool,
    pub client_deal_proposal: ClientDealProposal,
    /// Root CID of the payload DAG.
    pub deal_data_root: Cid,
    /// Zero value when `is_offline` is set.
    #[serde(default)]
    pub transfer: Transfer,
    #[serde(default)]
    pub remove_unsealed_copy: bool,
    #[serde(default)]
    pub skip_ipni_announce: bool,
}

impl DealParams {
    /// Structural checks: non-nil uuid, offline ⇔ no transfer, sane terms.
    ///
    /// This doesn't decode the transfer params; [`Transfer::host`] does that
    /// when the provider actually needs it.
    pub fn validate(&self) -> Result<(), ProposalError> {
        if self.deal_uuid.is_nil() {
            return Err(ProposalError::NilDealUuid);
        }
        if self.is_offline {
            if !self.transfer.is_zero() {
                return Err(ProposalError::OfflineWithTransfer);
            }
        } else if !is_supported_transport(&self.transfer.transfer_type) {
            return Err(ProposalError::UnsupportedTransfer(
                self.transfer.transfer_type.clone(),
            ));
        }
        self.client_deal_proposal.proposal.validate()
    }

    pub fn proposal(&self) -> &DealProposal {
        &self.client_deal_proposal.proposal
    }
}

/// Deal proposal payload for protocol v1.2.0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParamsV120 {
    pub deal_uuid: Uuid,
    pub is_offline: bool,
    pub client_deal_proposal: ClientDealProposal,
    pub deal_data_root: Cid,
    #[serde(default)]
    pub transfer: Transfer,
}

impl From<DealParamsV120> for DealParams {
    fn from(v: DealParamsV120) -> Self {
        DealParams {
            deal_uuid: v.deal_uuid,
            is_offline: v.is_offline,
            client_deal_proposal: v.client_deal_proposal,
            deal_data_root: v.deal_data_root,
            transfer: v.transfer,
            remove_unsealed_copy: false,
            skip_ipni_announce: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The provider's answer to a proposal.
///
/// `message` is empty when accepted and never empty when rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResponse {
    pub accepted: bool,
    #[serde(default)]
    pub message: String,
}

impl DealResponse {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            message: String::new(),
        }
    }

    /// Reject with a human-readable reason. A blank reason is replaced by a
    /// generic one.
    pub fn reject(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let message = if reason.trim().is_empty() {
            DEFAULT_REJECTION_REASON.to_string()
        } else {
            reason
        };
        Self {
            accepted: false,
            message,
        }
    }

    /// Whether the accepted/message invariant holds. Useful on responses
    /// received from a peer.
    pub fn is_well_formed(&self) -> bool {
        self.accepted == self.message.is_empty()
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for DealResponse {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => DealResponse::accept(),
            Err(e) => DealResponse::reject(e.to_string()),
        }
    }
}
