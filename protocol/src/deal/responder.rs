//! # Deal Status Responder
//!
//! Answers [`DealStatusRequest`]s from clients:
//!
//! ```text
//! 1. look up the deal          → not found / lookup failure
//! 2. verify the signature over the UUID bytes against proposal.client
//! 3. read bytes received and sealing status
//! 4. project the snapshot into a DealStatusResponse
//! ```
//!
//! Any failure becomes a response with a short, generic `error` string and
//! no status. Details go to the log, never to the peer.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::collaborators::{DealTracker, SignatureVerifier};
use super::status::{DealStatusRequest, DealStatusResponse, ProviderDealState};

/// Reasons a status query is refused.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("no storage deal found with deal UUID {0}")]
    DealNotFound(Uuid),

    #[error("failed to look up deal {deal_uuid}: {source}")]
    Lookup {
        deal_uuid: Uuid,
        #[source]
        source: anyhow::Error,
    },

    /// Well-formed signature from the wrong key.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// The verifier couldn't interpret the signature or client address.
    #[error("malformed signature or client address: {0}")]
    MalformedSignature(#[source] anyhow::Error),

    #[error("failed to fetch sealing status: {0}")]
    SealingStatus(#[source] anyhow::Error),
}

impl StatusError {
    /// The text sent back to the client. Deliberately vague for everything
    /// except a missing deal.
    pub fn public_message(&self) -> String {
        match self {
            StatusError::DealNotFound(_) => self.to_string(),
            StatusError::Lookup { .. } => "failed to fetch deal status".to_string(),
            StatusError::SignatureInvalid | StatusError::MalformedSignature(_) => {
                "signature verification failed".to_string()
            }
            StatusError::SealingStatus(_) => "failed to fetch sector status".to_string(),
        }
    }
}

/// Builds status responses from the provider's deal records.
#[derive(Clone)]
pub struct DealStatusResponder {
    deals: Arc<dyn DealTracker>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl DealStatusResponder {
    pub fn new(deals: Arc<dyn DealTracker>, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { deals, verifier }
    }

    /// Answer a request. Never fails; refusals are encoded in the response.
    pub async fn respond(&self, request: &DealStatusRequest) -> DealStatusResponse {
        match self.status(request).await {
            Ok(response) => {
                debug!(
                    deal_uuid = %request.deal_uuid,
                    n_bytes_received = response.n_bytes_received,
                    "answered deal status query"
                );
                response
            }
            Err(e) => {
                warn!(deal_uuid = %request.deal_uuid, error = %e, "refusing deal status query");
                DealStatusResponse::error(request.deal_uuid, e.public_message())
            }
        }
    }

    /// The fallible part of [`respond`](Self::respond), exposed for callers
    /// that want the typed error.
    pub async fn status(
        &self,
        request: &DealStatusRequest,
    ) -> Result<DealStatusResponse, StatusError> {
        let deal_uuid = request.deal_uuid;
        let deal = self
            .deals
            .deal(deal_uuid)
            .await
            .map_err(|source| StatusError::Lookup { deal_uuid, source })?
            .ok_or(StatusError::DealNotFound(deal_uuid))?;

        self.authenticate(request, &deal).await?;

        let n_bytes_received = self
            .deals
            .bytes_received(deal_uuid)
            .await
            .map_err(|source| StatusError::Lookup { deal_uuid, source })?;
        let sealing_status = self
            .deals
            .sealing_status(&deal)
            .await
            .map_err(StatusError::SealingStatus)?;

        Ok(DealStatusResponse {
            deal_uuid,
            error: String::new(),
            deal_status: Some(deal.to_status(sealing_status)),
            is_offline: deal.is_offline,
            transfer_size: deal.transfer.size,
            n_bytes_received,
        })
    }

    async fn authenticate(
        &self,
        request: &DealStatusRequest,
        deal: &ProviderDealState,
    ) -> Result<(), StatusError> {
        let valid = self
            .verifier
            .verify_signature(
                &request.signature,
                &deal.proposal().client,
                &request.signing_payload(),
            )
            .await
            .map_err(StatusError::MalformedSignature)?;
        if valid {
            Ok(())
        } else {
            Err(StatusError::SignatureInvalid)
        }
    }
}
