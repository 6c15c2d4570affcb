//! # Storage Ask
//!
//! A provider's published terms: what it charges per GiB per epoch (with a
//! separate tier for verified deals) and which piece sizes it will take.
//! Matching an ask is necessary but not sufficient for acceptance; the
//! provider can still run its own policy on top.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GIB;

use super::primitives::{Address, PaddedPieceSize, Signature, TokenAmount};
use super::proposal::DealProposal;

/// An ask that is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    #[error("min piece size {min} exceeds max piece size {max}")]
    PieceBounds {
        min: PaddedPieceSize,
        max: PaddedPieceSize,
    },

    #[error("{tier} price must not be negative, got {price}")]
    NegativePrice {
        tier: &'static str,
        price: TokenAmount,
    },
}

/// Why a proposal doesn't match an ask.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskMismatch {
    #[error("storage price per epoch {proposed} is less than the {tier} ask minimum of {minimum}")]
    PriceTooLow {
        tier: &'static str,
        proposed: TokenAmount,
        minimum: TokenAmount,
    },

    #[error("piece size {size} is less than the minimum required piece size {min}")]
    PieceTooSmall {
        size: PaddedPieceSize,
        min: PaddedPieceSize,
    },

    #[error("piece size {size} is more than the maximum allowed piece size {max}")]
    PieceTooLarge {
        size: PaddedPieceSize,
        max: PaddedPieceSize,
    },

    #[error("price overflow computing the ask minimum")]
    Overflow,
}

/// A provider's published pricing and size policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAsk {
    /// Price per GiB per epoch for unverified deals.
    pub price: TokenAmount,
    /// Price per GiB per epoch for verified deals.
    pub verified_price: TokenAmount,
    pub min_piece_size: PaddedPieceSize,
    pub max_piece_size: PaddedPieceSize,
    pub miner: Address,
}

impl StorageAsk {
    pub fn validate(&self) -> Result<(), AskError> {
        if self.min_piece_size > self.max_piece_size {
            return Err(AskError::PieceBounds {
                min: self.min_piece_size,
                max: self.max_piece_size,
            });
        }
        for (tier, price) in [("unverified", self.price), ("verified", self.verified_price)] {
            if price.is_negative() {
                return Err(AskError::NegativePrice { tier, price });
            }
        }
        Ok(())
    }

    /// The per-GiB price tier that applies to a proposal.
    pub fn price_for(&self, verified: bool) -> TokenAmount {
        if verified {
            self.verified_price
        } else {
            self.price
        }
    }

    /// Minimum acceptable price per epoch for a piece of `size`, i.e. the
    /// tier price scaled from per-GiB to the piece's padded size.
    pub fn min_price_per_epoch(
        &self,
        size: PaddedPieceSize,
        verified: bool,
    ) -> Result<TokenAmount, AskMismatch> {
        self.price_for(verified)
            .mul_div(size.0, GIB)
            .ok_or(AskMismatch::Overflow)
    }

    /// Check a proposal's price and piece size against this ask.
    pub fn check_proposal(&self, proposal: &DealProposal) -> Result<(), AskMismatch> {
        let tier = if proposal.verified_deal {
            "verified"
        } else {
            "unverified"
        };
        let minimum = self.min_price_per_epoch(proposal.piece_size, proposal.verified_deal)?;
        if proposal.storage_price_per_epoch < minimum {
            return Err(AskMismatch::PriceTooLow {
                tier,
                proposed: proposal.storage_price_per_epoch,
                minimum,
            });
        }
        if proposal.piece_size < self.min_piece_size {
            return Err(AskMismatch::PieceTooSmall {
                size: proposal.piece_size,
                min: self.min_piece_size,
            });
        }
        if proposal.piece_size > self.max_piece_size {
            return Err(AskMismatch::PieceTooLarge {
                size: proposal.piece_size,
                max: self.max_piece_size,
            });
        }
        Ok(())
    }
}

/// An ask plus the provider worker's signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedStorageAsk {
    pub ask: StorageAsk,
    #[serde(default)]
    pub signature: Option<Signature>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::primitives::Cid;

    fn ask() -> StorageAsk {
        StorageAsk {
            price: TokenAmount(GIB as i128),
            verified_price: TokenAmount::ZERO,
            min_piece_size: PaddedPieceSize(256),
            max_piece_size: PaddedPieceSize(32 * GIB),
            miner: "f01000".parse().unwrap(),
        }
    }

    fn proposal(size: u64, price: i128, verified: bool) -> DealProposal {
        let cid: Cid = "baga6ea4seaqao7s73y24kcutaosvacpdjgfe5pw76ooefnyqw4ynr3d2y6x2mpq"
            .parse()
            .unwrap();
        DealProposal {
            piece_cid: cid,
            piece_size: PaddedPieceSize(size),
            verified_deal: verified,
            client: "f1client".parse().unwrap(),
            provider: "f01000".parse().unwrap(),
            label: String::new(),
            start_epoch: 0,
            end_epoch: 10,
            storage_price_per_epoch: TokenAmount(price),
            provider_collateral: TokenAmount::ZERO,
            client_collateral: TokenAmount::ZERO,
        }
    }

    #[test]
    fn valid_ask() {
        assert!(ask().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut a = ask();
        a.min_piece_size = PaddedPieceSize(1024);
        a.max_piece_size = PaddedPieceSize(512);
        assert!(matches!(a.validate(), Err(AskError::PieceBounds { .. })));
    }

    #[test]
    fn negative_price_rejected() {
        let mut a = ask();
        a.verified_price = TokenAmount(-1);
        assert_eq!(
            a.validate(),
            Err(AskError::NegativePrice {
                tier: "verified",
                price: TokenAmount(-1)
            })
        );
    }

    #[test]
    fn price_scales_with_piece_size() {
        // 1 attoFIL per byte-epoch: a 2 KiB piece needs 2048 per epoch.
        assert_eq!(
            ask().min_price_per_epoch(PaddedPieceSize(2048), false),
            Ok(TokenAmount(2048))
        );
        assert!(ask().check_proposal(&proposal(2048, 2048, false)).is_ok());
        assert!(matches!(
            ask().check_proposal(&proposal(2048, 2047, false)),
            Err(AskMismatch::PriceTooLow { tier: "unverified", .. })
        ));
    }

    #[test]
    fn verified_deals_use_verified_tier() {
        assert!(ask().check_proposal(&proposal(2048, 0, true)).is_ok());
    }

    #[test]
    fn piece_bounds_enforced() {
        assert!(matches!(
            ask().check_proposal(&proposal(128, i128::MAX / GIB as i128, false)),
            Err(AskMismatch::PieceTooSmall { .. })
        ));
        assert!(matches!(
            ask().check_proposal(&proposal(64 * GIB, 64 * GIB as i128, false)),
            Err(AskMismatch::PieceTooLarge { .. })
        ));
        // Bounds are inclusive.
        assert!(ask().check_proposal(&proposal(256, 256, false)).is_ok());
        assert!(ask()
            .check_proposal(&proposal(32 * GIB, 32 * GIB as i128, false))
            .is_ok());
    }

    #[test]
    fn mismatch_message_is_readable() {
        let err = ask()
            .check_proposal(&proposal(64 * GIB, 64 * GIB as i128, false))
            .unwrap_err();
        assert!(err.to_string().contains("maximum allowed piece size"));
    }
}
