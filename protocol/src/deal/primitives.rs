//! # Deal Primitives
//!
//! Small value types shared by proposals, asks and status snapshots. These
//! are deliberately thin: the chain and the proof system own the real
//! semantics, we only need to carry, compare and sanity-check the values.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{FR32_UNPADDED_CHUNK, MIN_PADDED_PIECE_SIZE};

/// Chain height, in epochs.
pub type ChainEpoch = i64;

/// On-chain deal ID. Zero until the publish message lands.
pub type DealId = u64;

/// Sector a piece was packed into.
pub type SectorNumber = u64;

/// Errors from parsing or validating primitive values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("padded piece size {0} is below the minimum of 128 bytes")]
    PieceTooSmall(u64),

    #[error("padded piece size {0} is not a power of two")]
    PieceNotPowerOfTwo(u64),

    #[error("unpadded piece size {0} does not pad to a power of two")]
    UnpaddedNotAligned(u64),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid content identifier '{0}'")]
    InvalidCid(String),
}

// ---------------------------------------------------------------------------
// Token Amounts
// ---------------------------------------------------------------------------

/// Token amount in attoFIL. Signed, because collateral arithmetic can dip
/// below zero before validation catches it.
///
/// Serialized as a decimal string, the chain's JSON form for big integers.
/// Deserializes from either a string or a JSON integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub i128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `self * rhs`, `None` on overflow.
    pub fn checked_mul(self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(i128::from(rhs)).map(Self)
    }

    /// `self * num / den`, truncating toward zero. `None` on overflow or a
    /// zero denominator.
    pub fn mul_div(self, num: u64, den: u64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        self.0
            .checked_mul(i128::from(num))
            .map(|v| Self(v / i128::from(den)))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenAmountVisitor)
    }
}

struct TokenAmountVisitor;

impl<'de> Visitor<'de> for TokenAmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an attoFIL amount as an integer or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<TokenAmount, E> {
        Ok(TokenAmount(i128::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<TokenAmount, E> {
        Ok(TokenAmount(i128::from(value)))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<TokenAmount, E> {
        Ok(TokenAmount(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<TokenAmount, E> {
        i128::try_from(value)
            .map(TokenAmount)
            .map_err(|_| E::invalid_value(Unexpected::Other("out of range integer"), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TokenAmount, E> {
        value
            .parse()
            .map(TokenAmount)
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attoFIL", self.0)
    }
}

// ---------------------------------------------------------------------------
// Piece Sizes
// ---------------------------------------------------------------------------

/// Size of a piece after Fr32 padding. Always a power of two ≥ 128.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaddedPieceSize(pub u64);

/// Size of a piece before padding: `padded - padded / 128`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnpaddedPieceSize(pub u64);

impl PaddedPieceSize {
    pub fn validate(self) -> Result<(), PrimitiveError> {
        if self.0 < MIN_PADDED_PIECE_SIZE {
            return Err(PrimitiveError::PieceTooSmall(self.0));
        }
        if !self.0.is_power_of_two() {
            return Err(PrimitiveError::PieceNotPowerOfTwo(self.0));
        }
        Ok(())
    }

    pub fn unpadded(self) -> UnpaddedPieceSize {
        UnpaddedPieceSize(self.0 - self.0 / 128)
    }
}

impl UnpaddedPieceSize {
    pub fn validate(self) -> Result<(), PrimitiveError> {
        if self.0 < FR32_UNPADDED_CHUNK {
            return Err(PrimitiveError::UnpaddedNotAligned(self.0));
        }
        if !self.padded().0.is_power_of_two() {
            return Err(PrimitiveError::UnpaddedNotAligned(self.0));
        }
        Ok(())
    }

    pub fn padded(self) -> PaddedPieceSize {
        PaddedPieceSize(self.0 + self.0 / FR32_UNPADDED_CHUNK)
    }
}

impl fmt::Display for PaddedPieceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UnpaddedPieceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Content identifier in its string form (`bafy...`, `baga...`, `Qm...`).
///
/// Parsing only checks the multibase shape; decoding the multihash is the
/// business of whoever computed it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

impl Cid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cid {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v0 = s.len() == 46 && s.starts_with("Qm");
        // CIDv1 strings carry a one-character multibase prefix.
        let v1 = s.len() > 8 && matches!(s.as_bytes()[0], b'b' | b'z' | b'f' | b'm' | b'u');
        if (v0 || v1) && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
            Ok(Cid(s.to_string()))
        } else {
            Err(PrimitiveError::InvalidCid(s.to_string()))
        }
    }
}

impl TryFrom<String> for Cid {
    type Error = PrimitiveError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chain actor address in string form, e.g. `f01234` or `t3...`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Network prefix: `f` for mainnet, `t` for testnets.
    pub fn network(&self) -> char {
        self.0.as_bytes()[0] as char
    }

    /// Address protocol: 0 = ID, 1 = secp256k1, 2 = actor, 3 = BLS, 4 = delegated.
    pub fn protocol(&self) -> u8 {
        self.0.as_bytes()[1] - b'0'
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() >= 3
            && matches!(bytes[0], b'f' | b't')
            && matches!(bytes[1], b'0'..=b'4')
            && bytes[2..].iter().all(|b| b.is_ascii_alphanumeric());
        if well_formed {
            Ok(Address(s.to_string()))
        } else {
            Err(PrimitiveError::InvalidAddress(s.to_string()))
        }
    }
}

impl TryFrom<String> for Address {
    type Error = PrimitiveError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Signature scheme tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigType {
    Secp256k1,
    Bls,
    Delegated,
}

/// A signature as it travels on the wire. We never verify these ourselves;
/// that's the [`SignatureVerifier`](super::collaborators::SignatureVerifier)'s job.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub sig_type: SigType,
    pub data: Vec<u8>,
}

impl Signature {
    pub fn new(sig_type: SigType, data: Vec<u8>) -> Self {
        Self { sig_type, data }
    }
}

// Signature bytes never end up in logs.
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("sig_type", &self.sig_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A piece commitment and its padded size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceInfo {
    pub size: PaddedPieceSize,
    pub piece_cid: Cid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_round_trip() {
        let padded = PaddedPieceSize(2048);
        assert_eq!(padded.unpadded(), UnpaddedPieceSize(2032));
        assert_eq!(UnpaddedPieceSize(2032).padded(), padded);
        assert!(UnpaddedPieceSize(2032).validate().is_ok());
    }

    #[test]
    fn padded_validation() {
        assert!(PaddedPieceSize(128).validate().is_ok());
        assert_eq!(
            PaddedPieceSize(64).validate(),
            Err(PrimitiveError::PieceTooSmall(64))
        );
        assert_eq!(
            PaddedPieceSize(3000).validate(),
            Err(PrimitiveError::PieceNotPowerOfTwo(3000))
        );
    }

    #[test]
    fn unpadded_validation() {
        assert!(UnpaddedPieceSize(127).validate().is_ok());
        assert!(UnpaddedPieceSize(2000).validate().is_err());
        assert!(UnpaddedPieceSize(100).validate().is_err());
    }

    #[test]
    fn token_mul_div() {
        let price = TokenAmount(1_000);
        assert_eq!(price.mul_div(512, 1024), Some(TokenAmount(500)));
        assert_eq!(price.mul_div(1, 0), None);
        assert_eq!(TokenAmount(i128::MAX).mul_div(2, 1), None);
        assert_eq!(price.checked_mul(3), Some(TokenAmount(3_000)));
        assert_eq!(TokenAmount(i128::MAX).checked_mul(2), None);
    }

    #[test]
    fn token_amount_json_forms() {
        let amount = TokenAmount(-12_345_678_901_234_567_890_123);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, r#""-12345678901234567890123""#);
        assert_eq!(serde_json::from_str::<TokenAmount>(&json).unwrap(), amount);

        assert_eq!(serde_json::from_str::<TokenAmount>("42").unwrap(), TokenAmount(42));
        assert_eq!(serde_json::from_str::<TokenAmount>("-7").unwrap(), TokenAmount(-7));
        assert!(serde_json::from_str::<TokenAmount>(r#""12fil""#).is_err());
        assert!(serde_json::from_str::<TokenAmount>("1.5").is_err());
    }

    #[test]
    fn token_amount_survives_buffered_formats() {
        // Untagged enums and `Value` buffer their input before decoding.
        #[derive(Debug, PartialEq, Deserialize)]
        #[serde(untagged)]
        enum Either {
            Wrapped { amount: TokenAmount },
            Bare(TokenAmount),
        }
        assert_eq!(
            serde_json::from_str::<Either>(r#"{"amount": 1073741824}"#).unwrap(),
            Either::Wrapped { amount: TokenAmount(1 << 30) }
        );
        assert_eq!(
            serde_json::from_str::<Either>(r#""5""#).unwrap(),
            Either::Bare(TokenAmount(5))
        );
        let value = serde_json::json!({ "amount": 9 });
        assert_eq!(
            serde_json::from_value::<Either>(value).unwrap(),
            Either::Wrapped { amount: TokenAmount(9) }
        );
    }

    #[test]
    fn address_parsing() {
        let addr: Address = "f01234".parse().unwrap();
        assert_eq!(addr.network(), 'f');
        assert_eq!(addr.protocol(), 0);
        assert!("t3abcdef".parse::<Address>().is_ok());
        assert!("x01234".parse::<Address>().is_err());
        assert!("f9abc".parse::<Address>().is_err());
        assert!("f0".parse::<Address>().is_err());
    }

    #[test]
    fn cid_parsing() {
        assert!("bafyreigdmqpykrgxyaxtlafqpqhzrb7qy2rh75nldvfd4tucqmqqme5yje"
            .parse::<Cid>()
            .is_ok());
        assert!("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
            .parse::<Cid>()
            .is_ok());
        assert!("".parse::<Cid>().is_err());
        assert!("not a cid".parse::<Cid>().is_err());
    }

    #[test]
    fn cid_serde_validates() {
        let ok: Result<Cid, _> = serde_json::from_str("\"baga6ea4seaqao7s73y24kcutaosvacpdjgfe5pw76ooefnyqw4ynr3d2y6x2mpq\"");
        assert!(ok.is_ok());
        let bad: Result<Cid, _> = serde_json::from_str("\"??\"");
        assert!(bad.is_err());
    }

    #[test]
    fn signature_debug_hides_bytes() {
        let sig = Signature::new(SigType::Bls, vec![0xde, 0xad, 0xbe, 0xef]);
        let rendered = format!("{:?}", sig);
        assert!(rendered.contains("len: 4"));
        assert!(!rendered.contains("222"));
    }
}
