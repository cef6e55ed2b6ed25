//! BIP32-Ed25519: deterministic key hierarchies over the Ed25519 sub-group
//!
//! This crate implements the extended hierarchical deterministic wallet used
//! by ARC-0052 wallets, following the [Ed25519-BIP32 paper][paper]: 96-byte
//! extended keys derived from a 512-bit seed, hardened and soft child
//! derivation along [BIP-44][bip44-spec] paths, deterministic EdDSA signing
//! with the already-clamped derived scalar, X25519 key agreement with a hash
//! binding both peers' keys, and a domain-separation guard that refuses to
//! sign payloads carrying reserved blockchain tags.
//!
//! Two derivation-safety profiles are provided.
//! [`DerivationProfile::Khovratovich`] follows the original paper (224-bit
//! `zL`, safe to depth 2<sup>26</sup>); [`DerivationProfile::Peikert`]
//! retains 247 bits of `zL` for stronger per-level randomization and is safe
//! to depth 8. Walking past the safe depth fails loudly with
//! [`Error::DerivationOverflow`] instead of wrapping.
//!
//! ### Examples
//!
//! Derive a public key, sign a guarded payload and verify it:
//! ```rust
//! use xhd_wallet::{DerivationProfile, Encoding, KeyContext, SignMetadata, Wallet};
//!
//! // 64-byte seed produced by an external BIP-39 mnemonic-to-seed step
//! let wallet = Wallet::new([7u8; 64]);
//!
//! let profile = DerivationProfile::Khovratovich;
//! let public_key = wallet.key_gen(KeyContext::Address, 0, 0, 0, profile)?;
//!
//! let metadata = SignMetadata {
//!     encoding: Encoding::None,
//!     schema: serde_json::json!({ "type": "object" }),
//! };
//! let message = br#"{"note":"hello"}"#;
//! let signature = wallet.sign_data(KeyContext::Address, 0, 0, 0, message, &metadata, profile)?;
//! assert!(xhd_wallet::verify_signature(&signature, message, &public_key));
//! # Ok::<(), xhd_wallet::Error>(())
//! ```
//!
//! [paper]: https://input-output-hk.github.io/adrestia/static/Ed25519_BIP.pdf
//! [bip44-spec]: https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki

#![forbid(missing_docs, unsafe_code)]

use core::ops;

use generic_array::{
    typenum::{U32, U64},
    GenericArray,
};

mod address;
mod arith;
mod derive;
mod ecdh;
pub mod errors;
mod extended;
mod guard;
mod sign;
mod wallet;

pub use address::encode_address;
pub use derive::{derive_path, DerivationProfile};
pub use ecdh::key_agreement;
pub use errors::Error;
pub use extended::{XPrv, XPub, CHAIN_CODE_SIZE, PUBLIC_KEY_SIZE, SEED_SIZE, XPRV_SIZE, XPUB_SIZE};
pub use guard::{validate_data, Encoding, SignMetadata, RESERVED_PREFIXES};
pub use sign::{sign_extended, verify_signature, SIGNATURE_SIZE};
pub use wallet::{bip44_path, KeyContext, Wallet};

pub(crate) type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Beginning of hardened child indexes
///
/// $H = 2^{31}$ defines the range of hardened indexes. All indexes $i$ such
/// that $H \le i$ are hardened.
///
/// ## Example
/// Derive a child key with a path m/1<sub>H</sub>
/// ```rust
/// let root = xhd_wallet::XPrv::from_seed(&[7u8; 64])?;
/// let child = root.derive_child(1 + xhd_wallet::H, xhd_wallet::DerivationProfile::Khovratovich)?;
/// # Ok::<(), xhd_wallet::Error>(())
/// ```
pub const H: u32 = 1 << 31;

/// Child index, whether hardened or not
#[derive(Clone, Copy, Debug)]
pub enum ChildIndex {
    /// Hardened index
    Hardened(HardenedIndex),
    /// Non-hardened index
    NonHardened(NonHardenedIndex),
}

/// Child index in range $2^{31} \le i < 2^{32}$ corresponding to a hardened wallet
#[derive(Clone, Copy, Debug)]
pub struct HardenedIndex(u32);

/// Child index in range $0 \le i < 2^{31}$ corresponding to a non-hardened wallet
#[derive(Clone, Copy, Debug)]
pub struct NonHardenedIndex(u32);

impl HardenedIndex {
    /// The smallest possible value of hardened index. Equals to $2^{31}$
    pub const MIN: Self = Self(H);
    /// The largest possible value of hardened index. Equals to $2^{32} - 1$
    pub const MAX: Self = Self(u32::MAX);
}
impl NonHardenedIndex {
    /// The smallest possible value of non-hardened index. Equals to $0$
    pub const MIN: Self = Self(0);
    /// The largest possible value of non-hardened index. Equals to $2^{31} - 1$
    pub const MAX: Self = Self(H - 1);
}
impl ops::Deref for HardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for NonHardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ops::Deref for ChildIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Hardened(i) => i,
            Self::NonHardened(i) => i,
        }
    }
}
impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        match value {
            H.. => Self::Hardened(HardenedIndex(value)),
            _ => Self::NonHardened(NonHardenedIndex(value)),
        }
    }
}
impl TryFrom<u32> for HardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::Hardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl TryFrom<u32> for NonHardenedIndex {
    type Error = errors::OutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match ChildIndex::from(value) {
            ChildIndex::NonHardened(v) => Ok(v),
            _ => Err(errors::OutOfRange),
        }
    }
}
impl From<ChildIndex> for u32 {
    fn from(value: ChildIndex) -> Self {
        match value {
            ChildIndex::Hardened(v) => v.0,
            ChildIndex::NonHardened(v) => v.0,
        }
    }
}
impl From<HardenedIndex> for u32 {
    fn from(value: HardenedIndex) -> Self {
        value.0
    }
}
impl From<NonHardenedIndex> for u32 {
    fn from(value: NonHardenedIndex) -> Self {
        value.0
    }
}

/// Splits array `I` of 64 bytes into two arrays `I_L = I[..32]` and `I_R = I[32..]`
pub(crate) fn split_into_two_halves(
    i: &GenericArray<u8, U64>,
) -> (&GenericArray<u8, U32>, &GenericArray<u8, U32>) {
    generic_array::sequence::Split::split(i)
}
