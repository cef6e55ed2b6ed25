//! The seed-owning wallet: BIP-44 contexts and the public operation set.

use core::fmt;

use zeroize::Zeroizing;

use crate::{
    derive::{derive_path, DerivationProfile},
    ecdh,
    errors::Error,
    extended::{XPrv, SEED_SIZE},
    guard::{validate_data, SignMetadata},
    sign::{sign_extended, SIGNATURE_SIZE},
    NonHardenedIndex, H,
};

/// Which BIP-44 coin a derivation addresses
///
/// The context only picks the hardened coin component of the path;
/// derivation is otherwise identical between the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyContext {
    /// Spending keys, coin type 283'
    Address,
    /// Identity keys, coin type 0'
    Identity,
}

impl KeyContext {
    /// BIP-44 coin type of the context.
    pub const fn coin_type(self) -> u32 {
        match self {
            Self::Address => 283,
            Self::Identity => 0,
        }
    }
}

/// Builds the five-component BIP-44 path for a context.
///
/// Purpose, coin and account are hardened; change and address index stay
/// soft. Fails with [`Error::InvalidIndex`] when `account`, `change` or
/// `index` is not below `2^31`.
pub fn bip44_path(
    ctx: KeyContext,
    account: u32,
    change: u32,
    index: u32,
) -> Result<[u32; 5], Error> {
    let account = H.checked_add(account).ok_or(Error::InvalidIndex)?;
    let change = *NonHardenedIndex::try_from(change)?;
    let index = *NonHardenedIndex::try_from(index)?;
    Ok([H + 44, H + ctx.coin_type(), account, change, index])
}

/// A deterministic wallet over a single 512-bit seed
///
/// The wallet owns its seed for its whole lifetime and recomputes the root
/// extended key from it on every operation; no key material is cached.
/// Operations are synchronous, CPU-bound and touch no shared state, so a
/// wallet can be shared read-only across threads. The seed is wiped when
/// the wallet is dropped.
pub struct Wallet {
    seed: Zeroizing<[u8; SEED_SIZE]>,
}

impl Wallet {
    /// Creates a wallet owning `seed`.
    pub fn new(seed: [u8; SEED_SIZE]) -> Self {
        Self {
            seed: Zeroizing::new(seed),
        }
    }

    /// Derives the extended secret key at a BIP-44 position.
    pub fn derive_xprv(
        &self,
        ctx: KeyContext,
        account: u32,
        change: u32,
        index: u32,
        profile: DerivationProfile,
    ) -> Result<XPrv, Error> {
        let root = XPrv::from_seed(&self.seed)?;
        derive_path(&root, &bip44_path(ctx, account, change, index)?, profile)
    }

    /// Public key at a BIP-44 position.
    pub fn key_gen(
        &self,
        ctx: KeyContext,
        account: u32,
        change: u32,
        index: u32,
        profile: DerivationProfile,
    ) -> Result<[u8; 32], Error> {
        let key = self.derive_xprv(ctx, account, change, index, profile)?;
        Ok(*key.public().point_bytes())
    }

    /// Signs `data` after it passes the signing guard.
    ///
    /// Fails with [`Error::DataValidation`] when `data` carries a reserved
    /// tag or does not satisfy `metadata`; see
    /// [`validate_data`](crate::validate_data).
    pub fn sign_data(
        &self,
        ctx: KeyContext,
        account: u32,
        change: u32,
        index: u32,
        data: &[u8],
        metadata: &SignMetadata,
        profile: DerivationProfile,
    ) -> Result<[u8; SIGNATURE_SIZE], Error> {
        if !validate_data(data, metadata) {
            return Err(Error::DataValidation);
        }
        let key = self.derive_xprv(ctx, account, change, index, profile)?;
        Ok(sign_extended(&key, data))
    }

    /// Signs an externally prepared, already-tagged transaction payload.
    ///
    /// The caller has applied the host chain's own transaction tag, so this
    /// is the one signing path that skips the guard.
    pub fn sign_transaction(
        &self,
        ctx: KeyContext,
        account: u32,
        change: u32,
        index: u32,
        transaction: &[u8],
        profile: DerivationProfile,
    ) -> Result<[u8; SIGNATURE_SIZE], Error> {
        let key = self.derive_xprv(ctx, account, change, index, profile)?;
        Ok(sign_extended(&key, transaction))
    }

    /// X25519 agreement with `peer_public`, bound to both parties' keys.
    ///
    /// `me_first` fixes the key order inside the binding hash; the peer
    /// must use the opposite value. See [`key_agreement`](crate::key_agreement).
    pub fn key_agreement(
        &self,
        ctx: KeyContext,
        account: u32,
        change: u32,
        index: u32,
        peer_public: &[u8; 32],
        me_first: bool,
        profile: DerivationProfile,
    ) -> Result<[u8; 32], Error> {
        let key = self.derive_xprv(ctx, account, change, index, profile)?;
        ecdh::key_agreement(&key, peer_public, me_first)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Wallet { .. }")
    }
}
