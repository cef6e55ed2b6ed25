//! Extended key material: the 96-byte secret form and the 64-byte public form.

use core::fmt;

use curve25519_dalek::{EdwardsPoint, Scalar};
use hmac::Mac as _;
use sha2::{Digest as _, Sha256, Sha512};
use subtle::ConstantTimeEq as _;
use zeroize::Zeroize;

use crate::{errors::Error, HmacSha512};

/// Length in bytes of the wallet seed
pub const SEED_SIZE: usize = 64;
/// Length in bytes of an extended secret key
pub const XPRV_SIZE: usize = 96;
/// Length in bytes of an extended public key
pub const XPUB_SIZE: usize = 64;
/// Length in bytes of a public key
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Length in bytes of a chain code
pub const CHAIN_CODE_SIZE: usize = 32;

// Root re-keying succeeds on the first pass for all but ~2^-256 of seeds;
// the cap only bounds the loop.
const ROOT_REKEY_CAP: usize = 256;

/// Extended secret key: scalar half `kL`, diversifier half `kR` and chain
/// code `c`, concatenated
///
/// `kL` is kept in clamped form at all times: the low three bits are clear,
/// bit 255 is clear and bit 254 is set. At the root the third-highest bit
/// (bit 253) is additionally clear, which is what gives the per-profile
/// derivation-depth guarantee. The key is wiped when dropped.
pub struct XPrv([u8; XPRV_SIZE]);

impl XPrv {
    /// Derives the root extended key from a 64-byte seed.
    ///
    /// `SHA-512(seed)` is re-keyed through `HMAC-SHA512(key = kL, msg = kR)`
    /// until the third-highest bit of the scalar half clears, then clamped.
    /// The chain code is `SHA-256(0x01 ‖ seed)`.
    ///
    /// Returns [`Error::SeedRejected`] for the (cryptographically
    /// unreachable) seeds whose re-keying does not settle within the cap.
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> Result<Self, Error> {
        let mut k = [0u8; 64];
        k.copy_from_slice(&Sha512::digest(seed));

        let mut rekeyings = 0;
        while k[31] & 0b0010_0000 != 0 {
            if rekeyings == ROOT_REKEY_CAP {
                k.zeroize();
                return Err(Error::SeedRejected);
            }
            let next = HmacSha512::new_from_slice(&k[..32])
                .expect("this never fails: hmac can handle keys of any size")
                .chain_update(&k[32..])
                .finalize()
                .into_bytes();
            k.copy_from_slice(&next);
            rekeyings += 1;
        }

        k[0] &= 0b1111_1000;
        k[31] &= 0b0111_1111;
        k[31] |= 0b0100_0000;

        let mut out = [0u8; XPRV_SIZE];
        out[..64].copy_from_slice(&k);
        out[64..].copy_from_slice(&Sha256::new().chain_update([0x01]).chain_update(seed).finalize());
        k.zeroize();
        Ok(Self(out))
    }

    /// Wraps a 96-byte `kL ‖ kR ‖ c`, checking the scalar clamp invariants.
    ///
    /// The low three bits of `kL` must be clear, bit 255 clear and bit 254
    /// set; bit 253 is left unconstrained because non-root keys accumulate
    /// into it. Violations are [`Error::CryptoBackend`].
    pub fn from_bytes_verified(bytes: [u8; XPRV_SIZE]) -> Result<Self, Error> {
        if bytes[0] & 0b0000_0111 != 0 {
            return Err(Error::CryptoBackend("extended key scalar has low bits set"));
        }
        if bytes[31] & 0b1100_0000 != 0b0100_0000 {
            return Err(Error::CryptoBackend("extended key scalar has wrong high bits"));
        }
        Ok(Self(bytes))
    }

    pub(crate) fn from_parts(kl: &[u8; 32], kr: &[u8; 32], cc: &[u8; 32]) -> Self {
        let mut out = [0u8; XPRV_SIZE];
        out[..32].copy_from_slice(kl);
        out[32..64].copy_from_slice(kr);
        out[64..].copy_from_slice(cc);
        Self(out)
    }

    /// Scalar half `kL`
    pub fn key_left(&self) -> &[u8; 32] {
        self.0[..32].try_into().expect("kL is 32 bytes")
    }

    /// Diversifier half `kR`
    pub fn key_right(&self) -> &[u8; 32] {
        self.0[32..64].try_into().expect("kR is 32 bytes")
    }

    /// Chain code `c`
    pub fn chain_code(&self) -> &[u8; 32] {
        self.0[64..].try_into().expect("chain code is 32 bytes")
    }

    /// Raw 96 bytes `kL ‖ kR ‖ c`
    pub fn to_bytes(&self) -> [u8; XPRV_SIZE] {
        self.0
    }

    /// The public counterpart `A ‖ c` with `A = kL·G`.
    pub fn public(&self) -> XPub {
        let mut out = [0u8; XPUB_SIZE];
        out[..32].copy_from_slice(&public_key(self.key_left()));
        out[32..].copy_from_slice(self.chain_code());
        XPub(out)
    }
}

impl Clone for XPrv {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl Drop for XPrv {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
impl PartialEq for XPrv {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}
impl Eq for XPrv {}
impl fmt::Debug for XPrv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XPrv(..)")
    }
}

/// `kL·G` for an already-clamped scalar half.
///
/// The scalar is reduced modulo the group order before the base
/// multiplication; the base point has exactly that order, so the point is
/// the same as for the unreduced value and no re-clamping is applied.
pub(crate) fn public_key(key_left: &[u8; 32]) -> [u8; 32] {
    let scalar = Scalar::from_bytes_mod_order(*key_left);
    EdwardsPoint::mul_base(&scalar).compress().to_bytes()
}

/// Extended public key: curve point `A` and chain code `c`, concatenated
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct XPub(pub(crate) [u8; XPUB_SIZE]);

impl XPub {
    /// Wraps raw bytes `A ‖ c`.
    pub fn from_bytes(bytes: [u8; XPUB_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw 64 bytes `A ‖ c`
    pub fn to_bytes(&self) -> [u8; XPUB_SIZE] {
        self.0
    }

    /// Compressed Edwards point `A`
    pub fn point_bytes(&self) -> &[u8; 32] {
        self.0[..32].try_into().expect("A is 32 bytes")
    }

    /// Chain code `c`
    pub fn chain_code(&self) -> &[u8; 32] {
        self.0[32..].try_into().expect("chain code is 32 bytes")
    }
}

impl fmt::Debug for XPub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XPub(")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}
