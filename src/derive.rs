//! Hardened and soft child derivation, and the path walk built on top.

use curve25519_dalek::{edwards::CompressedEdwardsY, EdwardsPoint, Scalar};
use hmac::Mac as _;

use crate::{
    arith,
    errors::Error,
    extended::{public_key, XPrv, XPub, XPUB_SIZE},
    split_into_two_halves, ChildIndex, HmacSha512, NonHardenedIndex,
};

/// Safety profile of the `zL` truncation
///
/// The profile fixes how many high bits of `zL` are discarded before the
/// child scalar update `kL + 8·zL`, and with it how many derivation levels
/// are guaranteed not to overflow the scalar range:
///
/// * [`Peikert`](Self::Peikert) keeps 247 bits and guarantees 8 levels;
/// * [`Khovratovich`](Self::Khovratovich) keeps 224 bits (the first 28
///   bytes, as in the Ed25519-BIP32 paper) and guarantees 2<sup>26</sup>
///   levels.
///
/// Walking past the guaranteed depth does not wrap: the update fails with
/// [`Error::DerivationOverflow`] as soon as the child scalar would reach
/// `2^255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivationProfile {
    /// Conservative truncation: 247-bit `zL`, safe derivation depth 8
    Peikert,
    /// Original paper truncation: 224-bit `zL`, safe derivation depth 2^26
    Khovratovich,
}

impl DerivationProfile {
    /// Number of high bits of `zL` discarded by this profile.
    pub const fn dropped_bits(self) -> u32 {
        match self {
            Self::Peikert => 9,
            Self::Khovratovich => 32,
        }
    }

    /// Number of derivation levels guaranteed to stay within the scalar range.
    pub const fn safe_depth(self) -> u64 {
        1 << (self.dropped_bits() - 6)
    }
}

// Tag bytes of the derivation HMAC messages. Hardened children hash the
// secret halves, soft children the public point; the z and chain-code
// messages differ only in the tag.
const TAG_Z_HARDENED: u8 = 0x00;
const TAG_CC_HARDENED: u8 = 0x01;
const TAG_Z_SOFT: u8 = 0x02;
const TAG_CC_SOFT: u8 = 0x03;

fn tagged_hmac(cc: &[u8; 32], tag: u8, body: &[&[u8]], index: u32) -> ([u8; 32], [u8; 32]) {
    let mut mac = HmacSha512::new_from_slice(cc)
        .expect("this never fails: hmac can handle keys of any size");
    mac.update(&[tag]);
    for part in body {
        mac.update(part);
    }
    mac.update(&index.to_le_bytes());
    let out = mac.finalize().into_bytes();
    let (left, right) = split_into_two_halves(&out);
    ((*left).into(), (*right).into())
}

/// `z` halves and child chain code for a soft index, computable from the
/// parent point alone.
fn soft_shift(point: &[u8; 32], cc: &[u8; 32], index: NonHardenedIndex) -> ([u8; 32], [u8; 32], [u8; 32]) {
    let (z_left, z_right) = tagged_hmac(cc, TAG_Z_SOFT, &[point], *index);
    let (_, child_cc) = tagged_hmac(cc, TAG_CC_SOFT, &[point], *index);
    (z_left, z_right, child_cc)
}

impl XPrv {
    /// Derives the child extended secret key at `index`.
    ///
    /// Hardened indexes diversify through both secret halves, soft indexes
    /// through the public point, after which the update is the same:
    /// `kL' = kL + 8·zL` with the profile's truncation of `zL`,
    /// `kR' = kR + zR mod 2^256`.
    ///
    /// Fails with [`Error::DerivationOverflow`] when `kL'` leaves the
    /// clamped-scalar range; the path is then not derivable under this
    /// profile.
    pub fn derive_child(
        &self,
        index: impl Into<ChildIndex>,
        profile: DerivationProfile,
    ) -> Result<XPrv, Error> {
        let (z_left, z_right, child_cc) = match index.into() {
            ChildIndex::Hardened(i) => {
                let secret: [&[u8]; 2] = [self.key_left(), self.key_right()];
                let (z_left, z_right) =
                    tagged_hmac(self.chain_code(), TAG_Z_HARDENED, &secret, *i);
                let (_, child_cc) = tagged_hmac(self.chain_code(), TAG_CC_HARDENED, &secret, *i);
                (z_left, z_right, child_cc)
            }
            ChildIndex::NonHardened(i) => {
                let point = public_key(self.key_left());
                soft_shift(&point, self.chain_code(), i)
            }
        };

        let t = arith::trunc_256_minus_g_bits(&z_left, profile.dropped_bits());
        let child_left = arith::add_mul8_checked(self.key_left(), &t)?;
        let child_right = arith::add_mod_2_256(self.key_right(), &z_right);
        Ok(XPrv::from_parts(&child_left, &child_right, &child_cc))
    }
}

impl XPub {
    /// Derives the child extended public key at a soft `index`.
    ///
    /// Only soft derivation is possible without secret material; indexes at
    /// or above `2^31` fail with [`Error::InvalidIndex`]. The child point is
    /// `A + (8·zL)·G` and equals the public key of the corresponding
    /// secret-side derivation.
    pub fn derive_child(&self, index: u32, profile: DerivationProfile) -> Result<XPub, Error> {
        let index = NonHardenedIndex::try_from(index)?;
        let (z_left, _, child_cc) = soft_shift(self.point_bytes(), self.chain_code(), index);

        let t = arith::trunc_256_minus_g_bits(&z_left, profile.dropped_bits());
        let t8 = arith::add_mul8_checked(&[0u8; 32], &t)?;
        let parent = CompressedEdwardsY(*self.point_bytes())
            .decompress()
            .ok_or(Error::CryptoBackend("extended public key is not a curve point"))?;
        let child = parent + EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(t8));

        let mut out = [0u8; XPUB_SIZE];
        out[..32].copy_from_slice(child.compress().as_bytes());
        out[32..].copy_from_slice(&child_cc);
        Ok(XPub::from_bytes(out))
    }
}

/// Walks `path` from `root` by repeated child derivation.
///
/// An empty path returns `root` itself.
pub fn derive_path(root: &XPrv, path: &[u32], profile: DerivationProfile) -> Result<XPrv, Error> {
    let mut key = root.clone();
    for &index in path {
        key = key.derive_child(index, profile)?;
    }
    Ok(key)
}
