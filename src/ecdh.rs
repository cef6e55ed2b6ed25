//! X25519 key agreement over derived keys, with a transcript-binding hash.

use blake2::{digest::consts::U32, Blake2b, Digest as _};
use curve25519_dalek::edwards::CompressedEdwardsY;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

use crate::{errors::Error, extended::XPrv};

type Blake2b256 = Blake2b<U32>;

/// Montgomery u-coordinate of a compressed Ed25519 point.
fn edwards_to_montgomery(point: &[u8; 32]) -> Result<[u8; 32], Error> {
    let edwards = CompressedEdwardsY(*point)
        .decompress()
        .ok_or(Error::CryptoBackend("public key is not a curve point"))?;
    Ok(edwards.to_montgomery().to_bytes())
}

/// Computes the shared secret between `key` and `peer_public`.
///
/// Both Ed25519 points are converted to Montgomery form, the X25519 shared
/// point is computed with `kL` as the scalar, and the result is
/// `BLAKE2b-256(shared ‖ first ‖ second)` where `first`/`second` are the two
/// Montgomery keys in the order selected by `me_first`. The peer must use
/// the opposite flag or the two sides compute different secrets; hashing
/// both keys into the transcript rules out unknown-key-share substitution.
pub fn key_agreement(key: &XPrv, peer_public: &[u8; 32], me_first: bool) -> Result<[u8; 32], Error> {
    let own_montgomery = edwards_to_montgomery(&crate::extended::public_key(key.key_left()))?;
    let peer_montgomery = edwards_to_montgomery(peer_public)?;

    let scalar = StaticSecret::from(*key.key_left());
    let shared = scalar.diffie_hellman(&X25519PublicKey::from(peer_montgomery));

    let mut hash = Blake2b256::new();
    hash.update(shared.as_bytes());
    if me_first {
        hash.update(own_montgomery);
        hash.update(peer_montgomery);
    } else {
        hash.update(peer_montgomery);
        hash.update(own_montgomery);
    }
    Ok(hash.finalize().into())
}
