//! Extended-key EdDSA signing and detached verification.

use curve25519_dalek::{EdwardsPoint, Scalar};
use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
use sha2::{Digest as _, Sha512};

use crate::extended::XPrv;

/// Length in bytes of a detached signature
pub const SIGNATURE_SIZE: usize = 64;

/// Signs `message` with a derived extended key.
///
/// The scalar half of the extended key is the signing scalar as-is; it is
/// already in clamped form, so there is no per-signature hashing of a seed.
/// The right half seeds the deterministic nonce:
///
/// ```text
/// r = H512(kR ‖ M) mod L,  R = r·G
/// S = (r + H512(R ‖ A ‖ M)·kL) mod L
/// ```
///
/// The resulting `R ‖ S` verifies as a standard Ed25519 detached signature
/// against `A = kL·G`.
pub fn sign_extended(key: &XPrv, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
    let scalar = Scalar::from_bytes_mod_order(*key.key_left());
    let point = EdwardsPoint::mul_base(&scalar).compress();

    let mut h = [0u8; 64];
    h.copy_from_slice(
        &Sha512::new()
            .chain_update(key.key_right())
            .chain_update(message)
            .finalize(),
    );
    let r = Scalar::from_bytes_mod_order_wide(&h);
    let big_r = EdwardsPoint::mul_base(&r).compress();

    h.copy_from_slice(
        &Sha512::new()
            .chain_update(big_r.as_bytes())
            .chain_update(point.as_bytes())
            .chain_update(message)
            .finalize(),
    );
    let k = Scalar::from_bytes_mod_order_wide(&h);
    let s = r + k * scalar;

    let mut signature = [0u8; SIGNATURE_SIZE];
    signature[..32].copy_from_slice(big_r.as_bytes());
    signature[32..].copy_from_slice(&s.to_bytes());
    signature
}

/// Verifies a detached Ed25519 signature.
///
/// Malformed keys and mismatched signatures both report `false`; no error
/// detail is surfaced.
pub fn verify_signature(
    signature: &[u8; SIGNATURE_SIZE],
    message: &[u8],
    public_key: &[u8; 32],
) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(signature)).is_ok()
}
