//! Host-chain address rendering for raw public keys.

use data_encoding::BASE32_NOPAD;
use sha2::{Digest as _, Sha512_256};

/// Renders a public key as its 58-character base32 address.
///
/// The address encodes `pk ‖ SHA-512/256(pk)[0..4]` in unpadded RFC 4648
/// base32.
pub fn encode_address(public_key: &[u8; 32]) -> String {
    let checksum = Sha512_256::digest(public_key);
    let mut payload = [0u8; 36];
    payload[..32].copy_from_slice(public_key);
    payload[32..].copy_from_slice(&checksum[..4]);
    BASE32_NOPAD.encode(&payload)
}
