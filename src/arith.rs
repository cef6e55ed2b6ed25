//! Fixed-width little-endian arithmetic for the child-key update.
//!
//! The derivation update needs exactly two big-number operations: the
//! overflow-checked `kL + 8·zL` and the truncating `kR + zR`. Both are
//! explicit-carry loops over 32-byte little-endian values; no big-integer
//! type is involved.

use crate::errors::Error;

/// Clears the top `g` bits of a 32-byte little-endian value.
pub(crate) fn trunc_256_minus_g_bits(zl: &[u8; 32], g: u32) -> [u8; 32] {
    debug_assert!(g <= 256);
    let mut out = *zl;
    let mut remaining = g;
    for byte in out.iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        if remaining >= 8 {
            *byte = 0;
            remaining -= 8;
        } else {
            *byte &= 0xff >> remaining;
            remaining = 0;
        }
    }
    out
}

/// `kl + 8·t` over 32-byte little-endian values.
///
/// Fails with [`Error::DerivationOverflow`] when the sum reaches `2^255`:
/// past that point the value is no longer a clamped scalar, which is the
/// condition the per-profile depth bound guards against.
pub(crate) fn add_mul8_checked(kl: &[u8; 32], t: &[u8; 32]) -> Result<[u8; 32], Error> {
    let mut out = [0u8; 32];
    let mut shifted = 0u8;
    let mut carry = 0u16;
    for i in 0..32 {
        let t8 = u16::from((t[i] << 3) | shifted);
        shifted = t[i] >> 5;
        let v = u16::from(kl[i]) + t8 + carry;
        out[i] = v as u8;
        carry = v >> 8;
    }
    if carry != 0 || shifted != 0 || out[31] & 0x80 != 0 {
        return Err(Error::DerivationOverflow);
    }
    Ok(out)
}

/// `(x + y) mod 2^256`: the right-half update. Carries past the 32nd byte
/// are dropped, keeping the least-significant 256 bits.
pub(crate) fn add_mod_2_256(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in 0..32 {
        let v = u16::from(x[i]) + u16::from(y[i]) + carry;
        out[i] = v as u8;
        carry = v >> 8;
    }
    out
}
