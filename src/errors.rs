//! When something goes wrong

use core::fmt;

/// Failure taxonomy of wallet operations
///
/// The set is closed: every fallible operation in the crate reports one of
/// these kinds, and crypto-primitive failures are folded into
/// [`CryptoBackend`](Self::CryptoBackend). Verification mismatches are not
/// errors; [`verify_signature`](crate::verify_signature) returns `false`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The child scalar `kL + 8·zL` left the range a clamped scalar can
    /// occupy. The requested path is not derivable under this profile;
    /// retrying with the same path and profile fails identically.
    #[error("child scalar overflowed the safe range for this derivation profile")]
    DerivationOverflow,

    /// A hardened index was passed where only soft indexes are possible
    #[error("index is hardened where a non-hardened index is required")]
    InvalidIndex,

    /// The signing guard rejected the payload: it carries a reserved tag,
    /// fails to decode, or does not satisfy the supplied schema
    #[error("payload rejected by the signing guard")]
    DataValidation,

    /// Root key material did not normalize within the re-keying cap
    #[error("seed rejected: root key material did not normalize")]
    SeedRejected,

    /// A curve or codec primitive failed on otherwise well-formed input
    #[error("crypto backend failure: {0}")]
    CryptoBackend(&'static str),
}

/// Value was out of range
#[derive(Debug)]
pub struct OutOfRange;

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("out of range")
    }
}

impl std::error::Error for OutOfRange {}

impl From<OutOfRange> for Error {
    fn from(_: OutOfRange) -> Self {
        Error::InvalidIndex
    }
}
