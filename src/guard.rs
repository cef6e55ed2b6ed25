//! The signing guard: reserved-tag screening plus schema validation.
//!
//! Arbitrary-data signing must never produce a signature that the host
//! chain would accept over one of its own tagged object kinds. The guard
//! rejects any payload whose raw or decoded form starts with a reserved
//! tag, and any payload that does not satisfy the caller-supplied JSON
//! schema.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde_json::Value;

/// ASCII tags the host chain prepends to its signable objects
///
/// Payloads beginning with any of these are refused by [`validate_data`],
/// both before and after decoding.
pub const RESERVED_PREFIXES: [&str; 42] = [
    "appID",
    "arc",
    "aB",
    "aD",
    "aO",
    "aP",
    "aS",
    "AS",
    "B256",
    "BH",
    "BR",
    "CR",
    "GE",
    "KP",
    "MA",
    "MB",
    "MX",
    "NIC",
    "NIR",
    "NIV",
    "NPR",
    "OT1",
    "OT2",
    "PF",
    "PL",
    "Program",
    "ProgData",
    "PS",
    "PK",
    "SD",
    "SpecialAddr",
    "STIB",
    "spc",
    "spm",
    "spp",
    "sps",
    "spv",
    "TE",
    "TG",
    "TL",
    "TX",
    "VO",
];

/// Transport encoding of a to-be-signed payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Payload bytes are used as-is
    None,
    /// Payload is standard base64
    Base64,
    /// Payload is msgpack; it is decoded and re-serialized as JSON text
    MsgPack,
}

/// What a payload must look like to be signable
#[derive(Clone, Debug)]
pub struct SignMetadata {
    /// Transport encoding applied by the caller
    pub encoding: Encoding,
    /// JSON schema the decoded payload must satisfy
    pub schema: Value,
}

fn has_reserved_prefix(data: &[u8]) -> bool {
    RESERVED_PREFIXES
        .iter()
        .any(|tag| data.starts_with(tag.as_bytes()))
}

/// Checks `data` against the reserved-tag set and `metadata`.
///
/// Returns `false` on any of: a reserved tag prefixing the raw bytes, a
/// decode failure, a reserved tag prefixing the decoded bytes, the decoded
/// bytes not being JSON, or the JSON not satisfying the schema.
pub fn validate_data(data: &[u8], metadata: &SignMetadata) -> bool {
    if has_reserved_prefix(data) {
        return false;
    }
    let decoded = match metadata.encoding {
        Encoding::None => data.to_vec(),
        Encoding::Base64 => match BASE64_STANDARD.decode(data) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        },
        Encoding::MsgPack => {
            let value: Value = match rmp_serde::from_slice(data) {
                Ok(value) => value,
                Err(_) => return false,
            };
            match serde_json::to_vec(&value) {
                Ok(bytes) => bytes,
                Err(_) => return false,
            }
        }
    };
    if has_reserved_prefix(&decoded) {
        return false;
    }
    let instance: Value = match serde_json::from_slice(&decoded) {
        Ok(value) => value,
        Err(_) => return false,
    };
    match jsonschema::validator_for(&metadata.schema) {
        Ok(validator) => validator.is_valid(&instance),
        Err(_) => false,
    }
}
