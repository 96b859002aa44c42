//! Digest and signable-hash computation.
//!
//! Two fixed hash steps sit between the encoded tuple and the signature:
//!
//! 1. `digest = keccak256(encoded)`: Keccak-256 exactly, matching the
//!    on-chain `getHash`. Not SHA3-256: the padding differs.
//! 2. `signable_hash = keccak256("\x19Ethereum Signed Message:\n32" || digest)`
//!    is the EIP-191 personal-message convention over the 32 raw digest bytes,
//!    so general-purpose wallet `signMessage` implementations interoperate and
//!    a raw transaction hash can never double as a voucher hash.

use alloy_primitives::{keccak256, FixedBytes};
use autograph_voucher_types::{FieldValue, SchemaKind};

use crate::encode::encode;
use crate::errors::VoucherError;

/// EIP-191 prefix for a 32-byte payload (`\n32` is the decimal byte length).
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak-256 of the canonical encoding.
pub fn digest(encoded: &[u8]) -> FixedBytes<32> {
    keccak256(encoded)
}

/// Domain-separated hash actually signed by the notary.
pub fn signable_hash(digest: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}

/// Encode, digest and prefix in one step: `(digest, signable_hash)`.
pub fn hash_fields(
    schema: SchemaKind,
    values: &[FieldValue],
) -> Result<(FixedBytes<32>, FixedBytes<32>), VoucherError> {
    let encoded = encode(schema, values)?;
    let d = digest(&encoded);
    Ok((d, signable_hash(d)))
}
