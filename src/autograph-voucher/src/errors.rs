use alloy_primitives::{Address, FixedBytes, U256};
use autograph_voucher_types::SchemaKind;
use thiserror::Error;

/// Protocol failures.
///
/// None of these are transient: every variant is either a caller bug
/// (`SchemaMismatch`, `InvalidKey`, `MalformedSignature`) or a
/// security-relevant rejection (`RecoveryFailure`, `Expired`, `AlreadyUsed`,
/// the remote-notary mismatches). Nothing here should be auto-retried; an
/// expired or consumed voucher must be re-issued with a fresh salt.
#[derive(Debug, Error)]
pub enum VoucherError {
    /// Encoder input does not match the schema shape.
    #[error("schema mismatch for {schema}: {detail}")]
    SchemaMismatch {
        schema: SchemaKind,
        detail: String,
    },

    /// The signing key scalar is zero, out of the curve order, or not valid hex.
    #[error("invalid notary key")]
    InvalidKey,

    /// The signature is not 65 bytes `r||s||v`, or carries an unusable
    /// recovery id / scalar pair.
    #[error("malformed signature: {0}")]
    MalformedSignature(&'static str),

    /// No curve point recovers from the (hash, signature) pair.
    #[error("signature recovery failed")]
    RecoveryFailure,

    /// The recovered signer is not an authorized notary.
    #[error("signer {0} is not an authorized notary")]
    UnauthorizedNotary(Address),

    /// The voucher failed the freshness check.
    #[error("voucher not fresh: expiry {expiry}, now {now}")]
    Expired { expiry: U256, now: u64 },

    /// The voucher's digest was already accepted once.
    #[error("voucher already used")]
    AlreadyUsed,

    /// Remote notary transport failure.
    #[error("remote notary request failed: {0}")]
    Remote(#[from] reqwest::Error),

    /// Remote notary returned a response that could not be decoded.
    #[error("remote notary returned a malformed response: {0}")]
    RemoteMalformed(&'static str),

    /// Remote notary returned a hash that does not match the one recomputed
    /// locally from the raw field values.
    #[error("remote notary hash mismatch: recomputed {expected}, got {got}")]
    RemoteHashMismatch {
        expected: FixedBytes<32>,
        got: FixedBytes<32>,
    },
}

impl VoucherError {
    pub(crate) fn schema_mismatch(schema: SchemaKind, detail: impl Into<String>) -> Self {
        VoucherError::SchemaMismatch {
            schema,
            detail: detail.into(),
        }
    }
}
