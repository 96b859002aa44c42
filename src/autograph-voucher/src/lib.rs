//! Voucher authorization protocol core.
//!
//! A voucher is a signed assertion that a specific privileged operation
//! (claim, free mint, fee mint, job settlement) may be performed with
//! specific parameters. The pipeline is fixed:
//!
//! ```text
//! fields ── encode ──> bytes ── keccak256 ──> digest
//!        ── "\x19Ethereum Signed Message:\n32" ──> signable hash
//!        ── secp256k1 recoverable sig ──> voucher
//! ```
//!
//! The verifying side recomputes the digest from the raw field values,
//! recovers the signer, checks it against the authorized notaries and applies
//! the replay/freshness policy. Off-chain and on-chain verifiers must agree
//! byte-for-byte on every step; that compatibility contract is what this
//! crate pins down.
//!
//! Everything here is a pure, stateless computation over in-memory buffers,
//! safe to call concurrently with no shared state. The only exception is the
//! remote notary client, which performs one HTTP round trip per issuance.

pub mod digest;
pub mod encode;
pub mod errors;
pub mod notary;
pub mod policy;
pub mod remote;
pub mod verifier;

pub use autograph_voucher_types::{Field, FieldType, FieldValue, SchemaKind, Voucher, VoucherSignature};

pub use digest::{hash_fields, signable_hash};
pub use encode::encode;
pub use errors::VoucherError;
pub use notary::{fresh_salt, LocalNotary, Notary};
pub use policy::{ExpirySemantics, InMemorySaltLedger, ReplayPolicy, SaltLedger};
pub use remote::RemoteNotary;
pub use verifier::{recover, verify, verify_issuer, SignerPolicy};
