//! Shared types for the Autograph voucher protocol.
//!
//! These types are the fixed part of the wire contract between the off-chain
//! notary tooling and the on-chain verifier: the closed set of voucher schemas,
//! the typed field values that fill them, and the 65-byte recoverable
//! signature form. Field order and field types are part of the protocol:
//! changing either changes every digest and breaks signature recovery for all
//! parties at once.

pub mod schema;
pub mod signature;
pub mod voucher;

pub use schema::{Field, FieldType, FieldValue, SchemaKind};
pub use signature::VoucherSignature;
pub use voucher::Voucher;
