//! Replay and freshness policy.
//!
//! A voucher is accepted at most once and only while fresh. The authoritative
//! single-use ledger lives with the verifying contract; this module is the
//! off-chain mirror a service uses to pre-screen vouchers before spending gas
//! on a doomed transaction. A rejected voucher is never resubmitted; the
//! notary must issue a new one with a fresh salt and expiry.

use std::collections::HashSet;

use alloy_primitives::{FixedBytes, U256};
use autograph_voucher_types::Voucher;

use crate::digest::hash_fields;
use crate::errors::VoucherError;

/// How the `expiry` field relates to the current time.
///
/// The upstream issuance scripts stamp `expiry` with a timestamp *in the
/// past* ("from whatever the expiry token is you have 1 hour"), which only
/// makes sense if the field is an issuance stamp checked against a grace
/// window, not a deadline. Both readings exist in the wild, so the semantics
/// are explicit configuration here; pick the one your verifying contract
/// actually implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirySemantics {
    /// `expiry` is a deadline: fresh while `now < expiry`.
    Deadline,
    /// `expiry` is an issuance stamp: fresh while
    /// `expiry <= now < expiry + max_age` (seconds).
    IssuedAt { max_age: u64 },
}

/// Records consumed voucher digests; `mark_used` returns `false` when the
/// digest was seen before.
pub trait SaltLedger {
    fn mark_used(&mut self, digest: FixedBytes<32>) -> bool;
}

/// Process-local ledger backed by a `HashSet`. Suitable for tests and for a
/// single-process verifier front-end; anything distributed needs its own
/// implementation over shared storage.
#[derive(Debug, Default)]
pub struct InMemorySaltLedger(HashSet<FixedBytes<32>>);

impl SaltLedger for InMemorySaltLedger {
    fn mark_used(&mut self, digest: FixedBytes<32>) -> bool {
        self.0.insert(digest)
    }
}

/// Freshness and single-use acceptance check.
pub struct ReplayPolicy<L> {
    semantics: ExpirySemantics,
    ledger: L,
}

impl<L: SaltLedger> ReplayPolicy<L> {
    pub fn new(semantics: ExpirySemantics, ledger: L) -> Self {
        Self { semantics, ledger }
    }

    /// Accept or reject `voucher` at time `now` (unix seconds).
    ///
    /// Checks freshness first, then single-use. The digest recorded in the
    /// ledger is recomputed from the raw field values, never read from the
    /// voucher. A voucher that fails freshness is not recorded.
    pub fn accept(&mut self, voucher: &Voucher, now: u64) -> Result<(), VoucherError> {
        let expiry = voucher.expiry().ok_or_else(|| {
            VoucherError::schema_mismatch(voucher.schema, "missing `expiry` field")
        })?;

        if !self.is_fresh(expiry, now) {
            tracing::debug!(schema = %voucher.schema, %expiry, now, "voucher rejected as stale");
            return Err(VoucherError::Expired { expiry, now });
        }

        let (digest, _) = hash_fields(voucher.schema, &voucher.values)?;
        if !self.ledger.mark_used(digest) {
            tracing::debug!(schema = %voucher.schema, %digest, "voucher digest already consumed");
            return Err(VoucherError::AlreadyUsed);
        }
        Ok(())
    }

    fn is_fresh(&self, expiry: U256, now: u64) -> bool {
        let now = U256::from(now);
        match self.semantics {
            ExpirySemantics::Deadline => now < expiry,
            ExpirySemantics::IssuedAt { max_age } => {
                expiry <= now && now < expiry.saturating_add(U256::from(max_age))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use autograph_voucher_types::{FieldValue, SchemaKind, VoucherSignature};

    fn claim_voucher(salt: u64, expiry: u64) -> Voucher {
        let values = vec![
            FieldValue::Address(Address::ZERO),
            FieldValue::Address(Address::ZERO),
            FieldValue::Uint(U256::from(7u64)),
            FieldValue::Uint(U256::from(salt)),
            FieldValue::Uint(U256::from(expiry)),
        ];
        let (digest, signable_hash) =
            crate::digest::hash_fields(SchemaKind::Claim, &values).unwrap();
        Voucher {
            schema: SchemaKind::Claim,
            values,
            digest,
            signable_hash,
            signature: VoucherSignature::from_parts([0; 32], [0; 32], 27),
            remote_issued: false,
        }
    }

    fn deadline_policy() -> ReplayPolicy<InMemorySaltLedger> {
        ReplayPolicy::new(ExpirySemantics::Deadline, InMemorySaltLedger::default())
    }

    #[test]
    fn fresh_voucher_is_accepted_once() {
        let mut policy = deadline_policy();
        let voucher = claim_voucher(42, 2_000);
        assert!(policy.accept(&voucher, 1_000).is_ok());
        assert!(matches!(
            policy.accept(&voucher, 1_001).unwrap_err(),
            VoucherError::AlreadyUsed
        ));
    }

    #[test]
    fn expired_voucher_is_rejected_and_not_recorded() {
        let mut policy = deadline_policy();
        let voucher = claim_voucher(42, 500);
        assert!(matches!(
            policy.accept(&voucher, 1_000).unwrap_err(),
            VoucherError::Expired { .. }
        ));
        // A stale rejection must not poison the ledger for a later re-issue
        // with the same fields but a fresh expiry... which hashes differently
        // anyway; the original digest itself also stays unrecorded.
        assert!(policy.ledger.mark_used(voucher.digest));
    }

    #[test]
    fn expiry_boundary_is_exclusive_under_deadline() {
        let mut policy = deadline_policy();
        let voucher = claim_voucher(42, 1_000);
        assert!(matches!(
            policy.accept(&voucher, 1_000).unwrap_err(),
            VoucherError::Expired { .. }
        ));
    }

    #[test]
    fn vouchers_differing_only_in_salt_are_independent() {
        let mut policy = deadline_policy();
        let a = claim_voucher(41, 2_000);
        let b = claim_voucher(42, 2_000);
        assert_ne!(a.digest, b.digest);
        assert!(policy.accept(&a, 1_000).is_ok());
        assert!(policy.accept(&b, 1_000).is_ok());
    }

    #[test]
    fn issued_at_semantics_accepts_within_the_window() {
        let mut policy = ReplayPolicy::new(
            ExpirySemantics::IssuedAt { max_age: 3_600 },
            InMemorySaltLedger::default(),
        );
        // Stamped in the past, the way the upstream scripts do it.
        let voucher = claim_voucher(42, 1_000);
        assert!(policy.accept(&voucher, 2_000).is_ok());

        // Outside the window (or before the stamp) is stale.
        let late = claim_voucher(43, 1_000);
        assert!(matches!(
            policy.accept(&late, 1_000 + 3_600).unwrap_err(),
            VoucherError::Expired { .. }
        ));
        let early = claim_voucher(44, 5_000);
        assert!(matches!(
            policy.accept(&early, 4_999).unwrap_err(),
            VoucherError::Expired { .. }
        ));
    }
}
