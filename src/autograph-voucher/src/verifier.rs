//! Signer recovery and authorization checks.
//!
//! This is the off-chain twin of the contract's `recoverSigner` path: given
//! the signable hash and a 65-byte signature it recovers exactly one address,
//! and the protocol is sound only because both sides compute the hash over
//! identical bytes. Verification therefore always recomputes the digest from
//! the voucher's raw field values; a hash supplied next to a signature is
//! never trusted when the values are available.

use std::collections::HashSet;

use alloy_primitives::{keccak256, Address, FixedBytes};
use autograph_voucher_types::{Voucher, VoucherSignature};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::digest::hash_fields;
use crate::errors::VoucherError;

/// Ethereum-style address of a public key:
/// `keccak256(uncompressed_point[1..])[12..]`.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signing address from a signable hash and a wire signature.
///
/// `v` is accepted in {0, 1, 27, 28}, the same candidates the on-chain
/// `ecrecover` path tolerates. A high-s signature is folded to its low-s twin
/// (with the recovery parity flipped), which recovers the same address
/// `ecrecover` would. Anything else is a hard reject: there is no
/// "best-effort" identity.
pub fn recover(
    signable_hash: FixedBytes<32>,
    signature: &VoucherSignature,
) -> Result<Address, VoucherError> {
    let parity = match signature.v() {
        0 | 1 => signature.v(),
        27 | 28 => signature.v() - 27,
        _ => return Err(VoucherError::MalformedSignature("recovery id out of range")),
    };
    let mut recid = RecoveryId::from_byte(parity)
        .ok_or(VoucherError::MalformedSignature("recovery id out of range"))?;

    let mut sig = Signature::from_slice(signature.rs())
        .map_err(|_| VoucherError::MalformedSignature("r/s is not a valid scalar pair"))?;

    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recid = RecoveryId::from_byte(recid.to_byte() ^ 1)
            .ok_or(VoucherError::RecoveryFailure)?;
    }

    let key = VerifyingKey::recover_from_prehash(signable_hash.as_slice(), &sig, recid)
        .map_err(|_| VoucherError::RecoveryFailure)?;
    Ok(address_of(&key))
}

/// Recover the signer of a voucher from its raw field values.
///
/// Recomputes encode → digest → signable hash from `voucher.values` and
/// recovers against the recomputed hash, so a signature for one payload can
/// never be presented alongside different decoded parameters.
pub fn verify(voucher: &Voucher) -> Result<Address, VoucherError> {
    let (_, signable_hash) = hash_fields(voucher.schema, &voucher.values)?;
    if signable_hash != voucher.signable_hash {
        tracing::warn!(
            schema = %voucher.schema,
            stored = %voucher.signable_hash,
            recomputed = %signable_hash,
            "voucher carries a stale signable hash; using the recomputed one"
        );
    }
    recover(signable_hash, &voucher.signature)
}

/// Authorized-signer predicate.
///
/// The authoritative role ledger lives with the verifying contract; this is
/// the off-chain mirror a caller configures with the notary addresses it
/// trusts.
pub trait SignerPolicy {
    fn is_authorized(&self, identity: Address) -> bool;
}

impl SignerPolicy for Address {
    fn is_authorized(&self, identity: Address) -> bool {
        *self == identity
    }
}

impl SignerPolicy for HashSet<Address> {
    fn is_authorized(&self, identity: Address) -> bool {
        self.contains(&identity)
    }
}

/// Verify a voucher and require its signer to pass `policy`.
pub fn verify_issuer(
    voucher: &Voucher,
    policy: &impl SignerPolicy,
) -> Result<Address, VoucherError> {
    let identity = verify(voucher)?;
    if !policy.is_authorized(identity) {
        tracing::warn!(schema = %voucher.schema, signer = %identity, "voucher signer rejected");
        return Err(VoucherError::UnauthorizedNotary(identity));
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::signable_hash;
    use crate::notary::LocalNotary;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn signed_pair() -> (FixedBytes<32>, VoucherSignature, Address) {
        let notary = LocalNotary::from_hex(KEY_ONE).unwrap();
        let hash = signable_hash(keccak256(b"payload"));
        let sig = notary.sign_hash(hash).unwrap();
        (hash, sig, notary.address())
    }

    #[test]
    fn round_trip_recovers_the_signer() {
        let (hash, sig, addr) = signed_pair();
        assert_eq!(recover(hash, &sig).unwrap(), addr);
    }

    #[test]
    fn zero_based_recovery_id_is_accepted() {
        let (hash, sig, addr) = signed_pair();
        let bytes = sig.as_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        let legacy = VoucherSignature::from_parts(r, s, sig.v() - 27);
        assert_eq!(recover(hash, &legacy).unwrap(), addr);
    }

    #[test]
    fn out_of_range_recovery_id_is_rejected() {
        let (hash, sig, _) = signed_pair();
        let bytes = sig.as_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        let bad = VoucherSignature::from_parts(r, s, 29);
        assert!(matches!(
            recover(hash, &bad).unwrap_err(),
            VoucherError::MalformedSignature(_)
        ));
    }

    #[test]
    fn garbage_scalars_never_yield_a_plausible_identity() {
        let hash = signable_hash(keccak256(b"payload"));
        // r = s = curve order would make from_slice fail; all-0xff scalars are
        // also out of range.
        let bad = VoucherSignature::from_parts([0xff; 32], [0xff; 32], 27);
        assert!(matches!(
            recover(hash, &bad).unwrap_err(),
            VoucherError::MalformedSignature(_) | VoucherError::RecoveryFailure
        ));
    }

    #[test]
    fn tampered_hash_recovers_a_different_identity() {
        let (hash, sig, addr) = signed_pair();
        let other = signable_hash(keccak256(b"other payload"));
        assert_ne!(hash, other);
        match recover(other, &sig) {
            Ok(recovered) => assert_ne!(recovered, addr),
            Err(VoucherError::RecoveryFailure) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn signer_policy_predicates() {
        let (_, _, addr) = signed_pair();
        assert!(addr.is_authorized(addr));
        assert!(!Address::ZERO.is_authorized(addr));

        let mut set = HashSet::new();
        assert!(!set.is_authorized(addr));
        set.insert(addr);
        assert!(set.is_authorized(addr));
    }
}
