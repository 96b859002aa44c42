use alloy_primitives::{FixedBytes, U256};

use crate::schema::{FieldValue, SchemaKind};
use crate::signature::VoucherSignature;

/// A signed authorization for one privileged operation.
///
/// Built once by a notary and then handed to the privileged entry point;
/// never mutated afterwards. The stored `digest` and `signable_hash` are a
/// convenience for callers: any party *verifying* a voucher must recompute
/// both from `values` rather than trust them (see the verifier module).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voucher {
    pub schema: SchemaKind,
    /// Field values in schema order.
    pub values: Vec<FieldValue>,
    /// Keccak-256 of the canonical encoding of `values`.
    pub digest: FixedBytes<32>,
    /// Personal-message hash of `digest`; the value that was signed.
    pub signable_hash: FixedBytes<32>,
    pub signature: VoucherSignature,
    /// Whether the hash/signature pair came from a remote notary service
    /// rather than a locally held key.
    pub remote_issued: bool,
}

impl Voucher {
    /// Look up a field value by schema field name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        let idx = self.schema.fields().iter().position(|f| f.name == name)?;
        self.values.get(idx)
    }

    /// The voucher's expiry timestamp. Every schema in the closed set carries
    /// one, so this only returns `None` for a malformed value vector.
    pub fn expiry(&self) -> Option<U256> {
        self.field("expiry").and_then(FieldValue::as_uint)
    }

    /// The voucher's replay salt.
    pub fn salt(&self) -> Option<U256> {
        self.field("salt").and_then(FieldValue::as_uint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn claim_voucher() -> Voucher {
        Voucher {
            schema: SchemaKind::Claim,
            values: vec![
                FieldValue::Address(Address::ZERO),
                FieldValue::Address(Address::ZERO),
                FieldValue::Uint(U256::from(7u64)),
                FieldValue::Uint(U256::from(42u64)),
                FieldValue::Uint(U256::from(1_700_000_000u64)),
            ],
            digest: FixedBytes::ZERO,
            signable_hash: FixedBytes::ZERO,
            signature: VoucherSignature::from_parts([0; 32], [0; 32], 27),
            remote_issued: false,
        }
    }

    #[test]
    fn field_lookup_follows_schema_order() {
        let v = claim_voucher();
        assert_eq!(v.field("token_id"), Some(&FieldValue::Uint(U256::from(7u64))));
        assert_eq!(v.salt(), Some(U256::from(42u64)));
        assert_eq!(v.expiry(), Some(U256::from(1_700_000_000u64)));
        assert!(v.field("job_id").is_none());
    }
}
