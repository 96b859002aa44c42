//! Canonical voucher encoding.
//!
//! Static-tuple ABI encoding: every field is one 32-byte big-endian word,
//! concatenated in schema order. This must stay byte-identical to the tuple
//! the verifying contract feeds to `keccak256` in `getHash`; the whole
//! protocol hangs on both sides producing the same bytes.

use autograph_voucher_types::{FieldValue, SchemaKind};

use crate::errors::VoucherError;

/// Width of one encoded word.
pub const WORD: usize = 32;

/// Encode `values` under `schema` into the canonical byte string.
///
/// Pure and deterministic: the same schema and values always produce the same
/// bytes. Fails with [`VoucherError::SchemaMismatch`] when the value count or
/// any value's type disagrees with the schema.
pub fn encode(schema: SchemaKind, values: &[FieldValue]) -> Result<Vec<u8>, VoucherError> {
    let fields = schema.fields();
    if values.len() != fields.len() {
        return Err(VoucherError::schema_mismatch(
            schema,
            format!("expected {} values, got {}", fields.len(), values.len()),
        ));
    }

    let mut buf = Vec::with_capacity(fields.len() * WORD);
    for (field, value) in fields.iter().zip(values) {
        if value.ty() != field.ty {
            return Err(VoucherError::schema_mismatch(
                schema,
                format!(
                    "field `{}` expects {:?}, got {:?}",
                    field.name,
                    field.ty,
                    value.ty()
                ),
            ));
        }
        match value {
            FieldValue::Uint(v) => buf.extend_from_slice(&v.to_be_bytes::<WORD>()),
            FieldValue::Address(a) => {
                // Addresses occupy the low 20 bytes of a zero-padded word.
                let mut word = [0u8; WORD];
                word[12..].copy_from_slice(a.as_slice());
                buf.extend_from_slice(&word);
            }
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use autograph_voucher_types::FieldValue;

    fn job_values(salt: u64) -> Vec<FieldValue> {
        vec![
            FieldValue::Uint(U256::from(7u64)),
            FieldValue::Address(Address::ZERO),
            FieldValue::Uint(U256::from(1000u64)),
            FieldValue::Uint(U256::from(1_700_000_000u64)),
            FieldValue::Uint(U256::from(salt)),
        ]
    }

    #[test]
    fn job_fee_encoding_layout() {
        let encoded = encode(SchemaKind::JobFee, &job_values(42)).unwrap();
        assert_eq!(encoded.len(), 5 * WORD);
        // jobId = 7, right-aligned in the first word
        assert_eq!(encoded[31], 7);
        assert!(encoded[0..31].iter().all(|b| *b == 0));
        // salt = 42 in the last word
        assert_eq!(encoded[5 * WORD - 1], 42);
    }

    #[test]
    fn address_is_left_padded_into_low_bytes() {
        let addr: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let encoded = encode(
            SchemaKind::Claim,
            &[
                FieldValue::Address(addr),
                FieldValue::Address(Address::ZERO),
                FieldValue::Uint(U256::ZERO),
                FieldValue::Uint(U256::ZERO),
                FieldValue::Uint(U256::ZERO),
            ],
        )
        .unwrap();
        assert!(encoded[0..31].iter().all(|b| *b == 0));
        assert_eq!(encoded[31], 0xff);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode(SchemaKind::JobFee, &job_values(42)).unwrap();
        let b = encode(SchemaKind::JobFee, &job_values(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn differing_salt_changes_the_bytes() {
        let a = encode(SchemaKind::JobFee, &job_values(41)).unwrap();
        let b = encode(SchemaKind::JobFee, &job_values(42)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = encode(SchemaKind::JobFee, &job_values(42)[..4].to_vec()).unwrap_err();
        assert!(matches!(err, VoucherError::SchemaMismatch { .. }));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut values = job_values(42);
        // payment_token slot filled with a uint
        values[1] = FieldValue::Uint(U256::ZERO);
        let err = encode(SchemaKind::JobFee, &values).unwrap_err();
        assert!(matches!(err, VoucherError::SchemaMismatch { .. }));
    }
}
