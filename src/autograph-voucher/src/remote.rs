//! Remote notary client.
//!
//! Alternate implementation of the [`Notary`] capability: instead of holding
//! the notary key, ask an issuance service for a precomputed hash/signature
//! pair over the field values. The request carries an opaque, externally
//! issued bearer token; minting that token is outside this crate.
//!
//! The response is treated as hostile until proven consistent: the hash is
//! checked against the locally recomputed signable hash, and the signature
//! must recover to the configured notary address. A compromised or buggy
//! service can therefore never smuggle in a voucher for different parameters
//! than the ones requested.

use alloy_primitives::{Address, FixedBytes};
use async_trait::async_trait;
use autograph_voucher_types::{FieldValue, SchemaKind, Voucher, VoucherSignature};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::digest::hash_fields;
use crate::errors::VoucherError;
use crate::notary::Notary;
use crate::verifier::recover;

/// Client for an HTTP voucher-issuance service.
pub struct RemoteNotary {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
    signer: Address,
}

/// Issuance service response body.
#[derive(Debug, Deserialize)]
pub struct IssueResponse {
    /// Signable hash, 0x-prefixed hex.
    pub hash: String,
    /// 65-byte signature, 0x-prefixed hex.
    pub signature: String,
}

impl RemoteNotary {
    /// `signer` is the address the service's signatures are expected to
    /// recover to; a response recovering anywhere else is rejected.
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>, signer: Address) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            signer,
        }
    }

    /// Cross-check a service response against locally recomputed hashes and
    /// assemble the voucher. Split out of the transport so it can be tested
    /// without a live service.
    pub fn validate_response(
        schema: SchemaKind,
        values: Vec<FieldValue>,
        response: &IssueResponse,
        signer: Address,
    ) -> Result<Voucher, VoucherError> {
        let (digest, signable_hash) = hash_fields(schema, &values)?;

        let remote_hash: FixedBytes<32> = response
            .hash
            .parse()
            .map_err(|_| VoucherError::RemoteMalformed("hash is not 32 hex-encoded bytes"))?;
        if remote_hash != signable_hash {
            return Err(VoucherError::RemoteHashMismatch {
                expected: signable_hash,
                got: remote_hash,
            });
        }

        let signature = VoucherSignature::from_hex(&response.signature)
            .ok_or(VoucherError::RemoteMalformed("signature is not 65 hex-encoded bytes"))?;

        let recovered = recover(signable_hash, &signature)?;
        if recovered != signer {
            return Err(VoucherError::UnauthorizedNotary(recovered));
        }

        Ok(Voucher {
            schema,
            values,
            digest,
            signable_hash,
            signature,
            remote_issued: true,
        })
    }
}

#[async_trait]
impl Notary for RemoteNotary {
    fn address(&self) -> Address {
        self.signer
    }

    async fn issue(
        &self,
        schema: SchemaKind,
        values: Vec<FieldValue>,
    ) -> Result<Voucher, VoucherError> {
        let query: Vec<(&str, String)> = schema
            .fields()
            .iter()
            .zip(&values)
            .map(|(field, value)| (field.name, value.to_string()))
            .collect();

        tracing::debug!(%schema, url = %self.base_url, "requesting voucher from remote notary");
        let response = self
            .http
            .get(&self.base_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<IssueResponse>()
            .await?;

        let voucher = Self::validate_response(schema, values, &response, self.signer)?;
        tracing::debug!(%schema, digest = %voucher.digest, "remote voucher validated");
        Ok(voucher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notary::LocalNotary;
    use alloy_primitives::U256;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn claim_values(salt: u64) -> Vec<FieldValue> {
        vec![
            FieldValue::Address(Address::ZERO),
            FieldValue::Address(Address::ZERO),
            FieldValue::Uint(U256::from(7u64)),
            FieldValue::Uint(U256::from(salt)),
            FieldValue::Uint(U256::from(1_700_000_000u64)),
        ]
    }

    /// Simulate a well-behaved service with a local key.
    fn service_response(values: &[FieldValue]) -> (IssueResponse, Address) {
        let notary = LocalNotary::from_hex(KEY_ONE).unwrap();
        let (_, signable_hash) = hash_fields(SchemaKind::Claim, values).unwrap();
        let signature = notary.sign_hash(signable_hash).unwrap();
        (
            IssueResponse {
                hash: format!("{signable_hash}"),
                signature: signature.to_hex(),
            },
            notary.address(),
        )
    }

    #[test]
    fn consistent_response_is_accepted() {
        let values = claim_values(42);
        let (response, signer) = service_response(&values);
        let voucher =
            RemoteNotary::validate_response(SchemaKind::Claim, values, &response, signer).unwrap();
        assert!(voucher.remote_issued);
        assert_eq!(voucher.salt(), Some(U256::from(42u64)));
    }

    #[test]
    fn hash_for_different_fields_is_rejected() {
        // Service signs salt=41 but we asked for salt=42.
        let (response, signer) = service_response(&claim_values(41));
        let err =
            RemoteNotary::validate_response(SchemaKind::Claim, claim_values(42), &response, signer)
                .unwrap_err();
        assert!(matches!(err, VoucherError::RemoteHashMismatch { .. }));
    }

    #[test]
    fn unexpected_signer_is_rejected() {
        let values = claim_values(42);
        let (response, _) = service_response(&values);
        let err = RemoteNotary::validate_response(
            SchemaKind::Claim,
            values,
            &response,
            Address::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, VoucherError::UnauthorizedNotary(_)));
    }

    #[test]
    fn malformed_response_fields_are_rejected() {
        let values = claim_values(42);
        let (mut response, signer) = service_response(&values);
        response.hash = "0x1234".into();
        assert!(matches!(
            RemoteNotary::validate_response(SchemaKind::Claim, values.clone(), &response, signer)
                .unwrap_err(),
            VoucherError::RemoteMalformed(_)
        ));

        let (mut response, signer) = service_response(&values);
        response.signature = "not hex".into();
        assert!(matches!(
            RemoteNotary::validate_response(SchemaKind::Claim, values, &response, signer)
                .unwrap_err(),
            VoucherError::RemoteMalformed(_)
        ));
    }

    #[test]
    fn remote_notary_reports_the_configured_signer() {
        let notary = RemoteNotary::new("https://notary.example", "token", Address::ZERO);
        assert_eq!(notary.address(), Address::ZERO);
    }
}
