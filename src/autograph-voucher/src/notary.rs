//! Notary capability: issuing signed vouchers.
//!
//! Two implementations sit behind the same trait: [`LocalNotary`] signs with a
//! locally held secp256k1 key, and [`crate::remote::RemoteNotary`] fetches a
//! precomputed hash/signature pair from an issuance service. Callers pick one
//! by configuration and treat them interchangeably.

use core::fmt;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use autograph_voucher_types::{FieldValue, SchemaKind, Voucher, VoucherSignature};
use k256::ecdsa::{RecoveryId, SigningKey};
use rand::RngCore;

use crate::digest::hash_fields;
use crate::errors::VoucherError;
use crate::verifier::address_of;

/// Something that can issue signed vouchers.
///
/// The signing credential (a private key or a bearer token for a remote
/// service) is owned by the implementation and supplied at construction time;
/// it is never ambient state.
#[async_trait]
pub trait Notary: Send + Sync {
    /// The address vouchers from this notary recover to.
    fn address(&self) -> Address;

    /// Encode, hash and sign `values` under `schema` into a complete voucher.
    async fn issue(
        &self,
        schema: SchemaKind,
        values: Vec<FieldValue>,
    ) -> Result<Voucher, VoucherError>;
}

/// Notary backed by a locally held secp256k1 signing key.
///
/// Nonces are derived deterministically (RFC 6979), so signing the same
/// signable hash twice yields the same signature and there is no RNG to
/// misuse into a nonce-reuse key recovery.
pub struct LocalNotary {
    key: SigningKey,
    address: Address,
}

impl LocalNotary {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// The address this notary's signatures recover to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Build from a hex-encoded private scalar, with or without a `0x` prefix.
    ///
    /// Fails with [`VoucherError::InvalidKey`] for bad hex, wrong width, a
    /// zero scalar or one outside the curve order.
    pub fn from_hex(s: &str) -> Result<Self, VoucherError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| VoucherError::InvalidKey)?;
        let key = SigningKey::from_slice(&bytes).map_err(|_| VoucherError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Sign a 32-byte signable hash into the 65-byte `r||s||v` wire form,
    /// `v` in {27, 28}, low-s normalized.
    pub fn sign_hash(
        &self,
        signable_hash: alloy_primitives::FixedBytes<32>,
    ) -> Result<VoucherSignature, VoucherError> {
        let (mut sig, mut recid) = self
            .key
            .sign_prehash_recoverable(signable_hash.as_slice())
            .map_err(|_| VoucherError::InvalidKey)?;

        // Low-s normalization (malleability); flipping s flips the recovered
        // point's y parity, so the recovery id flips with it.
        if let Some(normalized) = sig.normalize_s() {
            sig = normalized;
            recid = RecoveryId::from_byte(recid.to_byte() ^ 1)
                .ok_or(VoucherError::RecoveryFailure)?;
        }

        let (r, s) = sig.split_bytes();
        let mut r_buf = [0u8; 32];
        let mut s_buf = [0u8; 32];
        r_buf.copy_from_slice(r.as_slice());
        s_buf.copy_from_slice(s.as_slice());
        Ok(VoucherSignature::from_parts(r_buf, s_buf, 27 + recid.to_byte()))
    }
}

#[async_trait]
impl Notary for LocalNotary {
    fn address(&self) -> Address {
        self.address
    }

    async fn issue(
        &self,
        schema: SchemaKind,
        values: Vec<FieldValue>,
    ) -> Result<Voucher, VoucherError> {
        let (digest, signable_hash) = hash_fields(schema, &values)?;
        let signature = self.sign_hash(signable_hash)?;
        tracing::debug!(%schema, %digest, notary = %self.address, "issued voucher locally");
        Ok(Voucher {
            schema,
            values,
            digest,
            signable_hash,
            signature,
            remote_issued: false,
        })
    }
}

// The signing key must never leak through logs.
impl fmt::Debug for LocalNotary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalNotary")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Draw a fresh 256-bit salt from the OS RNG.
///
/// The salt only has to make two otherwise-identical requests hash
/// differently; 32 random bytes make accidental collision between legitimate
/// requests negligible. Uniqueness *enforcement* lives with the verifying
/// contract's single-use ledger.
pub fn fresh_salt() -> U256 {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    U256::from_be_bytes(bytes)
}
