//! Schema field flags shared by the hash/issue subcommands.
//!
//! Salt and expiry are optional everywhere: a missing salt gets a fresh
//! random value, a missing expiry defaults to one hour from now (deadline
//! reading; see the core policy module for the alternative issuance-stamp
//! semantics).

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, U256};
use anyhow::{bail, Result};
use autograph_voucher::{fresh_salt, FieldValue, SchemaKind};
use clap::{Args, Subcommand};

const DEFAULT_TTL_SECS: u64 = 3_600;

pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn resolve_expiry(expiry: Option<U256>) -> U256 {
    expiry.unwrap_or_else(|| U256::from(now_unix() + DEFAULT_TTL_SECS))
}

fn resolve_salt(salt: Option<U256>) -> U256 {
    salt.unwrap_or_else(fresh_salt)
}

/// Job-fee schema fields (GameConsumer).
#[derive(Args, Debug, Clone)]
pub struct JobFields {
    /// Job ID.
    #[arg(long)]
    pub job_id: U256,
    /// Payment token contract.
    #[arg(long)]
    pub payment_token: Address,
    /// Job fee.
    #[arg(long)]
    pub job_fee: U256,
    /// Expiry timestamp (unix seconds).
    #[arg(long)]
    pub expiry: Option<U256>,
    /// Replay salt.
    #[arg(long)]
    pub salt: Option<U256>,
}

/// Claim schema fields (ERC721).
#[derive(Args, Debug, Clone)]
pub struct ClaimFields {
    /// Notary (signer) address; defaults to the address of the local key.
    #[arg(long)]
    pub signer: Option<Address>,
    /// Recipient address to mint to.
    #[arg(long)]
    pub recipient: Address,
    /// Token ID.
    #[arg(long)]
    pub token_id: U256,
    /// Replay salt.
    #[arg(long)]
    pub salt: Option<U256>,
    /// Expiry timestamp (unix seconds).
    #[arg(long)]
    pub expiry: Option<U256>,
}

/// Autograph-mint schema fields (ERC1155).
#[derive(Args, Debug, Clone)]
pub struct MintFields {
    /// Recipient address to mint to.
    #[arg(long)]
    pub recipient: Address,
    /// Job ID.
    #[arg(long)]
    pub job_id: U256,
    /// Token ID.
    #[arg(long)]
    pub token_id: U256,
    /// Number of units to mint.
    #[arg(long)]
    pub units: U256,
    /// Replay salt.
    #[arg(long)]
    pub salt: Option<U256>,
    /// NFT contract being minted on.
    #[arg(long)]
    pub nft_contract: Address,
    /// Payment token contract.
    #[arg(long)]
    pub payment_token: Address,
    /// Payment amount.
    #[arg(long)]
    pub payment_amount: U256,
    /// Expiry timestamp (unix seconds).
    #[arg(long)]
    pub expiry: Option<U256>,
}

/// One subcommand per schema in the closed set.
#[derive(Subcommand, Debug, Clone)]
pub enum SchemaCmd {
    /// Job-fee voucher (GameConsumer).
    Job(JobFields),
    /// Claim voucher (ERC721).
    Claim(ClaimFields),
    /// Autograph-mint voucher (ERC1155).
    Mint(MintFields),
}

impl SchemaCmd {
    /// Resolve flags (and defaults) into schema-ordered field values.
    ///
    /// `default_signer` fills the claim schema's signer slot when no
    /// `--signer` flag is given; usually the local notary's address.
    pub fn resolve(self, default_signer: Option<Address>) -> Result<(SchemaKind, Vec<FieldValue>)> {
        match self {
            SchemaCmd::Job(f) => Ok((
                SchemaKind::JobFee,
                vec![
                    FieldValue::Uint(f.job_id),
                    FieldValue::Address(f.payment_token),
                    FieldValue::Uint(f.job_fee),
                    FieldValue::Uint(resolve_expiry(f.expiry)),
                    FieldValue::Uint(resolve_salt(f.salt)),
                ],
            )),
            SchemaCmd::Claim(f) => {
                let Some(signer) = f.signer.or(default_signer) else {
                    bail!("claim schema needs --signer (or a local key to derive it from)");
                };
                Ok((
                    SchemaKind::Claim,
                    vec![
                        FieldValue::Address(signer),
                        FieldValue::Address(f.recipient),
                        FieldValue::Uint(f.token_id),
                        FieldValue::Uint(resolve_salt(f.salt)),
                        FieldValue::Uint(resolve_expiry(f.expiry)),
                    ],
                ))
            }
            SchemaCmd::Mint(f) => Ok((
                SchemaKind::AutographMint,
                vec![
                    FieldValue::Address(f.recipient),
                    FieldValue::Uint(f.job_id),
                    FieldValue::Uint(f.token_id),
                    FieldValue::Uint(f.units),
                    FieldValue::Uint(resolve_salt(f.salt)),
                    FieldValue::Address(f.nft_contract),
                    FieldValue::Address(f.payment_token),
                    FieldValue::Uint(f.payment_amount),
                    FieldValue::Uint(resolve_expiry(f.expiry)),
                ],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_requires_a_signer_from_somewhere() {
        let fields = ClaimFields {
            signer: None,
            recipient: Address::ZERO,
            token_id: U256::from(7u64),
            salt: Some(U256::from(42u64)),
            expiry: Some(U256::from(1_700_000_000u64)),
        };
        assert!(SchemaCmd::Claim(fields.clone()).resolve(None).is_err());

        let (kind, values) = SchemaCmd::Claim(fields)
            .resolve(Some(Address::ZERO))
            .unwrap();
        assert_eq!(kind, SchemaKind::Claim);
        assert_eq!(values.len(), kind.fields().len());
    }

    #[test]
    fn omitted_salt_is_randomized() {
        let fields = JobFields {
            job_id: U256::from(7u64),
            payment_token: Address::ZERO,
            job_fee: U256::from(1000u64),
            expiry: Some(U256::from(1_700_000_000u64)),
            salt: None,
        };
        let (_, a) = SchemaCmd::Job(fields.clone()).resolve(None).unwrap();
        let (_, b) = SchemaCmd::Job(fields).resolve(None).unwrap();
        // salt is the last field in the job schema
        assert_ne!(a[4], b[4]);
    }
}
