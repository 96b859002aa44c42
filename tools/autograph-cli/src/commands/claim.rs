use std::path::PathBuf;

use alloy_primitives::{Address, FixedBytes};
use anyhow::{Context, Result};
use autograph_voucher::{verify_issuer, LocalNotary, Notary};
use clap::Args;
use ethers::types::Bytes;

use crate::commands::fields::{ClaimFields, SchemaCmd};
use crate::eth;

/// Issue a claim voucher with the local notary key and redeem it through the
/// contract's `claim` entry point. The signer needs the contract's
/// notary/minter role for the on-chain re-verification to pass.
#[derive(Args, Debug)]
pub struct ClaimCmd {
    /// Path to the contract ABI JSON.
    #[arg(long)]
    abi_path: PathBuf,

    /// Claim contract address.
    #[arg(long)]
    contract_address: Address,

    #[command(flatten)]
    fields: ClaimFields,

    /// Token metadata URL passed through to `claim`.
    #[arg(long)]
    metadata_url: String,

    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
}

impl ClaimCmd {
    pub async fn run(self) -> Result<()> {
        let notary = LocalNotary::from_hex(&self.private_key)?;
        tracing::info!(wallet = %notary.address(), "claiming as");

        let (kind, values) = SchemaCmd::Claim(self.fields).resolve(Some(notary.address()))?;
        let voucher = notary.issue(kind, values).await?;

        // Self-check before spending gas: the signature must recover to us.
        verify_issuer(&voucher, &notary.address())
            .context("freshly issued voucher failed local verification")?;

        let salt = voucher.salt().context("claim voucher missing salt")?;
        let expiry = voucher.expiry().context("claim voucher missing expiry")?;
        let recipient = match voucher.field("recipient") {
            Some(autograph_voucher::FieldValue::Address(a)) => *a,
            _ => anyhow::bail!("claim voucher missing recipient"),
        };
        let token_id = voucher
            .field("token_id")
            .and_then(|f| f.as_uint())
            .context("claim voucher missing token_id")?;

        let client = eth::connect(&self.rpc_url, &self.private_key).await?;
        let contract = eth::load_contract(&self.abi_path, self.contract_address, client.clone())?;

        // Cross-check against the contract's own hash computation; a mismatch
        // here means the schema drifted and the claim would revert anyway.
        // The contract hashes the caller in as signer itself, so its `getHash`
        // struct carries only the remaining four fields.
        let onchain_fields: Vec<_> = voucher
            .schema
            .fields()
            .iter()
            .zip(&voucher.values)
            .filter(|(field, _)| field.name != "signer")
            .map(|(_, value)| *value)
            .collect();
        let onchain = FixedBytes::<32>::from(
            eth::call_get_hash(&client, &contract, &onchain_fields).await?,
        );
        println!("Do the hashes match? {}", onchain == voucher.signable_hash);
        anyhow::ensure!(
            onchain == voucher.signable_hash,
            "off-chain and on-chain hashes diverge; refusing to submit"
        );

        let call = contract
            .method::<_, ()>(
                "claim",
                (
                    eth::to_eth_address(recipient),
                    eth::to_eth_u256(token_id),
                    voucher.signable_hash.0,
                    eth::to_eth_u256(salt),
                    Bytes::from(voucher.signature.as_bytes().to_vec()),
                    eth::to_eth_u256(expiry),
                    self.metadata_url.clone(),
                ),
            )
            .context("failed building `claim` call")?;

        let pending = call.send().await.context("`claim` submission failed")?;
        println!("Submitted claim tx: {:#x}", *pending);
        let receipt = pending.await.context("claim tx dropped")?;
        match receipt {
            Some(receipt) => println!(
                "Mined in block {} (status {:?})",
                receipt.block_number.map(|b| b.as_u64()).unwrap_or_default(),
                receipt.status
            ),
            None => println!("No receipt returned; check the tx hash manually."),
        }
        Ok(())
    }
}
