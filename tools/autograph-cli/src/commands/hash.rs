use std::path::PathBuf;

use alloy_primitives::FixedBytes;
use anyhow::{bail, Context, Result};
use autograph_voucher::{hash_fields, LocalNotary};
use clap::{Args, ValueEnum};

use crate::commands::fields::SchemaCmd;
use crate::eth;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Compute locally.
    Offchain,
    /// Also ask the contract's `getHash` and cross-check.
    Onchain,
}

#[derive(Args, Debug)]
pub struct HashCmd {
    #[command(subcommand)]
    schema: SchemaCmd,

    #[arg(long, value_enum, default_value = "offchain")]
    mode: Mode,

    /// RPC URL (onchain mode).
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Path to the contract ABI JSON (onchain mode).
    #[arg(long)]
    abi_path: Option<PathBuf>,

    /// Verifying contract address (onchain mode).
    #[arg(long)]
    contract_address: Option<alloy_primitives::Address>,

    /// Local notary key, used only to fill the claim schema's signer slot.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,
}

impl HashCmd {
    pub async fn run(self) -> Result<()> {
        let default_signer = match &self.private_key {
            Some(key) => Some(LocalNotary::from_hex(key)?.address()),
            None => None,
        };
        let (kind, values) = self.schema.resolve(default_signer)?;
        let (digest, signable) = hash_fields(kind, &values)?;

        for (field, value) in kind.fields().iter().zip(&values) {
            tracing::info!("{} = {}", field.name, value);
        }
        println!("Digest: {digest}");
        println!("Signable hash: {signable}");

        if self.mode == Mode::Onchain {
            let (Some(rpc_url), Some(abi_path), Some(address)) =
                (&self.rpc_url, &self.abi_path, self.contract_address)
            else {
                bail!("onchain mode needs --rpc-url, --abi-path and --contract-address");
            };
            let key = self
                .private_key
                .as_deref()
                .context("onchain mode needs PRIVATE_KEY for the provider wallet")?;
            let client = eth::connect(rpc_url, key).await?;
            let contract = eth::load_contract(abi_path, address, client.clone())?;

            let onchain =
                FixedBytes::<32>::from(eth::call_get_hash(&client, &contract, &values).await?);
            println!("On-chain hash: {onchain}");
            println!("Do the hashes match? {}", onchain == signable);
            if onchain != signable {
                bail!("off-chain and on-chain hashes diverge; check schema and field values");
            }
        }
        Ok(())
    }
}
