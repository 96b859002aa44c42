use std::path::PathBuf;

use alloy_primitives::{Address, FixedBytes, U256};
use anyhow::{Context, Result};
use clap::Args;
use ethers::abi::Token;
use ethers::types::Bytes;

use autograph_voucher::{recover, VoucherSignature};

use crate::eth;

/// Flags shared by the two minter entry points: a precomputed voucher
/// (hash + signature, typically from `issue --notary remote`) plus the mint
/// parameters the contract re-hashes on its side.
#[derive(Args, Debug)]
pub struct MintArgs {
    /// Path to the minter contract ABI JSON.
    #[arg(long)]
    pub abi_path: PathBuf,

    /// Minter contract address.
    #[arg(long)]
    pub contract_address: Address,

    /// NFT contract being minted on.
    #[arg(long)]
    pub nft_contract: Address,

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

    /// Replay salt the voucher was issued with.
    #[arg(long)]
    pub salt: U256,

    /// Expiry timestamp the voucher was issued with.
    #[arg(long)]
    pub expiry: U256,

    /// Signable hash from the voucher (32 bytes, hex).
    #[arg(long)]
    pub hash: String,

    /// Notary signature from the voucher (65 bytes, hex).
    #[arg(long)]
    pub signature: String,

    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

impl MintArgs {
    fn parse_voucher(&self) -> Result<(FixedBytes<32>, VoucherSignature)> {
        let hash: FixedBytes<32> = self
            .hash
            .parse()
            .context("--hash must be 32 hex-encoded bytes")?;
        let signature = VoucherSignature::from_hex(&self.signature)
            .context("--signature must be 65 hex-encoded bytes")?;
        // Sanity-check the pair before spending gas; the contract repeats
        // this recovery with its own role check.
        let signer = recover(hash, &signature)?;
        tracing::info!(%signer, "voucher signature recovers");
        Ok((hash, signature))
    }
}

#[derive(Args, Debug)]
pub struct MintForFreeCmd {
    #[command(flatten)]
    args: MintArgs,
}

impl MintForFreeCmd {
    pub async fn run(self) -> Result<()> {
        let a = self.args;
        let (hash, signature) = a.parse_voucher()?;
        let client = eth::connect(&a.rpc_url, &a.private_key).await?;
        let contract = eth::load_contract(&a.abi_path, a.contract_address, client)?;

        let call = contract
            .method::<_, ()>(
                "mintForFree",
                (
                    eth::to_eth_address(a.recipient),
                    eth::to_eth_u256(a.job_id),
                    eth::to_eth_u256(a.token_id),
                    eth::to_eth_u256(a.units),
                    hash.0,
                    eth::to_eth_u256(a.salt),
                    Bytes::from(signature.as_bytes().to_vec()),
                    eth::to_eth_address(a.nft_contract),
                    eth::to_eth_u256(a.expiry),
                ),
            )
            .context("failed building `mintForFree` call")?;

        let pending = call.send().await.context("`mintForFree` submission failed")?;
        println!("Submitted mintForFree tx: {:#x}", *pending);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MintWithFeeCmd {
    #[command(flatten)]
    args: MintArgs,

    /// Payment token the fee is taken in.
    #[arg(long)]
    payment_token: Address,

    /// Fee amount in the payment token.
    #[arg(long)]
    payment_amount: U256,
}

impl MintWithFeeCmd {
    /// The contract's `mintWithPaymentTokenAsFee` takes a single params
    /// struct, unlike the positional `mintForFree`.
    fn params_struct(&self, hash: FixedBytes<32>, signature: &VoucherSignature) -> Token {
        let a = &self.args;
        Token::Tuple(vec![
            Token::Address(eth::to_eth_address(a.recipient)),
            Token::Uint(eth::to_eth_u256(a.job_id)),
            Token::Uint(eth::to_eth_u256(a.token_id)),
            Token::Uint(eth::to_eth_u256(a.units)),
            Token::FixedBytes(hash.to_vec()),
            Token::Uint(eth::to_eth_u256(a.salt)),
            Token::Bytes(signature.as_bytes().to_vec()),
            Token::Address(eth::to_eth_address(a.nft_contract)),
            Token::Address(eth::to_eth_address(self.payment_token)),
            Token::Uint(eth::to_eth_u256(self.payment_amount)),
            Token::Uint(eth::to_eth_u256(a.expiry)),
        ])
    }

    pub async fn run(self) -> Result<()> {
        let (hash, signature) = self.args.parse_voucher()?;
        let params = self.params_struct(hash, &signature);
        let a = self.args;
        let client = eth::connect(&a.rpc_url, &a.private_key).await?;
        let contract = eth::load_contract(&a.abi_path, a.contract_address, client)?;

        let call = contract
            .method::<_, ()>("mintWithPaymentTokenAsFee", params)
            .context("failed building `mintWithPaymentTokenAsFee` call")?;

        let pending = call
            .send()
            .await
            .context("`mintWithPaymentTokenAsFee` submission failed")?;
        println!("Submitted mintWithPaymentTokenAsFee tx: {:#x}", *pending);
        Ok(())
    }
}
