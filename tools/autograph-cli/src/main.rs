//! Operator CLI for the Autograph voucher protocol.
//!
//! One subcommand per operator task, mirroring how the voucher pipeline is
//! actually used: compute hashes, sign them, issue complete vouchers (with a
//! local key or the remote notary service), verify signatures, and redeem
//! vouchers against the privileged contract entry points.
//!
//! Credentials come from flags or the environment (`PRIVATE_KEY`, `RPC_URL`,
//! `NOTARY_URL`, `NOTARY_TOKEN`), with `.env` loading for local use.

mod commands;
mod eth;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the digest and signable hash for a voucher, locally or via the
    /// contract's `getHash`.
    Hash(commands::hash::HashCmd),
    /// Sign a precomputed voucher digest with the local notary key.
    Sign(commands::sign::SignCmd),
    /// Issue a complete voucher as JSON, with a local key or the remote
    /// notary service.
    Issue(commands::issue::IssueCmd),
    /// Recover the signer from a signable hash and signature.
    Verify(commands::verify::VerifyCmd),
    /// Issue a claim voucher and redeem it via the contract's `claim`.
    Claim(commands::claim::ClaimCmd),
    /// Redeem a precomputed voucher via `mintForFree`.
    MintForFree(commands::mint::MintForFreeCmd),
    /// Redeem a precomputed voucher via `mintWithPaymentTokenAsFee`.
    MintWithFee(commands::mint::MintWithFeeCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match Cli::parse().command {
        Command::Hash(cmd) => cmd.run().await,
        Command::Sign(cmd) => cmd.run(),
        Command::Issue(cmd) => cmd.run().await,
        Command::Verify(cmd) => cmd.run(),
        Command::Claim(cmd) => cmd.run().await,
        Command::MintForFree(cmd) => cmd.run().await,
        Command::MintWithFee(cmd) => cmd.run().await,
    }
}
