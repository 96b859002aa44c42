use alloy_primitives::FixedBytes;
use anyhow::{Context, Result};
use autograph_voucher::{signable_hash, LocalNotary};
use clap::Args;

#[derive(Args, Debug)]
pub struct SignCmd {
    /// Voucher digest to sign (32 bytes, 0x-prefixed hex). The personal-message
    /// prefix is applied here, before signing.
    #[arg(long)]
    digest: String,

    /// Local notary key.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
}

impl SignCmd {
    pub fn run(self) -> Result<()> {
        let digest: FixedBytes<32> = self
            .digest
            .parse()
            .context("--digest must be 32 hex-encoded bytes")?;
        let notary = LocalNotary::from_hex(&self.private_key)?;
        let signable = signable_hash(digest);
        let signature = notary.sign_hash(signable)?;

        tracing::info!(notary = %notary.address(), "signing as local notary");
        println!("Signable hash: {signable}");
        println!("Signature: {signature}");
        Ok(())
    }
}
