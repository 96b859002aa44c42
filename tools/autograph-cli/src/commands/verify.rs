use alloy_primitives::{Address, FixedBytes};
use anyhow::{bail, Context, Result};
use autograph_voucher::{recover, VoucherSignature};
use clap::Args;

#[derive(Args, Debug)]
pub struct VerifyCmd {
    /// Signable hash the signature was produced over (32 bytes, hex).
    #[arg(long)]
    hash: String,

    /// Signature to check (65 bytes `r||s||v`, hex).
    #[arg(long)]
    signature: String,

    /// Fail unless the signature recovers to this address.
    #[arg(long)]
    expected_signer: Option<Address>,
}

impl VerifyCmd {
    pub fn run(self) -> Result<()> {
        let hash: FixedBytes<32> = self
            .hash
            .parse()
            .context("--hash must be 32 hex-encoded bytes")?;
        let signature = VoucherSignature::from_hex(&self.signature)
            .context("--signature must be 65 hex-encoded bytes")?;

        let recovered = recover(hash, &signature)?;
        println!("Recovered signer: {recovered}");

        if let Some(expected) = self.expected_signer {
            if recovered != expected {
                bail!("recovered signer {recovered} does not match expected {expected}");
            }
            println!("Signer matches expected notary.");
        }
        Ok(())
    }
}
