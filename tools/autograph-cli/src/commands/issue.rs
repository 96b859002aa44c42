use alloy_primitives::Address;
use anyhow::{bail, Result};
use autograph_voucher::{LocalNotary, Notary, RemoteNotary, Voucher};
use clap::{Args, ValueEnum};
use serde_json::json;

use crate::commands::fields::SchemaCmd;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotaryKind {
    /// Sign with the locally held key.
    Local,
    /// Fetch the hash/signature pair from the remote notary service.
    Remote,
}

#[derive(Args, Debug)]
pub struct IssueCmd {
    #[command(subcommand)]
    schema: SchemaCmd,

    #[arg(long, value_enum, default_value = "local")]
    notary: NotaryKind,

    /// Local notary key.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Remote notary service URL.
    #[arg(long, env = "NOTARY_URL")]
    notary_url: Option<String>,

    /// Bearer token for the remote notary service.
    #[arg(long, env = "NOTARY_TOKEN", hide_env_values = true)]
    notary_token: Option<String>,

    /// Address the remote notary's signatures must recover to.
    #[arg(long)]
    notary_signer: Option<Address>,
}

impl IssueCmd {
    pub async fn run(self) -> Result<()> {
        let voucher = match self.notary {
            NotaryKind::Local => {
                let Some(key) = &self.private_key else {
                    bail!("local issuance needs --private-key (or PRIVATE_KEY)");
                };
                let notary = LocalNotary::from_hex(key)?;
                let (kind, values) = self.schema.resolve(Some(notary.address()))?;
                notary.issue(kind, values).await?
            }
            NotaryKind::Remote => {
                let (Some(url), Some(token), Some(signer)) =
                    (&self.notary_url, &self.notary_token, self.notary_signer)
                else {
                    bail!("remote issuance needs --notary-url, --notary-token and --notary-signer");
                };
                let notary = RemoteNotary::new(url.clone(), token.clone(), signer);
                let (kind, values) = self.schema.resolve(Some(signer))?;
                notary.issue(kind, values).await?
            }
        };

        println!("{}", serde_json::to_string_pretty(&voucher_json(&voucher))?);
        Ok(())
    }
}

/// Hex-encoded JSON wire form of a voucher, suitable for handing to whatever
/// submits the privileged transaction.
fn voucher_json(voucher: &Voucher) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = voucher
        .schema
        .fields()
        .iter()
        .zip(&voucher.values)
        .map(|(field, value)| (field.name.to_string(), json!(value.to_string())))
        .collect();

    json!({
        "schema": voucher.schema.id(),
        "fields": fields,
        "digest": voucher.digest.to_string(),
        "signable_hash": voucher.signable_hash.to_string(),
        "signature": voucher.signature.to_hex(),
        "remote_issued": voucher.remote_issued,
    })
}
