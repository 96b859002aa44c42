//! Ethers glue for the contract-facing subcommands.
//!
//! The contract ABI is loaded from a JSON file at runtime (the forge `out/`
//! artifact), so the CLI works against any deployment of the voucher-consuming
//! contracts without regeneration.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use autograph_voucher::FieldValue;
use ethers::{
    abi::{Abi, Function, ParamType, Token},
    contract::Contract,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest},
};

pub type EthClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub fn to_eth_address(a: alloy_primitives::Address) -> ethers::types::Address {
    ethers::types::Address::from_slice(a.as_slice())
}

pub fn to_eth_u256(v: alloy_primitives::U256) -> ethers::types::U256 {
    ethers::types::U256::from_big_endian(&v.to_be_bytes::<32>())
}

/// Provider + wallet, with the chain id picked up from the node.
pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Arc<EthClient>> {
    let provider = Provider::<Http>::try_from(rpc_url).context("invalid RPC URL")?;
    let chain_id = provider
        .get_chainid()
        .await
        .context("failed to query chain id")?;
    let wallet: LocalWallet = private_key
        .strip_prefix("0x")
        .unwrap_or(private_key)
        .parse()
        .context("invalid private key")?;
    let wallet = wallet.with_chain_id(chain_id.as_u64());
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

pub fn load_contract(
    abi_path: &Path,
    address: alloy_primitives::Address,
    client: Arc<EthClient>,
) -> Result<Contract<EthClient>> {
    let raw = fs::read_to_string(abi_path)
        .with_context(|| format!("failed reading ABI file {}", abi_path.display()))?;
    let abi: Abi = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing ABI JSON in {}", abi_path.display()))?;
    Ok(Contract::new(to_eth_address(address), abi, client))
}

fn tokens_for(values: &[FieldValue]) -> Vec<Token> {
    values
        .iter()
        .map(|v| match v {
            FieldValue::Uint(u) => Token::Uint(to_eth_u256(*u)),
            FieldValue::Address(a) => Token::Address(to_eth_address(*a)),
        })
        .collect()
}

/// Shape `values` to the loaded function signature: wrapped into one tuple
/// when the function takes a single params struct, positional otherwise.
fn shape_args(function: &Function, values: &[FieldValue]) -> Vec<Token> {
    let tokens = tokens_for(values);
    if function.inputs.len() == 1 && matches!(function.inputs[0].kind, ParamType::Tuple(_)) {
        vec![Token::Tuple(tokens)]
    } else {
        tokens
    }
}

/// Call the contract's `getHash` over the voucher fields.
///
/// Some of the consuming contracts take the fields positionally, others take
/// a single params struct; the ABI decides, so the call is encoded against
/// the loaded function signature rather than a fixed arg tuple.
pub async fn call_get_hash(
    client: &Arc<EthClient>,
    contract: &Contract<EthClient>,
    values: &[FieldValue],
) -> Result<[u8; 32]> {
    let function = contract
        .abi()
        .function("getHash")
        .context("ABI has no `getHash` function")?;

    let args = shape_args(function, values);
    let data = function
        .encode_input(&args)
        .context("failed encoding `getHash` input")?;
    let tx: TypedTransaction = TransactionRequest::new()
        .to(contract.address())
        .data(data)
        .into();
    let raw = client
        .call(&tx, None)
        .await
        .context("`getHash` call failed")?;

    let outputs = function
        .decode_output(&raw)
        .context("failed decoding `getHash` output")?;
    match outputs.first() {
        Some(Token::FixedBytes(bytes)) if bytes.len() == 32 => {
            let mut hash = [0u8; 32];
            hash.copy_from_slice(bytes);
            Ok(hash)
        }
        other => anyhow::bail!("`getHash` returned an unexpected value: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    // The ERC721 claim contract's `getHash` takes a four-field params struct
    // (recipient, tokenId, salt, expiryToken); the signer is the contract's
    // own and never travels in the call.
    const CLAIM_GET_HASH_ABI: &str = r#"[{
        "type": "function",
        "name": "getHash",
        "stateMutability": "view",
        "inputs": [{
            "name": "params",
            "type": "tuple",
            "components": [
                { "name": "recipient", "type": "address" },
                { "name": "tokenId", "type": "uint256" },
                { "name": "salt", "type": "uint256" },
                { "name": "expiryToken", "type": "uint256" }
            ]
        }],
        "outputs": [{ "name": "", "type": "bytes32" }]
    }]"#;

    #[test]
    fn claim_get_hash_takes_struct_without_signer() {
        let abi: Abi = serde_json::from_str(CLAIM_GET_HASH_ABI).unwrap();
        let function = abi.function("getHash").unwrap();

        let without_signer = [
            FieldValue::Address(Address::repeat_byte(0x11)),
            FieldValue::Uint(U256::from(7u64)),
            FieldValue::Uint(U256::from(42u64)),
            FieldValue::Uint(U256::from(1_700_000_000u64)),
        ];
        let args = shape_args(function, &without_signer);
        assert!(function.encode_input(&args).is_ok());

        let mut with_signer = vec![FieldValue::Address(Address::repeat_byte(0x22))];
        with_signer.extend_from_slice(&without_signer);
        let args = shape_args(function, &with_signer);
        assert!(function.encode_input(&args).is_err());
    }

    #[test]
    fn positional_get_hash_stays_positional() {
        let abi: Abi = serde_json::from_str(
            r#"[{
                "type": "function",
                "name": "getHash",
                "stateMutability": "view",
                "inputs": [
                    { "name": "jobId", "type": "uint256" },
                    { "name": "paymentToken", "type": "address" }
                ],
                "outputs": [{ "name": "", "type": "bytes32" }]
            }]"#,
        )
        .unwrap();
        let function = abi.function("getHash").unwrap();

        let values = [
            FieldValue::Uint(U256::from(3u64)),
            FieldValue::Address(Address::repeat_byte(0x33)),
        ];
        let args = shape_args(function, &values);
        assert_eq!(args.len(), 2);
        assert!(function.encode_input(&args).is_ok());
    }
}
