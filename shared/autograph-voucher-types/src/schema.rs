use core::fmt;
use core::str::FromStr;

use alloy_primitives::{Address, U256};

/// Semantic field types used by voucher schemas.
///
/// Every schema in this protocol is a static tuple of these; there are no
/// dynamic-length fields, so the encoding needs no offset/length table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// 256-bit unsigned integer, one big-endian 32-byte word.
    Uint256,
    /// 20-byte account address, zero-padded into the low bytes of a word.
    Address,
}

/// One named, typed slot in a voucher schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn uint(name: &'static str) -> Field {
    Field { name, ty: FieldType::Uint256 }
}

const fn addr(name: &'static str) -> Field {
    Field { name, ty: FieldType::Address }
}

const JOB_FEE_FIELDS: &[Field] = &[
    uint("job_id"),
    addr("payment_token"),
    uint("job_fee"),
    uint("expiry"),
    uint("salt"),
];

const CLAIM_FIELDS: &[Field] = &[
    addr("signer"),
    addr("recipient"),
    uint("token_id"),
    uint("salt"),
    uint("expiry"),
];

const AUTOGRAPH_MINT_FIELDS: &[Field] = &[
    addr("recipient"),
    uint("job_id"),
    uint("token_id"),
    uint("units"),
    uint("salt"),
    addr("nft_contract"),
    addr("payment_token"),
    uint("payment_amount"),
    uint("expiry"),
];

/// Voucher schema kinds supported by the protocol (closed set).
///
/// Each kind corresponds to one privileged entry point on the verifying
/// contract; all three share the same encode/digest/sign pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Game job-fee authorization (`GameConsumer.getHash`).
    JobFee,
    /// Single-NFT claim authorization (`ERC721.claim`).
    Claim,
    /// Batch mint authorization (`ERC1155AutoGraphMinter.mintForFree` /
    /// `mintWithPaymentTokenAsFee`).
    AutographMint,
}

impl SchemaKind {
    /// The ordered field list for this schema.
    ///
    /// The order here is the encoding order and is load-bearing: it must match
    /// the tuple the verifying contract hashes in `getHash`.
    pub const fn fields(self) -> &'static [Field] {
        match self {
            SchemaKind::JobFee => JOB_FEE_FIELDS,
            SchemaKind::Claim => CLAIM_FIELDS,
            SchemaKind::AutographMint => AUTOGRAPH_MINT_FIELDS,
        }
    }

    /// Stable string id for logs, JSON output and CLI flags.
    pub const fn id(self) -> &'static str {
        match self {
            SchemaKind::JobFee => "job-fee",
            SchemaKind::Claim => "claim",
            SchemaKind::AutographMint => "autograph-mint",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SchemaKind {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job-fee" => Ok(SchemaKind::JobFee),
            "claim" => Ok(SchemaKind::Claim),
            "autograph-mint" => Ok(SchemaKind::AutographMint),
            _ => Err(UnknownSchema),
        }
    }
}

/// Parse error for [`SchemaKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownSchema;

impl fmt::Display for UnknownSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown schema (expected job-fee, claim or autograph-mint)")
    }
}

impl std::error::Error for UnknownSchema {}

/// A single typed field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Uint(U256),
    Address(Address),
}

impl FieldValue {
    pub const fn ty(&self) -> FieldType {
        match self {
            FieldValue::Uint(_) => FieldType::Uint256,
            FieldValue::Address(_) => FieldType::Address,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            FieldValue::Address(_) => None,
        }
    }
}

impl From<U256> for FieldValue {
    fn from(v: U256) -> Self {
        FieldValue::Uint(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Uint(U256::from(v))
    }
}

impl From<Address> for FieldValue {
    fn from(a: Address) -> Self {
        FieldValue::Address(a)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Uint(v) => write!(f, "{v}"),
            FieldValue::Address(a) => write!(f, "{a}"),
        }
    }
}
