use core::fmt;

/// A recoverable ECDSA signature in the canonical 65-byte wire form
/// `r (32) || s (32) || v (1)`.
///
/// `v` is carried as received; the verifier accepts {0, 1, 27, 28} the same
/// way the on-chain `ecrecover` path does. Construction only checks the wire
/// width; curve-level validity is the verifier's job.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct VoucherSignature([u8; 65]);

impl VoucherSignature {
    pub const WIRE_LEN: usize = 65;

    pub fn from_parts(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        let mut buf = [0u8; 65];
        buf[0..32].copy_from_slice(&r);
        buf[32..64].copy_from_slice(&s);
        buf[64] = v;
        Self(buf)
    }

    /// Parse from raw bytes; `None` unless exactly 65 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let buf: [u8; 65] = bytes.try_into().ok()?;
        Some(Self(buf))
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The `r || s` scalar pair, without the recovery byte.
    pub fn rs(&self) -> &[u8] {
        &self.0[0..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for VoucherSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoucherSignature({})", self.to_hex())
    }
}

impl fmt::Display for VoucherSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
