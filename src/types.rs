use parity_scale_codec::{
    Decode,
    Encode,
};
use secp256k1::PublicKey;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use sha3::{
    Digest,
    Keccak256,
};
use std::{
    fmt,
    str::FromStr,
};

// Types shared by the wallet and the sandbox. The sizes follow the Ethereum
// account model: 20 byte addresses derived from Keccak-256 hashes.
pub type Hash = [u8; 32];
pub type Balance = u128;
pub type Nonce = u64;
pub type BlockNumber = u64;
pub type Selector = [u8; 4];

pub fn keccak256(data: &[u8]) -> Hash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Message selector: the first four bytes of the Keccak-256 hash of `name()`.
pub fn selector_for(name: &str) -> Selector {
    let hash = keccak256(format!("{name}()").as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A 20 byte account address.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0; 20]);

    #[allow(dead_code)]
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Takes the last 20 bytes of a 32 byte hash.
    pub fn from_hash(hash: &Hash) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Derives the account address owning `public_key`: the Keccak-256 hash of
    /// the 64 byte uncompressed point (without the `0x04` tag), truncated.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.serialize_uncompressed();
        Self::from_hash(&keccak256(&uncompressed[1..]))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Mixed-case checksum encoding (EIP-55), `0x` prefixed.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseAddressError {
    #[error("invalid hex in address: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("address must be 20 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        let bytes: [u8; 20] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::Length(raw.len()))?;
        Ok(Self(bytes))
    }
}
