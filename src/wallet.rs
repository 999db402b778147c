//! Random wallet generation.
//!
//! A wallet is a secp256k1 keypair together with the account address derived
//! from its public key. Nothing here is persisted: the key lives as long as the
//! value does.

use secp256k1::{
    PublicKey,
    SecretKey,
    SECP256K1,
};
use std::fmt;

use crate::types::Address;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("private key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("private key is not a valid secp256k1 scalar: {0}")]
    InvalidKey(#[from] secp256k1::Error),
}

#[derive(Clone)]
pub struct Wallet {
    secret_key: SecretKey,
    address: Address,
}

impl Wallet {
    /// Generates a fresh keypair using the thread-local OS-seeded RNG.
    pub fn random() -> Self {
        let (secret_key, _) = SECP256K1.generate_keypair(&mut secp256k1::rand::thread_rng());
        Self::from_secret_key(secret_key)
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(SECP256K1, &secret_key);
        Self {
            secret_key,
            address: Address::from_public_key(&public_key),
        }
    }

    /// Loads a wallet from a hex encoded private key, with or without `0x`.
    pub fn from_private_key(private_key: &str) -> Result<Self, WalletError> {
        let private_key = private_key.trim();
        let bytes = hex::decode(private_key.strip_prefix("0x").unwrap_or(private_key))?;
        let secret_key = SecretKey::from_slice(&bytes)?;
        Ok(Self::from_secret_key(secret_key))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    #[allow(dead_code)]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(SECP256K1, &self.secret_key)
    }

    /// The secret scalar as `0x` prefixed lowercase hex.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret_key.secret_bytes()))
    }
}

// Keep the secret out of logs.
impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_private_key() {
        let wallet = Wallet::from_private_key(
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        )
        .unwrap();
        assert_eq!(
            wallet.address().to_string(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_private_key_one() {
        let wallet = Wallet::from_private_key(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            wallet.address().to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_random_wallet_roundtrips_through_hex() {
        for _ in 0..16 {
            let wallet = Wallet::random();
            let hex_key = wallet.private_key_hex();
            assert!(hex_key.starts_with("0x"));
            assert_eq!(hex_key.len(), 66);
            assert!(hex_key[2..].chars().all(|c| c.is_ascii_hexdigit()));

            let reloaded = Wallet::from_private_key(&hex_key).unwrap();
            assert_eq!(reloaded.address(), wallet.address());
            assert_eq!(
                Address::from_public_key(&reloaded.public_key()),
                wallet.address()
            );
        }
    }

    #[test]
    fn test_random_wallets_differ() {
        assert_ne!(Wallet::random().address(), Wallet::random().address());
    }

    #[test]
    fn test_invalid_private_keys() {
        assert!(matches!(
            Wallet::from_private_key("0xnothex"),
            Err(WalletError::InvalidHex(_))
        ));
        // zero is not a valid scalar
        assert!(matches!(
            Wallet::from_private_key(&"00".repeat(32)),
            Err(WalletError::InvalidKey(_))
        ));
        // too short
        assert!(matches!(
            Wallet::from_private_key("0x0102"),
            Err(WalletError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let wallet = Wallet::random();
        let debug = format!("{wallet:?}");
        assert!(!debug.contains(&wallet.private_key_hex()[2..]));
        assert!(debug.contains(&wallet.address().to_string()));
    }
}
