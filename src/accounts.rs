//! The pool of pre-funded test accounts.

use secp256k1::SecretKey;
use std::ops::Index;

use crate::{
    types::{
        keccak256,
        Address,
    },
    wallet::Wallet,
};

#[derive(Debug, Clone)]
pub struct TestAccount {
    #[allow(dead_code)]
    index: usize,
    wallet: Wallet,
}

impl TestAccount {
    #[allow(dead_code)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    #[allow(dead_code)]
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }
}

#[derive(Debug, Clone)]
pub struct TestAccounts {
    accounts: Vec<TestAccount>,
}

impl TestAccounts {
    /// Derives `count` accounts from `seed`. Account `i` gets the first valid
    /// scalar among `keccak256(seed || i || attempt)` for attempt = 0, 1, ..
    pub fn derive(seed: u64, count: usize) -> Self {
        let accounts = (0..count)
            .map(|index| TestAccount {
                index,
                wallet: Wallet::from_secret_key(derive_secret(seed, index as u64)),
            })
            .collect();
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Option<&TestAccount> {
        self.accounts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestAccount> {
        self.accounts.iter()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.iter().any(|a| a.address() == *address)
    }
}

impl Index<usize> for TestAccounts {
    type Output = TestAccount;

    fn index(&self, index: usize) -> &Self::Output {
        &self.accounts[index]
    }
}

fn derive_secret(seed: u64, index: u64) -> SecretKey {
    let mut attempt: u32 = 0;
    loop {
        let mut preimage = Vec::with_capacity(20);
        preimage.extend_from_slice(&seed.to_be_bytes());
        preimage.extend_from_slice(&index.to_be_bytes());
        preimage.extend_from_slice(&attempt.to_be_bytes());
        // Out of range hashes are astronomically unlikely, just try the next one
        if let Ok(key) = SecretKey::from_slice(&keccak256(&preimage)) {
            return key;
        }
        attempt += 1;
    }
}
