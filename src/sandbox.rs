//! An ephemeral in-process chain.
//!
//! The sandbox keeps a map of accounts (balances, nonces, and for contracts the
//! code and storage) and executes deployments and messages against it. Every
//! state-changing transaction is atomic: a failing message leaves no trace.

use log::{
    debug,
    info,
};
use parity_scale_codec::Encode;
use std::collections::HashMap;

use crate::{
    accounts::TestAccounts,
    config::Config,
    contract::{
        Env,
        ExecError,
        Storage,
    },
    project::{
        ContractInstance,
        ContractType,
    },
    receipt::Receipt,
    types::{
        keccak256,
        Address,
        Balance,
        BlockNumber,
        Nonce,
        Selector,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("{0} is not a test account of this sandbox")]
    UnknownSender(Address),
    #[error("no contract deployed at {0}")]
    NotAContract(Address),
    #[error("contract type `{0}` not found in project")]
    UnknownContractType(String),
    #[error("contract `{contract}` has no message `{message}`")]
    UnknownMessage { contract: String, message: String },
    #[error("contract at {address} has no message with selector 0x{}", hex::encode(.selector))]
    UnknownSelector { address: Address, selector: Selector },
    #[error("execution failed: {0}")]
    Execution(#[from] ExecError),
    #[error("failed to decode message output: {0}")]
    OutputDecode(#[source] parity_scale_codec::Error),
    #[error("failed to decode `{event}` event: {source}")]
    EventDecode {
        event: &'static str,
        #[source]
        source: parity_scale_codec::Error,
    },
}

#[derive(Debug, Clone, Default)]
struct AccountInfo {
    balance: Balance,
    nonce: Nonce,
    code: Option<ContractType>,
    storage: Storage,
}

#[derive(Debug, Clone, Default)]
struct ChainState {
    accounts: HashMap<Address, AccountInfo>,
    block_number: BlockNumber,
}

/// A copy of the whole chain state that can be restored later.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Snapshot(ChainState);

pub struct Sandbox {
    state: ChainState,
    accounts: TestAccounts,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Sandbox {
    pub fn new(config: &Config) -> Self {
        let accounts = TestAccounts::derive(config.seed, config.number_of_accounts);
        let mut sandbox = Self {
            state: ChainState::default(),
            accounts,
        };
        debug!("Setting initial state. Give initial balance to test accounts.");
        let addresses: Vec<Address> = sandbox.accounts.iter().map(|a| a.address()).collect();
        for address in addresses {
            debug!("  Mint {} to {}", config.initial_balance, address);
            sandbox.mint_into(&address, config.initial_balance);
        }
        sandbox
    }

    pub fn accounts(&self) -> &TestAccounts {
        &self.accounts
    }

    pub fn block_number(&self) -> BlockNumber {
        self.state.block_number
    }

    pub fn mint_into(&mut self, address: &Address, amount: Balance) -> Balance {
        let account = self.state.accounts.entry(*address).or_default();
        account.balance = account.balance.saturating_add(amount);
        account.balance
    }

    #[allow(dead_code)]
    pub fn balance_of(&self, address: &Address) -> Balance {
        self.state
            .accounts
            .get(address)
            .map_or(0, |account| account.balance)
    }

    pub fn nonce_of(&self, address: &Address) -> Nonce {
        self.state
            .accounts
            .get(address)
            .map_or(0, |account| account.nonce)
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.state
            .accounts
            .get(address)
            .is_some_and(|account| account.code.is_some())
    }

    #[allow(dead_code)]
    pub fn take_snapshot(&self) -> Snapshot {
        Snapshot(self.state.clone())
    }

    #[allow(dead_code)]
    pub fn restore_snapshot(&mut self, snapshot: Snapshot) {
        self.state = snapshot.0;
    }

    // Only test accounts can sign transactions
    fn sender_nonce(&self, sender: &Address) -> Result<Nonce, SandboxError> {
        if !self.accounts.contains(sender) {
            return Err(SandboxError::UnknownSender(*sender));
        }
        Ok(self.nonce_of(sender))
    }

    fn contract_at(&self, address: &Address) -> Result<(&ContractType, &Storage), SandboxError> {
        self.state
            .accounts
            .get(address)
            .and_then(|account| account.code.as_ref().map(|code| (code, &account.storage)))
            .ok_or(SandboxError::NotAContract(*address))
    }

    fn increment_nonce(&mut self, sender: &Address) {
        self.state.accounts.entry(*sender).or_default().nonce += 1;
    }

    /// Deploys `contract_type` from `sender`. The address is derived from the
    /// sender and its current nonce.
    pub fn deploy<A: Encode>(
        &mut self,
        sender: &Address,
        contract_type: &ContractType,
        args: &A,
    ) -> Result<ContractInstance, SandboxError> {
        let nonce = self.sender_nonce(sender)?;
        let address = contract_address(sender, nonce);
        let block_number = self.state.block_number + 1;
        info!(
            "Deploying {} from {} (nonce {}) to {}",
            contract_type.name(),
            sender,
            nonce,
            address
        );

        let mut storage = Storage::new();
        let mut logs = vec![];
        let mut env = Env::new(*sender, address, block_number, false, &mut storage, &mut logs);
        contract_type.code().deploy(&mut env, &args.encode())?;

        let account = self.state.accounts.entry(address).or_default();
        account.code = Some(contract_type.clone());
        account.storage = storage;
        self.increment_nonce(sender);
        self.state.block_number = block_number;

        Ok(ContractInstance::new(address, contract_type.clone()))
    }

    /// Sends a transaction calling `selector` on `callee`.
    pub fn call<A: Encode>(
        &mut self,
        sender: &Address,
        callee: &Address,
        selector: Selector,
        args: &A,
    ) -> Result<Receipt, SandboxError> {
        let nonce = self.sender_nonce(sender)?;
        let (contract_type, storage) = self.contract_at(callee)?;
        let message = contract_type
            .message(&selector)
            .ok_or(SandboxError::UnknownSelector {
                address: *callee,
                selector,
            })?
            .clone();
        let contract_type = contract_type.clone();
        // Execute against a copy so a failing message cannot leave partial writes
        let mut storage = storage.clone();
        let input = args.encode();
        let block_number = self.state.block_number + 1;
        info!("Sending {} from {} to {}", message.name, sender, callee);

        let mut logs = vec![];
        let mut env = Env::new(
            *sender,
            *callee,
            block_number,
            !message.mutates,
            &mut storage,
            &mut logs,
        );
        let return_data = contract_type.code().call(&mut env, &message, &input)?;

        if let Some(account) = self.state.accounts.get_mut(callee) {
            account.storage = storage;
        }
        self.increment_nonce(sender);
        self.state.block_number = block_number;

        let mut preimage = Vec::new();
        preimage.extend_from_slice(sender.as_bytes());
        preimage.extend_from_slice(&nonce.to_be_bytes());
        preimage.extend_from_slice(callee.as_bytes());
        preimage.extend_from_slice(&selector);
        preimage.extend_from_slice(&input);
        let receipt = Receipt {
            tx_hash: keccak256(&preimage),
            sender: *sender,
            receiver: *callee,
            block_number,
            return_data,
            logs,
        };
        debug!(
            "Transaction {} included in block {} with {} log(s)",
            receipt.tx_hash_hex(),
            block_number,
            receipt.logs.len()
        );
        Ok(receipt)
    }

    /// Dry-runs `selector` on `callee` and returns the encoded output. Nothing is
    /// written back, whatever the message does.
    pub fn query<A: Encode>(
        &self,
        callee: &Address,
        selector: Selector,
        args: &A,
    ) -> Result<Vec<u8>, SandboxError> {
        let (contract_type, storage) = self.contract_at(callee)?;
        let message = contract_type
            .message(&selector)
            .ok_or(SandboxError::UnknownSelector {
                address: *callee,
                selector,
            })?;
        let mut storage = storage.clone();
        let mut logs = vec![];
        let mut env = Env::new(
            Address::ZERO,
            *callee,
            self.state.block_number,
            false,
            &mut storage,
            &mut logs,
        );
        let output = contract_type.code().call(&mut env, message, &args.encode())?;
        Ok(output)
    }
}

/// `keccak256(sender || nonce)`, truncated to an address.
pub fn contract_address(sender: &Address, nonce: Nonce) -> Address {
    let mut preimage = Vec::with_capacity(28);
    preimage.extend_from_slice(sender.as_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    Address::from_hash(&keccak256(&preimage))
}
