//! The contract interface used by the sandbox.
//!
//! Contract code is stateless: every piece of state lives in the storage map
//! owned by the sandbox, and code reaches it only through [`Env`]. Message input
//! and output are SCALE encoded.

use parity_scale_codec::{
    Decode,
    Encode,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    receipt::Log,
    types::{
        keccak256,
        selector_for,
        Address,
        BlockNumber,
        Hash,
        Selector,
    },
};

pub type Storage = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("reverted: {0}")]
    Revert(String),
    #[error("message `{0}` is not implemented")]
    UnknownMessage(String),
    #[error("state change attempted in a read-only message")]
    ReadOnly,
    #[error("failed to decode: {0}")]
    Decode(#[from] parity_scale_codec::Error),
}

pub type ExecResult = Result<Vec<u8>, ExecError>;

/// Static description of a callable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSpec {
    pub name: &'static str,
    pub selector: Selector,
    /// Whether the message is allowed to write storage or emit events
    pub mutates: bool,
}

impl MessageSpec {
    pub fn new(name: &'static str, mutates: bool) -> Self {
        Self {
            name,
            selector: selector_for(name),
            mutates,
        }
    }
}

/// An event a contract can emit. The first log topic is the hash of
/// `SIGNATURE`, the log data is the SCALE encoding of the event.
pub trait ContractEvent: Encode + Decode + Serialize {
    const NAME: &'static str;
    const SIGNATURE: &'static str;

    fn topic() -> Hash {
        keccak256(Self::SIGNATURE.as_bytes())
    }
}

pub trait ContractCode {
    fn name(&self) -> &'static str;

    fn messages(&self) -> Vec<MessageSpec>;

    /// Runs the constructor against the fresh, empty storage of the new instance.
    fn deploy(&self, env: &mut Env<'_>, input: &[u8]) -> Result<(), ExecError>;

    fn call(&self, env: &mut Env<'_>, message: &MessageSpec, input: &[u8]) -> ExecResult;
}

/// Execution environment handed to contract code for a single deploy or call.
pub struct Env<'a> {
    #[allow(dead_code)]
    caller: Address,
    address: Address,
    #[allow(dead_code)]
    block_number: BlockNumber,
    read_only: bool,
    storage: &'a mut Storage,
    logs: &'a mut Vec<Log>,
}

impl<'a> Env<'a> {
    pub fn new(
        caller: Address,
        address: Address,
        block_number: BlockNumber,
        read_only: bool,
        storage: &'a mut Storage,
        logs: &'a mut Vec<Log>,
    ) -> Self {
        Self {
            caller,
            address,
            block_number,
            read_only,
            storage,
            logs,
        }
    }

    #[allow(dead_code)]
    pub fn caller(&self) -> Address {
        self.caller
    }

    #[allow(dead_code)]
    pub fn address(&self) -> Address {
        self.address
    }

    #[allow(dead_code)]
    pub fn block_number(&self) -> BlockNumber {
        self.block_number
    }

    pub fn get<T: Decode>(&self, key: &[u8]) -> Result<Option<T>, ExecError> {
        match self.storage.get(key) {
            Some(raw) => Ok(Some(T::decode(&mut raw.as_slice())?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Encode>(&mut self, key: &[u8], value: &T) -> Result<(), ExecError> {
        if self.read_only {
            return Err(ExecError::ReadOnly);
        }
        self.storage.insert(key.to_vec(), value.encode());
        Ok(())
    }

    pub fn emit<E: ContractEvent>(&mut self, event: &E) -> Result<(), ExecError> {
        if self.read_only {
            return Err(ExecError::ReadOnly);
        }
        self.logs.push(Log {
            address: self.address,
            topics: vec![E::topic()],
            data: event.encode(),
        });
        Ok(())
    }
}
