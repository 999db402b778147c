use crate::{
    contract::ContractEvent,
    sandbox::SandboxError,
    types::{
        Address,
        BlockNumber,
        Hash,
    },
};

/// A log entry emitted by a contract during a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
}

/// The outcome of a transaction that was included in the sandbox chain.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx_hash: Hash,
    pub sender: Address,
    #[allow(dead_code)]
    pub receiver: Address,
    pub block_number: BlockNumber,
    #[allow(dead_code)]
    pub return_data: Vec<u8>,
    pub logs: Vec<Log>,
}

/// An event decoded from a log, together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent<E> {
    #[allow(dead_code)]
    pub contract_address: Address,
    #[allow(dead_code)]
    pub log_index: usize,
    pub event: E,
}

impl<E: ContractEvent> DecodedEvent<E> {
    pub fn event_name(&self) -> &'static str {
        E::NAME
    }

    /// The event fields as a JSON object, keyed by field name.
    pub fn event_arguments(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.event)
    }
}

impl Receipt {
    /// Decodes every log of this transaction whose topic matches `E`, in
    /// emission order.
    pub fn decode_logs<E: ContractEvent>(&self) -> Result<Vec<DecodedEvent<E>>, SandboxError> {
        let topic = E::topic();
        self.logs
            .iter()
            .enumerate()
            .filter(|(_, log)| log.topics.first() == Some(&topic))
            .map(|(log_index, log)| -> Result<DecodedEvent<E>, SandboxError> {
                let event = E::decode(&mut log.data.as_slice()).map_err(|e| {
                    SandboxError::EventDecode {
                        event: E::NAME,
                        source: e,
                    }
                })?;
                Ok(DecodedEvent {
                    contract_address: log.address,
                    log_index,
                    event,
                })
            })
            .collect()
    }

    pub fn tx_hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.tx_hash))
    }
}
