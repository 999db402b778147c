use parity_scale_codec::{
    Decode,
    Encode,
};
use std::{
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

use crate::{
    contract::{
        ContractCode,
        MessageSpec,
    },
    flipper::Flipper,
    receipt::Receipt,
    sandbox::{
        Sandbox,
        SandboxError,
    },
    types::{
        Address,
        Selector,
    },
};

/// A deployable contract: its code plus the messages it exposes.
#[derive(Clone)]
pub struct ContractType {
    name: String,
    code: Arc<dyn ContractCode>,
    messages: Vec<MessageSpec>,
}

impl fmt::Debug for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractType")
            .field("name", &self.name)
            .field("messages", &self.messages)
            .finish()
    }
}

impl ContractType {
    pub fn new<C: ContractCode + 'static>(code: C) -> Self {
        Self {
            name: code.name().to_string(),
            messages: code.messages(),
            code: Arc::new(code),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &dyn ContractCode {
        self.code.as_ref()
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> &[MessageSpec] {
        &self.messages
    }

    pub fn message(&self, selector: &Selector) -> Option<&MessageSpec> {
        self.messages.iter().find(|m| m.selector == *selector)
    }

    pub fn selector(&self, message: &str) -> Result<Selector, SandboxError> {
        self.messages
            .iter()
            .find(|m| m.name == message)
            .map(|m| m.selector)
            .ok_or_else(|| SandboxError::UnknownMessage {
                contract: self.name.clone(),
                message: message.to_string(),
            })
    }
}

/// Handle to a deployed contract.
#[derive(Debug, Clone)]
pub struct ContractInstance {
    address: Address,
    contract_type: ContractType,
}

impl ContractInstance {
    pub fn new(address: Address, contract_type: ContractType) -> Self {
        Self {
            address,
            contract_type,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    #[allow(dead_code)]
    pub fn contract_type(&self) -> &ContractType {
        &self.contract_type
    }

    pub fn is_contract(&self, sandbox: &Sandbox) -> bool {
        sandbox.is_contract(&self.address)
    }

    /// Sends `message` as a transaction from `sender`.
    pub fn call<A: Encode>(
        &self,
        sandbox: &mut Sandbox,
        sender: &Address,
        message: &str,
        args: &A,
    ) -> Result<Receipt, SandboxError> {
        let selector = self.contract_type.selector(message)?;
        sandbox.call(sender, &self.address, selector, args)
    }

    /// Evaluates `message` without changing any state and decodes its output.
    pub fn query<A: Encode, R: Decode>(
        &self,
        sandbox: &Sandbox,
        message: &str,
        args: &A,
    ) -> Result<R, SandboxError> {
        let selector = self.contract_type.selector(message)?;
        let output = sandbox.query(&self.address, selector, args)?;
        R::decode(&mut output.as_slice()).map_err(SandboxError::OutputDecode)
    }
}

/// Registry of the contract types available for deployment, by name.
#[derive(Debug, Clone)]
pub struct Project {
    contracts: BTreeMap<String, ContractType>,
}

impl Default for Project {
    fn default() -> Self {
        let mut project = Self::new();
        project.register(Flipper);
        project
    }
}

impl Project {
    pub fn new() -> Self {
        Self {
            contracts: BTreeMap::new(),
        }
    }

    pub fn register<C: ContractCode + 'static>(&mut self, code: C) {
        let contract_type = ContractType::new(code);
        self.contracts
            .insert(contract_type.name().to_string(), contract_type);
    }

    pub fn contract(&self, name: &str) -> Result<&ContractType, SandboxError> {
        self.contracts
            .get(name)
            .ok_or_else(|| SandboxError::UnknownContractType(name.to_string()))
    }

    #[allow(dead_code)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flipper::FLIPPING,
        types::selector_for,
    };

    #[test]
    fn test_default_project_has_flipper() {
        let project = Project::default();
        assert_eq!(project.names().collect::<Vec<_>>(), vec!["Flipper"]);
        let flipper = project.contract("Flipper").unwrap();
        assert_eq!(flipper.messages().len(), 2);
        assert_eq!(flipper.selector(FLIPPING).unwrap(), selector_for("flipping"));
        assert!(flipper.message(&selector_for("flip")).is_some());
    }

    #[test]
    fn test_missing_contract_and_message() {
        let project = Project::default();
        assert!(matches!(
            project.contract("Token"),
            Err(SandboxError::UnknownContractType(name)) if name == "Token"
        ));
        let flipper = project.contract("Flipper").unwrap();
        assert!(matches!(
            flipper.selector("flop"),
            Err(SandboxError::UnknownMessage { .. })
        ));
        assert!(flipper.message(&[0; 4]).is_none());
        assert!(Project::new().names().next().is_none());
    }
}
