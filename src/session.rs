use anyhow::{
    ensure,
    Result,
};
use fastrand::Rng;
use log::info;

use crate::{
    config::Config,
    flipper::{
        Flipped,
        FLIP,
        FLIPPING,
    },
    project::{
        ContractInstance,
        Project,
    },
    sandbox::Sandbox,
    types::{
        Address,
        BlockNumber,
    },
};

/// One `flipping` transaction and the event it emitted.
#[derive(Debug, Clone)]
pub struct FlipRecord {
    pub caller: Address,
    pub tx_hash: String,
    pub block_number: BlockNumber,
    pub event_name: &'static str,
    #[allow(dead_code)]
    pub event: Flipped,
    pub event_arguments: serde_json::Value,
}

/// Deploys a flipper from the first test account and lets randomly chosen test
/// accounts toggle it.
pub struct FlipSession {
    sandbox: Sandbox,
    flipper: ContractInstance,
    rng: Rng,
}

impl FlipSession {
    pub fn new(config: &Config) -> Result<Self> {
        ensure!(
            config.number_of_accounts > 0,
            "at least one test account is needed to deploy the flipper"
        );
        let project = Project::default();
        let mut sandbox = Sandbox::new(config);
        let owner = sandbox.accounts()[0].address();
        let flipper = sandbox.deploy(&owner, project.contract("Flipper")?, &())?;
        info!("Flipper deployed at {}", flipper.address());
        Ok(Self {
            sandbox,
            flipper,
            rng: Rng::with_seed(config.seed),
        })
    }

    pub fn flipper(&self) -> &ContractInstance {
        &self.flipper
    }

    pub fn is_deployed(&self) -> bool {
        self.flipper.is_contract(&self.sandbox)
    }

    pub fn block_number(&self) -> BlockNumber {
        self.sandbox.block_number()
    }

    pub fn state(&self) -> Result<bool> {
        Ok(self.flipper.query::<_, bool>(&self.sandbox, FLIP, &())?)
    }

    pub fn flip_once(&mut self) -> Result<FlipRecord> {
        let index = self.rng.usize(..self.sandbox.accounts().len());
        let caller = self.sandbox.accounts()[index].address();
        let receipt = self
            .flipper
            .call(&mut self.sandbox, &caller, FLIPPING, &())?;
        let events = receipt.decode_logs::<Flipped>()?;
        ensure!(
            events.len() == 1,
            "expected exactly one Flipped event, got {}",
            events.len()
        );
        let decoded = &events[0];
        Ok(FlipRecord {
            caller: receipt.sender,
            tx_hash: receipt.tx_hash_hex(),
            block_number: receipt.block_number,
            event_name: decoded.event_name(),
            event: decoded.event,
            event_arguments: decoded.event_arguments()?,
        })
    }

    pub fn run(&mut self, times: u32) -> Result<Vec<FlipRecord>> {
        (0..times).map(|_| self.flip_once()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_alternates() {
        let mut session = FlipSession::new(&Config::default()).unwrap();
        assert!(session.state().unwrap());
        let records = session.run(3).unwrap();
        let states: Vec<bool> = records.iter().map(|r| r.event.state).collect();
        assert_eq!(states, vec![false, true, false]);
        assert!(!session.state().unwrap());
    }

    #[test]
    fn test_flip_record_comes_from_receipt() {
        let mut session = FlipSession::new(&Config::default()).unwrap();
        assert!(session.is_deployed());
        assert_eq!(session.block_number(), 1);

        let record = session.flip_once().unwrap();
        assert_eq!(record.block_number, 2);
        assert_eq!(session.block_number(), 2);
        assert_eq!(record.event_name, "Flipped");
        assert_eq!(record.event_arguments, serde_json::json!({ "state": false }));
        assert!(session.sandbox.accounts().contains(&record.caller));
        assert!(record.tx_hash.starts_with("0x"));
    }

    #[test]
    fn test_session_is_reproducible() {
        let callers = |seed| {
            let config = Config {
                seed,
                ..Default::default()
            };
            let mut session = FlipSession::new(&config).unwrap();
            session
                .run(5)
                .unwrap()
                .into_iter()
                .map(|r| r.caller)
                .collect::<Vec<_>>()
        };
        assert_eq!(callers(3), callers(3));
    }

    #[test]
    fn test_session_needs_accounts() {
        let config = Config {
            number_of_accounts: 0,
            ..Default::default()
        };
        assert!(FlipSession::new(&config).is_err());
    }
}
