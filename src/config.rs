use anyhow::Result;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fs::File,
    path::Path,
};

use crate::types::Balance;

/// One million ether, in wei.
pub const DEFAULT_INITIAL_BALANCE: Balance = 1_000_000 * 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed the test accounts are derived from. The same seed always yields the
    /// same accounts.
    pub seed: u64,

    // Number of pre-funded test accounts
    pub number_of_accounts: usize,

    // Balance minted into every test account when the sandbox starts
    pub initial_balance: Balance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            number_of_accounts: 10,
            initial_balance: DEFAULT_INITIAL_BALANCE,
        }
    }
}

impl Config {
    pub fn from_yaml_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let fp = File::open(file)?;
        let des = serde_yaml::from_reader(fp)?;
        Ok(des)
    }

    #[allow(dead_code)]
    pub fn to_yaml_file<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let fp = File::create(file)?;
        serde_yaml::to_writer(fp, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config() {
        let config = Config {
            seed: 42,
            ..Default::default()
        };
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test_config.yaml");
        config.to_yaml_file(&file).unwrap();
        let config2 = Config::from_yaml_file(file).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("partial.yaml");
        let mut fp = File::create(&file).unwrap();
        writeln!(fp, "number_of_accounts: 3").unwrap();

        let config = Config::from_yaml_file(&file).unwrap();
        assert_eq!(config.number_of_accounts, 3);
        assert_eq!(config.seed, 0);
        assert_eq!(config.initial_balance, DEFAULT_INITIAL_BALANCE);
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::from_yaml_file(temp_dir.path().join("nope.yaml")).is_err());
    }
}
