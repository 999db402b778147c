use clap::{
    Args,
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `wallet`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new random wallet and print its private key and address
    Wallet(WalletArgs),

    /// Deploy a flipper on a fresh sandbox and toggle it
    Flip(FlipArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Wallet(WalletArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct WalletArgs {
    /// Load this hex private key instead of generating a new one
    #[arg(long)]
    pub private_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct FlipArgs {
    /// Number of `flipping` transactions to send
    #[arg(short, long, default_value_t = 1)]
    pub times: u32,

    /// Sandbox configuration (yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_wallet() {
        let cli = Cli::try_parse_from(["flipper-sandbox"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Command::Wallet(WalletArgs { private_key: None })
        ));
    }

    #[test]
    fn test_flip_args() {
        let cli = Cli::try_parse_from(["flipper-sandbox", "flip", "-t", "3"]).unwrap();
        match cli.command {
            Some(Command::Flip(args)) => {
                assert_eq!(args.times, 3);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
