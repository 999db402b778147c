mod accounts;
mod cli;
mod config;
mod contract;
mod flipper;
mod project;
mod receipt;
mod sandbox;
mod session;
mod types;
mod wallet;

use anyhow::Result;
use clap::Parser;
use cli::{
    Cli,
    Command,
    FlipArgs,
    WalletArgs,
};
use config::Config;
use session::FlipSession;
use wallet::Wallet;

fn wallet(args: WalletArgs) -> Result<()> {
    let (wallet, header) = match args.private_key {
        Some(private_key) => {
            (Wallet::from_private_key(&private_key)?, "Wallet loaded from private key!")
        }
        None => (Wallet::random(), "New random wallet created!"),
    };

    println!("✅ {}", header);
    println!("🔑 Private key: {}", wallet.private_key_hex());
    println!("📭 Address: {}", wallet.address());
    Ok(())
}

fn flip(args: FlipArgs) -> Result<()> {
    let config = match args.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };

    let mut session = FlipSession::new(&config)?;
    println!(
        "Flipper deployed at {} (is contract: {})",
        session.flipper().address(),
        session.is_deployed()
    );
    println!("Initial state: {}", session.state()?);
    for (n, record) in session.run(args.times)?.iter().enumerate() {
        println!(
            "  #{} flipping from {} ({}, block {}) => {} {}",
            n + 1,
            record.caller,
            record.tx_hash,
            record.block_number,
            record.event_name,
            record.event_arguments
        );
    }
    println!(
        "Final state: {} at block {}",
        session.state()?,
        session.block_number()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    // With no subcommand, behave like the plain wallet script
    match cli.command.unwrap_or_default() {
        Command::Wallet(args) => wallet(args),
        Command::Flip(args) => flip(args),
    }
}

#[cfg(test)]
mod tests;
