//! Command-line arguments shared by the tools.

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    #[arg(long, default_value = "hardhat")]
    /// The network to operate on: hardhat, localhost, localfhenix or sepolia
    pub network: String,
}
