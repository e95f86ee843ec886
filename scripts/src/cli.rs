//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, print_plan},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_FLAT_FEE, DEFAULT_NUM_CONFIRMATIONS, DEFAULT_OWNER_ADDRESS,
        DEFAULT_RPC_URL,
    },
    errors::ScriptError,
    utils::{parse_address, parse_amount},
};

/// Deploy the marketplace contracts and wire them together
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", global = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL, global = true)]
    pub rpc_url: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy every marketplace contract, then configure them
    Deploy(DeployArgs),
    /// Print the ordered deployment plan without sending any transactions
    Plan(PlanArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, priv_key: Option<&str>, rpc_url: &str) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, priv_key, rpc_url).await,
            Command::Plan(args) => print_plan(args),
        }
    }
}

/// Parameters of the configuration calls
#[derive(Args, Clone)]
pub struct WiringArgs {
    /// Address passed to `MarketFactory.initialize` as the factory owner
    #[arg(short, long, default_value = DEFAULT_OWNER_ADDRESS)]
    pub owner: String,

    /// Flat fee, in wei, set on the `RedeemAndFee` contract
    #[arg(short, long, default_value = DEFAULT_FLAT_FEE)]
    pub flat_fee: String,
}

impl WiringArgs {
    /// Parse the owner address and flat fee
    pub fn parse(&self) -> Result<(Address, U256), ScriptError> {
        Ok((parse_address(&self.owner)?, parse_amount(&self.flat_fee)?))
    }
}

/// Deploy and configure the marketplace contracts
#[derive(Args)]
pub struct DeployArgs {
    /// Parameters of the configuration calls
    #[command(flatten)]
    pub wiring: WiringArgs,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path of a JSON file in which to record the deployed addresses
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Number of confirmations to wait for on every transaction
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_NUM_CONFIRMATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub confirmations: u64,
}

/// Print the deployment plan
#[derive(Args)]
pub struct PlanArgs {
    /// Parameters of the configuration calls
    #[command(flatten)]
    pub wiring: WiringArgs,
}
