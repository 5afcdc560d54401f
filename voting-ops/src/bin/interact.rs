use anyhow::*;
use clap::Parser;
use envconfig::Envconfig;
use voting_common::{log::init_logging, NetworkConfig, Settings};
use voting_ops::{chain::AlloyClient, cli::NetworkArgs, inspect::interact};

#[derive(Parser)]
#[command(about = "Inspect the state of the deployed voting contract")]
struct Args {
    #[command(flatten)]
    network: NetworkArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let settings = Settings::init_from_env()?;
    let network = NetworkConfig::resolve(&args.network.network, &settings)?;
    let store = settings.deployment_store();

    let interaction = interact(&store, || AlloyClient::connect(network, &settings))
        .await
        .context("error during interaction")?;
    println!("{interaction}");

    Ok(())
}
