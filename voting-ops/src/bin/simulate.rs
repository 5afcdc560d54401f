use anyhow::*;
use clap::Parser;
use envconfig::Envconfig;
use voting_common::{log::init_logging, NetworkConfig, Settings, CONTRACT_NAME};
use voting_ops::{
    chain::{AlloyClient, ContractArtifact},
    cli::NetworkArgs,
    simulate::simulate,
};

#[derive(Parser)]
#[command(about = "Run a complete voting scenario against a fresh contract")]
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
    let artifact = ContractArtifact::load(settings.artifacts_dir(), CONTRACT_NAME)?;

    let client = AlloyClient::connect(network, &settings).await?;
    let summary = simulate(&client, &artifact)
        .await
        .context("error during simulation")?;
    println!("{summary}");

    Ok(())
}
