use anyhow::*;
use clap::Parser;
use envconfig::Envconfig;
use voting_common::{log::init_logging, NetworkConfig, Settings, CONTRACT_NAME};
use voting_ops::{
    chain::{AlloyClient, ChainClient, ContractArtifact},
    cli::NetworkArgs,
    deploy::Deployer,
    explorer::EtherscanVerifier,
};

#[derive(Parser)]
#[command(about = "Deploy and seed the voting contract")]
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
    let verifier = EtherscanVerifier::from_settings(&network, &settings)?;
    let store = settings.deployment_store();

    let client = AlloyClient::connect(network, &settings).await?;
    let report = Deployer::new(&client, verifier.as_ref(), &store, &artifact)
        .run()
        .await
        .context("deployment failed")?;
    println!("{}", report.summary(client.network()));

    Ok(())
}
