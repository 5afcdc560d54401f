use anyhow::*;
use clap::Parser;
use colored::Colorize;
use envconfig::Envconfig;
use voting_common::{log::init_logging, NetworkConfig, Settings};
use voting_ops::{
    cli::NetworkArgs,
    explorer::{verify_deployment, EtherscanVerifier, VerifyOutcome},
    VerificationError,
};

#[derive(Parser)]
#[command(about = "Publish the deployed contract's source on the block explorer")]
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

    let (record, outcome) = verify_deployment(&store, &network, |_| {
        EtherscanVerifier::from_settings(&network, &settings)?
            .ok_or_else(|| VerificationError::NotConfigured(network.name.clone()).into())
    })
    .await
    .context("verification failed")?;

    match outcome {
        VerifyOutcome::Verified => println!("\n{} Contract verified successfully!", "✓".green()),
        VerifyOutcome::AlreadyVerified => {
            println!("\n{} Contract is already verified!", "✓".green())
        }
    }
    if let Some(url) = network.address_url(&record.contract_address) {
        println!("View on the explorer: {url}#code");
    }

    Ok(())
}
