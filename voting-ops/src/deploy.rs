//! Deployment and initialization of the voting contract.
//!
//! Deployment and initialization have independent outcomes: once the
//! contract is deployed and its record persisted, neither a failed explorer
//! verification nor a failed seeding step makes the run fail.

use crate::{
    chain::{ChainClient, ContractArtifact, VotingContract},
    error::OpsError,
    explorer::{ExplorerVerifier, VerificationRequest, VerifyOutcome},
    seed::{seed_contract, SeedStep, SeededState},
};
use alloy::primitives::{utils::format_ether, Bytes, U256};
use chrono::{SubsecRound, Utc};
use colored::Colorize;
use itertools::Itertools;
use log::{info, warn};
use std::fmt::{self, Display, Formatter};
use voting_common::{DeploymentRecord, DeploymentStore, NetworkConfig, SetupError};

/// Confirmations awaited on public networks before verifying.
pub const CONFIRMATIONS: u64 = 6;

#[derive(Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Local network, nothing to verify.
    NotApplicable,
    /// No explorer verifier configured for this public network.
    Skipped,
    Verified,
    AlreadyVerified,
    /// Verification failed; the deployment itself stands.
    Failed(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Completed(SeededState),
    /// Seeding stopped at `step`; later steps were not attempted.
    Failed { step: SeedStep, error: String },
}

/// What a deployment run achieved.
#[derive(Debug)]
pub struct DeploymentReport {
    pub record: DeploymentRecord,
    pub deployer_balance: U256,
    pub verification: VerificationStatus,
    pub initialization: InitOutcome,
}

/// Sequences deployment, record persistence, verification and seeding.
pub struct Deployer<'a, C, V> {
    client: &'a C,
    verifier: Option<&'a V>,
    store: &'a DeploymentStore,
    artifact: &'a ContractArtifact,
}

impl<'a, C: ChainClient, V: ExplorerVerifier> Deployer<'a, C, V> {
    pub fn new(
        client: &'a C,
        verifier: Option<&'a V>,
        store: &'a DeploymentStore,
        artifact: &'a ContractArtifact,
    ) -> Self {
        Self {
            client,
            verifier,
            store,
            artifact,
        }
    }

    /// Run the whole deployment. Errors are returned only for failures up
    /// to and including the confirmation wait; verification and seeding
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<DeploymentReport, OpsError> {
        let network = self.client.network();
        let deployer = *self
            .client
            .signers()
            .first()
            .ok_or_else(|| SetupError::NoSigner(network.name.clone()))?;
        info!("Deploying contracts with account: {deployer}");
        let deployer_balance = self.client.balance(deployer).await?;
        info!("Account balance: {} ETH", format_ether(deployer_balance));
        info!("Network: {}\n", network.name);

        info!("Deploying contract...");
        let deployed = self.client.deploy(self.artifact).await?;
        let contract_address = deployed.contract.address();
        info!("Contract deployed to: {contract_address}");

        let record = DeploymentRecord {
            contract_name: self.artifact.name.clone(),
            contract_address,
            deployer,
            network: network.name.clone(),
            chain_id: network.chain_id,
            deployment_time: Utc::now().trunc_subsecs(3),
            block_number: self.client.block_number().await?,
            constructor_args: vec![],
        };
        self.store.save(&record)?;
        info!(
            "{} Deployment info saved to {}",
            "✓".green(),
            self.store.path().display()
        );

        let verification = if network.is_local() {
            VerificationStatus::NotApplicable
        } else {
            info!("Waiting for {CONFIRMATIONS} block confirmations...");
            self.client
                .wait_for_confirmations(deployed.tx_hash, CONFIRMATIONS)
                .await?;
            self.verify(&record).await
        };

        info!("\n=== Initializing Contract ===");
        let initialization = match seed_contract(&deployed.contract).await {
            Ok(seeded) => InitOutcome::Completed(seeded),
            Err(err) => {
                warn!("{} {err}", "✗".red());
                warn!("Contract deployed but not initialized. You can initialize manually.");
                InitOutcome::Failed {
                    step: err.step,
                    error: err.source.to_string(),
                }
            }
        };

        Ok(DeploymentReport {
            record,
            deployer_balance,
            verification,
            initialization,
        })
    }

    async fn verify(&self, record: &DeploymentRecord) -> VerificationStatus {
        let Some(verifier) = self.verifier else {
            warn!("No explorer API key configured, skipping verification");
            return VerificationStatus::Skipped;
        };
        info!("Verifying contract on the explorer...");
        let request = VerificationRequest {
            address: record.contract_address,
            contract: self.artifact.fully_qualified_name(),
            constructor_args: Bytes::new(),
        };
        match verifier.verify(&request).await {
            Ok(VerifyOutcome::Verified) => {
                info!("{} Contract verified successfully", "✓".green());
                VerificationStatus::Verified
            }
            Ok(VerifyOutcome::AlreadyVerified) => {
                info!("{} Contract already verified", "✓".green());
                VerificationStatus::AlreadyVerified
            }
            Err(err) => {
                warn!("{} Verification failed: {err}", "✗".red());
                VerificationStatus::Failed(err.to_string())
            }
        }
    }
}

impl DeploymentReport {
    /// Human-readable closing summary.
    pub fn summary<'r>(&'r self, network: &'r NetworkConfig) -> Summary<'r> {
        Summary {
            report: self,
            network,
        }
    }
}

pub struct Summary<'r> {
    report: &'r DeploymentReport,
    network: &'r NetworkConfig,
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let record = &self.report.record;

        match &self.report.initialization {
            InitOutcome::Completed(_) => writeln!(f, "\n=== Deployment Complete ===")?,
            InitOutcome::Failed { step, error } => {
                writeln!(f, "\n=== Deployment Complete (not initialized) ===")?;
                writeln!(f, "Initialization stopped while {step}: {error}")?;
            }
        }
        writeln!(f, "\nContract Information:")?;
        writeln!(f, "  Address: {}", record.contract_address)?;
        writeln!(f, "  Network: {}", record.network)?;
        writeln!(f, "  Admin: {}", record.deployer)?;
        writeln!(f, "  Block: {}", record.block_number)?;
        match &self.report.verification {
            VerificationStatus::NotApplicable => {}
            VerificationStatus::Skipped => writeln!(f, "  Verification: skipped")?,
            VerificationStatus::Verified => writeln!(f, "  Verification: verified")?,
            VerificationStatus::AlreadyVerified => {
                writeln!(f, "  Verification: already verified")?
            }
            VerificationStatus::Failed(err) => writeln!(f, "  Verification: failed ({err})")?,
        }
        if let InitOutcome::Completed(seeded) = &self.report.initialization {
            writeln!(
                f,
                "  Seeded event: {} (candidates [{}])",
                seeded.event,
                seeded.candidates.iter().join(", ")
            )?;
        }

        if let (Some(contract), Some(deployer)) = (
            self.network.address_url(&record.contract_address),
            self.network.address_url(&record.deployer),
        ) {
            writeln!(f, "\nExplorer:")?;
            writeln!(f, "  Contract: {contract}")?;
            writeln!(f, "  Deployer: {deployer}")?;
        }

        writeln!(f, "\nAvailable Functions:")?;
        writeln!(f, "  - authorizeVoter(address): Grant voting permission")?;
        writeln!(f, "  - castVote(eventId, candidateId): Submit encrypted vote")?;
        writeln!(f, "  - getEventInfo(eventId): Get event details")?;
        writeln!(f, "  - getCandidateInfo(candidateId): Get candidate information")?;
        writeln!(f, "\nNext Steps:")?;
        writeln!(f, "  1. Run `verify` to verify on the explorer (if not already done)")?;
        writeln!(f, "  2. Run `interact` to inspect the contract")
    }
}
