//! End-to-end voting scenario: deploy, seed, authorize three voters, have
//! them vote and read everything back.

use crate::{
    chain::{CandidateId, CandidateInfo, ChainClient, ContractArtifact, EventInfo, VotingContract},
    error::OpsError,
    inspect::candidate_table,
    seed::{seed_contract, SeededState},
};
use alloy::primitives::Address;
use colored::Colorize;
use log::info;
use std::fmt::{self, Display, Formatter};
use voting_common::SetupError;

const VOTER_COUNT: usize = 3;

/// Index into the seeded candidates each voter picks, in voter order.
pub const BALLOTS: [usize; VOTER_COUNT] = [0, 1, 0];

/// What a voter did and what the contract recorded for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterOutcome {
    pub voter: Address,
    pub candidate: CandidateId,
    pub has_voted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationSummary {
    pub deployer: Address,
    pub contract: Address,
    pub seeded: SeededState,
    pub voters: Vec<VoterOutcome>,
    pub event: EventInfo,
    pub candidates: Vec<(CandidateId, CandidateInfo)>,
}

/// Run the scenario on `client`, which must hold a deployer and three
/// voters. Any failure aborts the run.
pub async fn simulate<C: ChainClient>(
    client: &C,
    artifact: &ContractArtifact,
) -> Result<SimulationSummary, OpsError> {
    let signers = client.signers();
    if signers.len() < VOTER_COUNT + 1 {
        return Err(SetupError::NotEnoughSigners {
            needed: VOTER_COUNT + 1,
            available: signers.len(),
        }
        .into());
    }
    let deployer = signers[0];
    let voters = &signers[1..=VOTER_COUNT];
    info!("=== Starting Contract Simulation ===");
    info!("Deployer: {deployer}");
    for (i, voter) in voters.iter().enumerate() {
        info!("Voter {}: {voter}", i + 1);
    }

    info!("\n=== Deploying Contract ===");
    let contract = client.deploy(artifact).await?.contract;
    info!("Contract deployed to: {}", contract.address());

    info!("\n=== Seeding ===");
    let seeded = seed_contract(&contract).await?;

    info!("\n=== Authorizing Voters ===");
    for (i, voter) in voters.iter().enumerate() {
        contract.authorize_voter(*voter).await?;
        info!("{} Authorized Voter {}", "✓".green(), i + 1);
    }

    info!("\n=== Casting Votes ===");
    for (i, (voter, ballot)) in voters.iter().zip(BALLOTS).enumerate() {
        let candidate = seeded.candidates[ballot];
        contract.cast_vote(*voter, seeded.event, candidate).await?;
        info!(
            "{} Voter {} voted for candidate {candidate}",
            "✓".green(),
            i + 1
        );
    }

    info!("\n=== Reading Back ===");
    let mut outcomes = Vec::with_capacity(VOTER_COUNT);
    for (voter, ballot) in voters.iter().zip(BALLOTS) {
        let status = contract.voter_status(seeded.event, *voter).await?;
        outcomes.push(VoterOutcome {
            voter: *voter,
            candidate: seeded.candidates[ballot],
            has_voted: status.has_voted,
        });
    }
    let event = contract.event_info(seeded.event).await?;
    let mut candidates = Vec::with_capacity(seeded.candidates.len());
    for id in &seeded.candidates {
        candidates.push((*id, contract.candidate_info(*id).await?));
    }

    Ok(SimulationSummary {
        deployer,
        contract: contract.address(),
        seeded,
        voters: outcomes,
        event,
        candidates,
    })
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Voting Status ===")?;
        for (i, outcome) in self.voters.iter().enumerate() {
            writeln!(f, "Voter {} has voted: {}", i + 1, outcome.has_voted)?;
        }

        writeln!(f, "\n=== Event Information ===")?;
        writeln!(f, "Event Name: {}", self.event.name)?;
        writeln!(f, "Description: {}", self.event.description)?;
        writeln!(f, "Is Active: {}", self.event.is_active)?;
        writeln!(f, "Results Revealed: {}", self.event.results_revealed)?;
        writeln!(f, "Total Votes: {}", self.event.total_votes)?;
        writeln!(f, "Winner ID: {}", self.event.winner_id)?;

        writeln!(f, "\n=== All Candidates ===")?;
        writeln!(f, "{}", candidate_table(&self.candidates))?;

        writeln!(f, "\n=== Simulation Complete ===")?;
        writeln!(f, "Summary:")?;
        writeln!(f, "  - Contract deployed at {}", self.contract)?;
        writeln!(f, "  - {} candidates added", self.seeded.candidates.len())?;
        writeln!(f, "  - 1 voting event created (id {})", self.seeded.event)?;
        writeln!(f, "  - {} voters authorized", self.voters.len())?;
        writeln!(
            f,
            "  - {} votes cast (encrypted)",
            self.voters.iter().filter(|v| v.has_voted).count()
        )
    }
}
