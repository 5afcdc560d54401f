//! Read-only inspection of a deployed voting contract.

use crate::{
    chain::{
        CandidateId, CandidateInfo, ChainClient, EventId, EventInfo, VoterStatus, VotingContract,
    },
    error::{ChainError, OpsError},
};
use alloy::primitives::{utils::format_ether, Address, U256};
use chrono::{DateTime, Local};
use itertools::Itertools;
use log::{debug, info, warn};
use std::{
    fmt::{self, Display, Formatter},
    future::Future,
};
use tabled::{builder::Builder, settings::Style};
use voting_common::{DeploymentRecord, DeploymentStore, SetupError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractOverview {
    pub admin: Address,
    pub current_event_id: u64,
    pub next_candidate_id: u64,
    pub signer: Address,
    pub signer_authorized: bool,
}

/// State of the latest event, as seen by the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventReport {
    pub id: EventId,
    pub info: EventInfo,
    pub voting_active: bool,
    pub reveal_active: bool,
    pub signer_status: VoterStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectionReport {
    pub overview: ContractOverview,
    /// `None` until an event has been created.
    pub event: Option<EventReport>,
    pub candidates: Vec<(CandidateId, CandidateInfo)>,
}

/// Run the full query battery against `contract` on behalf of `signer`.
/// The first failing query aborts the inspection.
pub async fn inspect<V: VotingContract>(
    contract: &V,
    signer: Address,
) -> Result<InspectionReport, ChainError> {
    let admin = contract.admin().await?;
    let current_event_id = contract.current_event_id().await?;
    let next_candidate_id = contract.next_candidate_id().await?;
    let signer_authorized = contract.is_authorized(signer).await?;
    debug!("event counter at {current_event_id}, candidate counter at {next_candidate_id}");

    let event = if current_event_id > 0 {
        let id = EventId(current_event_id);
        Some(EventReport {
            id,
            info: contract.event_info(id).await?,
            voting_active: contract.is_voting_active(id).await?,
            reveal_active: contract.is_reveal_period_active(id).await?,
            signer_status: contract.voter_status(id, signer).await?,
        })
    } else {
        None
    };

    let mut candidates = vec![];
    for id in (1..next_candidate_id).map(CandidateId) {
        candidates.push((id, contract.candidate_info(id).await?));
    }

    Ok(InspectionReport {
        overview: ContractOverview {
            admin,
            current_event_id,
            next_candidate_id,
            signer,
            signer_authorized,
        },
        event,
        candidates,
    })
}

/// Render unix seconds in the local time zone.
pub fn local_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub(crate) fn candidate_table(candidates: &[(CandidateId, CandidateInfo)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["id", "name", "category", "active"]);
    for (id, info) in candidates {
        builder.push_record(vec![
            id.to_string(),
            info.name.clone(),
            info.category.clone(),
            info.is_active.to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

impl Display for InspectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let o = &self.overview;
        writeln!(f, "=== Contract Information ===")?;
        writeln!(f, "Admin: {}", o.admin)?;
        writeln!(f, "Current Event ID: {}", o.current_event_id)?;
        writeln!(f, "Next Candidate ID: {}\n", o.next_candidate_id)?;

        writeln!(f, "=== Voter Authorization ===")?;
        writeln!(f, "Is {} authorized: {}\n", o.signer, o.signer_authorized)?;

        if let Some(event) = &self.event {
            let info = &event.info;
            writeln!(f, "=== Event Information ===")?;
            writeln!(f, "Event ID: {}", event.id)?;
            writeln!(f, "Event Name: {}", info.name)?;
            writeln!(f, "Description: {}", info.description)?;
            writeln!(f, "Start Time: {}", local_time(info.start_time))?;
            writeln!(f, "End Time: {}", local_time(info.end_time))?;
            writeln!(f, "Reveal Start: {}", local_time(info.reveal_start_time))?;
            writeln!(f, "Reveal End: {}", local_time(info.reveal_end_time))?;
            writeln!(f, "Is Active: {}", info.is_active)?;
            writeln!(f, "Results Revealed: {}", info.results_revealed)?;
            writeln!(f, "Candidate IDs: [{}]", info.candidate_ids.iter().join(", "))?;
            writeln!(f, "Total Votes: {}", info.total_votes)?;
            writeln!(f, "Winner ID: {}\n", info.winner_id)?;
        }

        if !self.candidates.is_empty() {
            writeln!(f, "=== Candidate Information ===")?;
            writeln!(f, "{}\n", candidate_table(&self.candidates))?;
        }

        if let Some(event) = &self.event {
            writeln!(f, "=== Voting Status ===")?;
            writeln!(
                f,
                "Is voting active for event {}: {}",
                event.id, event.voting_active
            )?;
            writeln!(
                f,
                "Is reveal period active for event {}: {}",
                event.id, event.reveal_active
            )?;
            writeln!(f, "Has {} voted: {}", o.signer, event.signer_status.has_voted)?;
            if event.signer_status.has_voted {
                writeln!(
                    f,
                    "Vote timestamp: {}",
                    local_time(event.signer_status.vote_timestamp)
                )?;
            }
        }

        Ok(())
    }
}

/// Outcome of the interact tool.
#[derive(Debug)]
pub struct Interaction {
    pub record: DeploymentRecord,
    pub network: String,
    pub signer: Address,
    pub balance: U256,
    pub report: InspectionReport,
}

impl Display for Interaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {}", self.network)?;
        writeln!(f, "Contract Address: {}\n", self.record.contract_address)?;
        writeln!(f, "Interacting with account: {}", self.signer)?;
        writeln!(f, "Account balance: {} ETH\n", format_ether(self.balance))?;
        write!(f, "{}", self.report)?;
        writeln!(f, "\n=== Interaction Complete ===")
    }
}

/// Inspect the contract of the persisted deployment. The record is loaded
/// before `connect` is called, so nothing reaches the network when no
/// deployment exists.
pub async fn interact<C, F, Fut>(
    store: &DeploymentStore,
    connect: F,
) -> Result<Interaction, OpsError>
where
    C: ChainClient,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<C, OpsError>>,
{
    let record = store.load()?;
    info!("Starting contract interaction...");

    let client = connect().await?;
    let network = client.network().name.clone();
    if !record.matches_network(client.network()) {
        warn!(
            "the deployment record targets `{}` (chain {}), inspecting it on `{network}`",
            record.network, record.chain_id
        );
    }
    let signer = *client
        .signers()
        .first()
        .ok_or_else(|| SetupError::NoSigner(network.clone()))?;
    let balance = client.balance(signer).await?;

    let contract = client.attach(record.contract_address);
    let report = inspect(&contract, signer).await?;

    Ok(Interaction {
        record,
        network,
        signer,
        balance,
        report,
    })
}
