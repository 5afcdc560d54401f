//! Initial data written to a freshly deployed contract.

use crate::{
    chain::{CandidateId, EventId, VotingContract},
    error::ChainError,
};
use colored::Colorize;
use log::info;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// `(name, category)` of the seed candidates, in creation order.
pub const SEED_CANDIDATES: [(&str, &str); 4] = [
    ("Outstanding Athlete", "Best Performance"),
    ("Rising Star", "Newcomer Award"),
    ("Team Player", "Team Spirit"),
    ("Coach Excellence", "Leadership Award"),
];
pub const SEED_EVENT_NAME: &str = "Annual Awards 2024";
pub const SEED_EVENT_DESCRIPTION: &str =
    "Vote for the best performers in various categories this year";

/// A step of the seeding sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedStep {
    /// Adding the candidate at this index of [`SEED_CANDIDATES`].
    AddCandidate(usize),
    CreateEvent,
}

impl SeedStep {
    /// Position of the step in the sequence.
    pub fn index(&self) -> usize {
        match self {
            SeedStep::AddCandidate(i) => *i,
            SeedStep::CreateEvent => SEED_CANDIDATES.len(),
        }
    }
}

impl Display for SeedStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SeedStep::AddCandidate(i) => match SEED_CANDIDATES.get(*i) {
                Some((name, _)) => write!(f, "adding candidate `{name}`"),
                None => write!(f, "adding candidate #{i}"),
            },
            SeedStep::CreateEvent => write!(f, "creating voting event `{SEED_EVENT_NAME}`"),
        }
    }
}

#[derive(Error, Debug)]
#[error("initialization failed while {step}: {source}")]
pub struct SeedError {
    pub step: SeedStep,
    pub source: ChainError,
}

/// Identifiers allocated while seeding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededState {
    pub candidates: Vec<CandidateId>,
    pub event: EventId,
}

/// Add the seed candidates, then create the seed event over the candidate
/// identifiers the contract returned. Each transaction is confirmed before
/// the next is submitted; the first failure stops the sequence.
pub async fn seed_contract<V: VotingContract>(contract: &V) -> Result<SeededState, SeedError> {
    info!("Adding candidates...");
    let mut candidates = Vec::with_capacity(SEED_CANDIDATES.len());
    for (i, (name, category)) in SEED_CANDIDATES.iter().enumerate() {
        let id = contract
            .add_candidate(name, category)
            .await
            .map_err(|source| SeedError {
                step: SeedStep::AddCandidate(i),
                source,
            })?;
        info!("{} Added candidate {id}: {name}", "✓".green());
        candidates.push(id);
    }

    info!("Creating voting event...");
    let event = contract
        .create_voting_event(SEED_EVENT_NAME, SEED_EVENT_DESCRIPTION, &candidates)
        .await
        .map_err(|source| SeedError {
            step: SeedStep::CreateEvent,
            source,
        })?;
    info!("{} Created voting event {event}: {SEED_EVENT_NAME}", "✓".green());

    Ok(SeededState { candidates, event })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(
            SeedStep::AddCandidate(1).to_string(),
            "adding candidate `Rising Star`"
        );
        assert_eq!(
            SeedStep::CreateEvent.to_string(),
            "creating voting event `Annual Awards 2024`"
        );
        // Steps past the seed list still render.
        assert_eq!(SeedStep::AddCandidate(9).to_string(), "adding candidate #9");
        assert_eq!(SeedStep::AddCandidate(9).index(), 9);
    }
}
