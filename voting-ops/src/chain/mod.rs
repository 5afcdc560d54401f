//! Chain client abstraction: signer identities, balances, contract
//! creation and the typed method surface of the voting contract.

use crate::error::ChainError;
use alloy::primitives::{Address, TxHash, U256};
use std::fmt::{self, Display, Formatter};
use voting_common::NetworkConfig;

mod artifact;
mod bindings;
mod client;

pub use artifact::{BuildInfo, ContractArtifact};
pub use client::{AlloyClient, AlloyVotingContract};

/// Identifier of a candidate, allocated by the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId(pub u64);

/// Identifier of a voting event, allocated by the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateInfo {
    pub name: String,
    pub category: String,
    pub is_active: bool,
}

/// Timestamps are unix seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    pub name: String,
    pub description: String,
    pub start_time: u64,
    pub end_time: u64,
    pub reveal_start_time: u64,
    pub reveal_end_time: u64,
    pub is_active: bool,
    pub results_revealed: bool,
    pub candidate_ids: Vec<CandidateId>,
    pub total_votes: u64,
    pub winner_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoterStatus {
    pub has_voted: bool,
    /// Unix seconds, zero when no vote was cast.
    pub vote_timestamp: u64,
}

/// A freshly created contract along with its creation transaction.
pub struct Deployed<C> {
    pub contract: C,
    pub tx_hash: TxHash,
}

/// Access to a chain: identities, balances and contract creation.
///
/// Every method is a single attempt; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    type Contract: VotingContract;

    fn network(&self) -> &NetworkConfig;

    /// Signing identities, the first one being the default sender.
    fn signers(&self) -> &[Address];

    async fn balance(&self, account: Address) -> Result<U256, ChainError>;

    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Submit the contract creation and wait until the contract is present
    /// on-chain.
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
    ) -> Result<Deployed<Self::Contract>, ChainError>;

    /// Wait until `tx_hash` is buried under `confirmations` blocks.
    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<(), ChainError>;

    /// Bind to an already deployed contract.
    fn attach(&self, address: Address) -> Self::Contract;
}

/// Typed method surface of the voting contract. Write methods return once
/// the transaction is confirmed; creation methods return the identifier the
/// contract allocated.
#[allow(async_fn_in_trait)]
pub trait VotingContract {
    fn address(&self) -> Address;

    async fn add_candidate(&self, name: &str, category: &str) -> Result<CandidateId, ChainError>;

    async fn create_voting_event(
        &self,
        name: &str,
        description: &str,
        candidates: &[CandidateId],
    ) -> Result<EventId, ChainError>;

    async fn authorize_voter(&self, voter: Address) -> Result<(), ChainError>;

    /// Cast a vote from `voter`'s own account.
    async fn cast_vote(
        &self,
        voter: Address,
        event: EventId,
        candidate: CandidateId,
    ) -> Result<(), ChainError>;

    async fn admin(&self) -> Result<Address, ChainError>;

    /// Identifier of the latest event, zero when none exists.
    async fn current_event_id(&self) -> Result<u64, ChainError>;

    /// Identifier the next candidate will receive.
    async fn next_candidate_id(&self) -> Result<u64, ChainError>;

    async fn is_authorized(&self, voter: Address) -> Result<bool, ChainError>;

    async fn event_info(&self, event: EventId) -> Result<EventInfo, ChainError>;

    async fn candidate_info(&self, candidate: CandidateId) -> Result<CandidateInfo, ChainError>;

    async fn is_voting_active(&self, event: EventId) -> Result<bool, ChainError>;

    async fn is_reveal_period_active(&self, event: EventId) -> Result<bool, ChainError>;

    async fn voter_status(&self, event: EventId, voter: Address)
        -> Result<VoterStatus, ChainError>;
}
