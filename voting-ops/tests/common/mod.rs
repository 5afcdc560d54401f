//! In-memory doubles of the chain, the voting contract and the explorer.
#![allow(dead_code)]

use alloy::primitives::{address, Address, TxHash, U256};
use envconfig::Envconfig;
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
};
use voting_common::{NetworkConfig, Settings};
use voting_ops::{
    chain::{
        CandidateId, CandidateInfo, ChainClient, ContractArtifact, Deployed, EventId, EventInfo,
        VoterStatus, VotingContract,
    },
    explorer::{ExplorerVerifier, VerificationRequest, VerifyOutcome},
    ChainError, VerificationError,
};

pub const CONTRACT_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const ADMIN: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub fn settings() -> Settings {
    Settings::init_from_hashmap(&HashMap::new()).unwrap()
}

pub fn network(name: &str) -> NetworkConfig {
    NetworkConfig::resolve(name, &settings()).unwrap()
}

pub fn artifact() -> ContractArtifact {
    ContractArtifact::from_json(
        "AnonymousSportsVoting",
        r#"{ "sourceName": "contracts/AnonymousSportsVoting.sol", "bytecode": "0x6080" }"#,
    )
    .unwrap()
}

/// `count` distinct signer addresses, the first one being [`ADMIN`].
pub fn signers(count: usize) -> Vec<Address> {
    (0..count)
        .map(|i| {
            if i == 0 {
                ADMIN
            } else {
                Address::with_last_byte(i as u8)
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct MockEvent {
    pub name: String,
    pub description: String,
    pub candidates: Vec<CandidateId>,
    pub votes: Vec<(Address, CandidateId)>,
}

/// Contract storage plus a log of every method called on it.
#[derive(Debug)]
pub struct MockState {
    pub calls: RefCell<Vec<String>>,
    /// Make the write with this index (0-based, in call order) fail.
    pub fail_write_at: Option<usize>,
    /// Make every read of this method fail.
    pub fail_read: Option<&'static str>,
    writes: Cell<usize>,
    pub next_candidate_id: Cell<u64>,
    pub candidates: RefCell<HashMap<u64, CandidateInfo>>,
    pub events: RefCell<Vec<MockEvent>>,
    pub authorized: RefCell<HashSet<Address>>,
}

impl MockState {
    /// Fresh contract storage whose candidate counter starts at
    /// `first_candidate_id`.
    pub fn new(first_candidate_id: u64) -> Self {
        Self {
            calls: RefCell::new(vec![]),
            fail_write_at: None,
            fail_read: None,
            writes: Cell::new(0),
            next_candidate_id: Cell::new(first_candidate_id),
            candidates: RefCell::new(HashMap::new()),
            events: RefCell::new(vec![]),
            authorized: RefCell::new(HashSet::new()),
        }
    }

    pub fn failing_write(mut self, index: usize) -> Self {
        self.fail_write_at = Some(index);
        self
    }

    pub fn failing_read(mut self, method: &'static str) -> Self {
        self.fail_read = Some(method);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split('(').next() == Some(method))
            .count()
    }

    fn write(&self, call: String) -> Result<(), ChainError> {
        self.calls.borrow_mut().push(call);
        let index = self.writes.get();
        self.writes.set(index + 1);
        if self.fail_write_at == Some(index) {
            Err(ChainError::Reverted {
                msg: "injected failure".to_string(),
                tx_hash: TxHash::ZERO,
            })
        } else {
            Ok(())
        }
    }

    fn read(&self, method: &'static str) -> Result<(), ChainError> {
        self.calls.borrow_mut().push(method.to_string());
        if self.fail_read == Some(method) {
            Err(ChainError::call(method, "injected failure"))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone)]
pub struct MockContract {
    pub address: Address,
    pub state: Rc<MockState>,
}

impl VotingContract for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn add_candidate(&self, name: &str, category: &str) -> Result<CandidateId, ChainError> {
        self.state.write(format!("add_candidate({name})"))?;
        let id = self.state.next_candidate_id.get();
        self.state.next_candidate_id.set(id + 1);
        self.state.candidates.borrow_mut().insert(
            id,
            CandidateInfo {
                name: name.to_string(),
                category: category.to_string(),
                is_active: true,
            },
        );
        Ok(CandidateId(id))
    }

    async fn create_voting_event(
        &self,
        name: &str,
        description: &str,
        candidates: &[CandidateId],
    ) -> Result<EventId, ChainError> {
        self.state.write(format!("create_voting_event({name})"))?;
        let mut events = self.state.events.borrow_mut();
        events.push(MockEvent {
            name: name.to_string(),
            description: description.to_string(),
            candidates: candidates.to_vec(),
            votes: vec![],
        });
        Ok(EventId(events.len() as u64))
    }

    async fn authorize_voter(&self, voter: Address) -> Result<(), ChainError> {
        self.state.write(format!("authorize_voter({voter})"))?;
        self.state.authorized.borrow_mut().insert(voter);
        Ok(())
    }

    async fn cast_vote(
        &self,
        voter: Address,
        event: EventId,
        candidate: CandidateId,
    ) -> Result<(), ChainError> {
        self.state
            .write(format!("cast_vote({voter}, {event}, {candidate})"))?;
        if !self.state.authorized.borrow().contains(&voter) {
            return Err(ChainError::call("casting a vote", "voter not authorized"));
        }
        let mut events = self.state.events.borrow_mut();
        let event = events
            .get_mut(event.0 as usize - 1)
            .ok_or_else(|| ChainError::call("casting a vote", "unknown event"))?;
        event.votes.push((voter, candidate));
        Ok(())
    }

    async fn admin(&self) -> Result<Address, ChainError> {
        self.state.read("admin")?;
        Ok(ADMIN)
    }

    async fn current_event_id(&self) -> Result<u64, ChainError> {
        self.state.read("current_event_id")?;
        Ok(self.state.events.borrow().len() as u64)
    }

    async fn next_candidate_id(&self) -> Result<u64, ChainError> {
        self.state.read("next_candidate_id")?;
        Ok(self.state.next_candidate_id.get())
    }

    async fn is_authorized(&self, voter: Address) -> Result<bool, ChainError> {
        self.state.read("is_authorized")?;
        Ok(self.state.authorized.borrow().contains(&voter))
    }

    async fn event_info(&self, event: EventId) -> Result<EventInfo, ChainError> {
        self.state.read("event_info")?;
        let events = self.state.events.borrow();
        let e = events
            .get(event.0 as usize - 1)
            .ok_or_else(|| ChainError::call("reading event info", "unknown event"))?;
        Ok(EventInfo {
            name: e.name.clone(),
            description: e.description.clone(),
            start_time: 1_700_000_000,
            end_time: 1_700_086_400,
            reveal_start_time: 1_700_086_400,
            reveal_end_time: 1_700_172_800,
            is_active: true,
            results_revealed: false,
            candidate_ids: e.candidates.clone(),
            total_votes: e.votes.len() as u64,
            winner_id: 0,
        })
    }

    async fn candidate_info(&self, candidate: CandidateId) -> Result<CandidateInfo, ChainError> {
        self.state.read("candidate_info")?;
        self.state
            .candidates
            .borrow()
            .get(&candidate.0)
            .cloned()
            .ok_or_else(|| ChainError::call("reading candidate info", "unknown candidate"))
    }

    async fn is_voting_active(&self, _event: EventId) -> Result<bool, ChainError> {
        self.state.read("is_voting_active")?;
        Ok(true)
    }

    async fn is_reveal_period_active(&self, _event: EventId) -> Result<bool, ChainError> {
        self.state.read("is_reveal_period_active")?;
        Ok(false)
    }

    async fn voter_status(
        &self,
        event: EventId,
        voter: Address,
    ) -> Result<VoterStatus, ChainError> {
        self.state.read("voter_status")?;
        let events = self.state.events.borrow();
        let has_voted = events
            .get(event.0 as usize - 1)
            .is_some_and(|e| e.votes.iter().any(|(v, _)| *v == voter));
        Ok(VoterStatus {
            has_voted,
            vote_timestamp: if has_voted { 1_700_000_100 } else { 0 },
        })
    }
}

pub struct MockChain {
    pub network: NetworkConfig,
    pub signers: Vec<Address>,
    pub state: Rc<MockState>,
    pub fail_deploy: bool,
    pub balance: U256,
}

impl MockChain {
    pub fn new(network: &str, signer_count: usize, state: MockState) -> Self {
        Self {
            network: self::network(network),
            signers: signers(signer_count),
            state: Rc::new(state),
            fail_deploy: false,
            balance: U256::from(10).pow(U256::from(18)),
        }
    }
}

impl ChainClient for MockChain {
    type Contract = MockContract;

    fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn signers(&self) -> &[Address] {
        &self.signers
    }

    async fn balance(&self, _account: Address) -> Result<U256, ChainError> {
        Ok(self.balance)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(42)
    }

    async fn deploy(
        &self,
        _artifact: &ContractArtifact,
    ) -> Result<Deployed<Self::Contract>, ChainError> {
        self.state.calls.borrow_mut().push("deploy".to_string());
        if self.fail_deploy {
            return Err(ChainError::rpc(
                "submitting the contract creation",
                "insufficient funds",
            ));
        }
        Ok(Deployed {
            contract: self.attach(CONTRACT_ADDRESS),
            tx_hash: TxHash::repeat_byte(0x11),
        })
    }

    async fn wait_for_confirmations(
        &self,
        _tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<(), ChainError> {
        self.state
            .calls
            .borrow_mut()
            .push(format!("wait_for_confirmations({confirmations})"));
        Ok(())
    }

    fn attach(&self, address: Address) -> Self::Contract {
        MockContract {
            address,
            state: self.state.clone(),
        }
    }
}

/// Explorer double answering every request the same way.
pub struct MockVerifier {
    pub answer: Result<VerifyOutcome, String>,
    pub requests: RefCell<Vec<VerificationRequest>>,
}

impl MockVerifier {
    pub fn new(answer: Result<VerifyOutcome, String>) -> Self {
        Self {
            answer,
            requests: RefCell::new(vec![]),
        }
    }
}

impl ExplorerVerifier for MockVerifier {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyOutcome, VerificationError> {
        self.requests.borrow_mut().push(request.clone());
        self.answer.clone().map_err(VerificationError::Rejected)
    }
}
