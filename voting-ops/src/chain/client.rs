//! [`ChainClient`] and [`VotingContract`] on top of an alloy provider.

use super::{
    artifact::ContractArtifact,
    bindings::IAnonymousSportsVoting::{self, IAnonymousSportsVotingInstance},
    CandidateId, CandidateInfo, ChainClient, Deployed, EventId, EventInfo, VoterStatus,
    VotingContract,
};
use crate::error::{ChainError, OpsError};
use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    node_bindings::{Anvil, AnvilInstance},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use itertools::Itertools;
use log::{debug, info};
use std::str::FromStr;
use voting_common::{NetworkConfig, NetworkKind, SetupError, Settings};

/// Chain client backed by an HTTP provider holding every configured signer.
pub struct AlloyClient {
    network: NetworkConfig,
    provider: DynProvider,
    signers: Vec<Address>,
    /// Keeps the ephemeral dev chain alive as long as the client.
    _local_node: Option<AnvilInstance>,
}

impl AlloyClient {
    /// Connect to `network`. Ephemeral networks spawn a dev chain whose
    /// prefunded accounts become the signers; other networks use the keys
    /// from the `PRIVATE_KEY` setting. Without keys, a local node's unlocked
    /// accounts sign instead.
    pub async fn connect(network: NetworkConfig, settings: &Settings) -> Result<Self, OpsError> {
        let (rpc_url, keys, local_node) = match network.kind {
            NetworkKind::Ephemeral => {
                let anvil = Anvil::new()
                    .chain_id(network.chain_id)
                    .try_spawn()
                    .map_err(|e| SetupError::fatal(format!("spawning the dev chain: {e}")))?;
                let keys = anvil
                    .keys()
                    .iter()
                    .cloned()
                    .map(PrivateKeySigner::from)
                    .collect_vec();
                info!("Dev chain running at `{}`", anvil.endpoint());
                (anvil.endpoint_url(), keys, Some(anvil))
            }
            NetworkKind::Local | NetworkKind::Public => {
                let url = network
                    .rpc_url
                    .as_deref()
                    .ok_or_else(|| SetupError::fatal(format!("no RPC URL for `{}`", network.name)))?
                    .parse::<reqwest::Url>()
                    .map_err(|e| SetupError::fatal(format!("invalid RPC URL: {e}")))?;
                let keys = settings
                    .signing_keys()
                    .into_iter()
                    .map(|k| {
                        PrivateKeySigner::from_str(k)
                            .map_err(|e| SetupError::InvalidKey(e.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (url, keys, None)
            }
        };

        let mut signers = keys.iter().map(|k| k.address()).collect_vec();
        let mut keys = keys.into_iter();
        let provider = match keys.next() {
            Some(first) => {
                let mut wallet = EthereumWallet::from(first);
                for key in keys {
                    wallet.register_signer(key);
                }
                ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_http(rpc_url)
                    .erased()
            }
            None => ProviderBuilder::new().connect_http(rpc_url).erased(),
        };
        if signers.is_empty() && network.kind == NetworkKind::Local {
            signers = provider
                .get_accounts()
                .await
                .map_err(|e| ChainError::rpc("listing the node accounts", e))?;
            info!(
                "No PRIVATE_KEY set, using the {} unlocked accounts of `{}`",
                signers.len(),
                network.name
            );
        }
        debug!("connected to `{}` with {} signers", network.name, signers.len());

        Ok(Self {
            network,
            provider,
            signers,
            _local_node: local_node,
        })
    }
}

impl ChainClient for AlloyClient {
    type Contract = AlloyVotingContract;

    fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn signers(&self) -> &[Address] {
        &self.signers
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| ChainError::rpc("fetching the account balance", e))
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::rpc("fetching the block number", e))
    }

    async fn deploy(
        &self,
        artifact: &ContractArtifact,
    ) -> Result<Deployed<Self::Contract>, ChainError> {
        let mut tx = TransactionRequest::default().with_deploy_code(artifact.bytecode.clone());
        if let Some(sender) = self.signers.first() {
            tx.set_from(*sender);
        }
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::rpc("submitting the contract creation", e))?;
        let receipt = confirm("deploying the contract", pending).await?;
        let address = receipt
            .contract_address
            .ok_or(ChainError::MissingContractAddress(receipt.transaction_hash))?;

        Ok(Deployed {
            contract: self.attach(address),
            tx_hash: receipt.transaction_hash,
        })
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<(), ChainError> {
        PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .watch()
            .await
            .map_err(|e| ChainError::rpc("waiting for confirmations", e))?;
        Ok(())
    }

    fn attach(&self, address: Address) -> Self::Contract {
        AlloyVotingContract {
            instance: IAnonymousSportsVoting::new(address, self.provider.clone()),
            sender: self.signers.first().copied().unwrap_or_default(),
        }
    }
}

/// Wait for the receipt of a submitted transaction and check it succeeded.
async fn confirm(
    msg: &str,
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TransactionReceipt, ChainError> {
    let tx_hash = *pending.tx_hash();
    debug!("{msg}: waiting for {tx_hash}");
    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| ChainError::rpc(msg, e))?;
    if !receipt.status() {
        return Err(ChainError::Reverted {
            msg: msg.to_string(),
            tx_hash,
        });
    }
    Ok(receipt)
}

fn to_u64(value: U256, what: &str) -> Result<u64, ChainError> {
    u64::try_from(value)
        .map_err(|_| ChainError::call(what, format!("{value} does not fit in 64 bits")))
}

/// The voting contract bound to an address through the client's provider.
pub struct AlloyVotingContract {
    instance: IAnonymousSportsVotingInstance<DynProvider>,
    /// Sender of the admin transactions.
    sender: Address,
}

impl VotingContract for AlloyVotingContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn add_candidate(&self, name: &str, category: &str) -> Result<CandidateId, ChainError> {
        // Candidates get the value of the counter at creation time.
        let next = self
            .instance
            .nextCandidateId()
            .call()
            .await
            .map_err(|e| ChainError::call("reading the next candidate id", e))?;
        let pending = self
            .instance
            .addCandidate(name.to_string(), category.to_string())
            .from(self.sender)
            .send()
            .await
            .map_err(|e| ChainError::call("adding a candidate", e))?;
        confirm("adding a candidate", pending).await?;

        Ok(CandidateId(to_u64(next, "reading the next candidate id")?))
    }

    async fn create_voting_event(
        &self,
        name: &str,
        description: &str,
        candidates: &[CandidateId],
    ) -> Result<EventId, ChainError> {
        let ids = candidates.iter().map(|c| U256::from(c.0)).collect_vec();
        let pending = self
            .instance
            .createVotingEvent(name.to_string(), description.to_string(), ids)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| ChainError::call("creating a voting event", e))?;
        confirm("creating a voting event", pending).await?;

        let current = self
            .instance
            .currentEventId()
            .call()
            .await
            .map_err(|e| ChainError::call("reading the current event id", e))?;
        Ok(EventId(to_u64(current, "reading the current event id")?))
    }

    async fn authorize_voter(&self, voter: Address) -> Result<(), ChainError> {
        let pending = self
            .instance
            .authorizeVoter(voter)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| ChainError::call("authorizing a voter", e))?;
        confirm("authorizing a voter", pending).await?;
        Ok(())
    }

    async fn cast_vote(
        &self,
        voter: Address,
        event: EventId,
        candidate: CandidateId,
    ) -> Result<(), ChainError> {
        let pending = self
            .instance
            .castVote(U256::from(event.0), U256::from(candidate.0))
            .from(voter)
            .send()
            .await
            .map_err(|e| ChainError::call("casting a vote", e))?;
        confirm("casting a vote", pending).await?;
        Ok(())
    }

    async fn admin(&self) -> Result<Address, ChainError> {
        self.instance
            .admin()
            .call()
            .await
            .map_err(|e| ChainError::call("reading the admin", e))
    }

    async fn current_event_id(&self) -> Result<u64, ChainError> {
        let id = self
            .instance
            .currentEventId()
            .call()
            .await
            .map_err(|e| ChainError::call("reading the current event id", e))?;
        to_u64(id, "reading the current event id")
    }

    async fn next_candidate_id(&self) -> Result<u64, ChainError> {
        let id = self
            .instance
            .nextCandidateId()
            .call()
            .await
            .map_err(|e| ChainError::call("reading the next candidate id", e))?;
        to_u64(id, "reading the next candidate id")
    }

    async fn is_authorized(&self, voter: Address) -> Result<bool, ChainError> {
        self.instance
            .authorizedVoters(voter)
            .call()
            .await
            .map_err(|e| ChainError::call("reading voter authorization", e))
    }

    async fn event_info(&self, event: EventId) -> Result<EventInfo, ChainError> {
        const WHAT: &str = "reading event info";
        let info = self
            .instance
            .getEventInfo(U256::from(event.0))
            .call()
            .await
            .map_err(|e| ChainError::call(WHAT, e))?;

        Ok(EventInfo {
            name: info.name,
            description: info.description,
            start_time: to_u64(info.startTime, WHAT)?,
            end_time: to_u64(info.endTime, WHAT)?,
            reveal_start_time: to_u64(info.revealStartTime, WHAT)?,
            reveal_end_time: to_u64(info.revealEndTime, WHAT)?,
            is_active: info.isActive,
            results_revealed: info.resultsRevealed,
            candidate_ids: info
                .candidateIds
                .into_iter()
                .map(|id| to_u64(id, WHAT).map(CandidateId))
                .collect::<Result<_, _>>()?,
            total_votes: to_u64(info.totalVotes, WHAT)?,
            winner_id: to_u64(info.winnerId, WHAT)?,
        })
    }

    async fn candidate_info(&self, candidate: CandidateId) -> Result<CandidateInfo, ChainError> {
        let info = self
            .instance
            .getCandidateInfo(U256::from(candidate.0))
            .call()
            .await
            .map_err(|e| ChainError::call("reading candidate info", e))?;

        Ok(CandidateInfo {
            name: info.name,
            category: info.category,
            is_active: info.isActive,
        })
    }

    async fn is_voting_active(&self, event: EventId) -> Result<bool, ChainError> {
        self.instance
            .isVotingActive(U256::from(event.0))
            .call()
            .await
            .map_err(|e| ChainError::call("reading the voting period", e))
    }

    async fn is_reveal_period_active(&self, event: EventId) -> Result<bool, ChainError> {
        self.instance
            .isRevealPeriodActive(U256::from(event.0))
            .call()
            .await
            .map_err(|e| ChainError::call("reading the reveal period", e))
    }

    async fn voter_status(
        &self,
        event: EventId,
        voter: Address,
    ) -> Result<VoterStatus, ChainError> {
        const WHAT: &str = "reading voter status";
        let status = self
            .instance
            .getVoterStatus(U256::from(event.0), voter)
            .call()
            .await
            .map_err(|e| ChainError::call(WHAT, e))?;

        Ok(VoterStatus {
            has_voted: status.hasVoted,
            vote_timestamp: to_u64(status.voteTimestamp, WHAT)?,
        })
    }
}
