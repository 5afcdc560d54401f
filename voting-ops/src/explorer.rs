//! Publishing contract sources to an Etherscan-compatible block explorer.

use crate::{
    chain::BuildInfo,
    error::{OpsError, VerificationError},
};
use alloy::primitives::{Address, Bytes};
use log::{debug, info, warn};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use voting_common::{DeploymentRecord, DeploymentStore, NetworkConfig, Settings};

/// Number of status checks before giving up on a queued verification.
const MAX_STATUS_CHECKS: usize = 10;
const STATUS_CHECK_INTERVAL: Duration = Duration::from_secs(5);
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// What to verify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub address: Address,
    /// `contracts/Name.sol:Name`
    pub contract: String,
    /// ABI-encoded constructor arguments.
    pub constructor_args: Bytes,
}

impl VerificationRequest {
    /// Request for the contract described by a deployment record. Only
    /// contracts deployed without constructor arguments are supported.
    pub fn for_record(record: &DeploymentRecord) -> Self {
        Self {
            address: record.contract_address,
            contract: format!("contracts/{0}.sol:{0}", record.contract_name),
            constructor_args: Bytes::new(),
        }
    }

    fn source_path(&self) -> &str {
        self.contract
            .rsplit_once(':')
            .map(|(path, _)| path)
            .unwrap_or(&self.contract)
    }
}

/// Successful verification outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    /// The explorer already holds the sources of this contract.
    AlreadyVerified,
}

/// A service publishing contract sources.
#[allow(async_fn_in_trait)]
pub trait ExplorerVerifier {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyOutcome, VerificationError>;
}

impl<T: ExplorerVerifier> ExplorerVerifier for &T {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyOutcome, VerificationError> {
        (**self).verify(request).await
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EtherscanResponse {
    status: String,
    #[allow(dead_code)]
    message: String,
    result: String,
}

/// Result of a source submission.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Submission {
    /// Queued under this GUID.
    Queued(String),
    Done(VerifyOutcome),
}

/// Result of a status check.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Pending,
    Done(VerifyOutcome),
}

fn is_already_verified(text: &str) -> bool {
    text.to_ascii_lowercase().contains("already verified")
}

/// Classify the explorer's answer to a source submission.
pub(crate) fn classify_submission(
    response: EtherscanResponse,
) -> Result<Submission, VerificationError> {
    if response.status == "1" {
        Ok(Submission::Queued(response.result))
    } else if is_already_verified(&response.result) {
        Ok(Submission::Done(VerifyOutcome::AlreadyVerified))
    } else {
        Err(VerificationError::Rejected(response.result))
    }
}

/// Classify the explorer's answer to a status check.
pub(crate) fn classify_status(response: EtherscanResponse) -> Result<Status, VerificationError> {
    if response.result.to_ascii_lowercase().contains("pending") {
        Ok(Status::Pending)
    } else if is_already_verified(&response.result) {
        Ok(Status::Done(VerifyOutcome::AlreadyVerified))
    } else if response.status == "1" {
        Ok(Status::Done(VerifyOutcome::Verified))
    } else {
        Err(VerificationError::Rejected(response.result))
    }
}

/// Verifier speaking the Etherscan v2 API.
pub struct EtherscanVerifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    chain_id: u64,
    artifacts_dir: PathBuf,
    poll_interval: Duration,
    max_status_checks: usize,
}

impl EtherscanVerifier {
    pub fn new(
        api_url: String,
        api_key: String,
        chain_id: u64,
        artifacts_dir: PathBuf,
    ) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
            chain_id,
            artifacts_dir,
            poll_interval: STATUS_CHECK_INTERVAL,
            max_status_checks: MAX_STATUS_CHECKS,
        })
    }

    /// Check a queued verification every `interval`, at most `max_checks`
    /// times.
    pub fn with_polling(mut self, interval: Duration, max_checks: usize) -> Self {
        self.poll_interval = interval;
        self.max_status_checks = max_checks;
        self
    }

    /// Build a verifier for `network`, or `None` if the network has no
    /// explorer or no API key is configured.
    pub fn from_settings(
        network: &NetworkConfig,
        settings: &Settings,
    ) -> Result<Option<Self>, VerificationError> {
        match (&network.explorer, &settings.etherscan_api_key) {
            (Some(explorer), Some(key)) => Self::new(
                explorer.api_url.clone(),
                key.clone(),
                network.chain_id,
                settings.artifacts_dir(),
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    async fn submit(&self, request: &VerificationRequest) -> Result<Submission, VerificationError> {
        let build_info = BuildInfo::find(&self.artifacts_dir, request.source_path())?;
        let source_code = serde_json::to_string(&build_info.input)?;
        let address = request.address.to_checksum(None);
        let compiler = build_info.compiler_version();
        let constructor_args = alloy::primitives::hex::encode(&request.constructor_args);
        let chain_id = self.chain_id.to_string();
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", request.contract.as_str()),
            ("compilerversion", compiler.as_str()),
            // Sic: the explorer API spells it this way.
            ("constructorArguements", constructor_args.as_str()),
        ];

        let response: EtherscanResponse = self
            .client
            .post(&self.api_url)
            .query(&[("chainid", chain_id.as_str())])
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("verification submission answered: {response:?}");
        classify_submission(response)
    }

    async fn check_status(&self, guid: &str) -> Result<Status, VerificationError> {
        let chain_id = self.chain_id.to_string();
        let response: EtherscanResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("verification status answered: {response:?}");
        classify_status(response)
    }
}

impl ExplorerVerifier for EtherscanVerifier {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyOutcome, VerificationError> {
        let guid = match self.submit(request).await? {
            Submission::Done(outcome) => return Ok(outcome),
            Submission::Queued(guid) => guid,
        };
        info!("Verification submitted, waiting for the explorer (guid {guid})");

        for _ in 0..self.max_status_checks {
            tokio::time::sleep(self.poll_interval).await;
            if let Status::Done(outcome) = self.check_status(&guid).await? {
                return Ok(outcome);
            }
        }
        Err(VerificationError::Timeout(self.max_status_checks))
    }
}

/// Verify the contract of the persisted deployment on the explorer of
/// `network`. The record is loaded before the verifier is built, so nothing
/// reaches the network when no deployment exists.
pub async fn verify_deployment<V, F>(
    store: &DeploymentStore,
    network: &NetworkConfig,
    make_verifier: F,
) -> Result<(DeploymentRecord, VerifyOutcome), OpsError>
where
    V: ExplorerVerifier,
    F: FnOnce(&DeploymentRecord) -> Result<V, OpsError>,
{
    let record = store.load()?;
    if !record.matches_network(network) {
        warn!(
            "the deployment record targets `{}` (chain {}), verifying it on `{}` (chain {})",
            record.network, record.chain_id, network.name, network.chain_id
        );
    }
    info!("Network: {}", record.network);
    info!("Contract: {}", record.contract_name);
    info!("Address: {}\n", record.contract_address);

    let verifier = make_verifier(&record)?;
    info!("Verifying contract on the explorer...");
    let outcome = verifier
        .verify(&VerificationRequest::for_record(&record))
        .await?;

    Ok((record, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use chrono::Utc;

    fn response(status: &str, result: &str) -> EtherscanResponse {
        EtherscanResponse {
            status: status.to_string(),
            message: if status == "1" { "OK" } else { "NOTOK" }.to_string(),
            result: result.to_string(),
        }
    }

    #[test]
    fn test_submission_classification() {
        assert_eq!(
            classify_submission(response("1", "ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn"))
                .unwrap(),
            Submission::Queued("ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn".to_string())
        );
        assert_eq!(
            classify_submission(response("0", "Contract source code already verified")).unwrap(),
            Submission::Done(VerifyOutcome::AlreadyVerified)
        );
        assert_eq!(
            classify_submission(response("0", "Already Verified")).unwrap(),
            Submission::Done(VerifyOutcome::AlreadyVerified)
        );
        assert!(matches!(
            classify_submission(response("0", "Invalid API Key")),
            Err(VerificationError::Rejected(msg)) if msg == "Invalid API Key"
        ));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify_status(response("0", "Pending in queue")).unwrap(),
            Status::Pending
        );
        assert_eq!(
            classify_status(response("1", "Pass - Verified")).unwrap(),
            Status::Done(VerifyOutcome::Verified)
        );
        assert_eq!(
            classify_status(response("1", "Already Verified")).unwrap(),
            Status::Done(VerifyOutcome::AlreadyVerified)
        );
        assert!(matches!(
            classify_status(response("0", "Fail - Unable to verify")),
            Err(VerificationError::Rejected(_))
        ));
    }

    #[test]
    fn test_request_for_record() {
        let record = DeploymentRecord {
            contract_name: "AnonymousSportsVoting".to_string(),
            contract_address: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            deployer: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            network: "sepolia".to_string(),
            chain_id: 11155111,
            deployment_time: Utc::now(),
            block_number: 1,
            constructor_args: vec![],
        };
        let request = VerificationRequest::for_record(&record);

        assert_eq!(
            request.contract,
            "contracts/AnonymousSportsVoting.sol:AnonymousSportsVoting"
        );
        assert_eq!(request.source_path(), "contracts/AnonymousSportsVoting.sol");
        assert!(request.constructor_args.is_empty());
    }
}
