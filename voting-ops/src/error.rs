use alloy::primitives::TxHash;
use std::{fmt::Display, path::PathBuf};
use thiserror::Error;
use voting_common::{RecordError, SetupError};

use crate::seed::SeedError;

/// Failures of the remote chain, as reported by the chain client.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The RPC endpoint failed or could not be reached.
    #[error("RPC error while {msg}: {err}")]
    Rpc { msg: String, err: String },

    /// A contract call was rejected before or during submission.
    #[error("contract call failed while {msg}: {err}")]
    Call { msg: String, err: String },

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted while {msg}")]
    Reverted { msg: String, tx_hash: TxHash },

    #[error("receipt of {0} carries no contract address")]
    MissingContractAddress(TxHash),
}

impl ChainError {
    pub fn rpc<S: AsRef<str>, E: Display>(msg: S, err: E) -> Self {
        ChainError::Rpc {
            msg: msg.as_ref().to_string(),
            err: err.to_string(),
        }
    }

    pub fn call<S: AsRef<str>, E: Display>(msg: S, err: E) -> Self {
        ChainError::Call {
            msg: msg.as_ref().to_string(),
            err: err.to_string(),
        }
    }
}

/// Failures of explorer verification. An already verified contract is not
/// an error, see [`crate::explorer::VerifyOutcome::AlreadyVerified`].
#[derive(Error, Debug)]
pub enum VerificationError {
    /// No explorer endpoint or API key for this network.
    #[error("explorer verification is not configured for network `{0}`")]
    NotConfigured(String),

    #[error("no build info compiling `{source_path}` under {}", .dir.display())]
    MissingBuildInfo { source_path: String, dir: PathBuf },

    #[error("explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The explorer refused the submission or failed to verify it.
    #[error("explorer rejected verification: {0}")]
    Rejected(String),

    #[error("verification still pending after {0} status checks")]
    Timeout(usize),

    #[error("I/O error while {msg}: {err}")]
    Io { msg: String, err: std::io::Error },

    #[error("malformed explorer or build info data: {0}")]
    Format(#[from] serde_json::Error),
}

impl VerificationError {
    pub fn io<S: AsRef<str>>(msg: S, err: std::io::Error) -> Self {
        VerificationError::Io {
            msg: msg.as_ref().to_string(),
            err,
        }
    }
}

/// Error kinds surfaced by the deploy, interact, verify and simulate flows.
#[derive(Error, Debug)]
pub enum OpsError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Initialization(#[from] SeedError),
}
