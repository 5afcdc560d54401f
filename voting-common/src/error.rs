use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing a run, before anything is sent on-chain.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The network name is not part of the registry.
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),

    /// No signing identity is available on the selected network.
    #[error("no signer available on network `{0}`")]
    NoSigner(String),

    /// A configured signing key could not be parsed.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("{needed} signers required, only {available} available")]
    NotEnoughSigners { needed: usize, available: usize },

    /// The compiled contract could not be loaded.
    #[error("contract artifact error: {0}")]
    Artifact(String),

    /// The environment holds an invalid setting.
    #[error("invalid environment: {0}")]
    Environment(#[from] envconfig::Error),

    /// A non-recoverable error
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl SetupError {
    pub fn artifact<S: AsRef<str>>(msg: S) -> Self {
        SetupError::Artifact(msg.as_ref().to_string())
    }

    pub fn fatal<S: AsRef<str>>(msg: S) -> Self {
        SetupError::Fatal(msg.as_ref().to_string())
    }
}

/// Errors on the persisted deployment record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// No record at the expected path; nothing was deployed yet.
    #[error("deployment record `{}` not found, deploy the contract first", .0.display())]
    Missing(PathBuf),

    #[error("I/O error while {msg}: {err}")]
    Io { msg: String, err: std::io::Error },

    /// The record exists but does not hold a valid deployment.
    #[error("malformed deployment record: {0}")]
    Format(#[from] serde_json::Error),
}

impl RecordError {
    pub fn io<S: AsRef<str>>(msg: S, err: std::io::Error) -> Self {
        RecordError::Io {
            msg: msg.as_ref().to_string(),
            err,
        }
    }
}
