//! Shared building blocks of the voting contract tools: the persisted
//! deployment record, the network registry, environment settings and
//! logging setup.

pub mod error;
pub mod log;
pub mod network;
pub mod record;
pub mod serialization;
pub mod settings;

pub use error::{RecordError, SetupError};
pub use network::{Explorer, NetworkConfig, NetworkKind};
pub use record::{DeploymentRecord, DeploymentStore, DEFAULT_DEPLOYMENT_FILE};
pub use settings::Settings;

/// Name of the contract driven by these tools.
pub const CONTRACT_NAME: &str = "AnonymousSportsVoting";
