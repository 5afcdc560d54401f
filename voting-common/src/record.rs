//! The deployment record persisted by the deploy tool and read back by the
//! interaction and verification tools.

use crate::{
    error::RecordError,
    network::NetworkConfig,
    serialization::{checksum_address, iso_millis},
};
use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Default location of the record, relative to the working directory.
pub const DEFAULT_DEPLOYMENT_FILE: &str = "deployment-info.json";

/// Metadata of a completed deployment. Written once per deployment run and
/// never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    #[serde(with = "checksum_address")]
    pub contract_address: Address,
    #[serde(with = "checksum_address")]
    pub deployer: Address,
    pub network: String,
    pub chain_id: u64,
    #[serde(with = "iso_millis")]
    pub deployment_time: DateTime<Utc>,
    pub block_number: u64,
    pub constructor_args: Vec<serde_json::Value>,
}

impl DeploymentRecord {
    /// Whether the record was written for `network`.
    pub fn matches_network(&self, network: &NetworkConfig) -> bool {
        self.network == network.name && self.chain_id == network.chain_id
    }
}

/// Durable storage of the [`DeploymentRecord`] at a fixed path.
#[derive(Clone, Debug)]
pub struct DeploymentStore {
    path: PathBuf,
}

impl DeploymentStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the record, replacing any previous one. The JSON is written to
    /// a temporary file next to the target and then renamed over it, so a
    /// reader never observes a partially written record. The record is left
    /// readable by other users.
    pub fn save(&self, record: &DeploymentRecord) -> Result<(), RecordError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| RecordError::io("creating the temporary record", e))?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.flush())
            .map_err(|e| RecordError::io("writing the temporary record", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(|e| RecordError::io("setting the record permissions", e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| RecordError::io("replacing the deployment record", e.error))?;
        debug!("deployment record written to {}", self.path.display());

        Ok(())
    }

    /// Read the record back. A missing file is reported as
    /// [`RecordError::Missing`].
    pub fn load(&self) -> Result<DeploymentRecord, RecordError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RecordError::Missing(self.path.clone()))
            }
            Err(err) => return Err(RecordError::io("reading the deployment record", err)),
        };

        Ok(serde_json::from_str(&data)?)
    }
}

impl Default for DeploymentStore {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_FILE)
    }
}
