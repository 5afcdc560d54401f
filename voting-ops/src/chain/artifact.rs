//! Compiled contract artifacts, as produced by Hardhat or Foundry.

use crate::error::VerificationError;
use alloy::primitives::Bytes;
use log::debug;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use voting_common::SetupError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat: `"bytecode": "0x..."`
    Flat(String),
    /// Foundry: `"bytecode": { "object": "0x..." }`
    Object { object: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    bytecode: RawBytecode,
    source_name: Option<String>,
}

/// Creation bytecode of a contract and the source file it was compiled from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    pub source_path: String,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Load the artifact of `name` from a Hardhat `artifacts/` or a Foundry
    /// `out/` directory.
    pub fn load<P: AsRef<Path>>(artifacts_dir: P, name: &str) -> Result<Self, SetupError> {
        let dir = artifacts_dir.as_ref();
        let file = format!("{name}.json");
        let candidates = [
            dir.join("contracts").join(format!("{name}.sol")).join(&file),
            dir.join(format!("{name}.sol")).join(&file),
        ];
        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            SetupError::artifact(format!(
                "no artifact for `{name}` under {}, compile the contracts first",
                dir.display()
            ))
        })?;
        debug!("loading artifact {}", path.display());

        let data = fs::read_to_string(path)
            .map_err(|e| SetupError::artifact(format!("reading {}: {e}", path.display())))?;
        Self::from_json(name, &data)
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, SetupError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| SetupError::artifact(format!("malformed artifact of `{name}`: {e}")))?;
        let hex = match raw.bytecode {
            RawBytecode::Flat(hex) | RawBytecode::Object { object: hex } => hex,
        };
        let bytecode = Bytes::from_str(&hex)
            .map_err(|e| SetupError::artifact(format!("invalid bytecode of `{name}`: {e}")))?;
        if bytecode.is_empty() {
            return Err(SetupError::artifact(format!(
                "`{name}` has no creation bytecode, is it abstract?"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            source_path: raw
                .source_name
                .unwrap_or_else(|| format!("contracts/{name}.sol")),
            bytecode,
        })
    }

    /// `path/to/Source.sol:Name`, the form explorers expect.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_path, self.name)
    }
}

/// Compiler input and version of a Hardhat compilation job.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    /// The standard JSON input handed to solc.
    pub input: serde_json::Value,
}

impl BuildInfo {
    /// Find the build info under `<artifacts_dir>/build-info` whose input
    /// compiled `source_path`.
    pub fn find<P: AsRef<Path>>(
        artifacts_dir: P,
        source_path: &str,
    ) -> Result<Self, VerificationError> {
        let dir: PathBuf = artifacts_dir.as_ref().join("build-info");
        let missing = || VerificationError::MissingBuildInfo {
            source_path: source_path.to_string(),
            dir: dir.clone(),
        };
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Err(missing()),
        };

        for entry in entries {
            let path = entry
                .map_err(|e| VerificationError::io("listing build info", e))?
                .path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let data = fs::read_to_string(&path)
                .map_err(|e| VerificationError::io(format!("reading {}", path.display()), e))?;
            let info: BuildInfo = serde_json::from_str(&data)?;
            if info.input["sources"].get(source_path).is_some() {
                debug!("using build info {}", path.display());
                return Ok(info);
            }
        }

        Err(missing())
    }

    /// Compiler version as explorers name it, e.g. `v0.8.24+commit.e11b9ed9`.
    pub fn compiler_version(&self) -> String {
        format!("v{}", self.solc_long_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardhat_artifact() {
        let json = r#"{
            "contractName": "AnonymousSportsVoting",
            "sourceName": "contracts/AnonymousSportsVoting.sol",
            "abi": [],
            "bytecode": "0x6080604052"
        }"#;
        let artifact = ContractArtifact::from_json("AnonymousSportsVoting", json).unwrap();

        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(
            artifact.fully_qualified_name(),
            "contracts/AnonymousSportsVoting.sol:AnonymousSportsVoting"
        );
    }

    #[test]
    fn test_foundry_artifact() {
        let json = r#"{ "abi": [], "bytecode": { "object": "0x60806040" } }"#;
        let artifact = ContractArtifact::from_json("AnonymousSportsVoting", json).unwrap();

        assert_eq!(artifact.bytecode.len(), 4);
        assert_eq!(artifact.source_path, "contracts/AnonymousSportsVoting.sol");
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let json = r#"{ "bytecode": "0x" }"#;
        assert!(matches!(
            ContractArtifact::from_json("IVoting", json),
            Err(SetupError::Artifact(_))
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let contract_dir = dir.path().join("contracts").join("Voting.sol");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(
            contract_dir.join("Voting.json"),
            r#"{ "sourceName": "contracts/Voting.sol", "bytecode": "0x00" }"#,
        )
        .unwrap();

        let artifact = ContractArtifact::load(dir.path(), "Voting").unwrap();
        assert_eq!(artifact.name, "Voting");
        assert!(ContractArtifact::load(dir.path(), "Other").is_err());
    }

    #[test]
    fn test_find_build_info() {
        let dir = tempfile::tempdir().unwrap();
        let build_info = dir.path().join("build-info");
        fs::create_dir_all(&build_info).unwrap();
        fs::write(
            build_info.join("a.json"),
            r#"{ "solcLongVersion": "0.8.20+commit.a1b79de6",
                 "input": { "language": "Solidity", "sources": { "contracts/Other.sol": {} } } }"#,
        )
        .unwrap();
        fs::write(
            build_info.join("b.json"),
            r#"{ "solcLongVersion": "0.8.24+commit.e11b9ed9",
                 "input": { "language": "Solidity", "sources": { "contracts/Voting.sol": {} } } }"#,
        )
        .unwrap();

        let info = BuildInfo::find(dir.path(), "contracts/Voting.sol").unwrap();
        assert_eq!(info.compiler_version(), "v0.8.24+commit.e11b9ed9");
        assert!(matches!(
            BuildInfo::find(dir.path(), "contracts/Missing.sol"),
            Err(VerificationError::MissingBuildInfo { .. })
        ));
    }
}
