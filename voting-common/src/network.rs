//! Registry of the networks the tools can operate on.

use crate::{error::SetupError, settings::Settings};
use alloy::primitives::Address;

/// Chain id of the development chains (Hardhat, Anvil).
pub const DEV_CHAIN_ID: u64 = 31337;
pub const FHENIX_LOCAL_CHAIN_ID: u64 = 412346;
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

const DEFAULT_SEPOLIA_RPC: &str = "https://ethereum-sepolia-rpc.publicnode.com";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkKind {
    /// A development chain spawned for the duration of a single run.
    Ephemeral,
    /// A long-running node on the local machine.
    Local,
    /// A public network, where deployments are confirmed and verified.
    Public,
}

/// Endpoints of an Etherscan-compatible block explorer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explorer {
    pub api_url: String,
    pub browser_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    /// `None` for ephemeral networks, whose endpoint is only known once
    /// the chain is spawned.
    pub rpc_url: Option<String>,
    pub kind: NetworkKind,
    pub explorer: Option<Explorer>,
}

impl NetworkConfig {
    /// Look up a network by name.
    pub fn resolve(name: &str, settings: &Settings) -> Result<Self, SetupError> {
        let config = match name {
            "hardhat" => Self {
                name: name.to_string(),
                chain_id: DEV_CHAIN_ID,
                rpc_url: None,
                kind: NetworkKind::Ephemeral,
                explorer: None,
            },
            "localhost" => Self::local(name, DEV_CHAIN_ID, "http://127.0.0.1:8545"),
            "localfhenix" => Self::local(name, FHENIX_LOCAL_CHAIN_ID, "http://127.0.0.1:42069"),
            "sepolia" => Self {
                name: name.to_string(),
                chain_id: SEPOLIA_CHAIN_ID,
                rpc_url: Some(
                    settings
                        .sepolia_rpc_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SEPOLIA_RPC.to_string()),
                ),
                kind: NetworkKind::Public,
                explorer: Some(Explorer {
                    api_url: "https://api.etherscan.io/v2/api".to_string(),
                    browser_url: "https://sepolia.etherscan.io".to_string(),
                }),
            },
            _ => return Err(SetupError::UnknownNetwork(name.to_string())),
        };

        Ok(config)
    }

    fn local(name: &str, chain_id: u64, rpc_url: &str) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            rpc_url: Some(rpc_url.to_string()),
            kind: NetworkKind::Local,
            explorer: None,
        }
    }

    /// Whether the network is a local or test chain, on which deployments
    /// are neither confirmed nor verified.
    pub fn is_local(&self) -> bool {
        self.kind != NetworkKind::Public
    }

    /// Explorer page of an address, if the network has a browsable explorer.
    pub fn address_url(&self, address: &Address) -> Option<String> {
        self.explorer
            .as_ref()
            .map(|e| format!("{}/address/{}", e.browser_url, address.to_checksum(None)))
    }
}
