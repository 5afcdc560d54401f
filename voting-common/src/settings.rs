use crate::record::DeploymentStore;
use envconfig::Envconfig;
use std::path::PathBuf;

/// Settings read from the process environment.
#[derive(Envconfig, Debug, Clone)]
pub struct Settings {
    /// Comma-separated hex signing keys used on non-ephemeral networks;
    /// the first one deploys.
    #[envconfig(from = "PRIVATE_KEY")]
    pub signing_keys: Option<String>,

    #[envconfig(from = "SEPOLIA_RPC_URL")]
    pub sepolia_rpc_url: Option<String>,

    /// API key of the Etherscan-compatible explorer. Verification is
    /// skipped when absent.
    #[envconfig(from = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: Option<String>,

    #[envconfig(from = "DEPLOYMENT_FILE", default = "deployment-info.json")]
    pub deployment_file: String,

    /// Root of the compiler output (Hardhat `artifacts/` or Foundry `out/`).
    #[envconfig(from = "ARTIFACTS_DIR", default = "artifacts")]
    pub artifacts_dir: String,
}

impl Settings {
    pub fn signing_keys(&self) -> Vec<&str> {
        self.signing_keys
            .as_deref()
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn deployment_store(&self) -> DeploymentStore {
        DeploymentStore::new(&self.deployment_file)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        PathBuf::from(&self.artifacts_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::init_from_hashmap(&HashMap::new()).unwrap();

        assert!(settings.signing_keys().is_empty());
        assert!(settings.etherscan_api_key.is_none());
        assert_eq!(
            settings.deployment_store().path(),
            std::path::Path::new("deployment-info.json")
        );
        assert_eq!(settings.artifacts_dir(), PathBuf::from("artifacts"));
    }

    #[test]
    fn test_signing_keys_are_split() {
        let env = HashMap::from([
            ("PRIVATE_KEY".to_string(), " 0x01, 0x02 ,,0x03".to_string()),
            ("DEPLOYMENT_FILE".to_string(), "out/record.json".to_string()),
        ]);
        let settings = Settings::init_from_hashmap(&env).unwrap();

        assert_eq!(settings.signing_keys(), vec!["0x01", "0x02", "0x03"]);
        assert_eq!(settings.deployment_file, "out/record.json");
    }

    #[test]
    #[serial]
    fn test_from_process_environment() {
        std::env::set_var("ARTIFACTS_DIR", "out");
        std::env::set_var("DEPLOYMENT_FILE", "sepolia.json");
        let settings = Settings::init_from_env();
        std::env::remove_var("ARTIFACTS_DIR");
        std::env::remove_var("DEPLOYMENT_FILE");

        let settings = settings.unwrap();
        assert_eq!(settings.artifacts_dir(), PathBuf::from("out"));
        assert_eq!(settings.deployment_file, "sepolia.json");
    }
}
