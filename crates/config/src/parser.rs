//! Config file loading, saving, and default generation

use crate::*;
use anyhow::{Context, Result};
use common::Address;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load and parse a configuration file, substituting environment
/// variables first
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NftOptConfig> {
    let path = path.as_ref();
    info!(?path, "Loading configuration");

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: NftOptConfig =
        serde_yaml::from_str(&substituted).context("Failed to parse YAML configuration")?;

    info!("Configuration loaded");
    Ok(config)
}

/// Write a configuration to disk as YAML
pub fn save_config<P: AsRef<Path>>(config: &NftOptConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;
    info!(?path, "Configuration saved");
    Ok(())
}

/// Generate a default configuration: mock oracle with one compliant
/// contract and a handful of tokens owned by a placeholder account
pub fn generate_default_config() -> NftOptConfig {
    let contract: Address = "0x00000000000000000000000000000000000000ff"
        .parse()
        .expect("static address");
    let owner: Address = "0x0000000000000000000000000000000000000001"
        .parse()
        .expect("static address");

    NftOptConfig {
        service: ServiceConfig {
            name: default_service_name(),
            description: "NFT options market engine".to_string(),
        },
        logging: LoggingConfig::default(),
        oracle: OracleConfig {
            mode: OracleMode::Mock,
            rpc_url: None,
            compliant_contracts: vec![contract],
            fixtures: (1..=3)
                .map(|token_id| OwnershipFixture {
                    contract,
                    token_id,
                    owner,
                })
                .collect(),
        },
    }
}
