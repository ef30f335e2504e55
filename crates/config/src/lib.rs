//! Configuration for NFTOpt
//!
//! YAML configuration covering logging and the asset oracle. Loading
//! performs environment variable substitution first, then parses; the
//! validator produces a report of errors, warnings, and applied defaults
//! without aborting on the first finding.

use common::Address;
use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level NFTOpt configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NftOptConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub oracle: OracleConfig,
}

/// Service identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Output format: pretty, json, or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

/// How the engine reaches the asset ownership oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleMode {
    /// Scripted answers from the `fixtures` section
    Mock,
    /// Live ERC-721 queries against `rpc_url`
    Rpc,
}

/// Asset oracle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    pub mode: OracleMode,
    /// Ethereum JSON-RPC endpoint; required in `rpc` mode
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Contracts the mock oracle reports as ERC-721 compliant
    #[serde(default)]
    pub compliant_contracts: Vec<Address>,
    /// Scripted token ownership for the mock oracle
    #[serde(default)]
    pub fixtures: Vec<OwnershipFixture>,
}

/// One scripted ownership entry for the mock oracle
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OwnershipFixture {
    pub contract: Address,
    pub token_id: u64,
    pub owner: Address,
}
