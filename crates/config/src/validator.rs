//! Configuration validation
//!
//! Collects every finding instead of stopping at the first, so one
//! `validate` run shows the whole picture.

use crate::*;
use common::Address;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Unknown log format: {0}. Must be one of: pretty, json, compact")]
    UnknownLogFormat(String),

    #[error("Oracle mode 'rpc' requires rpc_url")]
    MissingRpcUrl,

    #[error("rpc_url contains unresolved environment variable: {0}")]
    UnresolvedRpcUrl(String),

    #[error("Invalid rpc_url '{url}': {message}")]
    InvalidRpcUrl { url: String, message: String },

    #[error("Fixture for contract {contract} has token_id 0; token identifiers start at 1")]
    ZeroFixtureToken { contract: Address },

    #[error("Duplicate fixture for token {token_id} under contract {contract}")]
    DuplicateFixture { contract: Address, token_id: u64 },
}

/// A non-fatal finding
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// A default the parser filled in
#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

/// Outcome of validating a configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

/// Validate a configuration, returning every error and warning found
pub fn validate_config(config: &NftOptConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.service.name.trim().is_empty() {
        report.errors.push(ValidationError::MissingServiceName);
    }

    if !matches!(config.logging.format.as_str(), "pretty" | "json" | "compact") {
        report
            .errors
            .push(ValidationError::UnknownLogFormat(config.logging.format.clone()));
    }

    validate_oracle(&config.oracle, &mut report);

    report
}

fn validate_oracle(oracle: &OracleConfig, report: &mut ValidationReport) {
    match oracle.mode {
        OracleMode::Rpc => match oracle.rpc_url.as_deref() {
            None => report.errors.push(ValidationError::MissingRpcUrl),
            Some(raw) => {
                if substitution::has_unresolved_env_vars(raw) {
                    report
                        .errors
                        .push(ValidationError::UnresolvedRpcUrl(raw.to_string()));
                } else {
                    match Url::parse(raw) {
                        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                        Ok(url) => report.errors.push(ValidationError::InvalidRpcUrl {
                            url: raw.to_string(),
                            message: format!("unsupported scheme '{}'", url.scheme()),
                        }),
                        Err(e) => report.errors.push(ValidationError::InvalidRpcUrl {
                            url: raw.to_string(),
                            message: e.to_string(),
                        }),
                    }
                }

                if !oracle.fixtures.is_empty() {
                    report.warn("oracle.fixtures", "fixtures are ignored in rpc mode");
                }
            }
        },
        OracleMode::Mock => {
            if oracle.rpc_url.is_some() {
                report.warn("oracle.rpc_url", "rpc_url is ignored in mock mode");
            }
            if oracle.fixtures.is_empty() {
                report.warn(
                    "oracle.fixtures",
                    "mock oracle has no fixtures; every ownership check will fail",
                );
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    for fixture in &oracle.fixtures {
        if fixture.token_id == 0 {
            report.errors.push(ValidationError::ZeroFixtureToken {
                contract: fixture.contract,
            });
        }
        if !seen.insert((fixture.contract, fixture.token_id)) {
            report.errors.push(ValidationError::DuplicateFixture {
                contract: fixture.contract,
                token_id: fixture.token_id,
            });
        }
        if !oracle.compliant_contracts.contains(&fixture.contract) {
            report.warn(
                "oracle.fixtures",
                format!(
                    "fixture contract {} is not listed in compliant_contracts; \
                     requests against it will be rejected as non-compliant",
                    fixture.contract
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::generate_default_config;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_rpc_mode_requires_url() {
        let mut config = generate_default_config();
        config.oracle.mode = OracleMode::Rpc;
        config.oracle.rpc_url = None;
        config.oracle.fixtures.clear();

        let report = validate_config(&config);
        assert!(matches!(report.errors[..], [ValidationError::MissingRpcUrl]));
    }

    #[test]
    fn test_rpc_url_scheme_checked() {
        let mut config = generate_default_config();
        config.oracle.mode = OracleMode::Rpc;
        config.oracle.rpc_url = Some("ftp://node.example.org".to_string());
        config.oracle.fixtures.clear();

        let report = validate_config(&config);
        assert!(matches!(
            report.errors[..],
            [ValidationError::InvalidRpcUrl { .. }]
        ));
    }

    #[test]
    fn test_unresolved_env_var_in_rpc_url() {
        let mut config = generate_default_config();
        config.oracle.mode = OracleMode::Rpc;
        config.oracle.rpc_url = Some("${ETH_RPC_URL}".to_string());
        config.oracle.fixtures.clear();

        let report = validate_config(&config);
        assert!(matches!(
            report.errors[..],
            [ValidationError::UnresolvedRpcUrl(_)]
        ));
    }

    #[test]
    fn test_duplicate_and_zero_fixtures() {
        let mut config = generate_default_config();
        let contract = config.oracle.compliant_contracts[0];
        let owner = config.oracle.fixtures[0].owner;
        config.oracle.fixtures = vec![
            OwnershipFixture {
                contract,
                token_id: 0,
                owner,
            },
            OwnershipFixture {
                contract,
                token_id: 1,
                owner,
            },
            OwnershipFixture {
                contract,
                token_id: 1,
                owner,
            },
        ];

        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 2);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroFixtureToken { .. })));
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateFixture { token_id: 1, .. })));
    }

    #[test]
    fn test_mock_mode_without_fixtures_warns() {
        let mut config = generate_default_config();
        config.oracle.fixtures.clear();

        let report = validate_config(&config);
        assert!(report.is_valid());
        assert!(!report.warnings.is_empty());
    }
}
