//! Environment variable substitution in raw config text

use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

fn placeholder_regex() -> Regex {
    // ${VAR_NAME} or $VAR_NAME
    Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("static regex")
}

/// Substitute environment variables in the format `${VAR_NAME}` or `$VAR_NAME`
///
/// Unset variables keep their placeholder; the validator reports them
/// later so all findings surface in one pass.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = content.to_string();

    for caps in re.captures_iter(content) {
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let placeholder = &caps[0];

        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "Substituting environment variable");
                result = result.replace(placeholder, &value);
            }
            Err(_) => {
                warn!(var = var_name, "Environment variable not set, keeping placeholder");
            }
        }
    }

    Ok(result)
}

/// Whether a string still contains unresolved `${VAR}` placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_regex().is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_set_variable() {
        env::set_var("NFTOPT_TEST_SUBST_VAR", "http://localhost:8545");

        let out = substitute_env_vars("rpc_url: ${NFTOPT_TEST_SUBST_VAR}").unwrap();
        assert_eq!(out, "rpc_url: http://localhost:8545");

        env::remove_var("NFTOPT_TEST_SUBST_VAR");
    }

    #[test]
    fn test_keeps_unset_placeholder() {
        env::remove_var("NFTOPT_TEST_UNSET_VAR");

        let out = substitute_env_vars("rpc_url: ${NFTOPT_TEST_UNSET_VAR}").unwrap();
        assert_eq!(out, "rpc_url: ${NFTOPT_TEST_UNSET_VAR}");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_no_placeholders() {
        let out = substitute_env_vars("mode: mock").unwrap();
        assert_eq!(out, "mode: mock");
        assert!(!has_unresolved_env_vars(&out));
    }
}
