//! Environment configuration resolution.
//!
//! Every stack is parameterized by a fully populated [`EnvConfig`] record.
//! Records are looked up by environment key in an [`EnvRegistry`]; an
//! unknown key is a hard failure before any resource is declared.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ConfigError;
use crate::types::{AccountId, Arn, AwsRegion, CidrBlock, Environment};

/// Access grant for the deployment-artifact store (action list + locator).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStoreGrant {
    /// Actions the deploy identities may perform against the store.
    pub actions: Vec<String>,
    /// Resource locator the actions apply to (object-level ARN pattern).
    pub resource: Arn,
}

/// Fully populated configuration record for one environment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    /// Environment label (`dev`, `prod`, ...).
    pub environment: Environment,
    /// Target AWS account.
    pub account_id: AccountId,
    /// Target AWS region.
    pub region: AwsRegion,
    /// Network ranges allowed to reach the database port from outside.
    pub whitelisted_cidrs: Vec<CidrBlock>,
    /// Grant for the deployment-artifact store.
    pub artifact_store: ArtifactStoreGrant,
    /// Name of the EC2 key pair used for the platform host.
    pub key_pair_name: String,
    /// Parameter-store path prefix holding the platform's runtime secrets.
    pub parameter_path: String,
}

impl EnvConfig {
    /// ARN pattern covering every parameter under [`Self::parameter_path`].
    #[must_use]
    pub fn parameter_store_arn(&self) -> Arn {
        Arn::new(format!(
            "arn:aws:ssm:{}:{}:parameter{}/*",
            self.region, self.account_id, self.parameter_path
        ))
    }

    /// Name of the bucket holding deployment artifacts (function zips).
    #[must_use]
    pub fn artifact_bucket_name(&self) -> String {
        format!("edustack-artifacts-{}-{}", self.environment, self.account_id)
    }
}

/// Environment key → configuration record registry.
///
/// The registry is a pure lookup table; resolution performs no I/O and has
/// no fallback beyond the entries it was built with.
#[derive(Debug, Clone, Default)]
pub struct EnvRegistry {
    entries: BTreeMap<Environment, EnvConfig>,
}

impl EnvRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the platform's configured environments.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(dev_config());
        registry.insert(prod_config());
        registry
    }

    /// Insert (or replace) a configuration record, keyed by its environment.
    pub fn insert(&mut self, config: EnvConfig) {
        self.entries.insert(config.environment.clone(), config);
    }

    /// Resolve the configuration record for an environment key.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownEnvironment`] when no record matches;
    /// the error names the configured keys so a typo is obvious.
    pub fn resolve(&self, key: &str) -> Result<&EnvConfig, ConfigError> {
        let env = Environment::new(key)?;
        let config = self
            .entries
            .get(&env)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                key: key.to_owned(),
                known: self
                    .entries
                    .keys()
                    .map(Environment::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        debug!(environment = %env, account = %config.account_id, "resolved environment configuration");
        Ok(config)
    }

    /// Configured environment keys, in sorted order.
    #[must_use]
    pub fn known_environments(&self) -> Vec<&Environment> {
        self.entries.keys().collect()
    }
}

/// Actions the deploy identities need against the artifact store.
fn artifact_actions() -> Vec<String> {
    ["s3:GetObject", "s3:PutObject", "s3:ListBucket"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn dev_config() -> EnvConfig {
    let environment = Environment::new("dev").expect("static environment table is valid");
    let account_id = AccountId::new("805358685077").expect("static environment table is valid");
    EnvConfig {
        artifact_store: ArtifactStoreGrant {
            actions: artifact_actions(),
            resource: Arn::new(format!(
                "arn:aws:s3:::edustack-artifacts-{environment}-{account_id}/*"
            )),
        },
        environment,
        account_id,
        region: AwsRegion::new("us-east-1"),
        whitelisted_cidrs: ["172.56.35.116/32", "162.83.152.212/32", "100.33.64.132/32"]
            .into_iter()
            .map(|c| CidrBlock::new(c).expect("static environment table is valid"))
            .collect(),
        key_pair_name: "edustack-platform-dev".to_owned(),
        parameter_path: "/edustack/dev".to_owned(),
    }
}

fn prod_config() -> EnvConfig {
    let environment = Environment::new("prod").expect("static environment table is valid");
    let account_id = AccountId::new("611492384770").expect("static environment table is valid");
    EnvConfig {
        artifact_store: ArtifactStoreGrant {
            actions: artifact_actions(),
            resource: Arn::new(format!(
                "arn:aws:s3:::edustack-artifacts-{environment}-{account_id}/*"
            )),
        },
        environment,
        account_id,
        region: AwsRegion::new("us-east-1"),
        whitelisted_cidrs: Vec::new(),
        key_pair_name: "edustack-platform-prod".to_owned(),
        parameter_path: "/edustack/prod".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_known_environment() {
        let registry = EnvRegistry::builtin();
        let config = registry.resolve("dev").unwrap();
        assert_eq!(config.environment.as_str(), "dev");
        assert_eq!(config.account_id.as_str(), "805358685077");
        assert_eq!(config.region.as_str(), "us-east-1");
        assert_eq!(config.whitelisted_cidrs.len(), 3);
    }

    #[test]
    fn test_should_fail_on_unknown_environment() {
        let registry = EnvRegistry::builtin();
        let err = registry.resolve("staging").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("staging"), "error should name the bad key: {msg}");
        assert!(msg.contains("dev"), "error should list known keys: {msg}");
    }

    #[test]
    fn test_should_fail_on_malformed_environment_key() {
        let registry = EnvRegistry::builtin();
        assert!(registry.resolve("DEV").is_err());
        assert!(registry.resolve("").is_err());
    }

    #[test]
    fn test_should_populate_every_field_for_known_environments() {
        let registry = EnvRegistry::builtin();
        for env in registry.known_environments() {
            let config = registry.resolve(env.as_str()).unwrap();
            assert!(!config.account_id.as_str().is_empty());
            assert!(!config.region.as_str().is_empty());
            assert!(!config.key_pair_name.is_empty());
            assert!(!config.parameter_path.is_empty());
            assert!(!config.artifact_store.actions.is_empty());
            assert!(!config.artifact_store.resource.as_str().is_empty());
        }
    }

    #[test]
    fn test_should_derive_parameter_store_arn() {
        let registry = EnvRegistry::builtin();
        let config = registry.resolve("dev").unwrap();
        assert_eq!(
            config.parameter_store_arn().as_str(),
            "arn:aws:ssm:us-east-1:805358685077:parameter/edustack/dev/*"
        );
    }

    #[test]
    fn test_should_derive_artifact_bucket_name() {
        let registry = EnvRegistry::builtin();
        let config = registry.resolve("dev").unwrap();
        assert_eq!(
            config.artifact_bucket_name(),
            "edustack-artifacts-dev-805358685077"
        );
    }
}
