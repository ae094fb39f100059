//! Deterministic resource naming.
//!
//! Physical names are derived by string composition of
//! `{stack}-{component}-{environment}-{account}`. The composition
//! approximates global uniqueness within a namespace (role names are
//! account-scoped, bucket names are global); it does not guarantee it, so
//! collisions surface as provisioning-engine errors.

use std::fmt;

use crate::error::ConfigError;
use crate::types::{AccountId, Environment};

/// A derived physical resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ResourceName(String);

impl ResourceName {
    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a stack-id or component token used in name composition.
fn validate_component(component: &str) -> Result<(), ConfigError> {
    let ok = !component.is_empty()
        && !component.starts_with('-')
        && !component.ends_with('-')
        && component
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidNameComponent {
            component: component.to_owned(),
            reason: "must be non-empty lowercase alphanumeric with interior dashes".to_owned(),
        })
    }
}

/// Derive the physical name for a resource:
/// `{stack}-{component}-{environment}-{account}`.
///
/// # Errors
/// Returns an error if `stack_id` or `component` contains characters outside
/// the lowercase-alphanumeric-dash set.
pub fn resource_name(
    stack_id: &str,
    component: &str,
    environment: &Environment,
    account: &AccountId,
) -> Result<ResourceName, ConfigError> {
    validate_component(stack_id)?;
    validate_component(component)?;
    Ok(ResourceName(format!(
        "{stack_id}-{component}-{environment}-{account}"
    )))
}

/// Derive a bucket name with the same composition, then check the S3
/// constraints the composition must satisfy (3--63 chars, lowercase
/// alphanumeric and dashes).
///
/// # Errors
/// Returns an error if the composed name violates the bucket constraints.
pub fn bucket_name(
    stack_id: &str,
    component: &str,
    environment: &Environment,
    account: &AccountId,
) -> Result<ResourceName, ConfigError> {
    let name = resource_name(stack_id, component, environment, account)?;
    let len = name.as_str().len();
    if !(3..=63).contains(&len) {
        return Err(ConfigError::InvalidBucketName {
            name: name.into_string(),
            reason: format!("length {len} outside 3..=63"),
        });
    }
    Ok(name)
}
