//! Validated domain newtypes shared across the workspace.

use std::fmt;

use crate::error::ConfigError;

/// Deployment environment key (`dev`, `prod`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Environment(String);

impl Environment {
    /// Create a new environment key.
    ///
    /// # Errors
    /// Returns an error unless the key is non-empty lowercase alphanumeric.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvironment(key));
        }
        Ok(Self(key))
    }

    /// Get the environment key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region for the platform.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An IPv4 CIDR block (`a.b.c.d/len`), used for database allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CidrBlock(String);

impl CidrBlock {
    /// Parse and validate a CIDR block.
    ///
    /// # Errors
    /// Returns an error if the string is not `a.b.c.d/len` with octets in
    /// `0..=255` and a prefix length in `0..=32`.
    pub fn new(cidr: impl Into<String>) -> Result<Self, ConfigError> {
        let cidr = cidr.into();
        let invalid = |reason: &str| ConfigError::InvalidCidr {
            cidr: cidr.clone(),
            reason: reason.to_owned(),
        };

        let (addr, prefix) = cidr.split_once('/').ok_or_else(|| invalid("missing /prefix"))?;

        let octets: Vec<&str> = addr.split('.').collect();
        if octets.len() != 4 {
            return Err(invalid("expected 4 octets"));
        }
        for octet in octets {
            if octet.is_empty() || octet.parse::<u8>().is_err() {
                return Err(invalid("octet out of range"));
            }
        }

        match prefix.parse::<u8>() {
            Ok(len) if len <= 32 => Ok(Self(cidr)),
            _ => Err(invalid("prefix length out of range")),
        }
    }

    /// Get the CIDR block as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An Amazon Resource Name.
///
/// Kept as a lightly-validated newtype: ARNs flow through configuration and
/// grants as opaque locators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Arn(String);

impl Arn {
    /// Create a new ARN.
    #[must_use]
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    /// Get the ARN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_environment() {
        let env = Environment::new("dev").unwrap();
        assert_eq!(env.as_str(), "dev");
    }

    #[test]
    fn test_should_reject_invalid_environment() {
        assert!(Environment::new("").is_err());
        assert!(Environment::new("Dev").is_err());
        assert!(Environment::new("dev-1").is_err());
    }

    #[test]
    fn test_should_create_valid_account_id() {
        let id = AccountId::new("805358685077").unwrap();
        assert_eq!(id.as_str(), "805358685077");
    }

    #[test]
    fn test_should_reject_invalid_account_id() {
        assert!(AccountId::new("12345").is_err());
        assert!(AccountId::new("abcdefghijkl").is_err());
        assert!(AccountId::new("1234567890123").is_err());
    }

    #[test]
    fn test_should_use_default_region() {
        let region = AwsRegion::default();
        assert_eq!(region.as_str(), "us-east-1");
    }

    #[test]
    fn test_should_accept_valid_cidr() {
        let cidr = CidrBlock::new("172.56.35.116/32").unwrap();
        assert_eq!(cidr.as_str(), "172.56.35.116/32");
        assert!(CidrBlock::new("0.0.0.0/0").is_ok());
    }

    #[test]
    fn test_should_reject_invalid_cidr() {
        assert!(CidrBlock::new("172.56.35.116").is_err());
        assert!(CidrBlock::new("256.0.0.1/32").is_err());
        assert!(CidrBlock::new("10.0.0.0/33").is_err());
        assert!(CidrBlock::new("10.0.0/8").is_err());
    }
}
