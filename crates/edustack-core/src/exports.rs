//! The typed cross-stack export contract.
//!
//! Stacks deploy independently and exchange values by named export, not by
//! object reference. [`ExportKey`] is the closed set of names: a producer
//! declares an output exported under a key, a consumer imports the same key,
//! and neither side can misspell the wire name.

use crate::error::ConfigError;

/// Well-known cross-stack export names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportKey {
    /// Public IPv4 address of the platform host (network stack).
    Ec2PublicIp,
    /// Physical name of the platform host's instance role (network stack).
    Ec2RoleName,
    /// Instance id of the platform host (network stack).
    Ec2InstanceId,
    /// Physical name of the CI deploy role (delivery stack).
    GitActionRoleName,
    /// Regional domain name of the front-end content bucket (delivery stack).
    FrontendBucketDomain,
}

impl ExportKey {
    /// Every key, in stable order.
    pub const ALL: [Self; 5] = [
        Self::Ec2PublicIp,
        Self::Ec2RoleName,
        Self::Ec2InstanceId,
        Self::GitActionRoleName,
        Self::FrontendBucketDomain,
    ];

    /// The wire name the key is exported and imported under.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Ec2PublicIp => "Ec2PublicIp",
            Self::Ec2RoleName => "Ec2RoleName",
            Self::Ec2InstanceId => "Ec2InstanceId",
            Self::GitActionRoleName => "GitActionRoleName",
            Self::FrontendBucketDomain => "FrontendBucketDomain",
        }
    }

    /// Parse a wire name back into its key.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownExport`] for names outside the contract.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|key| key.wire_name() == name)
            .ok_or_else(|| ConfigError::UnknownExport(name.to_owned()))
    }
}

impl std::fmt::Display for ExportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}
