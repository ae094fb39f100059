//! Error types for the edustack core.

/// Core error type for configuration and domain-value validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested environment has no configuration entry.
    #[error("unknown environment: {key} (known environments: {known})")]
    UnknownEnvironment {
        /// The environment key that was requested.
        key: String,
        /// Comma-separated list of configured environment keys.
        known: String,
    },

    /// Invalid environment key format.
    #[error("invalid environment key: {0} (must be lowercase alphanumeric)")]
    InvalidEnvironment(String),

    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// Invalid CIDR block format.
    #[error("invalid CIDR block: {cidr}: {reason}")]
    InvalidCidr {
        /// The CIDR string that failed validation.
        cidr: String,
        /// The reason the string was rejected.
        reason: String,
    },

    /// Invalid resource name component.
    #[error("invalid resource name component: {component}: {reason}")]
    InvalidNameComponent {
        /// The offending component.
        component: String,
        /// The reason the component was rejected.
        reason: String,
    },

    /// A derived bucket name violates the S3 naming constraints.
    #[error("derived bucket name is not a valid S3 bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The derived name.
        name: String,
        /// The constraint that was violated.
        reason: String,
    },

    /// An export wire name could not be parsed back into an [`crate::ExportKey`].
    #[error("unknown cross-stack export name: {0}")]
    UnknownExport(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, ConfigError>;
