//! S3 resource properties.

use serde::Serialize;

use crate::iam::PolicyDocument;
use crate::template::ResourceProperties;
use crate::value::Value;

/// Server-side encryption defaults applied to every object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionDefault {
    /// Encryption algorithm (`AES256`).
    #[serde(rename = "SSEAlgorithm")]
    pub sse_algorithm: String,
}

/// One server-side encryption rule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionRule {
    /// The default applied when a request carries no encryption header.
    pub server_side_encryption_by_default: EncryptionDefault,
}

/// Bucket encryption configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketEncryption {
    /// Encryption rules.
    pub server_side_encryption_configuration: Vec<EncryptionRule>,
}

impl BucketEncryption {
    /// AES-256 managed-key encryption.
    #[must_use]
    pub fn aes256() -> Self {
        Self {
            server_side_encryption_configuration: vec![EncryptionRule {
                server_side_encryption_by_default: EncryptionDefault {
                    sse_algorithm: "AES256".to_owned(),
                },
            }],
        }
    }
}

/// Public access block settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlock {
    /// Block new public ACLs.
    pub block_public_acls: bool,
    /// Block new public bucket policies.
    pub block_public_policy: bool,
    /// Ignore existing public ACLs.
    pub ignore_public_acls: bool,
    /// Restrict access for buckets with public policies.
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// Disable every block, allowing a public-read bucket policy to apply.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            block_public_acls: false,
            block_public_policy: false,
            ignore_public_acls: false,
            restrict_public_buckets: false,
        }
    }
}

/// One suffix/prefix filter rule of an event notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterRule {
    /// `suffix` or `prefix`.
    pub name: String,
    /// The matched value.
    pub value: String,
}

/// Object-key filter of an event notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationFilter {
    /// Key-based rules.
    pub s3_key: KeyFilter,
}

/// Rule list wrapper of a key filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyFilter {
    /// Filter rules; all must match.
    pub rules: Vec<FilterRule>,
}

/// A function-invoking event notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaNotification {
    /// Event pattern (`s3:ObjectCreated:*`).
    pub event: String,
    /// Invoked function ARN.
    pub function: Value,
    /// Object-key filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationFilter>,
}

impl LambdaNotification {
    /// Notification invoking `function` when an object whose key ends in
    /// `suffix` is created.
    #[must_use]
    pub fn on_created_suffix(function: Value, suffix: impl Into<String>) -> Self {
        Self {
            event: "s3:ObjectCreated:*".to_owned(),
            function,
            filter: Some(NotificationFilter {
                s3_key: KeyFilter {
                    rules: vec![FilterRule {
                        name: "suffix".to_owned(),
                        value: suffix.into(),
                    }],
                },
            }),
        }
    }
}

/// Event notification configuration of a bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationConfiguration {
    /// Function-invoking notifications.
    pub lambda_configurations: Vec<LambdaNotification>,
}

/// Static-website hosting configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebsiteConfiguration {
    /// Index document key.
    pub index_document: String,
    /// Error document key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_document: Option<String>,
}

/// `AWS::S3::Bucket` properties.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    /// Physical bucket name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    /// Server-side encryption configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_encryption: Option<BucketEncryption>,
    /// Public access block settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_block_configuration: Option<PublicAccessBlock>,
    /// Event notification configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_configuration: Option<NotificationConfiguration>,
    /// Static-website hosting configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_configuration: Option<WebsiteConfiguration>,
}

impl ResourceProperties for Bucket {
    const TYPE: &'static str = "AWS::S3::Bucket";
}

/// `AWS::S3::BucketPolicy` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    /// The bucket the policy attaches to.
    pub bucket: Value,
    /// The policy document.
    pub policy_document: PolicyDocument,
}

impl ResourceProperties for BucketPolicy {
    const TYPE: &'static str = "AWS::S3::BucketPolicy";
}
