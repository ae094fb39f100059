//! Lambda resource properties.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::template::ResourceProperties;
use crate::value::Value;

/// Deployment package location in the artifact store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Code {
    /// Artifact bucket name.
    pub s3_bucket: String,
    /// Artifact object key.
    pub s3_key: String,
}

/// Runtime environment variables.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    /// Variable name → value; values may be deferred references so imported
    /// addresses and generated ARNs can flow in.
    pub variables: BTreeMap<String, Value>,
}

/// `AWS::Lambda::Function` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    /// Physical function name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// Runtime identifier (`provided.al2023` for Rust bootstrap binaries).
    pub runtime: String,
    /// Handler name (`bootstrap` for custom runtimes).
    pub handler: String,
    /// Deployment package location.
    pub code: Code,
    /// Execution role ARN.
    pub role: Value,
    /// Memory size in MiB.
    pub memory_size: u32,
    /// Timeout in seconds.
    pub timeout: u32,
    /// CPU architectures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub architectures: Vec<String>,
    /// Runtime environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

impl ResourceProperties for Function {
    const TYPE: &'static str = "AWS::Lambda::Function";
}

/// `AWS::Lambda::Permission` properties: lets an event source invoke a
/// function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Permission {
    /// Granted action (`lambda:InvokeFunction`).
    pub action: String,
    /// Target function.
    pub function_name: Value,
    /// Invoking service principal.
    pub principal: String,
    /// Source restricted by ARN.
    pub source_arn: Value,
    /// Source restricted by owning account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
}

impl Permission {
    /// Permission for a bucket to invoke a function on event notifications.
    #[must_use]
    pub fn s3_invoke(function: Value, bucket_arn: Value, account: impl Into<String>) -> Self {
        Self {
            action: "lambda:InvokeFunction".to_owned(),
            function_name: function,
            principal: "s3.amazonaws.com".to_owned(),
            source_arn: bucket_arn,
            source_account: Some(account.into()),
        }
    }
}

impl ResourceProperties for Permission {
    const TYPE: &'static str = "AWS::Lambda::Permission";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_function_with_deferred_environment() {
        let mut variables = BTreeMap::new();
        variables.insert(
            "PLATFORM_BASE_URL".to_owned(),
            Value::import("Ec2PublicIp"),
        );
        variables.insert(
            "MEDIA_CONVERT_ROLE_ARN".to_owned(),
            Value::get_att("MediaConvertRole", "Arn"),
        );

        let function = Function {
            function_name: Some("edu-media-submit-dev".to_owned()),
            runtime: "provided.al2023".to_owned(),
            handler: "bootstrap".to_owned(),
            code: Code {
                s3_bucket: "edustack-artifacts-dev-805358685077".to_owned(),
                s3_key: "media-submit/bootstrap.zip".to_owned(),
            },
            role: Value::get_att("FnExecutionRole", "Arn"),
            memory_size: 128,
            timeout: 30,
            architectures: vec!["x86_64".to_owned()],
            environment: Some(Environment { variables }),
        };

        let json = serde_json::to_value(&function).unwrap();
        assert_eq!(json["Runtime"], "provided.al2023");
        assert_eq!(json["Handler"], "bootstrap");
        assert_eq!(json["Code"]["S3Key"], "media-submit/bootstrap.zip");
        assert_eq!(
            json["Environment"]["Variables"]["PLATFORM_BASE_URL"],
            serde_json::json!({"Fn::ImportValue": "Ec2PublicIp"})
        );
    }

    #[test]
    fn test_should_serialize_s3_invoke_permission() {
        let permission = Permission::s3_invoke(
            Value::reference("SubmitFn"),
            Value::literal("arn:aws:s3:::edu-media-unprocessed-dev-805358685077"),
            "805358685077",
        );
        let json = serde_json::to_value(&permission).unwrap();
        assert_eq!(json["Action"], "lambda:InvokeFunction");
        assert_eq!(json["Principal"], "s3.amazonaws.com");
        assert_eq!(json["SourceAccount"], "805358685077");
    }
}
