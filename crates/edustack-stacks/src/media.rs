//! The media pipeline stack: upload/output buckets, transcoding identities,
//! and the two event-driven functions.
//!
//! Consumes `Ec2PublicIp` and `Ec2RoleName` from the network stack, so the
//! app must declare an ordering constraint on it.

use std::collections::BTreeMap;

use edustack_core::{EnvConfig, ExportKey, bucket_name, resource_name};
use edustack_template::{ResourceProperties, Template, Value, iam, lambda, s3};
use typed_builder::TypedBuilder;

use crate::actions;
use crate::constants::{
    EXT_M3U8, EXT_MP4, LAMBDA_BASIC_EXECUTION_ARN, LAMBDA_SERVICE, MEDIA_CONVERT_SERVICE,
    WILDCARD, bucket_arn, bucket_objects_arn,
};
use crate::error::SynthError;
use crate::stack::{StackDefinition, import};

/// Properties of the media pipeline stack.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MediaStackProps {
    /// Artifact key of the job-submission function package.
    #[builder(default = "media-submit/bootstrap.zip".to_owned(), setter(into))]
    pub submit_artifact_key: String,
    /// Artifact key of the status-callback function package.
    #[builder(default = "media-status/bootstrap.zip".to_owned(), setter(into))]
    pub status_artifact_key: String,
    /// Prefix appended to derived transcoding output destinations.
    #[builder(default = "hls_output/".to_owned(), setter(into))]
    pub hls_output_prefix: String,
}

impl Default for MediaStackProps {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The media pipeline stack definition.
#[derive(Debug, Clone, Default)]
pub struct MediaStack {
    props: MediaStackProps,
}

impl MediaStack {
    /// The stack's identifier.
    pub const ID: &'static str = "edu-media";

    /// Create the stack from its properties.
    #[must_use]
    pub fn new(props: MediaStackProps) -> Self {
        Self { props }
    }
}

/// Media bucket shared posture: server-side encryption plus public read.
///
/// Public read is carried over from the platform's observed behavior and is
/// not a production posture.
fn media_bucket(name: &str, notification: Option<s3::NotificationConfiguration>) -> s3::Bucket {
    s3::Bucket {
        bucket_name: Some(name.to_owned()),
        bucket_encryption: Some(s3::BucketEncryption::aes256()),
        public_access_block_configuration: Some(s3::PublicAccessBlock::disabled()),
        notification_configuration: notification,
        website_configuration: None,
    }
}

/// Public-read policy for a media bucket.
fn public_read_policy(bucket_logical_id: &str, bucket: &str) -> s3::BucketPolicy {
    s3::BucketPolicy {
        bucket: Value::reference(bucket_logical_id),
        policy_document: iam::PolicyDocument::new(vec![iam::Statement {
            effect: "Allow".to_owned(),
            principal: Some(iam::Principal::Any),
            action: vec!["s3:GetObject".to_owned()],
            resource: vec![Value::literal(bucket_objects_arn(bucket))],
            condition: None,
        }]),
    }
}

impl StackDefinition for MediaStack {
    fn id(&self) -> &str {
        Self::ID
    }

    #[allow(clippy::too_many_lines)]
    fn synth(&self, config: &EnvConfig) -> Result<Template, SynthError> {
        let env = &config.environment;
        let account = &config.account_id;
        let mut template = Template::new(format!(
            "Media transcoding pipeline for the {env} environment"
        ));

        // Bucket names are derived, not engine-generated, so their ARNs can
        // be composed as strings; that breaks the reference cycle between
        // buckets, notifications, and invoke permissions.
        let unprocessed = bucket_name(Self::ID, "unprocessed", env, account)?;
        let processed = bucket_name(Self::ID, "processed", env, account)?;

        // ---- identities ----
        template.add_resource(
            "MediaConvertRole",
            iam::Role {
                role_name: Some(
                    resource_name(Self::ID, "role-mediaconvert", env, account)?
                        .as_str()
                        .to_owned(),
                ),
                assume_role_policy_document: iam::PolicyDocument::service_assume_role(
                    MEDIA_CONVERT_SERVICE,
                ),
                managed_policy_arns: Vec::new(),
                policies: vec![iam::InlinePolicy {
                    policy_name: "media-bucket-access".to_owned(),
                    policy_document: iam::PolicyDocument::new(vec![
                        iam::Statement::allow(
                            actions::OBJECT_READ,
                            vec![Value::literal(bucket_objects_arn(unprocessed.as_str()))],
                        ),
                        iam::Statement::allow(
                            actions::OBJECT_WRITE,
                            vec![Value::literal(bucket_objects_arn(processed.as_str()))],
                        ),
                    ]),
                }],
            }
            .into_resource()?,
        )?;

        template.add_resource(
            "FnExecutionRole",
            iam::Role {
                role_name: Some(
                    resource_name(Self::ID, "role-fn-exec", env, account)?
                        .as_str()
                        .to_owned(),
                ),
                assume_role_policy_document: iam::PolicyDocument::service_assume_role(
                    LAMBDA_SERVICE,
                ),
                managed_policy_arns: vec![LAMBDA_BASIC_EXECUTION_ARN.to_owned()],
                policies: vec![iam::InlinePolicy {
                    policy_name: "transcode-submit".to_owned(),
                    policy_document: iam::PolicyDocument::new(vec![
                        iam::Statement::allow(
                            actions::MEDIA_CONVERT_SUBMIT,
                            vec![Value::literal(WILDCARD)],
                        ),
                        iam::Statement::allow(
                            actions::OBJECT_READ_WRITE,
                            vec![
                                Value::literal(bucket_objects_arn(unprocessed.as_str())),
                                Value::literal(bucket_objects_arn(processed.as_str())),
                            ],
                        ),
                        // Pass only the transcoding role, and only to the
                        // transcoding service.
                        iam::Statement::allow(
                            actions::PASS_ROLE,
                            vec![Value::get_att("MediaConvertRole", "Arn")],
                        )
                        .with_condition(
                            "StringEquals",
                            [(
                                "iam:PassedToService".to_owned(),
                                Value::literal(MEDIA_CONVERT_SERVICE),
                            )],
                        ),
                    ]),
                }],
            }
            .into_resource()?,
        )?;

        // ---- functions ----
        let mut submit_env = BTreeMap::new();
        submit_env.insert(
            "MEDIA_CONVERT_ROLE_ARN".to_owned(),
            Value::get_att("MediaConvertRole", "Arn"),
        );
        submit_env.insert(
            "S3_BUCKET_PROCESSED_MEDIA".to_owned(),
            Value::literal(processed.as_str()),
        );
        submit_env.insert(
            "HLS_OUTPUT_PREFIX".to_owned(),
            Value::literal(&self.props.hls_output_prefix),
        );
        template.add_resource(
            "SubmitFn",
            lambda::Function {
                function_name: Some(
                    resource_name(Self::ID, "fn-media-submit", env, account)?
                        .as_str()
                        .to_owned(),
                ),
                runtime: "provided.al2023".to_owned(),
                handler: "bootstrap".to_owned(),
                code: lambda::Code {
                    s3_bucket: config.artifact_bucket_name(),
                    s3_key: self.props.submit_artifact_key.clone(),
                },
                role: Value::get_att("FnExecutionRole", "Arn"),
                memory_size: 128,
                timeout: 60,
                architectures: vec!["x86_64".to_owned()],
                environment: Some(lambda::Environment {
                    variables: submit_env,
                }),
            }
            .into_resource()?,
        )?;

        // The callback host comes from the network stack's export; the
        // function receives it as its base URL.
        let mut status_env = BTreeMap::new();
        status_env.insert(
            "PLATFORM_BASE_URL".to_owned(),
            import(ExportKey::Ec2PublicIp),
        );
        template.add_resource(
            "StatusFn",
            lambda::Function {
                function_name: Some(
                    resource_name(Self::ID, "fn-media-status", env, account)?
                        .as_str()
                        .to_owned(),
                ),
                runtime: "provided.al2023".to_owned(),
                handler: "bootstrap".to_owned(),
                code: lambda::Code {
                    s3_bucket: config.artifact_bucket_name(),
                    s3_key: self.props.status_artifact_key.clone(),
                },
                role: Value::get_att("FnExecutionRole", "Arn"),
                memory_size: 128,
                timeout: 30,
                architectures: vec!["x86_64".to_owned()],
                environment: Some(lambda::Environment {
                    variables: status_env,
                }),
            }
            .into_resource()?,
        )?;

        template.add_resource(
            "SubmitFnInvokePermission",
            lambda::Permission::s3_invoke(
                Value::reference("SubmitFn"),
                Value::literal(bucket_arn(unprocessed.as_str())),
                account.as_str(),
            )
            .into_resource()?,
        )?;
        template.add_resource(
            "StatusFnInvokePermission",
            lambda::Permission::s3_invoke(
                Value::reference("StatusFn"),
                Value::literal(bucket_arn(processed.as_str())),
                account.as_str(),
            )
            .into_resource()?,
        )?;

        // ---- buckets ----
        template.add_resource(
            "UnprocessedBucket",
            media_bucket(
                unprocessed.as_str(),
                Some(s3::NotificationConfiguration {
                    lambda_configurations: vec![s3::LambdaNotification::on_created_suffix(
                        Value::get_att("SubmitFn", "Arn"),
                        EXT_MP4,
                    )],
                }),
            )
            .into_resource()?
            .depends_on("SubmitFnInvokePermission"),
        )?;
        template.add_resource(
            "ProcessedBucket",
            media_bucket(
                processed.as_str(),
                Some(s3::NotificationConfiguration {
                    lambda_configurations: vec![s3::LambdaNotification::on_created_suffix(
                        Value::get_att("StatusFn", "Arn"),
                        EXT_M3U8,
                    )],
                }),
            )
            .into_resource()?
            .depends_on("StatusFnInvokePermission"),
        )?;
        template.add_resource(
            "UnprocessedBucketPolicy",
            public_read_policy("UnprocessedBucket", unprocessed.as_str()).into_resource()?,
        )?;
        template.add_resource(
            "ProcessedBucketPolicy",
            public_read_policy("ProcessedBucket", processed.as_str()).into_resource()?,
        )?;

        // ---- grants onto the pre-existing platform host identity ----
        template.add_resource(
            "HostMediaReadPolicy",
            iam::Policy {
                policy_name: resource_name(Self::ID, "host-media-read", env, account)?
                    .as_str()
                    .to_owned(),
                policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                    actions::OBJECT_READ,
                    vec![Value::literal(bucket_objects_arn(processed.as_str()))],
                )]),
                roles: vec![import(ExportKey::Ec2RoleName)],
            }
            .into_resource()?,
        )?;

        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use edustack_core::EnvRegistry;

    use super::*;

    fn synth() -> Template {
        let registry = EnvRegistry::builtin();
        let config = registry.resolve("dev").unwrap();
        MediaStack::default().synth(config).unwrap()
    }

    #[test]
    fn test_should_wire_suffix_filtered_notifications() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();

        let submit = &json["UnprocessedBucket"]["Properties"]["NotificationConfiguration"]
            ["LambdaConfigurations"][0];
        assert_eq!(submit["Filter"]["S3Key"]["Rules"][0]["Value"], ".mp4");
        assert_eq!(
            submit["Function"],
            serde_json::json!({"Fn::GetAtt": ["SubmitFn", "Arn"]})
        );

        let status = &json["ProcessedBucket"]["Properties"]["NotificationConfiguration"]
            ["LambdaConfigurations"][0];
        assert_eq!(status["Filter"]["S3Key"]["Rules"][0]["Value"], ".m3u8");
    }

    #[test]
    fn test_should_encrypt_and_public_read_both_buckets() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();
        for bucket in ["UnprocessedBucket", "ProcessedBucket"] {
            let properties = &json[bucket]["Properties"];
            assert_eq!(
                properties["BucketEncryption"]["ServerSideEncryptionConfiguration"][0]
                    ["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
                "AES256"
            );
            assert_eq!(
                properties["PublicAccessBlockConfiguration"]["BlockPublicPolicy"],
                false
            );
        }
        assert_eq!(
            json["ProcessedBucketPolicy"]["Properties"]["PolicyDocument"]["Statement"][0]
                ["Principal"],
            "*"
        );
    }

    #[test]
    fn test_should_split_read_and_write_between_transcoder_grants() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();
        let statements = json["MediaConvertRole"]["Properties"]["Policies"][0]["PolicyDocument"]
            ["Statement"]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(statements[0]["Action"], serde_json::json!(["s3:GetObject"]));
        assert!(
            statements[0]["Resource"][0]
                .as_str()
                .unwrap()
                .contains("unprocessed")
        );
        assert_eq!(statements[1]["Action"], serde_json::json!(["s3:PutObject"]));
        assert!(
            statements[1]["Resource"][0]
                .as_str()
                .unwrap()
                .contains("processed")
        );
    }

    #[test]
    fn test_should_condition_pass_role_on_transcoding_service() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();
        let statements = json["FnExecutionRole"]["Properties"]["Policies"][0]["PolicyDocument"]
            ["Statement"]
            .as_array()
            .unwrap()
            .clone();
        let pass_role = statements
            .iter()
            .find(|s| s["Action"] == serde_json::json!(["iam:PassRole"]))
            .unwrap();
        assert_eq!(
            pass_role["Condition"]["StringEquals"]["iam:PassedToService"],
            "mediaconvert.amazonaws.com"
        );
        assert_eq!(
            pass_role["Resource"][0],
            serde_json::json!({"Fn::GetAtt": ["MediaConvertRole", "Arn"]})
        );
    }

    #[test]
    fn test_should_import_host_address_and_role_from_network_stack() {
        let template = synth();
        assert_eq!(
            template.imported_exports(),
            vec!["Ec2PublicIp", "Ec2RoleName"]
        );

        let json = serde_json::to_value(template.resources()).unwrap();
        assert_eq!(
            json["StatusFn"]["Properties"]["Environment"]["Variables"]["PLATFORM_BASE_URL"],
            serde_json::json!({"Fn::ImportValue": "Ec2PublicIp"})
        );
        assert_eq!(
            json["HostMediaReadPolicy"]["Properties"]["Roles"][0],
            serde_json::json!({"Fn::ImportValue": "Ec2RoleName"})
        );
    }

    #[test]
    fn test_should_order_buckets_after_invoke_permissions() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();
        assert_eq!(
            json["UnprocessedBucket"]["DependsOn"],
            serde_json::json!(["SubmitFnInvokePermission"])
        );
        assert_eq!(
            json["ProcessedBucket"]["DependsOn"],
            serde_json::json!(["StatusFnInvokePermission"])
        );
    }

    #[test]
    fn test_should_pin_function_runtime_and_artifacts() {
        let template = synth();
        let json = serde_json::to_value(template.resources()).unwrap();
        for function in ["SubmitFn", "StatusFn"] {
            assert_eq!(json[function]["Properties"]["Runtime"], "provided.al2023");
            assert_eq!(json[function]["Properties"]["Handler"], "bootstrap");
            assert_eq!(
                json[function]["Properties"]["Code"]["S3Bucket"],
                "edustack-artifacts-dev-805358685077"
            );
        }
        assert_eq!(
            json["SubmitFn"]["Properties"]["Environment"]["Variables"]["HLS_OUTPUT_PREFIX"],
            "hls_output/"
        );
    }
}
