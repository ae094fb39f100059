//! The continuous-delivery trust stack: GitHub OIDC federation and deploy
//! roles.
//!
//! Trust is branch-scoped: a role is assumable only when the CI token's
//! subject claim string-equals `repo:<org/repo>:ref:refs/heads/<branch>`.
//! Nothing finer (commit, pull request, environment) is checked.

use edustack_core::{EnvConfig, ExportKey, bucket_name, resource_name};
use edustack_template::{ResourceProperties, Template, Value, iam, s3};
use typed_builder::TypedBuilder;

use crate::actions;
use crate::constants::{
    GITHUB_OIDC_THUMBPRINT, GITHUB_OIDC_TOKEN_URL, OIDC_AUDIENCE_CLAIM, OIDC_SUBJECT_CLAIM,
    STS_AUDIENCE, WILDCARD, branch_subject, bucket_arn, bucket_objects_arn,
};
use crate::error::SynthError;
use crate::stack::{StackDefinition, export_output};

/// Optional front-end section: a public static-site bucket plus a deploy
/// identity for the named repository.
#[derive(Debug, Clone, TypedBuilder)]
pub struct FrontendSite {
    /// Source repository (`org/repo`) trusted to deploy the site.
    #[builder(setter(into))]
    pub repository: String,
    /// Trusted branch.
    #[builder(default = "master".to_owned(), setter(into))]
    pub branch: String,
}

/// Properties of the continuous-delivery trust stack.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DeliveryStackProps {
    /// Platform service repository (`org/repo`).
    #[builder(setter(into))]
    pub service_repo: String,
    /// Infrastructure repository (`org/repo`), deployed by the pipeline role.
    #[builder(setter(into))]
    pub deploy_repo: String,
    /// Trusted branch for both repositories.
    #[builder(default = "master".to_owned(), setter(into))]
    pub branch: String,
    /// Front-end site section, when the environment serves one.
    #[builder(default, setter(strip_option))]
    pub frontend: Option<FrontendSite>,
}

/// The continuous-delivery trust stack definition.
#[derive(Debug, Clone)]
pub struct DeliveryStack {
    props: DeliveryStackProps,
}

impl DeliveryStack {
    /// The stack's identifier.
    pub const ID: &'static str = "edu-delivery";

    /// Create the stack from its properties.
    #[must_use]
    pub fn new(props: DeliveryStackProps) -> Self {
        Self { props }
    }
}

/// Trust conditions for a branch-scoped web identity.
fn branch_trust(repository: &str, branch: &str) -> [(String, Value); 2] {
    [
        (OIDC_AUDIENCE_CLAIM.to_owned(), Value::literal(STS_AUDIENCE)),
        (
            OIDC_SUBJECT_CLAIM.to_owned(),
            Value::literal(branch_subject(repository, branch)),
        ),
    ]
}

impl StackDefinition for DeliveryStack {
    fn id(&self) -> &str {
        Self::ID
    }

    fn synth(&self, config: &EnvConfig) -> Result<Template, SynthError> {
        let env = &config.environment;
        let account = &config.account_id;
        let mut template = Template::new(format!(
            "Continuous-delivery trust and deploy roles for the {env} environment"
        ));

        template.add_resource(
            "GitHubOidcProvider",
            iam::OidcProvider {
                url: GITHUB_OIDC_TOKEN_URL.to_owned(),
                client_id_list: vec![STS_AUDIENCE.to_owned()],
                thumbprint_list: vec![GITHUB_OIDC_THUMBPRINT.to_owned()],
            }
            .into_resource()?,
        )?;

        // Deploy role for the platform service repository: remote-command
        // dispatch only.
        let service_role_name = resource_name(Self::ID, "role-git-action", env, account)?;
        template.add_resource(
            "ServiceDeployRole",
            iam::Role {
                role_name: Some(service_role_name.as_str().to_owned()),
                assume_role_policy_document: iam::PolicyDocument::web_identity_assume_role(
                    Value::reference("GitHubOidcProvider"),
                    branch_trust(&self.props.service_repo, &self.props.branch),
                ),
                managed_policy_arns: Vec::new(),
                policies: vec![
                    iam::InlinePolicy {
                        policy_name: "remote-command-dispatch".to_owned(),
                        policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                            actions::REMOTE_COMMAND,
                            vec![Value::literal(WILDCARD)],
                        )]),
                    },
                    iam::InlinePolicy {
                        policy_name: "artifact-store-access".to_owned(),
                        policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                            &config
                                .artifact_store
                                .actions
                                .iter()
                                .map(String::as_str)
                                .collect::<Vec<_>>(),
                            vec![Value::literal(config.artifact_store.resource.as_str())],
                        )]),
                    },
                ],
            }
            .into_resource()?,
        )?;

        // Pipeline role for the infrastructure repository. Deliberately
        // broad: it manages the stacks themselves.
        let pipeline_role_name = resource_name(Self::ID, "role-git-action-pipeline", env, account)?;
        template.add_resource(
            "PipelineDeployRole",
            iam::Role {
                role_name: Some(pipeline_role_name.as_str().to_owned()),
                assume_role_policy_document: iam::PolicyDocument::web_identity_assume_role(
                    Value::reference("GitHubOidcProvider"),
                    branch_trust(&self.props.deploy_repo, &self.props.branch),
                ),
                managed_policy_arns: Vec::new(),
                policies: vec![iam::InlinePolicy {
                    policy_name: "stack-self-management".to_owned(),
                    policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                        actions::PIPELINE_DEPLOY,
                        vec![Value::literal(WILDCARD)],
                    )]),
                }],
            }
            .into_resource()?,
        )?;

        if let Some(frontend) = &self.props.frontend {
            self.add_frontend(&mut template, config, frontend)?;
        }

        template.add_output(
            ExportKey::GitActionRoleName.wire_name(),
            export_output(
                Value::literal(service_role_name.as_str()),
                ExportKey::GitActionRoleName,
            )
            .with_description("CI deploy role for the platform service"),
        )?;

        Ok(template)
    }
}

impl DeliveryStack {
    /// Declare the front-end bucket, its public-read policy, and the deploy
    /// role scoped to it.
    fn add_frontend(
        &self,
        template: &mut Template,
        config: &EnvConfig,
        frontend: &FrontendSite,
    ) -> Result<(), SynthError> {
        let env = &config.environment;
        let account = &config.account_id;
        let site_bucket = bucket_name(Self::ID, "frontend", env, account)?;

        template.add_resource(
            "FrontendBucket",
            s3::Bucket {
                bucket_name: Some(site_bucket.as_str().to_owned()),
                public_access_block_configuration: Some(s3::PublicAccessBlock::disabled()),
                website_configuration: Some(s3::WebsiteConfiguration {
                    index_document: "index.html".to_owned(),
                    error_document: Some("error.html".to_owned()),
                }),
                ..s3::Bucket::default()
            }
            .into_resource()?,
        )?;
        template.add_resource(
            "FrontendBucketPolicy",
            s3::BucketPolicy {
                bucket: Value::reference("FrontendBucket"),
                policy_document: iam::PolicyDocument::new(vec![iam::Statement {
                    effect: "Allow".to_owned(),
                    principal: Some(iam::Principal::Any),
                    action: vec!["s3:GetObject".to_owned()],
                    resource: vec![Value::literal(bucket_objects_arn(site_bucket.as_str()))],
                    condition: None,
                }]),
            }
            .into_resource()?
            .depends_on("FrontendBucket"),
        )?;

        let frontend_role_name = resource_name(Self::ID, "role-git-action-frontend", env, account)?;
        template.add_resource(
            "FrontendDeployRole",
            iam::Role {
                role_name: Some(frontend_role_name.as_str().to_owned()),
                assume_role_policy_document: iam::PolicyDocument::web_identity_assume_role(
                    Value::reference("GitHubOidcProvider"),
                    branch_trust(&frontend.repository, &frontend.branch),
                ),
                managed_policy_arns: Vec::new(),
                policies: vec![iam::InlinePolicy {
                    policy_name: "site-deploy".to_owned(),
                    policy_document: iam::PolicyDocument::new(vec![iam::Statement::allow(
                        actions::SITE_DEPLOY,
                        vec![
                            Value::literal(bucket_arn(site_bucket.as_str())),
                            Value::literal(bucket_objects_arn(site_bucket.as_str())),
                        ],
                    )]),
                }],
            }
            .into_resource()?,
        )?;

        template.add_output(
            ExportKey::FrontendBucketDomain.wire_name(),
            export_output(
                Value::get_att("FrontendBucket", "RegionalDomainName"),
                ExportKey::FrontendBucketDomain,
            )
            .with_description("Regional domain of the front-end content bucket"),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use edustack_core::EnvRegistry;

    use super::*;

    fn props() -> DeliveryStackProps {
        DeliveryStackProps::builder()
            .service_repo("edukit/platform")
            .deploy_repo("edukit/platform-deploy")
            .build()
    }

    fn synth(props: DeliveryStackProps) -> Template {
        let registry = EnvRegistry::builtin();
        let config = registry.resolve("dev").unwrap();
        DeliveryStack::new(props).synth(config).unwrap()
    }

    #[test]
    fn test_should_scope_trust_to_repository_branch() {
        let template = synth(props());
        let json = serde_json::to_value(template.resources()).unwrap();
        let trust = &json["ServiceDeployRole"]["Properties"]["AssumeRolePolicyDocument"]
            ["Statement"][0];
        assert_eq!(trust["Action"], serde_json::json!(["sts:AssumeRoleWithWebIdentity"]));
        assert_eq!(
            trust["Condition"]["StringEquals"]["token.actions.githubusercontent.com:sub"],
            "repo:edukit/platform:ref:refs/heads/master"
        );
        assert_eq!(
            trust["Condition"]["StringEquals"]["token.actions.githubusercontent.com:aud"],
            "sts.amazonaws.com"
        );
        assert_eq!(
            trust["Principal"],
            serde_json::json!({"Federated": {"Ref": "GitHubOidcProvider"}})
        );
    }

    #[test]
    fn test_should_grant_narrow_actions_to_service_role() {
        let template = synth(props());
        let json = serde_json::to_value(template.resources()).unwrap();
        let statement = &json["ServiceDeployRole"]["Properties"]["Policies"][0]
            ["PolicyDocument"]["Statement"][0];
        assert_eq!(
            statement["Action"],
            serde_json::json!([
                "ssm:SendCommand",
                "ssm:GetCommandInvocation",
                "ssm:ListCommandInvocations"
            ])
        );
    }

    #[test]
    fn test_should_grant_artifact_store_access_from_configuration() {
        let template = synth(props());
        let json = serde_json::to_value(template.resources()).unwrap();
        let statement = &json["ServiceDeployRole"]["Properties"]["Policies"][1]
            ["PolicyDocument"]["Statement"][0];
        assert_eq!(
            statement["Resource"][0],
            "arn:aws:s3:::edustack-artifacts-dev-805358685077/*"
        );
    }

    #[test]
    fn test_should_grant_broad_actions_to_pipeline_role() {
        let template = synth(props());
        let json = serde_json::to_value(template.resources()).unwrap();
        let statement = &json["PipelineDeployRole"]["Properties"]["Policies"][0]
            ["PolicyDocument"]["Statement"][0];
        let action_list = statement["Action"].as_array().unwrap();
        assert!(action_list.contains(&serde_json::json!("cloudformation:*")));
        assert!(action_list.contains(&serde_json::json!("iam:PassRole")));
        assert_eq!(statement["Resource"][0], "*");
    }

    #[test]
    fn test_should_omit_frontend_section_by_default() {
        let template = synth(props());
        assert!(!template.resources().contains_key("FrontendBucket"));
        assert_eq!(template.exported_names(), vec!["GitActionRoleName"]);
    }

    #[test]
    fn test_should_declare_frontend_bucket_and_deploy_role_when_enabled() {
        let template = synth(
            DeliveryStackProps::builder()
                .service_repo("edukit/platform")
                .deploy_repo("edukit/platform-deploy")
                .frontend(FrontendSite::builder().repository("edukit/platform-web").build())
                .build(),
        );
        let json = serde_json::to_value(template.resources()).unwrap();
        assert_eq!(
            json["FrontendBucket"]["Properties"]["WebsiteConfiguration"]["IndexDocument"],
            "index.html"
        );
        assert_eq!(
            json["FrontendBucketPolicy"]["Properties"]["PolicyDocument"]["Statement"][0]
                ["Principal"],
            "*"
        );
        let mut exports = template.exported_names();
        exports.sort();
        assert_eq!(exports, vec!["FrontendBucketDomain", "GitActionRoleName"]);
    }
}
