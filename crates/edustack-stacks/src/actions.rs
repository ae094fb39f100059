//! Permission action sets granted by the stack definitions.

/// Read-only parameter-store actions granted to the platform host.
pub const PARAMETER_READ: &[&str] = &[
    "ssm:GetParameter",
    "ssm:GetParameters",
    "ssm:GetParametersByPath",
];

/// Remote-command dispatch actions granted to the CI deploy identity.
pub const REMOTE_COMMAND: &[&str] = &[
    "ssm:SendCommand",
    "ssm:GetCommandInvocation",
    "ssm:ListCommandInvocations",
];

/// Transcoding actions granted to the function execution identity.
pub const MEDIA_CONVERT_SUBMIT: &[&str] = &["mediaconvert:CreateJob", "mediaconvert:DescribeEndpoints"];

/// Object read.
pub const OBJECT_READ: &[&str] = &["s3:GetObject"];

/// Object write.
pub const OBJECT_WRITE: &[&str] = &["s3:PutObject"];

/// Object read and write.
pub const OBJECT_READ_WRITE: &[&str] = &["s3:GetObject", "s3:PutObject"];

/// Full object management for the front-end deploy identity.
pub const SITE_DEPLOY: &[&str] = &[
    "s3:GetObject",
    "s3:PutObject",
    "s3:DeleteObject",
    "s3:ListBucket",
];

/// Pass-role action, granted only with a passed-to-service condition.
pub const PASS_ROLE: &[&str] = &["iam:PassRole"];

/// Broad action set for the deploy-pipeline identity, which manages the
/// stacks themselves and therefore touches most of the account surface.
pub const PIPELINE_DEPLOY: &[&str] = &[
    "cloudformation:*",
    "s3:*",
    "ecr:GetAuthorizationToken",
    "ecr:BatchCheckLayerAvailability",
    "ecr:GetDownloadUrlForLayer",
    "ecr:BatchGetImage",
    "ecr:PutImage",
    "ecr:InitiateLayerUpload",
    "ecr:UploadLayerPart",
    "ecr:CompleteLayerUpload",
    "logs:*",
    "lambda:*",
    "dynamodb:*",
    "apigateway:*",
    "events:*",
    "ssm:*",
    "ec2:Describe*",
    "ec2:CreateSecurityGroup",
    "ec2:AuthorizeSecurityGroupIngress",
    "ec2:AuthorizeSecurityGroupEgress",
    "ec2:RevokeSecurityGroupIngress",
    "ec2:RevokeSecurityGroupEgress",
    "ec2:DeleteSecurityGroup",
    "iam:GetRole",
    "iam:PassRole",
];
