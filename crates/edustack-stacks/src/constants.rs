//! Service principals, trust endpoints, and wire constants shared by the
//! stack definitions.

/// MediaConvert service principal.
pub const MEDIA_CONVERT_SERVICE: &str = "mediaconvert.amazonaws.com";

/// Lambda service principal.
pub const LAMBDA_SERVICE: &str = "lambda.amazonaws.com";

/// EC2 service principal.
pub const EC2_SERVICE: &str = "ec2.amazonaws.com";

/// Audience asserted by CI-issued web identity tokens.
pub const STS_AUDIENCE: &str = "sts.amazonaws.com";

/// GitHub's OIDC token issuer.
pub const GITHUB_OIDC_TOKEN_URL: &str = "https://token.actions.githubusercontent.com";

/// Thumbprint of the GitHub OIDC issuer certificate.
pub const GITHUB_OIDC_THUMBPRINT: &str = "6938fd4d98bab03faadb97b34396831e3780aea1";

/// Claim key carrying the token audience.
pub const OIDC_AUDIENCE_CLAIM: &str = "token.actions.githubusercontent.com:aud";

/// Claim key carrying the token subject.
pub const OIDC_SUBJECT_CLAIM: &str = "token.actions.githubusercontent.com:sub";

/// Upload suffix that triggers job submission.
pub const EXT_MP4: &str = ".mp4";

/// Output suffix that triggers the status callback.
pub const EXT_M3U8: &str = ".m3u8";

/// Managed policy granting SSM agent connectivity to the platform host.
pub const SSM_MANAGED_INSTANCE_CORE_ARN: &str =
    "arn:aws:iam::aws:policy/AmazonSSMManagedInstanceCore";

/// Managed policy granting function log delivery.
pub const LAMBDA_BASIC_EXECUTION_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Wildcard resource locator.
pub const WILDCARD: &str = "*";

/// Build the subject claim a CI token must assert: trust is scoped to one
/// repository branch, nothing finer.
#[must_use]
pub fn branch_subject(repository: &str, branch: &str) -> String {
    format!("repo:{repository}:ref:refs/heads/{branch}")
}

/// Object-level ARN pattern for a bucket known by physical name.
#[must_use]
pub fn bucket_objects_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}/*")
}

/// Bucket-level ARN for a bucket known by physical name.
#[must_use]
pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}")
}
