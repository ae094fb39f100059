//! The transcoding service seam.
//!
//! Handlers depend on [`TranscodeService`], not on a concrete client, so
//! tests substitute a double and the binary injects a constructed
//! [`MediaConvertService`]. The service endpoint is account-specific and is
//! resolved once per invocation, never cached.

use async_trait::async_trait;
use aws_sdk_mediaconvert::types::JobSettings;
use tracing::{debug, error};

use crate::error::HandlerError;

/// Managed transcoding service operations used by the handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscodeService: Send + Sync {
    /// Resolve the account-specific service endpoint.
    async fn resolve_endpoint(&self) -> Result<String, HandlerError>;

    /// Submit a job and return its id.
    async fn create_job(
        &self,
        endpoint: &str,
        role_arn: &str,
        settings: JobSettings,
    ) -> Result<String, HandlerError>;
}

/// [`TranscodeService`] implementation over the MediaConvert SDK client.
#[derive(Debug, Clone)]
pub struct MediaConvertService {
    config: aws_config::SdkConfig,
}

impl MediaConvertService {
    /// Create the service from a loaded SDK configuration.
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn client(&self) -> aws_sdk_mediaconvert::Client {
        aws_sdk_mediaconvert::Client::new(&self.config)
    }

    fn client_with_endpoint(&self, endpoint: &str) -> aws_sdk_mediaconvert::Client {
        let config = aws_sdk_mediaconvert::config::Builder::from(&self.config)
            .endpoint_url(endpoint)
            .build();
        aws_sdk_mediaconvert::Client::from_conf(config)
    }
}

#[async_trait]
impl TranscodeService for MediaConvertService {
    async fn resolve_endpoint(&self) -> Result<String, HandlerError> {
        let output = self
            .client()
            .describe_endpoints()
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "endpoint discovery failed");
                HandlerError::Service {
                    operation: "DescribeEndpoints",
                    message: e.to_string(),
                }
            })?;

        let endpoint = output
            .endpoints()
            .first()
            .and_then(|e| e.url())
            .map(str::to_owned)
            .ok_or(HandlerError::Service {
                operation: "DescribeEndpoints",
                message: "no endpoints returned".to_owned(),
            })?;

        debug!(endpoint = %endpoint, "resolved transcoding endpoint");
        Ok(endpoint)
    }

    async fn create_job(
        &self,
        endpoint: &str,
        role_arn: &str,
        settings: JobSettings,
    ) -> Result<String, HandlerError> {
        let output = self
            .client_with_endpoint(endpoint)
            .create_job()
            .role(role_arn)
            .settings(settings)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "job submission failed");
                HandlerError::Service {
                    operation: "CreateJob",
                    message: e.to_string(),
                }
            })?;

        output
            .job()
            .and_then(|job| job.id())
            .map(str::to_owned)
            .ok_or(HandlerError::MissingJobId)
    }
}
