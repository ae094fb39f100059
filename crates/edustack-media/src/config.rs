//! Handler runtime configuration.
//!
//! Configuration comes from the environment variables the media stack wires
//! into each function. Missing required variables fail loudly at startup,
//! before the first invocation is served.

use crate::error::HandlerError;

/// Default output prefix when the stack does not override it.
const DEFAULT_HLS_OUTPUT_PREFIX: &str = "hls_output/";

/// Configuration of the job-submission function.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Role the transcoding service assumes to read and write media.
    pub role_arn: String,
    /// Bucket receiving transcoded output.
    pub processed_bucket: String,
    /// Prefix appended to derived output destinations.
    pub output_prefix: String,
}

impl SubmitConfig {
    /// Load the configuration from the function's environment.
    ///
    /// # Errors
    /// Returns an error naming the first missing required variable.
    pub fn from_env() -> Result<Self, HandlerError> {
        Ok(Self {
            role_arn: required("MEDIA_CONVERT_ROLE_ARN")?,
            processed_bucket: required("S3_BUCKET_PROCESSED_MEDIA")?,
            output_prefix: std::env::var("HLS_OUTPUT_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_HLS_OUTPUT_PREFIX.to_owned()),
        })
    }
}

/// Configuration of the status-callback function.
#[derive(Debug, Clone)]
pub struct CallbackConfig {
    /// Host (address or name) of the platform API.
    pub base_host: String,
}

impl CallbackConfig {
    /// Load the configuration from the function's environment.
    ///
    /// # Errors
    /// Returns an error if `PLATFORM_BASE_URL` is absent or empty.
    pub fn from_env() -> Result<Self, HandlerError> {
        Ok(Self {
            base_host: required("PLATFORM_BASE_URL")?,
        })
    }
}

fn required(name: &'static str) -> Result<String, HandlerError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(HandlerError::MissingEnvVar { name })
}
