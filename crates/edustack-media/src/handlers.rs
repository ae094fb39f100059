//! The two handler entry points.

use aws_lambda_events::event::s3::S3Event;
use tracing::{error, info};

use crate::callback::{build_status_request, send_status};
use crate::config::{CallbackConfig, SubmitConfig};
use crate::error::HandlerError;
use crate::event::UploadEvent;
use crate::job::build_job_settings;
use crate::paths::hls_destination;
use crate::response::HandlerResponse;
use crate::transcode::TranscodeService;

/// Handle an `.mp4` upload: derive the output destination, resolve the
/// transcoding endpoint, and submit the fixed HLS job.
///
/// Submission failures are logged and converted to a 500-equivalent
/// response with no job id; there is no retry or dead-lettering here.
///
/// # Errors
/// Returns an error if the event itself cannot be decoded or the service
/// endpoint cannot be resolved.
pub async fn handle_submit(
    event: &S3Event,
    service: &dyn TranscodeService,
    config: &SubmitConfig,
) -> Result<HandlerResponse, HandlerError> {
    let upload = UploadEvent::from_s3_event(event)?;
    let input_url = upload.s3_url();
    let destination = hls_destination(&config.processed_bucket, &upload.key, &config.output_prefix);
    info!(input = %input_url, destination = %destination, "submitting transcode job");

    // Queried once per invocation; the endpoint is account-specific and the
    // handler keeps no state across invocations.
    let endpoint = service.resolve_endpoint().await?;

    let settings = build_job_settings(&input_url, &destination);
    match service.create_job(&endpoint, &config.role_arn, settings).await {
        Ok(job_id) => {
            info!(job_id = %job_id, "transcode job submitted");
            let body = serde_json::json!({
                "message": "HLS transcode job submitted",
                "jobId": job_id,
            });
            Ok(HandlerResponse::ok(body.to_string()))
        }
        Err(e) => {
            error!(error = %e, input = %input_url, "transcode job submission failed");
            let body = serde_json::json!({"error": "Failed to create transcode job"});
            Ok(HandlerResponse::error(body.to_string()))
        }
    }
}

/// Handle an `.m3u8` output landing in the processed bucket: report the
/// owning section as ready with a single HTTP `PUT`.
///
/// # Errors
/// Returns an error if the event cannot be decoded, the section id cannot
/// be extracted, or the request fails; there is no retry.
pub async fn handle_status(
    event: &S3Event,
    client: &reqwest::Client,
    config: &CallbackConfig,
) -> Result<HandlerResponse, HandlerError> {
    let upload = UploadEvent::from_s3_event(event)?;
    let request = build_status_request(client, &config.base_host, &upload.key)?;
    let status = send_status(client, request).await?;
    info!(key = %upload.key, status = status, "section status reported");

    let body = serde_json::json!({"message": "API call completed."});
    Ok(HandlerResponse::ok(body.to_string()))
}
