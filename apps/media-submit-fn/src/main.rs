//! Job-submission function: an `.mp4` upload triggers an HLS transcode job.
//!
//! The SDK client and configuration are constructed once here and injected
//! into the handler; each invocation is otherwise stateless.

use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

use edustack_media::{MediaConvertService, SubmitConfig, handle_submit};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = SubmitConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let service = MediaConvertService::new(&sdk_config);
    info!(
        processed_bucket = %config.processed_bucket,
        output_prefix = %config.output_prefix,
        "job-submission function ready"
    );

    let service_ref = &service;
    let config_ref = &config;
    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        handle_submit(&event.payload, service_ref, config_ref)
            .await
            .map_err(Error::from)
    }))
    .await
}
