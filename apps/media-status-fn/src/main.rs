//! Status-callback function: an `.m3u8` output landing in the processed
//! bucket triggers one HTTP `PUT` reporting the section as ready.

use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

use edustack_media::{CallbackConfig, handle_status};

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

    let config = CallbackConfig::from_env()?;
    let client = reqwest::Client::new();
    info!(base_host = %config.base_host, "status-callback function ready");

    let client_ref = &client;
    let config_ref = &config;
    run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        handle_status(&event.payload, client_ref, config_ref)
            .await
            .map_err(Error::from)
    }))
    .await
}
