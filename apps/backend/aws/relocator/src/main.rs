#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use lambda_runtime::{Error, run, service_fn, tracing};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use whisker_core::aws::{RekognitionDetector, S3ObjectStorage, load_aws_config};
use whisker_core::{CatImageRelocator, ClassifierConfig, RelocationConfig};

mod event_handler;
use event_handler::{EventSource, s3_handler, sqs_handler};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let sentry_endpoint = std::env::var("SENTRY_ENDPOINT").unwrap_or_default();

    // Default to warn level to reduce log noise (errors, warnings, fatals only)
    // Can be overridden with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _sentry_guard = if sentry_endpoint.is_empty() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
            .init();
        None
    } else {
        let guard = sentry::init((
            sentry_endpoint,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 0.3,
                ..Default::default()
            },
        ));
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
            .with(sentry_tracing::layer())
            .init();
        Some(guard)
    };

    let relocation = RelocationConfig::from_env()?;
    let classifier = ClassifierConfig::from_env();
    let aws_config = load_aws_config().await;

    let relocator = CatImageRelocator::new(
        Arc::new(RekognitionDetector::new(&aws_config)),
        Arc::new(S3ObjectStorage::new(&aws_config)),
        classifier,
        relocation,
    );
    let relocator = &relocator;

    match EventSource::from_env() {
        EventSource::S3 => run(service_fn(move |event| s3_handler(event, relocator))).await,
        EventSource::Sqs => run(service_fn(move |event| sqs_handler(event, relocator))).await,
    }
}
