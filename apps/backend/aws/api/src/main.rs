#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use lambda_http::{Error, run, tracing};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use whisker_api::{ApiState, construct_router};
use whisker_core::aws::{RekognitionDetector, S3ObjectStorage, load_aws_config};
use whisker_core::{
    CatImageJudge, ClassifierConfig, RecognitionService, RelocationConfig, UuidGenerator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let sentry_endpoint = std::env::var("SENTRY_ENDPOINT").unwrap_or_default();
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

    // Uploads are staged in the bucket whose notifications drive relocation
    let staging_bucket = RelocationConfig::from_env()?.trigger_bucket;
    let classifier = ClassifierConfig::from_env();
    let aws_config = load_aws_config().await;

    let detector = Arc::new(RekognitionDetector::new(&aws_config));
    let recognition = RecognitionService::new(
        detector.clone(),
        detector.clone(),
        Arc::new(S3ObjectStorage::new(&aws_config)),
        Arc::new(UuidGenerator),
        classifier.clone(),
        staging_bucket,
    );
    let judge = CatImageJudge::new(detector, classifier);

    tracing::info!("Cat image API ready");
    let app = construct_router(Arc::new(ApiState::new(recognition, judge)));
    run(app).await
}
