use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use scheme_explainer::config::toml_config::VideoConfig;
use scheme_explainer::domain::model::{GenerateVideoRequest, GenerateVideoResponse};
use scheme_explainer::utils::{logger, validation::Validate};
use scheme_explainer::{
    ExplainerEngine, FfmpegMerger, LambdaConfig, S3Storage, SchemeIdentifier, VideoPipeline,
};
use std::sync::Arc;

type LambdaEngine = ExplainerEngine<VideoPipeline<S3Storage, VideoConfig, FfmpegMerger>>;

async fn function_handler(
    engine: &LambdaEngine,
    event: LambdaEvent<GenerateVideoRequest>,
) -> Result<GenerateVideoResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Handling generate-video request");

    let user_input = event.payload.user_input.unwrap_or_default();
    let result = engine.run(&user_input).await;

    if let Err(e) = &result {
        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
    }

    let response = GenerateVideoResponse::from_result(result);
    tracing::info!(status_code = response.status_code, "Request completed");
    Ok(response)
}

async fn build_engine() -> Result<LambdaEngine, Error> {
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let config = lambda_config.load_explainer_config()?;
    config.validate()?;

    // Dictionary and registry are loaded once per cold start.
    let identifier = Arc::new(SchemeIdentifier::from_config(&config)?);

    // S3 client pinned to the configured region
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let storage = S3Storage::new(s3_client, lambda_config.s3_region.clone());
    let merger = FfmpegMerger::new(config.video.ffmpeg_path.clone());
    let pipeline = VideoPipeline::new(storage, config.video, merger);

    Ok(ExplainerEngine::new(identifier, pipeline))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let engine = build_engine().await?;
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<GenerateVideoRequest>| async move {
        function_handler(engine, event).await
    }))
    .await
}
