use clap::Parser;
use scheme_explainer::config::toml_config::ExplainerConfig;
use scheme_explainer::utils::error::{ErrorSeverity, ExplainerError};
use scheme_explainer::utils::{logger, validation::Validate};
use scheme_explainer::{
    CliConfig, ExplainerEngine, FfmpegMerger, LocalStorage, SchemeIdentifier, VideoPipeline,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

fn exit_code(e: &ExplainerError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: ExplainerError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", error_report(&e));
    std::process::exit(exit_code(&e));
}

fn error_report(e: &ExplainerError) -> String {
    format!(
        "❌ {}\n💡 Suggestion: {}",
        e.user_friendly_message(),
        e.recovery_suggestion()
    )
}

fn read_user_input() -> io::Result<String> {
    print!("Enter your message about the scheme: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn load_config(cli: &CliConfig) -> Result<ExplainerConfig, ExplainerError> {
    let config = cli.load_explainer_config()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting scheme-explainer CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail("Configuration validation failed", e);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail("Configuration load failed", e),
    };

    let identifier = match SchemeIdentifier::from_config(&config) {
        Ok(identifier) => Arc::new(identifier),
        Err(e) => fail("Scheme identifier initialization failed", e),
    };

    let user_input = match &cli.input {
        Some(input) => input.clone(),
        None => read_user_input()?,
    };

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Local directories stand in for the buckets
    let storage = LocalStorage::new(cli.output_path.clone());
    let merger = FfmpegMerger::new(config.video.ffmpeg_path.clone());
    let pipeline = VideoPipeline::new(storage, config.video.clone(), merger);
    let engine = ExplainerEngine::new_with_monitoring(identifier, pipeline, cli.monitor);

    if cli.identify_only {
        match engine.identify(&user_input) {
            Ok(code) => {
                let name = config.scheme_name(&code).unwrap_or("-");
                println!("Identified Scheme: {} ({})", code, name);
            }
            Err(e) => fail("Scheme identification failed", e),
        }
        return Ok(());
    }

    match engine.run(&user_input).await {
        Ok(video) => {
            tracing::info!("✅ {}", video.message());
            println!("✅ {}", video.message());
            if let Some(name) = &video.scheme_name {
                println!("🏷️  Scheme: {} ({})", video.scheme_code, name);
            }
            println!("📁 Stored at: {}", video.s3_url);
            println!("🔗 URL: {}", video.public_url);
        }
        Err(e) => fail("Explainer video generation failed", e),
    }

    Ok(())
}
