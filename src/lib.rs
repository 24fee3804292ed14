pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use adapters::ffmpeg::FfmpegMerger;
pub use config::cli::LocalStorage;
pub use config::toml_config::ExplainerConfig;
pub use core::{engine::ExplainerEngine, identifier::SchemeIdentifier, video_pipeline::VideoPipeline};
pub use utils::error::{ExplainerError, Result};
