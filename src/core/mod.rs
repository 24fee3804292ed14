pub mod engine;
pub mod identifier;
pub mod matcher;
pub mod normalizer;
pub mod registry;
pub mod spelling;
pub mod tokenizer;
pub mod video_pipeline;

pub use crate::domain::model::{MatchResult, SchemeCode};
pub use crate::domain::ports::{ConfigProvider, MediaMerger, Pipeline, Storage, TextCorrector};
pub use crate::utils::error::Result;
