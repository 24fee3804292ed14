use crate::domain::model::{SchemeCode, StoredObject, VideoStage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn read_file(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<StoredObject>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn stage_bucket(&self, stage: VideoStage) -> &str;
    fn final_bucket(&self) -> &str;
    fn work_dir(&self) -> PathBuf;
    /// Overrides the URL reported by storage when set.
    fn public_url_base(&self) -> Option<&str>;
}

/// Approximate spelling correction applied before tokenization.
pub trait TextCorrector: Send + Sync {
    fn correct(&self, text: &str) -> String;
}

#[async_trait]
pub trait MediaMerger: Send + Sync {
    /// Concatenates `inputs` in order into a single file at `output`.
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn download(&self, code: &SchemeCode) -> Result<Vec<PathBuf>>;
    async fn merge(&self, code: &SchemeCode, clips: Vec<PathBuf>) -> Result<PathBuf>;
    async fn upload(&self, code: &SchemeCode, output: PathBuf) -> Result<StoredObject>;
}
