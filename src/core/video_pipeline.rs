use crate::core::{ConfigProvider, MediaMerger, Pipeline, Storage};
use crate::domain::model::{final_video_key, SchemeCode, StoredObject, VideoStage};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Fetches the stage clips of a scheme, concatenates them and publishes the
/// result. Stages run one after another; nothing is retried.
pub struct VideoPipeline<S: Storage, C: ConfigProvider, M: MediaMerger> {
    storage: S,
    config: C,
    merger: M,
}

impl<S: Storage, C: ConfigProvider, M: MediaMerger> VideoPipeline<S, C, M> {
    pub fn new(storage: S, config: C, merger: M) -> Self {
        Self {
            storage,
            config,
            merger,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, M: MediaMerger> Pipeline for VideoPipeline<S, C, M> {
    async fn download(&self, code: &SchemeCode) -> Result<Vec<PathBuf>> {
        let work_dir = self.config.work_dir();
        tokio::fs::create_dir_all(&work_dir).await?;

        let mut local_paths = Vec::with_capacity(VideoStage::ALL.len());
        for stage in VideoStage::ALL {
            let bucket = self.config.stage_bucket(stage);
            let key = stage.object_key(code);

            tracing::debug!("Downloading {} clip {}/{}", stage.label(), bucket, key);
            let data = self.storage.read_file(bucket, &key).await?;

            let path = work_dir.join(&key);
            tokio::fs::write(&path, &data).await?;
            tracing::debug!("Saved {} bytes to {}", data.len(), path.display());
            local_paths.push(path);
        }

        Ok(local_paths)
    }

    async fn merge(&self, code: &SchemeCode, clips: Vec<PathBuf>) -> Result<PathBuf> {
        let output = self.config.work_dir().join(final_video_key(code));
        tracing::debug!("Merging {} clips into {}", clips.len(), output.display());
        self.merger.merge(&clips, &output).await?;
        Ok(output)
    }

    async fn upload(&self, code: &SchemeCode, output: PathBuf) -> Result<StoredObject> {
        let data = tokio::fs::read(&output).await?;
        let bucket = self.config.final_bucket();
        let key = final_video_key(code);

        tracing::debug!("Uploading {} bytes to {}/{}", data.len(), bucket, key);
        let mut stored = self.storage.write_file(bucket, &key, &data).await?;

        if let Some(base) = self.config.public_url_base() {
            stored.public_url = format!("{}/{}", base.trim_end_matches('/'), key);
        }
        Ok(stored)
    }
}
