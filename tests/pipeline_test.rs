use async_trait::async_trait;
use scheme_explainer::config::toml_config::{ExplainerConfig, VideoConfig};
use scheme_explainer::core::MediaMerger;
use scheme_explainer::domain::model::{GenerateVideoResponse, VideoStage};
use scheme_explainer::{
    ExplainerEngine, ExplainerError, LocalStorage, Result, SchemeIdentifier, VideoPipeline,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Concatenates clip bytes and records what it was asked to merge.
#[derive(Clone, Default)]
struct ConcatMerger {
    merged: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

#[async_trait]
impl MediaMerger for ConcatMerger {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        self.merged.lock().unwrap().push(inputs.to_vec());
        let mut data = Vec::new();
        for input in inputs {
            data.extend(tokio::fs::read(input).await?);
        }
        tokio::fs::write(output, data).await?;
        Ok(())
    }
}

struct FailingMerger;

#[async_trait]
impl MediaMerger for FailingMerger {
    async fn merge(&self, _inputs: &[PathBuf], _output: &Path) -> Result<()> {
        Err(ExplainerError::MergeError {
            message: "ffmpeg exited with exit status: 1".to_string(),
        })
    }
}

fn seed_clips(base: &Path, video: &VideoConfig, code: &str) {
    use scheme_explainer::core::ConfigProvider;

    for stage in VideoStage::ALL {
        let dir = base.join(video.stage_bucket(stage));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{}_{}.mp4", code, stage.label())),
            format!("{}|", stage.label()),
        )
        .unwrap();
    }
}

fn video_config(temp_dir: &TempDir) -> VideoConfig {
    VideoConfig {
        work_dir: Some(temp_dir.path().join("work").to_string_lossy().into_owned()),
        ..VideoConfig::default()
    }
}

fn identifier() -> Arc<SchemeIdentifier> {
    Arc::new(SchemeIdentifier::from_config(&ExplainerConfig::default()).unwrap())
}

#[tokio::test]
async fn test_end_to_end_with_local_storage() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage_root = temp_dir.path().join("buckets");
    let video = video_config(&temp_dir);
    seed_clips(&storage_root, &video, "FIS");

    let merger = ConcatMerger::default();
    let pipeline = VideoPipeline::new(LocalStorage::new(&storage_root), video, merger.clone());
    let engine = ExplainerEngine::new(identifier(), pipeline);

    let published = engine.run("I need a borewell for my dry land").await?;

    assert_eq!(published.scheme_code.as_str(), "FIS");
    assert_eq!(published.s3_url, "3final3/FIS_final.mp4");
    assert_eq!(
        published.message(),
        "Final video for FIS uploaded successfully"
    );

    let final_video = std::fs::read(storage_root.join("3final3").join("FIS_final.mp4"))?;
    assert_eq!(final_video, b"DESCRIPTION|BENEFITS|ELIGIBILITY|");

    let merged = merger.merged.lock().unwrap();
    assert_eq!(merged.len(), 1);
    let names: Vec<_> = merged[0]
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["FIS_DESCRIPTION.mp4", "FIS_BENEFITS.mp4", "FIS_ELIGIBILITY.mp4"]
    );
    Ok(())
}

#[tokio::test]
async fn test_public_url_base_is_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage_root = temp_dir.path().join("buckets");
    let video = VideoConfig {
        public_url_base: Some("https://3final3.s3.eu-north-1.amazonaws.com".to_string()),
        ..video_config(&temp_dir)
    };
    seed_clips(&storage_root, &video, "AIF");

    let pipeline = VideoPipeline::new(
        LocalStorage::new(&storage_root),
        video,
        ConcatMerger::default(),
    );
    let engine = ExplainerEngine::new(identifier(), pipeline);

    let response = GenerateVideoResponse::from_result(engine.run("we have 50 lakh").await);
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.public_url.as_deref(),
        Some("https://3final3.s3.eu-north-1.amazonaws.com/AIF_final.mp4")
    );
    assert_eq!(
        response.scheme_name.as_deref(),
        Some("Agricultural Infrastructure Fund")
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_clip_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage_root = temp_dir.path().join("buckets");
    let video = video_config(&temp_dir);
    seed_clips(&storage_root, &video, "AIF");
    std::fs::remove_file(storage_root.join("3benefits3").join("AIF_BENEFITS.mp4")).unwrap();

    let merger = ConcatMerger::default();
    let pipeline = VideoPipeline::new(LocalStorage::new(&storage_root), video, merger.clone());
    let engine = ExplainerEngine::new(identifier(), pipeline);

    let result = engine.run("I need a loan").await;
    assert!(matches!(result, Err(ExplainerError::StorageError { .. })));
    assert!(merger.merged.lock().unwrap().is_empty());
    assert!(!storage_root.join("3final3").exists());
}

#[tokio::test]
async fn test_merge_failure_maps_to_server_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage_root = temp_dir.path().join("buckets");
    let video = video_config(&temp_dir);
    seed_clips(&storage_root, &video, "FIS");

    let pipeline = VideoPipeline::new(LocalStorage::new(&storage_root), video, FailingMerger);
    let engine = ExplainerEngine::new(identifier(), pipeline);

    let response = GenerateVideoResponse::from_result(engine.run("subsidy for a tiller").await);
    assert_eq!(response.status_code, 500);
    assert!(response.error.unwrap().starts_with("FFmpeg failed:"));
    assert!(!storage_root.join("3final3").exists());
}

#[tokio::test]
async fn test_transport_errors_for_blank_and_unmatched_input() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = VideoPipeline::new(
        LocalStorage::new(temp_dir.path()),
        video_config(&temp_dir),
        ConcatMerger::default(),
    );
    let engine = ExplainerEngine::new(identifier(), pipeline);

    let blank = GenerateVideoResponse::from_result(engine.run("   ").await);
    assert_eq!(blank.status_code, 400);
    assert_eq!(blank.error.as_deref(), Some("Missing user input"));

    let unmatched = GenerateVideoResponse::from_result(engine.run("hello world").await);
    assert_eq!(unmatched.status_code, 404);
    assert_eq!(
        unmatched.error.as_deref(),
        Some("Could not match a scheme to your input")
    );
}
