use crate::core::MediaMerger;
use crate::utils::error::{ExplainerError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Concatenates clips with ffmpeg's concat demuxer, re-encoding to H.264.
#[derive(Debug, Clone)]
pub struct FfmpegMerger {
    ffmpeg_path: String,
}

impl FfmpegMerger {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Body of the concat list file, one `file '<path>'` line per input.
    pub fn concat_list(inputs: &[PathBuf]) -> String {
        inputs
            .iter()
            .map(|path| {
                let safe_path = path
                    .to_string_lossy()
                    .replace('\\', "/")
                    .replace('\'', r"'\''");
                format!("file '{}'\n", safe_path)
            })
            .collect()
    }

    fn list_path(output: &Path) -> PathBuf {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        output.with_file_name(format!("{}_input_list.txt", stem))
    }
}

impl Default for FfmpegMerger {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait::async_trait]
impl MediaMerger for FfmpegMerger {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        if inputs.is_empty() {
            return Err(ExplainerError::MergeError {
                message: "no input clips to merge".to_string(),
            });
        }

        let list_path = Self::list_path(output);
        tokio::fs::write(&list_path, Self::concat_list(inputs)).await?;

        tracing::debug!(
            "Running {} on {} clips -> {}",
            self.ffmpeg_path,
            inputs.len(),
            output.display()
        );
        // -y: a previous run may have left the output behind
        let result = Command::new(&self.ffmpeg_path)
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c:v", "libx264", "-preset", "ultrafast", "-crf", "23"])
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await;

        let _ = tokio::fs::remove_file(&list_path).await;

        let output_status = result.map_err(|e| ExplainerError::MergeError {
            message: format!("could not start {}: {}", self.ffmpeg_path, e),
        })?;

        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            tracing::error!("ffmpeg stderr: {}", stderr);
            return Err(ExplainerError::MergeError {
                message: format!(
                    "{} exited with {}: {}",
                    self.ffmpeg_path,
                    output_status.status,
                    tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_concat_list_format() {
        let inputs = vec![
            PathBuf::from("/tmp/AIF_DESCRIPTION.mp4"),
            PathBuf::from(r"C:\temp\AIF_BENEFITS.mp4"),
            PathBuf::from("/tmp/it's/AIF_ELIGIBILITY.mp4"),
        ];

        assert_eq!(
            FfmpegMerger::concat_list(&inputs),
            "file '/tmp/AIF_DESCRIPTION.mp4'\n\
             file 'C:/temp/AIF_BENEFITS.mp4'\n\
             file '/tmp/it'\\''s/AIF_ELIGIBILITY.mp4'\n"
        );
    }

    #[test]
    fn test_list_path_sits_next_to_output() {
        assert_eq!(
            FfmpegMerger::list_path(Path::new("/tmp/AIF_final.mp4")),
            PathBuf::from("/tmp/AIF_final_input_list.txt")
        );
    }

    #[test]
    fn test_missing_binary_is_merge_error() {
        let temp_dir = TempDir::new().unwrap();
        let merger = FfmpegMerger::new("/nonexistent/ffmpeg");
        let inputs = vec![temp_dir.path().join("a.mp4")];

        let result =
            tokio_test::block_on(merger.merge(&inputs, &temp_dir.path().join("out.mp4")));
        assert!(matches!(result, Err(ExplainerError::MergeError { .. })));
        assert!(!temp_dir.path().join("out_input_list.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_merge_error() {
        let temp_dir = TempDir::new().unwrap();
        let merger = FfmpegMerger::new("false");
        let inputs = vec![temp_dir.path().join("a.mp4")];

        let result = merger.merge(&inputs, &temp_dir.path().join("out.mp4")).await;
        match result {
            Err(ExplainerError::MergeError { message }) => assert!(message.contains("exited")),
            other => panic!("expected merge error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_inputs_is_merge_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FfmpegMerger::default()
            .merge(&[], &temp_dir.path().join("out.mp4"))
            .await;
        assert!(matches!(result, Err(ExplainerError::MergeError { .. })));
    }
}
