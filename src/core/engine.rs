use crate::core::identifier::SchemeIdentifier;
use crate::core::Pipeline;
use crate::domain::model::{MatchResult, PublishedVideo, SchemeCode};
use crate::utils::error::{ExplainerError, Result};
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;

/// Request-level flow: validate input, identify the scheme, build and
/// publish its explainer video.
pub struct ExplainerEngine<P: Pipeline> {
    identifier: Arc<SchemeIdentifier>,
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ExplainerEngine<P> {
    pub fn new(identifier: Arc<SchemeIdentifier>, pipeline: P) -> Self {
        Self::new_with_monitoring(identifier, pipeline, false)
    }

    pub fn new_with_monitoring(
        identifier: Arc<SchemeIdentifier>,
        pipeline: P,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            identifier,
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Blank input is rejected here so the caller gets a clear message;
    /// `Absent` becomes [`ExplainerError::NoSchemeMatched`].
    pub fn identify(&self, user_input: &str) -> Result<SchemeCode> {
        if user_input.trim().is_empty() {
            return Err(ExplainerError::InvalidInputError {
                message: "user input is empty".to_string(),
            });
        }

        match self.identifier.identify_scheme(user_input) {
            MatchResult::Matched(m) => {
                tracing::info!("🎯 Identified scheme {} via '{}'", m.code, m.phrase);
                Ok(m.code)
            }
            MatchResult::Fallback(code) => {
                tracing::warn!("No keyword matched, falling back to default scheme {}", code);
                Ok(code)
            }
            MatchResult::Absent => Err(ExplainerError::NoSchemeMatched),
        }
    }

    pub async fn run(&self, user_input: &str) -> Result<PublishedVideo> {
        let code = self.identify(user_input)?;
        self.monitor.log_stage("Identify");

        tracing::info!("⬇️  Downloading stage clips for {}", code);
        let clips = self.pipeline.download(&code).await?;
        self.monitor.log_stage("Download");

        tracing::info!("🎬 Merging {} clips", clips.len());
        let output = self.pipeline.merge(&code, clips).await?;
        self.monitor.log_stage("Merge");

        tracing::info!("⬆️  Uploading {}", output.display());
        let stored = self.pipeline.upload(&code, output).await?;
        self.monitor.log_stage("Upload");
        self.monitor.log_final_stats();

        let scheme_name = self
            .identifier
            .registry()
            .get(&code)
            .and_then(|scheme| scheme.name.clone());

        tracing::info!("✅ Published {} to {}", code, stored.uri);
        Ok(PublishedVideo {
            scheme_code: code,
            scheme_name,
            s3_url: stored.uri,
            public_url: stored.public_url,
        })
    }
}
