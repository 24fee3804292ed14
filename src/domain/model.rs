use serde::{Deserialize, Serialize};
use std::fmt;

/// Short unique identifier of a welfare scheme, e.g. `AIF`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeCode(String);

impl SchemeCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemeCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A scheme as authored in configuration, before its phrases are tokenized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeDefinition {
    pub code: String,
    pub name: Option<String>,
    pub keywords: Vec<String>,
}

/// The phrase that decided a match, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeMatch {
    pub code: SchemeCode,
    pub phrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// A keyword phrase was fully contained in the input.
    Matched(SchemeMatch),
    /// Nothing matched and the default-fallback policy supplied this code.
    Fallback(SchemeCode),
    /// Nothing matched and no fallback is configured.
    Absent,
}

impl MatchResult {
    pub fn scheme_code(&self) -> Option<&SchemeCode> {
        match self {
            MatchResult::Matched(m) => Some(&m.code),
            MatchResult::Fallback(code) => Some(code),
            MatchResult::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MatchResult::Absent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoStage {
    Description,
    Benefits,
    Eligibility,
}

impl VideoStage {
    /// Playback order of the explainer.
    pub const ALL: [VideoStage; 3] = [
        VideoStage::Description,
        VideoStage::Benefits,
        VideoStage::Eligibility,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VideoStage::Description => "DESCRIPTION",
            VideoStage::Benefits => "BENEFITS",
            VideoStage::Eligibility => "ELIGIBILITY",
        }
    }

    pub fn object_key(&self, code: &SchemeCode) -> String {
        format!("{}_{}.mp4", code, self.label())
    }
}

pub fn final_video_key(code: &SchemeCode) -> String {
    format!("{}_final.mp4", code)
}

/// Where storage put an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub uri: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishedVideo {
    pub scheme_code: SchemeCode,
    pub scheme_name: Option<String>,
    pub s3_url: String,
    pub public_url: String,
}

impl PublishedVideo {
    pub fn message(&self) -> String {
        format!(
            "Final video for {} uploaded successfully",
            self.scheme_code
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateVideoRequest {
    #[serde(alias = "text")]
    pub user_input: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateVideoResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateVideoResponse {
    pub fn from_result(result: crate::utils::error::Result<PublishedVideo>) -> Self {
        match result {
            Ok(video) => Self {
                status_code: 200,
                message: Some(video.message()),
                scheme_code: Some(video.scheme_code.to_string()),
                scheme_name: video.scheme_name,
                s3_url: Some(video.s3_url),
                public_url: Some(video.public_url),
                error: None,
            },
            Err(e) => Self {
                status_code: e.status_code(),
                message: None,
                scheme_code: None,
                scheme_name: None,
                s3_url: None,
                public_url: None,
                error: Some(e.user_friendly_message()),
            },
        }
    }
}
