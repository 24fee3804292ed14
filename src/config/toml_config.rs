use crate::core::matcher::NoMatchPolicy;
use crate::core::spelling::{DEFAULT_MAX_EDIT_DISTANCE, DEFAULT_PREFIX_LENGTH};
use crate::core::tokenizer::StopwordSet;
use crate::core::ConfigProvider;
use crate::domain::model::{SchemeCode, SchemeDefinition, VideoStage};
use crate::utils::error::{ExplainerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainerConfig {
    #[serde(default)]
    pub identifier: IdentifierSettings,
    #[serde(default = "builtin_schemes")]
    pub schemes: Vec<SchemeDefinition>,
    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NoMatchPolicyKind {
    #[default]
    None,
    DefaultFallback,
}

impl std::str::FromStr for NoMatchPolicyKind {
    type Err = ExplainerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "none" => Ok(NoMatchPolicyKind::None),
            "default-fallback" => Ok(NoMatchPolicyKind::DefaultFallback),
            other => Err(ExplainerError::InvalidConfigValueError {
                field: "no_match_policy".to_string(),
                value: other.to_string(),
                reason: "Expected 'none' or 'default-fallback'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierSettings {
    /// Term/frequency table; the bundled dictionary is used when unset.
    pub dictionary_path: Option<String>,
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,
    #[serde(default = "default_prefix_length")]
    pub prefix_length: usize,
    #[serde(default)]
    pub no_match_policy: NoMatchPolicyKind,
    pub default_scheme: Option<String>,
    pub stopwords: Option<Vec<String>>,
}

fn default_max_edit_distance() -> usize {
    DEFAULT_MAX_EDIT_DISTANCE
}

fn default_prefix_length() -> usize {
    DEFAULT_PREFIX_LENGTH
}

impl Default for IdentifierSettings {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            no_match_policy: NoMatchPolicyKind::None,
            default_scheme: None,
            stopwords: None,
        }
    }
}

impl IdentifierSettings {
    pub fn no_match_policy(&self) -> Result<NoMatchPolicy> {
        match self.no_match_policy {
            NoMatchPolicyKind::None => Ok(NoMatchPolicy::None),
            NoMatchPolicyKind::DefaultFallback => {
                let code = validation::validate_required_field(
                    "identifier.default_scheme",
                    &self.default_scheme,
                )?;
                Ok(NoMatchPolicy::DefaultFallback(SchemeCode::new(code.trim())))
            }
        }
    }

    pub fn stopword_set(&self) -> StopwordSet {
        match &self.stopwords {
            Some(words) => StopwordSet::new(words),
            None => StopwordSet::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub description_bucket: String,
    pub benefits_bucket: String,
    pub eligibility_bucket: String,
    pub final_bucket: String,
    pub ffmpeg_path: String,
    pub work_dir: Option<String>,
    pub public_url_base: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            description_bucket: "3description3".to_string(),
            benefits_bucket: "3benefits3".to_string(),
            eligibility_bucket: "3eligibility3".to_string(),
            final_bucket: "3final3".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            work_dir: None,
            public_url_base: None,
        }
    }
}

impl ConfigProvider for VideoConfig {
    fn stage_bucket(&self, stage: VideoStage) -> &str {
        match stage {
            VideoStage::Description => &self.description_bucket,
            VideoStage::Benefits => &self.benefits_bucket,
            VideoStage::Eligibility => &self.eligibility_bucket,
        }
    }

    fn final_bucket(&self) -> &str {
        &self.final_bucket
    }

    fn work_dir(&self) -> PathBuf {
        self.work_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    fn public_url_base(&self) -> Option<&str> {
        self.public_url_base.as_deref()
    }
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            identifier: IdentifierSettings::default(),
            schemes: builtin_schemes(),
            video: VideoConfig::default(),
        }
    }
}

impl ExplainerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `dictionary_path` is resolved against the config file's
    /// directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let (Some(dictionary), Some(base)) =
            (config.identifier.dictionary_path.as_ref(), path.parent())
        {
            let dictionary = Path::new(dictionary);
            if dictionary.is_relative() {
                config.identifier.dictionary_path =
                    Some(base.join(dictionary).to_string_lossy().into_owned());
            }
        }

        Ok(config)
    }

    /// Parses configuration from TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        let identifier = &self.identifier;
        if let Some(path) = &identifier.dictionary_path {
            validation::validate_path("identifier.dictionary_path", path)?;
        }
        validation::validate_range(
            "identifier.max_edit_distance",
            identifier.max_edit_distance,
            0,
            3,
        )?;
        validation::validate_positive_number("identifier.prefix_length", identifier.prefix_length, 1)?;

        if let NoMatchPolicy::DefaultFallback(code) = identifier.no_match_policy()? {
            if !self.schemes.iter().any(|s| s.code.trim() == code.as_str()) {
                return Err(ExplainerError::InvalidConfigValueError {
                    field: "identifier.default_scheme".to_string(),
                    value: code.to_string(),
                    reason: "Default scheme must be one of the configured schemes".to_string(),
                });
            }
        }

        if self.schemes.is_empty() {
            return Err(ExplainerError::ConfigValidationError {
                field: "schemes".to_string(),
                message: "at least one scheme must be configured".to_string(),
            });
        }
        for scheme in &self.schemes {
            validation::validate_scheme_code("schemes.code", scheme.code.trim())?;
        }

        let video = &self.video;
        validation::validate_bucket_name("video.description_bucket", &video.description_bucket)?;
        validation::validate_bucket_name("video.benefits_bucket", &video.benefits_bucket)?;
        validation::validate_bucket_name("video.eligibility_bucket", &video.eligibility_bucket)?;
        validation::validate_bucket_name("video.final_bucket", &video.final_bucket)?;
        validation::validate_non_empty_string("video.ffmpeg_path", &video.ffmpeg_path)?;
        if let Some(work_dir) = &video.work_dir {
            validation::validate_path("video.work_dir", work_dir)?;
        }
        if let Some(base) = &video.public_url_base {
            validation::validate_url("video.public_url_base", base)?;
        }

        Ok(())
    }

    pub fn scheme_name(&self, code: &SchemeCode) -> Option<&str> {
        self.schemes
            .iter()
            .find(|s| s.code.trim() == code.as_str())
            .and_then(|s| s.name.as_deref())
    }
}

impl Validate for ExplainerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()?;
        tracing::info!("✅ Scheme configuration validation passed");
        Ok(())
    }
}

/// Agricultural schemes served by the explainer, in match-priority order.
pub fn builtin_schemes() -> Vec<SchemeDefinition> {
    let scheme = |code: &str, name: Option<&str>, keywords: &[&str]| SchemeDefinition {
        code: code.to_string(),
        name: name.map(str::to_string),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    };

    vec![
        scheme(
            "AIF",
            Some("Agricultural Infrastructure Fund"),
            &[
                "aif",
                "agricultural infrastructure",
                "post-harvest",
                "loan",
                "machine",
                "modernize",
                "50 lakh",
                "2 crore",
            ],
        ),
        scheme(
            "PKKKY",
            Some("Prakritik Kheti Khushhal Kisan Yojana"),
            &[
                "prakritik",
                "natural",
                "zero-budget",
                "organic",
                "cow dung",
                "cow urine",
                "non-chemical",
                "environment",
            ],
        ),
        scheme(
            "FIS",
            Some("Flow Irrigation Scheme"),
            &[
                "flow",
                "irrigation",
                "borewell",
                "sloped",
                "dry",
                "remote",
                "water",
                "subsidy",
                "terrain",
            ],
        ),
        scheme(
            "RKPY",
            Some("Rajya Krishi Yantrikaran Programme"),
            &[
                "yantrikaran",
                "mechanization",
                "machine",
                "tiller",
                "modern equipment",
                "custom hiring",
                "subsidy",
                "tools",
            ],
        ),
        scheme(
            "JSKKBY",
            Some("Jal Se Krishi Ko Bal Yojana"),
            &[
                "jal",
                "bal",
                "rainwater",
                "harvesting",
                "solar pump",
                "lift",
                "irrigation",
                "tribal",
                "stored water",
            ],
        ),
        scheme(
            "HIMUY",
            None,
            &[
                "unnati",
                "micro-enterprise",
                "skill",
                "tailoring",
                "carpentry",
                "sc",
                "bpl",
                "training",
                "income",
                "livelihood",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ExplainerConfig::from_toml_str("").unwrap();

        assert_eq!(config.schemes.len(), 6);
        assert_eq!(config.schemes[0].code, "AIF");
        assert_eq!(config.identifier.max_edit_distance, 2);
        assert_eq!(config.identifier.prefix_length, 7);
        assert_eq!(config.identifier.no_match_policy, NoMatchPolicyKind::None);
        assert_eq!(config.video.final_bucket, "3final3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[identifier]
dictionary_path = "dictionary.txt"
max_edit_distance = 1
no_match_policy = "default-fallback"
default_scheme = "FIS"
stopwords = ["the", "a"]

[[schemes]]
code = "FIS"
name = "Flow Irrigation Scheme"
keywords = ["borewell", "irrigation"]

[[schemes]]
code = "AIF"
keywords = ["loan"]

[video]
final_bucket = "explainers"
ffmpeg_path = "/usr/bin/ffmpeg"
public_url_base = "https://cdn.example.com/videos"
"#;

        let config = ExplainerConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.schemes.len(), 2);
        assert_eq!(config.scheme_name(&"FIS".into()), Some("Flow Irrigation Scheme"));
        assert_eq!(config.scheme_name(&"AIF".into()), None);
        assert_eq!(
            config.identifier.no_match_policy().unwrap(),
            NoMatchPolicy::DefaultFallback("FIS".into())
        );
        assert_eq!(config.identifier.stopword_set().len(), 2);
        assert_eq!(config.video.final_bucket(), "explainers");
        assert_eq!(config.video.stage_bucket(VideoStage::Benefits), "3benefits3");
        assert_eq!(
            config.video.public_url_base(),
            Some("https://cdn.example.com/videos")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SCHEME_FINAL_BUCKET", "final-videos");

        let toml_content = r#"
[video]
final_bucket = "${TEST_SCHEME_FINAL_BUCKET}"
eligibility_bucket = "${TEST_SCHEME_UNSET_BUCKET}"
"#;

        let config = ExplainerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.video.final_bucket, "final-videos");
        assert_eq!(config.video.eligibility_bucket, "${TEST_SCHEME_UNSET_BUCKET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fallback_requires_default_scheme() {
        let toml_content = r#"
[identifier]
no_match_policy = "default-fallback"
"#;
        let config = ExplainerConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ExplainerError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_fallback_default_must_be_registered() {
        let toml_content = r#"
[identifier]
no_match_policy = "default-fallback"
default_scheme = "MPY"
"#;
        let config = ExplainerConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ExplainerError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let toml_content = r#"
[identifier]
no_match_policy = "best-guess"
"#;
        assert!(matches!(
            ExplainerConfig::from_toml_str(toml_content),
            Err(ExplainerError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "default-fallback".parse::<NoMatchPolicyKind>().unwrap(),
            NoMatchPolicyKind::DefaultFallback
        );
        assert_eq!("none".parse::<NoMatchPolicyKind>().unwrap(), NoMatchPolicyKind::None);
        assert!("always".parse::<NoMatchPolicyKind>().is_err());
    }

    #[test]
    fn test_from_file_resolves_dictionary_next_to_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[identifier]\ndictionary_path = \"words.txt\"").unwrap();

        let config = ExplainerConfig::from_file(file.path()).unwrap();
        let expected = file.path().parent().unwrap().join("words.txt");
        assert_eq!(
            config.identifier.dictionary_path.as_deref(),
            Some(expected.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ExplainerConfig::from_file("/nonexistent/scheme-explainer.toml"),
            Err(ExplainerError::IoError(_))
        ));
    }

    #[test]
    fn test_work_dir_defaults_to_temp_dir() {
        let video = VideoConfig::default();
        assert_eq!(video.work_dir(), std::env::temp_dir());
    }
}
