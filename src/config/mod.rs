pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::{ExplainerConfig, NoMatchPolicyKind};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "scheme-explainer")]
#[command(about = "Identify a welfare scheme from free text and publish its explainer video")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file; built-in schemes are used when omitted")]
    pub config: Option<String>,

    #[arg(long, help = "User message; read from stdin when omitted")]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Print the identified scheme and stop")]
    pub identify_only: bool,

    #[arg(long, value_enum)]
    pub no_match_policy: Option<NoMatchPolicyKind>,

    #[arg(long, help = "Scheme code used by the default-fallback policy")]
    pub default_scheme: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log memory and timing per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file (or the built-in defaults) and applies
    /// command-line overrides on top.
    pub fn load_explainer_config(&self) -> Result<ExplainerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📄 Loading configuration from {}", path);
                ExplainerConfig::from_file(path)?
            }
            None => ExplainerConfig::default(),
        };

        if let Some(policy) = self.no_match_policy {
            config.identifier.no_match_policy = policy;
        }
        if let Some(code) = &self.default_scheme {
            config.identifier.default_scheme = Some(code.clone());
        }
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        validate_path("output_path", &self.output_path)?;
        if let Some(code) = &self.default_scheme {
            validate_scheme_code("default_scheme", code)?;
        }

        tracing::info!("✅ CLI configuration validation passed");
        Ok(())
    }
}
