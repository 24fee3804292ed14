use crate::config::toml_config::{ExplainerConfig, NoMatchPolicyKind};
use crate::core::Storage;
use crate::domain::model::StoredObject;
use crate::utils::error::{ExplainerError, Result};
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;
use std::env;

pub const DEFAULT_S3_REGION: &str = "eu-north-1";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub config_path: Option<String>,
    pub s3_region: String,
    pub no_match_policy: Option<NoMatchPolicyKind>,
    pub default_scheme: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let no_match_policy = match env::var("NO_MATCH_POLICY") {
            Ok(value) if !value.trim().is_empty() => Some(value.parse()?),
            _ => None,
        };

        Ok(Self {
            config_path: env::var("SCHEME_CONFIG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            no_match_policy,
            default_scheme: env::var("DEFAULT_SCHEME")
                .ok()
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
        })
    }

    pub fn load_explainer_config(&self) -> Result<ExplainerConfig> {
        let mut config = match &self.config_path {
            Some(path) => ExplainerConfig::from_file(path)?,
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

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(path) = &self.config_path {
            validate_path("SCHEME_CONFIG_PATH", path)?;
        }
        validate_aws_region("S3_REGION", &self.s3_region)?;
        if let Some(code) = &self.default_scheme {
            validate_scheme_code("DEFAULT_SCHEME", code)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    use crate::utils::validation::validate_non_empty_string;

    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ExplainerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    region: String,
}

impl S3Storage {
    pub fn new(client: S3Client, region: String) -> Self {
        Self { client, region }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = match e.into_service_error() {
                    GetObjectError::NoSuchKey(_) => format!("NoSuchKey: s3://{}/{}", bucket, key),
                    err => format!(
                        "Failed to read s3://{}/{}: {}",
                        bucket,
                        key,
                        err.message().unwrap_or("unknown error")
                    ),
                };
                ExplainerError::StorageError { message }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| ExplainerError::StorageError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, bucket: &str, key: &str, data: &[u8]) -> Result<StoredObject> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("video/mp4")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                ExplainerError::StorageError {
                    message: format!(
                        "Failed to write s3://{}/{}: {} {}",
                        bucket,
                        key,
                        err.code().unwrap_or("Unhandled"),
                        err.message().unwrap_or_default()
                    ),
                }
            })?;

        Ok(StoredObject {
            uri: format!("s3://{}/{}", bucket, key),
            public_url: format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket, self.region, key
            ),
        })
    }
}
