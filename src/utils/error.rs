use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplainerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Dictionary parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Initialization failed: {message}")]
    InitializationError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("Could not match a scheme to your input")]
    NoSchemeMatched,

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("FFmpeg failed: {message}")]
    MergeError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Initialization,
    Input,
    Storage,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExplainerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplainerError::ConfigValidationError { .. }
            | ExplainerError::InvalidConfigValueError { .. }
            | ExplainerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExplainerError::InitializationError { .. } | ExplainerError::CsvError(_) => {
                ErrorCategory::Initialization
            }
            ExplainerError::InvalidInputError { .. } | ExplainerError::NoSchemeMatched => {
                ErrorCategory::Input
            }
            ExplainerError::StorageError { .. } | ExplainerError::IoError(_) => {
                ErrorCategory::Storage
            }
            ExplainerError::MergeError { .. } => ErrorCategory::Media,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Media => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Initialization => {
                ErrorSeverity::Critical
            }
        }
    }

    /// HTTP status code reported by the request adapter.
    pub fn status_code(&self) -> u16 {
        match self {
            ExplainerError::InvalidInputError { .. } => 400,
            ExplainerError::NoSchemeMatched => 404,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the scheme configuration file and environment variables"
            }
            ErrorCategory::Initialization => {
                "Make sure the frequency dictionary exists and has 'term count' lines"
            }
            ErrorCategory::Input => "Describe the scheme you are looking for in a few words",
            ErrorCategory::Storage => "Verify the bucket names, object keys and credentials",
            ErrorCategory::Media => "Make sure ffmpeg is installed and the stage clips are valid",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExplainerError::InvalidInputError { .. } => "Missing user input".to_string(),
            ExplainerError::NoSchemeMatched => self.to_string(),
            ExplainerError::MergeError { .. } => self.to_string(),
            ExplainerError::StorageError { message } => {
                format!("Could not access video storage: {}", message)
            }
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for ExplainerError {
    fn from(e: toml::de::Error) -> Self {
        ExplainerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplainerError>;
