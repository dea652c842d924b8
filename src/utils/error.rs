use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: String },

    #[error("Source directory is empty: {path}")]
    SourceEmpty { path: String },

    #[error("Access denied to source directory: {path}")]
    SourceAccessDenied { path: String },

    #[error("No valid file found after {attempts} attempts")]
    SelectionExhausted { attempts: usize },

    #[error("Image normalization failed: {message}")]
    NormalizationError { message: String },

    #[error("Image codec error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Publish failed (HTTP {status}): {message}")]
    PublishError { status: u16, message: String },

    #[error("Archive failed: {message}")]
    ArchiveError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    DirectoryAccess,
    ValidationExhausted,
    Normalization,
    Publish,
    Archive,
    Configuration,
    Io,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::AuthenticationError { .. } => ErrorCategory::Authentication,
            BotError::SourceNotFound { .. }
            | BotError::SourceEmpty { .. }
            | BotError::SourceAccessDenied { .. } => ErrorCategory::DirectoryAccess,
            BotError::SelectionExhausted { .. } => ErrorCategory::ValidationExhausted,
            BotError::NormalizationError { .. } | BotError::ImageError(_) => {
                ErrorCategory::Normalization
            }
            BotError::PublishError { .. }
            | BotError::ApiError(_)
            | BotError::SerializationError(_) => ErrorCategory::Publish,
            BotError::ArchiveError { .. } => ErrorCategory::Archive,
            BotError::ConfigError { .. }
            | BotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BotError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Authentication => {
                "Check BLUESKY_USERNAME and BLUESKY_PASSWORD (use an app password)"
            }
            ErrorCategory::DirectoryAccess => {
                "Check that DIRECTORY_SOURCE exists, is readable and contains images"
            }
            ErrorCategory::ValidationExhausted => {
                "Rename source files to 'Subject, Title (Year) - Artist (Medium).jpg'"
            }
            ErrorCategory::Normalization => "Check that the source image is a readable JPEG, PNG or GIF",
            ErrorCategory::Publish => "The file stays in the source directory and will be retried next run",
            ErrorCategory::Archive => {
                "Check write permissions on DIRECTORY_SOURCE and DIRECTORY_DESTINATION"
            }
            ErrorCategory::Configuration => "Fix the environment variables and restart the bot",
            ErrorCategory::Io => "Check filesystem permissions and free disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
