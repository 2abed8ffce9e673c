use thiserror::Error;

#[derive(Error, Debug)]
pub enum IonError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV row {row}: {message}")]
    ConfigError { row: u64, message: String },

    #[error("prefix list '{name}' has no prefix entries")]
    EmptyPrefixListError { name: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' - {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Login failed: {message}")]
    LoginError { message: String },

    #[error("Platform API error (status {status}): {message}")]
    PlatformError { status: u16, message: String },

    #[error("Unexpected API response: {message}")]
    UnexpectedResponseError { message: String },
}

pub type Result<T> = std::result::Result<T, IonError>;
