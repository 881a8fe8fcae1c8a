use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Data,
    Storage,
}

impl EtlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) => {
                "Check the roster file for malformed rows or unbalanced quotes"
            }
            EtlError::IoError(_) => {
                "Check that input files exist and the output directory is writable"
            }
            EtlError::SerializationError(_) => {
                "Check that the courses file contains a valid JSON array of course records"
            }
            EtlError::ConfigError { .. } => "Review the configuration file for TOML syntax errors",
            EtlError::ConfigValidationError { .. } => {
                "Fix the reported field in the configuration file"
            }
            EtlError::MissingConfigError { .. } => {
                "Add the missing section to the configuration file or pass the matching CLI flag"
            }
            EtlError::InvalidConfigValueError { .. } => {
                "Adjust the reported value to satisfy the constraint"
            }
            EtlError::ProcessingError { .. } => "Run with --verbose to see per-record details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::CsvError(e) => format!("The roster file could not be processed: {}", e),
            EtlError::IoError(e) => format!("A file could not be read or written: {}", e),
            EtlError::SerializationError(e) => {
                format!("The courses file is not valid JSON: {}", e)
            }
            EtlError::ConfigError { message } => {
                format!("The configuration could not be loaded: {}", message)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            EtlError::ProcessingError { message } => {
                format!("Processing failed: {}", message)
            }
        }
    }
}
