use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("LLM error: {message}")]
    LlmError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Storage,
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 退出碼：Low 0, Medium 2 (可重試), High 1, Critical 3
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::ApiError(_) => ErrorCategory::Network,
            AnalyzerError::XmlError(_)
            | AnalyzerError::CsvError(_)
            | AnalyzerError::SerializationError(_)
            | AnalyzerError::ProcessingError { .. }
            | AnalyzerError::ValidationError { .. } => ErrorCategory::Data,
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::MissingConfigError { .. }
            | AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            AnalyzerError::ZipError(_) | AnalyzerError::IoError(_) => ErrorCategory::Storage,
            AnalyzerError::LlmError { .. } => ErrorCategory::Analysis,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // 缺金鑰在任何請求之前就中止，以一般失敗 (1) 結束
        if let AnalyzerError::MissingConfigError { .. } = self {
            return ErrorSeverity::High;
        }
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Analysis => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalyzerError::MissingConfigError { .. } => {
                "Set KIPRIS_API_KEY and GEMINI_API_KEY in the environment or in a .env file"
            }
            AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::ConfigError { .. } => {
                "Check the command-line arguments and the TOML settings file"
            }
            AnalyzerError::ApiError(_) => "Check network connectivity and retry later",
            AnalyzerError::LlmError { .. } => "Check the Gemini API key and quota, then retry",
            AnalyzerError::IoError(_) | AnalyzerError::ZipError(_) => {
                "Make sure the output directory exists and is writable"
            }
            _ => "Re-run with --verbose and inspect the logs",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Storage => format!("Could not write the report: {}", self),
            ErrorCategory::Analysis => format!("Analysis did not complete: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_exits_with_code_one() {
        let err = AnalyzerError::MissingConfigError {
            field: "KIPRIS_API_KEY".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.to_string().contains("KIPRIS_API_KEY"));
        assert!(err.recovery_suggestion().contains(".env"));
    }

    #[test]
    fn test_llm_error_is_retryable_severity() {
        let err = AnalyzerError::LlmError {
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().starts_with("Analysis did not complete"));
    }

    #[test]
    fn test_invalid_settings_stay_critical() {
        let err = AnalyzerError::ConfigValidationError {
            field: "kipris.page_size".to_string(),
            message: "must be between 1 and 500".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
    }
}
