use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from '{endpoint}' for postcode {postcode}")]
    HttpStatus {
        status: u16,
        endpoint: String,
        postcode: String,
    },

    #[error("Invalid response from '{endpoint}': {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MetricsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MetricsError::Transport(_) | MetricsError::HttpStatus { .. } => ErrorCategory::Network,
            MetricsError::InvalidResponse { .. } | MetricsError::SerializationError(_) => {
                ErrorCategory::Data
            }
            MetricsError::CsvError(_) | MetricsError::IoError(_) | MetricsError::ChartError { .. } => {
                ErrorCategory::Output
            }
            MetricsError::ConfigValidationError { .. }
            | MetricsError::InvalidConfigValueError { .. }
            | MetricsError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重試即可
            MetricsError::Transport(_) => ErrorSeverity::Medium,
            MetricsError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            MetricsError::HttpStatus { .. } => ErrorSeverity::High,
            MetricsError::InvalidResponse { .. }
            | MetricsError::SerializationError(_)
            | MetricsError::CsvError(_)
            | MetricsError::ChartError { .. } => ErrorSeverity::High,
            MetricsError::IoError(_) => ErrorSeverity::Critical,
            MetricsError::ConfigValidationError { .. }
            | MetricsError::InvalidConfigValueError { .. }
            | MetricsError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MetricsError::Transport(e) if e.is_timeout() => {
                "The API did not answer in time; raise --timeout-secs or try again later".to_string()
            }
            MetricsError::Transport(_) => {
                "Check your network connection and the configured base URL".to_string()
            }
            MetricsError::HttpStatus { status: 401, .. } | MetricsError::HttpStatus { status: 403, .. } => {
                "Check that PROPERTYDATA_API_KEY holds a valid key".to_string()
            }
            MetricsError::HttpStatus { status, .. } if *status >= 500 => {
                "The API is having trouble; try again later".to_string()
            }
            MetricsError::HttpStatus { .. } => {
                "Check the postcode and endpoint names".to_string()
            }
            MetricsError::InvalidResponse { .. } | MetricsError::SerializationError(_) => {
                "Inspect the raw response with probe-endpoint".to_string()
            }
            MetricsError::CsvError(_) | MetricsError::IoError(_) | MetricsError::ChartError { .. } => {
                "Check that the output directory exists and is writable".to_string()
            }
            MetricsError::ConfigValidationError { field, .. }
            | MetricsError::InvalidConfigValueError { field, .. }
            | MetricsError::MissingConfigError { field } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the market-data API: {}", self),
            ErrorCategory::Data => format!("The market-data API returned unusable data: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;
