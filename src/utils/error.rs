use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dataset error: {message}")]
    DatasetError { message: String },
}

impl RelayError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::ClientError(_) => "Check TLS support and the upstream endpoint URL",
            RelayError::IoError(_) => "Check that the file exists and the port is free",
            RelayError::SerializationError(_) | RelayError::DatasetError { .. } => {
                "Check that the dataset is a JSON array of objects with a \"name\" field"
            }
            RelayError::ConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                "Fix the value on the command line or in the config file"
            }
            RelayError::MissingConfigError { .. } => {
                "Export the named variable; the token itself comes from API_TOKEN_DENO or --access-token"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Why an upstream call did not produce a usable payload.
///
/// Success is only ever a 200 with a decodable body; everything else lands here.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream rejected the credential ({0})")]
    Unauthorized(StatusCode),

    #[error("upstream resource not found")]
    NotFound,

    #[error("upstream returned unexpected status {0}")]
    Status(StatusCode),

    #[error("upstream transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("failed to build upstream request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Unauthorized(status),
            StatusCode::NOT_FOUND => UpstreamError::NotFound,
            other => UpstreamError::Status(other),
        }
    }

    /// Upstream status code, when the failure came from an HTTP response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Unauthorized(status) | UpstreamError::Status(status) => Some(*status),
            UpstreamError::NotFound => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout => "timeout",
            UpstreamError::Unauthorized(_) => "unauthorized",
            UpstreamError::NotFound => "not_found",
            UpstreamError::Status(_) => "upstream_status",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Decode(_) => "decode",
            UpstreamError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err)
        }
    }
}

pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;
