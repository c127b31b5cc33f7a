use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum VtonError {
    ConfigError(String),
    AuthenticationError(String),
    MissingInputFile(PathBuf),
    RequestError(String),
    ApiError { status: u16, body: String },
    DecodeError(String),
    IoError(String),
}

impl fmt::Display for VtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VtonError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            VtonError::AuthenticationError(msg) => write!(f, "Authentication error: {}", msg),
            VtonError::MissingInputFile(path) => {
                write!(f, "Input image not found: {}", path.display())
            }
            VtonError::RequestError(msg) => write!(f, "Request error: {}", msg),
            VtonError::ApiError { status, body } => write!(f, "API error: {} - {}", status, body),
            VtonError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            VtonError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for VtonError {}

impl From<std::io::Error> for VtonError {
    fn from(err: std::io::Error) -> Self {
        VtonError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VtonError>;
