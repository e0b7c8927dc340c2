use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No detection: {0}")]
    NoDetection(String),

    #[error("Degenerate region: {width}x{height}")]
    DegenerateRegion { width: f32, height: f32 },

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid filter value: {0}")]
    InvalidFilter(String),

    #[error("Query has no usable signal: {0}")]
    EmptyQuery(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Query parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the caller caused the failure (4xx-equivalent) rather than the service (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Encoding(_)
                | Error::EmptyQuery(_)
                | Error::InvalidDimension { .. }
                | Error::Image(_)
        )
    }

    /// HTTP-style status a boundary layer should report.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_encoding_failure_is_client_visible() {
        let err = Error::Encoding("image encoder unavailable".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_recoverable_region_errors_are_server_side() {
        let err = Error::DegenerateRegion { width: 4.0, height: 120.0 };
        assert_eq!(err.to_string(), "Degenerate region: 4x120");
        assert!(!err.is_client_error());
        assert!(!Error::NoDetection("person".into()).is_client_error());
    }

    #[test]
    fn test_unexpected_failures_are_server_errors() {
        let err = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!err.is_client_error());
        assert_eq!(err.status_code(), 500);
        assert_eq!(Error::Serialization("x".into()).status_code(), 500);
    }
}
