use thiserror::Error;

/// calheat error types
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// A date-like input could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Date arithmetic left the representable calendar
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    /// Options failed validation
    #[error("config error: {0}")]
    InvalidConfig(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for calheat
pub type Result<T> = std::result::Result<T, HeatmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeatmapError::InvalidDate("not-a-date".into());
        assert_eq!(err.to_string(), "invalid date: not-a-date");
    }

    #[test]
    fn test_config_error_display() {
        let err = HeatmapError::InvalidConfig("weekStartDay must be 0-6".into());
        assert_eq!(err.to_string(), "config error: weekStartDay must be 0-6");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HeatmapError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: HeatmapError = json_err.into();
        assert!(err.to_string().starts_with("json error"));
    }
}
