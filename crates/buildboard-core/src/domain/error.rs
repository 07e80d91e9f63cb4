//! Error taxonomy for buildboard.

/// Errors produced while fetching or loading board data.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("http error: {0}")]
    Http(String),

    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        BoardError::Http(err.to_string())
    }
}

/// Result type for buildboard operations.
pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::Config("missing organization".to_string());
        assert!(err.to_string().contains("configuration error"));

        let err = BoardError::Status {
            status: 401,
            url: "https://dev.azure.com/acme/web/_apis/build/builds".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://dev.azure.com/acme/web/_apis/build/builds failed with status 401"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: BoardError = parse.unwrap_err().into();
        assert!(matches!(err, BoardError::Serialization(_)));
    }
}
