use thiserror::Error;

/// Startup configuration failures. Any of these keeps the TMDB client from
/// being built, so no section is ever mounted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TMDB API key is not configured. Set TMDB_API_KEY or enter a key below.")]
    MissingApiKey,

    #[error("invalid TMDB base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config IO error: {0}")]
    Io(String),

    #[error("config serialization error: {0}")]
    Serialize(String),
}

/// Failures of a single remote call. Cloneable so results can travel inside
/// `Message`s.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("TMDB API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    DataShape(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

/// Presentation failures. Only the shell's error boundary handles these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("section {0} is enabled but was never mounted")]
    MissingSection(String),

    #[error("view panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_includes_code() {
        // Arrange
        let error = FetchError::Status {
            status: 401,
            message: String::from("Invalid API key"),
        };

        // Act
        let message = error.to_string();

        // Assert
        assert!(message.contains("HTTP 401"));
        assert!(message.contains("Invalid API key"));
    }

    #[test]
    fn test_missing_api_key_mentions_env_var() {
        assert!(ConfigError::MissingApiKey
            .to_string()
            .contains("TMDB_API_KEY"));
    }
}
