use crate::error::*;
use std::fmt::Display;
use tracing::{debug, error};

/// Logging and user-facing rendering shared by every error type in the crate.
pub trait ErrorExt: Display {
    /// Stable identifier, e.g. `SEARCH_TIMEOUT`.
    fn error_code(&self) -> &'static str;

    /// Short sentence suitable for the console.
    fn user_friendly_message(&self) -> String;

    fn log_error(&self) -> &Self {
        error!(code = self.error_code(), "{}", self);
        self
    }
}

impl ErrorExt for CoreError {
    fn error_code(&self) -> &'static str {
        match self {
            CoreError::SearchApi(_) => "SEARCH_API",
            CoreError::Llm(_) => "LLM",
            CoreError::KeywordApi(_) => "KEYWORD_API",
            CoreError::Config(_) => "CONFIG",
            CoreError::Io(_) => "IO",
            CoreError::Serialization(_) => "SERIALIZATION",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::SearchApi(e) => e.user_friendly_message(),
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::KeywordApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Io(e) => format!("Could not read or write a local file: {}", e),
            CoreError::Serialization(_) => "Could not encode the report as JSON.".to_string(),
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
        }
    }

    fn log_error(&self) -> &Self {
        error!(code = self.error_code(), "{}", self);
        match self {
            CoreError::SearchApi(e) => debug!(details = ?e, "search API failure"),
            CoreError::Llm(e) => debug!(details = ?e, "LLM failure"),
            CoreError::KeywordApi(e) => debug!(details = ?e, "keyword API failure"),
            CoreError::Config(e) => debug!(details = ?e, "configuration failure"),
            _ => {}
        }
        self
    }
}

impl ErrorExt for SearchApiError {
    fn error_code(&self) -> &'static str {
        match self {
            SearchApiError::AuthenticationFailed { .. } => "SEARCH_AUTH_FAILED",
            SearchApiError::MissingCredential { .. } => "SEARCH_MISSING_CREDENTIAL",
            SearchApiError::RateLimited => "SEARCH_RATE_LIMIT",
            SearchApiError::RequestTimeout { .. } => "SEARCH_TIMEOUT",
            SearchApiError::InvalidResponse { .. } => "SEARCH_INVALID_RESPONSE",
            SearchApiError::ServerError { .. } => "SEARCH_SERVER_ERROR",
            SearchApiError::UnexpectedStatus { .. } => "SEARCH_UNEXPECTED_STATUS",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SearchApiError::AuthenticationFailed { .. } => {
                "Twitter search authentication failed. Please check TWITTER_API_KEY.".to_string()
            }
            SearchApiError::MissingCredential { name } => {
                format!("Twitter search credential '{}' is not set.", name)
            }
            SearchApiError::RateLimited => {
                "Too many search requests. Please wait before running again.".to_string()
            }
            SearchApiError::RequestTimeout { seconds } => {
                format!("Twitter search timed out after {} seconds.", seconds)
            }
            _ => "Twitter search failed. Please try again later.".to_string(),
        }
    }
}

impl ErrorExt for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            LlmError::AuthenticationFailed { .. } => "LLM_AUTH_FAILED",
            LlmError::InvalidApiKey { .. } => "LLM_INVALID_API_KEY",
            LlmError::RateLimited { .. } => "LLM_RATE_LIMIT",
            LlmError::ServiceUnavailable { .. } => "LLM_SERVICE_UNAVAILABLE",
            LlmError::RequestTimeout { .. } => "LLM_TIMEOUT",
            LlmError::RequestRejected { .. } => "LLM_REQUEST_REJECTED",
            LlmError::InvalidResponseFormat { .. } => "LLM_INVALID_RESPONSE",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::AuthenticationFailed { provider } | LlmError::InvalidApiKey { provider } => {
                format!("{} rejected the API key. Please check CLAUDE_API_KEY.", provider)
            }
            LlmError::RateLimited { provider } => {
                format!("Rate limit exceeded for {}.", provider)
            }
            LlmError::ServiceUnavailable { provider, .. } => {
                format!("{} is temporarily unavailable. Please try again later.", provider)
            }
            LlmError::RequestTimeout { provider } => {
                format!("{} did not answer in time.", provider)
            }
            _ => "AI analysis failed. Please try again later.".to_string(),
        }
    }
}

impl ErrorExt for KeywordApiError {
    fn error_code(&self) -> &'static str {
        match self {
            KeywordApiError::AuthenticationFailed { .. } => "KEYWORD_AUTH_FAILED",
            KeywordApiError::RateLimited => "KEYWORD_RATE_LIMIT",
            KeywordApiError::RequestTimeout { .. } => "KEYWORD_TIMEOUT",
            KeywordApiError::InvalidResponse { .. } => "KEYWORD_INVALID_RESPONSE",
            KeywordApiError::ServerError { .. } => "KEYWORD_SERVER_ERROR",
            KeywordApiError::UnexpectedStatus { .. } => "KEYWORD_UNEXPECTED_STATUS",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            KeywordApiError::AuthenticationFailed { login } => format!(
                "DataForSEO rejected the credentials for {}. Please check DATAFORSEO_LOGIN and DATAFORSEO_PASSWORD.",
                login
            ),
            KeywordApiError::RateLimited => {
                "Too many keyword requests. Please wait before running again.".to_string()
            }
            KeywordApiError::RequestTimeout { seconds } => {
                format!("Keyword analysis timed out after {} seconds.", seconds)
            }
            _ => "Keyword analysis failed. Please try again later.".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED",
            ConfigError::Unreadable { .. } => "CONFIG_UNREADABLE",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("'{}' is not a valid value for {}.", value, field)
            }
            ConfigError::PermissionDenied { path } => {
                format!("Cannot read configuration file '{}': permission denied.", path)
            }
            ConfigError::Unreadable { path, source } => {
                format!("Cannot read configuration file '{}': {}", path, source)
            }
            ConfigError::Parse(e) => format!("Configuration file is not valid TOML: {}", e),
        }
    }
}

/// Routes [`CoreError`]s to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        debug!(code = error.error_code(), "{}", error.user_friendly_message());
    }
}
