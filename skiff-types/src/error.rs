//! Error types shared by all skiff providers.

/// Errors from language-model provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The model reference string does not match the provider's grammar.
    #[error("invalid model reference `{reference}`: expected `owner/name` or `owner/name:version`")]
    InvalidModelRef {
        /// The offending reference string.
        reference: String,
    },
    /// A required credential was not provided.
    #[error("missing credential: environment variable `{0}` is not set")]
    MissingCredential(String),
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The upstream API rejected the request.
    #[error("upstream error (HTTP {status}): {detail}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The upstream error detail message.
        detail: String,
    },
    /// The upstream response did not match the expected schema.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Opening or reading the output stream failed.
    #[error("stream error: {0}")]
    Stream(String),
}

impl ProviderError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_model_ref_names_string_and_grammar() {
        let err = ProviderError::InvalidModelRef {
            reference: "no-slash".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("no-slash"));
        assert!(msg.contains("owner/name"));
        assert!(msg.contains("owner/name:version"));
    }

    #[test]
    fn missing_credential_names_variable() {
        let err = ProviderError::MissingCredential("API_TOKEN".into());
        assert!(err.to_string().contains("API_TOKEN"));
    }

    #[test]
    fn api_error_carries_detail() {
        let err = ProviderError::Api {
            status: 429,
            detail: "rate limited".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn retryability() {
        assert!(ProviderError::Network("reset".to_string().into()).is_retryable());
        assert!(
            ProviderError::Api {
                status: 429,
                detail: String::new()
            }
            .is_retryable()
        );
        assert!(
            ProviderError::Api {
                status: 503,
                detail: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::Api {
                status: 401,
                detail: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::InvalidModelRef {
                reference: "x".into()
            }
            .is_retryable()
        );
        assert!(!ProviderError::InvalidResponse("bad json".into()).is_retryable());
    }
}
