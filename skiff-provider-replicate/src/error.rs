//! Internal helpers for mapping HTTP failures to [`ProviderError`].

use skiff_types::ProviderError;

use crate::types::ApiErrorBody;

/// Map a non-2xx initiation response to [`ProviderError::Api`].
///
/// The API reports errors as `{"detail": "..."}`. When the body does not
/// match that shape, the raw text is carried as the detail instead.
pub(crate) fn error_from_response(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.to_string());
    ProviderError::Api {
        status: status.as_u16(),
        detail,
    }
}

/// Map a [`reqwest::Error`] to [`ProviderError::Network`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Network(Box::new(err))
}
