//! Wire types for the Replicate predictions API.

use serde::Deserialize;

/// A created prediction job, as returned by the predictions endpoints.
///
/// Only the fields this provider consumes are modeled; the full resource
/// carries more. Deserialization failure means the response does not match
/// the expected schema and the call fails.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Prediction {
    /// Output fragments already produced at creation time, if any. Null
    /// until the model starts producing output; unused by the streaming
    /// flow but part of the required schema.
    #[allow(dead_code)]
    pub output: Option<Vec<String>>,
    /// Endpoint URLs for this prediction.
    pub urls: PredictionUrls,
}

/// URLs attached to a prediction resource.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PredictionUrls {
    /// Server-sent-event endpoint for incremental output.
    pub stream: String,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    /// Human-readable error description.
    pub detail: String,
}
