//! Replicate API client struct and builder.

use futures::StreamExt;
use skiff_types::{
    FinishReason, GenerationRequest, GenerationResponse, LanguageModel, ProviderError,
    StreamHandle, StreamPart, TokenUsage,
};

use crate::error::{error_from_response, map_reqwest_error};
use crate::mapping::to_api_request;
use crate::model::ModelRef;
use crate::settings::ReplicateSettings;
use crate::streaming::stream_prediction;
use crate::types::Prediction;

/// Default Replicate API base URL.
const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Environment variable read by [`Replicate::from_env`].
pub const API_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

/// Client for the Replicate predictions API.
///
/// Implements [`LanguageModel`] for use anywhere a model is accepted. The
/// credential is passed in explicitly; [`Replicate::from_env`] is the
/// opt-in environment path.
///
/// # Example
///
/// ```no_run
/// use skiff_provider_replicate::{Replicate, ReplicateSettings};
///
/// let model = Replicate::new("r8_...")
///     .settings(ReplicateSettings::new().input("max_new_tokens", 512));
/// ```
pub struct Replicate {
    /// Replicate API token (`REPLICATE_API_TOKEN`).
    pub(crate) api_token: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Per-model input settings.
    pub(crate) settings: ReplicateSettings,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl std::fmt::Debug for Replicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replicate")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Replicate {
    /// Create a new client with the given API token and sensible defaults.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.into(),
            settings: ReplicateSettings::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the `REPLICATE_API_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredential`] when the variable is
    /// unset, before any model can be built.
    pub fn from_env() -> Result<Self, ProviderError> {
        let token = std::env::var(API_TOKEN_ENV)
            .map_err(|_| ProviderError::MissingCredential(API_TOKEN_ENV.into()))?;
        Ok(Self::new(token))
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or an API proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-model input settings.
    #[must_use]
    pub fn settings(mut self, settings: ReplicateSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl LanguageModel for Replicate {
    /// Run a request to completion.
    ///
    /// Internally consumes the same stream as [`LanguageModel::stream`],
    /// concatenating text deltas until the first terminal part.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, ProviderError>> + Send {
        async move {
            let handle = self.stream(request).await?;
            let mut receiver = handle.receiver;

            let mut text = String::new();
            while let Some(part) = receiver.next().await {
                match part {
                    StreamPart::TextDelta(delta) => text.push_str(&delta),
                    StreamPart::Finish { .. } => break,
                    StreamPart::Error(msg) => return Err(ProviderError::Stream(msg)),
                }
            }

            Ok(GenerationResponse {
                text,
                finish_reason: FinishReason::Stop,
                usage: TokenUsage::default(),
            })
        }
    }

    /// Create a prediction and open its output stream.
    ///
    /// Two sequential calls: a POST creating the prediction job, then a GET
    /// on the returned stream URL requesting an event-stream response.
    fn stream(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send {
        let base_url = self.base_url.clone();
        let api_token = self.api_token.clone();
        let settings = self.settings.clone();
        let http_client = self.client.clone();

        async move {
            // Fails fast on a malformed reference, before any network call.
            let model: ModelRef = request.model.parse()?;
            let (path, body) = to_api_request(&model, &request.messages, &settings);
            let url = format!("{base_url}{path}");

            tracing::debug!(url = %url, model = %model, "creating prediction");

            let response = http_client
                .post(&url)
                .header("authorization", format!("Bearer {api_token}"))
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let response_text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(error_from_response(status, &response_text));
            }

            let prediction: Prediction = serde_json::from_str(&response_text).map_err(|e| {
                ProviderError::InvalidResponse(format!("prediction response: {e}"))
            })?;

            tracing::debug!(url = %prediction.urls.stream, "opening prediction stream");

            let stream_response = http_client
                .get(&prediction.urls.stream)
                .header("accept", "text/event-stream")
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let stream_status = stream_response.status();
            if !stream_status.is_success() {
                let body_text = stream_response.text().await.map_err(map_reqwest_error)?;
                return Err(ProviderError::Stream(format!(
                    "opening stream failed (HTTP {stream_status}): {body_text}"
                )));
            }

            Ok(stream_prediction(stream_response))
        }
    }
}

// Required to satisfy the `use std::future::Future` in the trait impl bodies
use std::future::Future;
