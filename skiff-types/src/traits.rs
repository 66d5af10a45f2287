//! The [`LanguageModel`] trait implemented by every provider.

use std::future::Future;

use crate::error::ProviderError;
use crate::stream::StreamHandle;
use crate::types::{GenerationRequest, GenerationResponse};

/// A streaming language model.
///
/// Uses RPITIT (return-position `impl Trait` in traits) and is intentionally
/// NOT object-safe; compose with generics (`<M: LanguageModel>`).
///
/// Both operations accept the same structured prompt. `stream` hands back the
/// live part sequence; `generate` drives that same sequence to completion
/// internally and returns the buffered result. Both fail identically on
/// upstream errors.
pub trait LanguageModel: Send + Sync {
    /// Run a request to completion and return the buffered result.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, ProviderError>> + Send;

    /// Start a request and return a handle to the live part stream.
    fn stream(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send;
}
