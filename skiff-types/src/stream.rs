//! Streaming part types for incremental language-model responses.

use std::pin::Pin;

use futures::Stream;

use crate::types::{FinishReason, TokenUsage};

/// A part emitted during streaming generation.
///
/// Parts arrive in upstream order. A well-formed stream is zero or more
/// [`StreamPart::TextDelta`]s followed by exactly one terminal part
/// ([`StreamPart::Finish`] or [`StreamPart::Error`]); nothing follows a
/// terminal part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPart {
    /// An incremental text fragment.
    TextDelta(String),
    /// The stream finished.
    Finish {
        /// Why generation stopped.
        reason: FinishReason,
        /// Token usage statistics for the whole stream.
        usage: TokenUsage,
    },
    /// The stream failed mid-flight (transport or decode error).
    Error(String),
}

/// Handle to a streaming generation response.
///
/// The underlying stream is pull-based: each `StreamExt::next()` call is a
/// suspension point, and dropping the handle stops consumption (and with it
/// the upstream transfer) early.
pub struct StreamHandle {
    /// The stream of parts. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = StreamPart> + Send>>,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}
