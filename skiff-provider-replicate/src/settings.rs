//! Per-model settings controlling the prediction `input` shape.
//!
//! Replicate models are free-form: each one declares its own input schema.
//! Most language models take a `prompt` string and optionally a
//! `system_prompt` string, which is what the defaults produce; settings
//! exist for the models that deviate.

use std::fmt;
use std::sync::Arc;

use skiff_types::Message;

/// Transformer from conversation messages to a single input string.
pub type PromptTransform = Arc<dyn Fn(&[Message]) -> String + Send + Sync>;

/// Settings for a Replicate language model.
///
/// All fields are optional; unset fields fall back to the defaults described
/// in [`crate::mapping`]. Extra input fields are merged into the prediction
/// `input` object, with the prompt and system-prompt keys taking precedence
/// over same-named extras.
#[derive(Clone, Default)]
pub struct ReplicateSettings {
    pub(crate) prompt_key: Option<String>,
    pub(crate) system_prompt_key: Option<String>,
    pub(crate) transform_prompt: Option<PromptTransform>,
    pub(crate) transform_system_prompt: Option<PromptTransform>,
    pub(crate) input: serde_json::Map<String, serde_json::Value>,
}

impl ReplicateSettings {
    /// Create settings with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the input key the transformed prompt is inserted under
    /// (default `"prompt"`).
    #[must_use]
    pub fn prompt_key(mut self, key: impl Into<String>) -> Self {
        self.prompt_key = Some(key.into());
        self
    }

    /// Override the input key the transformed system prompt is inserted
    /// under (default `"system_prompt"`).
    #[must_use]
    pub fn system_prompt_key(mut self, key: impl Into<String>) -> Self {
        self.system_prompt_key = Some(key.into());
        self
    }

    /// Replace the default prompt transformer.
    ///
    /// The transformer receives the full message list and returns the
    /// upstream prompt string.
    #[must_use]
    pub fn transform_prompt(
        mut self,
        transform: impl Fn(&[Message]) -> String + Send + Sync + 'static,
    ) -> Self {
        self.transform_prompt = Some(Arc::new(transform));
        self
    }

    /// Replace the default system-prompt transformer.
    ///
    /// Defaults independently of [`Self::transform_prompt`]: supplying a
    /// custom prompt transformer leaves the system-prompt path on its own
    /// default. Returning an empty string omits the system-prompt key.
    #[must_use]
    pub fn transform_system_prompt(
        mut self,
        transform: impl Fn(&[Message]) -> String + Send + Sync + 'static,
    ) -> Self {
        self.transform_system_prompt = Some(Arc::new(transform));
        self
    }

    /// Add an extra field to the prediction `input` object.
    ///
    /// # Example
    ///
    /// ```
    /// use skiff_provider_replicate::ReplicateSettings;
    ///
    /// let settings = ReplicateSettings::new()
    ///     .input("temperature", 0.2)
    ///     .input("max_new_tokens", 512);
    /// ```
    #[must_use]
    pub fn input(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for ReplicateSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicateSettings")
            .field("prompt_key", &self.prompt_key)
            .field("system_prompt_key", &self.system_prompt_key)
            .field(
                "transform_prompt",
                &self.transform_prompt.as_ref().map(|_| "<fn>"),
            )
            .field(
                "transform_system_prompt",
                &self.transform_system_prompt.as_ref().map(|_| "<fn>"),
            )
            .field("input", &self.input)
            .finish()
    }
}
