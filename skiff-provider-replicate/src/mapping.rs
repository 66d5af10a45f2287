//! Request mapping from skiff prompts to the predictions API format.
//!
//! A prediction request is `{ version?, input: { ... } }`. The `input`
//! object carries the transformed prompt under a configurable key plus any
//! extra settings fields; the target path depends on whether the model
//! reference pins a version.

use serde_json::Value;
use skiff_types::{ContentPart, Message, Role};

use crate::model::ModelRef;
use crate::settings::ReplicateSettings;

/// Default `input` key for the transformed prompt.
const DEFAULT_PROMPT_KEY: &str = "prompt";
/// Default `input` key for the transformed system prompt.
const DEFAULT_SYSTEM_PROMPT_KEY: &str = "system_prompt";

/// Build the request path and JSON body for creating a prediction.
///
/// Versioned references route to the generic predictions endpoint with the
/// version in the body; unversioned ones to the model-scoped endpoint
/// without a `version` key.
#[must_use]
pub fn to_api_request(
    model: &ModelRef,
    messages: &[Message],
    settings: &ReplicateSettings,
) -> (String, Value) {
    let prompt = match &settings.transform_prompt {
        Some(transform) => transform(messages),
        None => default_prompt(messages),
    };
    let system_prompt = match &settings.transform_system_prompt {
        Some(transform) => transform(messages),
        None => default_system_prompt(messages),
    };

    // Extra settings first; the prompt keys win over same-named extras.
    let mut input = settings.input.clone();
    input.insert(
        settings
            .prompt_key
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT_KEY.to_string()),
        Value::String(prompt),
    );
    if !system_prompt.is_empty() {
        input.insert(
            settings
                .system_prompt_key
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT_KEY.to_string()),
            Value::String(system_prompt),
        );
    }

    let path = match &model.version {
        Some(_) => "/v1/predictions".to_string(),
        None => format!("/v1/models/{}/{}/predictions", model.owner, model.name),
    };

    let mut body = serde_json::json!({ "input": input });
    if let Some(version) = &model.version {
        body["version"] = Value::String(version.clone());
    }

    (path, body)
}

/// Default prompt transform: the text parts of all user and assistant
/// messages, in message order, joined with newlines. System messages are
/// handled separately; tool messages and non-text parts are dropped.
#[must_use]
pub fn default_prompt(messages: &[Message]) -> String {
    collect_text(messages, |role| {
        matches!(role, Role::User | Role::Assistant)
    })
}

/// Default system-prompt transform: the text parts of all system messages,
/// in message order, joined with newlines. Empty when there is no system
/// content, in which case the system-prompt key is omitted entirely.
#[must_use]
pub fn default_system_prompt(messages: &[Message]) -> String {
    collect_text(messages, |role| matches!(role, Role::System))
}

fn collect_text(messages: &[Message], keep: impl Fn(Role) -> bool) -> String {
    let texts: Vec<&str> = messages
        .iter()
        .filter(|msg| keep(msg.role))
        .flat_map(|msg| &msg.content)
        .filter_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            ContentPart::Image { .. } => None,
        })
        .collect();
    texts.join("\n")
}
