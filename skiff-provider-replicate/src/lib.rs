#![doc = include_str!("../README.md")]

pub mod client;
pub(crate) mod error;
pub mod mapping;
pub mod model;
pub mod settings;
pub(crate) mod streaming;
pub(crate) mod types;

pub use client::Replicate;
pub use model::ModelRef;
pub use settings::ReplicateSettings;

// Re-export skiff-types for convenience
pub use skiff_types::{LanguageModel, ProviderError, StreamHandle, StreamPart};
