//! Streaming example: real-time token output from a Replicate model.
//!
//! Set REPLICATE_API_TOKEN in your environment and run:
//!   cargo run --example streaming -p skiff-provider-replicate

use std::io::Write;

use futures::StreamExt;
use skiff_provider_replicate::Replicate;
use skiff_types::{GenerationRequest, LanguageModel, Message, StreamPart};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = Replicate::from_env()?;

    let request = GenerationRequest {
        model: "meta/llama-3-8b-instruct".into(),
        messages: vec![Message::user("Write a haiku about rivers.")],
    };

    let mut receiver = model.stream(request).await?.receiver;
    while let Some(part) = receiver.next().await {
        match part {
            StreamPart::TextDelta(text) => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            StreamPart::Finish { reason, .. } => {
                println!("\n(finished: {reason:?})");
            }
            StreamPart::Error(msg) => {
                eprintln!("\nstream error: {msg}");
                break;
            }
        }
    }

    Ok(())
}
