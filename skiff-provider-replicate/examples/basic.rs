//! Basic example: buffered generation from a Replicate model.
//!
//! Set REPLICATE_API_TOKEN in your environment and run:
//!   cargo run --example basic -p skiff-provider-replicate

use skiff_provider_replicate::Replicate;
use skiff_types::{GenerationRequest, LanguageModel, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = Replicate::from_env()?;

    let request = GenerationRequest {
        model: "meta/llama-3-8b-instruct".into(),
        messages: vec![
            Message::system("You are a terse assistant."),
            Message::user("What is a skiff?"),
        ],
    };

    let response = model.generate(request).await?;
    println!("{}", response.text);
    println!("(finish reason: {:?})", response.finish_reason);

    Ok(())
}
