//! Streaming completion provider abstraction.

use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::meeting::core::errors::SummarizerResult;
use crate::meeting::provider::request::ProviderRequest;

/// Finite, ordered stream of response text fragments.
pub type ChunkStream<'a> = Pin<Box<dyn Stream<Item = SummarizerResult<String>> + Send + 'a>>;

/// Trait abstraction over text-generation providers.
pub trait CompletionProvider: Send + Sync {
    /// Stream the response to a request. Concatenating the fragments in order
    /// yields the full response.
    fn stream_completion(&self, request: ProviderRequest) -> ChunkStream<'_>;
}

/// Concatenate every fragment of a response stream.
///
/// # Errors
/// Returns the first error yielded by the stream.
pub async fn collect_response(mut stream: ChunkStream<'_>) -> SummarizerResult<String> {
    let mut response = String::new();
    while let Some(chunk) = stream.next().await {
        response.push_str(&chunk?);
    }
    Ok(response)
}
