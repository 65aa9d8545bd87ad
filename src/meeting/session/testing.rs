//! Scripted provider used by session tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::sync::Notify;

use crate::meeting::core::errors::SummarizerResult;
use crate::meeting::provider::completion::{ChunkStream, CompletionProvider};
use crate::meeting::provider::request::ProviderRequest;

/// Replays canned responses in order and records every request.
///
/// Successful responses are delivered in two chunks. With a gate set, each
/// call signals `started` and then waits for the gate before responding.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<SummarizerResult<String>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    gate: Option<Arc<Notify>>,
    pub started: Arc<Notify>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<SummarizerResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn ok(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok((*r).to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

fn split_chunks(response: SummarizerResult<String>) -> Vec<SummarizerResult<String>> {
    match response {
        Ok(text) => {
            let half = text.chars().count() / 2;
            let split_at = text.char_indices().nth(half).map_or(text.len(), |(i, _)| i);
            let (head, tail) = text.split_at(split_at);
            vec![Ok(head.to_string()), Ok(tail.to_string())]
        }
        Err(err) => vec![Err(err)],
    }
}

impl CompletionProvider for ScriptedProvider {
    fn stream_completion(&self, request: ProviderRequest) -> ChunkStream<'_> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()));
        let gate = self.gate.clone();
        let started = Arc::clone(&self.started);

        Box::pin(
            futures::stream::once(async move {
                started.notify_one();
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                split_chunks(next)
            })
            .flat_map(futures::stream::iter),
        )
    }
}
