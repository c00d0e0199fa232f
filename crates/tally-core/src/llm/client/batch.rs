//! Batch dispatch with a global concurrency cap

use super::types::LlmGateway;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::messages::{ChatMessage, ChatOverrides};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

impl LlmGateway {
    /// Run many independent conversations through [`LlmGateway::chat`].
    ///
    /// Inputs are admitted chunk by chunk, `batch_size` at a time: a chunk
    /// is admitted only once every item of the previous chunk holds one of
    /// the `max_concurrent` slots shared by the whole batch. Admitted items
    /// run concurrently. The output has one entry per input, at the same
    /// position; a failed item does not affect the others.
    #[instrument(skip(self, conversations, overrides), fields(items = conversations.len()))]
    pub async fn chat_batch(
        &self,
        conversations: &[Vec<ChatMessage>],
        overrides: Option<&ChatOverrides>,
    ) -> Vec<GatewayResult<String>> {
        if conversations.is_empty() {
            return Vec::new();
        }

        let (batch_size, max_concurrent) = {
            let config = self.config.read();
            (config.batch_size.max(1), config.max_concurrent.max(1))
        };
        let slots = Semaphore::new(max_concurrent);
        let mut results: Vec<Option<GatewayResult<String>>> =
            conversations.iter().map(|_| None).collect();
        let mut in_flight = FuturesUnordered::new();

        for (chunk_index, chunk) in conversations.chunks(batch_size).enumerate() {
            let first = chunk_index * batch_size;

            for (offset, messages) in chunk.iter().enumerate() {
                let index = first + offset;

                // Keep finished items draining while waiting for a slot
                let permit = loop {
                    tokio::select! {
                        permit = slots.acquire() => break permit,
                        Some((done, result)) = in_flight.next(), if !in_flight.is_empty() => {
                            results[done] = Some(result);
                        }
                    }
                };

                match permit {
                    Ok(permit) => in_flight.push(async move {
                        let _permit = permit;
                        (index, self.chat(messages, overrides).await)
                    }),
                    Err(_) => {
                        results[index] = Some(Err(GatewayError::transport_permanent(
                            "batch dispatcher shut down",
                        )));
                    }
                }
            }

            debug!(chunk = chunk_index, size = chunk.len(), "Chunk admitted");
        }

        while let Some((done, result)) = in_flight.next().await {
            results[done] = Some(result);
        }

        let results: Vec<GatewayResult<String>> = results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| {
                    Err(GatewayError::transport_permanent("batch item was not dispatched"))
                })
            })
            .collect();

        let failed = results.iter().filter(|result| result.is_err()).count();
        debug!(total = results.len(), failed, "Batch finished");
        results
    }
}
