//! Provider traits for text generation and embeddings

use async_trait::async_trait;

use super::{Message, ProviderError, SamplingConfig};

/// Stateless text-generation provider; each call is independent.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one text completion for the role-tagged `messages`.
    async fn generate(
        &self,
        messages: &[Message],
        sampling: &SamplingConfig,
    ) -> Result<String, ProviderError>;

    /// Model identifier, for reporting
    fn model(&self) -> &str;
}

/// Text embedding provider.
///
/// Must return exactly one vector per input, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    /// Text generator replaying scripted responses in order
    pub struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, ProviderError>>>,
        repeat: Option<Result<String, ProviderError>>,
        call_count: AtomicUsize,
        delay: Duration,
        last_messages: Mutex<Vec<Message>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
            debug!(response_count = %responses.len(), "ScriptedGenerator::new: called");
            Self {
                responses: Mutex::new(responses.into()),
                repeat: None,
                call_count: AtomicUsize::new(0),
                delay: Duration::ZERO,
                last_messages: Mutex::new(Vec::new()),
            }
        }

        /// Answer every call with `text`
        pub fn always(text: &str) -> Self {
            let mut generator = Self::new(vec![]);
            generator.repeat = Some(Ok(text.to_string()));
            generator
        }

        /// Fail every call with `error`
        pub fn failing(error: ProviderError) -> Self {
            let mut generator = Self::new(vec![]);
            generator.repeat = Some(Err(error));
            generator
        }

        /// Sleep before answering, to let concurrent callers overlap
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn last_messages(&self) -> Vec<Message> {
            self.last_messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            messages: &[Message],
            _sampling: &SamplingConfig,
        ) -> Result<String, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages.to_vec();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| self.repeat.clone())
                .unwrap_or_else(|| {
                    Err(ProviderError::InvalidResponse("No more mock responses".into()))
                })
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Embedder computing vectors with a plain function
    pub struct FnEmbedder<F> {
        embed_fn: F,
        call_count: AtomicUsize,
    }

    impl<F> FnEmbedder<F>
    where
        F: Fn(&str) -> Vec<f32> + Send + Sync,
    {
        pub fn new(embed_fn: F) -> Self {
            Self {
                embed_fn,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<F> EmbeddingProvider for FnEmbedder<F>
    where
        F: Fn(&str) -> Vec<f32> + Send + Sync,
    {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(inputs.iter().map(|text| (self.embed_fn)(text)).collect())
        }
    }

    /// Embedder that is always unreachable
    pub struct UnreachableEmbedder;

    #[async_trait]
    impl EmbeddingProvider for UnreachableEmbedder {
        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_scripted_generator_replays_in_order() {
            let generator = ScriptedGenerator::new(vec![
                Ok("first".to_string()),
                Err(ProviderError::Timeout),
            ]);
            let sampling = SamplingConfig::default();

            let first = generator.generate(&[Message::user("hi")], &sampling).await;
            assert_eq!(first, Ok("first".to_string()));
            let second = generator.generate(&[], &sampling).await;
            assert_eq!(second, Err(ProviderError::Timeout));
            assert!(generator.generate(&[], &sampling).await.is_err());

            assert_eq!(generator.call_count(), 3);
        }
    }
}
