//! Cooperative cancellation for external calls

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::llm::ProviderError;

/// Clonable cancellation signal shared by every stage of one request.
///
/// Cancelling is sticky: once [`CancelToken::cancel`] has been called, every
/// clone reports cancelled and every pending [`CancelToken::cancelled`]
/// future resolves.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a new token (not cancelled).
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// Race `call` against cancellation.
    pub async fn guard<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancelled() => Err(ProviderError::Cancelled),
            result = call => result,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let token = CancelToken::new();
        let result = token.guard(async { Ok::<_, ProviderError>(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_guard_short_circuits_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let result = token.guard(async { Ok::<_, ProviderError>(1) }).await;
        assert_eq!(result, Err(ProviderError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_call() {
        let token = CancelToken::new();
        let clone = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            clone.cancel();
        });

        let result = token
            .guard(std::future::pending::<Result<(), ProviderError>>())
            .await;
        assert_eq!(result, Err(ProviderError::Cancelled));
        assert!(token.is_cancelled());
    }
}
