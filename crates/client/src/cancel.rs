//! Per-request cancellation.
//!
//! A [`CancelToken`] is a cheap clone of one shared flag. The caller
//! that owns a view keeps one token per in-flight request; starting a
//! replacement request cancels the old token, so the superseded call
//! resolves to `Cancelled` instead of delivering stale data.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation flag shared between a request issuer and
/// the call racing against it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every `cancelled()` waiter.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Lower the flag so the token can back a new request.
    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::Release);
    }

    /// Resolves once the token is cancelled. Registered before the
    /// flag re-check, so a concurrent `cancel` cannot slip between.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn starts_clear_and_latches_until_reset() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let seen_by_request = token.clone();
        token.cancel();
        assert!(seen_by_request.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_future_resolves_on_cancel() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
            true
        });
        // Give the waiter a chance to register first.
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
        assert!(handle.await.expect("join"));
    }

    #[tokio::test]
    async fn cancelled_future_is_immediate_on_a_cancelled_token() {
        let token = CancelToken::new();
        token.cancel();
        // Must not hang.
        token.cancelled().await;
    }
}
