// ABOUTME: Single-slot shutdown token shared by every termination source.
// ABOUTME: The first trigger wins; later triggers are ignored.

use std::sync::Arc;
use tokio::sync::watch;

/// Why shutdown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Programmatic request.
    Requested,
}

/// A token that can be completed once and awaited by any number of waiters.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    slot: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Complete the token. Returns false if it was already completed.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let fired = self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
            true
        });

        if fired {
            tracing::info!(?reason, "shutdown requested");
        } else {
            tracing::debug!(?reason, "shutdown already in progress; ignoring");
        }
        fired
    }

    /// The winning reason, if the token has been completed.
    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.slot.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.reason().is_some()
    }

    /// Wait until the token is completed.
    pub async fn wait(&self) -> ShutdownReason {
        let mut rx = self.slot.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.unwrap_or(ShutdownReason::Requested),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => ShutdownReason::Requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_trigger_wins() {
        let token = ShutdownToken::new();
        assert!(!token.is_triggered());

        assert!(token.trigger(ShutdownReason::Terminate));
        assert!(!token.trigger(ShutdownReason::Interrupt));
        assert!(!token.trigger(ShutdownReason::Requested));

        assert_eq!(token.reason(), Some(ShutdownReason::Terminate));
    }

    #[test]
    fn clones_share_the_slot() {
        let token = ShutdownToken::new();
        let other = token.clone();
        other.trigger(ShutdownReason::Interrupt);
        assert_eq!(token.reason(), Some(ShutdownReason::Interrupt));
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_triggered() {
        let token = ShutdownToken::new();
        token.trigger(ShutdownReason::Requested);
        assert_eq!(token.wait().await, ShutdownReason::Requested);
    }

    #[tokio::test]
    async fn wait_wakes_on_trigger_from_another_task() {
        let token = ShutdownToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger(ShutdownReason::Terminate);
        });

        let reason = tokio::time::timeout(Duration::from_secs(5), token.wait())
            .await
            .expect("token should be triggered");
        assert_eq!(reason, ShutdownReason::Terminate);
    }

    #[tokio::test]
    async fn wait_is_pending_until_triggered() {
        let token = ShutdownToken::new();
        let waited = tokio::time::timeout(Duration::from_millis(20), token.wait()).await;
        assert!(waited.is_err());
    }
}
