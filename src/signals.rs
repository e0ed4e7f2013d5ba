// ABOUTME: Watches for operator termination signals (SIGINT, SIGTERM).
// ABOUTME: Completes a shutdown token on the first signal; later signals change nothing.

use tokio::task::JoinHandle;

use crate::shutdown::{ShutdownReason, ShutdownToken};

/// Forwards termination signals into a [`ShutdownToken`] while alive.
#[derive(Debug)]
pub struct SignalWatcher {
    token: ShutdownToken,
    task: JoinHandle<()>,
}

impl SignalWatcher {
    /// Install the signal handlers and start forwarding.
    ///
    /// Handlers are registered before this returns, so a signal sent after
    /// `arm` is never lost. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub fn arm(token: ShutdownToken) -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        let trigger = token.clone();
        let task = tokio::spawn(async move {
            loop {
                let reason = tokio::select! {
                    Some(()) = interrupt.recv() => ShutdownReason::Interrupt,
                    Some(()) = terminate.recv() => ShutdownReason::Terminate,
                    else => break,
                };
                trigger.trigger(reason);
            }
        });

        tracing::debug!("signal watcher armed");
        Ok(Self { token, task })
    }

    #[cfg(not(unix))]
    pub fn arm(token: ShutdownToken) -> std::io::Result<Self> {
        let trigger = token.clone();
        let task = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                trigger.trigger(ShutdownReason::Interrupt);
            }
        });

        tracing::debug!("signal watcher armed");
        Ok(Self { token, task })
    }

    /// Block until termination is requested, by a signal or any other
    /// holder of the token.
    pub async fn wait_for_termination(&self) -> ShutdownReason {
        self.token.wait().await
    }

    pub fn token(&self) -> &ShutdownToken {
        &self.token
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
