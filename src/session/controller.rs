// ABOUTME: Session controller parameterized by lifecycle state marker.
// ABOUTME: Owns the session handle and enforces one init and one clean-up.

use std::marker::PhantomData;

use super::state::{Initialized, Lifecycle, SessionState, Terminated, Unstarted};
use super::{SessionError, VoiceSession};
use crate::shutdown::{ShutdownReason, ShutdownToken};

/// Owns a [`VoiceSession`] from construction to clean-up.
///
/// The state parameter decides which operations exist: `start` only on
/// [`Unstarted`], `run_until` and `shutdown` only on [`Initialized`], and
/// nothing on [`Terminated`].
///
/// ```compile_fail
/// use talkiepi::session::{SessionController, Terminated, VoiceSession};
///
/// async fn restart<S: VoiceSession>(done: SessionController<S, Terminated>) {
///     done.start().await; // no `start` once terminated
/// }
/// ```
///
/// ```compile_fail
/// use talkiepi::session::{Initialized, SessionController, VoiceSession};
///
/// fn twice<S: VoiceSession>(controller: SessionController<S, Initialized>) {
///     let done = controller.shutdown();
///     done.shutdown(); // no `shutdown` once terminated
/// }
/// ```
///
/// Independently of the type state, the handle is taken out on clean-up so
/// `clean_up` can never run twice, and an initialized controller that is
/// dropped without `shutdown` cleans up on drop.
pub struct SessionController<S: VoiceSession, St: SessionState> {
    session: Option<S>,
    initialized: bool,
    _state: PhantomData<St>,
}

impl<S: VoiceSession> SessionController<S, Unstarted> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
            initialized: false,
            _state: PhantomData,
        }
    }

    /// Call the session's one-time `init`.
    ///
    /// On failure the session is dropped without `clean_up`, since it never
    /// came up.
    pub async fn start(mut self) -> Result<SessionController<S, Initialized>, SessionError> {
        if let Some(session) = self.session.as_mut() {
            session.init().await?;
        }
        self.initialized = true;
        tracing::info!("session initialized");
        Ok(self.transition())
    }
}

impl<S: VoiceSession> SessionController<S, Initialized> {
    /// Wait for the shutdown token, then clean up.
    pub async fn run_until(
        self,
        shutdown: &ShutdownToken,
    ) -> (SessionController<S, Terminated>, ShutdownReason) {
        tracing::debug!("session running");
        let reason = shutdown.wait().await;
        tracing::info!(?reason, "terminating session");
        (self.shutdown(), reason)
    }

    /// Call the session's one-time `clean_up`.
    pub fn shutdown(mut self) -> SessionController<S, Terminated> {
        self.clean_up_once();
        self.transition()
    }
}

impl<S: VoiceSession, St: SessionState> SessionController<S, St> {
    pub fn lifecycle(&self) -> Lifecycle {
        St::LIFECYCLE
    }

    /// The session handle, until it has been cleaned up.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    fn transition<Next: SessionState>(mut self) -> SessionController<S, Next> {
        SessionController {
            session: self.session.take(),
            initialized: self.initialized,
            _state: PhantomData,
        }
    }

    /// Returns true if this call ran `clean_up`.
    fn clean_up_once(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        match self.session.take() {
            Some(mut session) => {
                session.clean_up();
                tracing::info!("session cleaned up");
                true
            }
            None => false,
        }
    }
}

impl<S: VoiceSession, St: SessionState> Drop for SessionController<S, St> {
    fn drop(&mut self) {
        if self.clean_up_once() {
            tracing::warn!("session controller dropped while initialized; cleaned up on drop");
        }
    }
}
