// ABOUTME: Voice session boundary and the controller that owns its lifecycle.
// ABOUTME: Sessions are initialized exactly once and cleaned up exactly once.

mod controller;
mod error;
mod state;
mod transport;

pub use controller::SessionController;
pub use error::SessionError;
pub use state::{Initialized, Lifecycle, SessionState, Terminated, Unstarted};
pub use transport::{DEFAULT_PORT, TransportSession, split_address};

use async_trait::async_trait;

use crate::tls::TlsMaterial;

/// An external voice session.
///
/// `init` and `clean_up` are each called at most once by
/// [`SessionController`]; implementations need not guard against repeats.
#[async_trait]
pub trait VoiceSession: Send {
    /// Connect and bring the session up.
    async fn init(&mut self) -> Result<(), SessionError>;

    /// Tear the session down.
    fn clean_up(&mut self);
}

/// Everything a session needs to be constructed.
pub struct SessionParams {
    pub address: String,
    pub channel: String,
    pub username: String,
    pub password: String,
    pub tls: TlsMaterial,
}

impl std::fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionParams")
            .field("address", &self.address)
            .field("channel", &self.channel)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .finish()
    }
}
