// ABOUTME: End-to-end bootstrap: validate, derive identity and TLS, start, wait, tear down.
// ABOUTME: Everything before the wait is synchronous setup; everything after is teardown.

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::identity;
use crate::session::{SessionController, SessionParams, VoiceSession};
use crate::shutdown::{ShutdownReason, ShutdownToken};
use crate::tls;

/// Turn a resolved config into session parameters.
///
/// Fails on an empty server, an unavailable random source, or an unusable
/// client certificate. No session exists yet when any of these fail.
pub fn prepare(config: ConnectionConfig) -> Result<SessionParams> {
    config.validate()?;

    let username = if config.username.is_empty() {
        identity::generate_username()?
    } else {
        config.username.clone()
    };

    let tls = tls::build_tls_material(&config)?;

    Ok(SessionParams {
        address: config.server,
        channel: config.channel_name,
        username,
        password: config.password,
        tls,
    })
}

/// Run one session from start to clean shutdown.
///
/// `arm_watcher` is called only after `init` has returned, so termination
/// requests cannot overtake initialization. Its return value is kept alive
/// until the session has been cleaned up. If arming fails the session is
/// cleaned up before the error is returned.
pub async fn run<S, F, W, G>(
    config: ConnectionConfig,
    make_session: F,
    shutdown: ShutdownToken,
    arm_watcher: W,
) -> Result<ShutdownReason>
where
    S: VoiceSession,
    F: FnOnce(SessionParams) -> S,
    W: FnOnce(ShutdownToken) -> std::io::Result<G>,
{
    let params = prepare(config)?;
    tracing::debug!(?params, "starting session");

    let controller = SessionController::new(make_session(params)).start().await?;

    let _watcher = match arm_watcher(shutdown.clone()) {
        Ok(watcher) => watcher,
        Err(e) => {
            controller.shutdown();
            return Err(Error::SignalSetup(e));
        }
    };

    let (_terminated, reason) = controller.run_until(&shutdown).await;
    Ok(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USERNAME_PREFIX;
    use std::path::PathBuf;

    #[test]
    fn prepare_keeps_supplied_username() {
        let config = ConnectionConfig {
            server: "example.org".to_string(),
            username: "kitchen".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let params = prepare(config).unwrap();
        assert_eq!(params.username, "kitchen");
        assert_eq!(params.password, "hunter2");
    }

    #[test]
    fn prepare_generates_missing_username() {
        let config = ConnectionConfig {
            server: "example.org".to_string(),
            ..Default::default()
        };
        let params = prepare(config).unwrap();
        assert!(params.username.starts_with(USERNAME_PREFIX));
    }

    #[test]
    fn prepare_requires_server() {
        let err = prepare(ConnectionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingServer));
    }

    #[test]
    fn prepare_fails_on_missing_certificate() {
        let config = ConnectionConfig {
            server: "example.org".to_string(),
            certificate_path: Some(PathBuf::from("/nonexistent/client.pem")),
            ..Default::default()
        };
        assert!(matches!(prepare(config), Err(Error::Tls(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = ConnectionConfig {
            server: "example.org".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let params = prepare(config).unwrap();
        let debug = format!("{params:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
