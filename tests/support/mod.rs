// ABOUTME: Test support utilities.
// ABOUTME: Recording session stubs, certificate minting, and a local TLS server.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use talkiepi::session::{SessionError, SessionParams, VoiceSession};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("talkiepi=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Lifecycle calls observed by a [`RecordingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Constructed,
    Init,
    CleanUp,
}

/// Shared view into what a recording session saw.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    params: Arc<Mutex<Option<RecordedParams>>>,
}

/// The parts of [`SessionParams`] tests compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedParams {
    pub address: String,
    pub channel: String,
    pub username: String,
    pub password: String,
    pub insecure_skip_verify: bool,
    pub has_client_certificate: bool,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: Event) -> usize {
        self.events.lock().iter().filter(|e| **e == event).count()
    }

    pub fn params(&self) -> Option<RecordedParams> {
        self.params.lock().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }

    /// A session factory that records into this recorder.
    pub fn factory(self, fail_init: bool) -> impl FnOnce(SessionParams) -> RecordingSession {
        move |params| RecordingSession::new(self, params, fail_init)
    }
}

/// A voice session that records its lifecycle calls.
pub struct RecordingSession {
    recorder: Recorder,
    fail_init: bool,
}

impl RecordingSession {
    pub fn new(recorder: Recorder, params: SessionParams, fail_init: bool) -> Self {
        *recorder.params.lock() = Some(RecordedParams {
            address: params.address.clone(),
            channel: params.channel.clone(),
            username: params.username.clone(),
            password: params.password.clone(),
            insecure_skip_verify: params.tls.insecure_skip_verify,
            has_client_certificate: params.tls.has_client_certificate(),
        });
        recorder.push(Event::Constructed);
        Self {
            recorder,
            fail_init,
        }
    }
}

#[async_trait]
impl VoiceSession for RecordingSession {
    async fn init(&mut self) -> Result<(), SessionError> {
        self.recorder.push(Event::Init);
        if self.fail_init {
            return Err(SessionError::Init("server rejected client".to_string()));
        }
        Ok(())
    }

    fn clean_up(&mut self) {
        self.recorder.push(Event::CleanUp);
    }
}

/// Check the generated-username shape: prefix plus 12 lowercase hex chars.
pub fn is_generated_username(name: &str) -> bool {
    name.strip_prefix("talkiepi-").is_some_and(|hex| {
        hex.len() == 12
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    })
}

/// A self-signed certificate for localhost.
pub fn self_signed() -> rcgen::Certificate {
    rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap()
}

/// Write certificate and key into one PEM file, the way deployments ship them.
pub fn write_combined_pem(dir: &Path, name: &str) -> PathBuf {
    let cert = self_signed();
    let pem = format!(
        "{}{}",
        cert.serialize_pem().unwrap(),
        cert.serialize_private_key_pem()
    );
    let path = dir.join(name);
    std::fs::write(&path, pem).unwrap();
    path
}

/// Accept TLS connections on a local port and hold each open until the
/// client goes away.
pub async fn spawn_tls_server() -> (SocketAddr, JoinHandle<()>) {
    let cert = self_signed();
    let cert_der = CertificateDer::from(cert.serialize_der().unwrap());
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(cert.serialize_private_key_der()));

    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        talkiepi::tls::crypto_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert_der], key_der)
    .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let task = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 256];
                    while matches!(tls.read(&mut buf).await, Ok(n) if n > 0) {}
                }
            });
        }
    });

    (addr, task)
}

/// A local address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
