// ABOUTME: Default voice session: a TLS connection to the configured voice server.
// ABOUTME: Parses host[:port], connects over TCP, and completes the rustls handshake.

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use super::{SessionError, SessionParams, VoiceSession};

/// Port used when the server address does not name one.
pub const DEFAULT_PORT: u16 = 64738;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Split `host[:port]` into its parts. Bracketed IPv6 (`[::1]:64738`) and
/// bare IPv6 without a port are accepted.
pub fn split_address(address: &str) -> Result<(String, u16), SessionError> {
    let invalid = |reason: &str| SessionError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let s = address.trim();
    if s.is_empty() {
        return Err(invalid("address cannot be empty"));
    }

    let (host, port) = if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']').ok_or_else(|| invalid("missing ']'"))?;
        let host = &rest[..end];
        let port = match &rest[end + 1..] {
            "" => None,
            tail => Some(
                tail.strip_prefix(':')
                    .ok_or_else(|| invalid("unexpected text after ']'"))?,
            ),
        };
        (host, port)
    } else if s.matches(':').count() > 1 {
        (s, None)
    } else if let Some(colon) = s.rfind(':') {
        (&s[..colon], Some(&s[colon + 1..]))
    } else {
        (s, None)
    };

    if host.is_empty() {
        return Err(invalid("hostname cannot be empty"));
    }

    let port = match port {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| invalid(&format!("invalid port: {p}")))?,
        None => DEFAULT_PORT,
    };

    Ok((host.to_string(), port))
}

/// A session that owns the secured transport to the voice server.
pub struct TransportSession {
    params: SessionParams,
    connect_timeout: Duration,
    stream: Option<TlsStream<TcpStream>>,
}

impl TransportSession {
    pub fn new(params: SessionParams) -> Self {
        Self {
            params,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            stream: None,
        }
    }

    /// Bound on TCP connect plus TLS handshake (default: 10 seconds).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

async fn connect(
    address: String,
    host: &str,
    port: u16,
    connector: TlsConnector,
    server_name: ServerName<'static>,
) -> Result<TlsStream<TcpStream>, SessionError> {
    let tcp = TcpStream::connect((host, port))
        .await
        .map_err(|source| SessionError::Connect {
            address: address.clone(),
            source,
        })?;
    if let Err(e) = tcp.set_nodelay(true) {
        tracing::debug!(error = %e, "failed to set TCP_NODELAY");
    }

    connector
        .connect(server_name, tcp)
        .await
        .map_err(|source| SessionError::Handshake { address, source })
}

#[async_trait]
impl VoiceSession for TransportSession {
    async fn init(&mut self) -> Result<(), SessionError> {
        let (host, port) = split_address(&self.params.address)?;

        let server_name =
            ServerName::try_from(host.clone()).map_err(|e| SessionError::InvalidAddress {
                address: self.params.address.clone(),
                reason: e.to_string(),
            })?;
        let connector = TlsConnector::from(Arc::new(self.params.tls.client_config()?));

        tracing::debug!(%host, port, "connecting to voice server");
        let stream = tokio::time::timeout(
            self.connect_timeout,
            connect(self.params.address.clone(), &host, port, connector, server_name),
        )
        .await
        .map_err(|_| SessionError::ConnectTimeout {
            address: self.params.address.clone(),
            timeout: self.connect_timeout,
        })??;

        tracing::info!(
            server = %self.params.address,
            username = %self.params.username,
            channel = %self.params.channel,
            "connected to voice server"
        );
        self.stream = Some(stream);
        Ok(())
    }

    fn clean_up(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!(server = %self.params.address, "closed voice server connection");
        }
    }
}
