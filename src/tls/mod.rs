// ABOUTME: Builds transport security material from a resolved connection config.
// ABOUTME: Produces the verification mode and optional client certificate for rustls.

mod error;
mod pem;
mod verifier;

pub use error::TlsError;
pub use pem::ClientCertificate;

use rustls::crypto::{CryptoProvider, ring};
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;

use crate::config::ConnectionConfig;
use verifier::SkipServerVerification;

/// Transport security settings for one connection attempt.
#[derive(Debug)]
pub struct TlsMaterial {
    /// Accept any server certificate.
    pub insecure_skip_verify: bool,
    /// Certificate presented to the server, if any.
    pub client_certificate: Option<ClientCertificate>,
}

impl TlsMaterial {
    pub fn has_client_certificate(&self) -> bool {
        self.client_certificate.is_some()
    }

    /// Build a rustls client config carrying this material.
    pub fn client_config(&self) -> Result<ClientConfig, TlsError> {
        let provider = Arc::new(crypto_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;

        let builder = if self.insecure_skip_verify {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(SkipServerVerification::new(provider)))
        } else {
            builder.with_root_certificates(trust_roots())
        };

        let config = match &self.client_certificate {
            Some(certificate) => {
                let (chain, key) = certificate.clone_parts();
                builder.with_client_auth_cert(chain, key)?
            }
            None => builder.with_no_client_auth(),
        };

        Ok(config)
    }
}

fn trust_roots() -> RootCertStore {
    RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    }
}

/// The crypto provider behind every client config built here.
pub fn crypto_provider() -> CryptoProvider {
    ring::default_provider()
}

/// Derive TLS material from a connection config.
///
/// A configured certificate path must yield a usable chain and key; the
/// material is turned into a client config once here so a bad key surfaces
/// before any session is constructed.
pub fn build_tls_material(config: &ConnectionConfig) -> Result<TlsMaterial, TlsError> {
    let client_certificate = match &config.certificate_path {
        Some(path) => {
            let certificate = ClientCertificate::load(path)?;
            tracing::debug!(path = %path.display(), chain_len = certificate.chain.len(), "loaded client certificate");
            Some(certificate)
        }
        None => None,
    };

    if config.insecure_skip_verify {
        tracing::debug!("server certificate verification disabled");
    }

    let material = TlsMaterial {
        insecure_skip_verify: config.insecure_skip_verify,
        client_certificate,
    };
    material.client_config()?;

    Ok(material)
}
