// ABOUTME: Loads a client certificate chain and private key from one PEM file.
// ABOUTME: The same file is read as both certificate and key source.

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::path::Path;

use super::error::TlsError;

/// A client certificate chain with its private key.
pub struct ClientCertificate {
    pub chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

impl std::fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

impl ClientCertificate {
    /// Read the chain and the first private key from a combined PEM file.
    pub fn load(path: &Path) -> Result<Self, TlsError> {
        let read_error = |source| TlsError::CertificateRead {
            path: path.to_path_buf(),
            source,
        };

        let pem = std::fs::read(path).map_err(read_error)?;

        let mut reader = pem.as_slice();
        let chain = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        if chain.is_empty() {
            return Err(TlsError::NoCertificate(path.to_path_buf()));
        }

        let mut reader = pem.as_slice();
        let key = rustls_pemfile::private_key(&mut reader)
            .map_err(read_error)?
            .ok_or_else(|| TlsError::NoPrivateKey(path.to_path_buf()))?;

        Ok(Self { chain, key })
    }

    pub(crate) fn clone_parts(&self) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
        (self.chain.clone(), self.key.clone_key())
    }
}
