// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TLS credentials for the HTTPS listener.

use std::{path::Path, sync::Arc};

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer};

use crate::config::TlsPaths;

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Failed to read certificate chain from {path}: {reason}")]
    Certificate { path: String, reason: String },

    #[error("Failed to read private key from {path}: {reason}")]
    PrivateKey { path: String, reason: String },

    #[error("Invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// Load a PEM certificate chain.
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let certificate_error = |reason: String| TlsError::Certificate {
        path: path.display().to_string(),
        reason,
    };

    let certs = CertificateDer::pem_file_iter(path)
        .map_err(|e| certificate_error(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| certificate_error(e.to_string()))?;

    if certs.is_empty() {
        return Err(certificate_error("no certificates found".to_string()));
    }
    Ok(certs)
}

/// Load a PEM private key (PKCS#8, PKCS#1 or SEC1).
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    PrivateKeyDer::from_pem_file(path).map_err(|e| TlsError::PrivateKey {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Build the rustls server configuration for `axum-server`.
///
/// The ring crypto provider must already be installed as the process default.
pub fn rustls_config(paths: &TlsPaths) -> Result<RustlsConfig, TlsError> {
    let certs = load_certificates(&paths.cert)?;
    let key = load_private_key(&paths.key)?;

    tracing::info!(
        certificates = certs.len(),
        cert_path = %paths.cert.display(),
        "Loaded TLS credentials"
    );

    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}
