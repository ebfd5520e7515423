//! Client and server TLS configuration.
//!
//! Server configs are built from a [`Credential`]; client configs trust
//! the webpki roots by default, a caller-supplied CA file, or (for
//! self-signed peers) nothing at all via [`NoVerifier`].

use std::path::Path;
use std::sync::Arc;

use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;

use crate::credential::Credential;
use crate::error::TransportError;

/// Build a server TLS config from a loaded credential.
pub fn build_server_config(credential: Credential) -> Result<rustls::ServerConfig, TransportError> {
    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(credential.certs, credential.key)?;
    Ok(config)
}

/// Build a client TLS config.
///
/// Trust anchors come from `ca` when given, otherwise from the bundled
/// webpki roots. `insecure` replaces verification entirely and wins over
/// both.
pub fn build_client_config(
    ca: Option<&Path>,
    insecure: bool,
) -> Result<rustls::ClientConfig, TransportError> {
    if insecure {
        return Ok(rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerifier))
            .with_no_client_auth());
    }

    let mut root_store = RootCertStore::empty();
    if let Some(ca_path) = ca {
        let mut reader = std::io::BufReader::new(std::fs::File::open(ca_path)?);
        let mut added = 0;
        for cert in rustls_pemfile::certs(&mut reader) {
            root_store
                .add(cert?.into_owned())
                .map_err(|e| TransportError::Credential(format!("failed to add CA cert: {e}")))?;
            added += 1;
        }
        if added == 0 {
            return Err(TransportError::Credential(format!(
                "no certificates found in {}",
                ca_path.display()
            )));
        }
    } else {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth())
}

/// Certificate verifier that accepts any certificate.
///
/// Used for `--insecure` connections to peers with self-signed
/// certificates, such as a tlspipe server running on its ephemeral
/// generated pair.
#[derive(Debug)]
struct NoVerifier;

impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::CryptoProvider::get_default()
            .map(|provider| {
                provider
                    .signature_verification_algorithms
                    .supported_schemes()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_self_signed_credential() {
        let credential = Credential::self_signed().unwrap();
        build_server_config(credential).unwrap();
    }

    #[test]
    fn server_config_rejects_mismatched_key() {
        let a = Credential::self_signed().unwrap();
        let b = Credential::self_signed().unwrap();
        let mismatched = Credential {
            certs: a.certs,
            key: b.key,
        };
        assert!(build_server_config(mismatched).is_err());
    }

    #[test]
    fn client_config_rejects_empty_ca_file() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("empty.pem");
        std::fs::write(&ca, "").unwrap();

        let err = build_client_config(Some(&ca), false).unwrap_err();
        assert!(matches!(err, TransportError::Credential(_)));
    }

    #[test]
    fn client_config_accepts_generated_ca() {
        use rcgen::{CertificateParams, KeyPair, PKCS_ECDSA_P256_SHA256};

        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let cert = CertificateParams::default().self_signed(&key_pair).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.pem");
        std::fs::write(&ca, cert.pem()).unwrap();

        build_client_config(Some(&ca), false).unwrap();
    }
}
