//! Server credentials: a certificate chain plus matching private key.
//!
//! Loaded once at server start, either from a PEM file pair or generated
//! in memory as an ephemeral self-signed certificate when no files are
//! configured.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use rcgen::{CertificateParams, KeyPair, PKCS_ECDSA_P256_SHA256};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tracing::debug;

use crate::error::TransportError;

/// Certificate and private-key file paths, both required together.
#[derive(Debug, Clone)]
pub struct CredentialPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// A loaded certificate chain and private key.
#[derive(Debug)]
pub struct Credential {
    pub certs: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

impl Credential {
    /// Load the credential for a server: from the given file pair, or an
    /// ephemeral self-signed pair when none is configured.
    pub fn load(paths: Option<&CredentialPaths>) -> Result<Self, TransportError> {
        match paths {
            Some(paths) => {
                debug!(cert = %paths.cert.display(), key = %paths.key.display(), "loading credential files");
                Self::from_files(&paths.cert, &paths.key)
            }
            None => {
                debug!("no credential files configured, generating ephemeral self-signed pair");
                Self::self_signed()
            }
        }
    }

    /// Load and parse a PEM certificate chain and private key from files.
    pub fn from_files(cert_path: &Path, key_path: &Path) -> Result<Self, TransportError> {
        let mut reader = std::io::BufReader::new(std::fs::File::open(cert_path)?);
        let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
            .filter_map(|c| c.ok().map(|v| v.into_owned()))
            .collect();

        if certs.is_empty() {
            return Err(TransportError::Credential(format!(
                "no certificates found in {}",
                cert_path.display()
            )));
        }

        let mut reader = std::io::BufReader::new(std::fs::File::open(key_path)?);
        let key = loop {
            match rustls_pemfile::read_one(&mut reader)? {
                Some(rustls_pemfile::Item::Pkcs8Key(key)) => {
                    break PrivateKeyDer::Pkcs8(key);
                }
                Some(rustls_pemfile::Item::Pkcs1Key(key)) => {
                    break PrivateKeyDer::Pkcs1(key);
                }
                Some(rustls_pemfile::Item::Sec1Key(key)) => {
                    break PrivateKeyDer::Sec1(key);
                }
                Some(_) => continue,
                None => {
                    return Err(TransportError::Credential(format!(
                        "no private key found in {}",
                        key_path.display()
                    )));
                }
            }
        };

        Ok(Self { certs, key })
    }

    /// Generate an ephemeral self-signed pair in memory using rcgen.
    ///
    /// The certificate carries `localhost` and `127.0.0.1` as subject
    /// alternative names; clients connecting under any other name must
    /// supply their own trust decision.
    pub fn self_signed() -> Result<Self, TransportError> {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)
            .map_err(|e| TransportError::CertGeneration(e.to_string()))?;

        let mut params = CertificateParams::default();
        params.subject_alt_names = vec![
            rcgen::SanType::DnsName(
                "localhost"
                    .try_into()
                    .map_err(|e| TransportError::CertGeneration(format!("{e}")))?,
            ),
            rcgen::SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        ];
        let cert = params
            .self_signed(&key_pair)
            .map_err(|e| TransportError::CertGeneration(e.to_string()))?;

        let cert_der = CertificateDer::from(cert.der().to_vec());
        let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

        Ok(Self {
            certs: vec![cert_der],
            key: key_der,
        })
    }
}
