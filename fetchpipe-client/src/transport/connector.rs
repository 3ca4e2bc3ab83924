//! TLS setup for the HTTPS connector.
//!
//! The crypto provider and root certificates are picked at compile time
//! from the enabled features. Without a provider feature, a process-wide
//! provider installed via `CryptoProvider::install_default()` is used.

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
use std::sync::Arc;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::ClientConfig;

use crate::ClientError;

/// Whether the crate was built with a crypto provider and a root store.
#[inline]
pub const fn has_tls_support() -> bool {
    cfg!(any(feature = "tls-ring", feature = "tls-aws-lc"))
        && cfg!(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))
}

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
#[allow(unreachable_code)]
fn crypto_provider() -> Option<Arc<rustls::crypto::CryptoProvider>> {
    #[cfg(feature = "tls-ring")]
    return Some(Arc::new(rustls::crypto::ring::default_provider()));

    #[cfg(all(feature = "tls-aws-lc", not(feature = "tls-ring")))]
    return Some(Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

    rustls::crypto::CryptoProvider::get_default().cloned()
}

/// Build the TLS config used when none is supplied.
#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
pub fn default_tls_config() -> Result<ClientConfig, ClientError> {
    let provider = crypto_provider().ok_or_else(|| {
        ClientError::Config(
            "HTTPS requires a crypto provider: enable `tls-ring` or `tls-aws-lc`, \
             or install one with `CryptoProvider::install_default()`"
                .into(),
        )
    })?;

    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ClientError::Config(format!("invalid TLS protocol versions: {}", e)))?
        .with_root_certificates(root_store())
        .with_no_client_auth();

    Ok(config)
}

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
fn root_store() -> rustls::RootCertStore {
    let mut roots = rustls::RootCertStore::empty();

    #[cfg(feature = "tls-native-roots")]
    {
        let native = rustls_native_certs::load_native_certs();
        if !native.errors.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!("errors loading native certs: {:?}", native.errors);
        }
        roots.add_parsable_certificates(native.certs);
    }

    #[cfg(all(feature = "tls-webpki-roots", not(feature = "tls-native-roots")))]
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    roots
}

/// Build a connector that speaks plain HTTP and HTTPS, HTTP/1.1 and HTTP/2.
pub fn build_https_connector(
    tls_config: Option<ClientConfig>,
) -> Result<HttpsConnector<HttpConnector>, ClientError> {
    let config = match tls_config {
        Some(config) => config,
        None => fallback_tls_config()?,
    };

    Ok(HttpsConnectorBuilder::new()
        .with_tls_config(config)
        .https_or_http()
        .enable_all_versions()
        .build())
}

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
fn fallback_tls_config() -> Result<ClientConfig, ClientError> {
    default_tls_config()
}

#[cfg(not(any(feature = "tls-native-roots", feature = "tls-webpki-roots")))]
fn fallback_tls_config() -> Result<ClientConfig, ClientError> {
    Err(ClientError::Config(
        "no root certificates: enable `tls-native-roots` or `tls-webpki-roots`, \
         or pass a TLS config"
            .into(),
    ))
}
