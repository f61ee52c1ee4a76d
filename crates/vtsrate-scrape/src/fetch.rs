//! Status document retrieval.
//!
//! [`HttpStatusSource`] issues an HTTP/1.1 GET over a fresh TCP
//! connection per scrape, wrapped in TLS for `https` URLs, bounded by a
//! timeout and a body size cap.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, HOST, USER_AGENT};
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Empty, Limited};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::error::FetchError;

/// Largest status document accepted.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Where status documents come from.
pub trait StatusSource: Send + Sync {
    /// Retrieve the raw status document.
    fn fetch(&self) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// TLS session parameters for an `https` target.
#[derive(Clone)]
struct TlsTarget {
    connector: TlsConnector,
    server_name: ServerName<'static>,
}

/// Fetches the status document from an `http://` or `https://` URL.
#[derive(Clone)]
pub struct HttpStatusSource {
    /// Full URL, kept for logging.
    url: String,
    /// `host:port` to connect to.
    address: String,
    /// Value of the Host header. Never carries userinfo.
    host_header: String,
    /// Origin-form request target.
    path: String,
    tls: Option<TlsTarget>,
    timeout: Duration,
    body_limit: usize,
}

impl fmt::Debug for HttpStatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStatusSource")
            .field("url", &self.url)
            .field("address", &self.address)
            .field("tls", &self.tls.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpStatusSource {
    /// Parse and validate `url`. `https` targets are verified against
    /// the Mozilla root store.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;

        let https = match uri.scheme_str() {
            Some("http") => false,
            Some("https") => true,
            Some(other) => return Err(invalid(&format!("unsupported scheme {other:?}"))),
            None => return Err(invalid("missing scheme")),
        };

        let authority = uri.authority().ok_or_else(|| invalid("missing host"))?;
        let host = authority.host();
        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        let port = authority
            .port_u16()
            .unwrap_or(if https { 443 } else { 80 });
        let host_header = match authority.port_u16() {
            Some(p) => format!("{host}:{p}"),
            None => host.to_string(),
        };

        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "/".to_string());

        let tls = if https {
            // SNI wants the bare name, without IPv6 brackets.
            let bare = host.trim_start_matches('[').trim_end_matches(']');
            let server_name = ServerName::try_from(bare.to_string())
                .map_err(|e| invalid(&format!("invalid tls server name: {e}")))?;
            Some(TlsTarget {
                connector: TlsConnector::from(default_tls_config()?),
                server_name,
            })
        } else {
            None
        };

        Ok(Self {
            url: url.to_string(),
            address: format!("{host}:{port}"),
            host_header,
            path,
            tls,
            timeout,
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }

    /// Use a custom TLS client configuration. No effect on `http` URLs.
    pub fn with_tls_config(mut self, config: Arc<rustls::ClientConfig>) -> Self {
        if let Some(tls) = self.tls.as_mut() {
            tls.connector = TlsConnector::from(config);
        }
        self
    }

    /// Cap the accepted response body size.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// The `host:port` pair connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self) -> Result<Bytes, FetchError> {
        let stream = tokio::net::TcpStream::connect(&self.address)
            .await
            .map_err(|source| FetchError::Connect {
                address: self.address.clone(),
                source,
            })?;

        match &self.tls {
            Some(tls) => {
                let stream = tls
                    .connector
                    .connect(tls.server_name.clone(), stream)
                    .await
                    .map_err(|source| FetchError::Tls {
                        address: self.address.clone(),
                        source,
                    })?;
                self.request(stream).await
            }
            None => self.request(stream).await,
        }
    }

    async fn request<T>(&self, stream: T) -> Result<Bytes, FetchError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(FetchError::Handshake)?;

        // Drive the connection in the background.
        let url = self.url.clone();
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, %url, "status connection closed with error");
            }
        });

        let req = Request::builder()
            .method(Method::GET)
            .uri(self.path.as_str())
            .header(HOST, self.host_header.as_str())
            .header(USER_AGENT, concat!("vtsrate/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())?;

        let resp = sender.send_request(req).await.map_err(FetchError::Send)?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body = Limited::new(resp.into_body(), self.body_limit)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<http_body_util::LengthLimitError>() {
                    FetchError::BodyTooLarge(self.body_limit)
                } else {
                    FetchError::Body(e)
                }
            })?
            .to_bytes();

        debug!(url = %self.url, bytes = body.len(), "status document fetched");
        Ok(body)
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        match tokio::time::timeout(self.timeout, self.get()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}

/// Client config trusting the Mozilla root certificates.
fn default_tls_config() -> Result<Arc<rustls::ClientConfig>, FetchError> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(
        rustls::crypto::ring::default_provider().into(),
    )
    .with_safe_default_protocol_versions()
    .map_err(FetchError::TlsSetup)?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::new(config))
}
