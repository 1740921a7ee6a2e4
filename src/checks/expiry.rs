//! Certificate expiry resolver
//!
//! Connects to a host over TLS with the platform's normal chain verification
//! and reports the earliest `notAfter` across every certificate the verified
//! connection presented. A failed verification is a failed handshake, so any
//! returned timestamp comes from a chain the TLS stack accepted.

use super::target::Target;
use crate::config::ResolverSettings;
use crate::models::{ErrorKind, ExpiryResult};
use crate::utils::BotError;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::{ASN1Time, FromDer, X509Certificate};

/// Type alias for the Tokio async resolver
type TokioResolver = Resolver<TokioConnectionProvider>;

/// How long a polite `close_notify` may take before the socket is simply dropped
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Anything that can turn a hostname into an [`ExpiryResult`]
#[async_trait]
pub trait ExpiryLookup: Send + Sync {
    async fn resolve(&self, host: &str) -> ExpiryResult;
}

/// Live TLS expiry resolver
pub struct ExpiryChecker {
    settings: ResolverSettings,
    connector: TlsConnector,
    dns: TokioResolver,
}

impl ExpiryChecker {
    /// Create a resolver that trusts the Mozilla root program
    pub fn new(settings: ResolverSettings) -> Result<Self, BotError> {
        let roots = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self::with_roots(settings, roots)
    }

    /// Create a resolver that trusts only the given roots
    pub fn with_roots(settings: ResolverSettings, roots: RootCertStore) -> Result<Self, BotError> {
        if roots.is_empty() {
            return Err(BotError::ResolverSetup {
                message: "no trusted root certificates".to_string(),
            });
        }

        // Library callers may not have installed a provider; a prior install wins
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        let dns = match TokioResolver::builder_tokio() {
            Ok(builder) => builder.build(),
            Err(e) => {
                tracing::warn!("System DNS configuration unavailable ({}), using defaults", e);
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            }
        };

        Ok(Self {
            settings,
            connector: TlsConnector::from(Arc::new(config)),
            dns,
        })
    }

    /// Resolve a host's earliest certificate expiry, bounded by the overall deadline
    pub async fn check(&self, host: &str) -> ExpiryResult {
        let result =
            match tokio::time::timeout(self.settings.deadline(), self.check_inner(host)).await {
                Ok(result) => result,
                Err(_) => Err(ErrorKind::Timeout),
            };

        match &result {
            Ok(expires) => tracing::debug!("{} expires at {}", host, expires),
            Err(kind) => tracing::debug!("{} failed: {}", host, kind),
        }

        result.into()
    }

    async fn check_inner(&self, host: &str) -> Result<DateTime<Utc>, ErrorKind> {
        let target = Target::parse(host, self.settings.default_port)?;
        let server_name = ServerName::try_from(target.host.clone())
            .map_err(|_| ErrorKind::other(format!("invalid server name: {}", target.host)))?;

        tracing::debug!("Checking {}", target);
        let addrs = self.lookup(&target.host).await?;
        let stream = self.connect(&addrs, target.port).await?;

        let mut tls_stream = tokio::time::timeout(
            self.settings.handshake_timeout(),
            self.connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| ErrorKind::Timeout)?
        .map_err(|e| classify_handshake_error(&e))?;

        let (_, connection) = tls_stream.get_ref();
        let presented: Vec<CertificateDer<'static>> = connection
            .peer_certificates()
            .map(|certs| certs.to_vec())
            .unwrap_or_default();

        // Dropping the stream closes the socket either way
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, tls_stream.shutdown()).await;
        drop(tls_stream);

        earliest_expiry(&presented)
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ErrorKind> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let lookup = self.dns.lookup_ip(host).await.map_err(|e| {
            if e.is_no_records_found() || e.is_nx_domain() {
                ErrorKind::NoSuchHost
            } else {
                ErrorKind::other(format!("DNS lookup failed: {}", e))
            }
        })?;
        let addrs: Vec<IpAddr> = lookup.iter().collect();
        if addrs.is_empty() {
            return Err(ErrorKind::NoSuchHost);
        }
        Ok(addrs)
    }

    /// Try each address in turn; the last failure wins if none connects
    async fn connect(&self, addrs: &[IpAddr], port: u16) -> Result<TcpStream, ErrorKind> {
        let mut last_error = ErrorKind::NoSuchHost;

        for ip in addrs {
            let addr = SocketAddr::new(*ip, port);
            match tokio::time::timeout(self.settings.connect_timeout(), TcpStream::connect(addr))
                .await
            {
                Ok(Ok(stream)) => return Ok(stream),
                Ok(Err(e)) => {
                    tracing::debug!("connect to {} failed: {}", addr, e);
                    last_error = classify_io_error(&e);
                }
                Err(_) => {
                    tracing::debug!("connect to {} timed out", addr);
                    last_error = ErrorKind::Timeout;
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl ExpiryLookup for ExpiryChecker {
    async fn resolve(&self, host: &str) -> ExpiryResult {
        self.check(host).await
    }
}

/// Earliest `notAfter` across a set of DER certificates
pub fn earliest_expiry(certs: &[CertificateDer<'_>]) -> Result<DateTime<Utc>, ErrorKind> {
    let mut earliest: Option<DateTime<Utc>> = None;

    for der in certs {
        let (_, cert) = X509Certificate::from_der(der.as_ref())
            .map_err(|e| ErrorKind::other(format!("failed to parse certificate: {}", e)))?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;
        earliest = Some(match earliest {
            Some(current) if current <= not_after => current,
            _ => not_after,
        });
    }

    earliest.ok_or_else(|| ErrorKind::other("server presented no certificates"))
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, ErrorKind> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| ErrorKind::other("invalid timestamp in certificate"))
}

/// Map a socket error onto the user-facing taxonomy.
///
/// The error kind is authoritative. Some platforms report routing failures as
/// uncategorized errors, so the message is consulted only as a last resort.
fn classify_io_error(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::TimedOut => ErrorKind::Timeout,
        io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => ErrorKind::NoRoute,
        _ => {
            let message = err.to_string().to_lowercase();
            if message.contains("no route to host") || message.contains("unreachable") {
                ErrorKind::NoRoute
            } else {
                ErrorKind::other(err.to_string())
            }
        }
    }
}

fn classify_handshake_error(err: &io::Error) -> ErrorKind {
    if let Some(tls_error) = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        return ErrorKind::other(format!("TLS handshake failed: {}", tls_error));
    }
    classify_io_error(err)
}
