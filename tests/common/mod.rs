#![allow(dead_code)]

use async_trait::async_trait;
use cert_expiry_bot::checks::ExpiryLookup;
use cert_expiry_bot::models::{ErrorKind, ExpiryResult};
use chrono::{DateTime, TimeZone, Utc};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::RootCertStore;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

pub const ROOT_DER: &[u8] = include_bytes!("../fixtures/root.der");
pub const INTERMEDIATE_DER: &[u8] = include_bytes!("../fixtures/intermediate.der");
pub const LEAF_DER: &[u8] = include_bytes!("../fixtures/leaf.der");
pub const LEAF_KEY_DER: &[u8] = include_bytes!("../fixtures/leaf.key.der");

/// notAfter of the fixture intermediate, the earliest in the served chain
pub fn intermediate_not_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2036, 6, 1, 0, 0, 0).unwrap()
}

pub fn leaf_not_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap()
}

pub fn root_not_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2045, 1, 1, 0, 0, 0).unwrap()
}

/// Trust store holding only the fixture root
pub fn fixture_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    roots
        .add(CertificateDer::from(ROOT_DER.to_vec()))
        .expect("fixture root is a valid trust anchor");
    roots
}

/// TLS server on 127.0.0.1 presenting leaf + intermediate
pub async fn spawn_tls_server() -> SocketAddr {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let chain = vec![
        CertificateDer::from(LEAF_DER.to_vec()),
        CertificateDer::from(INTERMEDIATE_DER.to_vec()),
    ];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(LEAF_KEY_DER.to_vec()));
    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .expect("fixture server config");
    let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 256];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });
    addr
}

/// Accepts TCP connections and never says a word
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held: Vec<TcpStream> = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// A loopback port with nothing listening on it
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Scripted resolver for aggregator and dispatcher tests
#[derive(Default)]
pub struct FakeLookup {
    results: HashMap<String, ExpiryResult>,
    delays: HashMap<String, Duration>,
    panics: Vec<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires(mut self, host: &str, at: DateTime<Utc>) -> Self {
        self.results
            .insert(host.to_string(), ExpiryResult::Expires(at));
        self
    }

    pub fn fails(mut self, host: &str, kind: ErrorKind) -> Self {
        self.results
            .insert(host.to_string(), ExpiryResult::Failed(kind));
        self
    }

    pub fn delayed(mut self, host: &str, delay: Duration) -> Self {
        self.delays.insert(host.to_string(), delay);
        self
    }

    pub fn panics_on(mut self, host: &str) -> Self {
        self.panics.push(host.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExpiryLookup for FakeLookup {
    async fn resolve(&self, host: &str) -> ExpiryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(host.to_string());
        if let Some(delay) = self.delays.get(host) {
            tokio::time::sleep(*delay).await;
        }
        if self.panics.iter().any(|h| h == host) {
            panic!("scripted failure for {}", host);
        }
        self.results
            .get(host)
            .cloned()
            .unwrap_or(ExpiryResult::Failed(ErrorKind::NoSuchHost))
    }
}
