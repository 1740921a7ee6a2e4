mod common;

use cert_expiry_bot::checks::{earliest_expiry, ExpiryChecker, ExpiryLookup};
use cert_expiry_bot::config::ResolverSettings;
use cert_expiry_bot::models::{ErrorKind, ExpiryResult};
use common::*;
use rustls::pki_types::CertificateDer;
use std::time::{Duration, Instant};

fn fast_settings() -> ResolverSettings {
    ResolverSettings {
        connect_timeout_secs: 1,
        handshake_timeout_secs: 1,
        deadline_secs: 2,
        default_port: 443,
    }
}

fn fixture_checker(settings: ResolverSettings) -> ExpiryChecker {
    ExpiryChecker::with_roots(settings, fixture_roots()).unwrap()
}

#[test]
fn test_earliest_expiry_is_minimum_in_any_order() {
    let orders = [
        [LEAF_DER, INTERMEDIATE_DER, ROOT_DER],
        [ROOT_DER, LEAF_DER, INTERMEDIATE_DER],
        [INTERMEDIATE_DER, ROOT_DER, LEAF_DER],
    ];
    for order in orders {
        let certs: Vec<CertificateDer<'static>> = order
            .iter()
            .map(|der| CertificateDer::from(der.to_vec()))
            .collect();
        assert_eq!(earliest_expiry(&certs).unwrap(), intermediate_not_after());
    }
}

#[test]
fn test_earliest_expiry_single_cert() {
    let leaf = CertificateDer::from(LEAF_DER.to_vec());
    assert_eq!(earliest_expiry(&[leaf]).unwrap(), leaf_not_after());
    let root = CertificateDer::from(ROOT_DER.to_vec());
    assert_eq!(earliest_expiry(&[root]).unwrap(), root_not_after());
}

#[tokio::test]
async fn test_resolve_reports_earliest_in_verified_chain() {
    let addr = spawn_tls_server().await;
    let checker = fixture_checker(fast_settings());

    let result = checker.resolve(&format!("127.0.0.1:{}", addr.port())).await;

    assert_eq!(result, ExpiryResult::Expires(intermediate_not_after()));
}

#[tokio::test]
async fn test_untrusted_chain_fails_handshake() {
    let addr = spawn_tls_server().await;
    let checker = ExpiryChecker::new(fast_settings()).unwrap();

    let result = checker.resolve(&format!("127.0.0.1:{}", addr.port())).await;

    match result {
        ExpiryResult::Failed(ErrorKind::Other(message)) => {
            assert!(message.contains("TLS handshake failed"), "{}", message)
        }
        other => panic!("expected a handshake failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let addr = spawn_silent_server().await;
    let checker = fixture_checker(fast_settings());

    let started = Instant::now();
    let result = checker.resolve(&format!("127.0.0.1:{}", addr.port())).await;

    assert_eq!(result, ExpiryResult::Failed(ErrorKind::Timeout));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_overall_deadline_caps_slow_handshake() {
    let addr = spawn_silent_server().await;
    let checker = fixture_checker(ResolverSettings {
        connect_timeout_secs: 3,
        handshake_timeout_secs: 30,
        deadline_secs: 1,
        default_port: 443,
    });

    let started = Instant::now();
    let result = checker.resolve(&format!("127.0.0.1:{}", addr.port())).await;

    assert_eq!(result, ExpiryResult::Failed(ErrorKind::Timeout));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_connection_refused_is_other() {
    let addr = closed_port().await;
    let checker = fixture_checker(fast_settings());

    let result = checker.resolve(&format!("127.0.0.1:{}", addr.port())).await;

    assert!(matches!(result, ExpiryResult::Failed(ErrorKind::Other(_))));
}

#[tokio::test]
async fn test_empty_host_is_other() {
    let checker = fixture_checker(fast_settings());
    let result = checker.resolve("").await;
    assert!(matches!(result, ExpiryResult::Failed(ErrorKind::Other(_))));
}

#[test]
fn test_empty_trust_store_rejected() {
    let result = ExpiryChecker::with_roots(fast_settings(), rustls::RootCertStore::empty());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_checker_builds_repeatedly_in_one_process() {
    // Each build tries to install the crypto provider; only the first may succeed
    assert!(ExpiryChecker::new(ResolverSettings::default()).is_ok());
    assert!(ExpiryChecker::new(ResolverSettings::default()).is_ok());
    assert!(ExpiryChecker::with_roots(fast_settings(), fixture_roots()).is_ok());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_resolve_public_host() {
    let checker = ExpiryChecker::new(ResolverSettings::default()).unwrap();
    let result = checker.resolve("example.com").await;
    let expires = result.expires_at().expect("example.com should resolve");
    assert!(expires > chrono::Utc::now());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_unknown_domain_is_no_such_host() {
    let checker = ExpiryChecker::new(ResolverSettings::default()).unwrap();
    let result = checker
        .resolve("this-domain-does-not-exist-12345.invalid")
        .await;
    assert_eq!(result, ExpiryResult::Failed(ErrorKind::NoSuchHost));
}
