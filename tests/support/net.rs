//! Loopback networking helpers for integration tests.
//!
//! Sandboxed CI runners sometimes forbid binding even `127.0.0.1`. Tests that
//! need a listener call [`mock_server`] or [`loopback_available`] and return
//! early when they get nothing back. Setting `DOCFETCH_REQUIRE_SOCKET_TESTS`
//! turns that skip into a hard failure.

use std::net::TcpListener;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "DOCFETCH_REQUIRE_SOCKET_TESTS";

/// Whether a loopback listener can be bound; logs and skips otherwise.
#[track_caller]
pub fn loopback_available() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return true;
    }

    let caller = std::panic::Location::caller();
    let required = std::env::var(REQUIRE_ENV)
        .is_ok_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    assert!(
        !required,
        "{caller}: loopback bind failed and {REQUIRE_ENV} is set"
    );
    eprintln!("{caller}: loopback bind failed, skipping (set {REQUIRE_ENV}=1 to fail instead)");
    false
}

/// A started wiremock server, or `None` when loopback sockets are unavailable.
#[track_caller]
pub fn mock_server() -> impl std::future::Future<Output = Option<MockServer>> {
    let available = loopback_available();
    async move {
        if available {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
