//! Common test utilities and helpers

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honors `RUST_LOG`
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// URL on a host that never resolves
#[allow(dead_code)]
pub fn unresolvable_url() -> &'static str {
    "http://no-such-host.invalid/"
}

/// Address nothing listens on
#[allow(dead_code)]
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let port = listener.local_addr().expect("Probe port has no address").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
