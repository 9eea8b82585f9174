//! Shared helpers for `reconflow` tests.

pub mod builders;
pub mod recorder;

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound on how long any single flow in a test may take.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a capturing subscriber for the current test binary.
///
/// Output only shows for failing tests (or with `--nocapture`). Filter with
/// `RUST_LOG`, defaulting to `info`. Calling this more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Await `fut`, panicking if it takes longer than [`TEST_TIMEOUT`].
///
/// A hung coordinator then fails the test instead of stalling the suite.
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(output) => output,
        Err(_) => panic!("did not finish within {TEST_TIMEOUT:?}"),
    }
}
