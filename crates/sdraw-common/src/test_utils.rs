//! Test utilities and shared fixtures for the sdraw workspace.
//!
//! Available to other crates through the `testing` feature.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Seeded coordinate fixtures for plot tests.
pub mod point_fixtures {
    /// Points spread log-uniformly over `[1, 10^decades)` on both axes,
    /// correlated so the densest region sits near the diagonal.
    pub fn log_uniform_cloud(n: usize, decades: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for _ in 0..n {
            let ex = rng.f64() * decades;
            let ey = (ex + (rng.f64() - 0.5) * 0.5).clamp(0.0, decades);
            xs.push(10f64.powf(ex));
            ys.push(10f64.powf(ey));
        }
        (xs, ys)
    }

    /// Points uniformly spread over the square `[lo, hi)^2`.
    pub fn uniform_square(n: usize, lo: f64, hi: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let span = hi - lo;
        (0..n).map(|_| (lo + rng.f64() * span, lo + rng.f64() * span)).unzip()
    }

    /// Epoch-second timestamps: a uniform background over `[start, start + span)`
    /// plus a burst of `burst` events inside the first tenth of the span.
    pub fn bursty_timestamps(
        background: usize,
        burst: usize,
        start: i64,
        span: i64,
        seed: u64,
    ) -> Vec<i64> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut ts: Vec<i64> = (0..background)
            .map(|_| start + rng.i64(0..span.max(1)))
            .collect();
        let burst_span = (span / 10).max(1);
        ts.extend((0..burst).map(|_| start + rng.i64(0..burst_span)));
        ts
    }
}
