use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Tuning for condition polling: how often to probe, how the gap between
/// probes grows, and optionally when to give up.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Give up after this long. None polls until the condition holds.
    pub timeout: Option<Duration>,
    /// Initial gap between probes.
    pub interval: Duration,
    /// Multiplier applied to the gap after each probe (>= 1.0).
    pub backoff: f64,
    /// Upper bound for the gap.
    pub max_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            interval: Duration::from_millis(500),
            backoff: 1.5,
            max_interval: Duration::from_secs(5),
        }
    }
}

/// Poll `probe` until it yields a value, backing off between attempts.
/// Returns None once the configured timeout elapses.
pub async fn wait_until<F, Fut, T>(opts: &WaitOptions, mut probe: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let started = Instant::now();
    let mut interval = opts.interval;
    loop {
        if let Some(value) = probe().await {
            return Some(value);
        }
        if let Some(limit) = opts.timeout {
            if started.elapsed() >= limit {
                return None;
            }
        }
        sleep(interval).await;
        interval = next_interval(interval, opts);
    }
}

/// Poll `measure` until two consecutive measurements agree, then return the
/// stable value. This wait has no deadline on purpose: it terminates on
/// structural convergence, not time, and an unchanged first re-measurement
/// is valid convergence. Measurement errors pass through immediately.
pub async fn wait_until_stable<F, Fut, T, E>(opts: &WaitOptions, mut measure: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: PartialEq,
{
    let mut interval = opts.interval;
    let mut previous = measure().await?;
    loop {
        sleep(interval).await;
        let current = measure().await?;
        if current == previous {
            return Ok(current);
        }
        previous = current;
        interval = next_interval(interval, opts);
    }
}

fn next_interval(current: Duration, opts: &WaitOptions) -> Duration {
    let scaled = current.mul_f64(opts.backoff.max(1.0));
    scaled.min(opts.max_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_opts(timeout_ms: Option<u64>) -> WaitOptions {
        WaitOptions {
            timeout: timeout_ms.map(Duration::from_millis),
            interval: Duration::from_millis(1),
            backoff: 1.0,
            max_interval: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_wait_until_returns_once_condition_holds() {
        let calls = AtomicUsize::new(0);
        let result = wait_until(&fast_opts(Some(1_000)), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n >= 3 {
                    Some(n)
                } else {
                    None
                }
            }
        })
        .await;
        assert_eq!(result, Some(3));
    }

    #[tokio::test]
    async fn test_wait_until_gives_up_after_timeout() {
        let result: Option<()> =
            wait_until(&fast_opts(Some(10)), || async { None }).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_wait_until_stable_detects_convergence() {
        // Page extent grows, then settles.
        let heights = [100_u64, 250, 400, 400, 400];
        let calls = AtomicUsize::new(0);
        let stable: Result<u64, ()> = wait_until_stable(&fast_opts(None), || {
            let i = calls.fetch_add(1, Ordering::SeqCst);
            let h = heights[i.min(heights.len() - 1)];
            async move { Ok(h) }
        })
        .await;
        assert_eq!(stable, Ok(400));
    }

    #[tokio::test]
    async fn test_wait_until_stable_accepts_no_growth() {
        let stable: Result<u64, ()> =
            wait_until_stable(&fast_opts(None), || async { Ok(42) }).await;
        assert_eq!(stable, Ok(42));
    }

    #[tokio::test]
    async fn test_wait_until_stable_propagates_errors() {
        let result: Result<u64, &str> =
            wait_until_stable(&fast_opts(None), || async { Err("gone") }).await;
        assert_eq!(result, Err("gone"));
    }
}
