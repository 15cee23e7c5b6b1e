//! # Example: resilience
//!
//! Wraps a flaky upstream call in a retry loop, a deadline and a circuit breaker.
//!
//! Shows how to:
//! - Retry with doubling delays using [`retry_with_backoff`].
//! - Bound an attempt with [`with_timeout`].
//! - Shed load with a [`CircuitBreaker`] once the upstream keeps failing.
//!
//! ## Run
//! ```bash
//! cargo run --example resilience
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use taskweave::{
    CircuitBreaker, CircuitBreakerPolicy, TaskError, retry_with_backoff, with_timeout,
};

static CALLS: AtomicU32 = AtomicU32::new(0);

/// Fails twice, then answers; every fifth call hangs.
async fn upstream() -> Result<&'static str, TaskError> {
    let n = CALLS.fetch_add(1, Ordering::SeqCst) + 1;
    if n % 5 == 0 {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
    if n <= 2 {
        return Err(TaskError::fail(format!("call {n}: connection reset")));
    }
    Ok("pong")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let res = retry_with_backoff(
        || with_timeout(upstream(), Duration::from_millis(200)),
        4,
        Duration::from_millis(50),
    )
    .await;
    println!("retry_with_backoff: {res:?} after {} calls", CALLS.load(Ordering::SeqCst));

    let breaker = CircuitBreaker::new(CircuitBreakerPolicy::new(
        2,
        Some(Duration::from_millis(300)),
    ))
    .with_name("upstream");

    for round in 1..=6 {
        let res: Result<(), TaskError> = breaker
            .call(|| async { Err(TaskError::fail("still down")) })
            .await;
        println!("round {round}: {res:?} (state: {:?})", breaker.state());
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    let res = breaker.call(upstream).await;
    println!("probe after cool-down: {res:?} (state: {:?})", breaker.state());
}
