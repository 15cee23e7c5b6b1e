//! # Example: bounded_pool
//!
//! Runs a batch of simulated downloads through a [`Pool`] with a concurrency limit,
//! printing every pool event with the built-in [`LogWriter`].
//!
//! Shows how to:
//! - Configure a pool with [`Config`] (limit, failure policy, default timeout).
//! - Attach subscribers with [`Pool::builder`].
//! - Decorate tasks with [`Pool::task`] so timeouts are reported on the pool's bus.
//! - Collect every outcome with [`Pool::run_settled`].
//!
//! ## Run
//! ```bash
//! cargo run --example bounded_pool --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskweave::{
    Config, FailurePolicy, LogWriter, Pool, Settlement, Subscribe, TaskError, TaskFn, TaskRef,
    TaskSpec,
};
use tokio_util::sync::CancellationToken;

fn download(id: usize, ms: u64) -> TaskRef<usize, TaskError> {
    TaskFn::arc(format!("download-{id}"), move |ctx: CancellationToken| async move {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ms)) => Ok(id * 1024),
            _ = ctx.cancelled() => Err(TaskError::Canceled),
        }
    })
}

#[tokio::main]
async fn main() {
    let mut cfg = Config::with_limit(3);
    cfg.failure = FailurePolicy::Drain;
    cfg.timeout = Duration::from_millis(400);

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let pool = Pool::builder(cfg).with_subscribers(subs).build();

    let tasks: Vec<TaskRef<usize, TaskError>> = (0..8)
        .map(|id| {
            // every fourth download stalls past the deadline
            let ms = if id % 4 == 3 { 1_000 } else { 100 + 50 * id as u64 };
            pool.task(TaskSpec::with_defaults(download(id, ms), pool.config()))
        })
        .collect();

    let settled = pool.run_settled(tasks).await;
    pool.shutdown().await;

    let bytes: usize = settled.iter().filter_map(Settlement::value).sum();
    let failed = settled.iter().filter(|s| s.is_rejected()).count();
    println!("downloaded {bytes} bytes, {failed} downloads timed out");
}
