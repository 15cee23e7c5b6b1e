//! # Example: collectors
//!
//! Demonstrates the future-level collectors on a handful of simulated lookups.
//!
//! Shows how to:
//! - Wait for every lookup with [`all`] and [`all_settled`].
//! - Take the fastest answer with [`race`] and the fastest success with [`any`].
//! - Stop after a quorum with [`first_n`].
//!
//! ## Run
//! ```bash
//! cargo run --example collectors
//! ```

use std::time::Duration;

use taskweave::{TaskError, all, all_settled, any, first_n, race};

/// Simulated lookup against a replica: settles after `ms` with `outcome`.
async fn lookup(replica: &'static str, ms: u64, ok: bool) -> Result<String, TaskError> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    if ok {
        Ok(format!("{replica}: 42"))
    } else {
        Err(TaskError::fail(format!("{replica} unreachable")))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let healthy = || {
        vec![
            lookup("eu-1", 120, true),
            lookup("us-1", 40, true),
            lookup("ap-1", 80, true),
        ]
    };
    let mixed = || {
        vec![
            lookup("eu-1", 120, true),
            lookup("us-1", 40, false),
            lookup("ap-1", 80, true),
        ]
    };

    println!("all (input order):     {:?}", all(healthy()).await);
    println!("all (one failing):     {:?}", all(mixed()).await);
    println!("race:                  {:?}", race(mixed()).await);
    println!("any:                   {:?}", any(mixed()).await);
    println!("first_n(2):            {:?}", first_n(mixed(), 2).await.map_err(|e| e.to_string()));

    for outcome in all_settled(mixed()).await {
        match outcome.into_result() {
            Ok(value) => println!("all_settled fulfilled: {value}"),
            Err(reason) => println!("all_settled rejected:  {reason}"),
        }
    }
}
