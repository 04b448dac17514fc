//! Inter-request pacing
//!
//! The controller waits a fixed delay between pages. The wait goes through
//! [`Sleeper`] so tests can observe it without burning wall-clock time.

use std::future::Future;
use std::time::Duration;

/// Something that can pause the crawl
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
