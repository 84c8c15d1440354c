use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Injectable wait strategy.
///
/// Every delay in the pipeline goes through this trait: the randomized
/// pauses that make the session read as a person browsing, and the fixed
/// settles that give result pages time to render. Tests swap in
/// [`NoopPacer`] to make the state machines instantaneous.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait a uniformly random duration between `min_ms` and `max_ms`.
    async fn pause(&self, min_ms: u64, max_ms: u64);

    /// Wait a fixed duration.
    async fn settle(&self, ms: u64);
}

/// Production pacer backed by real sleeps.
#[derive(Debug, Clone, Default)]
pub struct HumanPacer;

#[async_trait]
impl Pacer for HumanPacer {
    async fn pause(&self, min_ms: u64, max_ms: u64) {
        let ms = rand::thread_rng().gen_range(min_ms..=max_ms);
        sleep(Duration::from_millis(ms)).await;
    }

    async fn settle(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }
}

/// Pacer that never waits.
#[derive(Debug, Clone, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self, _min_ms: u64, _max_ms: u64) {}

    async fn settle(&self, _ms: u64) {}
}
