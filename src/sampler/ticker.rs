use std::future::Future;
use std::time::Duration;

use crate::config::SamplerConfig;

/// Scheduling boundary between ticks. The sampler awaits `wait` once before
/// every tick and never while a tick is in progress.
pub trait Ticker {
    fn wait(&mut self) -> impl Future<Output = ()> + Send;
}

/// Sleeps one full interval after the previous tick finished, so a slow tick
/// delays the next one instead of causing a burst.
#[derive(Clone, Copy, Debug)]
pub struct IntervalTicker {
    interval: Duration,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        IntervalTicker { interval }
    }

    /// Interval from `[sampler] interval_ms`; zero is raised to one millisecond.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms.max(1)))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Ticker for IntervalTicker {
    async fn wait(&mut self) {
        tokio::time::sleep(self.interval).await;
    }
}
