use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use tokio::time::sleep;

/// Pacing between consecutive detail requests
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait before the next law is fetched
    async fn pause(&self);
}

#[async_trait]
impl<T: Throttle + ?Sized> Throttle for &T {
    async fn pause(&self) {
        (**self).pause().await
    }
}

/// Fixed wall-clock delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("Sleeping {:?} before next request", self.delay);
        sleep(self.delay).await;
    }
}
