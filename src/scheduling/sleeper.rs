use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

pub type DynamicSleeper = Box<dyn Sleeper + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Cancelled,
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration) -> Wake;
}

/// Real timer that a shutdown signal can cut short.
#[derive(Debug, Clone)]
pub struct TokioSleeper {
    shutdown: watch::Receiver<bool>,
}

impl TokioSleeper {
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self { shutdown }
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> Wake {
        let mut shutdown = self.shutdown.clone();
        if *shutdown.borrow_and_update() {
            return Wake::Cancelled;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => Wake::Elapsed,
            /* a dropped sender also means nobody can keep us alive */
            _ = shutdown.changed() => Wake::Cancelled,
        }
    }
}
