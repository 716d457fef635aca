use crate::cache::TaskCache;
use crate::client::WorkflowClient;
use crate::domain::EmployeeRecord;
use crate::logging::log_network_failure;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

// ==================================================
// DATA-REFRESH POLLER
// ==================================================

pub struct TaskMonitor {
    client: Arc<WorkflowClient>,
    cache: TaskCache,
    refresh_interval: Duration,
}

impl TaskMonitor {
    pub fn new(client: Arc<WorkflowClient>, cache: TaskCache, refresh_interval: Duration) -> Self {
        Self {
            client,
            cache,
            refresh_interval,
        }
    }

    /// Polls the read endpoint forever. Each successful fetch replaces the
    /// cached snapshot wholesale and then runs the callback; a failed
    /// fetch logs and leaves the previous snapshot on display. Nothing is
    /// retried ahead of the next scheduled poll.
    pub async fn start_polling<F, Fut>(&self, on_refresh: F)
    where
        F: Fn(Vec<EmployeeRecord>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            match self.client.fetch_employees().await {
                Ok(records) => {
                    self.cache.replace_all(records.clone()).await;
                    on_refresh(records).await;
                }
                Err(e) => log_network_failure("employee refresh", &e.to_string()),
            }

            sleep(self.refresh_interval).await;
        }
    }
}

// ==================================================
// COUNTDOWN DRIVER (1s re-render tick)
// ==================================================

/// Fires the callback once per second for as long as the watch surface is
/// alive. Every tick recomputes from the current wall clock, so ticks
/// skipped while the process was suspended self-correct on the next one —
/// there is no tick queue and no catch-up burst.
pub struct CountdownDriver {
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    pub fn start<F, Fut>(on_tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                on_tick().await;
            }
        });

        Self { handle }
    }

    /// Tears the ticker down when the surface goes away.
    pub fn stop(self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_roughly_once_per_second() {
        let count = Arc::new(AtomicU64::new(0));

        let driver = CountdownDriver::start({
            let count = count.clone();
            move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let ticks = count.load(Ordering::SeqCst);
        assert!(ticks >= 3, "expected at least 3 ticks, got {}", ticks);

        driver.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_the_ticker() {
        let count = Arc::new(AtomicU64::new(0));

        let driver = CountdownDriver::start({
            let count = count.clone();
            move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        driver.stop();
        let at_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
    }
}
