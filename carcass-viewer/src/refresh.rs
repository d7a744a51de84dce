//! Recurring background tasks
//!
//! A [`RecurringTask`] is the handle for one periodic job (list refresh,
//! health check). The job stops when the handle is cancelled, shut down or
//! dropped. Results are published through a `watch` channel as
//! [`Snapshot`]s; a tick still in flight at cancellation is abandoned and
//! its result is never published.

use std::future::Future;
use std::time::Duration;

use carcass_common::CarcassRecord;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::list_view::load_list;
use crate::view_state::{ConnectivityBanner, ViewState};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One published result; `generation` is 0 for the initial value and
/// increases by one per completed tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub value: T,
}

/// Handle to a periodic background job
pub struct RecurringTask {
    name: &'static str,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    /// Run `tick` now and then every `period`, publishing each result
    ///
    /// A slow tick delays the next one rather than overlapping it.
    pub fn spawn<T, F, Fut>(
        name: &'static str,
        period: Duration,
        initial: T,
        mut tick: F,
    ) -> (Self, watch::Receiver<Snapshot<T>>)
    where
        T: Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = watch::channel(Snapshot {
            generation: 0,
            value: initial,
        });
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period.max(MIN_PERIOD));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut generation = 0;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let value = tokio::select! {
                    _ = token.cancelled() => break,
                    value = tick() => value,
                };

                generation += 1;
                if tx.send(Snapshot { generation, value }).is_err() {
                    debug!("{}: no receivers left", name);
                    break;
                }
            }
            debug!("{} stopped", name);
        });

        (
            Self {
                name,
                cancel,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the job; results of an in-flight tick are discarded
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("{} ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Periodically re-fetch the record list
pub fn spawn_list_refresh(
    client: ApiClient,
    period: Duration,
) -> (RecurringTask, watch::Receiver<Snapshot<ViewState<Vec<CarcassRecord>>>>) {
    RecurringTask::spawn("list refresh", period, ViewState::Loading, move || {
        let client = client.clone();
        async move { load_list(&client).await }
    })
}

/// Periodically check server health
pub fn spawn_health_monitor(
    client: ApiClient,
    period: Duration,
) -> (RecurringTask, watch::Receiver<Snapshot<ConnectivityBanner>>) {
    RecurringTask::spawn("health monitor", period, ConnectivityBanner::Unknown, move || {
        let client = client.clone();
        async move { ConnectivityBanner::from_health(&client.health().await) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, timeout};

    fn counting(period: Duration) -> (RecurringTask, watch::Receiver<Snapshot<usize>>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = count.clone();
        let (task, rx) = RecurringTask::spawn("counter", period, 0, move || {
            let ticks = ticks.clone();
            async move { ticks.fetch_add(1, Ordering::SeqCst) + 1 }
        });
        (task, rx, count)
    }

    #[tokio::test]
    async fn test_ticks_publish_increasing_generations() {
        let (task, mut rx, _) = counting(Duration::from_millis(20));
        assert_eq!(rx.borrow().generation, 0);

        let mut last = 0;
        for _ in 0..3 {
            timeout(Duration::from_secs(2), rx.changed())
                .await
                .expect("tick within timeout")
                .expect("sender alive");
            let snapshot = rx.borrow_and_update().clone();
            assert!(snapshot.generation > last);
            assert_eq!(snapshot.value as u64, snapshot.generation);
            last = snapshot.generation;
        }

        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_ticking() {
        let (task, mut rx, count) = counting(Duration::from_millis(5));
        timeout(Duration::from_secs(2), rx.changed()).await.unwrap().unwrap();

        task.shutdown().await;
        let after = count.load(Ordering::SeqCst);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after);

        // Sender is gone once the task has ended
        rx.borrow_and_update();
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_in_flight_tick_is_discarded() {
        let (task, rx) = RecurringTask::spawn("slow", Duration::from_millis(5), 0u32, || async {
            sleep(Duration::from_secs(3600)).await;
            1
        });
        sleep(Duration::from_millis(20)).await;

        task.cancel();
        assert!(task.is_cancelled());
        timeout(Duration::from_secs(2), task.shutdown())
            .await
            .expect("cancellation interrupts the tick");
        assert_eq!(*rx.borrow(), Snapshot { generation: 0, value: 0 });
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let (task, mut rx, _) = counting(Duration::from_millis(5));
        drop(task);

        let closed = timeout(Duration::from_secs(2), async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
