use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::Tick;

/// Repeating auto-advance timer owned by whoever started it.
///
/// The first tick arrives one full period after `start`. The timer task ends
/// when [`AutoAdvance::stop`] is called, when the handle is dropped, when the
/// parent token is cancelled, or when nobody listens for ticks any more.
#[derive(Debug)]
pub struct AutoAdvance {
    period: Duration,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    pub fn start(period: Duration, ticks: Sender<Tick>, parent: &CancellationToken) -> Self {
        let cancel = parent.child_token();
        let handle = tokio::spawn(run(period, ticks, cancel.clone()));
        info!(period_ms = period.as_millis() as u64, "auto-advance started");
        Self {
            period,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the timer and wait for its task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("auto-advance stopped");
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(period: Duration, ticks: Sender<Tick>, cancel: CancellationToken) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if ticks.send(Tick).await.is_err() {
                    debug!("tick receiver closed");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn first_tick_after_one_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let root = CancellationToken::new();
        let start = Instant::now();
        let timer = AutoAdvance::start(Duration::from_millis(6500), tx, &root);

        assert_eq!(rx.recv().await, Some(Tick));
        assert!(start.elapsed() >= Duration::from_millis(6500));
        assert_eq!(rx.recv().await, Some(Tick));
        assert!(start.elapsed() >= Duration::from_millis(13000));
        timer.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_closes_tick_stream() {
        let (tx, mut rx) = mpsc::channel(4);
        let root = CancellationToken::new();
        let timer = AutoAdvance::start(Duration::from_millis(100), tx, &root);
        assert!(timer.is_running());
        timer.stop().await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancel_and_drop_end_the_task() {
        let (tx, mut rx) = mpsc::channel(4);
        let root = CancellationToken::new();
        let _timer = AutoAdvance::start(Duration::from_millis(100), tx, &root);
        root.cancel();
        assert_eq!(rx.recv().await, None);

        let (tx, mut rx) = mpsc::channel(4);
        let timer = AutoAdvance::start(Duration::from_millis(100), tx, &CancellationToken::new());
        drop(timer);
        assert_eq!(rx.recv().await, None);
    }
}
