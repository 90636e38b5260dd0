use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

const STOP_REPEAT_PERIOD: Duration = Duration::from_millis(100);
const STOP_REPEATS: usize = 10;

/// What ends a magnetometer service.
#[derive(Clone, Copy, Debug, PartialEq)]
enum StopTrigger {
    Elapsed(Duration),
    CtrlC,
}

impl From<Option<u64>> for StopTrigger {
    fn from(run_for_millis: Option<u64>) -> Self {
        match run_for_millis {
            Some(millis) => StopTrigger::Elapsed(Duration::from_millis(millis)),
            None => StopTrigger::CtrlC,
        }
    }
}

/// Resolves once the trigger fires. Returns false if Ctrl+C could not be awaited.
async fn wait_for(trigger: StopTrigger) -> bool {
    match trigger {
        StopTrigger::Elapsed(run_for) => {
            tokio::time::sleep(run_for).await;
            info!("Magnetometer service ran for {:?}, stopping", run_for);
            true
        }
        StopTrigger::CtrlC => match signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, stopping magnetometer service");
                true
            }
            Err(e) => {
                error!("Error while waiting for Ctrl+C: {}", e);
                false
            }
        },
    }
}

// The stream task only waits on `notify` between two events, so one wake-up can be missed.
async fn broadcast_stop(notify: &Notify, repeats: usize, period: Duration) {
    for _ in 0..repeats {
        notify.notify_waiters();
        tokio::time::sleep(period).await;
    }
}

/// Spawns a task that wakes every waiter on `notify` after `run_for_millis`, or on
/// Ctrl+C when `None`.
pub(crate) fn listen_for_shutdown(
    notify: Arc<Notify>,
    run_for_millis: Option<u64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if wait_for(StopTrigger::from(run_for_millis)).await {
            broadcast_stop(&notify, STOP_REPEATS, STOP_REPEAT_PERIOD).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    #[test]
    fn test_trigger_from_run_for() {
        assert_eq!(
            StopTrigger::from(Some(250)),
            StopTrigger::Elapsed(Duration::from_millis(250))
        );
        assert_eq!(StopTrigger::from(None), StopTrigger::CtrlC);
    }

    #[tokio::test]
    async fn test_stop_not_sent_before_run_for_elapses() {
        let notify = Arc::new(Notify::new());
        let handle = listen_for_shutdown(notify.clone(), Some(300));

        let early = timeout(Duration::from_millis(100), notify.notified()).await;
        assert!(early.is_err());

        let stop = timeout(Duration::from_millis(500), notify.notified()).await;
        assert!(stop.is_ok());
        handle.abort();
    }

    #[tokio::test]
    async fn test_broadcast_stop_is_bounded() {
        let notify = Arc::new(Notify::new());
        let woken = Arc::new(AtomicUsize::new(0));
        let waiter = {
            let notify = notify.clone();
            let woken = woken.clone();
            tokio::spawn(async move {
                loop {
                    notify.notified().await;
                    woken.fetch_add(1, Ordering::SeqCst);
                }
            })
        };
        tokio::task::yield_now().await;

        broadcast_stop(&notify, 3, Duration::from_millis(20)).await;
        waiter.abort();

        let woken = woken.load(Ordering::SeqCst);
        assert!((1..=3).contains(&woken), "woken {} times", woken);
    }

    #[tokio::test]
    async fn test_listen_for_shutdown_finishes_after_repeats() {
        let notify = Arc::new(Notify::new());
        let handle = listen_for_shutdown(notify, Some(10));

        let finished = timeout(
            Duration::from_millis(10) + STOP_REPEAT_PERIOD * (STOP_REPEATS as u32 + 5),
            handle,
        )
        .await;
        assert!(finished.is_ok());
    }
}
