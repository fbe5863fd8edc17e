//! Background fleet refresh
//!
//! A tokio task ticks every poll interval (first tick immediately) and on
//! manual refresh requests. Each tick spawns a fetch; results are sent to
//! the UI thread over a std channel, tagged with the fetch's sequence number.
//! Dropping the poller aborts the task and any in-flight fetches.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::{self, JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::service::{FleetSnapshot, VehicleService};

/// Messages from the poller to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Started { seq: u64 },
    Completed { seq: u64, snapshot: FleetSnapshot },
    Failed { seq: u64, message: String },
}

/// Called after every event so the UI can wake up
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Handle to the running refresh task
pub struct FleetPoller {
    task: JoinHandle<()>,
    refresh: UnboundedSender<()>,
}

impl FleetPoller {
    pub fn spawn(
        runtime: &Handle,
        service: Arc<VehicleService>,
        interval: Duration,
        events: Sender<PollEvent>,
        notify: Notify,
    ) -> Self {
        let (refresh, mut refresh_rx) = unbounded_channel::<()>();

        let task = runtime.spawn(async move {
            info!(interval_secs = interval.as_secs(), "fleet poller started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut fetches: JoinSet<FleetSnapshot> = JoinSet::new();
            let mut in_flight: HashMap<task::Id, u64> = HashMap::new();
            let mut seq = 0u64;

            loop {
                let joined = tokio::select! {
                    _ = ticker.tick() => None,
                    Some(()) = refresh_rx.recv() => {
                        ticker.reset();
                        None
                    }
                    Some(joined) = fetches.join_next_with_id() => Some(joined),
                };

                let event = match joined {
                    Some(Ok((id, snapshot))) => match in_flight.remove(&id) {
                        Some(done) => PollEvent::Completed { seq: done, snapshot },
                        None => continue,
                    },
                    Some(Err(e)) => match in_flight.remove(&e.id()) {
                        Some(failed) => {
                            warn!(seq = failed, error = %e, "fleet fetch task failed");
                            PollEvent::Failed {
                                seq: failed,
                                message: e.to_string(),
                            }
                        }
                        None => continue,
                    },
                    None => {
                        seq += 1;
                        debug!(seq, "fetching fleet");
                        let service = service.clone();
                        let handle = fetches.spawn(async move { service.fetch_fleet().await });
                        in_flight.insert(handle.id(), seq);
                        PollEvent::Started { seq }
                    }
                };

                if events.send(event).is_err() {
                    debug!("poll receiver dropped, stopping poller");
                    break;
                }
                notify();
            }
        });

        Self { task, refresh }
    }

    /// Fetch immediately; the next periodic tick is pushed back a full interval
    pub fn refresh_now(&self) {
        let _ = self.refresh.send(());
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for FleetPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
