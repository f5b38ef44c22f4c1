use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::device::DeviceApi;
use crate::reconcile::{reconcile, ViewState};

use super::slot::ViewSlot;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub enum PollEvent {
    Applied { seq: u64, view: Arc<ViewState> },
    Failed { seq: u64, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Applied(Arc<ViewState>),
    /// A younger fetch, successful or not, landed first, or the poller
    /// stopped meanwhile.
    Discarded,
    Failed(String),
}

/// Fetches status, reconciles it and writes it through the [`ViewSlot`]
/// discard rule. Shared by the periodic poller and out-of-band refreshes.
pub struct StatusRefresher<C> {
    client: Arc<C>,
    slot: Arc<ViewSlot>,
    events: broadcast::Sender<PollEvent>,
}

impl<C> Clone for StatusRefresher<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            slot: self.slot.clone(),
            events: self.events.clone(),
        }
    }
}

impl<C: DeviceApi + Send + Sync + 'static> StatusRefresher<C> {
    pub fn new(client: Arc<C>, slot: Arc<ViewSlot>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            slot,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.events.subscribe()
    }

    pub fn slot(&self) -> &Arc<ViewSlot> {
        &self.slot
    }

    /// Fetch now and wait for the outcome.
    pub async fn refresh(&self) -> PollOutcome {
        let seq = self.slot.issue();
        self.fetch(seq, None).await
    }

    /// Fetch now in the background. The sequence id is taken before this
    /// returns, so call order decides which result wins.
    pub fn spawn_refresh(&self) -> JoinHandle<PollOutcome> {
        self.spawn_fetch(None)
    }

    fn spawn_fetch(&self, alive: Option<Arc<AtomicBool>>) -> JoinHandle<PollOutcome> {
        let seq = self.slot.issue();
        let this = self.clone();
        tokio::spawn(async move { this.fetch(seq, alive).await })
    }

    async fn fetch(&self, seq: u64, alive: Option<Arc<AtomicBool>>) -> PollOutcome {
        let result = self.client.status().await;

        if let Some(alive) = alive {
            if !alive.load(Ordering::SeqCst) {
                log::debug!("Discarding poll #{seq}: poller stopped");
                return PollOutcome::Discarded;
            }
        }

        match result {
            Ok(status) => match self.slot.apply(seq, reconcile(&status, Utc::now())) {
                Some(view) => {
                    let _ = self.events.send(PollEvent::Applied {
                        seq,
                        view: view.clone(),
                    });
                    PollOutcome::Applied(view)
                }
                None => {
                    log::debug!("Discarding poll #{seq}: superseded");
                    PollOutcome::Discarded
                }
            },
            Err(e) => {
                let message = e.to_string();
                log::warn!("Status poll #{seq} failed: {message}");
                if !self.slot.record_failure(seq, &message) {
                    log::debug!("Discarding failed poll #{seq}: superseded");
                    return PollOutcome::Discarded;
                }
                let _ = self.events.send(PollEvent::Failed {
                    seq,
                    message: message.clone(),
                });
                PollOutcome::Failed(message)
            }
        }
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
    alive: Arc<AtomicBool>,
}

/// Periodic status fetch: `Idle -> Running -> Idle`. At most one scheduled
/// fetch is outstanding; ticks that arrive while it runs are skipped.
pub struct StatusPoller<C> {
    refresher: StatusRefresher<C>,
    period: Duration,
    worker: Option<WorkerHandle>,
}

impl<C: DeviceApi + Send + Sync + 'static> StatusPoller<C> {
    pub fn new(refresher: StatusRefresher<C>, period: Duration) -> Self {
        Self {
            refresher,
            period,
            worker: None,
        }
    }

    /// Starts polling with one immediate fetch. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.worker.is_some() {
            return false;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let alive = Arc::new(AtomicBool::new(true));
        let join = tokio::spawn(run_poll_loop(
            self.refresher.clone(),
            self.period,
            alive.clone(),
            stop_rx,
        ));

        log::info!("Status poller started (every {:?})", self.period);
        self.worker = Some(WorkerHandle {
            stop_tx,
            join,
            alive,
        });
        true
    }

    /// Cancels the schedule. A fetch still in flight may complete, but its
    /// result is dropped.
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.alive.store(false, Ordering::SeqCst);
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            log::info!("Status poller stopped");
        }
    }
}

async fn run_poll_loop<C: DeviceApi + Send + Sync + 'static>(
    refresher: StatusRefresher<C>,
    period: Duration,
    alive: Arc<AtomicBool>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight: Option<JoinHandle<PollOutcome>> = None;

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        if in_flight.as_ref().is_some_and(|fetch| !fetch.is_finished()) {
            log::debug!("Skipping poll tick: previous fetch still running");
            continue;
        }
        in_flight = Some(refresher.spawn_fetch(Some(alive.clone())));
    }
}
