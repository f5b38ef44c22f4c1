use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};

use crate::device::{DeviceApi, DeviceError, MotorPositions, OrbitParams};
use crate::orchestrator::{CommandError, OrbitApplyOutcome, Orchestrator, PendingOrbitParams};
use crate::poller::{PollEvent, PollOutcome, SlotSnapshot, StatusPoller, StatusRefresher, ViewSlot};
use crate::reconcile::{filter_catalog, CatalogView, ViewState};

/// Everything one connected device needs: the client, the latest view, the
/// poller, the orchestrator and the orbit parameters being edited.
///
/// Call [`Session::stop`] before dropping to release the polling task.
pub struct Session<C> {
    client: Arc<C>,
    slot: Arc<ViewSlot>,
    refresher: StatusRefresher<C>,
    poller: Mutex<StatusPoller<C>>,
    orchestrator: Orchestrator<C>,
    pending: StdMutex<PendingOrbitParams>,
}

impl<C: DeviceApi + Send + Sync + 'static> Session<C> {
    pub fn new(client: C, poll_interval: Duration) -> Self {
        let client = Arc::new(client);
        let slot = Arc::new(ViewSlot::new());
        let refresher = StatusRefresher::new(client.clone(), slot.clone());

        Self {
            poller: Mutex::new(StatusPoller::new(refresher.clone(), poll_interval)),
            orchestrator: Orchestrator::new(client.clone(), refresher.clone()),
            client,
            slot,
            refresher,
            pending: StdMutex::new(PendingOrbitParams::default()),
        }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn orchestrator(&self) -> &Orchestrator<C> {
        &self.orchestrator
    }

    /// Starts background polling. A no-op while already polling.
    pub async fn start(&self) -> bool {
        self.poller.lock().await.start()
    }

    pub async fn stop(&self) {
        self.poller.lock().await.stop().await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.refresher.subscribe()
    }

    pub fn view(&self) -> Option<Arc<ViewState>> {
        self.slot.current()
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        self.slot.snapshot()
    }

    /// Out-of-band fetch, bypassing the poll timer.
    pub async fn refresh_now(&self) -> PollOutcome {
        self.refresher.refresh().await
    }

    /// Fetches the catalog and marks the device-confirmed selection.
    pub async fn satellites(&self, search: &str) -> Result<CatalogView, DeviceError> {
        let entries = self.client.satellites().await?;
        let selected = self.slot.selected_satellite();
        Ok(filter_catalog(&entries, search, selected.as_deref()))
    }

    pub async fn motors(&self) -> Result<MotorPositions, DeviceError> {
        self.client.motors().await
    }

    pub fn pending_orbit(&self) -> PendingOrbitParams {
        *self.pending.lock().unwrap()
    }

    pub fn edit_pending_orbit(&self, edit: PendingOrbitParams) -> PendingOrbitParams {
        let mut pending = self.pending.lock().unwrap();
        pending.merge(edit);
        *pending
    }

    /// Fills the pending parameters from a named preset. Nothing is sent.
    pub fn load_preset(&self, name: &str) -> Result<OrbitParams, CommandError> {
        self.pending.lock().unwrap().load_preset(name)
    }

    /// Fills the pending parameters from the orbit the device last echoed.
    /// Uses the latest applied view; nothing is sent.
    pub fn load_current_orbit(&self) -> Result<PendingOrbitParams, CommandError> {
        let current = self
            .slot
            .current()
            .and_then(|view| view.orbit)
            .ok_or_else(|| CommandError::validation("device reports no orbit parameters"))?;

        let mut pending = self.pending.lock().unwrap();
        *pending = current.into();
        Ok(*pending)
    }

    pub async fn apply_pending_orbit(&self) -> Result<OrbitApplyOutcome, CommandError> {
        let params = self.pending.lock().unwrap().validate()?;
        self.orchestrator.apply_orbit(params).await
    }
}
