use std::sync::{Arc, Mutex};

use serde::Serialize;
use utoipa::ToSchema;

use crate::reconcile::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Connectivity {
    /// No fetch has completed yet.
    Connecting,
    Online,
    /// The latest fetch failed; the displayed view is from an earlier one.
    Stale,
    /// The device was told to restart its network; failures are expected.
    Reconnecting,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SlotSnapshot {
    pub view: Option<ViewState>,
    pub connectivity: Connectivity,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct SlotState {
    issued: u64,
    /// Highest id whose result, success or failure, reached the slot.
    delivered: u64,
    view: Option<Arc<ViewState>>,
    connectivity: Connectivity,
    last_error: Option<String>,
    awaiting_reconnect: bool,
}

/// Single writer slot for the latest reconciled view.
///
/// Every fetch, scheduled or out-of-band, takes a sequence id from
/// [`ViewSlot::issue`] before it starts. A result, success or failure, is
/// taken only if its id is higher than the id of every result taken so far;
/// anything older is dropped. Taken results therefore follow issue order.
#[derive(Debug)]
pub struct ViewSlot {
    state: Mutex<SlotState>,
}

impl Default for ViewSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSlot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                issued: 0,
                delivered: 0,
                view: None,
                connectivity: Connectivity::Connecting,
                last_error: None,
                awaiting_reconnect: false,
            }),
        }
    }

    pub fn issue(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.issued += 1;
        state.issued
    }

    /// Stores `view` unless a younger fetch already landed.
    pub fn apply(&self, seq: u64, view: ViewState) -> Option<Arc<ViewState>> {
        let mut state = self.state.lock().unwrap();
        if seq <= state.delivered {
            return None;
        }

        let view = Arc::new(view);
        state.delivered = seq;
        state.view = Some(view.clone());
        state.connectivity = Connectivity::Online;
        state.last_error = None;
        state.awaiting_reconnect = false;
        Some(view)
    }

    /// Records a failed fetch. Returns `false` when a younger fetch already
    /// landed, in which case the failure says nothing about the current view.
    pub fn record_failure(&self, seq: u64, message: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        if seq <= state.delivered {
            return false;
        }

        state.delivered = seq;
        state.connectivity = if state.awaiting_reconnect {
            Connectivity::Reconnecting
        } else {
            Connectivity::Stale
        };
        state.last_error = Some(message.to_string());
        true
    }

    /// Treat fetch failures as an expected reconnect until the next success.
    pub fn expect_reconnect(&self) {
        let mut state = self.state.lock().unwrap();
        state.awaiting_reconnect = true;
        state.connectivity = Connectivity::Reconnecting;
    }

    pub fn current(&self) -> Option<Arc<ViewState>> {
        self.state.lock().unwrap().view.clone()
    }

    pub fn selected_satellite(&self) -> Option<String> {
        self.current().and_then(|view| view.satellite.clone())
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        let state = self.state.lock().unwrap();
        SlotSnapshot {
            view: state.view.as_deref().cloned(),
            connectivity: state.connectivity,
            last_error: state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceStatus;
    use crate::reconcile::reconcile;
    use chrono::Utc;

    fn view_for(satellite: &str) -> ViewState {
        let status = DeviceStatus {
            satellite: Some(satellite.to_string()),
            ..Default::default()
        };
        reconcile(&status, Utc::now())
    }

    #[test]
    fn sequence_ids_increase() {
        let slot = ViewSlot::new();
        assert_eq!(slot.issue(), 1);
        assert_eq!(slot.issue(), 2);
    }

    #[test]
    fn older_result_is_dropped_after_younger_applied() {
        let slot = ViewSlot::new();
        let older = slot.issue();
        let younger = slot.issue();

        assert!(slot.apply(younger, view_for("HUBBLE")).is_some());
        assert!(slot.apply(older, view_for("ISS")).is_none());

        assert_eq!(slot.selected_satellite().as_deref(), Some("HUBBLE"));
    }

    #[test]
    fn in_order_results_are_all_applied() {
        let slot = ViewSlot::new();
        let first = slot.issue();
        let second = slot.issue();

        assert!(slot.apply(first, view_for("ISS")).is_some());
        assert!(slot.apply(second, view_for("HUBBLE")).is_some());
        assert_eq!(slot.selected_satellite().as_deref(), Some("HUBBLE"));
    }

    #[test]
    fn failure_keeps_previous_view_and_marks_stale() {
        let slot = ViewSlot::new();
        let first = slot.issue();
        slot.apply(first, view_for("ISS"));

        let second = slot.issue();
        assert!(slot.record_failure(second, "device unreachable"));

        let snapshot = slot.snapshot();
        assert_eq!(snapshot.connectivity, Connectivity::Stale);
        assert_eq!(snapshot.last_error.as_deref(), Some("device unreachable"));
        assert_eq!(snapshot.view.unwrap().satellite.as_deref(), Some("ISS"));
    }

    #[test]
    fn superseded_failure_is_ignored() {
        let slot = ViewSlot::new();
        let older = slot.issue();
        let younger = slot.issue();
        slot.apply(younger, view_for("ISS"));

        assert!(!slot.record_failure(older, "timeout"));
        assert_eq!(slot.snapshot().connectivity, Connectivity::Online);
    }

    #[test]
    fn younger_failure_blocks_older_late_success() {
        let slot = ViewSlot::new();
        let first = slot.issue();
        slot.apply(first, view_for("ISS"));

        let older = slot.issue();
        let younger = slot.issue();
        assert!(slot.record_failure(younger, "timeout"));
        assert!(slot.apply(older, view_for("HUBBLE")).is_none());

        let snapshot = slot.snapshot();
        assert_eq!(snapshot.connectivity, Connectivity::Stale);
        assert_eq!(snapshot.last_error.as_deref(), Some("timeout"));
        assert_eq!(snapshot.view.unwrap().satellite.as_deref(), Some("ISS"));
    }

    #[test]
    fn expected_reconnect_lasts_until_next_success() {
        let slot = ViewSlot::new();
        slot.expect_reconnect();

        let seq = slot.issue();
        slot.record_failure(seq, "connection reset");
        assert_eq!(slot.snapshot().connectivity, Connectivity::Reconnecting);

        let seq = slot.issue();
        slot.apply(seq, view_for("ISS"));
        let seq = slot.issue();
        slot.record_failure(seq, "timeout");
        assert_eq!(slot.snapshot().connectivity, Connectivity::Stale);
    }
}
