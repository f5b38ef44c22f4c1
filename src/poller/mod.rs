mod poller;
mod slot;

pub use poller::{PollEvent, PollOutcome, StatusPoller, StatusRefresher};
pub use slot::{Connectivity, SlotSnapshot, ViewSlot};
