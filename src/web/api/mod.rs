pub mod actions;
pub mod error;
pub mod orbit;
pub mod satellites;
pub mod view;
pub mod wifi;
