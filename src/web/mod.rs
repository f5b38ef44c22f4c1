pub mod api;
pub mod api_doc;
pub mod server;
pub mod ui;

pub use server::{router, run_server, AppState};
