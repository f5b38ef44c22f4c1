mod badges;
mod catalog;
mod format;
mod view;

pub use badges::{classify_tle_age, Badge, BadgeClass};
pub use catalog::{filter_catalog, CatalogRow, CatalogView};
pub use view::{reconcile, MotorReadout, TrackingPanel, ViewState};
