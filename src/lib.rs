pub mod anomaly;
pub mod orbit;
pub mod report;
pub mod store;
pub mod web;
