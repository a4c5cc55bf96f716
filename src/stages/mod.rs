//! The three pipeline stages: subdomain enumeration, HTTP probing,
//! and historical-URL harvesting.

pub mod enumerate;
pub mod probe;
pub mod wayback;

pub use enumerate::EnumerateStage;
pub use probe::ProbeStage;
pub use wayback::WaybackStage;
