// Domain models

mod log_entry;
mod metrics;

pub use log_entry::ParsedLogEntry;
pub use metrics::NormalizedMetrics;
