// Per-container metrics sampled on one tick

use chrono::NaiveDateTime;

/// One container's resource usage at one sampling instant.
///
/// Network and block I/O are cumulative since container start, not deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetrics {
    pub container_name: String,
    pub cpu_percent: f64,
    pub mem_usage_bytes: u64,
    pub mem_limit_bytes: u64,
    pub net_in_bytes: u64,
    pub net_out_bytes: u64,
    pub block_in_bytes: u64,
    pub block_out_bytes: u64,
    pub timestamp: NaiveDateTime,
}
