// A data line read back from the daily log

use chrono::NaiveDateTime;

/// Parsed form of one `<name> CPU=... NET_IN=...` log line.
///
/// The I/O fields stay in their scaled textual form (e.g. `12.3MB`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLogEntry {
    pub container_name: String,
    pub cpu_percent: f64,
    pub net_in: String,
    pub net_out: String,
    pub block_in: String,
    pub block_out: String,
    /// Timestamp of the `[...]` header this line was written under, if one preceded it.
    pub recorded_at: Option<NaiveDateTime>,
}
