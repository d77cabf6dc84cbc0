// Normalize a raw Docker stats response into NormalizedMetrics.

use crate::models::NormalizedMetrics;
use bollard::models::{ContainerBlkioStatEntry, ContainerStatsResponse};
use chrono::NaiveDateTime;

/// Converts one stats sample into a [`NormalizedMetrics`].
///
/// CPU percent is the single-sample ratio `total_usage / system_cpu_usage * 100 * cores`
/// computed from cumulative counters, not the delta against `precpu_stats`. `cores` is the
/// number of `percpu_usage` entries (1 when absent) and a missing `system_cpu_usage` counts
/// as 1.
///
/// Returns `None` when CPU total usage or memory usage/limit is missing, or when the
/// reported system usage is zero.
pub fn normalize(
    s: &ContainerStatsResponse,
    name: &str,
    timestamp: NaiveDateTime,
) -> Option<NormalizedMetrics> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let cpu_total = cpu_usage.total_usage?;
    let cpu_system = cpu_stats.system_cpu_usage.unwrap_or(1);
    if cpu_system == 0 {
        return None;
    }
    let cores = cpu_usage
        .percpu_usage
        .as_ref()
        .map_or(0, Vec::len)
        .max(1);
    let cpu_percent = (cpu_total as f64 / cpu_system as f64) * 100.0 * cores as f64;

    let memory = s.memory_stats.as_ref()?;
    let mem_usage = memory.usage?;
    let mem_limit = memory.limit?;

    let (net_in, net_out) = s.networks.as_ref().map_or((0u64, 0u64), |n| {
        n.values().fold((0u64, 0u64), |(rx, tx), v| {
            (
                rx.saturating_add(v.rx_bytes.unwrap_or(0)),
                tx.saturating_add(v.tx_bytes.unwrap_or(0)),
            )
        })
    });

    let (block_in, block_out) = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map_or((0u64, 0u64), |entries| sum_read_write(entries));

    Some(NormalizedMetrics {
        container_name: name.to_string(),
        cpu_percent,
        mem_usage_bytes: mem_usage,
        mem_limit_bytes: mem_limit,
        net_in_bytes: net_in,
        net_out_bytes: net_out,
        block_in_bytes: block_in,
        block_out_bytes: block_out,
        timestamp,
    })
}

// cgroup v1 reports "Read"/"Write", v2 "read"/"write"
fn sum_read_write(entries: &[ContainerBlkioStatEntry]) -> (u64, u64) {
    let mut read = 0u64;
    let mut write = 0u64;
    for e in entries {
        let value = e.value.unwrap_or(0);
        match e.op.as_deref() {
            Some(op) if op.eq_ignore_ascii_case("read") => read = read.saturating_add(value),
            Some(op) if op.eq_ignore_ascii_case("write") => write = write.saturating_add(value),
            _ => {}
        }
    }
    (read, write)
}
