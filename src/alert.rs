// High-CPU alert decision and message text.

use crate::format::{escape_markdown, fmt_bytes, fmt_mem};
use crate::models::NormalizedMetrics;

/// Returns the alert text when `cpu_percent` is strictly above `threshold`.
///
/// Every qualifying sample alerts; there is no cooldown or de-duplication across ticks.
pub fn evaluate(metrics: &NormalizedMetrics, threshold: f64) -> Option<String> {
    if metrics.cpu_percent <= threshold {
        return None;
    }
    Some(format!(
        "⚠️ *HIGH CPU ALERT*\n\
         🕒 {}\n\
         🧩 Container: {}\n\
         🔥 CPU: *{:.1}%*\n\
         💾 MEM: {}\n\
         🌐 NET I/O: {} / {}\n\
         📀 BLOCK I/O: {} / {}",
        metrics.timestamp.format("%Y-%m-%d %H:%M:%S"),
        escape_markdown(&metrics.container_name),
        metrics.cpu_percent,
        fmt_mem(metrics.mem_usage_bytes, metrics.mem_limit_bytes),
        fmt_bytes(metrics.net_in_bytes),
        fmt_bytes(metrics.net_out_bytes),
        fmt_bytes(metrics.block_in_bytes),
        fmt_bytes(metrics.block_out_bytes),
    ))
}
