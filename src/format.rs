// Human-scaled byte strings for the daily log, alerts and reports.

const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];
const STEP: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Formats a byte count with one decimal in the smallest unit whose mantissa stays below 1024,
/// e.g. `1536` -> `1.5kB`. PB is the last unit and is never rolled over.
pub fn fmt_bytes(bytes: u64) -> String {
    let mut num = bytes as f64;
    let (scaled, last) = UNITS.split_at(UNITS.len() - 1);
    for unit in scaled {
        let mantissa = format!("{num:.1}");
        // 1023.96 would print as 1024.0; that belongs to the next unit
        if num < STEP && mantissa != "1024.0" {
            return format!("{mantissa}{unit}");
        }
        num /= STEP;
    }
    format!("{num:.1}{}", last[0])
}

/// Inverse of [`fmt_bytes`], exact up to the one-decimal rounding. Returns `None` for an
/// unknown unit or a mantissa that isn't a non-negative number.
pub fn parse_bytes(s: &str) -> Option<u64> {
    let s = s.trim();
    // Longest suffixes first so "kB" isn't read as "B"
    let (exp, mantissa) = UNITS
        .iter()
        .enumerate()
        .rev()
        .find_map(|(exp, unit)| s.strip_suffix(*unit).map(|m| (exp, m)))?;
    let mantissa: f64 = mantissa.parse().ok()?;
    if !mantissa.is_finite() || mantissa < 0.0 {
        return None;
    }
    Some((mantissa * STEP.powi(exp as i32)).round() as u64)
}

/// The `MEM=` field: usage in whole MiB, limit in whole GiB.
pub fn fmt_mem(usage_bytes: u64, limit_bytes: u64) -> String {
    format!(
        "{:.0}MiB / {:.0}GiB",
        usage_bytes as f64 / MIB,
        limit_bytes as f64 / GIB
    )
}

/// Escapes text for Telegram's legacy `Markdown` parse mode so it renders literally.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
