// Daily report: re-derived from the day's log file on every run.

use crate::format::{escape_markdown, fmt_bytes, parse_bytes};
use crate::log_store::LogStore;
use crate::models::ParsedLogEntry;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;

/// How the report fills the net/block I/O figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoTotals {
    /// I/O figures are not accumulated from the log and render as `0`.
    #[default]
    Unaccumulated,
    /// Last cumulative counter value logged that day, re-scaled for display.
    Latest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerAggregate {
    pub name: String,
    pub avg_cpu_percent: f64,
    pub samples: usize,
    pub net_in_bytes: u64,
    pub net_out_bytes: u64,
    pub block_in_bytes: u64,
    pub block_out_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub io_totals: IoTotals,
    /// In order of first appearance in the log.
    pub containers: Vec<ContainerAggregate>,
}

/// Reads `date`'s log and aggregates it per container.
pub fn build_report(
    store: &LogStore,
    date: NaiveDate,
    io_totals: IoTotals,
) -> io::Result<DailyReport> {
    let entries = store.read_day(date)?;
    Ok(aggregate(date, &entries, io_totals))
}

/// Groups entries by container name and averages CPU.
pub fn aggregate(date: NaiveDate, entries: &[ParsedLogEntry], io_totals: IoTotals) -> DailyReport {
    struct Acc {
        cpu_sum: f64,
        samples: usize,
        io: [u64; 4],
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Acc> = HashMap::new();
    for e in entries {
        let acc = groups.entry(e.container_name.as_str()).or_insert_with(|| {
            order.push(e.container_name.as_str());
            Acc {
                cpu_sum: 0.0,
                samples: 0,
                io: [0; 4],
            }
        });
        acc.cpu_sum += e.cpu_percent;
        acc.samples += 1;
        if io_totals == IoTotals::Latest {
            let fields = [&e.net_in, &e.net_out, &e.block_in, &e.block_out];
            for (slot, field) in acc.io.iter_mut().zip(fields) {
                if let Some(bytes) = parse_bytes(field) {
                    *slot = bytes;
                }
            }
        }
    }

    let containers = order
        .into_iter()
        .filter_map(|name| {
            let acc = groups.remove(name)?;
            let [net_in, net_out, block_in, block_out] = acc.io;
            Some(ContainerAggregate {
                name: name.to_string(),
                avg_cpu_percent: acc.cpu_sum / acc.samples as f64,
                samples: acc.samples,
                net_in_bytes: net_in,
                net_out_bytes: net_out,
                block_in_bytes: block_in,
                block_out_bytes: block_out,
            })
        })
        .collect();

    DailyReport {
        date,
        io_totals,
        containers,
    }
}

impl DailyReport {
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Markdown text for the notifier; stays readable as plain text.
    pub fn render(&self) -> String {
        let mut out = format!("*📊 Daily Docker Report ({})*\n\n", self.date.format("%Y-%m-%d"));
        if self.containers.is_empty() {
            out.push_str("No container samples recorded.\n");
            return out;
        }
        for c in &self.containers {
            out.push_str(&format!(
                "🧩 {}\n\
                 🔥 Avg CPU: {:.2}%\n\
                 🌐 Net I/O: IN {} | OUT {}\n\
                 📀 Block I/O: IN {} | OUT {}\n\n",
                escape_markdown(&c.name),
                c.avg_cpu_percent,
                self.io_figure(c.net_in_bytes),
                self.io_figure(c.net_out_bytes),
                self.io_figure(c.block_in_bytes),
                self.io_figure(c.block_out_bytes),
            ));
        }
        out
    }

    fn io_figure(&self, bytes: u64) -> String {
        match self.io_totals {
            IoTotals::Unaccumulated => bytes.to_string(),
            IoTotals::Latest => fmt_bytes(bytes),
        }
    }
}
