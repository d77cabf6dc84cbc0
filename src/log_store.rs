// Append-only daily log: one text file per calendar day, re-read for the daily report.
//
// File layout (the parse contract for read_day):
//   [YYYY-MM-DD HH:MM:SS]
//   <name> CPU=<f1> MEM=<n>MiB / <n>GiB NET_IN=<scaled> NET_OUT=<scaled> BLOCK_IN=<scaled> BLOCK_OUT=<scaled>
//   ---------------------------------------

use crate::format::{fmt_bytes, fmt_mem};
use crate::models::{NormalizedMetrics, ParsedLogEntry};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const HEADER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = "---------------------------------------";
const CPU_MARKER: &str = "CPU=";

pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    /// Uses `dir` as the log directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/docker_YYYY-MM-DD.log`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("docker_{}.log", date.format("%Y-%m-%d")))
    }

    /// Appends one tick block (header, one line per record, separator) to the file of
    /// `timestamp`'s day. The block is written with a single `write_all`.
    #[instrument(skip(self, records), fields(operation = "append", records_count = records.len()))]
    pub fn append(&self, timestamp: NaiveDateTime, records: &[NormalizedMetrics]) -> io::Result<()> {
        let mut block = format!("[{}]\n", timestamp.format(HEADER_FORMAT));
        for m in records {
            block.push_str(&format_line(m));
            block.push('\n');
        }
        block.push_str(SEPARATOR);
        block.push('\n');

        let path = self.path_for(timestamp.date());
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(block.as_bytes())?;
        debug!(path = %path.display(), "tick appended");
        Ok(())
    }

    /// Data lines of `date`'s log, in file order. A missing file is an empty day.
    ///
    /// Lines without `CPU=` or with a malformed field are skipped, as are lines written under a
    /// header whose date isn't `date` or that doesn't parse, up to the next good header. Lines
    /// before the first header are kept.
    #[instrument(skip(self), fields(operation = "read_day"))]
    pub fn read_day(&self, date: NaiveDate) -> io::Result<Vec<ParsedLogEntry>> {
        let bytes = match fs::read(self.path_for(date)) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let text = String::from_utf8_lossy(&bytes);

        let mut entries = Vec::new();
        let mut block = Block::Unheaded;
        let mut skipped = 0usize;
        for line in text.lines() {
            let line = line.trim();
            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                block = match NaiveDateTime::parse_from_str(header, HEADER_FORMAT) {
                    Ok(t) => Block::At(t),
                    Err(_) => Block::BadHeader,
                };
                continue;
            }
            if !line.contains(CPU_MARKER) {
                continue;
            }
            let recorded_at = match block {
                Block::Unheaded => None,
                Block::At(t) if t.date() == date => Some(t),
                Block::At(_) | Block::BadHeader => {
                    skipped += 1;
                    continue;
                }
            };
            match parse_line(line, recorded_at) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }
        debug!(entries = entries.len(), skipped, "day read");
        Ok(entries)
    }
}

/// One data line, without the trailing newline.
fn format_line(m: &NormalizedMetrics) -> String {
    format!(
        "{} CPU={:.1} MEM={} NET_IN={} NET_OUT={} BLOCK_IN={} BLOCK_OUT={}",
        m.container_name,
        m.cpu_percent,
        fmt_mem(m.mem_usage_bytes, m.mem_limit_bytes),
        fmt_bytes(m.net_in_bytes),
        fmt_bytes(m.net_out_bytes),
        fmt_bytes(m.block_in_bytes),
        fmt_bytes(m.block_out_bytes),
    )
}

/// Which header the current line was written under.
#[derive(Clone, Copy)]
enum Block {
    Unheaded,
    At(NaiveDateTime),
    BadHeader,
}

fn parse_line(line: &str, recorded_at: Option<NaiveDateTime>) -> Option<ParsedLogEntry> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    if name.contains('=') {
        return None;
    }

    let mut cpu = None;
    let mut net_in = None;
    let mut net_out = None;
    let mut block_in = None;
    let mut block_out = None;
    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key {
            "CPU" => cpu = value.parse::<f64>().ok().filter(|v| v.is_finite()),
            "NET_IN" => net_in = Some(value),
            "NET_OUT" => net_out = Some(value),
            "BLOCK_IN" => block_in = Some(value),
            "BLOCK_OUT" => block_out = Some(value),
            _ => {}
        }
    }

    Some(ParsedLogEntry {
        container_name: name.to_string(),
        cpu_percent: cpu?,
        net_in: net_in?.to_string(),
        net_out: net_out?.to_string(),
        block_in: block_in?.to_string(),
        block_out: block_out?.to_string(),
        recorded_at,
    })
}
