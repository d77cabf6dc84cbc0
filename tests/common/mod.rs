// Shared test helpers: fake stats source, recording notifier, sample builders

#![allow(dead_code)]

use bollard::models::{
    ContainerCpuStats, ContainerCpuUsage, ContainerMemoryStats, ContainerStatsResponse,
};
use chrono::{NaiveDate, NaiveDateTime};
use docker_monitor::docker_repo::{ContainerRef, SourceError, StatsSource};
use docker_monitor::models::NormalizedMetrics;
use docker_monitor::notifier::{Notifier, NotifyError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}

pub fn metrics(name: &str, cpu: f64, timestamp: NaiveDateTime) -> NormalizedMetrics {
    NormalizedMetrics {
        container_name: name.into(),
        cpu_percent: cpu,
        mem_usage_bytes: 128 * 1024 * 1024,
        mem_limit_bytes: 2 * 1024 * 1024 * 1024,
        net_in_bytes: 4096,
        net_out_bytes: 1024,
        block_in_bytes: 0,
        block_out_bytes: 10 * 1024 * 1024,
        timestamp,
    }
}

/// Stats yielding `cpu_percent` on a single core (`total / system * 100`).
pub fn raw_stats(cpu_percent: u64) -> ContainerStatsResponse {
    ContainerStatsResponse {
        cpu_stats: Some(ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(cpu_percent),
                percpu_usage: Some(vec![cpu_percent]),
                ..Default::default()
            }),
            system_cpu_usage: Some(100),
            ..Default::default()
        }),
        memory_stats: Some(ContainerMemoryStats {
            usage: Some(64 * 1024 * 1024),
            limit: Some(1024 * 1024 * 1024),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// In-memory runtime: `None` stats means the stats call fails for that container.
#[derive(Default)]
pub struct FakeSource {
    pub containers: Vec<(ContainerRef, Option<ContainerStatsResponse>)>,
    pub list_fails: bool,
}

impl FakeSource {
    pub fn with(mut self, name: &str, stats: Option<ContainerStatsResponse>) -> Self {
        self.containers.push((
            ContainerRef {
                id: format!("id-{name}"),
                name: name.to_string(),
            },
            stats,
        ));
        self
    }
}

impl StatsSource for FakeSource {
    async fn list_running(&self) -> Result<Vec<ContainerRef>, SourceError> {
        if self.list_fails {
            return Err(SourceError::Timeout(Duration::from_secs(5)));
        }
        Ok(self.containers.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn fetch_stats(
        &self,
        container: &ContainerRef,
    ) -> Result<ContainerStatsResponse, SourceError> {
        self.containers
            .iter()
            .find(|(c, _)| c.id == container.id)
            .and_then(|(_, s)| s.clone())
            .ok_or(SourceError::EmptyStream)
    }
}

/// Keeps every message it was asked to send; `fail` makes every send an error after recording.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(NotifyError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }
        Ok(())
    }
}
