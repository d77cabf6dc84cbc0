// Sampling loop: one tick per interval over all running containers, plus the once-a-day report.
// Everything runs on the caller's task; a tick finishes before the next one is awaited.

use crate::alert;
use crate::docker_repo::{StatsSource, stats};
use crate::log_store::LogStore;
use crate::notifier::Notifier;
use crate::report::{self, IoTotals};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument, warn};

/// Decides when the daily report is due: the first check at or after the trigger time on a
/// date that hasn't had a report yet.
#[derive(Debug, Clone)]
pub struct ReportTrigger {
    at: NaiveTime,
    last_report_date: Option<NaiveDate>,
}

impl ReportTrigger {
    pub fn new(hour: u32, minute: u32) -> anyhow::Result<Self> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid report time {:02}:{:02}", hour, minute))?;
        Ok(Self {
            at,
            last_report_date: None,
        })
    }

    pub fn due(&self, now: NaiveDateTime) -> bool {
        now.time() >= self.at && self.last_report_date != Some(now.date())
    }

    pub fn mark_sent(&mut self, date: NaiveDate) {
        self.last_report_date = Some(date);
    }

    pub fn last_report_date(&self) -> Option<NaiveDate> {
        self.last_report_date
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub cpu_threshold: f64,
    pub io_totals: IoTotals,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub sampled: usize,
    pub skipped: usize,
    pub alerts_sent: usize,
    pub report_sent: bool,
}

pub struct Scheduler<S, N> {
    source: S,
    notifier: N,
    store: LogStore,
    config: SchedulerConfig,
    trigger: ReportTrigger,
}

impl<S: StatsSource, N: Notifier> Scheduler<S, N> {
    pub fn new(
        source: S,
        notifier: N,
        store: LogStore,
        config: SchedulerConfig,
        trigger: ReportTrigger,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            config,
            trigger,
        }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn trigger(&self) -> &ReportTrigger {
        &self.trigger
    }

    /// Ticks every `config.interval` (first tick immediately) until `shutdown` resolves.
    #[instrument(name = "scheduler", skip_all, fields(interval_secs = self.config.interval.as_secs()))]
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        let mut tick = interval(self.config.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let now = chrono::Local::now().naive_local();
                    let summary = self.run_tick(now).await;
                    debug!(
                        sampled = summary.sampled,
                        skipped = summary.skipped,
                        alerts_sent = summary.alerts_sent,
                        report_sent = summary.report_sent,
                        "tick complete"
                    );
                }
                _ = &mut shutdown => {
                    info!("Scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// One sampling pass at `now`: normalize every running container, append the block to the
    /// day's log, alert on high CPU, then send the daily report if it's due.
    pub async fn run_tick(&mut self, now: NaiveDateTime) -> TickSummary {
        let mut summary = TickSummary::default();

        let containers = match self.source.list_running().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, operation = "list_running", "listing containers failed");
                Vec::new()
            }
        };

        let mut records = Vec::with_capacity(containers.len());
        for container in &containers {
            // A container without stats this tick is skipped; the next tick retries it.
            let raw = match self.source.fetch_stats(container).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, operation = "fetch_stats", container = %container.name, "stats unavailable");
                    summary.skipped += 1;
                    continue;
                }
            };
            match stats::normalize(&raw, &container.name, now) {
                Some(m) => records.push(m),
                None => {
                    warn!(operation = "normalize", container = %container.name, "stats response missing required fields");
                    summary.skipped += 1;
                }
            }
        }
        summary.sampled = records.len();

        if let Err(e) = self.store.append(now, &records) {
            warn!(error = %e, operation = "append", "writing daily log failed");
        }

        for m in &records {
            let Some(message) = alert::evaluate(m, self.config.cpu_threshold) else {
                continue;
            };
            info!(container = %m.container_name, cpu_percent = m.cpu_percent, "high CPU");
            // Dropped on failure; the next tick alerts again if CPU is still high.
            match self.notifier.send(&message).await {
                Ok(()) => summary.alerts_sent += 1,
                Err(e) => {
                    warn!(error = %e, operation = "send_alert", container = %m.container_name, "alert not delivered")
                }
            }
        }

        summary.report_sent = self.maybe_send_report(now).await;
        summary
    }

    async fn maybe_send_report(&mut self, now: NaiveDateTime) -> bool {
        if !self.trigger.due(now) {
            return false;
        }
        let date = now.date();
        // Marked up front: a failed report is not retried later the same day.
        self.trigger.mark_sent(date);

        let daily = match report::build_report(&self.store, date, self.config.io_totals) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, operation = "build_report", %date, "reading daily log failed");
                return false;
            }
        };
        if daily.is_empty() {
            info!(%date, "no container samples logged today; daily report skipped");
            return false;
        }

        match self.notifier.send(&daily.render()).await {
            Ok(()) => {
                info!(%date, containers = daily.containers.len(), "daily report sent");
                true
            }
            Err(e) => {
                warn!(error = %e, operation = "send_report", %date, "daily report not delivered");
                false
            }
        }
    }
}
