use crate::report::IoTotals;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Without this section notifications only go to the process log.
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the daily `docker_YYYY-MM-DD.log` files. A leading `~/` is expanded.
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Alert when a container's CPU percent is strictly above this.
    #[serde(default = "default_cpu_threshold")]
    pub cpu_threshold: f64,
    #[serde(default = "default_timeout_secs")]
    pub stats_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Local wall-clock time at or after which the daily report is sent.
    #[serde(default = "default_report_hour")]
    pub hour: u32,
    #[serde(default = "default_report_minute")]
    pub minute: u32,
    #[serde(default)]
    pub io_totals: IoTotals,
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_log_dir() -> String {
    "~/docker_monitor_logs".into()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_cpu_threshold() -> f64 {
    80.0
}

fn default_report_hour() -> u32 {
    17
}

fn default_report_minute() -> u32 {
    59
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cpu_threshold: default_cpu_threshold(),
            stats_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            hour: default_report_hour(),
            minute: default_report_minute(),
            io_totals: IoTotals::default(),
        }
    }
}

impl LoggingConfig {
    /// `dir` with a leading `~/` replaced by `$HOME`.
    pub fn resolved_dir(&self) -> PathBuf {
        match (self.dir.strip_prefix("~/"), std::env::var_os("HOME")) {
            (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
            _ => PathBuf::from(&self.dir),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(telegram) = &self.telegram {
            anyhow::ensure!(
                !telegram.bot_token.is_empty(),
                "telegram.bot_token must be non-empty"
            );
            anyhow::ensure!(
                !telegram.chat_id.is_empty(),
                "telegram.chat_id must be non-empty"
            );
            anyhow::ensure!(
                telegram.api_base.starts_with("http://") || telegram.api_base.starts_with("https://"),
                "telegram.api_base must be an http(s) URL, got {}",
                telegram.api_base
            );
            anyhow::ensure!(
                telegram.timeout_secs > 0,
                "telegram.timeout_secs must be > 0, got {}",
                telegram.timeout_secs
            );
        }
        anyhow::ensure!(!self.logging.dir.is_empty(), "logging.dir must be non-empty");
        anyhow::ensure!(
            self.monitoring.interval_secs > 0,
            "monitoring.interval_secs must be > 0, got {}",
            self.monitoring.interval_secs
        );
        anyhow::ensure!(
            self.monitoring.cpu_threshold.is_finite() && self.monitoring.cpu_threshold >= 0.0,
            "monitoring.cpu_threshold must be a finite number >= 0, got {}",
            self.monitoring.cpu_threshold
        );
        anyhow::ensure!(
            self.monitoring.stats_timeout_secs > 0,
            "monitoring.stats_timeout_secs must be > 0, got {}",
            self.monitoring.stats_timeout_secs
        );
        anyhow::ensure!(
            self.report.hour <= 23,
            "report.hour must be between 0 and 23, got {}",
            self.report.hour
        );
        anyhow::ensure!(
            self.report.minute <= 59,
            "report.minute must be between 0 and 59, got {}",
            self.report.minute
        );
        Ok(())
    }
}
