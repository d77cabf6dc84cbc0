// Config loading and validation tests

use docker_monitor::config::AppConfig;
use docker_monitor::report::IoTotals;

const VALID_CONFIG: &str = r#"
[telegram]
bot_token = "123:abc"
chat_id = "-1001"

[logging]
dir = "/var/log/docker-monitor"

[monitoring]
interval_secs = 300
cpu_threshold = 80.0
stats_timeout_secs = 5

[report]
hour = 17
minute = 59
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    let telegram = config.telegram.expect("telegram section");
    assert_eq!(telegram.bot_token, "123:abc");
    assert_eq!(telegram.chat_id, "-1001");
    assert_eq!(telegram.api_base, "https://api.telegram.org");
    assert_eq!(telegram.timeout_secs, 5);
    assert_eq!(config.logging.dir, "/var/log/docker-monitor");
    assert_eq!(config.monitoring.interval_secs, 300);
    assert_eq!(config.monitoring.cpu_threshold, 80.0);
    assert_eq!(config.report.hour, 17);
    assert_eq!(config.report.minute, 59);
    assert_eq!(config.report.io_totals, IoTotals::Unaccumulated);
}

#[test]
fn test_config_defaults_when_empty() {
    let config = AppConfig::load_from_str("").expect("empty config");
    assert!(config.telegram.is_none());
    assert_eq!(config.logging.dir, "~/docker_monitor_logs");
    assert_eq!(config.monitoring.interval_secs, 300);
    assert_eq!(config.monitoring.cpu_threshold, 80.0);
    assert_eq!(config.monitoring.stats_timeout_secs, 5);
    assert_eq!((config.report.hour, config.report.minute), (17, 59));
}

#[test]
fn test_config_io_totals_latest() {
    let config =
        AppConfig::load_from_str("[report]\nio_totals = \"latest\"\n").expect("io_totals");
    assert_eq!(config.report.io_totals, IoTotals::Latest);
    assert!(AppConfig::load_from_str("[report]\nio_totals = \"sum\"\n").is_err());
}

#[test]
fn test_config_resolves_home_in_log_dir() {
    let config = AppConfig::load_from_str("").unwrap();
    let resolved = config.logging.resolved_dir();
    if let Some(home) = std::env::var_os("HOME") {
        assert_eq!(
            resolved,
            std::path::PathBuf::from(home).join("docker_monitor_logs")
        );
    }
    let absolute = AppConfig::load_from_str("[logging]\ndir = \"/tmp/x\"\n").unwrap();
    assert_eq!(
        absolute.logging.resolved_dir(),
        std::path::PathBuf::from("/tmp/x")
    );
}

#[test]
fn test_config_validation_rejects_empty_bot_token() {
    let bad = VALID_CONFIG.replace("bot_token = \"123:abc\"", "bot_token = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("telegram.bot_token"));
}

#[test]
fn test_config_validation_rejects_empty_chat_id() {
    let bad = VALID_CONFIG.replace("chat_id = \"-1001\"", "chat_id = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("telegram.chat_id"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_secs = 300", "interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitoring.interval_secs"));
}

#[test]
fn test_config_validation_rejects_negative_threshold() {
    let bad = VALID_CONFIG.replace("cpu_threshold = 80.0", "cpu_threshold = -1.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitoring.cpu_threshold"));
}

#[test]
fn test_config_validation_rejects_stats_timeout_zero() {
    let bad = VALID_CONFIG.replace("stats_timeout_secs = 5", "stats_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitoring.stats_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_report_hour_out_of_range() {
    let bad = VALID_CONFIG.replace("hour = 17", "hour = 24");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("report.hour"));
}

#[test]
fn test_config_validation_rejects_report_minute_out_of_range() {
    let bad = VALID_CONFIG.replace("minute = 59", "minute = 60");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("report.minute"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.monitoring.interval_secs, 300);
    assert_eq!(config.logging.dir, "/var/log/docker-monitor");
}
