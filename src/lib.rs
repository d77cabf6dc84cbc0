// Library for tests to access modules

pub mod alert;
pub mod config;
pub mod docker_repo;
pub mod format;
pub mod log_store;
pub mod models;
pub mod notifier;
pub mod report;
pub mod scheduler;
