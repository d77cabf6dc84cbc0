// Docker container stats via bollard

pub mod stats;

use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use bollard::models::ContainerStatsResponse;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// A running container as listed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("docker api: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("docker request timed out after {0:?}")]
    Timeout(Duration),
    #[error("stats stream ended without a sample")]
    EmptyStream,
}

/// Where raw per-container counters come from.
pub trait StatsSource {
    async fn list_running(&self) -> Result<Vec<ContainerRef>, SourceError>;
    async fn fetch_stats(
        &self,
        container: &ContainerRef,
    ) -> Result<ContainerStatsResponse, SourceError>;
}

pub struct DockerRepo {
    docker: Docker,
    stats_timeout: Duration,
}

impl DockerRepo {
    /// `stats_timeout` bounds every runtime call, listing included.
    pub fn connect(stats_timeout: Duration) -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self {
            docker,
            stats_timeout,
        })
    }

    /// Like [`DockerRepo::connect`] but against an explicit unix socket path.
    pub fn connect_with_socket(path: &str, stats_timeout: Duration) -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix(path, 120, bollard::API_DEFAULT_VERSION)?;
        Ok(Self {
            docker,
            stats_timeout,
        })
    }
}

impl StatsSource for DockerRepo {
    async fn list_running(&self) -> Result<Vec<ContainerRef>, SourceError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers =
            tokio::time::timeout(self.stats_timeout, self.docker.list_containers(Some(filter)))
                .await
                .map_err(|_| SourceError::Timeout(self.stats_timeout))??;
        Ok(containers
            .into_iter()
            .map(|c| {
                let id = c.id.unwrap_or_default();
                let name = c
                    .names
                    .as_ref()
                    .and_then(|n| n.first())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| id.clone());
                ContainerRef { id, name }
            })
            .collect())
    }

    async fn fetch_stats(
        &self,
        container: &ContainerRef,
    ) -> Result<ContainerStatsResponse, SourceError> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(&container.id, Some(options));
        match tokio::time::timeout(self.stats_timeout, stream.next()).await {
            Ok(Some(result)) => Ok(result?),
            Ok(None) => Err(SourceError::EmptyStream),
            Err(_) => Err(SourceError::Timeout(self.stats_timeout)),
        }
    }
}
