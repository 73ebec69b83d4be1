//! Real [`Engine`] implementation shelling out to `podman`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use wheelsticks_utils::PathQuotedDisplay;

use super::{ContainerSpec, Engine, HealthOutcome, ImageRecord};
use crate::error::EngineError;
use crate::reconcile::metadata::DeploymentIntent;
use crate::task::Task;

/// One record as returned by `podman images --format json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawImageListEntry {
    id: String,
    digest: String,
    containers: u32,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

impl From<RawImageListEntry> for ImageRecord {
    fn from(raw: RawImageListEntry) -> Self {
        ImageRecord {
            image_id: raw.id,
            digest: raw.digest,
            container_count: raw.containers,
            intent: DeploymentIntent::from_labels(&raw.labels),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PodmanEngine;

impl PodmanEngine {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Engine for PodmanEngine {
    fn build(&self, build_context: &str) -> Result<String> {
        Task::new(format!("Building image for context {build_context:?}."), "podman")
            .args(["build", "--quiet", "--", build_context])
            .read()
    }

    fn save(&self, image_id: &str, destination: &Utf8Path) -> Result<()> {
        let message = format!("Saving image {image_id:?} to {}.", PathQuotedDisplay::new(destination));
        Task::new(message, "podman")
            .args([
                "save",
                "--format",
                "oci-archive",
                "--output",
                destination.as_str(),
                "--",
                image_id,
            ])
            .run()
    }

    fn load(&self, archive: &Utf8Path) -> Result<()> {
        Task::new(format!("Loading image file {}.", PathQuotedDisplay::new(archive)), "podman")
            .args(["load", "--input", archive.as_str()])
            .run()
    }

    fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let raw: Vec<RawImageListEntry> = Task::new("Listing images.", "podman")
            .quiet()
            .args(["images", "--format", "json"])
            .read_json()
            .context("Listing images")?;
        Ok(raw.into_iter().map(ImageRecord::from).collect())
    }

    fn create_container(&self, spec: &ContainerSpec<'_>) -> Result<()> {
        let mut task = Task::new(format!("Creating container {:?}.", spec.name), "podman").arg("create");
        if let Some(health_check) = spec.health_check {
            task = task.arg(format!("--health-cmd={health_check}"));
        }
        task = task.args(["--name", spec.name]);
        for network in spec.networks {
            task = task.arg(format!("--network={network}"));
        }
        for port_mapping in spec.port_mappings {
            task = task.arg(format!("--publish={port_mapping}"));
        }
        for volume_mount in spec.volume_mounts {
            task = task.arg(format!("--volume={volume_mount}"));
        }
        task.args(["--", spec.image_id]).run()
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        Task::new(format!("Removing container {name:?}."), "podman")
            .args(["rm", "--", name])
            .run()
    }

    fn network_exists(&self, name: &str) -> Result<bool> {
        let output = Task::new(format!("Probing network {name:?}."), "podman")
            .quiet()
            .args(["network", "exists", "--", name])
            .run_capturing()?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(EngineError::NetworkProbeFailed {
                network: name.to_string(),
            }
            .into()),
        }
    }

    fn create_network(&self, name: &str) -> Result<()> {
        Task::new(format!("Creating network {name:?}."), "podman")
            .args(["network", "create", "--", name])
            .run()
    }

    fn healthcheck_run(&self, container_name: &str, timeout: Duration) -> Result<HealthOutcome> {
        let mut child = std::process::Command::new("podman")
            .args(["healthcheck", "run", container_name])
            .spawn()
            .context("Spawning podman healthcheck run")?;
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().context("Polling podman healthcheck run")? {
                return Ok(if status.success() {
                    HealthOutcome::Healthy
                } else {
                    HealthOutcome::Unhealthy
                });
            }
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(HealthOutcome::TimedOut);
            }
            std::thread::sleep(Duration::from_millis(50).min(timeout));
        }
    }

    fn prune(&self) -> Result<()> {
        Task::new("Collecting garbage.", "podman")
            .args(["system", "prune", "--all", "--force", "--volumes"])
            .run()
    }
}
