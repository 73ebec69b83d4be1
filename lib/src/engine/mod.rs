//! The engine boundary: every interaction with the container runtime goes
//! through this trait, so the planner/applier/reconciler driver can be
//! exercised against a fixture engine (see [`fixture`]) instead of a real
//! `podman` binary.

mod podman;

#[cfg(test)]
pub(crate) mod fixture;

use std::time::Duration;

use anyhow::Result;
use camino::Utf8Path;

pub(crate) use podman::PodmanEngine;

use crate::reconcile::metadata::DeploymentIntent;

/// An image as seen on the engine, with its deployment intent already
/// decoded from labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImageRecord {
    /// Opaque engine identifier (stem form), e.g. the sha256 short ID.
    pub(crate) image_id: String,
    /// Content digest; the equivalence key used by the planner.
    pub(crate) digest: String,
    /// Number of containers currently derived from this image on the host.
    pub(crate) container_count: u32,
    /// Deployment intent decoded from this image's labels.
    pub(crate) intent: DeploymentIntent,
}

/// What to create a container with.
#[derive(Debug, Clone)]
pub(crate) struct ContainerSpec<'a> {
    pub(crate) name: &'a str,
    pub(crate) image_id: &'a str,
    pub(crate) networks: &'a [String],
    pub(crate) port_mappings: &'a [String],
    pub(crate) volume_mounts: &'a [String],
    pub(crate) health_check: Option<&'a str>,
}

/// The outcome of one `healthcheck run` probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HealthOutcome {
    /// Exit 0: the container is healthy.
    Healthy,
    /// Nonzero exit, but the probe itself completed within the timeout.
    Unhealthy,
    /// The probe did not complete within the timeout.
    TimedOut,
}

/// The container-runtime boundary the planner/applier/driver depend on.
pub(crate) trait Engine {
    /// Build the given context, returning the resulting image ID.
    fn build(&self, build_context: &str) -> Result<String>;

    /// Save an image as an OCI archive at the given path.
    fn save(&self, image_id: &str, destination: &Utf8Path) -> Result<()>;

    /// Load an OCI archive into the engine.
    fn load(&self, archive: &Utf8Path) -> Result<()>;

    /// List every known image with its decoded deployment intent.
    fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Create (but do not start) a container.
    fn create_container(&self, spec: &ContainerSpec<'_>) -> Result<()>;

    /// Remove a container by name.
    fn remove_container(&self, name: &str) -> Result<()>;

    /// Probe whether a network exists.
    fn network_exists(&self, name: &str) -> Result<bool>;

    /// Create a network.
    fn create_network(&self, name: &str) -> Result<()>;

    /// Run one health probe against a container, bounded by `timeout`.
    fn healthcheck_run(&self, container_name: &str, timeout: Duration) -> Result<HealthOutcome>;

    /// Release unreferenced images, networks and anonymous volumes.
    fn prune(&self) -> Result<()>;
}
