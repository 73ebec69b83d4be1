//! Applies one planned [`ChangeRecord`] against the engine/supervisor
//! boundary. Generic over both traits so it can run against the fixtures in
//! tests and the real `podman`/`systemd` backends in production.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use super::planner::{ChangeRecord, Operator};
use crate::engine::{ContainerSpec, Engine};
use crate::supervisor::Supervisor;

/// Initial health-probe timeout; doubles on each `TimedOut` outcome.
const INITIAL_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Apply a single change. `Keep` is a no-op by construction. `health_max_attempts`
/// is the configurable cap (Open Question: "health-gate overall cap") on how
/// many times `Add` polls before giving up on a rollout.
pub(crate) fn apply_change(
    engine: &impl Engine,
    supervisor: &impl Supervisor,
    change: &ChangeRecord,
    health_max_attempts: u32,
) -> Result<()> {
    match change.operator {
        Operator::Keep => Ok(()),
        Operator::Add => apply_add(engine, supervisor, change, health_max_attempts),
        Operator::Remove => apply_remove(engine, supervisor, change),
    }
}

fn apply_add(
    engine: &impl Engine,
    supervisor: &impl Supervisor,
    change: &ChangeRecord,
    health_max_attempts: u32,
) -> Result<()> {
    for network in &change.networks {
        if !engine
            .network_exists(network)
            .with_context(|| format!("Probing network {network:?}"))?
        {
            engine
                .create_network(network)
                .with_context(|| format!("Creating network {network:?}"))?;
        }
    }

    engine
        .create_container(&ContainerSpec {
            name: &change.container_name,
            image_id: &change.image_id,
            networks: &change.networks,
            port_mappings: &change.port_mappings,
            volume_mounts: &change.volume_mounts,
            health_check: change.health_check.as_deref(),
        })
        .with_context(|| format!("Creating container {:?}", change.container_name))?;

    supervisor
        .generate_unit(&change.container_name)
        .with_context(|| format!("Generating unit for {:?}", change.container_name))?;
    let unit_name = change.unit_name();
    supervisor
        .enable_now(&unit_name)
        .with_context(|| format!("Enabling unit {unit_name:?}"))?;

    if change.health_check.is_some() {
        health_gate(engine, &change.container_name, INITIAL_HEALTH_TIMEOUT, health_max_attempts)?;
    }
    Ok(())
}

fn apply_remove(engine: &impl Engine, supervisor: &impl Supervisor, change: &ChangeRecord) -> Result<()> {
    let unit_name = change.unit_name();
    supervisor
        .disable_now(&unit_name)
        .with_context(|| format!("Disabling unit {unit_name:?}"))?;
    supervisor
        .delete_unit_file(&unit_name)
        .with_context(|| format!("Deleting unit file {unit_name:?}"))?;
    engine
        .remove_container(&change.container_name)
        .with_context(|| format!("Removing container {:?}", change.container_name))
}

/// Poll `podman healthcheck run` with exponentially doubling timeouts until
/// the container reports healthy, a probe completes unhealthy (sleep and
/// retry), or the attempt cap is reached.
fn health_gate(
    engine: &impl Engine,
    container_name: &str,
    initial_timeout: Duration,
    max_attempts: u32,
) -> Result<()> {
    use crate::engine::HealthOutcome;

    let mut timeout = initial_timeout;
    for attempt in 1..=max_attempts {
        match engine.healthcheck_run(container_name, timeout)? {
            HealthOutcome::Healthy => return Ok(()),
            HealthOutcome::TimedOut => timeout *= 2,
            HealthOutcome::Unhealthy => {}
        }
        tracing::debug!(attempt, ?timeout, container_name, "health gate retrying");
        std::thread::sleep(timeout);
    }
    bail!("container {container_name:?} did not become healthy within {max_attempts} attempts")
}
