//! Loads the recognized environment keys into small typed configs, one per
//! subcommand. Validation happens eagerly here rather than being discovered
//! deep inside the builder/transport/reconciler.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use crate::error::ConfigError;

fn required_var(key: &'static str) -> Result<String> {
    std::env::var(key).map_err(|_| ConfigError::MissingKey(key).into())
}

fn required_nonempty_var(key: &'static str) -> Result<String> {
    let value = required_var(key)?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    Ok(value)
}

/// Read an optional environment variable, falling back to `default` when it
/// is unset, and rejecting a set-but-unparsable value.
fn optional_parsed_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|_| {
            ConfigError::InvalidValue {
                key,
                reason: format!("{value:?} is not a valid value"),
            }
            .into()
        }),
        Err(_) => Ok(default),
    }
}

/// Default cap on health-probe attempts before an `Add` change is treated as
/// a failed rollout (five doublings from a 5s initial timeout reach 160s).
const DEFAULT_HEALTH_MAX_ATTEMPTS: u32 = 6;

/// Configuration for the local `build` subcommand.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// The build contexts to build, in the order given by `BUILD_CONTEXTS`.
    pub build_contexts: Vec<String>,
    /// The local workbench directory.
    pub local_workbench: Utf8PathBuf,
}

impl BuildConfig {
    /// Load from the environment.
    pub fn load() -> Result<Self> {
        let raw = required_nonempty_var("BUILD_CONTEXTS")?;
        let build_contexts: Vec<String> = raw.split(':').map(str::to_string).collect();
        if build_contexts.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue {
                key: "BUILD_CONTEXTS",
                reason: "contains an empty build context path".to_string(),
            }
            .into());
        }
        let local_workbench = required_nonempty_var("LOCAL_WORKBENCH")?.into();
        Ok(Self {
            build_contexts,
            local_workbench,
        })
    }
}

/// Configuration for the `deploy` subcommand: mirror the workbench to
/// the remote host, then invoke the reconciler there.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// The local workbench directory to mirror from.
    pub local_workbench: Utf8PathBuf,
    /// The remote workbench directory to mirror to and reconcile from.
    pub remote_workbench: Utf8PathBuf,
    /// The target hostname.
    pub ssh_host: String,
    /// Path to the SSH client configuration file.
    pub ssh_configuration: Utf8PathBuf,
    /// Login user on the target host.
    pub deploy_user: String,
}

impl DeployConfig {
    /// Load from the environment.
    pub fn load() -> Result<Self> {
        Ok(Self {
            local_workbench: required_nonempty_var("LOCAL_WORKBENCH")?.into(),
            remote_workbench: required_nonempty_var("REMOTE_WORKBENCH")?.into(),
            ssh_host: required_nonempty_var("SSH_HOST")?,
            ssh_configuration: required_nonempty_var("SSH_CONFIGURATION")?.into(),
            deploy_user: required_nonempty_var("DEPLOY_USER")?,
        })
    }
}

/// Configuration for the remote `reconcile` entrypoint, run on the target
/// host by the `deploy` subcommand over SSH.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// The remote workbench directory to load `*.tar` artifacts from.
    pub remote_workbench: Utf8PathBuf,
    /// Cap on health-probe attempts per `Add` change, from
    /// `HEALTH_MAX_ATTEMPTS`, defaulting to [`DEFAULT_HEALTH_MAX_ATTEMPTS`].
    pub health_max_attempts: u32,
}

impl ReconcileConfig {
    /// Load from the environment.
    pub fn load() -> Result<Self> {
        Ok(Self {
            remote_workbench: required_nonempty_var("REMOTE_WORKBENCH")?.into(),
            health_max_attempts: optional_parsed_var("HEALTH_MAX_ATTEMPTS", DEFAULT_HEALTH_MAX_ATTEMPTS)?,
        })
    }
}

/// Configuration for the one-shot `provision` subcommand (out of core scope,
/// a thin collaborator invocation).
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Path to the external provisioning playbook.
    pub playbook: Utf8PathBuf,
    /// The target hostname.
    pub ssh_host: String,
    /// Path to the SSH client configuration file.
    pub ssh_configuration: Utf8PathBuf,
}

impl ProvisionConfig {
    /// Load from the environment.
    pub fn load() -> Result<Self> {
        Ok(Self {
            playbook: required_nonempty_var("PLAYBOOK")?.into(),
            ssh_host: required_nonempty_var("SSH_HOST")?,
            ssh_configuration: required_nonempty_var("SSH_CONFIGURATION")?.into(),
        })
    }
}
