//! The `deploy` subcommand: mirror the local workbench to the remote
//! host, then invoke this same binary's hidden `reconcile` entrypoint there
//! over SSH.

use anyhow::Result;
use wheelsticks_utils::shell_join;

use crate::config::DeployConfig;
use crate::error::TransportError;
use crate::task::Task;

/// Mirror the workbench and trigger a remote reconciliation.
pub fn deploy(config: &DeployConfig) -> Result<()> {
    sync_workbench(config)?;
    remote_reconcile(config)
}

/// `rsync --archive --delete` the local workbench onto the remote one, so
/// the remote directory ends up exactly mirroring the local one, including
/// deletions, which drives the garbage collection the reconciler relies on
/// to know which archives are current.
fn sync_workbench(config: &DeployConfig) -> Result<()> {
    let remote_destination = format!(
        "{}@{}:{}",
        config.deploy_user, config.ssh_host, config.remote_workbench
    );
    let rsh = shell_join(["ssh".to_string(), "-F".to_string(), config.ssh_configuration.to_string()]);
    let local_source = format!("{}/", config.local_workbench);
    Task::new(format!("Synchronizing workbench to {remote_destination:?}."), "rsync")
        .args([
            "--archive",
            "--delete",
            "--rsh",
            rsh.as_str(),
            "--",
            local_source.as_str(),
            remote_destination.as_str(),
        ])
        .run()
        .map_err(|_| TransportError::SyncFailed.into())
}

/// Invoke `wheelsticks reconcile` on the remote host over SSH, with
/// `REMOTE_WORKBENCH` set for it. The inner command is built with
/// [`shell_join`] so a workbench path containing spaces or shell
/// metacharacters cannot corrupt the remote command line.
fn remote_reconcile(config: &DeployConfig) -> Result<()> {
    let remote_command = shell_join([
        "env".to_string(),
        format!("REMOTE_WORKBENCH={}", config.remote_workbench),
        "wheelsticks".to_string(),
        "reconcile".to_string(),
    ]);
    let remote_login = format!("{}@{}", config.deploy_user, config.ssh_host);
    Task::new(format!("Reconciling on {:?}.", config.ssh_host), "ssh")
        .args([
            "-F",
            config.ssh_configuration.as_str(),
            "--",
            remote_login.as_str(),
            remote_command.as_str(),
        ])
        .run()
        .map_err(|_| TransportError::RemoteReconcileFailed.into())
}
