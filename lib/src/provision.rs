//! The one-shot `provision` subcommand: a thin wrapper around an external
//! `ansible-playbook` invocation, out of the core reconciliation scope.

use anyhow::Result;

use crate::config::ProvisionConfig;
use crate::task::Task;

/// Run the configured playbook against the target host.
pub fn provision(config: &ProvisionConfig) -> Result<()> {
    let inventory = format!("{},", config.ssh_host);
    let ssh_common_args = format!("-F {}", config.ssh_configuration);
    Task::new(format!("Provisioning {:?}.", config.ssh_host), "ansible-playbook")
        .args([
            "--inventory",
            inventory.as_str(),
            "--ssh-common-args",
            ssh_common_args.as_str(),
            "--",
            config.playbook.as_str(),
        ])
        .run()
}
