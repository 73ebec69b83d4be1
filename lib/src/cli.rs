//! Command line surface.

use std::ffi::OsString;

use anyhow::Result;
use clap::Parser;

use crate::config::{BuildConfig, DeployConfig, ProvisionConfig, ReconcileConfig};

/// Build and deploy containers onto a remote host via podman and systemd
/// user units.
#[derive(Debug, Parser, PartialEq, Eq)]
#[clap(name = "wheelsticks")]
#[clap(rename_all = "kebab-case")]
pub(crate) enum Opt {
    /// Build every configured context and save the resulting images into
    /// the local workbench, per `BUILD_CONTEXTS` and `LOCAL_WORKBENCH`.
    Build,

    /// Mirror the local workbench to the remote host and trigger a
    /// reconciliation there, per `LOCAL_WORKBENCH`, `REMOTE_WORKBENCH`,
    /// `SSH_HOST`, `SSH_CONFIGURATION` and `DEPLOY_USER`.
    Deploy,

    /// Run the external provisioning playbook against the target host, per
    /// `PLAYBOOK`, `SSH_HOST` and `SSH_CONFIGURATION`.
    Provision,

    /// Load the remote workbench's artifacts and reconcile the host's
    /// running containers to match, per `REMOTE_WORKBENCH`.
    ///
    /// Not meant to be invoked directly; `deploy` runs this over SSH on the
    /// target host.
    #[clap(hide = true)]
    Reconcile,
}

/// Parse the provided arguments and execute.
pub fn run_from_iter<I>(args: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    run_from_opt(Opt::parse_from(args))
}

fn run_from_opt(opt: Opt) -> Result<()> {
    match opt {
        Opt::Build => crate::builder::build(&BuildConfig::load()?),
        Opt::Deploy => crate::transport::deploy(&DeployConfig::load()?),
        Opt::Provision => crate::provision::provision(&ProvisionConfig::load()?),
        Opt::Reconcile => crate::reconcile::reconcile(&ReconcileConfig::load()?),
    }
}
