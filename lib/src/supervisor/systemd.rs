//! Real [`Supervisor`] shelling out to `podman generate systemd` and
//! `systemctl --user`.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use super::Supervisor;
use crate::task::Task;

#[derive(Debug)]
pub(crate) struct SystemdUserSupervisor {
    unit_dir: Utf8PathBuf,
}

impl SystemdUserSupervisor {
    /// The user unit directory is `~/.config/systemd/user`, matching where
    /// `podman generate systemd --files` and `systemctl --user` both expect
    /// to find units.
    pub(crate) fn new() -> Result<Self> {
        let home = dirs::home_dir().context("Determining home directory for systemd user unit path")?;
        let unit_dir: Utf8PathBuf = Utf8PathBuf::try_from(home)
            .context("Home directory is not valid UTF-8")?
            .join(".config")
            .join("systemd")
            .join("user");
        std::fs::create_dir_all(&unit_dir)
            .with_context(|| format!("Creating unit directory {unit_dir:?}"))?;
        Ok(Self { unit_dir })
    }
}

impl Supervisor for SystemdUserSupervisor {
    fn generate_unit(&self, container_name: &str) -> Result<()> {
        Task::new(format!("Generating unit for container {container_name:?}."), "podman")
            .args([
                "generate",
                "systemd",
                "--files",
                "--name",
                "--restart-policy",
                "always",
                "--",
                container_name,
            ])
            .current_dir(&self.unit_dir)
            .run()
    }

    fn enable_now(&self, unit_name: &str) -> Result<()> {
        Task::new(format!("Enabling unit {unit_name:?}."), "systemctl")
            .args(["--now", "--user", "enable", unit_name])
            .run()
    }

    fn disable_now(&self, unit_name: &str) -> Result<()> {
        Task::new(format!("Disabling unit {unit_name:?}."), "systemctl")
            .args(["--now", "--user", "disable", unit_name])
            .run()
    }

    fn delete_unit_file(&self, unit_name: &str) -> Result<()> {
        let path = self.unit_dir.join(unit_name);
        std::fs::remove_file(&path).with_context(|| format!("Removing unit file {path:?}"))
    }
}
