//! The service-supervisor boundary: generating, enabling, disabling and
//! removing the user-scope systemd unit for a container. Kept behind a trait
//! for the same testability reason as [`crate::engine::Engine`].

mod systemd;

#[cfg(test)]
pub(crate) mod fixture;

use anyhow::Result;

pub(crate) use systemd::SystemdUserSupervisor;

/// The user-scope service-manager boundary.
pub(crate) trait Supervisor {
    /// Generate a unit for an already-created container, with restart
    /// policy `always`.
    fn generate_unit(&self, container_name: &str) -> Result<()>;

    /// Enable a unit with immediate start.
    fn enable_now(&self, unit_name: &str) -> Result<()>;

    /// Disable a unit, stopping it immediately.
    fn disable_now(&self, unit_name: &str) -> Result<()>;

    /// Delete the generated unit file.
    fn delete_unit_file(&self, unit_name: &str) -> Result<()>;
}
