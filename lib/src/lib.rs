//! Core library for building container images, mirroring them to a remote
//! host, and reconciling that host's running containers to match.

mod builder;
pub mod cli;
mod config;
mod engine;
mod error;
mod provision;
mod reconcile;
mod supervisor;
mod task;
mod transport;

pub use builder::build;
pub use config::{BuildConfig, DeployConfig, ProvisionConfig, ReconcileConfig};
pub use provision::provision;
pub use reconcile::reconcile;
pub use transport::deploy;
