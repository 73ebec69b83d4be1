//! The error taxonomy named in the design: most orchestration code
//! propagates with `anyhow`, but the few places where callers make a
//! decision based on *which* error occurred get a concrete enum.

use thiserror::Error;

/// Errors from loading configuration out of the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment key was not set.
    #[error("missing required environment variable {0:?}")]
    MissingKey(&'static str),

    /// A key was set but its value could not be used as-is (e.g. an empty
    /// colon-separated list).
    #[error("environment variable {key:?} has an invalid value: {reason}")]
    InvalidValue {
        /// The offending key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors from the engine (container runtime) boundary that the caller is
/// expected to branch on, as opposed to ordinary nonzero-exit failures which
/// just propagate as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `network exists` returned an exit code other than 0 (present) or 1
    /// (absent).
    #[error("probing network {network:?} failed with an unexpected exit code")]
    NetworkProbeFailed {
        /// The network name that was probed.
        network: String,
    },
}

/// Errors from the artifact transport (mirror copy + remote invocation).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The mirror copy exited with a nonzero status.
    #[error("synchronizing artifacts to the remote host failed")]
    SyncFailed,

    /// The remote reconciler invocation exited with a nonzero status.
    #[error("the remote reconciler exited with a failure")]
    RemoteReconcileFailed,
}
