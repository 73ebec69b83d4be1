//! Decodes the deployment intent carried on an image's labels.
//!
//! Each relevant label value is a single CSV record (no header row); an
//! absent or empty value decodes to an empty sequence.

use std::collections::BTreeMap;

/// Reserved label namespace for deployment intent.
pub const LABEL_NAMESPACE: &str = "deploy.wheelsticks";

/// Suffix for the CSV list of container names to derive from this image.
const CONTAINER_NAMES_SUFFIX: &str = "container-names";
/// Suffix for the CSV list of networks to attach.
const NETWORKS_SUFFIX: &str = "networks";
/// Suffix for the CSV list of `host:container[/proto]` publications.
const PORT_MAPPINGS_SUFFIX: &str = "port-mappings";
/// Suffix for the CSV list of volume/mount specs as accepted by the engine.
const VOLUME_MOUNTS_SUFFIX: &str = "volume-mounts";
/// Suffix for the shell command string; absence disables health gating.
const HEALTH_CHECK_SUFFIX: &str = "health-check";

/// Build the full label key for a suffix under [`LABEL_NAMESPACE`].
fn label_key(suffix: &str) -> String {
    format!("{LABEL_NAMESPACE}.{suffix}")
}

/// The deployment directives carried on one image: container names,
/// networks, ports, volumes, health check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentIntent {
    /// Containers to derive from this image.
    pub container_names: Vec<String>,
    /// Networks each such container joins.
    pub networks: Vec<String>,
    /// `--publish` specs.
    pub port_mappings: Vec<String>,
    /// `--volume` specs.
    pub volume_mounts: Vec<String>,
    /// Health probe command, if any.
    pub health_check: Option<String>,
}

impl DeploymentIntent {
    /// Parse the intent carried by an image's labels. Missing labels default
    /// to an empty sequence / no health check.
    pub fn from_labels(labels: &BTreeMap<String, String>) -> Self {
        Self {
            container_names: csv_fields(labels.get(&label_key(CONTAINER_NAMES_SUFFIX))),
            networks: csv_fields(labels.get(&label_key(NETWORKS_SUFFIX))),
            port_mappings: csv_fields(labels.get(&label_key(PORT_MAPPINGS_SUFFIX))),
            volume_mounts: csv_fields(labels.get(&label_key(VOLUME_MOUNTS_SUFFIX))),
            health_check: labels
                .get(&label_key(HEALTH_CHECK_SUFFIX))
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Decode a single CSV record (no header) into its ordered fields. An absent
/// or empty input yields an empty sequence.
fn csv_fields(value: Option<&String>) -> Vec<String> {
    let value = match value {
        Some(v) if !v.is_empty() => v.as_str(),
        _ => return Vec::new(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(value.as_bytes());
    let mut fields = Vec::new();
    for record in reader.records() {
        // A malformed CSV record (unbalanced quotes) is treated the same as
        // an empty one: the label schema is not user input, it is written by
        // the builder itself, so a decode failure here indicates corruption
        // we cannot meaningfully recover from field-by-field.
        let Ok(record) = record else {
            continue;
        };
        fields.extend(record.iter().map(str::to_string));
    }
    fields
}
