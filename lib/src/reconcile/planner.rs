//! The change planner, the core of the whole system. Pure and side-effect
//! free so it can be exhaustively unit-tested without an engine.

use crate::engine::ImageRecord;

/// One of the three things that can happen to a container name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Keep,
    Remove,
}

/// One planned change to a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChangeRecord {
    pub(crate) container_name: String,
    pub(crate) image_id: String,
    pub(crate) image_digest: String,
    pub(crate) networks: Vec<String>,
    pub(crate) port_mappings: Vec<String>,
    pub(crate) volume_mounts: Vec<String>,
    pub(crate) health_check: Option<String>,
    pub(crate) operator: Operator,
}

impl ChangeRecord {
    fn from_image(container_name: String, image: &ImageRecord, operator: Operator) -> Self {
        Self {
            container_name,
            image_id: image.image_id.clone(),
            image_digest: image.digest.clone(),
            networks: image.intent.networks.clone(),
            port_mappings: image.intent.port_mappings.clone(),
            volume_mounts: image.intent.volume_mounts.clone(),
            health_check: image.intent.health_check.clone(),
            operator,
        }
    }

    /// The derived systemd unit name, `container-<name>.service`.
    pub(crate) fn unit_name(&self) -> String {
        format!("container-{}.service", self.container_name)
    }
}

/// Compare two sets of images and return the ordered, cancellation-reduced
/// list of changes needed to bring `actual` to `target`.
pub(crate) fn plan_changes(actual: &[ImageRecord], target: &[ImageRecord]) -> Vec<ChangeRecord> {
    // Step 1: expand. Removals are emitted before additions so that, after a
    // stable sort by container name, a REMOVE for a name precedes an ADD for
    // the same name.
    let mut changes: Vec<ChangeRecord> = Vec::new();
    for image in actual {
        for container_name in &image.intent.container_names {
            changes.push(ChangeRecord::from_image(
                container_name.clone(),
                image,
                Operator::Remove,
            ));
        }
    }
    for image in target {
        for container_name in &image.intent.container_names {
            changes.push(ChangeRecord::from_image(container_name.clone(), image, Operator::Add));
        }
    }

    // Step 2: stable sort by container name. Stability preserves the
    // REMOVE-before-ADD ordering from step 1 for a given name.
    //
    // Interleaving replicas by name (x-0, x-1, ...) lets a load balancer
    // keep serving from the untouched replica while another is recreated.
    changes.sort_by(|a, b| a.container_name.cmp(&b.container_name));

    // Step 3: fold to cancel a REMOVE immediately followed by an ADD for the
    // same name and digest into a single KEEP.
    let mut folded: Vec<ChangeRecord> = Vec::with_capacity(changes.len());
    for change in changes {
        let cancels_previous = matches!(
            folded.last(),
            Some(previous)
                if previous.operator == Operator::Remove
                    && change.operator == Operator::Add
                    && previous.container_name == change.container_name
                    && previous.image_digest == change.image_digest
        );
        if cancels_previous {
            let mut kept = folded.pop().expect("checked above");
            kept.operator = Operator::Keep;
            folded.push(kept);
        } else {
            folded.push(change);
        }
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::metadata::DeploymentIntent;

    fn image(id: &str, digest: &str, container_names: &[&str]) -> ImageRecord {
        ImageRecord {
            image_id: id.to_string(),
            digest: digest.to_string(),
            container_count: 0,
            intent: DeploymentIntent {
                container_names: container_names.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    fn ops(changes: &[ChangeRecord]) -> Vec<(&str, Operator)> {
        changes
            .iter()
            .map(|c| (c.container_name.as_str(), c.operator))
            .collect()
    }

    #[test]
    fn test_scenario_a_fresh_deploy() {
        let web = image("AAA", "d-web", &["web-0"]);
        let db = image("BBB", "d-db", &["db-0"]);
        let changes = plan_changes(&[], &[web, db]);
        similar_asserts::assert_eq!(ops(&changes), vec![("db-0", Operator::Add), ("web-0", Operator::Add)]);
    }

    #[test]
    fn test_scenario_b_pure_noop() {
        let web = image("AAA", "d-web", &["web-0"]);
        let db = image("BBB", "d-db", &["db-0"]);
        let changes = plan_changes(&[web.clone(), db.clone()], &[web, db]);
        similar_asserts::assert_eq!(ops(&changes), vec![("db-0", Operator::Keep), ("web-0", Operator::Keep)]);
    }

    #[test]
    fn test_scenario_c_image_replacement_same_name() {
        let actual_web = image("AAA", "d1", &["web-0"]);
        let new_web = image("AAAprime", "d2", &["web-0"]);
        let db = image("BBB", "d-db", &["db-0"]);
        let changes = plan_changes(&[actual_web, db.clone()], &[new_web, db]);
        assert_eq!(
            ops(&changes),
            vec![("db-0", Operator::Keep), ("web-0", Operator::Remove), ("web-0", Operator::Add)]
        );
        let removed = &changes[1];
        let added = &changes[2];
        assert_eq!(removed.image_digest, "d1");
        assert_eq!(added.image_digest, "d2");
    }

    #[test]
    fn test_scenario_d_rename_does_not_cancel() {
        let actual_web = image("AAA", "d-web", &["web-0"]);
        let new_web = image("AAA", "d-web", &["web-1"]);
        let db = image("BBB", "d-db", &["db-0"]);
        let changes = plan_changes(&[actual_web, db.clone()], &[new_web, db]);
        assert_eq!(
            ops(&changes),
            vec![
                ("db-0", Operator::Keep),
                ("web-0", Operator::Remove),
                ("web-1", Operator::Add)
            ]
        );
    }

    #[test]
    fn test_scenario_e_multi_replica_interleave() {
        let x0 = image("X0", "dx", &["x-0"]);
        let x1 = image("X1", "dx", &["x-1"]);
        let y0 = image("Y0", "dy", &["y-0"]);
        let changes = plan_changes(&[], &[x0, x1, y0]);
        assert_eq!(
            ops(&changes),
            vec![("x-0", Operator::Add), ("x-1", Operator::Add), ("y-0", Operator::Add)]
        );
    }

    #[test]
    fn test_invariant_at_most_two_entries_per_name_and_shape() {
        let actual = image("A", "d1", &["svc"]);
        let target = image("B", "d2", &["svc"]);
        let changes = plan_changes(&[actual], &[target]);
        let matching: Vec<_> = changes.iter().filter(|c| c.container_name == "svc").collect();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching[0].operator, Operator::Remove);
        assert_eq!(matching[1].operator, Operator::Add);
        assert_ne!(matching[0].image_digest, matching[1].image_digest);
    }

    #[test]
    fn test_invariant_same_digest_yields_single_keep() {
        let a = image("A", "same-digest", &["svc"]);
        let b = image("A", "same-digest", &["svc"]);
        let changes = plan_changes(&[a], &[b]);
        assert_eq!(ops(&changes), vec![("svc", Operator::Keep)]);
    }

    #[test]
    fn test_determinism() {
        let actual = vec![image("A", "d1", &["b", "a"])];
        let target = vec![image("A", "d1", &["b", "a"])];
        let first = plan_changes(&actual, &target);
        let second = plan_changes(&actual, &target);
        similar_asserts::assert_eq!(first, second);
        // sorted by container name regardless of intent order
        similar_asserts::assert_eq!(ops(&first), vec![("a", Operator::Keep), ("b", Operator::Keep)]);
    }
}
