//! The reconciliation driver: load artifacts, compare actual vs. target
//! state, and apply the resulting changes. Invoked on the remote host, over
//! SSH, by the `deploy` subcommand.

pub(crate) mod applier;
pub(crate) mod metadata;
pub(crate) mod planner;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fn_error_context::context;

use crate::config::ReconcileConfig;
use crate::engine::{Engine, ImageRecord, PodmanEngine};
use crate::supervisor::{Supervisor, SystemdUserSupervisor};
use applier::apply_change;
use planner::plan_changes;

/// Run the full reconciliation cycle against the real `podman`/`systemd`
/// backends, per `ReconcileConfig`.
pub fn reconcile(config: &ReconcileConfig) -> Result<()> {
    let engine = PodmanEngine::new();
    let supervisor = SystemdUserSupervisor::new()?;
    reconcile_with(&engine, &supervisor, &config.remote_workbench, config.health_max_attempts)
}

/// The engine/supervisor-generic core of [`reconcile`], exercised directly in
/// tests against fixtures.
#[context("Reconciling against workbench {workbench:?}")]
fn reconcile_with(
    engine: &impl Engine,
    supervisor: &impl Supervisor,
    workbench: &Utf8Path,
    health_max_attempts: u32,
) -> Result<()> {
    let target_image_ids = load_archives(engine, workbench)?;

    let all_images = engine.list_images().context("Listing images")?;
    // `actual` and `target` are independent filters over the same image list,
    // not a partition: an unchanged deployment's image is both the current
    // actual image (it already has containers) and the target image, which
    // is exactly the case the planner folds into KEEP.
    let actual: Vec<ImageRecord> = all_images
        .iter()
        .filter(|image| image.container_count != 0)
        .cloned()
        .collect();
    let target: Vec<ImageRecord> = all_images
        .into_iter()
        .filter(|image| target_image_ids.contains(&image.image_id))
        .collect();

    let changes = plan_changes(&actual, &target);
    for change in &changes {
        apply_change(engine, supervisor, change, health_max_attempts)
            .with_context(|| format!("Applying change for container {:?}", change.container_name))?;
    }

    engine.prune().context("Pruning unreferenced images, networks and volumes")
}

/// Load every `*.tar` archive under `workbench`, in lexicographic order, and
/// return the set of image IDs (archive file stems) they load.
fn load_archives(engine: &impl Engine, workbench: &Utf8Path) -> Result<std::collections::BTreeSet<String>> {
    let mut archives = Vec::new();
    for entry in std::fs::read_dir(workbench).with_context(|| format!("Reading workbench {workbench:?}"))? {
        let entry = entry?;
        let path = Utf8Path::from_path(&entry.path())
            .with_context(|| format!("Non-UTF-8 path in workbench: {:?}", entry.path()))?
            .to_path_buf();
        if path.extension() == Some("tar") {
            archives.push(path);
        }
    }
    archives.sort();

    let mut image_ids = std::collections::BTreeSet::new();
    for archive in &archives {
        engine.load(archive).with_context(|| format!("Loading archive {archive:?}"))?;
        if let Some(stem) = archive.file_stem() {
            image_ids.insert(stem.to_string());
        }
    }
    Ok(image_ids)
}
