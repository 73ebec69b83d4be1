//! The local `build` subcommand: build each configured context, save
//! it to the workbench as `<image-id>.tar`, and garbage-collect anything left
//! over from a previous run.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use fn_error_context::context;

use crate::config::BuildConfig;
use crate::engine::{Engine, PodmanEngine};

/// Build every configured context and reconcile the workbench directory to
/// hold exactly this run's archives.
pub fn build(config: &BuildConfig) -> Result<()> {
    let engine = PodmanEngine::new();
    build_with(&engine, config)
}

#[context("Building {} contexts into {:?}", config.build_contexts.len(), config.local_workbench)]
fn build_with(engine: &impl Engine, config: &BuildConfig) -> Result<()> {
    std::fs::create_dir_all(&config.local_workbench)
        .with_context(|| format!("Creating workbench {:?}", config.local_workbench))?;

    let mut produced = BTreeSet::new();
    for build_context in &config.build_contexts {
        let image_id = engine.build(build_context).with_context(|| format!("Building {build_context:?}"))?;
        let archive = config.local_workbench.join(format!("{image_id}.tar"));
        if !archive.exists() {
            engine
                .save(&image_id, &archive)
                .with_context(|| format!("Saving {image_id:?} to {archive:?}"))?;
        }
        produced.insert(archive);
    }

    garbage_collect(&config.local_workbench, &produced)
}

/// Remove every entry in `workbench` that this run did not produce, in
/// lexicographic order, so a failure partway through leaves a deterministic,
/// resumable set of deletions.
fn garbage_collect(workbench: &Utf8PathBuf, produced: &BTreeSet<Utf8PathBuf>) -> Result<()> {
    let mut stale = Vec::new();
    for entry in std::fs::read_dir(workbench).with_context(|| format!("Reading workbench {workbench:?}"))? {
        let entry = entry?;
        let path = camino::Utf8Path::from_path(&entry.path())
            .with_context(|| format!("Non-UTF-8 path in workbench: {:?}", entry.path()))?
            .to_path_buf();
        if !produced.contains(&path) {
            stale.push(path);
        }
    }
    stale.sort();
    for path in stale {
        std::fs::remove_file(&path).with_context(|| format!("Removing stale entry {path:?}"))?;
    }
    Ok(())
}
