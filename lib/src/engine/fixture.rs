//! Test-only fake [`Engine`]. Should only be used by this crate's own tests.
//!
//! Records every mutating call so applier/driver tests can assert on what
//! was actually invoked, without a running container engine.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use anyhow::Result;
use camino::Utf8Path;

use super::{ContainerSpec, Engine, HealthOutcome, ImageRecord};

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    pub(crate) images: RefCell<Vec<ImageRecord>>,
    pub(crate) networks: RefCell<BTreeSet<String>>,
    pub(crate) health_script: RefCell<VecDeque<HealthOutcome>>,
    pub(crate) actions: RefCell<Vec<String>>,
    pub(crate) next_build_id: RefCell<u32>,
}

impl FakeEngine {
    pub(crate) fn with_images(images: Vec<ImageRecord>) -> Self {
        Self {
            images: RefCell::new(images),
            ..Default::default()
        }
    }

    pub(crate) fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }
}

impl Engine for FakeEngine {
    fn build(&self, build_context: &str) -> Result<String> {
        let mut counter = self.next_build_id.borrow_mut();
        *counter += 1;
        let id = format!("built-from-{build_context}-{counter}");
        self.actions.borrow_mut().push(format!("build {build_context} -> {id}"));
        Ok(id)
    }

    fn save(&self, image_id: &str, destination: &Utf8Path) -> Result<()> {
        self.actions
            .borrow_mut()
            .push(format!("save {image_id} -> {destination}"));
        std::fs::write(destination, format!("archive of {image_id}"))?;
        Ok(())
    }

    fn load(&self, archive: &Utf8Path) -> Result<()> {
        self.actions.borrow_mut().push(format!("load {archive}"));
        Ok(())
    }

    fn list_images(&self) -> Result<Vec<ImageRecord>> {
        Ok(self.images.borrow().clone())
    }

    fn create_container(&self, spec: &ContainerSpec<'_>) -> Result<()> {
        self.actions
            .borrow_mut()
            .push(format!("create {} from {}", spec.name, spec.image_id));
        Ok(())
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("remove {name}"));
        Ok(())
    }

    fn network_exists(&self, name: &str) -> Result<bool> {
        Ok(self.networks.borrow().contains(name))
    }

    fn create_network(&self, name: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("create-network {name}"));
        self.networks.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn healthcheck_run(&self, container_name: &str, _timeout: Duration) -> Result<HealthOutcome> {
        let outcome = self
            .health_script
            .borrow_mut()
            .pop_front()
            .unwrap_or(HealthOutcome::Healthy);
        self.actions
            .borrow_mut()
            .push(format!("healthcheck {container_name} -> {outcome:?}"));
        Ok(outcome)
    }

    fn prune(&self) -> Result<()> {
        self.actions.borrow_mut().push("prune".to_string());
        Ok(())
    }
}
