//! Test-only fake [`Supervisor`]. Should only be used by this crate's own
//! tests.

use std::cell::RefCell;
use std::collections::BTreeSet;

use anyhow::Result;

use super::Supervisor;

#[derive(Debug, Default)]
pub(crate) struct FakeSupervisor {
    pub(crate) actions: RefCell<Vec<String>>,
    pub(crate) enabled_units: RefCell<BTreeSet<String>>,
}

impl FakeSupervisor {
    pub(crate) fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }
}

impl Supervisor for FakeSupervisor {
    fn generate_unit(&self, container_name: &str) -> Result<()> {
        self.actions
            .borrow_mut()
            .push(format!("generate-unit {container_name}"));
        Ok(())
    }

    fn enable_now(&self, unit_name: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("enable {unit_name}"));
        self.enabled_units.borrow_mut().insert(unit_name.to_string());
        Ok(())
    }

    fn disable_now(&self, unit_name: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("disable {unit_name}"));
        self.enabled_units.borrow_mut().remove(unit_name);
        Ok(())
    }

    fn delete_unit_file(&self, unit_name: &str) -> Result<()> {
        self.actions
            .borrow_mut()
            .push(format!("delete-unit-file {unit_name}"));
        Ok(())
    }
}
