//! Role permission editing, grouped by module.

use std::collections::BTreeSet;

use crate::error::{AppError, Result};
use crate::models::{Permission, RecordId};

/// Selection state of a whole module, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    All,
    Partial,
    None,
}

/// Permissions of one module, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGroup<'a> {
    pub module: &'a str,
    pub permissions: Vec<&'a Permission>,
}

/// Selection of permission ids over a fixed catalog.
///
/// The selection is always a subset of the catalog.
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    catalog: Vec<Permission>,
    selected: BTreeSet<RecordId>,
}

impl PermissionMatrix {
    pub fn new(catalog: Vec<Permission>) -> Self {
        Self {
            catalog,
            selected: BTreeSet::new(),
        }
    }

    /// Replace the selection. Ids outside the catalog are dropped.
    pub fn load_selection(&mut self, ids: &[RecordId]) {
        self.selected = ids.iter().copied().filter(|id| self.in_catalog(*id)).collect();
    }

    pub fn catalog(&self) -> &[Permission] {
        &self.catalog
    }

    fn in_catalog(&self, id: RecordId) -> bool {
        self.catalog.iter().any(|p| p.id == id)
    }

    /// Catalog grouped by module, modules in first-seen order.
    pub fn groups(&self) -> Vec<ModuleGroup<'_>> {
        let mut groups: Vec<ModuleGroup<'_>> = Vec::new();
        for permission in &self.catalog {
            match groups.iter_mut().find(|g| g.module == permission.module) {
                Some(group) => group.permissions.push(permission),
                None => groups.push(ModuleGroup {
                    module: &permission.module,
                    permissions: vec![permission],
                }),
            }
        }
        groups
    }

    fn module_ids(&self, module: &str) -> Vec<RecordId> {
        self.catalog
            .iter()
            .filter(|p| p.module == module)
            .map(|p| p.id)
            .collect()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle_permission(&mut self, id: RecordId) -> Result<()> {
        if !self.in_catalog(id) {
            return Err(AppError::not_found(format!("permission {id}")));
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        Ok(())
    }

    /// Deselect the module when fully selected, otherwise select all of it.
    pub fn toggle_module(&mut self, module: &str) {
        let ids = self.module_ids(module);
        if ids.iter().all(|id| self.selected.contains(id)) {
            for id in &ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids);
        }
    }

    pub fn module_state(&self, module: &str) -> ModuleState {
        let ids = self.module_ids(module);
        let count = ids.iter().filter(|id| self.selected.contains(id)).count();
        match count {
            0 => ModuleState::None,
            n if n == ids.len() => ModuleState::All,
            _ => ModuleState::Partial,
        }
    }

    /// Selected ids in catalog order.
    pub fn materialize(&self) -> Vec<RecordId> {
        self.catalog
            .iter()
            .map(|p| p.id)
            .filter(|id| self.selected.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use quickcheck_macros::quickcheck;

    fn matrix_with(ids: &[u64]) -> PermissionMatrix {
        let mut matrix = PermissionMatrix::new(seed::permissions());
        matrix.load_selection(&ids.iter().copied().map(RecordId).collect::<Vec<_>>());
        matrix
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let matrix = PermissionMatrix::new(seed::permissions());
        let groups = matrix.groups();
        let modules: Vec<_> = groups.iter().map(|g| g.module).collect();
        assert_eq!(modules, vec!["Users", "Destinations", "Reservations", "Reports"]);
        assert_eq!(groups[0].permissions.len(), 4);
        assert_eq!(groups[1].permissions[1].name, "destinations.create");
    }

    #[test]
    fn test_partial_module_snaps_to_all() {
        let mut matrix = matrix_with(&[1, 5, 7]);
        assert_eq!(matrix.module_state("Users"), ModuleState::Partial);

        matrix.toggle_module("Users");
        assert_eq!(matrix.module_state("Users"), ModuleState::All);
        assert_eq!(matrix.materialize(), (1..=5).chain([7]).map(RecordId).collect::<Vec<_>>());

        matrix.toggle_module("Users");
        assert_eq!(matrix.module_state("Users"), ModuleState::None);
        assert_eq!(matrix.materialize(), vec![RecordId(5), RecordId(7)]);
    }

    #[test]
    fn test_toggle_permission() {
        let mut matrix = matrix_with(&[]);
        matrix.toggle_permission(RecordId(8)).unwrap();
        assert!(matrix.is_selected(RecordId(8)));
        assert_eq!(matrix.module_state("Reports"), ModuleState::All);

        matrix.toggle_permission(RecordId(8)).unwrap();
        assert!(!matrix.is_selected(RecordId(8)));
    }

    #[test]
    fn test_rejects_ids_outside_catalog() {
        let mut matrix = matrix_with(&[2, 99]);
        assert_eq!(matrix.materialize(), vec![RecordId(2)]);
        assert!(matrix.toggle_permission(RecordId(42)).is_err());
        assert_eq!(matrix.selected_count(), 1);
    }

    #[test]
    fn test_materialize_uses_catalog_order() {
        let matrix = matrix_with(&[8, 3, 1]);
        assert_eq!(matrix.materialize(), vec![RecordId(1), RecordId(3), RecordId(8)]);
    }

    #[quickcheck]
    fn prop_module_toggle_twice_restores_full_or_empty(mask: u8, module: u8) -> bool {
        let ids: Vec<u64> = (1..=8).filter(|i| mask & (1 << (i - 1)) != 0).collect();
        let mut matrix = matrix_with(&ids);
        let groups: Vec<String> = matrix.groups().iter().map(|g| g.module.to_string()).collect();
        let module = &groups[module as usize % groups.len()];

        let before_state = matrix.module_state(module);
        let before = matrix.materialize();
        matrix.toggle_module(module);
        matrix.toggle_module(module);

        // A partial module cannot come back, it snaps to all first.
        match before_state {
            ModuleState::Partial => matrix.module_state(module) == ModuleState::None,
            _ => matrix.materialize() == before,
        }
    }
}
