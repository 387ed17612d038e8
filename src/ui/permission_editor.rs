//! Permission checkboxes grouped by module, shown inside the role dialog.

use eframe::egui::{self, RichText, Ui};
use tracing::warn;

use super::app::App;
use crate::models::RecordId;
use crate::permissions::ModuleState;

/// Render the module/permission matrix of the role being edited.
pub fn show(ui: &mut Ui, app: &mut App) {
    let matrix = &mut app.forms.role_permissions;

    ui.separator();
    ui.add_space(5.0);
    ui.label(RichText::new(format!("Permissions ({} selected)", matrix.selected_count())).strong());
    ui.add_space(5.0);

    if matrix.catalog().is_empty() {
        ui.label(RichText::new("Permission catalog not loaded").weak());
        return;
    }

    let groups: Vec<(String, Vec<(RecordId, String, String)>)> = matrix
        .groups()
        .iter()
        .map(|g| {
            let permissions = g
                .permissions
                .iter()
                .map(|p| (p.id, p.name.clone(), p.description.clone()))
                .collect();
            (g.module.to_string(), permissions)
        })
        .collect();

    for (module, permissions) in groups {
        let state = matrix.module_state(&module);
        let mut checked = state == ModuleState::All;
        let response = ui.add(
            egui::Checkbox::new(&mut checked, RichText::new(module_title(&module)).strong())
                .indeterminate(state == ModuleState::Partial),
        );
        if response.clicked() {
            matrix.toggle_module(&module);
        }

        ui.indent(("permissions", module.as_str()), |ui| {
            ui.horizontal_wrapped(|ui| {
                for (id, name, description) in permissions {
                    let mut selected = matrix.is_selected(id);
                    if ui.checkbox(&mut selected, name).on_hover_text(description).clicked() {
                        if let Err(e) = matrix.toggle_permission(id) {
                            warn!("Permission toggle ignored: {}", e);
                        }
                    }
                }
            });
        });
        ui.add_space(5.0);
    }
}

/// `reservations` -> `Reservations`.
fn module_title(module: &str) -> String {
    let mut chars = module.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_title() {
        assert_eq!(module_title("reservations"), "Reservations");
        assert_eq!(module_title(""), "");
    }
}
