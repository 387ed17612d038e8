//! Table pages with search, filters, export, and row actions.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_PDF, FILE_XLS, MAGNIFYING_GLASS, PLUS, WARNING};

use super::app::{App, Editable};
use super::components::{
    back_button, colors, panel_header, primary_button_with_icon, stat_card, styled_button, styled_button_with_icon,
};
use super::{data_table, form_dialog, permission_editor};
use crate::export::ExportFormat;
use crate::loader::LoadState;
use crate::models::{RecordId, StatusLabel};
use crate::pages::Page;
use crate::stats;
use crate::store::{Dataset, Store};
use crate::table::{self, Column, ColumnKind, RowAction, format_currency};

/// What the user asked for on a page this frame.
#[derive(Debug, Default)]
struct PageOutcome {
    back: bool,
    create: bool,
    action: Option<(RowAction, RecordId)>,
}

/// Show a page whose records have a create/edit dialog.
///
/// Returns `true` if the back button was clicked.
pub fn show_editable<T: Editable>(app: &mut App, ui: &mut Ui) -> bool {
    let outcome = show_page::<T>(app, ui, Some(T::NOUN));

    if outcome.create {
        app.open_create::<T>();
    }
    match outcome.action {
        Some((RowAction::View, id)) => app.open_detail(T::COLLECTION, id),
        Some((RowAction::Edit, id)) => app.open_edit::<T>(id),
        Some((RowAction::Delete, id)) => app.request_delete::<T>(id),
        None => {}
    }

    if T::controller(&mut app.forms).is_open() {
        let extra = if T::COLLECTION == Dataset::Roles {
            Some(permission_editor::show as fn(&mut Ui, &mut App))
        } else {
            None
        };
        form_dialog::show::<T>(app, ui.ctx(), extra);
    }

    outcome.back
}

/// Show a page that only offers view and delete.
///
/// Returns `true` if the back button was clicked.
pub fn show_readonly<T: Page>(app: &mut App, ui: &mut Ui) -> bool {
    let outcome = show_page::<T>(app, ui, None);

    match outcome.action {
        Some((RowAction::View, id)) => app.open_detail(T::COLLECTION, id),
        Some((RowAction::Delete, id)) => app.request_delete::<T>(id),
        Some((RowAction::Edit, _)) | None => {}
    }

    outcome.back
}

fn show_page<T: Page>(app: &mut App, ui: &mut Ui, noun: Option<&str>) -> PageOutcome {
    let mut outcome = PageOutcome::default();

    if back_button(ui) {
        outcome.back = true;
    }

    panel_header(ui, T::TITLE);

    // Forms read the related collections, so they wait for those too.
    let loading = app
        .loads
        .is_loading_any(std::iter::once(T::COLLECTION).chain(T::DEPENDS_ON.iter().copied()));

    // Toolbar row 1: Action buttons
    ui.horizontal(|ui| {
        ui.add_enabled_ui(!loading, |ui| {
            if let Some(noun) = noun {
                if primary_button_with_icon(ui, PLUS, &format!("Add {noun}")).clicked() {
                    outcome.create = true;
                }
                ui.add_space(10.0);
            }

            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                app.refresh();
            }

            ui.add_space(10.0);

            if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
                app.export_page::<T>(ExportFormat::Excel);
            }

            if styled_button_with_icon(ui, FILE_PDF, "Export to PDF").clicked() {
                app.export_page::<T>(ExportFormat::Pdf);
            }
        });

        if loading {
            ui.add_space(10.0);
            ui.spinner();
            ui.label(format!("Loading {}...", T::DATASET));
        }
    });

    ui.add_space(10.0);

    // Toolbar row 2: Search and filter
    ui.add_enabled_ui(!loading, |ui| search_bar::<T>(app, ui));

    ui.add_space(15.0);

    if let LoadState::Failed(message) = app.loads.state(T::COLLECTION) {
        load_failure(app, ui, T::COLLECTION, &message);
        return outcome;
    }

    if loading && app.store.all::<T>().is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
            ui.label(RichText::new(format!("Loading {}...", T::DATASET)).weak());
        });
        return outcome;
    }

    summary(ui, &app.store, T::COLLECTION);

    // Table
    let columns = effective_columns(T::COLUMNS, app.config.ui.truncate_chars);
    let rows = {
        let visible = app.visible::<T>();
        table::build_rows(&visible, &columns, &app.store)
    };

    ui.label(format!(
        "Showing {} of {} {}",
        rows.len(),
        app.store.all::<T>().len(),
        T::DATASET
    ));

    ui.add_space(10.0);

    if rows.is_empty() {
        ui.label(RichText::new("No records found").weak());
        return outcome;
    }

    ui.add_enabled_ui(!loading, |ui| {
        outcome.action = data_table::show(ui, T::COLLECTION.name(), &columns, &rows);
    });

    outcome
}

fn search_bar<T: Page>(app: &mut App, ui: &mut Ui) {
    let choices: Vec<Vec<(String, String)>> = T::FILTERS
        .iter()
        .map(|spec| spec.choices(app.store.all::<T>(), &app.store))
        .collect();
    let search = app.search_mut(T::COLLECTION);

    ui.horizontal(|ui| {
        ui.label(MAGNIFYING_GLASS);
        ui.add(
            egui::TextEdit::singleline(&mut search.query)
                .desired_width(260.0)
                .hint_text(T::SEARCH_HINT),
        );

        for (spec, options) in T::FILTERS.iter().zip(&choices) {
            ui.add_space(20.0);
            ui.label(format!("{}:", spec.label));

            let current = search.value(spec.key).to_string();
            let selected = options
                .iter()
                .find(|(value, _)| *value == current)
                .map(|(_, label)| label.as_str())
                .unwrap_or("All");

            egui::ComboBox::from_id_salt((T::COLLECTION.name(), spec.key))
                .width(150.0)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current.is_empty(), "All").clicked() {
                        search.set(spec.key, "");
                    }
                    for (value, label) in options {
                        if ui.selectable_label(current == *value, label.as_str()).clicked() {
                            search.set(spec.key, value.clone());
                        }
                    }
                });
        }

        // Clear filters button
        if search.is_active() {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                search.clear();
            }
        }
    });
}

fn load_failure(app: &mut App, ui: &mut Ui, dataset: Dataset, message: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(egui::Margin::same(15))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(WARNING).size(20.0).color(colors::ERROR));
                ui.label(RichText::new(format!("Could not load {}", dataset.name())).strong());
            });
            ui.add_space(5.0);
            ui.label(RichText::new(message).weak());
            ui.add_space(10.0);
            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Retry").clicked() {
                app.load(dataset);
            }
        });
}

/// Summary cards shown above some tables.
fn summary(ui: &mut Ui, store: &Store, dataset: Dataset) {
    match dataset {
        Dataset::Payments => {
            let s = stats::payments(&store.payments);
            ui.horizontal_wrapped(|ui| {
                stat_card(ui, "Collected", &format_currency(s.collected), "Completed payments");
                stat_card(ui, "Completed", &s.completed.to_string(), "Payments");
                stat_card(ui, "Pending", &s.pending.to_string(), "Awaiting payment");
                stat_card(ui, "Failed", &s.failed.to_string(), "Declined or errored");
                stat_card(ui, "Commission", &format_currency(s.commission), "On completed payments");
            });
        }
        Dataset::Comments => {
            let s = stats::comments(&store.comments);
            ui.horizontal_wrapped(|ui| {
                stat_card(ui, "Total", &s.total.to_string(), "Comments");
                stat_card(ui, "Pending", &s.pending.to_string(), "Awaiting moderation");
                stat_card(ui, "Approved", &s.approved.to_string(), "Published");
                stat_card(ui, "Rejected", &s.rejected.to_string(), "Hidden");
                stat_card(ui, "Average", &format!("{:.1}", s.average_rating), "Rating out of 5");
            });
        }
        Dataset::Reservations => {
            ui.horizontal_wrapped(|ui| {
                for (status, count) in stats::reservations(&store.reservations) {
                    stat_card(ui, status.label(), &count.to_string(), "Reservations");
                }
            });
        }
        _ => return,
    }
    ui.add_space(10.0);
}

/// Page columns with truncation capped by the configured budget.
fn effective_columns(columns: &[Column], limit: usize) -> Vec<Column> {
    columns
        .iter()
        .map(|c| match c.kind {
            ColumnKind::Truncated(n) => Column::new(c.key, c.header, ColumnKind::Truncated(n.min(limit))),
            _ => *c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, Role};

    #[test]
    fn test_truncation_capped_by_config() {
        let columns = effective_columns(Comment::COLUMNS, 20);
        let title = columns.iter().find(|c| c.key == "title").unwrap();
        assert_eq!(title.kind, ColumnKind::Truncated(20));
        assert_eq!(columns.len(), Comment::COLUMNS.len());
    }

    #[test]
    fn test_larger_budget_keeps_column_limit() {
        let columns = effective_columns(Role::COLUMNS, 200);
        let description = columns.iter().find(|c| c.key == "description").unwrap();
        assert_eq!(description.kind, ColumnKind::Truncated(50));
        assert_eq!(columns[0], Role::COLUMNS[0]);
    }
}
