//! Create/edit dialog rendered from a form schema.

use chrono::Local;
use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::FLOPPY_DISK;

use super::app::{App, Editable};
use super::components::{colors, primary_button_with_icon, styled_button};
use crate::form::{FieldErrors, FieldKind, FieldRule, FormData, parse_flexible_date};
use crate::store::Store;

/// Show the open form for `T`, with an optional section below the fields.
pub fn show<T: Editable>(app: &mut App, ctx: &egui::Context, extra: Option<fn(&mut Ui, &mut App)>) {
    let title = T::controller(&mut app.forms).title();
    let mut save = false;
    let mut cancel = false;

    egui::Window::new(title)
        .id(egui::Id::new(("form_dialog", T::COLLECTION.name())))
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .max_height(600.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                let controller = T::controller(&mut app.forms);
                fields(
                    ui,
                    T::COLLECTION.name(),
                    T::SCHEMA,
                    &mut controller.data,
                    &controller.errors,
                    &app.store,
                );

                if let Some(extra) = extra {
                    ui.add_space(15.0);
                    extra(ui, app);
                }
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let busy = app.pending_operations > 0;
                    if busy {
                        ui.spinner();
                    }
                    ui.add_enabled_ui(!busy, |ui| {
                        if primary_button_with_icon(ui, FLOPPY_DISK, "Save").clicked() {
                            save = true;
                        }
                    });
                });
            });
        });

    if cancel {
        T::controller(&mut app.forms).cancel();
    } else if save {
        app.save_form::<T>();
    }
}

/// One labelled control per schema field, each followed by its error message.
pub fn fields(
    ui: &mut Ui,
    id_salt: &str,
    schema: &[FieldRule],
    data: &mut FormData,
    errors: &FieldErrors,
    store: &Store,
) {
    egui::Grid::new((id_salt, "form_grid"))
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            for rule in schema {
                if rule.required {
                    ui.label(format!("{}:", rule.label));
                } else {
                    ui.label(format!("{} (optional):", rule.label));
                }

                ui.vertical(|ui| {
                    field(ui, id_salt, rule, data, store);
                    if let Some(message) = errors.get(rule.key) {
                        ui.colored_label(colors::ERROR, message);
                    }
                });
                ui.end_row();
            }
        });
}

fn field(ui: &mut Ui, id_salt: &str, rule: &FieldRule, data: &mut FormData, store: &Store) {
    match rule.kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Url => {
            ui.add(egui::TextEdit::singleline(data.get_mut(rule.key)).desired_width(280.0));
        }
        FieldKind::Number { .. } | FieldKind::Integer { .. } => {
            ui.add(egui::TextEdit::singleline(data.get_mut(rule.key)).desired_width(120.0));
        }
        FieldKind::Multiline => {
            ui.add(
                egui::TextEdit::multiline(data.get_mut(rule.key))
                    .desired_rows(3)
                    .desired_width(280.0),
            );
        }
        FieldKind::Password => {
            ui.add(
                egui::TextEdit::singleline(data.get_mut(rule.key))
                    .password(true)
                    .desired_width(280.0),
            );
        }
        FieldKind::Date => {
            let salt = format!("{id_salt}_{}", rule.key);
            ui.horizontal(|ui| {
                let text = data.get_mut(rule.key);
                ui.add(
                    egui::TextEdit::singleline(text)
                        .desired_width(120.0)
                        .hint_text("YYYY-MM-DD"),
                );

                let mut date = parse_flexible_date(text).unwrap_or_else(|| Local::now().date_naive());
                let before = date;
                ui.add(DatePickerButton::new(&mut date).id_salt(&salt));
                if date != before {
                    *text = date.format("%Y-%m-%d").to_string();
                }
            });
        }
        FieldKind::Choice(source) => {
            let options = source.options(store);
            let value = data.get_mut(rule.key);
            let selected = options
                .iter()
                .find(|(v, _)| v == value)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| "Select...".to_string());

            egui::ComboBox::from_id_salt((id_salt, rule.key))
                .width(280.0)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (v, label) in &options {
                        ui.selectable_value(value, v.clone(), label.as_str());
                    }
                });
        }
        FieldKind::Bool => {
            let mut flag = data.flag(rule.key);
            if ui.checkbox(&mut flag, "").changed() {
                data.set(rule.key, flag);
            }
        }
    }
}
