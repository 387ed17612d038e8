//! Settings panel for site settings and the local application configuration.

use eframe::egui::{self, RichText};
use egui_phosphor::regular::{FLOPPY_DISK, FOLDER_OPEN};

use super::app::App;
use super::components::{back_button, colors, panel_header, primary_button_with_icon, styled_button_with_icon};
use super::form_dialog;
use crate::config::AppConfig;
use crate::form::SettingsTab;

/// Show the settings panel.
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut egui::Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Settings");

    egui::ScrollArea::vertical().show(ui, |ui| {
        site_settings(app, ui);
        ui.add_space(15.0);
        application_settings(app, ui);
    });

    go_back
}

fn site_settings(app: &mut App, ui: &mut egui::Ui) {
    ui.group(|ui| {
        ui.heading("Site Settings");
        ui.add_space(5.0);

        let mut selected = app.settings_tab;
        ui.horizontal(|ui| {
            for tab in SettingsTab::ALL {
                ui.selectable_value(&mut selected, tab, tab.label());
            }
        });
        if selected != app.settings_tab {
            app.switch_settings_tab(selected);
        }

        ui.separator();
        ui.add_space(5.0);

        let tab = app.settings_tab;
        form_dialog::fields(
            ui,
            tab.label(),
            tab.schema(),
            &mut app.settings_form,
            &app.settings_errors,
            &app.store,
        );

        ui.add_space(10.0);
        if primary_button_with_icon(ui, FLOPPY_DISK, &format!("Save {} Settings", tab.label())).clicked() {
            app.save_settings();
        }
    });
}

fn application_settings(app: &mut App, ui: &mut egui::Ui) {
    ui.group(|ui| {
        ui.heading("Application");
        ui.add_space(5.0);

        let config = &mut app.config;
        let mut modified = false;

        egui::Grid::new("app_settings_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("API base URL:");
                modified |= ui.text_edit_singleline(&mut config.api.base_url).changed();
                ui.end_row();

                ui.label("Data source:");
                modified |= ui.checkbox(&mut config.api.use_mock, "Use sample data").changed();
                ui.end_row();

                ui.label("Timeout (seconds):");
                modified |= number_field(ui, &mut config.api.timeout_secs);
                ui.end_row();

                ui.label("Max retries:");
                modified |= number_field(ui, &mut config.api.max_retries);
                ui.end_row();

                ui.label("Sample load delay (ms):");
                modified |= ui
                    .add_enabled(
                        config.api.use_mock,
                        egui::DragValue::new(&mut config.mock.load_delay_ms).range(0..=60_000),
                    )
                    .changed();
                ui.end_row();

                ui.label("Truncate text at:");
                modified |= number_field(ui, &mut config.ui.truncate_chars);
                ui.end_row();

                ui.label("Theme:");
                if ui.checkbox(&mut config.ui.dark_mode, "Dark mode").changed() {
                    let visuals = if config.ui.dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ui.ctx().set_visuals(visuals);
                    modified = true;
                }
                ui.end_row();

                ui.label("Export folder:");
                ui.horizontal(|ui| {
                    ui.label(RichText::new(config.export.output_dir.display().to_string()).weak());
                    if styled_button_with_icon(ui, FOLDER_OPEN, "Browse").clicked() {
                        let picked = rfd::FileDialog::new()
                            .set_directory(&config.export.output_dir)
                            .pick_folder();
                        if let Some(dir) = picked {
                            config.export.output_dir = dir;
                            modified = true;
                        }
                    }
                });
                ui.end_row();
            });

        if modified {
            app.config_modified = true;
        }

        ui.add_space(5.0);
        ui.label(
            RichText::new("Data source and API changes take effect after restart.")
                .small()
                .weak(),
        );
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let save_btn = egui::Button::new("Save Configuration");
            if ui.add_enabled(app.config_modified, save_btn).clicked() {
                app.save_config();
            }

            if app.config_modified {
                ui.label(RichText::new("(unsaved changes)").color(colors::WARNING).italics());
            }

            if ui.button("Reset to Defaults").clicked() {
                app.config = AppConfig::default();
                app.config_modified = true;
            }
        });
    });
}

/// Text field bound to a number; edits that do not parse are ignored.
fn number_field<N>(ui: &mut egui::Ui, value: &mut N) -> bool
where
    N: std::str::FromStr + ToString,
{
    let mut text = value.to_string();
    let changed = ui.add(egui::TextEdit::singleline(&mut text).desired_width(80.0)).changed();
    if changed {
        if let Ok(parsed) = text.parse() {
            *value = parsed;
            return true;
        }
    }
    false
}
