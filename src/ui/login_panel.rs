//! Sign-in screen.

use eframe::egui::{self, CornerRadius, Margin, RichText};
use egui_phosphor::regular::{COMPASS, SIGN_IN};

use super::app::App;
use super::components::{colors, primary_button_with_icon};

pub fn show(app: &mut App, ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new(COMPASS).size(48.0));
        ui.label(RichText::new("Tourism Admin").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Sign in to manage the platform").size(14.0).weak());
        ui.add_space(30.0);

        egui::Frame::new()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(Margin::same(25))
            .corner_radius(CornerRadius::same(8))
            .show(ui, |ui| {
                ui.set_width(340.0);
                let pending = app.login.pending;

                ui.add_enabled_ui(!pending, |ui| {
                    egui::Grid::new("login_grid")
                        .num_columns(2)
                        .spacing([20.0, 10.0])
                        .show(ui, |ui| {
                            ui.label("Email:");
                            ui.add(
                                egui::TextEdit::singleline(&mut app.login.email)
                                    .hint_text("admin@example.com")
                                    .desired_width(220.0),
                            );
                            ui.end_row();

                            ui.label("Password:");
                            let password = ui.add(
                                egui::TextEdit::singleline(&mut app.login.password)
                                    .password(true)
                                    .desired_width(220.0),
                            );
                            ui.end_row();

                            if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                app.sign_in();
                            }
                        });
                });

                if let Some(error) = &app.login.error {
                    ui.add_space(10.0);
                    ui.colored_label(colors::ERROR, error);
                }

                ui.add_space(15.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!pending, |ui| {
                        if primary_button_with_icon(ui, SIGN_IN, "Sign In").clicked() {
                            app.sign_in();
                        }
                    });
                    if pending {
                        ui.spinner();
                        ui.label("Signing in...");
                    }
                });

                if !app.is_remote() {
                    ui.add_space(10.0);
                    ui.label(
                        RichText::new("Sample data mode: any valid email and password signs in.")
                            .small()
                            .weak(),
                    );
                }
            });
    });
}
