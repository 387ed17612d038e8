//! Dashboard panel with stats, navigation cards, charts, quick actions, and activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};

use super::app::{App, LogLevel, Panel};
use super::components::{colors, dashboard_card, stat_card};
use crate::models::{ChartPoint, Package, Reservation, Tourist};
use crate::table::{format_currency, format_number};

const CARDS_PER_ROW: usize = 5;

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;

    ScrollArea::vertical().show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);

            // Header
            ui.label(RichText::new("Tourism Admin").size(32.0).strong());
            ui.add_space(5.0);
            ui.label(RichText::new("Platform administration dashboard").size(14.0).weak());

            ui.add_space(30.0);

            // Stat cards row
            let stats = app.dashboard_stats();
            ui.horizontal(|ui| {
                let available = ui.available_width();
                let start_offset = ((available - 700.0) / 2.0).max(0.0);
                ui.add_space(start_offset);

                stat_card(ui, "Users", &stats.total_users.to_string(), "Administrator accounts");
                stat_card(ui, "Tourists", &stats.total_tourists.to_string(), "Registered travellers");
                stat_card(
                    ui,
                    "Reservations",
                    &stats.total_reservations.to_string(),
                    "All time bookings",
                );
                stat_card(ui, "Revenue", &format_currency(stats.total_revenue), "Completed payments");
            });

            ui.add_space(30.0);

            // Navigation cards, two rows
            let destinations: Vec<Panel> = Panel::NAV.into_iter().filter(|p| *p != Panel::Dashboard).collect();
            let available = ui.available_width();
            let spacing = 20.0;
            let per_row = CARDS_PER_ROW as f32;
            let card_width = ((available - spacing * (per_row - 1.0)) / per_row).clamp(120.0, 200.0);
            let card_size = egui::vec2(card_width, card_width * 0.75);
            let total_width = card_width * per_row + spacing * (per_row - 1.0);
            let start_offset = ((available - total_width) / 2.0).max(0.0);

            for row in destinations.chunks(CARDS_PER_ROW) {
                ui.horizontal(|ui| {
                    ui.add_space(start_offset);
                    for (i, panel) in row.iter().enumerate() {
                        if i > 0 {
                            ui.add_space(spacing);
                        }
                        if dashboard_card(ui, panel.name(), card_description(*panel), panel.icon(), card_size)
                            .clicked()
                        {
                            next_panel = Some(*panel);
                        }
                    }
                });
                ui.add_space(spacing);
            }

            ui.add_space(10.0);
        });

        // Charts
        if let Some(charts) = &app.charts {
            ui.horizontal_wrapped(|ui| {
                chart_frame(ui, "Monthly Reservations", &charts.monthly_reservations, format_number);
                chart_frame(ui, "Tourists by Country", &charts.tourists_by_country, format_number);
                chart_frame(ui, "Revenue by Package", &charts.revenue_by_package, format_currency);
            });
            ui.add_space(20.0);
        }

        // Two-column layout: Quick Actions | Recent Activity
        let available_width = ui.available_width();
        let column_width = (available_width - 40.0) / 2.0;

        ui.horizontal(|ui| {
            ui.add_space(10.0);

            // Left column - Quick Actions
            ui.vertical(|ui| {
                ui.set_width(column_width);

                egui::Frame::new()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(Margin::same(15))
                    .corner_radius(CornerRadius::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(column_width - 30.0);

                        ui.label(RichText::new("Quick Actions").strong());
                        ui.add_space(10.0);

                        if ui.button("Refresh Data").clicked() {
                            app.refresh();
                        }

                        ui.add_space(5.0);

                        if ui.button("Add Tourist").clicked() {
                            app.navigate(Panel::Tourists);
                            app.open_create::<Tourist>();
                        }

                        ui.add_space(5.0);

                        if ui.button("Add Package").clicked() {
                            app.navigate(Panel::Packages);
                            app.open_create::<Package>();
                        }

                        ui.add_space(5.0);

                        if ui.button("New Reservation").clicked() {
                            app.navigate(Panel::Reservations);
                            app.open_create::<Reservation>();
                        }
                    });
            });

            ui.add_space(20.0);

            // Right column - Recent Activity
            ui.vertical(|ui| {
                ui.set_width(column_width);

                egui::Frame::new()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(Margin::same(15))
                    .corner_radius(CornerRadius::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(column_width - 30.0);

                        ui.label(RichText::new("Recent Activity").strong());
                        ui.add_space(10.0);

                        ScrollArea::vertical()
                            .id_salt("recent_activity")
                            .max_height(150.0)
                            .show(ui, |ui| {
                                if app.log_messages.is_empty() {
                                    ui.label(RichText::new("No recent activity").weak());
                                } else {
                                    for entry in app.log_messages.iter().rev().take(10) {
                                        let color = match entry.level {
                                            LogLevel::Info => Color32::GRAY,
                                            LogLevel::Success => colors::SUCCESS,
                                            LogLevel::Warning => colors::WARNING,
                                            LogLevel::Error => colors::ERROR,
                                        };

                                        ui.horizontal(|ui| {
                                            ui.label(
                                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                                    .small()
                                                    .color(Color32::DARK_GRAY),
                                            );
                                            ui.label(RichText::new(&entry.message).color(color));
                                        });
                                    }
                                }
                            });
                    });
            });
        });

        ui.add_space(20.0);
    });

    next_panel
}

fn card_description(panel: Panel) -> &'static str {
    match panel {
        Panel::Users => "Administrator accounts",
        Panel::Tourists => "Traveller profiles",
        Panel::Destinations => "Places to visit",
        Panel::Packages => "Tours and pricing",
        Panel::Reservations => "Bookings and status",
        Panel::Payments => "Collections and refunds",
        Panel::Providers => "Partner companies",
        Panel::Comments => "Reviews and moderation",
        Panel::Roles => "Access and permissions",
        Panel::Settings => "Site and app options",
        Panel::Login | Panel::Dashboard => "",
    }
}

/// Horizontal bar chart drawn with progress bars scaled to the largest value.
fn chart_frame(ui: &mut Ui, title: &str, points: &[ChartPoint], format: fn(f64) -> String) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_width(300.0);
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);

            if points.is_empty() {
                ui.label(RichText::new("No data").weak());
                return;
            }

            let fractions = bar_fractions(points);
            egui::Grid::new(title).num_columns(2).spacing([10.0, 6.0]).show(ui, |ui| {
                for (point, fraction) in points.iter().zip(fractions) {
                    ui.label(RichText::new(&point.label).small());
                    ui.add(
                        egui::ProgressBar::new(fraction)
                            .desired_width(170.0)
                            .fill(colors::PRIMARY)
                            .text(format(point.value)),
                    );
                    ui.end_row();
                }
            });
        });
}

/// Bar lengths relative to the largest value; all zero when nothing is positive.
fn bar_fractions(points: &[ChartPoint]) -> Vec<f32> {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|p| {
            if max > 0.0 {
                (p.value.max(0.0) / max) as f32
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fractions_scale_to_largest() {
        let points = vec![ChartPoint::new("a", 50.0), ChartPoint::new("b", 100.0), ChartPoint::new("c", 0.0)];
        assert_eq!(bar_fractions(&points), vec![0.5, 1.0, 0.0]);
    }

    #[test]
    fn test_bar_fractions_all_zero() {
        let points = vec![ChartPoint::new("a", 0.0)];
        assert_eq!(bar_fractions(&points), vec![0.0]);
        assert!(bar_fractions(&[]).is_empty());
    }

    #[test]
    fn test_every_card_has_description() {
        for panel in Panel::NAV.into_iter().filter(|p| *p != Panel::Dashboard) {
            assert!(!card_description(panel).is_empty(), "{:?}", panel);
        }
    }
}
