//! Striped grid over view-model rows.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{EYE, PENCIL, TRASH};

use super::components::{action_button, badge, colors, danger_action_button};
use crate::models::RecordId;
use crate::table::{Cell, Column, Row, RowAction};

/// Render the rows. Returns the row action clicked this frame, if any.
pub fn show(ui: &mut Ui, id_salt: &str, columns: &[Column], rows: &[Row]) -> Option<(RowAction, RecordId)> {
    let mut clicked = None;

    ScrollArea::vertical().id_salt((id_salt, "scroll")).show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new((id_salt, "grid"))
            .num_columns(columns.len())
            .striped(true)
            .min_col_width(40.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                // Header
                for column in columns {
                    ui.strong(column.header);
                }
                ui.end_row();

                // Data rows
                for row in rows {
                    for cell in &row.cells {
                        if let Some(action) = show_cell(ui, cell) {
                            clicked = Some((action, row.id));
                        }
                    }
                    ui.end_row();
                }
            });
    });

    clicked
}

fn show_cell(ui: &mut Ui, cell: &Cell) -> Option<RowAction> {
    match cell {
        Cell::Text(text) => {
            ui.label(text.as_str());
            None
        }
        Cell::Badge { label, tone } => {
            badge(ui, label, *tone);
            None
        }
        Cell::Rating { value, stars } => {
            ui.label(RichText::new(stars.as_str()).color(colors::WARNING))
                .on_hover_text(format!("{value:.1}"));
            None
        }
        Cell::Actions(actions) => {
            ui.horizontal(|ui| {
                let mut clicked = None;
                for action in actions.iter() {
                    ui.add_space(4.0);
                    let response = match action {
                        RowAction::View => action_button(ui, EYE, action.label()),
                        RowAction::Edit => action_button(ui, PENCIL, action.label()),
                        RowAction::Delete => danger_action_button(ui, TRASH, action.label()),
                    };
                    if response.clicked() {
                        clicked = Some(*action);
                    }
                }
                clicked
            })
            .inner
        }
    }
}
