//! Detail windows with status actions for reservations, payments, and comments.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{CHECK, FLOPPY_DISK, X};

use super::app::App;
use super::components::{badge, primary_button_with_icon, styled_button, styled_button_with_icon};
use crate::models::{
    Comment, CommentStatus, Payment, PaymentStatus, Record, RecordId, Reservation, ReservationStatus, StatusLabel,
};
use crate::store::{Dataset, Store};
use crate::table::{self, ColumnKind, tone_for};

/// Show the detail window for `app.detail`, if any.
pub fn show(app: &mut App, ctx: &egui::Context) {
    let Some(target) = app.detail else {
        return;
    };

    let mut open = true;
    let found = match target.dataset {
        Dataset::Reservations => reservation(app, ctx, target.id, &mut open),
        Dataset::Payments => payment(app, ctx, target.id, &mut open),
        Dataset::Comments => comment(app, ctx, target.id, &mut open),
        _ => false,
    };

    if !open || !found {
        app.detail = None;
    }
}

/// Statuses a reservation can move to from `status`.
fn reservation_transitions(status: ReservationStatus) -> &'static [ReservationStatus] {
    match status {
        ReservationStatus::Pending => &[ReservationStatus::Confirmed, ReservationStatus::Cancelled],
        ReservationStatus::Confirmed => &[ReservationStatus::Completed, ReservationStatus::Cancelled],
        ReservationStatus::Cancelled | ReservationStatus::Completed => &[],
    }
}

fn reservation_verb(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "Reopen",
        ReservationStatus::Confirmed => "Confirm",
        ReservationStatus::Cancelled => "Cancel Reservation",
        ReservationStatus::Completed => "Complete",
    }
}

fn reservation(app: &mut App, ctx: &egui::Context, id: RecordId, open: &mut bool) -> bool {
    let Some(record) = app.store.get::<Reservation>(id).cloned() else {
        return false;
    };
    let mut change = None;

    detail_window(ctx, &format!("Reservation {}", record.code), open, |ui| {
        field_grid(
            ui,
            "reservation_detail",
            &record,
            &app.store,
            &[
                ("code", "Code", ColumnKind::Text),
                ("tourist", "Tourist", ColumnKind::Text),
                ("tourist_email", "Email", ColumnKind::Text),
                ("package", "Package", ColumnKind::Text),
                ("start_date", "Start", ColumnKind::Date),
                ("end_date", "End", ColumnKind::Date),
                ("people", "People", ColumnKind::Number),
                ("total_price", "Total", ColumnKind::Currency),
                ("payment_method", "Payment method", ColumnKind::Text),
                ("notes", "Notes", ColumnKind::Text),
                ("created_at", "Created", ColumnKind::Date),
                ("status", "Status", ColumnKind::Badge),
            ],
        );

        ui.add_space(15.0);
        ui.horizontal(|ui| {
            let transitions = reservation_transitions(record.status);
            if transitions.is_empty() {
                ui.label(RichText::new("No further status changes").weak());
            }
            for status in transitions {
                let icon = if *status == ReservationStatus::Cancelled { X } else { CHECK };
                if styled_button_with_icon(ui, icon, reservation_verb(*status)).clicked() {
                    change = Some(*status);
                }
            }
        });
    });

    if let Some(status) = change {
        app.set_reservation_status(id, status);
    }
    true
}

fn payment(app: &mut App, ctx: &egui::Context, id: RecordId, open: &mut bool) -> bool {
    let Some(record) = app.store.get::<Payment>(id).cloned() else {
        return false;
    };
    let mut change = None;

    detail_window(ctx, &format!("Payment #{}", record.id), open, |ui| {
        field_grid(
            ui,
            "payment_detail",
            &record,
            &app.store,
            &[
                ("reservation_code", "Reservation", ColumnKind::Text),
                ("tourist", "Tourist", ColumnKind::Text),
                ("amount", "Amount", ColumnKind::Currency),
                ("currency", "Currency", ColumnKind::Text),
                ("method", "Method", ColumnKind::Text),
                ("paid_at", "Paid at", ColumnKind::Text),
                ("external_reference", "Reference", ColumnKind::Text),
                ("commission", "Commission", ColumnKind::Currency),
                ("net_amount", "Net amount", ColumnKind::Currency),
                ("notes", "Notes", ColumnKind::Text),
                ("status", "Status", ColumnKind::Badge),
            ],
        );

        ui.add_space(15.0);
        ui.horizontal(|ui| {
            ui.label("Change status:");
            let mut selected = record.status;
            egui::ComboBox::from_id_salt("payment_status")
                .width(140.0)
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for status in PaymentStatus::ALL {
                        ui.selectable_value(&mut selected, *status, status.label());
                    }
                });
            if selected != record.status {
                change = Some(selected);
            }

            ui.add_space(10.0);
            let refundable = record.status == PaymentStatus::Completed;
            ui.add_enabled_ui(refundable, |ui| {
                if styled_button(ui, "Mark Refunded").clicked() {
                    change = Some(PaymentStatus::Refunded);
                }
            });
        });
    });

    if let Some(status) = change {
        app.set_payment_status(id, status);
    }
    true
}

enum CommentAction {
    Status(CommentStatus),
    Reply,
}

fn comment(app: &mut App, ctx: &egui::Context, id: RecordId, open: &mut bool) -> bool {
    let Some(record) = app.store.get::<Comment>(id).cloned() else {
        return false;
    };
    let mut action = None;

    detail_window(ctx, &format!("Comment #{}", record.id), open, |ui| {
        field_grid(
            ui,
            "comment_detail",
            &record,
            &app.store,
            &[
                ("tourist", "Tourist", ColumnKind::Text),
                ("package", "Package", ColumnKind::Text),
                ("rating", "Rating", ColumnKind::Rating),
                ("title", "Title", ColumnKind::Text),
                ("trip_date", "Trip date", ColumnKind::Date),
                ("helpful_yes", "Helpful", ColumnKind::Number),
                ("helpful_no", "Not helpful", ColumnKind::Number),
                ("created_at", "Posted", ColumnKind::Date),
                ("status", "Status", ColumnKind::Badge),
            ],
        );

        ui.add_space(10.0);
        ui.label(RichText::new("Comment").strong());
        ui.label(record.body.as_str());

        ui.add_space(15.0);
        ui.horizontal(|ui| {
            ui.add_enabled_ui(record.status != CommentStatus::Approved, |ui| {
                if styled_button_with_icon(ui, CHECK, "Approve").clicked() {
                    action = Some(CommentAction::Status(CommentStatus::Approved));
                }
            });
            ui.add_enabled_ui(record.status != CommentStatus::Rejected, |ui| {
                if styled_button_with_icon(ui, X, "Reject").clicked() {
                    action = Some(CommentAction::Status(CommentStatus::Rejected));
                }
            });
        });

        ui.add_space(15.0);
        ui.label(RichText::new("Admin reply").strong());
        ui.add(
            egui::TextEdit::multiline(&mut app.reply_input)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Write a public reply..."),
        );
        ui.add_space(5.0);
        ui.add_enabled_ui(!app.reply_input.trim().is_empty(), |ui| {
            if primary_button_with_icon(ui, FLOPPY_DISK, "Save Reply").clicked() {
                action = Some(CommentAction::Reply);
            }
        });
    });

    match action {
        Some(CommentAction::Status(status)) => app.set_comment_status(id, status),
        Some(CommentAction::Reply) => app.reply_to_comment(id),
        None => {}
    }
    true
}

fn detail_window(ctx: &egui::Context, title: &str, open: &mut bool, add_contents: impl FnOnce(&mut Ui)) {
    egui::Window::new(title)
        .id(egui::Id::new("detail_window"))
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(open)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            add_contents(ui);
        });
}

fn field_grid<T: Record>(
    ui: &mut Ui,
    id_salt: &str,
    record: &T,
    store: &Store,
    fields: &[(&str, &str, ColumnKind)],
) {
    egui::Grid::new(id_salt)
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            for (key, label, kind) in fields {
                ui.label(RichText::new(*label).weak());
                let cell = table::render(&record.field(key, store), *kind);
                match *kind {
                    ColumnKind::Badge => {
                        badge(ui, cell.text(), tone_for(cell.text()));
                    }
                    _ => {
                        ui.label(cell.text());
                    }
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_reservations_have_no_transitions() {
        assert!(reservation_transitions(ReservationStatus::Cancelled).is_empty());
        assert!(reservation_transitions(ReservationStatus::Completed).is_empty());
    }

    #[test]
    fn test_pending_can_be_confirmed_or_cancelled() {
        assert_eq!(
            reservation_transitions(ReservationStatus::Pending),
            &[ReservationStatus::Confirmed, ReservationStatus::Cancelled]
        );
        assert!(reservation_transitions(ReservationStatus::Confirmed).contains(&ReservationStatus::Completed));
    }
}
