//! Tabular view model: records in, rows of display cells out.

use crate::models::{Lookup, Record, RecordId, Value};

/// Placeholder shown for empty values.
pub const EMPTY_CELL: &str = "-";

/// Actions a row can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    pub const ALL: &'static [RowAction] = &[Self::View, Self::Edit, Self::Delete];
    pub const EDIT_DELETE: &'static [RowAction] = &[Self::Edit, Self::Delete];
    pub const VIEW_DELETE: &'static [RowAction] = &[Self::View, Self::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// How a column renders its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Text cut to the given number of characters.
    Truncated(usize),
    /// Status pill colored by label.
    Badge,
    /// 0 to 5 stars.
    Rating,
    Currency,
    Date,
    Number,
    Actions(&'static [RowAction]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(key: &'static str, header: &'static str, kind: ColumnKind) -> Self {
        Self { key, header, kind }
    }

    pub const fn text(key: &'static str, header: &'static str) -> Self {
        Self::new(key, header, ColumnKind::Text)
    }

    pub const fn actions(actions: &'static [RowAction]) -> Self {
        Self::new("actions", "Actions", ColumnKind::Actions(actions))
    }
}

/// Badge color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Badge { label: String, tone: Tone },
    Rating { value: f64, stars: String },
    Actions(&'static [RowAction]),
}

impl Cell {
    /// Plain text form of the cell.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Badge { label, .. } => label,
            Self::Rating { stars, .. } => stars,
            Self::Actions(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RecordId,
    pub cells: Vec<Cell>,
}

/// One row per record in input order, one cell per column.
pub fn build_rows<T: Record>(records: &[&T], columns: &[Column], lookup: &dyn Lookup) -> Vec<Row> {
    records
        .iter()
        .map(|record| Row {
            id: record.id(),
            cells: columns.iter().map(|c| render(&record.field(c.key, lookup), c.kind)).collect(),
        })
        .collect()
}

/// Render a single value according to a column kind.
pub fn render(value: &Value, kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Actions(actions) => Cell::Actions(actions),
        _ if value.is_empty() => Cell::Text(EMPTY_CELL.to_string()),
        ColumnKind::Text | ColumnKind::Date => Cell::Text(value.to_string()),
        ColumnKind::Truncated(max) => Cell::Text(truncate(&value.to_string(), max)),
        ColumnKind::Badge => {
            let label = match value {
                Value::Bool(true) => "Active".to_string(),
                Value::Bool(false) => "Inactive".to_string(),
                other => other.to_string(),
            };
            let tone = tone_for(&label);
            Cell::Badge { label, tone }
        }
        ColumnKind::Rating => {
            let rating = value.as_f64().unwrap_or(0.0);
            Cell::Rating {
                value: rating,
                stars: stars(rating),
            }
        }
        ColumnKind::Currency => match value.as_f64() {
            Some(n) => Cell::Text(format_currency(n)),
            None => Cell::Text(value.to_string()),
        },
        ColumnKind::Number => match value.as_f64() {
            Some(n) => Cell::Text(format_number(n)),
            None => Cell::Text(value.to_string()),
        },
    }
}

/// Cut `text` to `max` characters, appending an ellipsis when anything was dropped.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Five star glyphs, filled up to the whole part of `rating`.
pub fn stars(rating: f64) -> String {
    let filled = rating.clamp(0.0, 5.0).floor() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Fixed label-to-tone mapping for badges.
pub fn tone_for(label: &str) -> Tone {
    match label {
        "Active" | "Confirmed" | "Completed" | "Approved" => Tone::Success,
        "Pending" => Tone::Warning,
        "Inactive" | "Cancelled" | "Failed" | "Rejected" => Tone::Danger,
        "Refunded" => Tone::Info,
        _ => Tone::Neutral,
    }
}

/// Thousands-grouped number with at most three fraction digits.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rounded = (n.abs() * 1000.0).round() / 1000.0;
    let formatted = format!("{rounded:.3}");
    let (whole, frac) = formatted.split_once('.').unwrap_or((&formatted, ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if n < 0.0 && rounded != 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

pub fn format_currency(n: f64) -> String {
    let formatted = format_number(n);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${formatted}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoLookup, Reservation};
    use crate::seed;
    use crate::store::Store;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a much longer sentence", 6), "a much...");
        assert_eq!(truncate("ñandú ñandú", 5), "ñandú...");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4.8), "★★★★☆");
        assert_eq!(stars(5.0), "★★★★★");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(7.0), "★★★★★");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1500.0), "1,500");
        assert_eq!(format_number(1234567.891), "1,234,567.891");
        assert_eq!(format_number(4.8), "4.8");
        assert_eq!(format_number(-75.0), "-75");
        assert_eq!(format_number(0.12345), "0.123");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(8800.0), "$8,800");
        assert_eq!(format_currency(-75.5), "-$75.5");
    }

    #[test]
    fn test_tone_for() {
        assert_eq!(tone_for("Approved"), Tone::Success);
        assert_eq!(tone_for("Pending"), Tone::Warning);
        assert_eq!(tone_for("Failed"), Tone::Danger);
        assert_eq!(tone_for("Refunded"), Tone::Info);
        assert_eq!(tone_for("Something"), Tone::Neutral);
    }

    #[test]
    fn test_build_rows_keeps_order_and_ids() {
        let store = Store::seeded();
        let records: Vec<&Reservation> = store.reservations.iter().rev().collect();
        let columns = [
            Column::text("code", "Code"),
            Column::text("tourist", "Tourist"),
            Column::new("total_price", "Total", ColumnKind::Currency),
            Column::new("status", "Status", ColumnKind::Badge),
            Column::actions(RowAction::ALL),
        ];
        let rows = build_rows(&records, &columns, &store);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].id, RecordId(5));
        assert_eq!(rows[4].cells[0].text(), "RES-2024-001");
        assert_eq!(rows[4].cells[1].text(), "Ana Martínez");
        assert_eq!(rows[4].cells[2].text(), "$3,000");
        assert_eq!(
            rows[4].cells[3],
            Cell::Badge {
                label: "Confirmed".to_string(),
                tone: Tone::Success
            }
        );
        assert_eq!(rows[4].cells[4], Cell::Actions(RowAction::ALL));
    }

    #[test]
    fn test_unresolved_join_renders_placeholder() {
        let reservations = seed::reservations();
        let records: Vec<&Reservation> = reservations.iter().collect();
        let rows = build_rows(&records, &[Column::text("tourist", "Tourist")], &NoLookup);
        assert!(rows.iter().all(|r| r.cells[0].text() == EMPTY_CELL));
    }

    #[test]
    fn test_bool_badge_and_rating() {
        assert_eq!(
            render(&Value::Bool(false), ColumnKind::Badge),
            Cell::Badge {
                label: "Inactive".to_string(),
                tone: Tone::Danger
            }
        );
        assert_eq!(
            render(&Value::Decimal(4.9), ColumnKind::Rating),
            Cell::Rating {
                value: 4.9,
                stars: "★★★★☆".to_string()
            }
        );
    }
}
