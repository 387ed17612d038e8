//! Per-page table, export, and filter definitions.

use std::collections::BTreeSet;

use crate::export::ExportColumn;
use crate::models::{
    Comment, CommentStatus, Destination, Lookup, Package, Payment, PaymentStatus, Provider, Record, Reservation,
    ReservationStatus, Role, StatusLabel, Tourist, User, UserStatus,
};
use crate::store::{Dataset, Stored};
use crate::table::{Column, ColumnKind, RowAction};

/// Where a categorical filter gets its options.
#[derive(Debug, Clone, Copy)]
pub enum FilterOptions {
    /// Fixed `(value, label)` pairs.
    Fixed(&'static [(&'static str, &'static str)]),
    /// Status labels of a closed status set.
    Statuses(fn() -> Vec<&'static str>),
    /// Distinct field values present in the loaded records.
    Distinct,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub options: FilterOptions,
}

impl FilterSpec {
    pub const fn new(key: &'static str, label: &'static str, options: FilterOptions) -> Self {
        Self { key, label, options }
    }

    /// `(value, label)` pairs offered for this filter, value order as shown.
    pub fn choices<T: Record>(&self, records: &[T], lookup: &dyn Lookup) -> Vec<(String, String)> {
        match self.options {
            FilterOptions::Fixed(pairs) => pairs.iter().map(|(v, l)| (v.to_string(), l.to_string())).collect(),
            FilterOptions::Statuses(labels) => labels().into_iter().map(|l| (l.to_string(), l.to_string())).collect(),
            FilterOptions::Distinct => records
                .iter()
                .map(|r| r.field(self.key, lookup).to_string())
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|v| (v.clone(), v))
                .collect(),
        }
    }
}

const ACTIVE_OPTIONS: &[(&str, &str)] = &[("true", "Active"), ("false", "Inactive")];
const RATING_OPTIONS: &[(&str, &str)] = &[
    ("5", "5 stars"),
    ("4", "4 stars"),
    ("3", "3 stars"),
    ("2", "2 stars"),
    ("1", "1 star"),
];

/// A table page over one stored record type.
pub trait Page: Stored {
    const TITLE: &'static str;
    const COLLECTION: Dataset;
    /// Collections that must be loaded for joins and form choices.
    const DEPENDS_ON: &'static [Dataset] = &[];
    const COLUMNS: &'static [Column];
    const EXPORT: &'static [ExportColumn];
    const FILTERS: &'static [FilterSpec] = &[];
    const SEARCH_HINT: &'static str;
}

impl Page for User {
    const TITLE: &'static str = "Users";
    const COLLECTION: Dataset = Dataset::Users;
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("name", "Name"),
        Column::text("email", "Email"),
        Column::text("role", "Role"),
        Column::new("status", "Status", ColumnKind::Badge),
        Column::new("created_at", "Created", ColumnKind::Date),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("name", "Name"),
        ExportColumn::new("email", "Email"),
        ExportColumn::new("role", "Role"),
        ExportColumn::new("status", "Status"),
        ExportColumn::new("created_at", "Created"),
    ];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::new("status", "Status", FilterOptions::Statuses(UserStatus::labels)),
        FilterSpec::new("role", "Role", FilterOptions::Distinct),
    ];
    const SEARCH_HINT: &'static str = "Search by name or email...";
}

impl Page for Tourist {
    const TITLE: &'static str = "Tourists";
    const COLLECTION: Dataset = Dataset::Tourists;
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("full_name", "Name"),
        Column::text("email", "Email"),
        Column::text("phone", "Phone"),
        Column::text("country", "Country"),
        Column::text("document", "Document"),
        Column::new("created_at", "Registered", ColumnKind::Date),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("first_name", "First Name"),
        ExportColumn::new("last_name", "Last Name"),
        ExportColumn::new("email", "Email"),
        ExportColumn::new("phone", "Phone"),
        ExportColumn::new("country", "Country"),
        ExportColumn::new("birth_date", "Birth Date"),
        ExportColumn::new("document", "Document"),
        ExportColumn::new("created_at", "Registered"),
    ];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec::new("country", "Country", FilterOptions::Distinct)];
    const SEARCH_HINT: &'static str = "Search by name or email...";
}

impl Page for Destination {
    const TITLE: &'static str = "Destinations";
    const COLLECTION: Dataset = Dataset::Destinations;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::Categories];
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("name", "Destination"),
        Column::text("location", "Location"),
        Column::text("category", "Category"),
        Column::new("base_price", "Base Price", ColumnKind::Currency),
        Column::new("active", "Status", ColumnKind::Badge),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("name", "Name"),
        ExportColumn::new("description", "Description"),
        ExportColumn::new("country", "Country"),
        ExportColumn::new("city", "City"),
        ExportColumn::new("category", "Category"),
        ExportColumn::new("base_price", "Base Price"),
        ExportColumn::new("active", "Active"),
    ];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec::new("category", "Category", FilterOptions::Distinct)];
    const SEARCH_HINT: &'static str = "Search by name, country or city...";
}

impl Page for Package {
    const TITLE: &'static str = "Packages";
    const COLLECTION: Dataset = Dataset::Packages;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::PackageTypes, Dataset::Destinations, Dataset::Categories];
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("name", "Package"),
        Column::text("destination", "Destination"),
        Column::text("package_type", "Type"),
        Column::new("price", "Price", ColumnKind::Currency),
        Column::new("duration_days", "Days", ColumnKind::Number),
        Column::new("reservations_count", "Reservations", ColumnKind::Number),
        Column::new("rating", "Rating", ColumnKind::Rating),
        Column::new("active", "Status", ColumnKind::Badge),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("name", "Name"),
        ExportColumn::new("package_type", "Type"),
        ExportColumn::new("destination", "Destination"),
        ExportColumn::new("price", "Price"),
        ExportColumn::new("duration_days", "Duration (days)"),
        ExportColumn::new("max_people", "Max People"),
        ExportColumn::new("rating", "Rating"),
        ExportColumn::new("reservations_count", "Reservations"),
        ExportColumn::new("active", "Active"),
    ];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::new("package_type", "Type", FilterOptions::Distinct),
        FilterSpec::new("active", "Status", FilterOptions::Fixed(ACTIVE_OPTIONS)),
    ];
    const SEARCH_HINT: &'static str = "Search by name, destination or type...";
}

impl Page for Reservation {
    const TITLE: &'static str = "Reservations";
    const COLLECTION: Dataset = Dataset::Reservations;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::Tourists, Dataset::Packages];
    const COLUMNS: &'static [Column] = &[
        Column::text("code", "Code"),
        Column::text("tourist", "Tourist"),
        Column::text("package", "Package"),
        Column::new("start_date", "Start", ColumnKind::Date),
        Column::new("end_date", "End", ColumnKind::Date),
        Column::new("people", "People", ColumnKind::Number),
        Column::new("total_price", "Total", ColumnKind::Currency),
        Column::new("status", "Status", ColumnKind::Badge),
        Column::actions(RowAction::ALL),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("code", "Code"),
        ExportColumn::new("tourist", "Tourist"),
        ExportColumn::new("tourist_email", "Email"),
        ExportColumn::new("package", "Package"),
        ExportColumn::new("start_date", "Start Date"),
        ExportColumn::new("end_date", "End Date"),
        ExportColumn::new("people", "People"),
        ExportColumn::new("total_price", "Total"),
        ExportColumn::new("status", "Status"),
        ExportColumn::new("payment_method", "Payment Method"),
        ExportColumn::new("created_at", "Created"),
    ];
    const FILTERS: &'static [FilterSpec] =
        &[FilterSpec::new("status", "Status", FilterOptions::Statuses(ReservationStatus::labels))];
    const SEARCH_HINT: &'static str = "Search by code, tourist or package...";
}

impl Page for Payment {
    const TITLE: &'static str = "Payments";
    const COLLECTION: Dataset = Dataset::Payments;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::Reservations, Dataset::Tourists];
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("reservation_code", "Reservation"),
        Column::text("tourist", "Tourist"),
        Column::new("amount", "Amount", ColumnKind::Currency),
        Column::text("method", "Method"),
        Column::new("status", "Status", ColumnKind::Badge),
        Column::new("paid_at", "Date", ColumnKind::Date),
        Column::new("net_amount", "Net", ColumnKind::Currency),
        Column::actions(RowAction::VIEW_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("reservation_code", "Reservation Code"),
        ExportColumn::new("tourist", "Tourist"),
        ExportColumn::new("amount", "Amount"),
        ExportColumn::new("method", "Payment Method"),
        ExportColumn::new("status", "Status"),
        ExportColumn::new("paid_at", "Payment Date"),
        ExportColumn::new("external_reference", "Reference"),
        ExportColumn::new("commission", "Commission"),
        ExportColumn::new("net_amount", "Net Amount"),
        ExportColumn::new("currency", "Currency"),
    ];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::new("status", "Status", FilterOptions::Statuses(PaymentStatus::labels)),
        FilterSpec::new("method", "Method", FilterOptions::Distinct),
    ];
    const SEARCH_HINT: &'static str = "Search by reservation, tourist or reference...";
}

impl Page for Provider {
    const TITLE: &'static str = "Providers";
    const COLLECTION: Dataset = Dataset::Providers;
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("name", "Provider"),
        Column::text("service_type", "Service"),
        Column::text("contact_name", "Contact"),
        Column::text("city", "City"),
        Column::new("rating", "Rating", ColumnKind::Rating),
        Column::new("active_services", "Services", ColumnKind::Number),
        Column::new("active", "Status", ColumnKind::Badge),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("name", "Name"),
        ExportColumn::new("service_type", "Service Type"),
        ExportColumn::new("contact_name", "Contact"),
        ExportColumn::new("contact_email", "Email"),
        ExportColumn::new("contact_phone", "Phone"),
        ExportColumn::new("city", "City"),
        ExportColumn::new("country", "Country"),
        ExportColumn::new("rating", "Rating"),
        ExportColumn::new("active_services", "Active Services"),
        ExportColumn::new("active", "Active"),
    ];
    const FILTERS: &'static [FilterSpec] =
        &[FilterSpec::new("service_type", "Service Type", FilterOptions::Distinct)];
    const SEARCH_HINT: &'static str = "Search by name, contact, city or country...";
}

impl Page for Comment {
    const TITLE: &'static str = "Comments";
    const COLLECTION: Dataset = Dataset::Comments;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::Tourists, Dataset::Packages];
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("tourist", "Tourist"),
        Column::text("package", "Package"),
        Column::new("rating", "Rating", ColumnKind::Rating),
        Column::new("title", "Comment", ColumnKind::Truncated(40)),
        Column::new("status", "Status", ColumnKind::Badge),
        Column::new("created_at", "Date", ColumnKind::Date),
        Column::actions(RowAction::VIEW_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("tourist", "Tourist"),
        ExportColumn::new("tourist_email", "Email"),
        ExportColumn::new("package", "Package"),
        ExportColumn::new("rating", "Rating"),
        ExportColumn::new("title", "Title"),
        ExportColumn::new("body", "Comment"),
        ExportColumn::new("status", "Status"),
        ExportColumn::new("trip_date", "Trip Date"),
        ExportColumn::new("created_at", "Comment Date"),
    ];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::new("status", "Status", FilterOptions::Statuses(CommentStatus::labels)),
        FilterSpec::new("rating", "Rating", FilterOptions::Fixed(RATING_OPTIONS)),
    ];
    const SEARCH_HINT: &'static str = "Search by tourist, package or text...";
}

impl Page for Role {
    const TITLE: &'static str = "Roles & Permissions";
    const COLLECTION: Dataset = Dataset::Roles;
    const DEPENDS_ON: &'static [Dataset] = &[Dataset::Permissions];
    const COLUMNS: &'static [Column] = &[
        Column::text("id", "ID"),
        Column::text("name", "Role"),
        Column::new("description", "Description", ColumnKind::Truncated(50)),
        Column::new("users_count", "Users", ColumnKind::Number),
        Column::new("permission_count", "Permissions", ColumnKind::Number),
        Column::new("active", "Status", ColumnKind::Badge),
        Column::actions(RowAction::EDIT_DELETE),
    ];
    const EXPORT: &'static [ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("name", "Name"),
        ExportColumn::new("description", "Description"),
        ExportColumn::new("users_count", "Users"),
        ExportColumn::new("permission_count", "Permissions"),
        ExportColumn::new("active", "Active"),
        ExportColumn::new("created_at", "Created"),
    ];
    const SEARCH_HINT: &'static str = "Search by name or description...";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{self, SearchFilter};
    use crate::models::{RecordId, Value};
    use crate::store::Store;
    use crate::table::render;

    fn keys_resolve<T: Page>(store: &Store) {
        let record = &store.all::<T>()[0];
        for column in T::COLUMNS.iter().filter(|c| !matches!(c.kind, ColumnKind::Actions(_))) {
            assert!(!record.field(column.key, store).is_empty(), "{}: {}", T::TITLE, column.key);
        }
        for column in T::EXPORT {
            assert!(!record.field(column.key, store).is_empty(), "{}: {}", T::TITLE, column.key);
        }
    }

    #[test]
    fn test_every_page_column_resolves_on_seed() {
        let store = Store::seeded();
        keys_resolve::<User>(&store);
        keys_resolve::<Tourist>(&store);
        keys_resolve::<Destination>(&store);
        keys_resolve::<Package>(&store);
        keys_resolve::<Reservation>(&store);
        keys_resolve::<Payment>(&store);
        keys_resolve::<Provider>(&store);
        keys_resolve::<Comment>(&store);
        keys_resolve::<Role>(&store);
    }

    fn id_renders_ungrouped<T: Page>() {
        let column = T::COLUMNS.iter().find(|c| c.key == "id").unwrap();
        let cell = render(&Value::from(RecordId(1234)), column.kind);
        assert_eq!(cell.text(), "1234", "{}", T::TITLE);
    }

    #[test]
    fn test_id_columns_have_no_digit_grouping() {
        id_renders_ungrouped::<User>();
        id_renders_ungrouped::<Tourist>();
        id_renders_ungrouped::<Destination>();
        id_renders_ungrouped::<Package>();
        id_renders_ungrouped::<Payment>();
        id_renders_ungrouped::<Provider>();
        id_renders_ungrouped::<Comment>();
        id_renders_ungrouped::<Role>();
    }

    #[test]
    fn test_distinct_choices_are_sorted_and_unique() {
        let store = Store::seeded();
        let spec = Tourist::FILTERS[0];
        let values: Vec<String> = spec.choices(&store.tourists, &store).into_iter().map(|(v, _)| v).collect();
        assert_eq!(values, vec!["Colombia", "España", "México", "USA"]);
    }

    #[test]
    fn test_fixed_choices_filter_records() {
        let store = Store::seeded();
        let rating = Comment::FILTERS[1];
        let (five, _) = rating.choices(&store.comments, &store).remove(0);

        let filter = SearchFilter::default().with(rating.key, five);
        let matched = filter::apply(&store.comments, &filter, &store);
        assert_eq!(matched.iter().map(|c| c.id.0).collect::<Vec<_>>(), vec![1, 5]);
    }

    #[test]
    fn test_active_filter_matches_bool_text() {
        let mut store = Store::seeded();
        store.providers[0].active = false;
        let filter = SearchFilter::default().with("active", "false");
        let matched = filter::apply(&store.providers, &filter, &store);
        assert_eq!(matched.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_status_choices_use_labels() {
        let store = Store::seeded();
        let labels: Vec<String> = Payment::FILTERS[0]
            .choices(&store.payments, &store)
            .into_iter()
            .map(|(_, l)| l)
            .collect();
        assert_eq!(labels, vec!["Pending", "Completed", "Failed", "Refunded"]);
    }
}
