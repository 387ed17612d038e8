//! Data models for every record the dashboard manages.

pub mod comment;
pub mod dashboard;
pub mod destination;
pub mod package;
pub mod payment;
pub mod provider;
pub mod reservation;
pub mod role;
pub mod settings;
pub mod tourist;
pub mod user;
pub mod value;

pub use comment::{Comment, CommentStatus};
pub use dashboard::{ChartData, ChartPoint, DashboardStats};
pub use destination::{Destination, DestinationCategory};
pub use package::{Package, PackageType};
pub use payment::{Payment, PaymentStatus};
pub use provider::Provider;
pub use reservation::{Reservation, ReservationStatus};
pub use role::{Permission, Role};
pub use settings::{EmailSettings, GeneralSettings, PaymentSettings, SiteSettings};
pub use tourist::Tourist;
pub use user::{User, UserStatus};
pub use value::{RecordId, Value};

/// A row of domain data addressable by field key.
pub trait Record {
    /// Dataset name, used for export file names.
    const DATASET: &'static str;
    /// REST resource path segment.
    const RESOURCE: &'static str;
    /// Field keys searched by the free-text query.
    const SEARCH_FIELDS: &'static [&'static str];

    fn id(&self) -> RecordId;

    /// Read a field by key. Joined fields resolve through `lookup`;
    /// unknown keys and dangling references yield `Value::Empty`.
    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value;

    /// Short label used in confirmation dialogs and logs.
    fn label(&self) -> String;
}

/// Read-only access to live records by id, used for display joins.
pub trait Lookup {
    fn tourist(&self, id: RecordId) -> Option<&Tourist>;
    fn package(&self, id: RecordId) -> Option<&Package>;
    fn destination(&self, id: RecordId) -> Option<&Destination>;
    fn category(&self, id: RecordId) -> Option<&DestinationCategory>;
    fn package_type(&self, id: RecordId) -> Option<&PackageType>;
    fn reservation(&self, id: RecordId) -> Option<&Reservation>;
}

/// Lookup that resolves nothing.
pub struct NoLookup;

impl Lookup for NoLookup {
    fn tourist(&self, _id: RecordId) -> Option<&Tourist> {
        None
    }
    fn package(&self, _id: RecordId) -> Option<&Package> {
        None
    }
    fn destination(&self, _id: RecordId) -> Option<&Destination> {
        None
    }
    fn category(&self, _id: RecordId) -> Option<&DestinationCategory> {
        None
    }
    fn package_type(&self, _id: RecordId) -> Option<&PackageType> {
        None
    }
    fn reservation(&self, _id: RecordId) -> Option<&Reservation> {
        None
    }
}

/// Closed set of status labels carried by a record.
pub trait StatusLabel: Copy + Eq + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.label()).collect()
    }
}
