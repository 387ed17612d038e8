//! In-memory record collections with identifier sequences and display joins.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentStatus, Destination, DestinationCategory, Lookup, Package, PackageType, Payment, PaymentStatus,
    Permission, Provider, Record, RecordId, Reservation, ReservationStatus, Role, SiteSettings, Tourist, User,
};
use crate::seed;

/// Monotonic identifier source for one collection.
///
/// Never hands out an id at or below anything it has already seen, so ids
/// freed by a delete are not reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    /// Make sure the next id is greater than `id`.
    pub fn observe(&mut self, id: RecordId) {
        self.next = self.next.max(id.0 + 1);
    }

    pub fn next_id(&mut self) -> RecordId {
        let id = RecordId(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> RecordId {
        RecordId(self.next)
    }
}

/// Every collection the dashboard loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Users,
    Tourists,
    Destinations,
    Categories,
    Packages,
    PackageTypes,
    Reservations,
    Payments,
    Providers,
    Comments,
    Roles,
    Permissions,
}

impl Dataset {
    pub const ALL: [Dataset; 12] = [
        Self::Users,
        Self::Tourists,
        Self::Destinations,
        Self::Categories,
        Self::Packages,
        Self::PackageTypes,
        Self::Reservations,
        Self::Payments,
        Self::Providers,
        Self::Comments,
        Self::Roles,
        Self::Permissions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tourists => "tourists",
            Self::Destinations => "destinations",
            Self::Categories => "categories",
            Self::Packages => "packages",
            Self::PackageTypes => "package_types",
            Self::Reservations => "reservations",
            Self::Payments => "payments",
            Self::Providers => "providers",
            Self::Comments => "comments",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
        }
    }
}

/// A freshly loaded collection, ready to replace the stored one.
#[derive(Debug, Clone)]
pub enum Batch {
    Users(Vec<User>),
    Tourists(Vec<Tourist>),
    Destinations(Vec<Destination>),
    Categories(Vec<DestinationCategory>),
    Packages(Vec<Package>),
    PackageTypes(Vec<PackageType>),
    Reservations(Vec<Reservation>),
    Payments(Vec<Payment>),
    Providers(Vec<Provider>),
    Comments(Vec<Comment>),
    Roles(Vec<Role>),
    Permissions(Vec<Permission>),
}

impl Batch {
    pub fn dataset(&self) -> Dataset {
        match self {
            Self::Users(_) => Dataset::Users,
            Self::Tourists(_) => Dataset::Tourists,
            Self::Destinations(_) => Dataset::Destinations,
            Self::Categories(_) => Dataset::Categories,
            Self::Packages(_) => Dataset::Packages,
            Self::PackageTypes(_) => Dataset::PackageTypes,
            Self::Reservations(_) => Dataset::Reservations,
            Self::Payments(_) => Dataset::Payments,
            Self::Providers(_) => Dataset::Providers,
            Self::Comments(_) => Dataset::Comments,
            Self::Roles(_) => Dataset::Roles,
            Self::Permissions(_) => Dataset::Permissions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Users(v) => v.len(),
            Self::Tourists(v) => v.len(),
            Self::Destinations(v) => v.len(),
            Self::Categories(v) => v.len(),
            Self::Packages(v) => v.len(),
            Self::PackageTypes(v) => v.len(),
            Self::Reservations(v) => v.len(),
            Self::Payments(v) => v.len(),
            Self::Providers(v) => v.len(),
            Self::Comments(v) => v.len(),
            Self::Roles(v) => v.len(),
            Self::Permissions(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The built-in sample records for a dataset.
    pub fn seeded(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Users => Self::Users(seed::users()),
            Dataset::Tourists => Self::Tourists(seed::tourists()),
            Dataset::Destinations => Self::Destinations(seed::destinations()),
            Dataset::Categories => Self::Categories(seed::categories()),
            Dataset::Packages => Self::Packages(seed::packages()),
            Dataset::PackageTypes => Self::PackageTypes(seed::package_types()),
            Dataset::Reservations => Self::Reservations(seed::reservations()),
            Dataset::Payments => Self::Payments(seed::payments()),
            Dataset::Providers => Self::Providers(seed::providers()),
            Dataset::Comments => Self::Comments(seed::comments()),
            Dataset::Roles => Self::Roles(seed::roles()),
            Dataset::Permissions => Self::Permissions(seed::permissions()),
        }
    }
}

/// All live records.
#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<User>,
    pub tourists: Vec<Tourist>,
    pub destinations: Vec<Destination>,
    pub categories: Vec<DestinationCategory>,
    pub packages: Vec<Package>,
    pub package_types: Vec<PackageType>,
    pub reservations: Vec<Reservation>,
    pub payments: Vec<Payment>,
    pub providers: Vec<Provider>,
    pub comments: Vec<Comment>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub settings: SiteSettings,
    sequences: HashMap<&'static str, IdSequence>,
}

/// Records kept in a `Store` collection.
pub trait Stored: Record + Sized {
    fn records(store: &Store) -> &[Self];
    fn records_mut(store: &mut Store) -> &mut Vec<Self>;
    fn batch(records: Vec<Self>) -> Batch;
}

macro_rules! stored {
    ($($ty:ty => $field:ident, $variant:ident),* $(,)?) => {
        $(
            impl Stored for $ty {
                fn records(store: &Store) -> &[Self] {
                    &store.$field
                }
                fn records_mut(store: &mut Store) -> &mut Vec<Self> {
                    &mut store.$field
                }
                fn batch(records: Vec<Self>) -> Batch {
                    Batch::$variant(records)
                }
            }
        )*
    };
}

stored! {
    User => users, Users,
    Tourist => tourists, Tourists,
    Destination => destinations, Destinations,
    Package => packages, Packages,
    Reservation => reservations, Reservations,
    Payment => payments, Payments,
    Provider => providers, Providers,
    Comment => comments, Comments,
    Role => roles, Roles,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every dataset populated from the sample records.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        for dataset in Dataset::ALL {
            store.apply(Batch::seeded(dataset));
        }
        store
    }

    /// Replace a collection with freshly loaded records.
    pub fn apply(&mut self, batch: Batch) {
        debug!("Applying {} {} records", batch.len(), batch.dataset().name());
        match batch {
            Batch::Users(v) => self.replace(v),
            Batch::Tourists(v) => self.replace(v),
            Batch::Destinations(v) => self.replace(v),
            Batch::Categories(v) => self.categories = v,
            Batch::Packages(v) => self.replace(v),
            Batch::PackageTypes(v) => self.package_types = v,
            Batch::Reservations(v) => self.replace(v),
            Batch::Payments(v) => self.replace(v),
            Batch::Providers(v) => self.replace(v),
            Batch::Comments(v) => self.replace(v),
            Batch::Roles(v) => self.replace(v),
            Batch::Permissions(v) => self.permissions = v,
        }
    }

    /// Insert or replace each record of a batch by id, keeping the rest.
    pub fn merge(&mut self, batch: Batch) {
        match batch {
            Batch::Users(v) => self.upsert_all(v),
            Batch::Tourists(v) => self.upsert_all(v),
            Batch::Destinations(v) => self.upsert_all(v),
            Batch::Packages(v) => self.upsert_all(v),
            Batch::Reservations(v) => self.upsert_all(v),
            Batch::Payments(v) => self.upsert_all(v),
            Batch::Providers(v) => self.upsert_all(v),
            Batch::Comments(v) => self.upsert_all(v),
            Batch::Roles(v) => self.upsert_all(v),
            other => self.apply(other),
        }
    }

    fn upsert_all<T: Stored>(&mut self, records: Vec<T>) {
        for record in records {
            self.upsert(record);
        }
    }

    pub fn replace<T: Stored>(&mut self, records: Vec<T>) {
        let sequence = self.sequences.entry(T::DATASET).or_default();
        for record in &records {
            sequence.observe(record.id());
        }
        *T::records_mut(self) = records;
    }

    pub fn all<T: Stored>(&self) -> &[T] {
        T::records(self)
    }

    pub fn get<T: Stored>(&self, id: RecordId) -> Option<&T> {
        T::records(self).iter().find(|r| r.id() == id)
    }

    pub fn get_mut<T: Stored>(&mut self, id: RecordId) -> Option<&mut T> {
        T::records_mut(self).iter_mut().find(|r| r.id() == id)
    }

    /// Reserve the next identifier for a collection.
    pub fn next_id<T: Stored>(&mut self) -> RecordId {
        self.sequences.entry(T::DATASET).or_default().next_id()
    }

    /// The identifier `next_id` would return, without reserving it.
    pub fn peek_id<T: Stored>(&self) -> RecordId {
        self.sequences.get(T::DATASET).copied().unwrap_or_default().peek()
    }

    /// Append a record. Its id is recorded so the sequence never issues it again.
    pub fn insert<T: Stored>(&mut self, record: T) {
        self.sequences.entry(T::DATASET).or_default().observe(record.id());
        T::records_mut(self).push(record);
    }

    /// Replace the record with the same id. Returns false when it is gone.
    pub fn upsert<T: Stored>(&mut self, record: T) -> bool {
        match self.get_mut::<T>(record.id()) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.insert(record);
                false
            }
        }
    }

    /// Delete a record by id. Returns false if nothing matched.
    pub fn delete<T: Stored>(&mut self, id: RecordId) -> bool {
        let records = T::records_mut(self);
        let before = records.len();
        records.retain(|r| r.id() != id);
        records.len() != before
    }

    /// Delete by dataset name. Lookup collections are never deleted from.
    pub fn delete_in(&mut self, dataset: Dataset, id: RecordId) -> bool {
        match dataset {
            Dataset::Users => self.delete::<User>(id),
            Dataset::Tourists => self.delete::<Tourist>(id),
            Dataset::Destinations => self.delete::<Destination>(id),
            Dataset::Packages => self.delete::<Package>(id),
            Dataset::Reservations => self.delete::<Reservation>(id),
            Dataset::Payments => self.delete::<Payment>(id),
            Dataset::Providers => self.delete::<Provider>(id),
            Dataset::Comments => self.delete::<Comment>(id),
            Dataset::Roles => self.delete::<Role>(id),
            Dataset::Categories | Dataset::PackageTypes | Dataset::Permissions => false,
        }
    }

    pub fn set_reservation_status(&mut self, id: RecordId, status: ReservationStatus) -> Result<()> {
        let reservation = self
            .get_mut::<Reservation>(id)
            .ok_or_else(|| AppError::not_found(format!("reservation {id}")))?;
        reservation.status = status;
        Ok(())
    }

    pub fn set_payment_status(&mut self, id: RecordId, status: PaymentStatus) -> Result<()> {
        let payment = self
            .get_mut::<Payment>(id)
            .ok_or_else(|| AppError::not_found(format!("payment {id}")))?;
        payment.status = status;
        Ok(())
    }

    pub fn set_comment_status(&mut self, id: RecordId, status: CommentStatus) -> Result<()> {
        let comment = self
            .get_mut::<Comment>(id)
            .ok_or_else(|| AppError::not_found(format!("comment {id}")))?;
        comment.status = status;
        Ok(())
    }

    pub fn reply_to_comment(&mut self, id: RecordId, reply: &str) -> Result<()> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AppError::validation("Reply cannot be empty"));
        }
        let comment = self
            .get_mut::<Comment>(id)
            .ok_or_else(|| AppError::not_found(format!("comment {id}")))?;
        comment.admin_reply = reply.to_string();
        Ok(())
    }

    /// Permissions granted to a role, in catalog order. Unknown ids are skipped.
    pub fn role_permissions(&self, role: &Role) -> Vec<&Permission> {
        self.permissions
            .iter()
            .filter(|p| role.permissions.contains(&p.id))
            .collect()
    }
}

impl Lookup for Store {
    fn tourist(&self, id: RecordId) -> Option<&Tourist> {
        self.get(id)
    }

    fn package(&self, id: RecordId) -> Option<&Package> {
        self.get(id)
    }

    fn destination(&self, id: RecordId) -> Option<&Destination> {
        self.get(id)
    }

    fn category(&self, id: RecordId) -> Option<&DestinationCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn package_type(&self, id: RecordId) -> Option<&PackageType> {
        self.package_types.iter().find(|t| t.id == id)
    }

    fn reservation(&self, id: RecordId) -> Option<&Reservation> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    #[test]
    fn test_ids_start_after_seeded_max() {
        let mut store = Store::seeded();
        assert_eq!(store.next_id::<User>(), RecordId(4));
        assert_eq!(store.next_id::<User>(), RecordId(5));
        assert_eq!(store.next_id::<Comment>(), RecordId(6));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = Store::seeded();
        assert!(store.delete::<User>(RecordId(3)));
        assert_eq!(store.next_id::<User>(), RecordId(4));

        let mut user = store.users[0].clone();
        user.id = RecordId(4);
        store.insert(user);
        assert!(store.delete::<User>(RecordId(4)));
        assert_eq!(store.next_id::<User>(), RecordId(5));
    }

    #[test]
    fn test_reload_never_moves_sequence_backwards() {
        let mut store = Store::seeded();
        store.next_id::<Role>();
        store.next_id::<Role>();
        store.apply(Batch::Roles(seed::roles()));
        assert_eq!(store.next_id::<Role>(), RecordId(5));
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let mut store = Store::seeded();
        assert!(!store.delete::<Provider>(RecordId(99)));
        assert_eq!(store.providers.len(), 4);
    }

    #[test]
    fn test_joins_resolve_through_store() {
        let store = Store::seeded();
        let reservation = &store.reservations[0];
        assert_eq!(reservation.field("tourist", &store), Value::text("Ana Martínez"));
        assert_eq!(reservation.field("package", &store), Value::text("Cancún Paradise"));

        let payment = &store.payments[2];
        assert_eq!(payment.field("reservation_code", &store), Value::text("RES-2024-003"));
        assert_eq!(payment.field("tourist", &store), Value::text("María García"));
    }

    #[test]
    fn test_dangling_reference_is_empty() {
        let mut store = Store::seeded();
        store.delete::<Tourist>(RecordId(1));
        let reservation = &store.reservations[0];
        assert!(reservation.field("tourist", &store).is_empty());
    }

    #[test]
    fn test_status_updates() {
        let mut store = Store::seeded();
        store.set_reservation_status(RecordId(2), ReservationStatus::Confirmed).unwrap();
        assert_eq!(store.get::<Reservation>(RecordId(2)).unwrap().status, ReservationStatus::Confirmed);

        store.set_comment_status(RecordId(3), CommentStatus::Approved).unwrap();
        assert_eq!(store.get::<Comment>(RecordId(3)).unwrap().status, CommentStatus::Approved);

        let err = store.set_payment_status(RecordId(42), PaymentStatus::Refunded).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_reply_to_comment() {
        let mut store = Store::seeded();
        store.reply_to_comment(RecordId(2), "  Thanks!  ").unwrap();
        assert_eq!(store.get::<Comment>(RecordId(2)).unwrap().admin_reply, "Thanks!");
        assert!(store.reply_to_comment(RecordId(2), "   ").is_err());
    }

    #[test]
    fn test_role_permissions_in_catalog_order() {
        let store = Store::seeded();
        let mut role = store.roles[1].clone();
        role.permissions = vec![RecordId(7), RecordId(1), RecordId(99)];
        let names: Vec<_> = store.role_permissions(&role).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["users.view", "reservations.view"]);
    }

    #[test]
    fn test_merge_upserts_and_keeps_others() {
        let mut store = Store::seeded();
        let mut edited = store.providers[1].clone();
        edited.name = "Inca Trails".to_string();
        let mut added = store.providers[0].clone();
        added.id = RecordId(20);

        store.merge(Provider::batch(vec![edited, added]));
        assert_eq!(store.providers.len(), 5);
        assert_eq!(store.providers[1].name, "Inca Trails");
        assert_eq!(store.providers[0].name, "Hotel Paradise Resort");
        assert_eq!(store.next_id::<Provider>(), RecordId(21));
    }

    #[test]
    fn test_delete_leaves_remaining_records_in_order() {
        let mut store = Store::seeded();
        store.comments.truncate(2);
        store.comments[0].status = CommentStatus::Pending;
        store.comments[1].status = CommentStatus::Approved;

        assert!(store.delete::<Comment>(RecordId(2)));
        let ids: Vec<RecordId> = store.comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![RecordId(1)]);
        assert_eq!(store.comments[0].status, CommentStatus::Pending);
    }

    #[test]
    fn test_delete_in_by_dataset() {
        let mut store = Store::seeded();
        assert!(store.delete_in(Dataset::Comments, RecordId(2)));
        assert!(!store.delete_in(Dataset::Comments, RecordId(2)));
        assert!(!store.delete_in(Dataset::Categories, RecordId(1)));
        assert_eq!(store.comments.len(), 4);
        assert_eq!(store.categories.len(), 4);
    }
}
