//! Declarative form schemas and the create/edit modal controller.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use chrono::NaiveDate;
use tracing::{debug, info};
use validator::{ValidateEmail, ValidateUrl};

use crate::error::{AppError, Result};
use crate::models::payment::PAYMENT_METHODS;
use crate::models::provider::SERVICE_TYPES;
use crate::models::user::USER_ROLES;
use crate::models::{
    Destination, Lookup, Package, Provider, RecordId, Reservation, ReservationStatus, Role, SiteSettings, StatusLabel,
    Tourist, User, UserStatus,
};
use crate::store::{Store, Stored};

/// Where a select field gets its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    Static(&'static [&'static str]),
    UserStatuses,
    Tourists,
    Packages,
    Destinations,
    Categories,
    PackageTypes,
}

impl ChoiceSource {
    /// `(value, label)` pairs offered by the select control.
    pub fn options(self, store: &Store) -> Vec<(String, String)> {
        fn by_id<'a>(items: impl Iterator<Item = (RecordId, &'a str)>) -> Vec<(String, String)> {
            items.map(|(id, name)| (id.to_string(), name.to_string())).collect()
        }
        match self {
            Self::Static(values) => values.iter().map(|v| (v.to_string(), v.to_string())).collect(),
            Self::UserStatuses => UserStatus::labels().iter().map(|v| (v.to_string(), v.to_string())).collect(),
            Self::Tourists => store
                .tourists
                .iter()
                .map(|t| (t.id.to_string(), t.full_name()))
                .collect(),
            Self::Packages => by_id(store.packages.iter().map(|p| (p.id, p.name.as_str()))),
            Self::Destinations => by_id(store.destinations.iter().map(|d| (d.id, d.name.as_str()))),
            Self::Categories => by_id(store.categories.iter().map(|c| (c.id, c.name.as_str()))),
            Self::PackageTypes => by_id(store.package_types.iter().map(|t| (t.id, t.name.as_str()))),
        }
    }

    fn accepts(self, value: &str, lookup: &dyn Lookup) -> bool {
        let id = || value.parse::<u64>().ok().map(RecordId);
        match self {
            Self::Static(values) => values.contains(&value),
            Self::UserStatuses => UserStatus::from_label(value).is_some(),
            Self::Tourists => id().is_some_and(|id| lookup.tourist(id).is_some()),
            Self::Packages => id().is_some_and(|id| lookup.package(id).is_some()),
            Self::Destinations => id().is_some_and(|id| lookup.destination(id).is_some()),
            Self::Categories => id().is_some_and(|id| lookup.category(id).is_some()),
            Self::PackageTypes => id().is_some_and(|id| lookup.package_type(id).is_some()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Multiline,
    Password,
    Email,
    Url,
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64>, max: Option<i64> },
    Date,
    Choice(ChoiceSource),
    Bool,
}

/// One field of a form schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: &'static str,
}

impl FieldRule {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            default: "",
        }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }

    fn check(&self, raw: &str, lookup: &dyn Lookup) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return self.required.then(|| format!("{} is required", self.label));
        }
        let label = self.label;
        match self.kind {
            FieldKind::Text | FieldKind::Multiline | FieldKind::Password => None,
            FieldKind::Email => (!value.validate_email()).then(|| format!("{label} must be a valid email")),
            FieldKind::Url => (!value.validate_url()).then(|| format!("{label} must be a valid URL")),
            FieldKind::Number { min, max } => match value.parse::<f64>() {
                Ok(n) if !n.is_finite() => Some(format!("{label} must be a number")),
                Ok(n) => bounds_message(label, n, min, max),
                Err(_) => Some(format!("{label} must be a number")),
            },
            FieldKind::Integer { min, max } => match value.parse::<i64>() {
                Ok(n) => bounds_message(label, n as f64, min.map(|m| m as f64), max.map(|m| m as f64)),
                Err(_) => Some(format!("{label} must be a whole number")),
            },
            FieldKind::Date => {
                parse_flexible_date(value).is_none().then(|| format!("{label} must be a date (YYYY-MM-DD)"))
            }
            FieldKind::Choice(source) => {
                (!source.accepts(value, lookup)).then(|| format!("{label} must be one of the listed options"))
            }
            FieldKind::Bool => {
                (!matches!(value, "true" | "false")).then(|| format!("{label} must be true or false"))
            }
        }
    }
}

fn bounds_message(label: &str, n: f64, min: Option<f64>, max: Option<f64>) -> Option<String> {
    if let Some(min) = min.filter(|m| n < *m) {
        return Some(format!("{label} must be at least {min}"));
    }
    if let Some(max) = max.filter(|m| n > *m) {
        return Some(format!("{label} must be at most {max}"));
    }
    None
}

/// Parse a date from flexible input formats.
///
/// Accepts year, month, day separated by `-`, `/`, `.` or spaces.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input
        .trim()
        .split(['-', '/', ' ', '.'])
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 3 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Validation messages keyed by field.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Validate every field of `schema` against `data`.
pub fn validate(schema: &[FieldRule], data: &FormData, lookup: &dyn Lookup) -> FieldErrors {
    schema
        .iter()
        .filter_map(|rule| rule.check(data.get(rule.key), lookup).map(|msg| (rule.key, msg)))
        .collect()
}

/// Raw text inputs of an open form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(BTreeMap<&'static str, String>);

impl FormData {
    /// Form populated with each field's default.
    pub fn defaults(schema: &[FieldRule]) -> Self {
        Self(schema.iter().map(|r| (r.key, r.default.to_string())).collect())
    }

    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn get_mut(&mut self, key: &'static str) -> &mut String {
        self.0.entry(key).or_default()
    }

    pub fn set(&mut self, key: &'static str, value: impl ToString) {
        self.0.insert(key, value.to_string());
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).trim().to_string()
    }

    pub fn number(&self, key: &str) -> Result<f64> {
        self.get(key)
            .trim()
            .parse()
            .map_err(|_| AppError::parse(format!("{key}: not a number")))
    }

    pub fn count(&self, key: &str) -> Result<u32> {
        self.get(key)
            .trim()
            .parse()
            .map_err(|_| AppError::parse(format!("{key}: not a whole number")))
    }

    pub fn date(&self, key: &str) -> Result<NaiveDate> {
        parse_flexible_date(self.get(key)).ok_or_else(|| AppError::parse(format!("{key}: not a date")))
    }

    pub fn id(&self, key: &str) -> Result<RecordId> {
        self.get(key)
            .trim()
            .parse()
            .map(RecordId)
            .map_err(|_| AppError::parse(format!("{key}: not a record id")))
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).trim() == "true"
    }
}

/// A record editable through a modal form.
pub trait FormEntity: Stored + Clone {
    /// Singular name used in dialog titles.
    const NOUN: &'static str;
    const SCHEMA: &'static [FieldRule];

    fn to_form(&self) -> FormData;

    /// Build a new record from validated input, filling server-side defaults.
    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self>;

    /// Merge validated input into the record. Fields outside the schema are left alone.
    fn apply(&mut self, form: &FormData) -> Result<()>;

    /// Checks spanning several fields.
    fn cross_check(_form: &FormData, _errors: &mut FieldErrors) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Creating,
    Editing(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Created(RecordId),
    Updated(RecordId),
}

/// Create/edit state for one entity type.
#[derive(Debug, Clone)]
pub struct FormController<T> {
    mode: FormMode,
    pub data: FormData,
    pub errors: FieldErrors,
    _entity: PhantomData<T>,
}

impl<T> Default for FormController<T> {
    fn default() -> Self {
        Self {
            mode: FormMode::Closed,
            data: FormData::default(),
            errors: FieldErrors::new(),
            _entity: PhantomData,
        }
    }
}

impl<T: FormEntity> FormController<T> {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Editing(_) => format!("Edit {}", T::NOUN),
            _ => format!("New {}", T::NOUN),
        }
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Creating;
        self.data = FormData::defaults(T::SCHEMA);
        self.errors.clear();
    }

    pub fn open_edit(&mut self, record: &T) {
        self.mode = FormMode::Editing(record.id());
        self.data = record.to_form();
        self.errors.clear();
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Validate the current input, keeping messages for display.
    pub fn validate(&mut self, lookup: &dyn Lookup) -> bool {
        let mut errors = validate(T::SCHEMA, &self.data, lookup);
        if errors.is_empty() {
            T::cross_check(&self.data, &mut errors);
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate and build the record the submission would produce, without
    /// touching the store. New records carry the id the store would issue next.
    pub fn draft(&mut self, store: &Store, today: NaiveDate) -> Result<T> {
        if !self.validate(store) {
            debug!("{} form has {} invalid fields", T::NOUN, self.errors.len());
            return Err(AppError::validation(format!("{} invalid field(s)", self.errors.len())));
        }
        match self.mode {
            FormMode::Closed => Err(AppError::validation("No form is open")),
            FormMode::Creating => T::create(store.peek_id::<T>(), &self.data, today),
            FormMode::Editing(id) => {
                let mut record = store
                    .get::<T>(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found(format!("{} {id}", T::NOUN)))?;
                record.apply(&self.data)?;
                Ok(record)
            }
        }
    }

    /// Store a record produced by [`FormController::draft`] (or returned by the
    /// server for it) and close the form.
    pub fn commit(&mut self, store: &mut Store, record: T) -> Submission {
        let id = record.id();
        let submission = match self.mode {
            FormMode::Editing(_) => {
                store.upsert(record);
                Submission::Updated(id)
            }
            _ => {
                store.insert(record);
                Submission::Created(id)
            }
        };
        info!("{} {id} saved", T::NOUN);
        self.cancel();
        submission
    }

    /// Validate, then create or update the record in the store.
    ///
    /// On validation failure the form stays open with `errors` populated.
    pub fn submit(&mut self, store: &mut Store, today: NaiveDate) -> Result<Submission> {
        let record = self.draft(store, today)?;
        Ok(self.commit(store, record))
    }
}

const NON_NEGATIVE: FieldKind = FieldKind::Number { min: Some(0.0), max: None };
/// Counts stored as `u32`.
const AT_LEAST_ONE: FieldKind = FieldKind::Integer {
    min: Some(1),
    max: Some(u32::MAX as i64),
};

impl FormEntity for User {
    const NOUN: &'static str = "User";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("name", "Name").required(),
        FieldRule::new("email", "Email", FieldKind::Email).required(),
        FieldRule::new("role", "Role", FieldKind::Choice(ChoiceSource::Static(USER_ROLES)))
            .required()
            .default_value("User"),
        FieldRule::new("status", "Status", FieldKind::Choice(ChoiceSource::UserStatuses))
            .required()
            .default_value("Active"),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("name", &self.name)
            .with("email", &self.email)
            .with("role", &self.role)
            .with("status", self.status.label())
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        let mut user = Self {
            id,
            name: String::new(),
            email: String::new(),
            role: String::new(),
            status: UserStatus::Active,
            created_at: today,
        };
        user.apply(form)?;
        Ok(user)
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.name = form.text("name");
        self.email = form.text("email");
        self.role = form.text("role");
        self.status = UserStatus::from_label(form.get("status").trim())
            .ok_or_else(|| AppError::parse("status: unknown value"))?;
        Ok(())
    }
}

impl FormEntity for Tourist {
    const NOUN: &'static str = "Tourist";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("first_name", "First name").required(),
        FieldRule::text("last_name", "Last name").required(),
        FieldRule::new("email", "Email", FieldKind::Email).required(),
        FieldRule::text("phone", "Phone").required(),
        FieldRule::text("country", "Country").required(),
        FieldRule::new("birth_date", "Birth date", FieldKind::Date).required(),
        FieldRule::text("document", "Document").required(),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("first_name", &self.first_name)
            .with("last_name", &self.last_name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("country", &self.country)
            .with("birth_date", self.birth_date)
            .with("document", &self.document)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            id,
            first_name: form.text("first_name"),
            last_name: form.text("last_name"),
            email: form.text("email"),
            phone: form.text("phone"),
            country: form.text("country"),
            birth_date: form.date("birth_date")?,
            document: form.text("document"),
            user_id: None,
            created_at: today,
        })
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.first_name = form.text("first_name");
        self.last_name = form.text("last_name");
        self.email = form.text("email");
        self.phone = form.text("phone");
        self.country = form.text("country");
        self.birth_date = form.date("birth_date")?;
        self.document = form.text("document");
        Ok(())
    }
}

impl FormEntity for Destination {
    const NOUN: &'static str = "Destination";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("name", "Name").required(),
        FieldRule::new("description", "Description", FieldKind::Multiline).required(),
        FieldRule::text("country", "Country").required(),
        FieldRule::text("city", "City").required(),
        FieldRule::new("category_id", "Category", FieldKind::Choice(ChoiceSource::Categories)).required(),
        FieldRule::new("base_price", "Base price", NON_NEGATIVE).required(),
        FieldRule::new("image_url", "Image URL", FieldKind::Url).required(),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("name", &self.name)
            .with("description", &self.description)
            .with("country", &self.country)
            .with("city", &self.city)
            .with("category_id", self.category_id)
            .with("base_price", self.base_price)
            .with("image_url", &self.image_url)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        let mut destination = Self {
            id,
            name: String::new(),
            description: String::new(),
            country: String::new(),
            city: String::new(),
            category_id: RecordId::default(),
            base_price: 0.0,
            image_url: String::new(),
            active: true,
            created_at: today,
        };
        destination.apply(form)?;
        Ok(destination)
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.name = form.text("name");
        self.description = form.text("description");
        self.country = form.text("country");
        self.city = form.text("city");
        self.category_id = form.id("category_id")?;
        self.base_price = form.number("base_price")?;
        self.image_url = form.text("image_url");
        Ok(())
    }
}

impl FormEntity for Package {
    const NOUN: &'static str = "Package";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("name", "Name").required(),
        FieldRule::new("description", "Description", FieldKind::Multiline).required(),
        FieldRule::new("package_type_id", "Type", FieldKind::Choice(ChoiceSource::PackageTypes)).required(),
        FieldRule::new("destination_id", "Destination", FieldKind::Choice(ChoiceSource::Destinations)).required(),
        FieldRule::new("price", "Price", NON_NEGATIVE).required(),
        FieldRule::new("duration_days", "Duration (days)", AT_LEAST_ONE).required(),
        FieldRule::new("max_people", "Max people", AT_LEAST_ONE).required(),
        FieldRule::new("includes", "Includes", FieldKind::Multiline).required(),
        FieldRule::new("excludes", "Excludes", FieldKind::Multiline).required(),
        FieldRule::new("image_url", "Image URL", FieldKind::Url).required(),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("name", &self.name)
            .with("description", &self.description)
            .with("package_type_id", self.package_type_id)
            .with("destination_id", self.destination_id)
            .with("price", self.price)
            .with("duration_days", self.duration_days)
            .with("max_people", self.max_people)
            .with("includes", &self.includes)
            .with("excludes", &self.excludes)
            .with("image_url", &self.image_url)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        let mut package = Self {
            id,
            name: String::new(),
            description: String::new(),
            package_type_id: RecordId::default(),
            destination_id: RecordId::default(),
            price: 0.0,
            duration_days: 1,
            max_people: 1,
            includes: String::new(),
            excludes: String::new(),
            image_url: String::new(),
            active: true,
            rating: 0.0,
            reservations_count: 0,
            created_at: today,
        };
        package.apply(form)?;
        Ok(package)
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.name = form.text("name");
        self.description = form.text("description");
        self.package_type_id = form.id("package_type_id")?;
        self.destination_id = form.id("destination_id")?;
        self.price = form.number("price")?;
        self.duration_days = form.count("duration_days")?;
        self.max_people = form.count("max_people")?;
        self.includes = form.text("includes");
        self.excludes = form.text("excludes");
        self.image_url = form.text("image_url");
        Ok(())
    }
}

impl FormEntity for Reservation {
    const NOUN: &'static str = "Reservation";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::new("tourist_id", "Tourist", FieldKind::Choice(ChoiceSource::Tourists)).required(),
        FieldRule::new("package_id", "Package", FieldKind::Choice(ChoiceSource::Packages)).required(),
        FieldRule::new("start_date", "Start date", FieldKind::Date).required(),
        FieldRule::new("end_date", "End date", FieldKind::Date).required(),
        FieldRule::new("people", "People", AT_LEAST_ONE).required().default_value("1"),
        FieldRule::new("total_price", "Total price", NON_NEGATIVE).required(),
        FieldRule::new("payment_method", "Payment method", FieldKind::Choice(ChoiceSource::Static(PAYMENT_METHODS)))
            .required(),
        FieldRule::new("notes", "Notes", FieldKind::Multiline),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("tourist_id", self.tourist_id)
            .with("package_id", self.package_id)
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("people", self.people)
            .with("total_price", self.total_price)
            .with("payment_method", &self.payment_method)
            .with("notes", &self.notes)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        let mut reservation = Self {
            id,
            code: Reservation::code_for(id, today),
            tourist_id: RecordId::default(),
            package_id: RecordId::default(),
            start_date: today,
            end_date: today,
            people: 1,
            total_price: 0.0,
            status: ReservationStatus::Pending,
            payment_method: String::new(),
            notes: String::new(),
            created_at: today,
        };
        reservation.apply(form)?;
        Ok(reservation)
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.tourist_id = form.id("tourist_id")?;
        self.package_id = form.id("package_id")?;
        self.start_date = form.date("start_date")?;
        self.end_date = form.date("end_date")?;
        self.people = form.count("people")?;
        self.total_price = form.number("total_price")?;
        self.payment_method = form.text("payment_method");
        self.notes = form.text("notes");
        Ok(())
    }

    fn cross_check(form: &FormData, errors: &mut FieldErrors) {
        if let (Ok(start), Ok(end)) = (form.date("start_date"), form.date("end_date")) {
            if end < start {
                errors.insert("end_date", "End date cannot be before the start date".to_string());
            }
        }
    }
}

impl FormEntity for Provider {
    const NOUN: &'static str = "Provider";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("name", "Name").required(),
        FieldRule::new("service_type", "Service type", FieldKind::Choice(ChoiceSource::Static(SERVICE_TYPES)))
            .required(),
        FieldRule::text("contact_name", "Contact name").required(),
        FieldRule::new("contact_email", "Contact email", FieldKind::Email).required(),
        FieldRule::text("contact_phone", "Contact phone").required(),
        FieldRule::text("address", "Address").required(),
        FieldRule::text("city", "City").required(),
        FieldRule::text("country", "Country").required(),
        FieldRule::new("website", "Website", FieldKind::Url),
        FieldRule::new("description", "Description", FieldKind::Multiline).required(),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("name", &self.name)
            .with("service_type", &self.service_type)
            .with("contact_name", &self.contact_name)
            .with("contact_email", &self.contact_email)
            .with("contact_phone", &self.contact_phone)
            .with("address", &self.address)
            .with("city", &self.city)
            .with("country", &self.country)
            .with("website", &self.website)
            .with("description", &self.description)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        let mut provider = Self {
            id,
            name: String::new(),
            service_type: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
            website: String::new(),
            description: String::new(),
            rating: 0.0,
            active_services: 0,
            active: true,
            created_at: today,
        };
        provider.apply(form)?;
        Ok(provider)
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.name = form.text("name");
        self.service_type = form.text("service_type");
        self.contact_name = form.text("contact_name");
        self.contact_email = form.text("contact_email");
        self.contact_phone = form.text("contact_phone");
        self.address = form.text("address");
        self.city = form.text("city");
        self.country = form.text("country");
        self.website = form.text("website");
        self.description = form.text("description");
        Ok(())
    }
}

impl FormEntity for Role {
    const NOUN: &'static str = "Role";
    const SCHEMA: &'static [FieldRule] = &[
        FieldRule::text("name", "Name").required(),
        FieldRule::new("description", "Description", FieldKind::Multiline).required(),
        FieldRule::new("active", "Active", FieldKind::Bool).default_value("true"),
    ];

    fn to_form(&self) -> FormData {
        FormData::default()
            .with("name", &self.name)
            .with("description", &self.description)
            .with("active", self.active)
    }

    fn create(id: RecordId, form: &FormData, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            id,
            name: form.text("name"),
            description: form.text("description"),
            active: form.flag("active"),
            users_count: 0,
            permissions: Vec::new(),
            created_at: today,
        })
    }

    fn apply(&mut self, form: &FormData) -> Result<()> {
        self.name = form.text("name");
        self.description = form.text("description");
        self.active = form.flag("active");
        Ok(())
    }
}

const GENERAL_SCHEMA: &[FieldRule] = &[
    FieldRule::text("site_name", "Site name").required(),
    FieldRule::new("site_description", "Site description", FieldKind::Multiline).required(),
    FieldRule::new("site_url", "Site URL", FieldKind::Url).required(),
    FieldRule::new("contact_email", "Contact email", FieldKind::Email).required(),
    FieldRule::text("contact_phone", "Contact phone").required(),
    FieldRule::text("address", "Address").required(),
    FieldRule::new(
        "default_currency",
        "Default currency",
        FieldKind::Choice(ChoiceSource::Static(&["USD", "EUR", "MXN", "PEN"])),
    )
    .required(),
    FieldRule::new(
        "default_language",
        "Default language",
        FieldKind::Choice(ChoiceSource::Static(&["es", "en", "fr"])),
    )
    .required(),
];

const EMAIL_SCHEMA: &[FieldRule] = &[
    FieldRule::text("smtp_host", "SMTP host").required(),
    FieldRule::new(
        "smtp_port",
        "SMTP port",
        FieldKind::Integer {
            min: Some(1),
            max: Some(65535),
        },
    )
    .required(),
    FieldRule::text("smtp_user", "SMTP user").required(),
    FieldRule::new("smtp_password", "SMTP password", FieldKind::Password).required(),
    FieldRule::new("from_email", "From email", FieldKind::Email).required(),
    FieldRule::text("from_name", "From name").required(),
];

const PAYMENT_SCHEMA: &[FieldRule] = &[
    FieldRule::text("stripe_public_key", "Stripe public key").required(),
    FieldRule::new("stripe_secret_key", "Stripe secret key", FieldKind::Password).required(),
    FieldRule::text("paypal_client_id", "PayPal client id").required(),
    FieldRule::new("paypal_secret", "PayPal secret", FieldKind::Password).required(),
    FieldRule::new(
        "commission_percent",
        "Commission (%)",
        FieldKind::Number {
            min: Some(0.0),
            max: Some(100.0),
        },
    )
    .required(),
];

/// Tabs of the site settings page, each with its own schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Email,
    Payments,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 3] = [Self::General, Self::Email, Self::Payments];

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Email => "Email",
            Self::Payments => "Payments",
        }
    }

    pub fn schema(self) -> &'static [FieldRule] {
        match self {
            Self::General => GENERAL_SCHEMA,
            Self::Email => EMAIL_SCHEMA,
            Self::Payments => PAYMENT_SCHEMA,
        }
    }

    pub fn to_form(self, settings: &SiteSettings) -> FormData {
        match self {
            Self::General => {
                let g = &settings.general;
                FormData::default()
                    .with("site_name", &g.site_name)
                    .with("site_description", &g.site_description)
                    .with("site_url", &g.site_url)
                    .with("contact_email", &g.contact_email)
                    .with("contact_phone", &g.contact_phone)
                    .with("address", &g.address)
                    .with("default_currency", &g.default_currency)
                    .with("default_language", &g.default_language)
            }
            Self::Email => {
                let e = &settings.email;
                FormData::default()
                    .with("smtp_host", &e.smtp_host)
                    .with("smtp_port", e.smtp_port)
                    .with("smtp_user", &e.smtp_user)
                    .with("smtp_password", &e.smtp_password)
                    .with("from_email", &e.from_email)
                    .with("from_name", &e.from_name)
            }
            Self::Payments => {
                let p = &settings.payments;
                FormData::default()
                    .with("stripe_public_key", &p.stripe_public_key)
                    .with("stripe_secret_key", &p.stripe_secret_key)
                    .with("paypal_client_id", &p.paypal_client_id)
                    .with("paypal_secret", &p.paypal_secret)
                    .with("commission_percent", p.commission_percent)
            }
        }
    }

    /// Validate the tab and write it into `settings`. Nothing changes on failure.
    pub fn save(self, settings: &mut SiteSettings, form: &FormData) -> std::result::Result<(), FieldErrors> {
        let errors = validate(self.schema(), form, &crate::models::NoLookup);
        if !errors.is_empty() {
            return Err(errors);
        }
        match self {
            Self::General => {
                let g = &mut settings.general;
                g.site_name = form.text("site_name");
                g.site_description = form.text("site_description");
                g.site_url = form.text("site_url");
                g.contact_email = form.text("contact_email");
                g.contact_phone = form.text("contact_phone");
                g.address = form.text("address");
                g.default_currency = form.text("default_currency");
                g.default_language = form.text("default_language");
            }
            Self::Email => {
                let e = &mut settings.email;
                e.smtp_host = form.text("smtp_host");
                e.smtp_port = form.get("smtp_port").trim().parse().unwrap_or(e.smtp_port);
                e.smtp_user = form.text("smtp_user");
                e.smtp_password = form.text("smtp_password");
                e.from_email = form.text("from_email");
                e.from_name = form.text("from_name");
            }
            Self::Payments => {
                let p = &mut settings.payments;
                p.stripe_public_key = form.text("stripe_public_key");
                p.stripe_secret_key = form.text("stripe_secret_key");
                p.paypal_client_id = form.text("paypal_client_id");
                p.paypal_secret = form.text("paypal_secret");
                p.commission_percent = form.number("commission_percent").unwrap_or(p.commission_percent);
            }
        }
        info!("{} settings saved", self.label());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoLookup;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn tourist_form() -> FormData {
        FormData::defaults(Tourist::SCHEMA)
            .with("first_name", "Lucía")
            .with("last_name", "Fernández")
            .with("email", "lucia@ejemplo.com")
            .with("phone", "+54 11 5555 0000")
            .with("country", "Argentina")
            .with("birth_date", "1993/04/12")
            .with("document", "DNI998877")
    }

    #[test]
    fn test_parse_flexible_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_flexible_date("2024-03-05"), expected);
        assert_eq!(parse_flexible_date("2024/3/5"), expected);
        assert_eq!(parse_flexible_date(" 2024.03.05 "), expected);
        assert_eq!(parse_flexible_date("2024 03 05"), expected);
        assert_eq!(parse_flexible_date("2024-02-30"), None);
        assert_eq!(parse_flexible_date("05-03"), None);
    }

    #[test]
    fn test_required_and_format_rules() {
        let form = FormData::default().with("email", "not-an-email").with("name", "   ");
        let errors = validate(User::SCHEMA, &form, &NoLookup);
        assert_eq!(errors["name"], "Name is required");
        assert_eq!(errors["email"], "Email must be a valid email");
        assert_eq!(errors["role"], "Role is required");
    }

    #[test]
    fn test_numeric_bounds() {
        let store = Store::seeded();
        let form = Package::to_form(&store.packages[0])
            .with("price", "-1")
            .with("duration_days", "0")
            .with("max_people", "2.5");
        let errors = validate(Package::SCHEMA, &form, &store);
        assert_eq!(errors["price"], "Price must be at least 0");
        assert_eq!(errors["duration_days"], "Duration (days) must be at least 1");
        assert_eq!(errors["max_people"], "Max people must be a whole number");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_count_above_u32_is_a_field_error() {
        let mut store = Store::seeded();
        let package = store.packages[0].clone();
        let mut form = FormController::<Package>::default();

        form.open_edit(&package);
        form.data.set("max_people", "4294967296");
        let err = form.submit(&mut store, today()).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(form.mode(), FormMode::Editing(package.id));
        assert_eq!(form.errors["max_people"], "Max people must be at most 4294967295");
        assert_eq!(store.packages[0], package);
    }

    #[test]
    fn test_reference_must_exist() {
        let store = Store::seeded();
        let form = Destination::to_form(&store.destinations[0]).with("category_id", "42");
        let errors = validate(Destination::SCHEMA, &form, &store);
        assert_eq!(errors["category_id"], "Category must be one of the listed options");
    }

    #[test]
    fn test_optional_url_may_be_blank() {
        let store = Store::seeded();
        let form = Provider::to_form(&store.providers[0]).with("website", "");
        assert!(validate(Provider::SCHEMA, &form, &store).is_empty());

        let form = form.with("website", "not a url");
        assert!(validate(Provider::SCHEMA, &form, &store).contains_key("website"));
    }

    #[test]
    fn test_create_appends_with_defaults() {
        let mut store = Store::seeded();
        let before = store.tourists.clone();
        let mut form = FormController::<Tourist>::default();

        form.open_create();
        assert_eq!(form.mode(), FormMode::Creating);
        form.data = tourist_form();
        let submission = form.submit(&mut store, today()).unwrap();

        assert_eq!(submission, Submission::Created(RecordId(6)));
        assert_eq!(store.tourists.len(), before.len() + 1);
        assert_eq!(&store.tourists[..before.len()], &before[..]);
        let created = store.tourists.last().unwrap();
        assert_eq!(created.first_name, "Lucía");
        assert_eq!(created.birth_date, NaiveDate::from_ymd_opt(1993, 4, 12).unwrap());
        assert_eq!(created.created_at, today());
        assert_eq!(created.user_id, None);
        assert_eq!(form.mode(), FormMode::Closed);
        assert!(form.data.get("first_name").is_empty());
    }

    #[test]
    fn test_create_reservation_sets_server_defaults() {
        let mut store = Store::seeded();
        let mut form = FormController::<Reservation>::default();
        form.open_create();
        assert_eq!(form.data.get("people"), "1");
        form.data = form
            .data
            .clone()
            .with("tourist_id", "2")
            .with("package_id", "3")
            .with("start_date", "2024-07-01")
            .with("end_date", "2024-07-06")
            .with("people", "2")
            .with("total_price", "7000")
            .with("payment_method", "PayPal");

        assert_eq!(form.submit(&mut store, today()).unwrap(), Submission::Created(RecordId(6)));
        let created = store.reservations.last().unwrap();
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.code, "RES-2024-006");
        assert_eq!(created.notes, "");
    }

    #[test]
    fn test_reservation_end_before_start() {
        let mut store = Store::seeded();
        let mut form = FormController::<Reservation>::default();
        form.open_edit(&store.reservations[0].clone());
        form.data.set("end_date", "2024-03-01");

        assert!(form.submit(&mut store, today()).is_err());
        assert!(form.errors.contains_key("end_date"));
        assert_eq!(form.mode(), FormMode::Editing(RecordId(1)));
    }

    #[test]
    fn test_edit_changes_only_listed_fields() {
        let mut store = Store::seeded();
        let original = store.packages[1].clone();
        let untouched = store.packages[0].clone();
        let mut form = FormController::<Package>::default();

        form.open_edit(&original);
        assert_eq!(form.data.get("name"), "Aventura Inca");
        form.data.set("price", "2400.5");
        form.data.set("name", "Aventura Inca Deluxe");

        assert_eq!(form.submit(&mut store, today()).unwrap(), Submission::Updated(RecordId(2)));
        let edited = store.get::<Package>(RecordId(2)).unwrap();
        assert_eq!(edited.name, "Aventura Inca Deluxe");
        assert_eq!(edited.price, 2400.5);
        assert_eq!(edited.rating, original.rating);
        assert_eq!(edited.reservations_count, original.reservations_count);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.duration_days, original.duration_days);
        assert_eq!(store.packages[0], untouched);
    }

    #[test]
    fn test_validation_failure_keeps_state() {
        let mut store = Store::seeded();
        let before = store.users.clone();
        let mut form = FormController::<User>::default();

        form.open_create();
        form.data.set("email", "bad");
        let err = form.submit(&mut store, today()).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(form.mode(), FormMode::Creating);
        assert!(form.errors.contains_key("name"));
        assert!(form.errors.contains_key("email"));
        assert!(!form.errors.contains_key("role"));
        assert_eq!(store.users, before);
    }

    #[test]
    fn test_cancel_does_not_mutate() {
        let mut store = Store::seeded();
        let before = store.roles.clone();
        let mut form = FormController::<Role>::default();

        form.open_edit(&store.roles[0].clone());
        form.data.set("name", "Changed");
        form.cancel();

        assert!(!form.is_open());
        assert_eq!(store.roles, before);
        assert!(form.submit(&mut store, today()).is_err());
    }

    #[test]
    fn test_new_ids_not_reused_after_delete() {
        let mut store = Store::seeded();
        let mut form = FormController::<Tourist>::default();

        form.open_create();
        form.data = tourist_form();
        assert_eq!(form.submit(&mut store, today()).unwrap(), Submission::Created(RecordId(6)));
        assert!(store.delete::<Tourist>(RecordId(6)));

        form.open_create();
        form.data = tourist_form();
        assert_eq!(form.submit(&mut store, today()).unwrap(), Submission::Created(RecordId(7)));
    }

    #[test]
    fn test_role_form_keeps_permissions() {
        let mut store = Store::seeded();
        let mut form = FormController::<Role>::default();
        form.open_edit(&store.roles[1].clone());
        form.data.set("active", "false");
        form.submit(&mut store, today()).unwrap();

        let role = store.get::<Role>(RecordId(2)).unwrap();
        assert!(!role.active);
        assert_eq!(role.permissions.len(), 3);
    }

    #[test]
    fn test_settings_tabs() {
        let mut settings = SiteSettings::default();

        let form = SettingsTab::Email.to_form(&settings).with("smtp_port", "2525");
        let errors = SettingsTab::Email.save(&mut settings, &form).unwrap_err();
        assert_eq!(errors["smtp_password"], "SMTP password is required");
        assert_eq!(settings.email.smtp_port, 587);

        let form = form.with("smtp_password", "secret");
        SettingsTab::Email.save(&mut settings, &form).unwrap();
        assert_eq!(settings.email.smtp_port, 2525);

        let form = SettingsTab::Payments
            .to_form(&settings)
            .with("stripe_public_key", "pk")
            .with("stripe_secret_key", "sk")
            .with("paypal_client_id", "id")
            .with("paypal_secret", "ps")
            .with("commission_percent", "120");
        let errors = SettingsTab::Payments.save(&mut settings, &form).unwrap_err();
        assert_eq!(errors["commission_percent"], "Commission (%) must be at most 100");

        assert!(SettingsTab::General.save(&mut settings, &SettingsTab::General.to_form(&SiteSettings::default())).is_ok());
    }
}
