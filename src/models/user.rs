//! Back-office user accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, StatusLabel, Value};

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "Activo")]
    Active,
    #[serde(rename = "Inactivo")]
    Inactive,
}

impl StatusLabel for UserStatus {
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive];

    fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// Role labels offered by the user form.
pub const USER_ROLES: &[&str] = &["Admin", "Moderator", "User"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub created_at: NaiveDate,
}

impl Record for User {
    const DATASET: &'static str = "users";
    const RESOURCE: &'static str = "users";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, _lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_str().into(),
            "status" => self.status.label().into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
