//! Roles and the permission catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, Value};

/// A single grantable permission, e.g. `users.view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Feature area the permission belongs to.
    #[serde(rename = "modulo")]
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "usuarios_count")]
    pub users_count: u32,
    /// Granted permission ids, in catalog order.
    #[serde(rename = "permisos", default)]
    pub permissions: Vec<RecordId>,
    pub created_at: NaiveDate,
}

impl Record for Role {
    const DATASET: &'static str = "roles";
    const RESOURCE: &'static str = "roles";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, _lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.as_str().into(),
            "active" => self.active.into(),
            "users_count" => self.users_count.into(),
            "permission_count" => (self.permissions.len() as i64).into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
