//! Tourist profiles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tourist {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<RecordId>,
    pub created_at: NaiveDate,
}

impl Tourist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Tourist {
    const DATASET: &'static str = "tourists";
    const RESOURCE: &'static str = "turistas";
    const SEARCH_FIELDS: &'static [&'static str] = &["first_name", "last_name", "email"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, _lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "first_name" => self.first_name.as_str().into(),
            "last_name" => self.last_name.as_str().into(),
            "full_name" => self.full_name().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "country" => self.country.as_str().into(),
            "birth_date" => self.birth_date.into(),
            "document" => self.document.as_str().into(),
            "user_id" => self.user_id.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.full_name()
    }
}
