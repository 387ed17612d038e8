//! Destinations and their categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, Value};

/// Destination category (beach, mountain, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCategory {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "categoria_id")]
    pub category_id: RecordId,
    #[serde(rename = "precio_base")]
    pub base_price: f64,
    #[serde(rename = "imagen_url")]
    pub image_url: String,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: NaiveDate,
}

impl Record for Destination {
    const DATASET: &'static str = "destinations";
    const RESOURCE: &'static str = "destinos";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "country", "city"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.as_str().into(),
            "country" => self.country.as_str().into(),
            "city" => self.city.as_str().into(),
            "location" => format!("{}, {}", self.city, self.country).into(),
            "category_id" => self.category_id.into(),
            "category" => lookup.category(self.category_id).map(|c| c.name.clone()).into(),
            "base_price" => self.base_price.into(),
            "image_url" => self.image_url.as_str().into(),
            "active" => self.active.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
