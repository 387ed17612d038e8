//! Tour packages and package types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, Value};

/// Package type (all-inclusive, adventure, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageType {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo_paquete_id")]
    pub package_type_id: RecordId,
    #[serde(rename = "destino_id")]
    pub destination_id: RecordId,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "duracion_dias")]
    pub duration_days: u32,
    #[serde(rename = "max_personas")]
    pub max_people: u32,
    #[serde(rename = "incluye")]
    pub includes: String,
    #[serde(rename = "no_incluye")]
    pub excludes: String,
    #[serde(rename = "imagen_url")]
    pub image_url: String,
    #[serde(rename = "activo")]
    pub active: bool,
    pub rating: f64,
    #[serde(rename = "reservas_count")]
    pub reservations_count: u32,
    pub created_at: NaiveDate,
}

impl Record for Package {
    const DATASET: &'static str = "packages";
    const RESOURCE: &'static str = "paquetes";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "destination", "package_type"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.as_str().into(),
            "package_type_id" => self.package_type_id.into(),
            "package_type" => lookup.package_type(self.package_type_id).map(|t| t.name.clone()).into(),
            "destination_id" => self.destination_id.into(),
            "destination" => lookup.destination(self.destination_id).map(|d| d.name.clone()).into(),
            "price" => self.price.into(),
            "duration_days" => self.duration_days.into(),
            "max_people" => self.max_people.into(),
            "includes" => self.includes.as_str().into(),
            "excludes" => self.excludes.as_str().into(),
            "image_url" => self.image_url.as_str().into(),
            "active" => self.active.into(),
            "rating" => self.rating.into(),
            "reservations_count" => self.reservations_count.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
