//! Service providers (hotels, tour operators, transport, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, Value};

/// Service types offered by providers.
pub const SERVICE_TYPES: &[&str] = &[
    "Lodging",
    "Tours & Excursions",
    "Transport",
    "Food & Dining",
    "Entertainment",
    "Tour Guides",
    "Water Activities",
    "Spa & Wellness",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo_servicio")]
    pub service_type: String,
    #[serde(rename = "contacto_nombre")]
    pub contact_name: String,
    #[serde(rename = "contacto_email")]
    pub contact_email: String,
    #[serde(rename = "contacto_telefono")]
    pub contact_phone: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "sitio_web", default)]
    pub website: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub rating: f64,
    #[serde(rename = "servicios_activos")]
    pub active_services: u32,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: NaiveDate,
}

impl Record for Provider {
    const DATASET: &'static str = "providers";
    const RESOURCE: &'static str = "proveedores";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "contact_name", "city", "country"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, _lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "service_type" => self.service_type.as_str().into(),
            "contact_name" => self.contact_name.as_str().into(),
            "contact_email" => self.contact_email.as_str().into(),
            "contact_phone" => self.contact_phone.as_str().into(),
            "address" => self.address.as_str().into(),
            "city" => self.city.as_str().into(),
            "country" => self.country.as_str().into(),
            "website" => self.website.as_str().into(),
            "description" => self.description.as_str().into(),
            "rating" => self.rating.into(),
            "active_services" => self.active_services.into(),
            "active" => self.active.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
