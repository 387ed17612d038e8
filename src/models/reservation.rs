//! Package reservations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, StatusLabel, Value};

/// Reservation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Confirmada")]
    Confirmed,
    #[serde(rename = "Cancelada")]
    Cancelled,
    #[serde(rename = "Completada")]
    Completed,
}

impl StatusLabel for ReservationStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Confirmed, Self::Cancelled, Self::Completed];

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: RecordId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "turista_id")]
    pub tourist_id: RecordId,
    #[serde(rename = "paquete_id")]
    pub package_id: RecordId,
    #[serde(rename = "fecha_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "fecha_fin")]
    pub end_date: NaiveDate,
    #[serde(rename = "num_personas")]
    pub people: u32,
    #[serde(rename = "precio_total")]
    pub total_price: f64,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
    #[serde(rename = "metodo_pago")]
    pub payment_method: String,
    #[serde(rename = "notas", default)]
    pub notes: String,
    pub created_at: NaiveDate,
}

impl Reservation {
    /// Booking code derived from creation year and id, e.g. `RES-2024-007`.
    pub fn code_for(id: RecordId, created: NaiveDate) -> String {
        format!("RES-{}-{:03}", created.format("%Y"), id.0)
    }
}

impl Record for Reservation {
    const DATASET: &'static str = "reservations";
    const RESOURCE: &'static str = "reservas";
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "tourist", "package"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "code" => self.code.as_str().into(),
            "tourist_id" => self.tourist_id.into(),
            "tourist" => lookup.tourist(self.tourist_id).map(|t| t.full_name()).into(),
            "tourist_email" => lookup.tourist(self.tourist_id).map(|t| t.email.clone()).into(),
            "package_id" => self.package_id.into(),
            "package" => lookup.package(self.package_id).map(|p| p.name.clone()).into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            "people" => self.people.into(),
            "total_price" => self.total_price.into(),
            "status" => self.status.label().into(),
            "payment_method" => self.payment_method.as_str().into(),
            "notes" => self.notes.as_str().into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.code.clone()
    }
}
