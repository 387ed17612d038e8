//! Tourist reviews of packages, subject to moderation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, StatusLabel, Value};

/// Moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommentStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Aprobado")]
    Approved,
    #[serde(rename = "Rechazado")]
    Rejected,
}

impl StatusLabel for CommentStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Approved, Self::Rejected];

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    #[serde(rename = "turista_id")]
    pub tourist_id: RecordId,
    #[serde(rename = "paquete_id")]
    pub package_id: RecordId,
    /// 1 to 5 stars.
    #[serde(rename = "calificacion")]
    pub rating: u8,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "comentario")]
    pub body: String,
    #[serde(rename = "estado")]
    pub status: CommentStatus,
    #[serde(rename = "fecha_viaje")]
    pub trip_date: NaiveDate,
    #[serde(rename = "util_positivo")]
    pub helpful_yes: u32,
    #[serde(rename = "util_negativo")]
    pub helpful_no: u32,
    #[serde(rename = "respuesta_admin", default)]
    pub admin_reply: String,
    pub created_at: NaiveDate,
}

impl Record for Comment {
    const DATASET: &'static str = "comments";
    const RESOURCE: &'static str = "comentarios";
    const SEARCH_FIELDS: &'static [&'static str] = &["tourist", "package", "title", "body"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "tourist_id" => self.tourist_id.into(),
            "tourist" => lookup.tourist(self.tourist_id).map(|t| t.full_name()).into(),
            "tourist_email" => lookup.tourist(self.tourist_id).map(|t| t.email.clone()).into(),
            "package_id" => self.package_id.into(),
            "package" => lookup.package(self.package_id).map(|p| p.name.clone()).into(),
            "rating" => i64::from(self.rating).into(),
            "title" => self.title.as_str().into(),
            "body" => self.body.as_str().into(),
            "status" => self.status.label().into(),
            "trip_date" => self.trip_date.into(),
            "helpful_yes" => self.helpful_yes.into(),
            "helpful_no" => self.helpful_no.into(),
            "admin_reply" => self.admin_reply.as_str().into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
