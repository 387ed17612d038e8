//! Payments recorded against reservations.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Lookup, Record, RecordId, StatusLabel, Value};

/// Payment processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Completado")]
    Completed,
    #[serde(rename = "Fallido")]
    Failed,
    #[serde(rename = "Reembolsado")]
    Refunded,
}

impl StatusLabel for PaymentStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Completed, Self::Failed, Self::Refunded];

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }
}

/// Payment methods accepted by the platform.
pub const PAYMENT_METHODS: &[&str] = &["Credit Card", "Debit Card", "Bank Transfer", "PayPal"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: RecordId,
    #[serde(rename = "reserva_id")]
    pub reservation_id: RecordId,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "metodo_pago")]
    pub method: String,
    #[serde(rename = "estado")]
    pub status: PaymentStatus,
    #[serde(rename = "fecha_pago")]
    pub paid_at: NaiveDateTime,
    #[serde(rename = "referencia_externa")]
    pub external_reference: String,
    #[serde(rename = "comision")]
    pub commission: f64,
    #[serde(rename = "monto_neto")]
    pub net_amount: f64,
    #[serde(rename = "moneda")]
    pub currency: String,
    #[serde(rename = "notas", default)]
    pub notes: String,
    pub created_at: NaiveDate,
}

impl Record for Payment {
    const DATASET: &'static str = "payments";
    const RESOURCE: &'static str = "pagos";
    const SEARCH_FIELDS: &'static [&'static str] = &["reservation_code", "tourist", "external_reference"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, key: &str, lookup: &dyn Lookup) -> Value {
        match key {
            "id" => self.id.into(),
            "reservation_id" => self.reservation_id.into(),
            "reservation_code" => lookup.reservation(self.reservation_id).map(|r| r.code.clone()).into(),
            "tourist" => lookup
                .reservation(self.reservation_id)
                .and_then(|r| lookup.tourist(r.tourist_id))
                .map(|t| t.full_name())
                .into(),
            "amount" => self.amount.into(),
            "method" => self.method.as_str().into(),
            "status" => self.status.label().into(),
            "paid_at" => self.paid_at.into(),
            "external_reference" => self.external_reference.as_str().into(),
            "commission" => self.commission.into(),
            "net_amount" => self.net_amount.into(),
            "currency" => self.currency.as_str().into(),
            "notes" => self.notes.as_str().into(),
            "created_at" => self.created_at.into(),
            _ => Value::Empty,
        }
    }

    fn label(&self) -> String {
        self.external_reference.clone()
    }
}
