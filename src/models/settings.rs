//! Site-wide settings edited on the configuration page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub site_name: String,
    pub site_description: String,
    pub site_url: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub default_currency: String,
    pub default_language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            site_name: "TurismoApp".to_string(),
            site_description: "Tourism management platform".to_string(),
            site_url: "https://turismoapp.com".to_string(),
            contact_email: "contacto@turismoapp.com".to_string(),
            contact_phone: "+1 555 123 4567".to_string(),
            address: "123 Calle Principal, Ciudad".to_string(),
            default_currency: "USD".to_string(),
            default_language: "es".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: "noreply@turismoapp.com".to_string(),
            smtp_password: String::new(),
            from_email: "noreply@turismoapp.com".to_string(),
            from_name: "TurismoApp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub stripe_public_key: String,
    pub stripe_secret_key: String,
    pub paypal_client_id: String,
    pub paypal_secret: String,
    /// Platform commission, 0 to 100.
    pub commission_percent: f64,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            stripe_public_key: String::new(),
            stripe_secret_key: String::new(),
            paypal_client_id: String::new(),
            paypal_secret: String::new(),
            commission_percent: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub general: GeneralSettings,
    pub email: EmailSettings,
    pub payments: PaymentSettings,
}
