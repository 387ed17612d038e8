//! Dashboard summary payloads.

use serde::{Deserialize, Serialize};

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_tourists: u64,
    pub total_reservations: u64,
    pub total_revenue: f64,
}

/// One labelled value in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub monthly_reservations: Vec<ChartPoint>,
    pub tourists_by_country: Vec<ChartPoint>,
    pub revenue_by_package: Vec<ChartPoint>,
}
