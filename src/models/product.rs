//! Products and their yearly sales statistics.
//!
//! Numbers stay `serde_json::Number` so integers and floats come back exactly
//! as stored. Absent fields stay absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Any further fields, returned as stored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductStat {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_sales_total: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_total_sold_units: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_data: Option<Vec<MonthlyData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_data: Option<Vec<DailyData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyData {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product fields with its stats nested under `stat`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStats {
    #[serde(flatten)]
    pub product: Product,
    pub stat: Vec<ProductStat>,
}
