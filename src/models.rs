// src/models.rs

use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A product as returned by the backend, either inline in a chat reply or
/// from the inventory listing. Read-only on the client; every field the
/// backend might omit gets a lenient default so a sparse payload never fails
/// to parse. The inventory listing calls the quantity field `stock`, the chat
/// endpoint calls it `quantity`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default = "unknown_product")]
    pub name: String,
    #[serde(default = "unknown_brand")]
    pub brand: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "stock", deserialize_with = "lenient_quantity")]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub specifications: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub category: Option<String>,
}

fn unknown_product() -> String {
    "Unknown Product".to_string()
}

fn unknown_brand() -> String {
    "Unknown Brand".to_string()
}

/// Accepts any JSON value where a quantity should be; anything that is not a
/// non-negative number comes back as `None` rather than a parse error.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.quantity)
    }
}

/// Derived classification of a product's quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
    Unknown,
}

impl StockStatus {
    pub fn classify(quantity: Option<u64>) -> Self {
        match quantity {
            None => StockStatus::Unknown,
            Some(0) => StockStatus::OutOfStock,
            Some(1..=3) => StockStatus::LowStock,
            Some(_) => StockStatus::InStock,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
            StockStatus::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            StockStatus::OutOfStock => Color::Red,
            StockStatus::LowStock => Color::Yellow,
            StockStatus::InStock => Color::Green,
            StockStatus::Unknown => Color::DarkGray,
        }
    }
}
