use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub product_code: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}
