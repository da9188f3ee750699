use crate::{domain::response::pagination::Pagination, model::product::Product as ProductModel};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductResponse {
    pub id: i64,
    pub product_code: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.id,
            product_code: value.product_code,
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            category: value.category,
            description: value.description,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaginatedProducts {
    pub items: Vec<ProductResponse>,
    pub pagination: Pagination,
}
