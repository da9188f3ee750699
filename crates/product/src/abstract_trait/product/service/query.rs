use crate::domain::{
    requests::product::{PageRequest, ProductFilter},
    response::product::{PaginatedProducts, ProductResponse},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(&self) -> Result<Vec<ProductResponse>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<ProductResponse, ServiceError>;
    async fn find_by_category(&self, category: &str)
    -> Result<Vec<ProductResponse>, ServiceError>;
    async fn find_by_category_order_by_price(
        &self,
        category: &str,
    ) -> Result<Vec<ProductResponse>, ServiceError>;
    async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductResponse>, ServiceError>;
    async fn find_by_price_range(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<ProductResponse>, ServiceError>;
    async fn advanced_search(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductResponse>, ServiceError>;
    async fn search_paginated(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<PaginatedProducts, ServiceError>;
    async fn find_all_categories(&self) -> Result<Vec<String>, ServiceError>;
}
