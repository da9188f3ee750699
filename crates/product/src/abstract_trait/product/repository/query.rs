use crate::{
    domain::requests::product::{PageRequest, ProductFilter},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_by_category(&self, category: &str)
    -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_category_order_by_price(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_price_range(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn search(&self, filter: &ProductFilter) -> Result<Vec<ProductModel>, RepositoryError>;
    /// Returns the requested page and the total number of matches.
    async fn search_by_name_paginated(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    async fn find_all_categories(&self) -> Result<Vec<String>, RepositoryError>;
    async fn exists_by_product_code(&self, product_code: &str) -> Result<bool, RepositoryError>;
    async fn exists_by_product_code_and_id_not(
        &self,
        product_code: &str,
        id: i64,
    ) -> Result<bool, RepositoryError>;
}
