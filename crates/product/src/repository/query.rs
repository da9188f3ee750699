use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::product::{PageRequest, ProductFilter},
    model::product::Product as ProductModel,
    repository::builder,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn fetch_products(
        &self,
        mut query: QueryBuilder<'static, Postgres>,
        label: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let products = query
            .build_query_as::<ProductModel>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products ({label}): {:?}", e);
                RepositoryError::from(e)
            })?;

        info!("✅ Fetched {} products ({label})", products.len());
        Ok(products)
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔍 Fetching all products");
        self.fetch_products(builder::find_all(), "all").await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching product by ID: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let mut query = builder::find_by_id(id);
        let result = query
            .build_query_as::<ProductModel>()
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        Ok(result)
    }

    async fn find_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🏷️ Fetching products in category: {:?}", category);
        self.fetch_products(builder::find_by_category(category), "by category")
            .await
    }

    async fn find_by_category_order_by_price(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🏷️ Fetching products in category {:?} by price", category);
        self.fetch_products(
            builder::find_by_category_order_by_price(category),
            "by category, price ascending",
        )
        .await
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔍 Searching products by name: {:?}", keyword);
        self.fetch_products(builder::search_by_name(keyword), "by name")
            .await
    }

    async fn find_by_price_range(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!(
            "💰 Fetching products priced between {:?} and {:?}",
            min_price, max_price
        );
        let filter = ProductFilter {
            min_price,
            max_price,
            ..Default::default()
        };
        self.fetch_products(builder::search(&filter), "by price range")
            .await
    }

    async fn search(&self, filter: &ProductFilter) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔎 Multi-criteria product search: {:?}", filter);
        self.fetch_products(builder::search(filter), "multi-criteria")
            .await
    }

    async fn search_by_name_paginated(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!(
            "📄 Paginated name search: {:?} | Page: {}, Size: {}",
            keyword, page.page, page.size
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let mut count_query = builder::count_by_name(keyword);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let mut page_query = builder::search_by_name_page(keyword, page);
        let products = page_query
            .build_query_as::<ProductModel>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product page: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((products, total))
    }

    async fn find_all_categories(&self) -> Result<Vec<String>, RepositoryError> {
        info!("🏷️ Fetching distinct categories");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let categories = sqlx::query_scalar::<_, String>(builder::FIND_ALL_CATEGORIES)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch categories: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(categories)
    }

    async fn exists_by_product_code(&self, product_code: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let exists = sqlx::query_scalar::<_, bool>(builder::EXISTS_BY_PRODUCT_CODE)
            .bind(product_code)
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(exists)
    }

    async fn exists_by_product_code_and_id_not(
        &self,
        product_code: &str,
        id: i64,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let exists = sqlx::query_scalar::<_, bool>(builder::EXISTS_BY_PRODUCT_CODE_AND_ID_NOT)
            .bind(product_code)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(exists)
    }
}
