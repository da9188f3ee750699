use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::{PageRequest, ProductFilter},
        response::{
            pagination::Pagination,
            product::{PaginatedProducts, ProductResponse},
        },
    },
    model::product::Product as ProductModel,
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext, complete_tracing, start_tracing},
};
use tracing::info;

const TRACER_NAME: &str = "product-query-service";

#[derive(Clone)]
pub struct ProductQueryService {
    pub query: DynProductQueryRepository,
    pub metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Result<Self> {
        let metrics = Metrics::new();
        metrics.register(registry, "product_query_service");

        Ok(Self { query, metrics })
    }

    fn start(&self, operation: &'static str, mut attributes: Vec<KeyValue>) -> TracingContext {
        attributes.push(KeyValue::new("component", "product"));
        attributes.push(KeyValue::new("operation", operation));
        start_tracing(TRACER_NAME, &format!("product_{operation}"), attributes)
    }

    fn complete<T>(
        &self,
        tracing_ctx: &TracingContext,
        result: Result<T, RepositoryError>,
        message: &str,
    ) -> Result<T, ServiceError> {
        match result {
            Ok(value) => {
                complete_tracing(tracing_ctx, &self.metrics, Method::Get, true, message);
                Ok(value)
            }
            Err(err) => {
                complete_tracing(
                    tracing_ctx,
                    &self.metrics,
                    Method::Get,
                    false,
                    &err.to_string(),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }
}

fn to_responses(products: Vec<ProductModel>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("🔍 Finding all products");

        let tracing_ctx = self.start("find_all", vec![]);
        let result = self.query.find_all().await.map(to_responses);
        self.complete(&tracing_ctx, result, "Products retrieved")
    }

    async fn find_by_id(&self, id: i64) -> Result<ProductResponse, ServiceError> {
        info!("🆔 Finding product by ID: {id}");

        let tracing_ctx = self.start("find_by_id", vec![KeyValue::new("product.id", id)]);
        let result = match self.query.find_by_id(id).await {
            Ok(Some(product)) => Ok(ProductResponse::from(product)),
            Ok(None) => Err(RepositoryError::NotFound),
            Err(err) => Err(err),
        };
        self.complete(&tracing_ctx, result, "Product retrieved")
    }

    async fn find_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("🏷️ Finding products in category: {category:?}");

        let tracing_ctx = self.start(
            "find_by_category",
            vec![KeyValue::new("category", category.to_string())],
        );
        let result = self
            .query
            .find_by_category(category)
            .await
            .map(to_responses);
        self.complete(&tracing_ctx, result, "Products by category retrieved")
    }

    async fn find_by_category_order_by_price(
        &self,
        category: &str,
    ) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("🏷️ Finding products in category {category:?} ordered by price");

        let tracing_ctx = self.start(
            "find_by_category_order_by_price",
            vec![KeyValue::new("category", category.to_string())],
        );
        let result = self
            .query
            .find_by_category_order_by_price(category)
            .await
            .map(to_responses);
        self.complete(&tracing_ctx, result, "Products by category retrieved")
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("🔍 Searching products by keyword: {keyword:?}");

        let tracing_ctx = self.start(
            "search_by_name",
            vec![KeyValue::new("keyword", keyword.to_string())],
        );
        let result = self.query.search_by_name(keyword).await.map(to_responses);
        self.complete(&tracing_ctx, result, "Products by keyword retrieved")
    }

    async fn find_by_price_range(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<ProductResponse>, ServiceError> {
        info!("💰 Finding products priced between {min_price:?} and {max_price:?}");

        let tracing_ctx = self.start("find_by_price_range", vec![]);
        let result = self
            .query
            .find_by_price_range(min_price, max_price)
            .await
            .map(to_responses);
        self.complete(&tracing_ctx, result, "Products by price range retrieved")
    }

    async fn advanced_search(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductResponse>, ServiceError> {
        let filter = filter.normalized();
        info!("🔎 Advanced product search: {filter:?}");

        let tracing_ctx = self.start(
            "advanced_search",
            vec![
                KeyValue::new("name", filter.name.clone().unwrap_or_default()),
                KeyValue::new("category", filter.category.clone().unwrap_or_default()),
            ],
        );
        let result = self.query.search(&filter).await.map(to_responses);
        self.complete(&tracing_ctx, result, "Advanced search completed")
    }

    async fn search_paginated(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<PaginatedProducts, ServiceError> {
        info!(
            "📄 Paginated search | Keyword: {keyword:?}, Page: {}, Size: {}",
            page.page, page.size
        );

        let tracing_ctx = self.start(
            "search_paginated",
            vec![
                KeyValue::new("keyword", keyword.to_string()),
                KeyValue::new("page", i64::from(page.page)),
                KeyValue::new("page_size", i64::from(page.size)),
            ],
        );
        let result = self
            .query
            .search_by_name_paginated(keyword, page)
            .await
            .map(|(products, total)| PaginatedProducts {
                items: to_responses(products),
                pagination: Pagination::new(page.page, page.size, total),
            });
        self.complete(&tracing_ctx, result, "Paginated search completed")
    }

    async fn find_all_categories(&self) -> Result<Vec<String>, ServiceError> {
        info!("🏷️ Finding all categories");

        let tracing_ctx = self.start("find_all_categories", vec![]);
        let result = self.query.find_all_categories().await;
        self.complete(&tracing_ctx, result, "Categories retrieved")
    }
}
