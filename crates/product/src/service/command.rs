use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::ProductCommandServiceTrait,
    },
    domain::{requests::product::SaveProductRequest, response::product::ProductResponse},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext, complete_tracing, start_tracing},
};
use tracing::{info, warn};

const TRACER_NAME: &str = "product-command-service";

pub const DUPLICATE_CODE_MESSAGE: &str = "Product code already exists";

#[derive(Clone)]
pub struct ProductCommandService {
    pub command: DynProductCommandRepository,
    pub query: DynProductQueryRepository,
    pub metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(
        command: DynProductCommandRepository,
        query: DynProductQueryRepository,
        registry: &mut Registry,
    ) -> Result<Self> {
        let metrics = Metrics::new();
        metrics.register(registry, "product_command_service");

        Ok(Self {
            command,
            query,
            metrics,
        })
    }

    fn start(&self, operation: &'static str, mut attributes: Vec<KeyValue>) -> TracingContext {
        attributes.push(KeyValue::new("component", "product"));
        attributes.push(KeyValue::new("operation", operation));
        start_tracing(TRACER_NAME, &format!("product_{operation}"), attributes)
    }

    fn complete<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: Result<T, ServiceError>,
        message: &str,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(_) => complete_tracing(tracing_ctx, &self.metrics, method, true, message),
            Err(err) => complete_tracing(
                tracing_ctx,
                &self.metrics,
                method,
                false,
                &err.to_string(),
            ),
        }
        result
    }

    async fn persist(&self, req: &SaveProductRequest) -> Result<ProductResponse, ServiceError> {
        if self.is_product_code_duplicate(req).await? {
            warn!("⚠️ Duplicate product code rejected: {}", req.product_code);
            return Err(ServiceError::Validation(vec![format!(
                "productCode: {DUPLICATE_CODE_MESSAGE}"
            )]));
        }

        let product = match req.id {
            None => self.command.create_product(req).await?,
            Some(id) => self.command.update_product(id, req).await?,
        };

        Ok(ProductResponse::from(product))
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn save_product(
        &self,
        req: &SaveProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        info!(
            "💾 Saving product {} ({})",
            req.product_code,
            if req.is_new() { "create" } else { "update" }
        );

        let method = if req.is_new() { Method::Post } else { Method::Put };
        let tracing_ctx = self.start(
            "save",
            vec![
                KeyValue::new("product.code", req.product_code.clone()),
                KeyValue::new("product.id", req.id.unwrap_or_default()),
            ],
        );

        let result = self.persist(req).await;
        self.complete(&tracing_ctx, method, result, "Product saved")
    }

    async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        info!("🗑️ Deleting product ID: {id}");

        let tracing_ctx = self.start("delete", vec![KeyValue::new("product.id", id)]);
        let result = self
            .command
            .delete_product(id)
            .await
            .map_err(ServiceError::from);
        self.complete(&tracing_ctx, Method::Delete, result, "Product deleted")
    }

    async fn is_product_code_duplicate(
        &self,
        req: &SaveProductRequest,
    ) -> Result<bool, ServiceError> {
        let exists: Result<bool, RepositoryError> = match req.id {
            None => self.query.exists_by_product_code(&req.product_code).await,
            Some(id) => {
                self.query
                    .exists_by_product_code_and_id_not(&req.product_code, id)
                    .await
            }
        };
        Ok(exists?)
    }
}
