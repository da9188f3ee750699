use crate::domain::{requests::product::SaveProductRequest, response::product::ProductResponse};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandServiceTrait {
    /// Creates when `req.id` is `None`, updates otherwise.
    async fn save_product(
        &self,
        req: &SaveProductRequest,
    ) -> Result<ProductResponse, ServiceError>;
    async fn delete_product(&self, id: i64) -> Result<(), ServiceError>;
    async fn is_product_code_duplicate(
        &self,
        req: &SaveProductRequest,
    ) -> Result<bool, ServiceError>;
}
