use crate::{
    domain::requests::product::SaveProductRequest, model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Inserts a new row; the store assigns `id` and `created_at`.
    async fn create_product(
        &self,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    /// Replaces every mutable column of `id`. `created_at` is never written.
    async fn update_product(
        &self,
        id: i64,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    async fn delete_product(&self, id: i64) -> Result<(), RepositoryError>;
}
