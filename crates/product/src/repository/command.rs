use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::SaveProductRequest, model::product::Product as ProductModel,
    repository::builder,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(builder::INSERT_PRODUCT)
            .bind(&req.product_code)
            .bind(&req.name)
            .bind(req.price)
            .bind(req.quantity)
            .bind(&req.category)
            .bind(&req.description)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create product {}: {:?}",
                    req.product_code, err
                );
                RepositoryError::from(err)
            })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created product ID {} ({})",
            result.id, result.product_code
        );
        Ok(result)
    }

    async fn update_product(
        &self,
        id: i64,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(builder::UPDATE_PRODUCT)
            .bind(id)
            .bind(&req.product_code)
            .bind(&req.name)
            .bind(req.price)
            .bind(req.quantity)
            .bind(&req.category)
            .bind(&req.description)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to update product ID {}: {:?}", id, err);
                RepositoryError::from(err)
            })?;

        let Some(product) = result else {
            warn!("⚠️ Product ID {} not found for update", id);
            return Err(RepositoryError::NotFound);
        };

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("🔄 Updated product ID {}", product.id);
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(builder::DELETE_PRODUCT)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete product ID {}: {:?}", id, err);
                RepositoryError::from(err)
            })?;

        if result.rows_affected() == 0 {
            warn!("⚠️ Product ID {} not found for deletion", id);
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("🗑️ Deleted product ID {}", id);
        Ok(())
    }
}
