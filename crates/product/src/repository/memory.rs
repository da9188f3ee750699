//! In-memory stand-in for the PostgreSQL repositories, used by service and
//! handler tests. Mirrors the store's semantics: ids ascend from 1, the
//! product code is unique, and `created_at` is set on insert only.

use crate::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    domain::requests::product::{PageRequest, ProductFilter, SaveProductRequest},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

#[derive(Default)]
pub struct InMemoryProductRepository {
    rows: Mutex<Vec<ProductModel>>,
    next_id: Mutex<i64>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a database-style error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent read fail with a database-style error.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn snapshot(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("connection refused".into()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("connection reset".into()));
        }
        Ok(())
    }

    fn matches(product: &ProductModel, filter: &ProductFilter) -> bool {
        let name_ok = filter
            .name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .is_none_or(|kw| contains_ignore_case(&product.name, kw));
        let category_ok = filter
            .category
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .is_none_or(|c| product.category == c);
        let min_ok = filter.min_price.is_none_or(|min| product.price >= min);
        let max_ok = filter.max_price.is_none_or(|max| product.price <= max);
        name_ok && category_ok && min_ok && max_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        self.snapshot()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, RepositoryError> {
        Ok(self.snapshot()?.into_iter().find(|p| p.id == id))
    }

    async fn find_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    async fn find_by_category_order_by_price(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut products = self.find_by_category(category).await?;
        products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn search_by_name(&self, keyword: &str) -> Result<Vec<ProductModel>, RepositoryError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| contains_ignore_case(&p.name, keyword))
            .collect())
    }

    async fn find_by_price_range(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let filter = ProductFilter {
            min_price,
            max_price,
            ..Default::default()
        };
        self.search(&filter).await
    }

    async fn search(&self, filter: &ProductFilter) -> Result<Vec<ProductModel>, RepositoryError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| Self::matches(p, filter))
            .collect())
    }

    async fn search_by_name_paginated(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        let matching = self.search_by_name(keyword).await?;
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    async fn find_all_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let mut categories: Vec<String> =
            self.snapshot()?.into_iter().map(|p| p.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn exists_by_product_code(&self, product_code: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .snapshot()?
            .iter()
            .any(|p| p.product_code == product_code))
    }

    async fn exists_by_product_code_and_id_not(
        &self,
        product_code: &str,
        id: i64,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .snapshot()?
            .iter()
            .any(|p| p.product_code == product_code && p.id != id))
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryProductRepository {
    async fn create_product(
        &self,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.product_code == req.product_code) {
            return Err(RepositoryError::AlreadyExists(
                "violates products_product_code_key".into(),
            ));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let product = ProductModel {
            id: *next_id,
            product_code: req.product_code.clone(),
            name: req.name.clone(),
            price: req.price,
            quantity: req.quantity,
            category: req.category.clone(),
            description: req.description.clone(),
            created_at: Utc::now().naive_utc(),
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        req: &SaveProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.product_code == req.product_code && p.id != id)
        {
            return Err(RepositoryError::AlreadyExists(
                "violates products_product_code_key".into(),
            ));
        }

        let product = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.product_code = req.product_code.clone();
        product.name = req.name.clone();
        product.price = req.price;
        product.quantity = req.quantity;
        product.category = req.category.clone();
        product.description = req.description.clone();

        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> Result<(), RepositoryError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
