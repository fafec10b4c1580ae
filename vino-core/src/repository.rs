use async_trait::async_trait;
use vino_catalog::{NewProduct, Product};

use crate::search::ProductQuery;
use crate::CoreResult;

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `query`, ordered by name and capped at its limit.
    async fn search_products(&self, query: &ProductQuery) -> CoreResult<Vec<Product>>;

    async fn get_product(&self, pid: &str) -> CoreResult<Option<Product>>;

    /// Persist a product. Fails with `CoreError::Conflict` when the pid is taken.
    async fn create_product(&self, product: NewProduct) -> CoreResult<Product>;
}
