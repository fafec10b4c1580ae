use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use vino_catalog::{NewProduct, Product};
use vino_core::{CoreError, CoreResult, ProductQuery, ProductRepository};

/// Process-local catalog with the same lookup rules as the Postgres store
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn search_products(&self, query: &ProductQuery) -> CoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let term = query.term();

        let mut matches: Vec<Product> = products
            .iter()
            .filter(|p| term.map(|t| p.matches_term(t)).unwrap_or(true))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(query.limit as usize);

        Ok(matches)
    }

    async fn get_product(&self, pid: &str) -> CoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.pid == pid).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> CoreResult<Product> {
        product.validate()?;

        let mut products = self.products.write().await;
        if products.iter().any(|p| p.pid == product.pid) {
            return Err(CoreError::Conflict(format!("pid {} already exists", product.pid)));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = product.into_product(id);
        products.push(product.clone());

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use vino_catalog::{Promotion, StockStatus};

    fn wine(pid: &str, name: &str, winery: &str, varietal: &str) -> NewProduct {
        NewProduct {
            pid: pid.to_string(),
            name: name.to_string(),
            winery: Some(winery.to_string()),
            varietal: Some(varietal.to_string()),
            year: None,
            photo_url: None,
            description: None,
            list_price: dec!(20.00),
            promotion: Promotion::none(),
            stock_status: StockStatus::Available,
        }
    }

    async fn seeded() -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        repo.create_product(wine("TOR-0001", "Torrontés Joven", "Cafayate Sur", "Torrontés")).await.unwrap();
        repo.create_product(wine("MAL-0001", "Malbec Clásico", "Bodega Norte", "Malbec")).await.unwrap();
        repo.create_product(wine("BLD-0001", "Blend de Altura", "Bodega Norte", "Malbec-Syrah")).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_search_orders_by_name_and_limits() {
        let repo = seeded().await;

        let all = repo.search_products(&ProductQuery::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blend de Altura", "Malbec Clásico", "Torrontés Joven"]);

        let query = ProductQuery { q: None, limit: 2 };
        assert_eq!(repo.search_products(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_name_winery_and_varietal() {
        let repo = seeded().await;

        let query = ProductQuery { q: Some("malbec".to_string()), limit: 20 };
        let pids: Vec<String> = repo
            .search_products(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.pid)
            .collect();
        assert_eq!(pids, vec!["BLD-0001", "MAL-0001"]);

        let query = ProductQuery { q: Some("CAFAYATE".to_string()), limit: 20 };
        assert_eq!(repo.search_products(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_rejects_duplicates() {
        let repo = seeded().await;
        assert_eq!(repo.len().await, 3);

        let fetched = repo.get_product("MAL-0001").await.unwrap().unwrap();
        assert_eq!(fetched.id, 2);

        let duplicate = repo
            .create_product(wine("MAL-0001", "Otro", "Otra", "Malbec"))
            .await;
        assert!(matches!(duplicate, Err(CoreError::Conflict(_))));
        assert!(repo.get_product("NOPE-0001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_validates() {
        let repo = InMemoryProductRepository::new();
        let result = repo.create_product(wine("ABC", "Corto", "X", "Y")).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert!(repo.is_empty().await);
    }
}
