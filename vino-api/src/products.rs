use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use vino_catalog::PricedProduct;
use vino_core::ProductQuery;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{pid}", get(get_product))
}

/// GET /api/products?q=&limit=
/// Catalog search, every product priced at the same instant
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<PricedProduct>>, AppError> {
    query.validate()?;

    let products = state.products.search_products(&query).await?;
    let now = state.clock.now();
    tracing::debug!(term = ?query.term(), limit = query.limit, found = products.len(), "Catalog search");

    let priced = products
        .into_iter()
        .map(|product| PricedProduct::at(product, now))
        .collect();

    Ok(Json(priced))
}

/// GET /api/products/{pid}
async fn get_product(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<Json<PricedProduct>, AppError> {
    let product = state
        .products
        .get_product(&pid)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Product {} not found", pid)))?;

    Ok(Json(PricedProduct::at(product, state.clock.now())))
}
