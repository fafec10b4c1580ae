use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use vino_catalog::{
    ActivationWindow, NewProduct, PricedProduct, ProductError, Promotion, PromotionKind,
    StockStatus,
};

use crate::{error::AppError, middleware::admin_token_middleware, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub pid: String,
    pub name: String,
    pub winery: Option<String>,
    pub varietal: Option<String>,
    pub year: Option<i32>,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    pub price_list: Decimal,
    pub promo_type: Option<String>,
    pub promo_value: Option<Decimal>,
    pub promo_valid_from: Option<DateTime<Utc>>,
    pub promo_valid_to: Option<DateTime<Utc>>,
    pub stock_status: Option<String>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = ProductError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        let stock_status = match req.stock_status.as_deref() {
            Some(raw) => raw.parse()?,
            None => StockStatus::default(),
        };

        let kind = req
            .promo_type
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(PromotionKind::parse);

        let product = NewProduct {
            pid: req.pid,
            name: req.name,
            winery: req.winery,
            varietal: req.varietal,
            year: req.year,
            photo_url: req.photo_url,
            description: req.description,
            list_price: req.price_list,
            promotion: Promotion {
                kind,
                magnitude: req.promo_value,
                window: ActivationWindow {
                    starts_at: req.promo_valid_from,
                    ends_at: req.promo_valid_to,
                },
            },
            stock_status,
        };
        product.validate()?;

        Ok(product)
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/products", post(create_product))
        .route_layer(axum::middleware::from_fn_with_state(state, admin_token_middleware))
}

// ============================================================================
// Product Management Handlers
// ============================================================================

/// POST /api/admin/products
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<PricedProduct>, AppError> {
    let new_product = NewProduct::try_from(req)?;
    if let Some(kind) = new_product.promotion.kind.as_ref().filter(|k| !k.is_recognized()) {
        tracing::warn!(pid = %new_product.pid, kind = %kind, "Storing unrecognized promotion kind; it will not affect pricing");
    }

    let product = state.products.create_product(new_product).await?;
    tracing::info!(pid = %product.pid, id = product.id, "Created product");

    Ok(Json(PricedProduct::at(product, state.clock.now())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> CreateProductRequest {
        serde_json::from_value(serde_json::json!({
            "pid": "MAL-RES-21",
            "name": "Malbec Reserva",
            "price_list": 100.00,
            "promo_type": "two_for",
            "promo_value": "150.00",
            "promo_valid_from": "2025-06-01T00:00:00Z"
        }))
        .expect("Failed to deserialize")
    }

    #[test]
    fn test_request_conversion() {
        let product = NewProduct::try_from(request()).unwrap();
        assert_eq!(product.list_price, dec!(100));
        assert_eq!(product.stock_status, StockStatus::Available);
        assert_eq!(product.promotion.kind, Some(PromotionKind::TwoForPrice));
        assert_eq!(product.promotion.magnitude, Some(dec!(150.00)));
        assert!(product.promotion.window.starts_at.is_some());
        assert!(product.promotion.window.ends_at.is_none());
    }

    #[test]
    fn test_blank_promo_type_is_absent() {
        let mut req = request();
        req.promo_type = Some("  ".to_string());
        let product = NewProduct::try_from(req).unwrap();
        assert_eq!(product.promotion.kind, None);
    }

    #[test]
    fn test_request_validation() {
        let mut req = request();
        req.stock_status = Some("plenty".to_string());
        assert_eq!(
            NewProduct::try_from(req),
            Err(ProductError::InvalidStockStatus("plenty".to_string()))
        );

        let mut req = request();
        req.pid = "AB".to_string();
        assert_eq!(
            NewProduct::try_from(req),
            Err(ProductError::InvalidPid { length: 2 })
        );
    }
}
