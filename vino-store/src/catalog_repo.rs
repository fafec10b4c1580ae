use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use vino_catalog::{ActivationWindow, NewProduct, Product, Promotion, PromotionKind, StockStatus};
use vino_core::{CoreError, CoreResult, ProductQuery, ProductRepository};

const PRODUCT_COLUMNS: &str = "id, pid, name, winery, varietal, year, photo_url, description, \
    price_list, promo_type, promo_value, promo_valid_from, promo_valid_to, stock_status";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    pid: String,
    name: String,
    winery: Option<String>,
    varietal: Option<String>,
    year: Option<i32>,
    photo_url: Option<String>,
    description: Option<String>,
    price_list: Decimal,
    promo_type: Option<String>,
    promo_value: Option<Decimal>,
    promo_valid_from: Option<DateTime<Utc>>,
    promo_valid_to: Option<DateTime<Utc>>,
    stock_status: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = CoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock_status: StockStatus = row
            .stock_status
            .parse()
            .map_err(|err| CoreError::InternalError(format!("product {}: {}", row.pid, err)))?;

        Ok(Product {
            id: row.id,
            pid: row.pid,
            name: row.name,
            winery: row.winery,
            varietal: row.varietal,
            year: row.year,
            photo_url: row.photo_url,
            description: row.description,
            list_price: row.price_list,
            promotion: Promotion {
                kind: row.promo_type.as_deref().map(PromotionKind::parse),
                magnitude: row.promo_value,
                window: ActivationWindow {
                    starts_at: row.promo_valid_from,
                    ends_at: row.promo_valid_to,
                },
            },
            stock_status,
        })
    }
}

/// `%term%` with LIKE wildcards in the term matched literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn database_error(err: sqlx::Error) -> CoreError {
    tracing::error!("Product query failed: {:?}", err);
    CoreError::InternalError(err.to_string())
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn search_products(&self, query: &ProductQuery) -> CoreResult<Vec<Product>> {
        let pattern = query.term().map(like_pattern);

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products \
             WHERE $1::TEXT IS NULL OR name ILIKE $1 OR winery ILIKE $1 OR varietal ILIKE $1 \
             ORDER BY name LIMIT $2",
            PRODUCT_COLUMNS
        ))
        .bind(pattern)
        .bind(i64::from(query.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, pid: &str) -> CoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE pid = $1",
            PRODUCT_COLUMNS
        ))
        .bind(pid)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Product::try_from).transpose()
    }

    async fn create_product(&self, product: NewProduct) -> CoreResult<Product> {
        product.validate()?;

        let promotion = &product.promotion;
        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (pid, name, winery, varietal, year, photo_url, description,
                price_list, promo_type, promo_value, promo_valid_from, promo_valid_to, stock_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.pid)
        .bind(&product.name)
        .bind(&product.winery)
        .bind(&product.varietal)
        .bind(product.year)
        .bind(&product.photo_url)
        .bind(&product.description)
        .bind(product.list_price)
        .bind(promotion.kind.as_ref().map(|kind| kind.as_str().to_string()))
        .bind(promotion.magnitude)
        .bind(promotion.window.starts_at)
        .bind(promotion.window.ends_at)
        .bind(product.stock_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                CoreError::Conflict(format!("pid {} already exists", product.pid))
            }
            other => database_error(other),
        })?;

        Product::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(stock_status: &str, promo_type: Option<&str>) -> ProductRow {
        ProductRow {
            id: 3,
            pid: "CAB-2019-GR".to_string(),
            name: "Cabernet Gran Reserva".to_string(),
            winery: Some("Altos del Valle".to_string()),
            varietal: Some("Cabernet Sauvignon".to_string()),
            year: Some(2019),
            photo_url: None,
            description: None,
            price_list: dec!(89.90),
            promo_type: promo_type.map(str::to_string),
            promo_value: Some(dec!(10.00)),
            promo_valid_from: None,
            promo_valid_to: None,
            stock_status: stock_status.to_string(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let product = Product::try_from(row("out", Some("two_for"))).unwrap();
        assert_eq!(product.stock_status, StockStatus::Out);
        assert_eq!(product.promotion.kind, Some(PromotionKind::TwoForPrice));
        assert_eq!(product.list_price, dec!(89.90));

        let product = Product::try_from(row("available", None)).unwrap();
        assert_eq!(product.promotion.kind, None);
        assert_eq!(product.promotion.magnitude, Some(dec!(10.00)));
    }

    #[test]
    fn test_row_with_unknown_stock_status_is_rejected() {
        let result = Product::try_from(row("discontinued", None));
        assert!(matches!(result, Err(CoreError::InternalError(_))));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("malbec"), "%malbec%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
