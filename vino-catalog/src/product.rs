use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const PID_MIN_LEN: usize = 6;
pub const PID_MAX_LEN: usize = 24;
pub const NAME_MAX_LEN: usize = 120;
/// Fraction digits stored for list prices and promotion magnitudes.
pub const AMOUNT_SCALE: u32 = 2;
/// Whole-number digits stored for amounts (`NUMERIC(10, 2)`).
const AMOUNT_INTEGER_DIGITS: u32 = 8;

/// How a promotion discount is computed.
///
/// Kinds the catalog does not know are kept verbatim in `Unrecognized` so the
/// stored value survives a round trip; they never change the price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromotionKind {
    /// Magnitude is a percentage off the list price (15 means 15% off).
    Percent,
    /// Magnitude is the total price for two units.
    TwoForPrice,
    Unrecognized(String),
}

impl PromotionKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "percent" => PromotionKind::Percent,
            // `two_for` is the spelling older catalog rows were written with
            "two-for-price" | "two_for" => PromotionKind::TwoForPrice,
            other => PromotionKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PromotionKind::Percent => "percent",
            PromotionKind::TwoForPrice => "two-for-price",
            PromotionKind::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, PromotionKind::Unrecognized(_))
    }
}

impl From<String> for PromotionKind {
    fn from(raw: String) -> Self {
        PromotionKind::parse(&raw)
    }
}

impl From<PromotionKind> for String {
    fn from(kind: PromotionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed interval during which a promotion applies. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationWindow {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl ActivationWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }

    pub fn starting(starts_at: DateTime<Utc>) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: None,
        }
    }

    pub fn until(ends_at: DateTime<Utc>) -> Self {
        Self {
            starts_at: None,
            ends_at: Some(ends_at),
        }
    }
}

/// Promotion columns of a product row, each independently nullable.
///
/// When `kind` is `None` the magnitude and window are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub kind: Option<PromotionKind>,
    pub magnitude: Option<Decimal>,
    #[serde(default)]
    pub window: ActivationWindow,
}

impl Promotion {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn percent(value: Decimal) -> Self {
        Self {
            kind: Some(PromotionKind::Percent),
            magnitude: Some(value),
            window: ActivationWindow::unbounded(),
        }
    }

    pub fn two_for_price(total_for_two: Decimal) -> Self {
        Self {
            kind: Some(PromotionKind::TwoForPrice),
            magnitude: Some(total_for_two),
            window: ActivationWindow::unbounded(),
        }
    }

    pub fn within(mut self, window: ActivationWindow) -> Self {
        self.window = window;
        self
    }
}

/// Stock availability shown next to a product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    Available,
    Low,
    Out,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Available => "available",
            StockStatus::Low => "low",
            StockStatus::Out => "out",
        }
    }
}

impl FromStr for StockStatus {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(StockStatus::Available),
            "low" => Ok(StockStatus::Low),
            "out" => Ok(StockStatus::Out),
            other => Err(ProductError::InvalidStockStatus(other.to_string())),
        }
    }
}

/// A wine as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub pid: String,
    pub name: String,
    pub winery: Option<String>,
    pub varietal: Option<String>,
    pub year: Option<i32>,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    pub list_price: Decimal,
    pub promotion: Promotion,
    pub stock_status: StockStatus,
}

impl Product {
    /// Case-insensitive substring match on name, winery or varietal.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let hit = |field: Option<&str>| {
            field
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };

        hit(Some(&self.name)) || hit(self.winery.as_deref()) || hit(self.varietal.as_deref())
    }
}

/// A product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub pid: String,
    pub name: String,
    pub winery: Option<String>,
    pub varietal: Option<String>,
    pub year: Option<i32>,
    pub photo_url: Option<String>,
    pub description: Option<String>,
    pub list_price: Decimal,
    pub promotion: Promotion,
    pub stock_status: StockStatus,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ProductError> {
        let pid_len = self.pid.chars().count();
        if !(PID_MIN_LEN..=PID_MAX_LEN).contains(&pid_len) {
            return Err(ProductError::InvalidPid { length: pid_len });
        }

        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(ProductError::NameTooLong(NAME_MAX_LEN));
        }

        if self.list_price < Decimal::ZERO {
            return Err(ProductError::NegativeListPrice(self.list_price));
        }
        check_amount("list price", self.list_price)?;
        if let Some(magnitude) = self.promotion.magnitude {
            check_amount("promotion value", magnitude)?;
        }

        Ok(())
    }

    /// Attach the identifier assigned by the store.
    ///
    /// Amounts are stored at `AMOUNT_SCALE`, exactly as the products table
    /// returns them; call on validated input only.
    pub fn into_product(self, id: i64) -> Product {
        let mut list_price = self.list_price;
        list_price.rescale(AMOUNT_SCALE);
        let mut promotion = self.promotion;
        if let Some(magnitude) = promotion.magnitude.as_mut() {
            magnitude.rescale(AMOUNT_SCALE);
        }

        Product {
            id,
            pid: self.pid,
            name: self.name,
            winery: self.winery,
            varietal: self.varietal,
            year: self.year,
            photo_url: self.photo_url,
            description: self.description,
            list_price,
            promotion,
            stock_status: self.stock_status,
        }
    }
}

fn check_amount(field: &'static str, value: Decimal) -> Result<(), ProductError> {
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(ProductError::TooManyDecimals { field, value });
    }
    if value.abs() >= Decimal::from(10u64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(ProductError::AmountOutOfRange { field, value });
    }
    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("pid must be between 6 and 24 characters, got {length}")]
    InvalidPid { length: usize },

    #[error("name must not be empty")]
    EmptyName,

    #[error("name must be at most {0} characters")]
    NameTooLong(usize),

    #[error("list price must not be negative: {0}")]
    NegativeListPrice(Decimal),

    #[error("{field} must have at most 2 decimal places: {value}")]
    TooManyDecimals { field: &'static str, value: Decimal },

    #[error("{field} must be below 100000000: {value}")]
    AmountOutOfRange { field: &'static str, value: Decimal },

    #[error("unknown stock status: {0}")]
    InvalidStockStatus(String),
}
