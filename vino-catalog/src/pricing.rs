use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::product::{Product, PromotionKind, StockStatus};
use crate::promotion::is_active;

/// Number of fraction digits every displayed price carries.
pub const PRICE_SCALE: u32 = 2;

/// Promotion that produced a quote's final price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AppliedPromotion {
    Percent {
        value: Decimal,
    },
    TwoForPrice {
        total_for_two: Decimal,
        unit_price: Decimal,
    },
}

/// Price shown for one product at one moment. Built on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_final: Decimal,
    pub promo_applied: Option<AppliedPromotion>,
}

impl PriceQuote {
    fn list(list_price: Decimal) -> Self {
        Self {
            price_final: to_price_scale(list_price),
            promo_applied: None,
        }
    }
}

/// Round half-up to two fraction digits and pad so `85` renders as `85.00`.
pub fn to_price_scale(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// Compute the displayed price from list price and promotion fields.
///
/// Time is not considered here: pass `kind = None` when the promotion is
/// inactive. Missing, unknown or out-of-range promotion data yields the list
/// price with no promotion.
pub fn resolve(
    list_price: Decimal,
    kind: Option<&PromotionKind>,
    magnitude: Option<Decimal>,
) -> PriceQuote {
    let (Some(kind), Some(magnitude)) = (kind, magnitude) else {
        return PriceQuote::list(list_price);
    };

    let applied = match kind {
        PromotionKind::Percent => percent_off(list_price, magnitude),
        PromotionKind::TwoForPrice => two_for_price(magnitude),
        PromotionKind::Unrecognized(_) => None,
    };

    applied.unwrap_or_else(|| PriceQuote::list(list_price))
}

fn percent_off(list_price: Decimal, percent: Decimal) -> Option<PriceQuote> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return None;
    }

    let discounted = list_price
        .checked_mul(Decimal::ONE_HUNDRED - percent)?
        .checked_div(Decimal::ONE_HUNDRED)?;

    Some(PriceQuote {
        price_final: to_price_scale(discounted),
        promo_applied: Some(AppliedPromotion::Percent { value: percent }),
    })
}

fn two_for_price(total_for_two: Decimal) -> Option<PriceQuote> {
    if total_for_two < Decimal::ZERO {
        return None;
    }

    let unit_price = to_price_scale(total_for_two.checked_div(Decimal::TWO)?);

    Some(PriceQuote {
        price_final: unit_price,
        promo_applied: Some(AppliedPromotion::TwoForPrice {
            total_for_two,
            unit_price,
        }),
    })
}

/// Price a stored product at `reference_time`.
pub fn quote(product: &Product, reference_time: DateTime<Utc>) -> PriceQuote {
    let promotion = &product.promotion;
    let kind = if is_active(promotion, reference_time) {
        promotion.kind.as_ref()
    } else {
        None
    };

    resolve(product.list_price, kind, promotion.magnitude)
}

/// Product as returned to catalog readers, with its price resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedProduct {
    pub pid: String,
    pub name: String,
    pub winery: Option<String>,
    pub varietal: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub stock_status: StockStatus,
    pub price_list: Decimal,
    pub price_final: Decimal,
    pub promo_applied: Option<AppliedPromotion>,
}

impl PricedProduct {
    pub fn at(product: Product, reference_time: DateTime<Utc>) -> Self {
        let PriceQuote {
            price_final,
            promo_applied,
        } = quote(&product, reference_time);

        Self {
            pid: product.pid,
            name: product.name,
            winery: product.winery,
            varietal: product.varietal,
            year: product.year,
            description: product.description,
            photo_url: product.photo_url,
            stock_status: product.stock_status,
            price_list: product.list_price,
            price_final,
            promo_applied,
        }
    }
}
