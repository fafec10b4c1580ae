pub mod product;
pub mod promotion;
pub mod pricing;

pub use product::{
    ActivationWindow, NewProduct, Product, ProductError, Promotion, PromotionKind, StockStatus,
};
pub use pricing::{quote, resolve, AppliedPromotion, PriceQuote, PricedProduct};
pub use promotion::is_active;
