pub mod aggregate;
pub mod price;

pub use aggregate::{Dimensions, Product, ProductId, ProductQuestion, ProductVariant, SeoMeta};
pub use price::{DiscountType, PriceBreakdown};
