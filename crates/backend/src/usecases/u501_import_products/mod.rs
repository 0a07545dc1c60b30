pub mod category_matcher;
pub mod error;
pub mod executor;
pub mod header_map;
pub mod normalizer;
pub mod price;
pub mod sink;
pub mod sku;
pub mod spreadsheet;

pub use error::ImportError;
pub use executor::{ImportExecutor, ProductSink};
