pub mod a001_category;
pub mod a002_brand;
pub mod a003_product;
pub mod common;
