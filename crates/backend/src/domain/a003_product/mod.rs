pub mod question_repository;
pub mod repository;
pub mod service;
pub mod variant_repository;
