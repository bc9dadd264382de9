pub mod converter;
pub mod types;
