pub mod codec;
pub mod converter;
pub mod records;
pub mod types;
