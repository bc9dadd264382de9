pub mod binding;
pub mod types;
