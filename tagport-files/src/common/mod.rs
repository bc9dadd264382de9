pub mod endian;
pub mod reader;
pub mod slots;
pub mod types;
pub mod writer;
