use thiserror::Error;

use crate::common::types::CacheVersion;
use crate::vertex::types::VertexBufferFormat;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("The data is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    /// A fixed number of records was requested but the payload ended early.
    #[error("Expected {expected} records, but the payload only holds {available}")]
    UnexpectedEndOfRecords { expected: usize, available: usize },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// Counts, offsets or indices that do not agree with each other or with the buffers they address.
    #[error("Structural inconsistency in the render geometry: {reason}")]
    StructuralInconsistency { reason: String },

    #[error("Vertex buffer format {format:?} cannot be converted from {source_version} to {target_version}")]
    UnsupportedFormatConversion {
        format: VertexBufferFormat,
        source_version: CacheVersion,
        target_version: CacheVersion,
    },

    #[error("Collision data conversion failed: {reason}")]
    CollisionData { reason: String },
}

impl ConversionError {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        ConversionError::StructuralInconsistency { reason: reason.into() }
    }
}

pub mod common;
pub mod converter;
pub mod geometry;
pub mod index;
pub mod vertex;
pub mod water;

#[cfg(test)]
mod test_support;
