use crate::ConversionError;
use crate::common::types::CacheVersion;

/// Converts the havok mopp code of a cluster visibility block between cache versions.
pub trait CollisionDataConverter {
    fn convert(&self, source: CacheVersion, target: CacheVersion, mopp_data: &[u8]) -> Result<Vec<u8>, ConversionError>;
}

impl<F> CollisionDataConverter for F
where
    F: Fn(CacheVersion, CacheVersion, &[u8]) -> Result<Vec<u8>, ConversionError>,
{
    fn convert(&self, source: CacheVersion, target: CacheVersion, mopp_data: &[u8]) -> Result<Vec<u8>, ConversionError> {
        self(source, target, mopp_data)
    }
}
