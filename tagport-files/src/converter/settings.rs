use crate::common::types::CacheVersion;

/// What happens to a vertex buffer whose format the codec cannot convert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum UnsupportedFormatPolicy {
    /// keep the source bytes and log a warning
    #[default]
    PassThrough,
    /// fail the whole geometry
    Reject,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConversionSettings {
    pub source_version: CacheVersion,
    pub target_version: CacheVersion,
    pub unsupported_formats: UnsupportedFormatPolicy,
}

impl ConversionSettings {
    pub fn new(source_version: CacheVersion, target_version: CacheVersion) -> Self {
        ConversionSettings {
            source_version,
            target_version,
            unsupported_formats: UnsupportedFormatPolicy::default(),
        }
    }

    pub fn with_unsupported_formats(mut self, policy: UnsupportedFormatPolicy) -> Self {
        self.unsupported_formats = policy;
        self
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        ConversionSettings::new(CacheVersion::Halo3Retail, CacheVersion::HaloOnline106708)
    }
}
