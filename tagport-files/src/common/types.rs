use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tagport_files_derive_parseable::{Emit, Parse};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// The cache file dialects the converter knows about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CacheVersion {
    Halo3Retail,
    Halo3Odst,
    HaloOnline106708,
}

impl CacheVersion {
    pub fn endianness(self) -> Endianness {
        match self {
            // xbox 360 caches
            CacheVersion::Halo3Retail | CacheVersion::Halo3Odst => Endianness::Big,
            CacheVersion::HaloOnline106708 => Endianness::Little,
        }
    }

    pub fn is_gen3(self) -> bool {
        matches!(self, CacheVersion::Halo3Retail | CacheVersion::Halo3Odst)
    }

    pub fn name(self) -> &'static str {
        match self {
            CacheVersion::Halo3Retail => "Halo3Retail",
            CacheVersion::Halo3Odst => "Halo3ODST",
            CacheVersion::HaloOnline106708 => "HaloOnline106708",
        }
    }
}

impl Display for CacheVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            CacheVersion::Halo3Retail,
            CacheVersion::Halo3Odst,
            CacheVersion::HaloOnline106708,
        ]
        .into_iter()
        .find(|version| version.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("Unknown cache version {}", s))
    }
}

/// Where a tag data payload lives once it is written back into a cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CacheAddressType {
    Memory,
    /// inline in the tag definition
    #[default]
    Definition,
    /// persisted resource data
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagData {
    pub data: Vec<u8>,
    pub address_type: CacheAddressType,
}

impl TagData {
    pub fn new(data: Vec<u8>, address_type: CacheAddressType) -> Self {
        TagData { data, address_type }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagBlock<T> {
    pub address_type: CacheAddressType,
    pub elements: Vec<T>,
}

impl<T> Default for TagBlock<T> {
    fn default() -> Self {
        TagBlock::new(CacheAddressType::default())
    }
}

impl<T> TagBlock<T> {
    pub fn new(address_type: CacheAddressType) -> Self {
        TagBlock {
            address_type,
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn push(&mut self, element: T) {
        self.elements.push(element);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct RealPoint2d {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct RealPoint3d {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct RealVector3d {
    pub i: f32,
    pub j: f32,
    pub k: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct RealQuaternion {
    pub i: f32,
    pub j: f32,
    pub k: f32,
    pub w: f32,
}
