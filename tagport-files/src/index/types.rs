use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::common::slots::{Slot, SlotTable};
use crate::common::types::TagData;

/// Primitive topology of an index buffer.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
pub enum IndexBufferFormat {
    PointList = 0,
    LineList = 1,
    LineStrip = 2,
    #[default]
    TriangleList = 3,
    TrianglePatch = 4,
    TriangleStrip = 5,
    QuadList = 6,
}

pub const INDEX_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBufferDefinition {
    pub format: IndexBufferFormat,
    /// 16 bit indices
    pub data: TagData,
}

impl IndexBufferDefinition {
    pub fn count(&self) -> usize {
        self.data.len() / INDEX_SIZE
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexSlot {
    Primary,
    Secondary,
}

impl Slot for IndexSlot {
    const ALL: &'static [IndexSlot] = &[IndexSlot::Primary, IndexSlot::Secondary];

    fn position(self) -> usize {
        self as usize
    }
}

pub type IndexBufferSlots = SlotTable<IndexSlot, IndexBufferDefinition>;
