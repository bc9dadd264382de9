use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::common::slots::{Slot, SlotTable};
use crate::common::types::TagData;

#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum VertexBufferFormat {
    Invalid = 0x00,
    World = 0x01,
    Rigid = 0x02,
    Skinned = 0x03,
    StaticPerPixel = 0x04,
    Unknown5 = 0x05,
    StaticPerVertex = 0x06,
    Unknown7 = 0x07,
    Unused8 = 0x08,
    AmbientPrt = 0x09,
    LinearPrt = 0x0A,
    QuadraticPrt = 0x0B,
    UnknownC = 0x0C,
    UnknownD = 0x0D,
    StaticPerVertexColor = 0x0E,
    UnknownF = 0x0F,
    Unused10 = 0x10,
    Unused11 = 0x11,
    Unused12 = 0x12,
    Unused13 = 0x13,
    TinyPosition = 0x14,
    Unknown15 = 0x15,
    Unknown16 = 0x16,
    Unknown17 = 0x17,
    Decorator = 0x18,
    ParticleModel = 0x19,
    /// per-triangle water vertex and parameter indices, gen3 only
    WaterTriangleIndices = 0x1A,
    WaterParameters = 0x1B,
    Unknown1C = 0x1C,
    Unused1D = 0x1D,
    World2 = 0x1E,
}

impl VertexBufferFormat {
    /// Formats that only the water reconstruction may touch.
    pub fn is_water(self) -> bool {
        matches!(
            self,
            VertexBufferFormat::WaterTriangleIndices | VertexBufferFormat::WaterParameters
        )
    }

    pub fn from_name(name: &str) -> Option<VertexBufferFormat> {
        (0u16..=0x1E)
            .filter_map(|raw| VertexBufferFormat::try_from(raw).ok())
            .find(|format| format!("{:?}", format).eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferDefinition {
    pub format: VertexBufferFormat,
    /// bytes per element
    pub vertex_size: u16,
    /// element count
    pub count: u32,
    pub data: TagData,
}

impl VertexBufferDefinition {
    pub fn expected_data_len(&self) -> usize {
        self.vertex_size as usize * self.count as usize
    }
}

/// The eight vertex streams of a mesh. Their meaning is positional and fixed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexSlot {
    /// the world/rigid/skinned vertices every other stream is aligned to
    Primary,
    Stream1,
    Stream2,
    Stream3,
    Stream4,
    Stream5,
    WaterIndices,
    WaterParameters,
}

impl Slot for VertexSlot {
    const ALL: &'static [VertexSlot] = &[
        VertexSlot::Primary,
        VertexSlot::Stream1,
        VertexSlot::Stream2,
        VertexSlot::Stream3,
        VertexSlot::Stream4,
        VertexSlot::Stream5,
        VertexSlot::WaterIndices,
        VertexSlot::WaterParameters,
    ];

    fn position(self) -> usize {
        self as usize
    }
}

pub type VertexBufferSlots = SlotTable<VertexSlot, VertexBufferDefinition>;
