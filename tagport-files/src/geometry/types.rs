use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::ConversionError;
use crate::common::slots::SlotTable;
use crate::common::types::{CacheAddressType, TagBlock};
use crate::converter::resource::ResourceHandle;
use crate::index::types::{IndexBufferDefinition, IndexBufferSlots, IndexSlot};
use crate::vertex::types::{VertexBufferDefinition, VertexBufferSlots, VertexSlot};

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct MeshFlags: u8 {
        const HAS_VERTEX_COLOR = 1 << 0;
        const USE_REGION_INDEX_FOR_SORTING = 1 << 1;
        const CAN_BE_RENDERED_IN_DRAW_BUNDLES = 1 << 2;
        const IS_CUSTOM_SHADOW_CASTER = 1 << 3;
        /// no authoritative index buffer, the parts' index counts describe the draw
        const IS_UNINDEXED = 1 << 4;
        const SHOULD_RENDER_IN_Z_PREPASS = 1 << 5;
        const HAS_WATER = 1 << 6;
        const HAS_DECAL = 1 << 7;
    }
}

impl Default for MeshFlags {
    fn default() -> Self {
        MeshFlags::empty()
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PartFlags: u8 {
        const CAN_BE_RENDERED_IN_DRAW_BUNDLES = 1 << 0;
        const PER_VERTEX_LIGHTMAP_PART = 1 << 1;
        const RENDER_IN_Z_PREPASS = 1 << 2;
        const IS_WATER_PART = 1 << 3;
        const DRAW_CULL_DISTANCE_MEDIUM = 1 << 4;
        const DRAW_CULL_DISTANCE_CLOSE = 1 << 5;
        const DRAW_CULL_RENDERING_SHIELDS = 1 << 6;
        const DRAW_CULL_RENDERING_ACTIVE_CAMO = 1 << 7;
    }
}

impl Default for PartFlags {
    fn default() -> Self {
        PartFlags::empty()
    }
}

/// The vertex type of a mesh.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
pub enum VertexType {
    #[default]
    World = 0,
    Rigid,
    Skinned,
    ParticleModel,
    FlatWorld,
    FlatRigid,
    FlatSkinned,
    Screen,
    Debug,
    Transparent,
    Particle,
    Contrail,
    LightVolume,
    SimpleChud,
    FancyChud,
    Decorator,
    TinyPosition,
    PatchyFog,
    Water,
    Ripple,
    Implicit,
    Beam,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
pub enum PrtShType {
    #[default]
    None = 0,
    Ambient,
    Linear,
    Quadratic,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
pub enum PartType {
    NotDrawn = 0,
    OpaqueShadowOnly,
    #[default]
    OpaqueShadowCasting,
    OpaqueNonshadowing,
    Transparent,
    LightmapOnly,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part {
    pub material_index: i16,
    pub transparent_sorting_index: i16,
    /// offset into the mesh index space, as stored by the source cache
    pub first_index_old: u16,
    pub index_count_old: u16,
    pub first_subpart_index: i16,
    pub subpart_count: i16,
    pub part_type: PartType,
    pub flags: PartFlags,
    pub vertex_count: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPart {
    pub first_index: u32,
    pub index_count: u32,
    pub part_index: i16,
    pub vertex_count: u16,
}

/// A water part's window into the mesh index space. Only lives during the water reconstruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WaterPartRange {
    pub offset: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub flags: MeshFlags,
    pub vertex_type: VertexType,
    pub prt_type: PrtShType,
    pub parts: Vec<Part>,
    pub sub_parts: Vec<SubPart>,
    /// references into the resource definition tables
    pub vertex_buffer_indices: SlotTable<VertexSlot, u16>,
    pub index_buffer_indices: SlotTable<IndexSlot, u16>,
    /// buffers bound from the resource definition, see `RenderGeometry::bind_resource_buffers`
    pub vertex_buffers: VertexBufferSlots,
    pub index_buffers: IndexBufferSlots,
}

impl Mesh {
    pub fn is_unindexed(&self) -> bool {
        self.flags.contains(MeshFlags::IS_UNINDEXED)
    }

    pub fn has_water_buffers(&self) -> bool {
        self.vertex_buffers.is_set(VertexSlot::WaterIndices) && self.vertex_buffers.is_set(VertexSlot::WaterParameters)
    }

    /// Sum of all sub part index counts: the size of the whole mesh index space.
    pub fn total_index_count(&self) -> Result<usize, ConversionError> {
        if self.sub_parts.is_empty() {
            return Err(ConversionError::structural(
                "mesh has no sub parts to derive its index count from",
            ));
        }

        Ok(self
            .sub_parts
            .iter()
            .map(|sub_part| sub_part.index_count as usize)
            .sum())
    }

    pub fn part_index_count(&self) -> usize {
        self.parts.iter().map(|part| part.index_count_old as usize).sum()
    }

    /// Water parts in ascending offset order. Equal offsets keep their part order.
    pub fn water_part_ranges(&self) -> Vec<WaterPartRange> {
        let mut ranges: Vec<WaterPartRange> = self
            .parts
            .iter()
            .filter(|part| part.flags.contains(PartFlags::IS_WATER_PART))
            .map(|part| WaterPartRange {
                offset: part.first_index_old as usize,
                count: part.index_count_old as usize,
            })
            .collect();

        if ranges.len() > 1 {
            ranges.sort_by_key(|range| range.offset);
        }

        ranges
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnknownBlock {
    /// opaque words, rewritten into the target byte order
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterVisibility {
    pub mopp_data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct PerPixelLighting {
    pub vertex_buffer_index: Option<u16>,
    pub vertex_buffer: Option<VertexBufferDefinition>,
}

#[derive(Debug, Clone, Default)]
pub struct RenderGeometry {
    pub meshes: Vec<Mesh>,
    pub unknown_blocks: Vec<UnknownBlock>,
    pub mesh_cluster_visibility: Vec<ClusterVisibility>,
    pub instanced_geometry_per_pixel_lighting: Vec<PerPixelLighting>,
    pub resource: Option<ResourceHandle>,
    /// set when the resource definition had to be made up because the source had none
    pub resource_synthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderGeometryResourceDefinition {
    pub vertex_buffers: TagBlock<VertexBufferDefinition>,
    pub index_buffers: TagBlock<IndexBufferDefinition>,
}

impl RenderGeometryResourceDefinition {
    pub fn empty() -> Self {
        RenderGeometryResourceDefinition {
            vertex_buffers: TagBlock::new(CacheAddressType::Definition),
            index_buffers: TagBlock::new(CacheAddressType::Definition),
        }
    }
}
