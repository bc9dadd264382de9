//! Fixtures shared by the module tests.

use crate::ConversionError;
use crate::common::types::{
    CacheAddressType, CacheVersion, Endianness, RealPoint2d, RealPoint3d, RealQuaternion, RealVector3d, TagData,
};
use crate::common::writer::{EndianWriter, Writable};
use crate::converter::collision::CollisionDataConverter;
use crate::geometry::types::{Mesh, Part, PartFlags, SubPart};
use crate::vertex::records::{
    WATER_PARAMETERS_SIZE, WATER_TRIANGLE_INDICES_SIZE, WORLD_VERTEX_SIZE, WaterParameters, WaterTriangleIndices,
    WorldVertex,
};
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat, VertexSlot};

pub fn world_vertex(seed: u16) -> WorldVertex {
    let base = seed as f32;
    WorldVertex {
        position: RealPoint3d {
            x: base,
            y: base + 0.5,
            z: -base,
        },
        texcoord: RealPoint2d { x: base / 10.0, y: 1.0 },
        normal: RealVector3d { i: 0.0, j: 0.0, k: 1.0 },
        tangent: RealVector3d { i: 1.0, j: 0.0, k: 0.0 },
        binormal: RealVector3d { i: 0.0, j: 1.0, k: 0.0 },
    }
}

pub fn water_parameters(seed: u16) -> WaterParameters {
    let base = seed as f32;
    WaterParameters {
        local_info: RealQuaternion {
            i: base,
            j: base * 2.0,
            k: base * 3.0,
            w: 1.0,
        },
        base_texcoord: RealPoint2d { x: 0.25, y: base },
    }
}

pub fn encode<T: Writable>(records: &[T], endianness: Endianness) -> Vec<u8> {
    let mut wtr = EndianWriter::new(Vec::new(), endianness);
    for record in records {
        record.write(&mut wtr).expect("writing into a Vec cannot fail");
    }
    wtr.into_inner()
}

pub fn vertex_buffer(format: VertexBufferFormat, vertex_size: u16, count: u32, data: Vec<u8>) -> VertexBufferDefinition {
    VertexBufferDefinition {
        format,
        vertex_size,
        count,
        data: TagData::new(data, CacheAddressType::Data),
    }
}

pub fn water_part(first_index: u16, index_count: u16) -> Part {
    Part {
        first_index_old: first_index,
        index_count_old: index_count,
        flags: PartFlags::IS_WATER_PART,
        ..Part::default()
    }
}

pub fn sub_part(first_index: u32, index_count: u32) -> SubPart {
    SubPart {
        first_index,
        index_count,
        ..SubPart::default()
    }
}

/// A mesh with already converted world vertices and gen3 water streams bound to its slots.
pub fn water_mesh(
    parts: Vec<Part>,
    sub_parts: Vec<SubPart>,
    vertex_count: u16,
    triangles: &[WaterTriangleIndices],
    parameter_count: u16,
) -> Mesh {
    let vertices: Vec<WorldVertex> = (0..vertex_count).map(world_vertex).collect();
    let parameters: Vec<WaterParameters> = (0..parameter_count).map(water_parameters).collect();

    let mut mesh = Mesh {
        parts,
        sub_parts,
        ..Mesh::default()
    };
    mesh.vertex_buffers[VertexSlot::Primary] = Some(vertex_buffer(
        VertexBufferFormat::World,
        WORLD_VERTEX_SIZE,
        vertex_count as u32,
        encode(&vertices, CacheVersion::HaloOnline106708.endianness()),
    ));
    mesh.vertex_buffers[VertexSlot::WaterIndices] = Some(vertex_buffer(
        VertexBufferFormat::WaterTriangleIndices,
        WATER_TRIANGLE_INDICES_SIZE,
        triangles.len() as u32,
        encode(triangles, CacheVersion::Halo3Retail.endianness()),
    ));
    mesh.vertex_buffers[VertexSlot::WaterParameters] = Some(vertex_buffer(
        VertexBufferFormat::WaterParameters,
        WATER_PARAMETERS_SIZE,
        parameter_count as u32,
        encode(&parameters, CacheVersion::Halo3Retail.endianness()),
    ));
    mesh
}

/// Stands in for the havok converter: reverses the mopp bytes so the call is observable.
pub struct ReversingCollision;

impl CollisionDataConverter for ReversingCollision {
    fn convert(&self, _source: CacheVersion, _target: CacheVersion, mopp_data: &[u8]) -> Result<Vec<u8>, ConversionError> {
        Ok(mopp_data.iter().rev().copied().collect())
    }
}
