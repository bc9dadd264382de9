use std::io::{Cursor, Seek, Write};

use log::debug;

use crate::{ConversionError, ParserError};
use crate::common::reader::{EndianReader, read_record_array};
use crate::common::types::{CacheAddressType, CacheVersion, TagData};
use crate::common::writer::{EndianWriter, debug_filled};
use crate::geometry::types::{Mesh, WaterPartRange};
use crate::vertex::codec::VertexStreamCodec;
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat, VertexSlot};

/// Stride of a world-water vertex in Halo Online. The record itself is smaller, the existing
/// Halo Online data uses this stride, so it has to stay.
pub const WORLD_WATER_VERTEX_STRIDE: u16 = 0x38;
/// Stride of a water parameter record in Halo Online, zero padded from 0x18.
pub const WATER_PARAMETER_STRIDE: u16 = 0x24;

/// Rebuilds the two Halo Online water streams of a mesh from the gen3 world vertices,
/// per triangle index groups and de-duplicated parameter records.
pub struct WaterGeometryReconstructor<'a, C: VertexStreamCodec> {
    codec: &'a C,
    source_version: CacheVersion,
    target_version: CacheVersion,
}

fn decode_all<C, T, F>(
    codec: &C,
    buffer: &VertexBufferDefinition,
    version: CacheVersion,
    read: F,
) -> Result<Vec<T>, ConversionError>
where
    C: VertexStreamCodec,
    F: FnMut(&mut EndianReader<Cursor<&[u8]>>) -> Result<T, ParserError>,
{
    let element_size = codec
        .element_size(version, buffer.format)
        .filter(|&size| size > 0)
        .ok_or_else(|| {
            ConversionError::structural(format!(
                "{:?} water input has no element size in {}",
                buffer.format, version
            ))
        })? as usize;

    let count = buffer.count as usize;
    let required = count * element_size;
    if buffer.data.len() < required {
        return Err(ConversionError::structural(format!(
            "{:?} water input holds {} bytes, {} records need {}",
            buffer.format,
            buffer.data.len(),
            count,
            required
        )));
    }

    Ok(read_record_array(&buffer.data.data, version.endianness(), element_size, count, read)?)
}

/// Writes one record at the stream position and zero pads it up to `stride`.
fn write_padded<W, F>(wtr: &mut EndianWriter<W>, stride: u16, write: F) -> Result<(), ConversionError>
where
    W: Write + Seek,
    F: FnOnce(&mut EndianWriter<W>) -> Result<(), ParserError>,
{
    let start = wtr.position()?;
    write(wtr)?;
    let written = (wtr.position()? - start) as usize;
    if written > stride as usize {
        return Err(ConversionError::structural(format!(
            "encoded water record of {} bytes exceeds its {} byte stride",
            written, stride
        )));
    }
    wtr.write_zeroes(stride as usize - written)?;
    Ok(())
}

fn lookup<'r, T>(records: &'r [T], index: usize, what: &str) -> Result<&'r T, ConversionError> {
    records.get(index).ok_or_else(|| {
        ConversionError::structural(format!(
            "{} index {} is out of range, only {} are present",
            what,
            index,
            records.len()
        ))
    })
}

impl<'a, C: VertexStreamCodec> WaterGeometryReconstructor<'a, C> {
    pub fn new(codec: &'a C, source_version: CacheVersion, target_version: CacheVersion) -> Self {
        WaterGeometryReconstructor {
            codec,
            source_version,
            target_version,
        }
    }

    fn validate_ranges(ranges: &[WaterPartRange], total_index_count: usize) -> Result<(), ConversionError> {
        for range in ranges {
            if range.count % 3 != 0 {
                return Err(ConversionError::structural(format!(
                    "water part at index {} has {} indices, which is not a whole number of triangles",
                    range.offset, range.count
                )));
            }

            if range.offset + range.count > total_index_count {
                return Err(ConversionError::structural(format!(
                    "water part [{}, {}) exceeds the mesh index count of {}",
                    range.offset,
                    range.offset + range.count,
                    total_index_count
                )));
            }
        }
        Ok(())
    }

    /// Replaces the water streams of `mesh`. Meshes without both water streams are left alone.
    pub fn reconstruct(&self, mesh: &mut Mesh) -> Result<(), ConversionError> {
        let (Some(triangle_buffer), Some(parameter_buffer)) = (
            mesh.vertex_buffers.get(VertexSlot::WaterIndices),
            mesh.vertex_buffers.get(VertexSlot::WaterParameters),
        ) else {
            return Ok(());
        };

        let primary = mesh.vertex_buffers.get(VertexSlot::Primary).ok_or_else(|| {
            ConversionError::structural("water mesh has no primary vertex buffer to take positions from")
        })?;

        let total_index_count = mesh.total_index_count()?;
        let ranges = mesh.water_part_ranges();
        Self::validate_ranges(&ranges, total_index_count)?;

        // the primary stream was converted already, so it is read like target data
        let world_vertices = decode_all(self.codec, primary, self.target_version, |rdr| {
            self.codec.read_world_vertex(rdr)
        })?;
        let triangles = decode_all(self.codec, triangle_buffer, self.source_version, |rdr| {
            self.codec.read_water_triangle_indices(rdr)
        })?;
        let parameters = decode_all(self.codec, parameter_buffer, self.source_version, |rdr| {
            self.codec.read_water_parameters(rdr)
        })?;

        debug!(
            "Rebuilding water from {} world vertices, {} triangles and {} parameters over {} parts",
            world_vertices.len(),
            triangles.len(),
            parameters.len(),
            ranges.len()
        );

        let endianness = self.target_version.endianness();
        let world_stride = WORLD_WATER_VERTEX_STRIDE as u64;
        let parameter_stride = WATER_PARAMETER_STRIDE as u64;
        let mut world_out = EndianWriter::new(
            Cursor::new(debug_filled(total_index_count * world_stride as usize)),
            endianness,
        );
        let mut parameter_out = EndianWriter::new(
            Cursor::new(debug_filled(total_index_count * parameter_stride as usize)),
            endianness,
        );

        // the triangle records are not split by part, every part continues where the last one stopped
        let mut consumed_triangles = 0usize;
        for range in &ranges {
            world_out.seek_to(range.offset as u64 * world_stride)?;
            parameter_out.seek_to(range.offset as u64 * parameter_stride)?;

            for (triangle_index, _) in (0..range.count).step_by(3).enumerate() {
                let triangle = lookup(&triangles, consumed_triangles + triangle_index, "water triangle")?;
                for corner in 0..3 {
                    let vertex = lookup(&world_vertices, triangle.vertices[corner] as usize, "world vertex")?;
                    let parameter = lookup(&parameters, triangle.indices[corner] as usize, "water parameter")?;

                    write_padded(&mut world_out, WORLD_WATER_VERTEX_STRIDE, |wtr| {
                        self.codec.write_world_water_vertex(wtr, vertex)
                    })?;
                    write_padded(&mut parameter_out, WATER_PARAMETER_STRIDE, |wtr| {
                        self.codec.write_water_parameters(wtr, parameter)
                    })?;
                }
            }

            consumed_triangles += range.count / 3;
        }

        let world_water = VertexBufferDefinition {
            format: VertexBufferFormat::World,
            vertex_size: WORLD_WATER_VERTEX_STRIDE,
            count: total_index_count as u32,
            data: TagData::new(world_out.into_inner().into_inner(), CacheAddressType::Data),
        };
        let water_parameters = VertexBufferDefinition {
            format: VertexBufferFormat::WaterParameters,
            vertex_size: WATER_PARAMETER_STRIDE,
            count: total_index_count as u32,
            data: TagData::new(parameter_out.into_inner().into_inner(), CacheAddressType::Data),
        };

        mesh.vertex_buffers.set(VertexSlot::WaterIndices, Some(world_water));
        mesh.vertex_buffers.set(VertexSlot::WaterParameters, Some(water_parameters));
        Ok(())
    }
}
