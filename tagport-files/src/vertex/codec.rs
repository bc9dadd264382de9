use std::io::{Read, Write};

use log::trace;

use crate::common::reader::{EndianReader, Parseable};
use crate::common::types::CacheVersion;
use crate::common::writer::{EndianWriter, Writable};
use crate::vertex::records::{WaterParameters, WaterTriangleIndices, WorldVertex};
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat};
use crate::{ConversionError, ParserError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferConversion {
    Converted,
    /// The codec has no rule for this format, the buffer was left untouched.
    Unsupported,
}

/// Encodes and decodes vertex records for a given cache version. The byte order of a stream
/// is carried by the reader/writer, so record level operations are version agnostic.
pub trait VertexStreamCodec {
    fn element_size(&self, version: CacheVersion, format: VertexBufferFormat) -> Option<u16>;

    fn read_world_vertex<R: Read>(&self, rdr: &mut EndianReader<R>) -> Result<WorldVertex, ParserError>;

    fn read_water_triangle_indices<R: Read>(
        &self,
        rdr: &mut EndianReader<R>,
    ) -> Result<WaterTriangleIndices, ParserError>;

    fn read_water_parameters<R: Read>(&self, rdr: &mut EndianReader<R>) -> Result<WaterParameters, ParserError>;

    fn write_world_water_vertex<W: Write>(
        &self,
        wtr: &mut EndianWriter<W>,
        vertex: &WorldVertex,
    ) -> Result<(), ParserError>;

    fn write_water_parameters<W: Write>(
        &self,
        wtr: &mut EndianWriter<W>,
        parameters: &WaterParameters,
    ) -> Result<(), ParserError>;

    /// Re-encodes `buffer` in place, keeping its count and recomputing size and payload.
    fn convert_buffer(
        &self,
        source: CacheVersion,
        target: CacheVersion,
        buffer: &mut VertexBufferDefinition,
    ) -> Result<BufferConversion, ConversionError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Component {
    F32,
    U32,
    U16,
    U8,
    /// normalized byte, widened to a float where the target wants one
    UNorm8,
}

impl Component {
    pub fn size(self) -> usize {
        match self {
            Component::F32 | Component::U32 => 4,
            Component::U16 => 2,
            Component::U8 | Component::UNorm8 => 1,
        }
    }
}

use Component::{F32, U16, U32, U8, UNorm8};

// position, texcoord, normal, tangent, binormal
const WORLD_LAYOUT: &[Component] = &[F32; 14];

const SKINNED_GEN3_LAYOUT: &[Component] = &[
    F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, // world part
    U8, U8, U8, U8, // node indices
    UNorm8, UNorm8, UNorm8, UNorm8, // node weights
];

const SKINNED_LAYOUT: &[Component] = &[
    F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, F32, // world part
    U8, U8, U8, U8, // node indices
    F32, F32, F32, F32, // node weights
];

// position, texcoord, normal
const PARTICLE_MODEL_LAYOUT: &[Component] = &[F32; 8];
const STATIC_PER_PIXEL_LAYOUT: &[Component] = &[F32; 2];
const STATIC_PER_VERTEX_LAYOUT: &[Component] = &[U32; 5];
const STATIC_PER_VERTEX_COLOR_LAYOUT: &[Component] = &[F32; 3];
// order 0 coefficients are one byte per vertex, no matter how the source sized the buffer
const AMBIENT_PRT_LAYOUT: &[Component] = &[U8];
const LINEAR_PRT_LAYOUT: &[Component] = &[U8; 4];
const QUADRATIC_PRT_LAYOUT: &[Component] = &[F32; 9];
const TINY_POSITION_LAYOUT: &[Component] = &[U16; 4];
const WATER_TRIANGLE_INDICES_LAYOUT: &[Component] = &[U16; 6];
const WATER_PARAMETERS_LAYOUT: &[Component] = &[F32; 6];

/// Table driven codec for the formats both the gen3 and the Halo Online caches use.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardVertexCodec;

impl StandardVertexCodec {
    pub fn layout(version: CacheVersion, format: VertexBufferFormat) -> Option<&'static [Component]> {
        use VertexBufferFormat::*;

        Some(match format {
            World | Rigid => WORLD_LAYOUT,
            Skinned if version.is_gen3() => SKINNED_GEN3_LAYOUT,
            Skinned => SKINNED_LAYOUT,
            StaticPerPixel => STATIC_PER_PIXEL_LAYOUT,
            StaticPerVertex => STATIC_PER_VERTEX_LAYOUT,
            StaticPerVertexColor => STATIC_PER_VERTEX_COLOR_LAYOUT,
            AmbientPrt => AMBIENT_PRT_LAYOUT,
            LinearPrt => LINEAR_PRT_LAYOUT,
            QuadraticPrt => QUADRATIC_PRT_LAYOUT,
            TinyPosition => TINY_POSITION_LAYOUT,
            Decorator | ParticleModel => PARTICLE_MODEL_LAYOUT,
            // Halo Online stores water per index, see the water reconstruction
            WaterTriangleIndices if version.is_gen3() => WATER_TRIANGLE_INDICES_LAYOUT,
            WaterParameters => WATER_PARAMETERS_LAYOUT,
            _ => return None,
        })
    }

    fn convert_component<R: Read, W: Write>(
        rdr: &mut EndianReader<R>,
        wtr: &mut EndianWriter<W>,
        from: Component,
        to: Component,
    ) -> Result<(), ConversionError> {
        match (from, to) {
            (F32, F32) => wtr.write_f32(rdr.read_f32()?)?,
            (U32, U32) => wtr.write_u32(rdr.read_u32()?)?,
            (U16, U16) => wtr.write_u16(rdr.read_u16()?)?,
            (U8, U8) | (UNorm8, UNorm8) => wtr.write_u8(rdr.read_u8()?)?,
            (UNorm8, F32) => wtr.write_f32(rdr.read_u8()? as f32 / 255.0)?,
            (from, to) => {
                return Err(ConversionError::structural(format!(
                    "no component conversion from {:?} to {:?}",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

fn layout_size(layout: &[Component]) -> usize {
    layout.iter().map(|component| component.size()).sum()
}

impl VertexStreamCodec for StandardVertexCodec {
    fn element_size(&self, version: CacheVersion, format: VertexBufferFormat) -> Option<u16> {
        Self::layout(version, format).map(|layout| layout_size(layout) as u16)
    }

    fn read_world_vertex<R: Read>(&self, rdr: &mut EndianReader<R>) -> Result<WorldVertex, ParserError> {
        WorldVertex::parse(rdr)
    }

    fn read_water_triangle_indices<R: Read>(
        &self,
        rdr: &mut EndianReader<R>,
    ) -> Result<WaterTriangleIndices, ParserError> {
        WaterTriangleIndices::parse(rdr)
    }

    fn read_water_parameters<R: Read>(&self, rdr: &mut EndianReader<R>) -> Result<WaterParameters, ParserError> {
        WaterParameters::parse(rdr)
    }

    fn write_world_water_vertex<W: Write>(
        &self,
        wtr: &mut EndianWriter<W>,
        vertex: &WorldVertex,
    ) -> Result<(), ParserError> {
        vertex.position.write(wtr)?;
        vertex.texcoord.write(wtr)?;
        vertex.normal.write(wtr)?;
        vertex.tangent.write(wtr)
    }

    fn write_water_parameters<W: Write>(
        &self,
        wtr: &mut EndianWriter<W>,
        parameters: &WaterParameters,
    ) -> Result<(), ParserError> {
        parameters.write(wtr)
    }

    fn convert_buffer(
        &self,
        source: CacheVersion,
        target: CacheVersion,
        buffer: &mut VertexBufferDefinition,
    ) -> Result<BufferConversion, ConversionError> {
        let (Some(source_layout), Some(target_layout)) =
            (Self::layout(source, buffer.format), Self::layout(target, buffer.format))
        else {
            return Ok(BufferConversion::Unsupported);
        };

        if source_layout.len() != target_layout.len() {
            return Err(ConversionError::structural(format!(
                "{:?} layouts of {} and {} do not line up",
                buffer.format, source, target
            )));
        }

        let count = buffer.count as usize;
        let source_size = layout_size(source_layout);
        let target_size = layout_size(target_layout);
        let required = source_size * count;
        if buffer.data.len() < required {
            return Err(ConversionError::structural(format!(
                "{:?} buffer holds {} bytes, but {} elements of {} bytes need {}",
                buffer.format,
                buffer.data.len(),
                count,
                source_size,
                required
            )));
        }

        let mut rdr = EndianReader::from_slice(&buffer.data.data[..required], source.endianness());
        let mut wtr = EndianWriter::new(Vec::with_capacity(target_size * count), target.endianness());
        for _ in 0..count {
            for (&from, &to) in source_layout.iter().zip(target_layout) {
                Self::convert_component(&mut rdr, &mut wtr, from, to)?;
            }
        }

        trace!(
            "Converted {} {:?} elements ({} -> {} bytes each)",
            count,
            buffer.format,
            source_size,
            target_size
        );

        buffer.data.data = wtr.into_inner();
        buffer.vertex_size = target_size as u16;
        Ok(BufferConversion::Converted)
    }
}
