use log::{trace, warn};

use crate::ConversionError;
use crate::converter::settings::{ConversionSettings, UnsupportedFormatPolicy};
use crate::geometry::types::Mesh;
use crate::vertex::codec::{BufferConversion, VertexStreamCodec};
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat, VertexSlot};

pub struct VertexBufferConverter<'a, C: VertexStreamCodec> {
    codec: &'a C,
    settings: &'a ConversionSettings,
}

impl<'a, C: VertexStreamCodec> VertexBufferConverter<'a, C> {
    pub fn new(codec: &'a C, settings: &'a ConversionSettings) -> Self {
        VertexBufferConverter { codec, settings }
    }

    /// Converts every bound vertex stream of `mesh`, except for the water streams.
    pub fn convert_mesh_buffers(&self, mesh: &mut Mesh) -> Result<(), ConversionError> {
        let primary_count = mesh.vertex_buffers[VertexSlot::Primary]
            .as_ref()
            .map(|buffer| buffer.count);

        for (slot, buffer) in mesh.vertex_buffers.iter_mut() {
            // gen3 stores the order 0 coefficients in ints, they are read as one byte per primary vertex
            if buffer.format == VertexBufferFormat::AmbientPrt {
                buffer.count = primary_count.ok_or_else(|| {
                    ConversionError::structural(format!(
                        "ambient PRT buffer in {:?} without a primary vertex buffer",
                        slot
                    ))
                })?;
            }

            if buffer.format.is_water() {
                trace!("Leaving {:?} in {:?} to the water reconstruction", buffer.format, slot);
                continue;
            }

            self.convert_buffer(buffer)?;
        }

        Ok(())
    }

    pub fn convert_buffer(&self, buffer: &mut VertexBufferDefinition) -> Result<(), ConversionError> {
        let source = self.settings.source_version;
        let target = self.settings.target_version;

        match self.codec.convert_buffer(source, target, buffer)? {
            BufferConversion::Converted => {
                debug_assert_eq!(buffer.data.len(), buffer.expected_data_len());
                Ok(())
            }
            BufferConversion::Unsupported => match self.settings.unsupported_formats {
                UnsupportedFormatPolicy::PassThrough => {
                    warn!(
                        "No conversion for {:?} vertex buffers from {} to {}, passing {} bytes through unchanged",
                        buffer.format,
                        source,
                        target,
                        buffer.data.len()
                    );
                    Ok(())
                }
                UnsupportedFormatPolicy::Reject => Err(ConversionError::UnsupportedFormatConversion {
                    format: buffer.format,
                    source_version: source,
                    target_version: target,
                }),
            },
        }
    }
}
