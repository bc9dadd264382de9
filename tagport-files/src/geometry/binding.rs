use log::debug;

use crate::ConversionError;
use crate::common::slots::Slot;
use crate::geometry::types::{RenderGeometry, RenderGeometryResourceDefinition};
use crate::index::types::IndexSlot;
use crate::vertex::types::VertexSlot;

/// How references past the end of a resource table are treated while binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DanglingReferences {
    Reject,
    /// the definition was made up, the buffers a reference points at were never shipped
    Drop,
}

fn lookup<T: Clone>(
    table: &[T],
    reference: &mut Option<u16>,
    what: &str,
    dangling: DanglingReferences,
) -> Result<Option<T>, ConversionError> {
    let Some(index) = *reference else {
        return Ok(None);
    };

    if let Some(entry) = table.get(index as usize) {
        return Ok(Some(entry.clone()));
    }

    match dangling {
        DanglingReferences::Reject => Err(ConversionError::structural(format!(
            "{} reference {} is past the end of a table with {} entries",
            what,
            index,
            table.len()
        ))),
        DanglingReferences::Drop => {
            debug!("Dropping {} reference {} into a synthesized resource definition", what, index);
            *reference = None;
            Ok(None)
        }
    }
}

fn next_index(len: usize) -> Result<u16, ConversionError> {
    u16::try_from(len).map_err(|_| ConversionError::structural("resource definition holds more than 65535 buffers"))
}

impl RenderGeometry {
    /// Resolves the buffer references of every mesh and per pixel lighting block against `definition`.
    pub fn bind_resource_buffers(&mut self, definition: &RenderGeometryResourceDefinition) -> Result<(), ConversionError> {
        self.bind(definition, DanglingReferences::Reject)
    }

    /// Like `bind_resource_buffers`, but references `definition` cannot satisfy are cleared
    /// instead of failing. Meant for definitions synthesized because the source had none.
    pub fn bind_synthesized_resource_buffers(
        &mut self,
        definition: &RenderGeometryResourceDefinition,
    ) -> Result<(), ConversionError> {
        self.bind(definition, DanglingReferences::Drop)
    }

    fn bind(
        &mut self,
        definition: &RenderGeometryResourceDefinition,
        dangling: DanglingReferences,
    ) -> Result<(), ConversionError> {
        let vertex_buffers = &definition.vertex_buffers.elements;
        let index_buffers = &definition.index_buffers.elements;

        for mesh in &mut self.meshes {
            for &slot in VertexSlot::ALL {
                mesh.vertex_buffers[slot] = lookup(
                    vertex_buffers,
                    &mut mesh.vertex_buffer_indices[slot],
                    "vertex buffer",
                    dangling,
                )?;
            }

            for &slot in IndexSlot::ALL {
                mesh.index_buffers[slot] = lookup(
                    index_buffers,
                    &mut mesh.index_buffer_indices[slot],
                    "index buffer",
                    dangling,
                )?;
            }
        }

        for per_pixel in &mut self.instanced_geometry_per_pixel_lighting {
            per_pixel.vertex_buffer = lookup(
                vertex_buffers,
                &mut per_pixel.vertex_buffer_index,
                "per pixel lighting",
                dangling,
            )?;
        }

        Ok(())
    }

    /// Rebuilds the resource tables from the bound buffers, in mesh order, and points the
    /// references at the new entries.
    pub fn collect_resource_definition(&mut self) -> Result<RenderGeometryResourceDefinition, ConversionError> {
        let mut definition = RenderGeometryResourceDefinition::empty();

        for mesh in &mut self.meshes {
            for &slot in VertexSlot::ALL {
                mesh.vertex_buffer_indices[slot] = match &mesh.vertex_buffers[slot] {
                    Some(buffer) => {
                        let index = next_index(definition.vertex_buffers.len())?;
                        definition.vertex_buffers.push(buffer.clone());
                        Some(index)
                    }
                    None => None,
                };
            }

            for &slot in IndexSlot::ALL {
                mesh.index_buffer_indices[slot] = match &mesh.index_buffers[slot] {
                    Some(buffer) => {
                        let index = next_index(definition.index_buffers.len())?;
                        definition.index_buffers.push(buffer.clone());
                        Some(index)
                    }
                    None => None,
                };
            }
        }

        for per_pixel in &mut self.instanced_geometry_per_pixel_lighting {
            per_pixel.vertex_buffer_index = match &per_pixel.vertex_buffer {
                Some(buffer) => {
                    let index = next_index(definition.vertex_buffers.len())?;
                    definition.vertex_buffers.push(buffer.clone());
                    Some(index)
                }
                None => None,
            };
        }

        Ok(definition)
    }
}
