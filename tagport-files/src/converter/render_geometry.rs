use log::{debug, info, trace, warn};

use crate::ConversionError;
use crate::common::endian::{UNKNOWN_BLOCK_WORD_SIZE, rewrite_words};
use crate::common::types::{CacheAddressType, TagData};
use crate::converter::collision::CollisionDataConverter;
use crate::converter::resource::{ResourceHandle, ResourceStore};
use crate::converter::settings::ConversionSettings;
use crate::geometry::types::{Mesh, MeshFlags, PrtShType, RenderGeometry, RenderGeometryResourceDefinition, VertexType};
use crate::index::converter::IndexBufferConverter;
use crate::index::types::IndexSlot;
use crate::vertex::codec::{StandardVertexCodec, VertexStreamCodec};
use crate::vertex::converter::VertexBufferConverter;
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat, VertexSlot};
use crate::water::reconstructor::WaterGeometryReconstructor;

/// Size of the zeroed payload that stands in for particle model geometry shipped without data.
pub const PARTICLE_MODEL_PLACEHOLDER_SIZE: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// buffers were converted against the supplied resource definition
    Converted,
    /// no resource definition was supplied, the empty one got registered and nothing was converted
    Synthesized(ResourceHandle),
    /// no resource definition and a lone particle model mesh, a placeholder vertex buffer was written
    Degenerate,
}

#[derive(Debug, Clone)]
pub struct ConvertedGeometry {
    pub outcome: ConversionOutcome,
    pub definition: RenderGeometryResourceDefinition,
}

impl ConvertedGeometry {
    pub fn into_definition(self) -> RenderGeometryResourceDefinition {
        self.definition
    }
}

pub struct RenderGeometryConverter<C: VertexStreamCodec = StandardVertexCodec> {
    settings: ConversionSettings,
    codec: C,
    collision: Box<dyn CollisionDataConverter>,
    resource_store: Box<dyn ResourceStore>,
}

impl<C: VertexStreamCodec> RenderGeometryConverter<C> {
    pub fn new(
        settings: ConversionSettings,
        codec: C,
        collision: Box<dyn CollisionDataConverter>,
        resource_store: Box<dyn ResourceStore>,
    ) -> Self {
        RenderGeometryConverter {
            settings,
            codec,
            collision,
            resource_store,
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn resource_store(&self) -> &dyn ResourceStore {
        self.resource_store.as_ref()
    }

    /// Converts `geometry` in place and returns the resource definition describing its new buffers.
    /// On error the geometry may be partially converted and has to be discarded.
    pub fn convert(
        &mut self,
        geometry: &mut RenderGeometry,
        resource_definition: Option<RenderGeometryResourceDefinition>,
    ) -> Result<ConvertedGeometry, ConversionError> {
        self.convert_unknown_blocks(geometry)?;
        self.convert_cluster_visibility(geometry)?;

        let synthesized = resource_definition.is_none();
        let resource_definition = resource_definition.unwrap_or_else(|| {
            warn!("Render geometry does not have a valid resource definition, continuing anyway.");
            RenderGeometryResourceDefinition::empty()
        });

        if synthesized {
            geometry.bind_synthesized_resource_buffers(&resource_definition)?;
        } else {
            geometry.bind_resource_buffers(&resource_definition)?;
        }
        geometry.resource_synthesized = synthesized;

        let outcome = if !synthesized {
            for (index, mesh) in geometry.meshes.iter_mut().enumerate() {
                debug!(
                    "Converting mesh {} ({:?}, {} parts)",
                    index,
                    mesh.vertex_type,
                    mesh.parts.len()
                );
                self.convert_mesh(mesh)?;
            }
            ConversionOutcome::Converted
        } else if Self::is_degenerate_particle_model(geometry) {
            info!("Render geometry is a lone particle model without data, writing a placeholder vertex buffer");
            self.synthesize_particle_model(geometry)?;
            ConversionOutcome::Degenerate
        } else {
            let handle = self
                .resource_store
                .create_render_geometry_resource(&resource_definition);
            geometry.resource = Some(handle);
            return Ok(ConvertedGeometry {
                outcome: ConversionOutcome::Synthesized(handle),
                definition: resource_definition,
            });
        };

        let vertex_converter = VertexBufferConverter::new(&self.codec, &self.settings);
        for per_pixel in &mut geometry.instanced_geometry_per_pixel_lighting {
            if let Some(vertex_buffer) = per_pixel.vertex_buffer.as_mut() {
                vertex_converter.convert_buffer(vertex_buffer)?;
            }
        }

        Ok(ConvertedGeometry {
            outcome,
            definition: geometry.collect_resource_definition()?,
        })
    }

    fn convert_unknown_blocks(&self, geometry: &mut RenderGeometry) -> Result<(), ConversionError> {
        let source = self.settings.source_version.endianness();
        let target = self.settings.target_version.endianness();

        for block in &mut geometry.unknown_blocks {
            let Some(data) = block.data.as_mut() else {
                continue;
            };
            if data.is_empty() {
                continue;
            }

            *data = rewrite_words(data, source, target, UNKNOWN_BLOCK_WORD_SIZE)?;
        }

        Ok(())
    }

    fn convert_cluster_visibility(&self, geometry: &mut RenderGeometry) -> Result<(), ConversionError> {
        for (index, cluster_visibility) in geometry.mesh_cluster_visibility.iter_mut().enumerate() {
            cluster_visibility.mopp_data = self
                .collision
                .convert(
                    self.settings.source_version,
                    self.settings.target_version,
                    &cluster_visibility.mopp_data,
                )
                .map_err(|err| ConversionError::CollisionData {
                    reason: format!("cluster visibility {}: {}", index, err),
                })?;
        }

        Ok(())
    }

    fn is_degenerate_particle_model(geometry: &RenderGeometry) -> bool {
        geometry.meshes.len() == 1 && geometry.meshes[0].vertex_type == VertexType::ParticleModel
    }

    fn synthesize_particle_model(&self, geometry: &mut RenderGeometry) -> Result<(), ConversionError> {
        let target = self.settings.target_version;
        let vertex_size = self
            .codec
            .element_size(target, VertexBufferFormat::ParticleModel)
            .filter(|&size| size > 0)
            .ok_or(ConversionError::UnsupportedFormatConversion {
                format: VertexBufferFormat::ParticleModel,
                source_version: self.settings.source_version,
                target_version: target,
            })?;

        let mesh = &mut geometry.meshes[0];
        mesh.flags |= MeshFlags::IS_UNINDEXED;
        mesh.prt_type = PrtShType::None;
        mesh.vertex_buffers[VertexSlot::Primary] = Some(VertexBufferDefinition {
            format: VertexBufferFormat::ParticleModel,
            vertex_size,
            count: (PARTICLE_MODEL_PLACEHOLDER_SIZE / vertex_size as usize) as u32,
            data: TagData::new(vec![0; PARTICLE_MODEL_PLACEHOLDER_SIZE], CacheAddressType::Data),
        });

        Ok(())
    }

    fn convert_mesh(&self, mesh: &mut Mesh) -> Result<(), ConversionError> {
        let source = self.settings.source_version;
        let target = self.settings.target_version;

        VertexBufferConverter::new(&self.codec, &self.settings).convert_mesh_buffers(mesh)?;

        if mesh.has_water_buffers() {
            WaterGeometryReconstructor::new(&self.codec, source, target).reconstruct(mesh)?;
        }

        let index_converter = IndexBufferConverter::new(source, target);
        for (slot, index_buffer) in mesh.index_buffers.iter_mut() {
            trace!("Converting index buffer in {:?}", slot);
            index_converter.convert(index_buffer)?;
        }

        // gen3 never had index buffers for decorators
        if mesh.is_unindexed() && mesh.vertex_type == VertexType::Decorator {
            mesh.flags.remove(MeshFlags::IS_UNINDEXED);
            let index_count = mesh.part_index_count();
            mesh.index_buffers[IndexSlot::Primary] = Some(index_converter.create_index_buffer(index_count)?);
        }

        Ok(())
    }
}
