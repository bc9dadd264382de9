use std::cell::Cell;
use std::rc::Rc;

use crate::ConversionError;
use crate::common::types::{CacheAddressType, CacheVersion, Endianness, TagData};
use crate::common::writer::EndianWriter;
use crate::converter::render_geometry::{ConversionOutcome, PARTICLE_MODEL_PLACEHOLDER_SIZE, RenderGeometryConverter};
use crate::converter::resource::{InMemoryResourceStore, ResourceHandle};
use crate::converter::settings::ConversionSettings;
use crate::geometry::types::{
    ClusterVisibility, Mesh, MeshFlags, Part, PerPixelLighting, PrtShType, RenderGeometry,
    RenderGeometryResourceDefinition, UnknownBlock, VertexType,
};
use crate::index::types::{IndexBufferDefinition, IndexBufferFormat, IndexSlot};
use crate::test_support::{
    ReversingCollision, encode, sub_part, vertex_buffer, water_parameters, water_part, world_vertex,
};
use crate::vertex::codec::{StandardVertexCodec, VertexStreamCodec};
use crate::vertex::records::{
    WATER_PARAMETERS_SIZE, WATER_TRIANGLE_INDICES_SIZE, WORLD_VERTEX_SIZE, WaterParameters, WaterTriangleIndices,
    WorldVertex,
};
use crate::vertex::types::{VertexBufferDefinition, VertexBufferFormat, VertexSlot};

fn converter() -> RenderGeometryConverter {
    RenderGeometryConverter::new(
        ConversionSettings::default(),
        StandardVertexCodec,
        Box::new(ReversingCollision),
        Box::new(InMemoryResourceStore::new()),
    )
}

fn world_buffer(count: u16) -> VertexBufferDefinition {
    let vertices: Vec<WorldVertex> = (0..count).map(world_vertex).collect();
    vertex_buffer(
        VertexBufferFormat::World,
        WORLD_VERTEX_SIZE,
        count as u32,
        encode(&vertices, Endianness::Big),
    )
}

#[test]
fn empty_geometry_with_a_definition_converts_to_empty_tables() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry::default();
    let converted = converter().convert(&mut geometry, Some(RenderGeometryResourceDefinition::empty()))?;

    assert_eq!(converted.outcome, ConversionOutcome::Converted);
    assert!(converted.definition.vertex_buffers.is_empty());
    assert!(converted.definition.index_buffers.is_empty());
    assert!(!geometry.resource_synthesized);
    assert_eq!(geometry.resource, None);
    Ok(())
}

#[test_log::test]
fn missing_definition_registers_an_empty_resource() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry {
        meshes: vec![Mesh::default(), Mesh::default()],
        ..RenderGeometry::default()
    };

    let mut converter = converter();
    let converted = converter.convert(&mut geometry, None)?;

    assert_eq!(converted.outcome, ConversionOutcome::Synthesized(ResourceHandle(0)));
    assert_eq!(converted.definition, RenderGeometryResourceDefinition::empty());
    assert!(geometry.resource_synthesized);
    assert_eq!(geometry.resource, Some(ResourceHandle(0)));
    assert_eq!(
        converter.resource_store().render_geometry_resource(ResourceHandle(0)),
        Some(&RenderGeometryResourceDefinition::empty())
    );
    Ok(())
}

#[test]
fn missing_definition_still_converts_the_raw_blocks() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry {
        unknown_blocks: vec![UnknownBlock {
            data: Some(vec![1, 2, 3, 4]),
        }],
        ..RenderGeometry::default()
    };

    converter().convert(&mut geometry, None)?;
    assert_eq!(geometry.unknown_blocks[0].data, Some(vec![4, 3, 2, 1]));
    Ok(())
}

#[test_log::test]
fn lone_particle_model_gets_a_placeholder_buffer() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry {
        meshes: vec![Mesh {
            vertex_type: VertexType::ParticleModel,
            prt_type: PrtShType::Ambient,
            ..Mesh::default()
        }],
        ..RenderGeometry::default()
    };

    let mut converter = converter();
    let converted = converter.convert(&mut geometry, None)?;
    assert_eq!(converted.outcome, ConversionOutcome::Degenerate);
    assert_eq!(geometry.resource, None);

    let mesh = &geometry.meshes[0];
    assert!(mesh.is_unindexed());
    assert_eq!(mesh.prt_type, PrtShType::None);
    assert_eq!(mesh.vertex_buffer_indices[VertexSlot::Primary], Some(0));

    let definition = converted.into_definition();
    assert_eq!(definition.vertex_buffers.len(), 1);
    let placeholder = definition.vertex_buffers.get(0).unwrap();
    assert_eq!(placeholder.format, VertexBufferFormat::ParticleModel);
    assert_eq!(placeholder.vertex_size, 0x20);
    assert_eq!(placeholder.count, 1);
    assert_eq!(placeholder.data.data, vec![0; PARTICLE_MODEL_PLACEHOLDER_SIZE]);
    assert!(definition.index_buffers.is_empty());
    Ok(())
}

#[test]
fn particle_models_next_to_other_meshes_are_not_degenerate() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry {
        meshes: vec![
            Mesh {
                vertex_type: VertexType::ParticleModel,
                ..Mesh::default()
            },
            Mesh::default(),
        ],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, None)?;
    assert!(matches!(converted.outcome, ConversionOutcome::Synthesized(_)));
    assert!(!geometry.meshes[0].vertex_buffers.is_set(VertexSlot::Primary));
    Ok(())
}

#[test_log::test]
fn lone_particle_model_with_stale_references_is_degenerate() -> Result<(), anyhow::Error> {
    let mut mesh = Mesh {
        vertex_type: VertexType::ParticleModel,
        ..Mesh::default()
    };
    mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
    mesh.index_buffer_indices[IndexSlot::Primary] = Some(0);
    let mut geometry = RenderGeometry {
        meshes: vec![mesh],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, None)?;
    assert_eq!(converted.outcome, ConversionOutcome::Degenerate);

    // the primary reference now points at the placeholder, the index reference is gone
    let mesh = &geometry.meshes[0];
    assert_eq!(mesh.vertex_buffer_indices[VertexSlot::Primary], Some(0));
    assert_eq!(mesh.index_buffer_indices[IndexSlot::Primary], None);
    assert_eq!(converted.definition.vertex_buffers.len(), 1);
    assert!(converted.definition.index_buffers.is_empty());
    Ok(())
}

#[test_log::test]
fn missing_definition_with_stale_references_is_synthesized() -> Result<(), anyhow::Error> {
    let mut meshes = vec![Mesh::default(), Mesh::default()];
    for mesh in &mut meshes {
        mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
        mesh.index_buffer_indices[IndexSlot::Primary] = Some(0);
    }
    let mut geometry = RenderGeometry {
        meshes,
        instanced_geometry_per_pixel_lighting: vec![PerPixelLighting {
            vertex_buffer_index: Some(0),
            vertex_buffer: None,
        }],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, None)?;
    assert!(matches!(converted.outcome, ConversionOutcome::Synthesized(_)));
    assert_eq!(converted.definition, RenderGeometryResourceDefinition::empty());
    for mesh in &geometry.meshes {
        assert_eq!(mesh.vertex_buffer_indices[VertexSlot::Primary], None);
        assert_eq!(mesh.index_buffer_indices[IndexSlot::Primary], None);
    }
    assert_eq!(geometry.instanced_geometry_per_pixel_lighting[0].vertex_buffer_index, None);
    Ok(())
}

#[test]
fn supplied_definitions_still_reject_dangling_references() {
    let mut mesh = Mesh::default();
    mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
    let mut geometry = RenderGeometry {
        meshes: vec![mesh],
        ..RenderGeometry::default()
    };

    assert!(matches!(
        converter().convert(&mut geometry, Some(RenderGeometryResourceDefinition::empty())),
        Err(ConversionError::StructuralInconsistency { .. })
    ));
}

#[test]
fn unindexed_decorators_get_a_sequential_index_buffer() -> Result<(), anyhow::Error> {
    let mut definition = RenderGeometryResourceDefinition::empty();
    definition
        .vertex_buffers
        .push(vertex_buffer(VertexBufferFormat::Decorator, 0x20, 6, vec![0; 6 * 0x20]));

    let mut mesh = Mesh {
        flags: MeshFlags::IS_UNINDEXED,
        vertex_type: VertexType::Decorator,
        parts: vec![
            Part {
                index_count_old: 3,
                ..Part::default()
            },
            Part {
                first_index_old: 3,
                index_count_old: 3,
                ..Part::default()
            },
        ],
        ..Mesh::default()
    };
    mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
    let mut geometry = RenderGeometry {
        meshes: vec![mesh],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, Some(definition))?;

    let mesh = &geometry.meshes[0];
    assert!(!mesh.is_unindexed());
    assert_eq!(mesh.index_buffer_indices[IndexSlot::Primary], Some(0));

    let indices = converted.definition.index_buffers.get(0).unwrap();
    assert_eq!(indices.format, IndexBufferFormat::TriangleList);
    assert_eq!(indices.data.data, vec![0, 0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
    Ok(())
}

#[test]
fn indexed_meshes_have_their_indices_swapped() -> Result<(), anyhow::Error> {
    let mut definition = RenderGeometryResourceDefinition::empty();
    definition.vertex_buffers.push(world_buffer(3));
    definition.index_buffers.push(IndexBufferDefinition {
        format: IndexBufferFormat::TriangleStrip,
        data: TagData::new(vec![0, 0, 0, 1, 0, 2], CacheAddressType::Data),
    });

    let mut mesh = Mesh::default();
    mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
    mesh.index_buffer_indices[IndexSlot::Primary] = Some(0);
    let mut geometry = RenderGeometry {
        meshes: vec![mesh],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, Some(definition))?;

    let vertices: Vec<WorldVertex> = (0..3).map(world_vertex).collect();
    assert_eq!(
        converted.definition.vertex_buffers.get(0).unwrap().data.data,
        encode(&vertices, Endianness::Little)
    );
    assert_eq!(
        converted.definition.index_buffers.get(0).unwrap().data.data,
        vec![0, 0, 1, 0, 2, 0]
    );
    Ok(())
}

#[test]
fn unknown_blocks_are_rewritten_in_words() -> Result<(), anyhow::Error> {
    let mut geometry = RenderGeometry {
        unknown_blocks: vec![
            UnknownBlock {
                data: Some(vec![0x11, 0x22, 0x33, 0x44, 0xAA, 0xBB, 0xCC, 0xDD]),
            },
            UnknownBlock { data: None },
            UnknownBlock { data: Some(vec![]) },
        ],
        ..RenderGeometry::default()
    };

    converter().convert(&mut geometry, Some(RenderGeometryResourceDefinition::empty()))?;

    assert_eq!(
        geometry.unknown_blocks[0].data,
        Some(vec![0x44, 0x33, 0x22, 0x11, 0xDD, 0xCC, 0xBB, 0xAA])
    );
    assert_eq!(geometry.unknown_blocks[1].data, None);
    assert_eq!(geometry.unknown_blocks[2].data, Some(vec![]));
    Ok(())
}

#[test]
fn unknown_blocks_with_partial_words_are_rejected() {
    let mut geometry = RenderGeometry {
        unknown_blocks: vec![UnknownBlock {
            data: Some(vec![1, 2, 3]),
        }],
        ..RenderGeometry::default()
    };

    assert!(matches!(
        converter().convert(&mut geometry, None),
        Err(ConversionError::StructuralInconsistency { .. })
    ));
}

#[test]
fn every_cluster_goes_through_the_collision_converter() -> Result<(), anyhow::Error> {
    let calls = Rc::new(Cell::new(0));
    let counted = calls.clone();
    let collision = move |source: CacheVersion, target: CacheVersion, mopp: &[u8]| {
        assert_eq!(source, CacheVersion::Halo3Retail);
        assert_eq!(target, CacheVersion::HaloOnline106708);
        counted.set(counted.get() + 1);
        Ok::<Vec<u8>, ConversionError>(mopp.iter().map(|byte| byte ^ 0xFF).collect())
    };

    let mut converter = RenderGeometryConverter::new(
        ConversionSettings::default(),
        StandardVertexCodec,
        Box::new(collision),
        Box::new(InMemoryResourceStore::new()),
    );

    let mut geometry = RenderGeometry {
        mesh_cluster_visibility: vec![
            ClusterVisibility { mopp_data: vec![0x00, 0x0F] },
            ClusterVisibility { mopp_data: vec![] },
            ClusterVisibility { mopp_data: vec![0xF0] },
        ],
        ..RenderGeometry::default()
    };

    converter.convert(&mut geometry, Some(RenderGeometryResourceDefinition::empty()))?;

    assert_eq!(calls.get(), 3);
    assert_eq!(geometry.mesh_cluster_visibility[0].mopp_data, vec![0xFF, 0xF0]);
    assert!(geometry.mesh_cluster_visibility[1].mopp_data.is_empty());
    assert_eq!(geometry.mesh_cluster_visibility[2].mopp_data, vec![0x0F]);
    Ok(())
}

#[test]
fn collision_failures_abort_the_conversion() {
    let collision = |_: CacheVersion, _: CacheVersion, _: &[u8]| -> Result<Vec<u8>, ConversionError> {
        Err(ConversionError::structural("corrupt mopp header"))
    };
    let mut converter = RenderGeometryConverter::new(
        ConversionSettings::default(),
        StandardVertexCodec,
        Box::new(collision),
        Box::new(InMemoryResourceStore::new()),
    );

    let mut geometry = RenderGeometry {
        mesh_cluster_visibility: vec![ClusterVisibility { mopp_data: vec![] }, ClusterVisibility { mopp_data: vec![1] }],
        ..RenderGeometry::default()
    };

    match converter.convert(&mut geometry, Some(RenderGeometryResourceDefinition::empty())) {
        Err(ConversionError::CollisionData { reason }) => {
            assert!(reason.starts_with("cluster visibility 0:"), "{}", reason);
            assert!(reason.contains("corrupt mopp header"), "{}", reason);
        }
        other => panic!("expected a collision data error, got {:?}", other),
    }
}

#[test]
fn per_pixel_lighting_buffers_are_converted() -> Result<(), anyhow::Error> {
    let mut wtr = EndianWriter::new(Vec::new(), Endianness::Big);
    for value in [0.25f32, 0.75, 1.0, -1.0] {
        wtr.write_f32(value)?;
    }

    let mut definition = RenderGeometryResourceDefinition::empty();
    definition
        .vertex_buffers
        .push(vertex_buffer(VertexBufferFormat::StaticPerPixel, 8, 2, wtr.into_inner()));

    let mut geometry = RenderGeometry {
        instanced_geometry_per_pixel_lighting: vec![
            PerPixelLighting {
                vertex_buffer_index: Some(0),
                vertex_buffer: None,
            },
            PerPixelLighting::default(),
        ],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, Some(definition))?;

    let mut expected = EndianWriter::new(Vec::new(), Endianness::Little);
    for value in [0.25f32, 0.75, 1.0, -1.0] {
        expected.write_f32(value)?;
    }
    assert_eq!(converted.definition.vertex_buffers.len(), 1);
    assert_eq!(
        converted.definition.vertex_buffers.get(0).unwrap().data.data,
        expected.into_inner()
    );
    assert_eq!(geometry.instanced_geometry_per_pixel_lighting[0].vertex_buffer_index, Some(0));
    assert_eq!(geometry.instanced_geometry_per_pixel_lighting[1].vertex_buffer_index, None);
    Ok(())
}

#[test]
fn water_meshes_are_rebuilt_during_conversion() -> Result<(), anyhow::Error> {
    let triangles = [
        WaterTriangleIndices {
            vertices: [0, 1, 2],
            indices: [0, 0, 1],
        },
        WaterTriangleIndices {
            vertices: [3, 2, 1],
            indices: [1, 0, 0],
        },
    ];
    let parameters: Vec<WaterParameters> = (0..2).map(water_parameters).collect();

    let mut definition = RenderGeometryResourceDefinition::empty();
    definition.vertex_buffers.push(world_buffer(4));
    definition.vertex_buffers.push(vertex_buffer(
        VertexBufferFormat::WaterTriangleIndices,
        WATER_TRIANGLE_INDICES_SIZE,
        2,
        encode(&triangles, Endianness::Big),
    ));
    definition.vertex_buffers.push(vertex_buffer(
        VertexBufferFormat::WaterParameters,
        WATER_PARAMETERS_SIZE,
        2,
        encode(&parameters, Endianness::Big),
    ));

    let mut mesh = Mesh {
        flags: MeshFlags::HAS_WATER,
        parts: vec![water_part(3, 6)],
        sub_parts: vec![sub_part(0, 3), sub_part(3, 6)],
        ..Mesh::default()
    };
    mesh.vertex_buffer_indices[VertexSlot::Primary] = Some(0);
    mesh.vertex_buffer_indices[VertexSlot::WaterIndices] = Some(1);
    mesh.vertex_buffer_indices[VertexSlot::WaterParameters] = Some(2);
    let mut geometry = RenderGeometry {
        meshes: vec![mesh],
        ..RenderGeometry::default()
    };

    let converted = converter().convert(&mut geometry, Some(definition))?;
    assert_eq!(converted.definition.vertex_buffers.len(), 3);

    let world_water = converted.definition.vertex_buffers.get(1).unwrap();
    assert_eq!(world_water.format, VertexBufferFormat::World);
    assert_eq!(world_water.count, 9);
    assert_eq!(world_water.data.len(), 9 * 0x38);
    assert!(world_water.data.data[..3 * 0x38].iter().all(|&b| b == 0xCD));

    // index position 3 holds the first corner of the first water triangle
    let mut expected = EndianWriter::new(Vec::new(), Endianness::Little);
    StandardVertexCodec.write_world_water_vertex(&mut expected, &world_vertex(0))?;
    let expected = expected.into_inner();
    assert_eq!(&world_water.data.data[3 * 0x38..3 * 0x38 + expected.len()], expected.as_slice());

    let water_parameters_out = converted.definition.vertex_buffers.get(2).unwrap();
    assert_eq!(water_parameters_out.format, VertexBufferFormat::WaterParameters);
    assert_eq!(water_parameters_out.vertex_size, 0x24);
    assert_eq!(water_parameters_out.data.len(), 9 * 0x24);
    Ok(())
}
