use crate::geometry::types::RenderGeometryResourceDefinition;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle(pub u32);

/// The target cache's resource storage.
pub trait ResourceStore {
    fn create_render_geometry_resource(&mut self, definition: &RenderGeometryResourceDefinition) -> ResourceHandle;

    fn render_geometry_resource(&self, handle: ResourceHandle) -> Option<&RenderGeometryResourceDefinition>;
}

/// Keeps every registered definition in memory, handles are positions in registration order.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    definitions: Vec<RenderGeometryResourceDefinition>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn create_render_geometry_resource(&mut self, definition: &RenderGeometryResourceDefinition) -> ResourceHandle {
        self.definitions.push(definition.clone());
        ResourceHandle(self.definitions.len() as u32 - 1)
    }

    fn render_geometry_resource(&self, handle: ResourceHandle) -> Option<&RenderGeometryResourceDefinition> {
        self.definitions.get(handle.0 as usize)
    }
}
