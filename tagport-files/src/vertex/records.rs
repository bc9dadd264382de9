use tagport_files_derive_parseable::{Emit, Parse};

use crate::common::types::{RealPoint2d, RealPoint3d, RealQuaternion, RealVector3d};

pub const WORLD_VERTEX_SIZE: u16 = 0x38;
pub const WATER_TRIANGLE_INDICES_SIZE: u16 = 0x0C;
pub const WATER_PARAMETERS_SIZE: u16 = 0x18;

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct WorldVertex {
    pub position: RealPoint3d,
    pub texcoord: RealPoint2d,
    pub normal: RealVector3d,
    pub tangent: RealVector3d,
    pub binormal: RealVector3d,
}

/// One water triangle: for each corner the world vertex and the parameter record it uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Parse, Emit)]
pub struct WaterTriangleIndices {
    pub vertices: [u16; 3],
    pub indices: [u16; 3],
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Parse, Emit)]
pub struct WaterParameters {
    pub local_info: RealQuaternion,
    pub base_texcoord: RealPoint2d,
}
