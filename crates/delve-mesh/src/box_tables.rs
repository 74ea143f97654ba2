//! Unit-box face layout shared by terrain faces and overlays.
//!
//! Every face lists its corners so that `(v1 - v0) x (v2 - v0)` points into
//! the box: quads are wound clockwise when seen from outside.

use delve_catalog::FaceRole;
use delve_geom::{Vec2, Vec3};
use delve_voxel::{BoxFace, VoxelVertex};

/// One face of the unit box.
#[derive(Clone, Copy, Debug)]
pub struct FaceTable {
    pub face: BoxFace,
    pub role: FaceRole,
    pub corners: [VoxelVertex; 4],
    /// Unit-square texture coordinates per corner slot.
    pub uvs: [Vec2; 4],
}

/// All six faces, built once per mesher.
#[derive(Clone, Debug)]
pub struct BoxTables {
    faces: [FaceTable; 6],
}

pub fn corner_position(v: VoxelVertex) -> Vec3 {
    let (x, y, z) = v.corner();
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Top and bottom faces project the corner onto the XZ plane.
fn planar_uv(v: VoxelVertex) -> Vec2 {
    let (x, _, z) = v.corner();
    Vec2::new(x as f32, z as f32)
}

const SIDE_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

impl BoxTables {
    pub fn new() -> Self {
        use VoxelVertex::*;
        let planar = |face, role, corners: [VoxelVertex; 4]| FaceTable {
            face,
            role,
            corners,
            uvs: corners.map(planar_uv),
        };
        let side = |face, corners| FaceTable {
            face,
            role: FaceRole::Side,
            corners,
            uvs: SIDE_UVS,
        };
        let faces = [
            planar(
                BoxFace::Top,
                FaceRole::Top,
                [FrontTopLeft, BackTopLeft, BackTopRight, FrontTopRight],
            ),
            planar(
                BoxFace::Bottom,
                FaceRole::Bottom,
                [FrontBottomLeft, FrontBottomRight, BackBottomRight, BackBottomLeft],
            ),
            side(
                BoxFace::Left,
                [FrontTopLeft, FrontBottomLeft, BackBottomLeft, BackTopLeft],
            ),
            side(
                BoxFace::Right,
                [BackTopRight, BackBottomRight, FrontBottomRight, FrontTopRight],
            ),
            side(
                BoxFace::Front,
                [FrontTopRight, FrontBottomRight, FrontBottomLeft, FrontTopLeft],
            ),
            side(
                BoxFace::Back,
                [BackTopLeft, BackBottomLeft, BackBottomRight, BackTopRight],
            ),
        ];
        Self { faces }
    }

    #[inline]
    pub fn face(&self, face: BoxFace) -> &FaceTable {
        &self.faces[face.index()]
    }

    pub fn top(&self) -> &FaceTable {
        self.face(BoxFace::Top)
    }

    /// Unit UV the top face assigns to a top corner.
    pub fn top_uv(&self, v: VoxelVertex) -> Vec2 {
        planar_uv(v)
    }
}

impl Default for BoxTables {
    fn default() -> Self {
        Self::new()
    }
}
