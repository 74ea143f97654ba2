use delve_catalog::Tile;
use delve_geom::{MeshBuild, MeshVertex, UvBounds, Vec2, Vec3};

use crate::lighting::VertexLight;
use crate::noise::vertex_jitter;

/// Everything needed to write one quad.
pub struct Quad {
    pub pos: [Vec3; 4],
    pub light: [VertexLight; 4],
    pub tint: [[u8; 4]; 4],
    pub uv: [Vec2; 4],
    pub bounds: UvBounds,
}

impl Quad {
    /// Maps unit UVs (optionally scaled) into `tile`.
    pub fn tile_uvs(tile: Tile, unit: [Vec2; 4], scale: Vec2) -> [Vec2; 4] {
        unit.map(|u| tile.uv(u.scale(scale)))
    }
}

/// Whether to split along the 1-3 diagonal: done when corners 0 and 2 are
/// the brighter pair.
#[inline]
pub fn flip_for(light: &[VertexLight; 4]) -> bool {
    let a = |i: usize| light[i].ambient as u32;
    a(0) + a(2) > a(1) + a(3)
}

pub fn emit_quad(out: &mut MeshBuild, q: &Quad, flip: bool, jitter: f32) {
    let verts: [MeshVertex; 4] = std::array::from_fn(|i| MeshVertex {
        pos: q.pos[i] + vertex_jitter(q.pos[i], jitter),
        color: q.light[i].color(),
        tint: q.tint[i],
        uv: q.uv[i],
        bounds: q.bounds,
    });
    out.add_quad(&verts, flip);
}

/// Component-wise product of two RGBA colors.
#[inline]
pub fn mul_tint(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
    std::array::from_fn(|i| ((a[i] as u16 * b[i] as u16) / 255) as u8)
}
