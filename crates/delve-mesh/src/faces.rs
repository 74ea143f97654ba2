//! Face culling and the shared path that writes one box face.

use delve_catalog::Tile;
use delve_geom::{Aabb, MeshBuild, Vec2, Vec3};
use delve_voxel::{BoxFace, Cardinal, RampType, VoxelHandle, VoxelVertex};

use crate::box_tables::{BoxTables, corner_position};
use crate::emit::{Quad, emit_quad, flip_for};
use crate::lighting::{LightMemo, VertexLight};
use crate::noise::vertex_jitter;

fn is_transparent(v: &VoxelHandle<'_>) -> bool {
    v.voxel_type().is_some_and(|t| t.transparent)
}

/// True when the neighbor slopes away below a corner that `mine` keeps
/// raised, opening a gap on the shared side.
fn ramp_exposes(side: Cardinal, mine: RampType, theirs: RampType) -> bool {
    let (a, b) = side.top_edge();
    [a, b]
        .into_iter()
        .any(|c| !mine.lowers(c) && theirs.lowers(c.across(side)))
}

/// Whether `face` of `v` must be drawn given the voxel behind it.
///
/// An unloaded neighbor hides the face, so nothing is drawn against space
/// whose contents are unknown.
pub fn is_face_visible(v: &VoxelHandle<'_>, neighbor: Option<&VoxelHandle<'_>>, face: BoxFace) -> bool {
    let Some(n) = neighbor else {
        return false;
    };
    if n.is_explored() && n.is_empty() {
        return true;
    }
    if is_transparent(n) && !is_transparent(v) {
        return true;
    }
    if !n.is_visible() {
        return true;
    }
    match face.cardinal() {
        Some(side) => {
            n.is_explored()
                && n.voxel_type().is_some_and(|t| t.can_ramp)
                && !n.ramp_type().is_empty()
                && ramp_exposes(side, v.ramp_type(), n.ramp_type())
        }
        None => false,
    }
}

/// Vertical drop of corner `c` of `v` from its ramp bits.
pub fn ramp_offset(v: &VoxelHandle<'_>, c: VoxelVertex) -> f32 {
    match v.voxel_type() {
        Some(t) if t.can_ramp && v.is_explored() && v.ramp_type().lowers(c) => -t.ramp_size,
        _ => 0.0,
    }
}

/// How one box face is drawn.
pub struct FaceStyle {
    pub tile: Tile,
    pub tint: [u8; 4],
    /// Where the unit box lands, relative to the voxel's minimum corner.
    pub frame: Aabb,
}

impl FaceStyle {
    pub fn terrain(tile: Tile, tint: [u8; 4]) -> Self {
        Self {
            tile,
            tint,
            frame: Aabb::unit_at(Vec3::ZERO),
        }
    }
}

/// Writes `face` of `v` if it is visible. With a memo the corners are lit;
/// without one they are drawn at full brightness.
///
/// Jitter is taken at the voxel's own corners and then carried through
/// `style.frame`, so an enlarged overlay box follows the face it covers.
pub fn emit_box_face(
    out: &mut MeshBuild,
    tables: &BoxTables,
    v: &VoxelHandle<'_>,
    face: BoxFace,
    style: &FaceStyle,
    memo: Option<&mut LightMemo>,
    jitter: f32,
) {
    let neighbor = v.neighbor(face.delta());
    if !is_face_visible(v, neighbor.as_ref(), face) {
        return;
    }
    let ft = tables.face(face);
    let base = v.world_position();
    let pos = ft.corners.map(|c| {
        let local = corner_position(c) + Vec3::new(0.0, ramp_offset(v, c), 0.0);
        let local = local + vertex_jitter(base + local, jitter);
        base + style.frame.lerp_unit(local)
    });
    let (light, flip) = match memo {
        Some(memo) => {
            let light = ft.corners.map(|c| memo.light(v, c));
            (light, flip_for(&light))
        }
        None => ([VertexLight::UNLIT; 4], false),
    };
    let quad = Quad {
        pos,
        light,
        tint: [style.tint; 4],
        uv: Quad::tile_uvs(style.tile, ft.uvs, Vec2::new(1.0, 1.0)),
        bounds: style.tile.bounds(),
    };
    emit_quad(out, &quad, flip, 0.0);
}
