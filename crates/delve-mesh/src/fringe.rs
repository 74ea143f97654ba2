//! Grass decals and the fringes that spill over a voxel's edges.

use delve_catalog::{Catalog, GrassType};
use delve_geom::{MeshBuild, Vec2, Vec3};
use delve_voxel::{Cardinal, Diagonal, GlobalVoxelOffset, VoxelHandle, VoxelVertex};

use crate::box_tables::BoxTables;
use crate::emit::{Quad, emit_quad, flip_for, mul_tint};
use crate::lighting::VertexLight;

const UP: GlobalVoxelOffset = GlobalVoxelOffset::new(0, 1, 0);

/// The finished top face of one voxel, indexed by [`VoxelVertex::index`].
/// Only the four top corners are meaningful.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopSurface {
    pub pos: [Vec3; 8],
    pub light: [VertexLight; 8],
    /// White, or black for corners nobody has explored next to.
    pub shade: [[u8; 4]; 8],
}

fn offset_vec(o: GlobalVoxelOffset) -> Vec3 {
    Vec3::new(o.dx as f32, o.dy as f32, o.dz as f32)
}

/// Drop toward an open neighbor, lift slightly onto an occupied one.
fn slope_toward(n: &VoxelHandle<'_>) -> Vec3 {
    Vec3::new(0.0, if n.is_empty() { -0.5 } else { 0.125 }, 0.0)
}

/// A grassed neighbor whose grass wins over ours draws its own fringe.
fn outranks(catalog: &Catalog, n: &VoxelHandle<'_>, mine: i32) -> bool {
    !n.is_empty()
        && n.grass_type() != 0
        && catalog
            .grass_type(n.grass_type())
            .is_some_and(|g| g.fringe_precedence >= mine)
}

/// Emits the grass decal over the top face of `v` and, when the grass type
/// has fringe tiles, its edge and corner fringes.
pub fn emit_grass(
    out: &mut MeshBuild,
    tables: &BoxTables,
    v: &VoxelHandle<'_>,
    grass: &GrassType,
    top: &TopSurface,
    jitter: f32,
) {
    let catalog = v.manager().catalog();
    let tint = |c: VoxelVertex| mul_tint(top.shade[c.index()], grass.tint);

    let face = tables.top();
    let light = face.corners.map(|c| top.light[c.index()]);
    let decal = Quad {
        pos: face.corners.map(|c| top.pos[c.index()]),
        light,
        tint: face.corners.map(tint),
        uv: Quad::tile_uvs(grass.tile, face.uvs, Vec2::new(1.0, 1.0)),
        bounds: grass.tile.bounds(),
    };
    emit_quad(out, &decal, flip_for(&light), jitter);

    let Some(fringe_tiles) = grass.fringe_tiles else {
        return;
    };

    for c in Cardinal::ALL {
        let Some(n) = v.neighbor(c.offset()) else {
            continue;
        };
        let dir = offset_vec(c.offset());
        let (a, b) = c.top_edge();
        let (pa, pb) = (top.pos[a.index()], top.pos[b.index()]);
        let open_above = n.neighbor(UP).is_none_or(|h| h.is_empty());
        let lift = if open_above {
            if outranks(catalog, &n, grass.fringe_precedence) {
                continue;
            }
            dir * 0.5 + slope_toward(&n)
        } else {
            // grass creeping up the wall of a raised neighbor
            Vec3::new(0.0, 0.5, 0.0) + dir * -0.05
        };
        let (la, lb) = (top.light[a.index()], top.light[b.index()]);
        let light = [la, la, lb, lb];
        let (sx, sz) = c.fringe_uv_scale();
        let tile = fringe_tiles[c.index()];
        let quad = Quad {
            pos: [pa, pa + lift, pb + lift, pb],
            light,
            tint: [tint(a), tint(a), tint(b), tint(b)],
            uv: Quad::tile_uvs(
                tile,
                [
                    tables.top_uv(a),
                    tables.top_uv(a.across(c)),
                    tables.top_uv(b.across(c)),
                    tables.top_uv(b),
                ],
                Vec2::new(sx, sz),
            ),
            bounds: tile.bounds(),
        };
        emit_quad(out, &quad, flip_for(&light), jitter);
    }

    for d in Diagonal::ALL {
        let Some(n) = v.neighbor(d.offset()) else {
            continue;
        };
        if outranks(catalog, &n, grass.fringe_precedence) {
            continue;
        }
        let (f1, f2) = d.flanks();
        let blocked = [f1, f2].into_iter().any(|f| {
            v.neighbor(f.offset())
                .is_none_or(|h| h.grass_type() == v.grass_type())
        });
        if blocked {
            continue;
        }

        let pivot = d.pivot();
        let p = top.pos[pivot.index()];
        let o = d.offset();
        let (hx, hz) = (o.dx as f32 * 0.5, o.dz as f32 * 0.5);
        let slope = slope_toward(&n);
        let corner = |bits: usize| tables.top_uv(VoxelVertex::ALL[pivot.index() ^ bits]);
        let mut pos = [
            p,
            p + Vec3::new(hx, 0.0, 0.0) + slope,
            p + Vec3::new(hx, 0.0, hz) + slope,
            p + Vec3::new(0.0, 0.0, hz) + slope,
        ];
        let mut unit = [corner(0), corner(1), corner(5), corner(4)];
        // keep the winding of the top face
        if o.dx * o.dz < 0 {
            pos.swap(1, 3);
            unit.swap(1, 3);
        }
        let light = [top.light[pivot.index()]; 4];
        let tile = fringe_tiles[4 + d.index()];
        let quad = Quad {
            pos,
            light,
            tint: [tint(pivot); 4],
            uv: Quad::tile_uvs(tile, unit, Vec2::new(0.5, 0.5)),
            bounds: tile.bounds(),
        };
        emit_quad(out, &quad, flip_for(&light), jitter);
    }
}
