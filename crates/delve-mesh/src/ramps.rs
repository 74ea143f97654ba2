//! Corner ramps: exposed top corners of rampable materials drop to form slopes.

use delve_voxel::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Z};
use delve_voxel::tables::vertex_neighbors_2d;
use delve_voxel::{
    ChunkManager, GlobalVoxelCoordinate, GlobalVoxelOffset, LocalVoxelCoordinate, RampType,
    VoxelChunk, VoxelHandle, VoxelVertex,
};

/// The ramp mask `v` should carry given its surroundings.
///
/// Only visible, rampable voxels with nothing solid on top ramp; a top
/// corner drops when any voxel beside it in the same layer is empty or not
/// loaded.
pub fn compute_ramp(v: &VoxelHandle<'_>) -> RampType {
    if v.is_empty() || !v.is_visible() {
        return RampType::NONE;
    }
    if !v.voxel_type().is_some_and(|t| t.can_ramp) {
        return RampType::NONE;
    }
    if v
        .neighbor(GlobalVoxelOffset::new(0, 1, 0))
        .is_some_and(|above| !above.is_empty())
    {
        return RampType::NONE;
    }

    let mut ramp = RampType::NONE;
    for corner in VoxelVertex::ALL.into_iter().filter(|c| c.is_top()) {
        let exposed = vertex_neighbors_2d(corner)
            .into_iter()
            .any(|o| v.neighbor(o).is_none_or(|n| n.is_empty()));
        if exposed {
            ramp.insert(RampType::for_vertex(corner));
        }
    }
    ramp
}

/// Recomputes ramps for slice `local_y` of `chunk` and for the ring of
/// voxels just outside it in the horizontally adjacent chunks. A changed
/// ramp in another chunk invalidates that chunk's slice. Returns how many
/// voxels changed.
pub fn update_slice_ramps(manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize) -> usize {
    let mut changed = 0;
    for local in LocalVoxelCoordinate::slice(local_y) {
        let v = manager.handle_in(chunk, local);
        if v.store_ramp(compute_ramp(&v)) {
            changed += 1;
        }
    }

    let origin = chunk.origin();
    let y = origin.y + local_y as i32;
    let (sx, sz) = (CHUNK_SIZE_X as i32, CHUNK_SIZE_Z as i32);
    let ring = (-1..=sx)
        .flat_map(|x| [(x, -1), (x, sz)])
        .chain((0..sz).flat_map(|z| [(-1, z), (sx, z)]));
    for (x, z) in ring {
        let g = GlobalVoxelCoordinate::new(origin.x + x, y, origin.z + z);
        let Some(v) = manager.resolve(g) else {
            continue;
        };
        if v.store_ramp(compute_ramp(&v)) {
            changed += 1;
            manager.invalidate_slice(g.chunk(), g.local().y());
        }
    }
    changed
}
