//! Autotiled surfaces: materials whose tiles depend on matching neighbors.

use delve_catalog::{FaceRole, Tile, TransitionKind, VoxelType};
use delve_voxel::tables::{PLANE_X_NEIGHBORS, PLANE_Z_NEIGHBORS, TRANSITION_MULTIPLIERS};
use delve_voxel::{BoxFace, Cardinal, GlobalVoxelOffset, VoxelHandle};

/// Tile per box face, indexed by [`BoxFace::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTileSet([Tile; 6]);

impl FaceTileSet {
    pub fn plain(ty: &VoxelType) -> Self {
        Self(BoxFace::ALL.map(|f| ty.tiles.get(role_of(f))))
    }

    #[inline]
    pub fn get(&self, face: BoxFace) -> Tile {
        self.0[face.index()]
    }
}

fn role_of(face: BoxFace) -> FaceRole {
    match face {
        BoxFace::Top => FaceRole::Top,
        BoxFace::Bottom => FaceRole::Bottom,
        _ => FaceRole::Side,
    }
}

/// 4-bit mask of `neighbors` holding the same material as `v`.
pub fn plane_mask(v: &VoxelHandle<'_>, neighbors: &[GlobalVoxelOffset; 4]) -> u8 {
    let id = v.type_id();
    neighbors
        .iter()
        .zip(TRANSITION_MULTIPLIERS)
        .filter(|(o, _)| {
            v.neighbor(**o)
                .is_some_and(|n| !n.is_empty() && n.type_id() == id)
        })
        .map(|(_, m)| m)
        .sum()
}

/// Tiles for every face of `v`. Transition variants are only picked once
/// the voxel is explored; until then the plain tiles are used.
pub fn face_tiles(v: &VoxelHandle<'_>, ty: &VoxelType) -> FaceTileSet {
    let mut set = FaceTileSet::plain(ty);
    if !v.is_explored() {
        return set;
    }
    match ty.transitions {
        None => {}
        Some((TransitionKind::Horizontal, _)) => {
            let cardinals = Cardinal::ALL.map(Cardinal::offset);
            let mask = plane_mask(v, &cardinals);
            set.0[BoxFace::Top.index()] = ty.transition_tile(FaceRole::Top, mask);
        }
        Some((TransitionKind::Vertical, _)) => {
            let front_back = ty.transition_tile(FaceRole::Side, plane_mask(v, &PLANE_Z_NEIGHBORS));
            let left_right = ty.transition_tile(FaceRole::Side, plane_mask(v, &PLANE_X_NEIGHBORS));
            set.0[BoxFace::Front.index()] = front_back;
            set.0[BoxFace::Back.index()] = front_back;
            set.0[BoxFace::Left.index()] = left_right;
            set.0[BoxFace::Right.index()] = left_right;
        }
    }
    set
}
