use serde::Deserialize;

use crate::atlas::Tile;

pub type VoxelTypeId = u8;
pub type GrassTypeId = u8;

/// Which tile slot of a voxel's box a face draws from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// Autotile family of a material with transition textures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Top face picks a variant from its 4 horizontal neighbors.
    Horizontal,
    /// Side faces pick variants from their in-plane neighbors.
    Vertical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceTiles {
    pub top: Tile,
    pub bottom: Tile,
    pub side: Tile,
}

impl FaceTiles {
    #[inline]
    pub fn get(&self, role: FaceRole) -> Tile {
        match role {
            FaceRole::Top => self.top,
            FaceRole::Bottom => self.bottom,
            FaceRole::Side => self.side,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoxelType {
    pub id: VoxelTypeId,
    pub name: String,
    pub transparent: bool,
    pub emits_light: bool,
    pub can_ramp: bool,
    /// How far a lowered ramp corner drops, in voxel units.
    pub ramp_size: f32,
    pub tint: [u8; 4],
    pub tiles: FaceTiles,
    /// Autotile family and the first tile of its 16-variant row.
    pub transitions: Option<(TransitionKind, Tile)>,
}

impl VoxelType {
    #[inline]
    pub fn has_transition_textures(&self) -> bool {
        self.transitions.is_some()
    }

    /// Tile for a face given the autotile mask computed for that face.
    pub fn transition_tile(&self, role: FaceRole, mask: u8) -> Tile {
        match self.transitions {
            Some((TransitionKind::Horizontal, origin)) if role == FaceRole::Top => {
                origin.nth_in_row(mask)
            }
            Some((TransitionKind::Vertical, origin)) if role == FaceRole::Side => {
                origin.nth_in_row(mask)
            }
            _ => self.tiles.get(role),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrassType {
    pub id: GrassTypeId,
    pub name: String,
    pub tile: Tile,
    pub tint: [u8; 4],
    /// A neighbor whose grass has equal or higher precedence suppresses our fringe toward it.
    pub fringe_precedence: i32,
    /// Four cardinal (N, E, S, W) then four diagonal (NW, NE, SE, SW) tiles.
    pub fringe_tiles: Option<[Tile; 8]>,
}
