//! Tile addressing in the square terrain atlas.

use delve_geom::{UvBounds, Vec2};
use serde::{Deserialize, Serialize};

/// Tiles per atlas row and column.
pub const ATLAS_TILES: u8 = 16;
const TILE_UV: f32 = 1.0 / ATLAS_TILES as f32;
// Keeps bilinear sampling from bleeding into the next tile.
const BOUNDS_INSET: f32 = 0.001;

/// Atlas cell, written `[col, row]` in catalog files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct Tile {
    pub col: u8,
    pub row: u8,
}

impl Tile {
    #[inline]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// UV of the tile's top-left corner.
    #[inline]
    pub fn uv_origin(self) -> Vec2 {
        Vec2::new(self.col as f32 * TILE_UV, self.row as f32 * TILE_UV)
    }

    /// Maps a unit-square UV into this tile.
    #[inline]
    pub fn uv(self, unit: Vec2) -> Vec2 {
        self.uv_origin() + unit * TILE_UV
    }

    #[inline]
    pub fn bounds(self) -> UvBounds {
        let o = self.uv_origin();
        UvBounds::new(
            o.x + BOUNDS_INSET,
            o.y + BOUNDS_INSET,
            o.x + TILE_UV - BOUNDS_INSET,
            o.y + TILE_UV - BOUNDS_INSET,
        )
    }

    /// The `n`-th tile after this one along its row, wrapping within the row.
    #[inline]
    pub fn nth_in_row(self, n: u8) -> Tile {
        Tile::new((self.col.wrapping_add(n)) % ATLAS_TILES, self.row)
    }
}

impl From<[u8; 2]> for Tile {
    fn from(v: [u8; 2]) -> Self {
        Tile::new(v[0] % ATLAS_TILES, v[1] % ATLAS_TILES)
    }
}

impl From<Tile> for [u8; 2] {
    fn from(t: Tile) -> Self {
        [t.col, t.row]
    }
}
