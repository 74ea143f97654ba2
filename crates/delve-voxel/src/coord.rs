use serde::{Deserialize, Serialize};

use crate::constants::{
    CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, SELECTION_ID_BIT, SELECTION_ID_X_MASK,
    SELECTION_ID_X_SHIFT, SELECTION_ID_Y_MASK, SELECTION_ID_Y_SHIFT, SELECTION_ID_Z_MASK,
    SELECTION_ID_Z_SHIFT, X_DIV_SHIFT, X_MOD_MASK, Y_DIV_SHIFT, Y_MOD_MASK, Z_DIV_SHIFT,
    Z_MOD_MASK, data_index_of,
};

/// Position of a chunk in the chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Global coordinate of the chunk's (0,0,0) voxel.
    #[inline]
    pub fn origin(self) -> GlobalVoxelCoordinate {
        GlobalVoxelCoordinate::new(
            self.cx << X_DIV_SHIFT,
            self.cy << Y_DIV_SHIFT,
            self.cz << Z_DIV_SHIFT,
        )
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Position of a voxel inside its chunk; every component is `< 16`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalVoxelCoordinate {
    x: u8,
    y: u8,
    z: u8,
}

impl LocalVoxelCoordinate {
    #[inline]
    pub fn new(x: usize, y: usize, z: usize) -> Option<Self> {
        (x < CHUNK_SIZE_X && y < CHUNK_SIZE_Y && z < CHUNK_SIZE_Z).then_some(Self {
            x: x as u8,
            y: y as u8,
            z: z as u8,
        })
    }

    #[inline]
    pub fn x(self) -> usize {
        self.x as usize
    }
    #[inline]
    pub fn y(self) -> usize {
        self.y as usize
    }
    #[inline]
    pub fn z(self) -> usize {
        self.z as usize
    }

    /// Linear index into the chunk's voxel arrays.
    #[inline]
    pub fn index(self) -> usize {
        data_index_of(self.x(), self.y(), self.z())
    }

    /// Iterates the 256 coordinates of one horizontal slice, x outer and z inner.
    pub fn slice(y: usize) -> impl Iterator<Item = LocalVoxelCoordinate> {
        let y = y.min(CHUNK_SIZE_Y - 1) as u8;
        (0..CHUNK_SIZE_X as u8)
            .flat_map(move |x| (0..CHUNK_SIZE_Z as u8).map(move |z| LocalVoxelCoordinate { x, y, z }))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlobalVoxelOffset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl GlobalVoxelOffset {
    #[inline]
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}

/// Position of a voxel in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalVoxelCoordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GlobalVoxelCoordinate {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_chunk_local(chunk: ChunkCoord, local: LocalVoxelCoordinate) -> Self {
        let o = chunk.origin();
        Self::new(
            o.x + local.x() as i32,
            o.y + local.y() as i32,
            o.z + local.z() as i32,
        )
    }

    /// Chunk containing this voxel (arithmetic shift floors negative values).
    #[inline]
    pub fn chunk(self) -> ChunkCoord {
        ChunkCoord::new(self.x >> X_DIV_SHIFT, self.y >> Y_DIV_SHIFT, self.z >> Z_DIV_SHIFT)
    }

    #[inline]
    pub fn local(self) -> LocalVoxelCoordinate {
        LocalVoxelCoordinate {
            x: (self.x & X_MOD_MASK) as u8,
            y: (self.y & Y_MOD_MASK) as u8,
            z: (self.z & Z_MOD_MASK) as u8,
        }
    }

    #[inline]
    pub fn offset(self, d: GlobalVoxelOffset) -> Self {
        Self::new(self.x + d.dx, self.y + d.dy, self.z + d.dz)
    }

    #[inline]
    pub fn offset_xyz(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Packs the coordinate into a picking id. Coordinates outside the packable
    /// range (negative, or beyond 12/12/7 bits) yield `None`.
    pub fn selection_id(self) -> Option<u32> {
        let fits = |v: i32, mask: u32| v >= 0 && (v as u32) <= mask;
        if !fits(self.x, SELECTION_ID_X_MASK)
            || !fits(self.y, SELECTION_ID_Y_MASK)
            || !fits(self.z, SELECTION_ID_Z_MASK)
        {
            return None;
        }
        Some(
            SELECTION_ID_BIT
                | ((self.y as u32) << SELECTION_ID_Y_SHIFT)
                | ((self.x as u32) << SELECTION_ID_X_SHIFT)
                | ((self.z as u32) << SELECTION_ID_Z_SHIFT),
        )
    }

    pub fn from_selection_id(id: u32) -> Option<Self> {
        if id & SELECTION_ID_BIT == 0 {
            return None;
        }
        Some(Self::new(
            ((id >> SELECTION_ID_X_SHIFT) & SELECTION_ID_X_MASK) as i32,
            ((id >> SELECTION_ID_Y_SHIFT) & SELECTION_ID_Y_MASK) as i32,
            ((id >> SELECTION_ID_Z_SHIFT) & SELECTION_ID_Z_MASK) as i32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_globals_floor_into_previous_chunk() {
        let g = GlobalVoxelCoordinate::new(-1, -16, -17);
        assert_eq!(g.chunk(), ChunkCoord::new(-1, -1, -2));
        assert_eq!((g.local().x(), g.local().y(), g.local().z()), (15, 0, 15));
        assert_eq!(GlobalVoxelCoordinate::from_chunk_local(g.chunk(), g.local()), g);
    }

    #[test]
    fn local_rejects_out_of_range() {
        assert!(LocalVoxelCoordinate::new(16, 0, 0).is_none());
        assert!(LocalVoxelCoordinate::new(15, 15, 15).is_some());
    }

    #[test]
    fn slice_iterates_x_outer_z_inner() {
        let v: Vec<_> = LocalVoxelCoordinate::slice(2).take(17).collect();
        assert_eq!((v[1].x(), v[1].z()), (0, 1));
        assert_eq!((v[16].x(), v[16].z()), (1, 0));
        assert!(v.iter().all(|c| c.y() == 2));
        assert_eq!(LocalVoxelCoordinate::slice(0).count(), 256);
    }

    #[test]
    fn selection_id_round_trips_and_rejects_unpackable() {
        let g = GlobalVoxelCoordinate::new(4095, 127, 17);
        let id = g.selection_id().unwrap();
        assert_ne!(id & SELECTION_ID_BIT, 0);
        assert_eq!(GlobalVoxelCoordinate::from_selection_id(id), Some(g));
        assert_eq!(GlobalVoxelCoordinate::new(-1, 0, 0).selection_id(), None);
        assert_eq!(GlobalVoxelCoordinate::new(0, 128, 0).selection_id(), None);
        assert_eq!(GlobalVoxelCoordinate::from_selection_id(0x0000_1234), None);
    }
}
