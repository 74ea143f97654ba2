//! Chunk dimensions and the bit layout of the packed per-voxel bytes.
//!
//! Every mask here is part of the persisted chunk format: changing one needs a
//! migration of saved chunk data.

pub const CHUNK_SIZE_X: usize = 16;
pub const CHUNK_SIZE_Y: usize = 16;
pub const CHUNK_SIZE_Z: usize = 16;
pub const CHUNK_VOXEL_COUNT: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

// Global -> chunk (shift) and global -> local (mask) conversion.
pub const X_DIV_SHIFT: u32 = 4;
pub const Y_DIV_SHIFT: u32 = 4;
pub const Z_DIV_SHIFT: u32 = 4;
pub const X_MOD_MASK: i32 = 0xF;
pub const Y_MOD_MASK: i32 = 0xF;
pub const Z_MOD_MASK: i32 = 0xF;

pub const MAXIMUM_VOXEL_TYPES: usize = 256;

// grass[] byte: high nibble type, low nibble decay
pub const MAXIMUM_GRASS_TYPES: usize = 16;
pub const GRASS_TYPE_SHIFT: u32 = 4;
pub const GRASS_TYPE_MASK: u8 = 0xF0;
pub const INVERSE_GRASS_TYPE_MASK: u8 = !GRASS_TYPE_MASK;
pub const MAXIMUM_GRASS_DECAY: u8 = 16;
pub const GRASS_DECAY_MASK: u8 = 0x0F;
pub const INVERSE_GRASS_DECAY_MASK: u8 = !GRASS_DECAY_MASK;

// flags[] byte: ramp corners, sunlit, explored, player-built
pub const RAMP_TYPE_SHIFT: u32 = 0;
pub const RAMP_TYPE_MASK: u8 = 0x1F;
pub const INVERSE_RAMP_TYPE_MASK: u8 = !RAMP_TYPE_MASK;
pub const SUNLIGHT_SHIFT: u32 = 5;
pub const SUNLIGHT_MASK: u8 = 0x20;
pub const INVERSE_SUNLIGHT_MASK: u8 = !SUNLIGHT_MASK;
pub const EXPLORED_SHIFT: u32 = 6;
pub const EXPLORED_MASK: u8 = 0x40;
pub const INVERSE_EXPLORED_MASK: u8 = !EXPLORED_MASK;
pub const PLAYER_BUILT_SHIFT: u32 = 7;
pub const PLAYER_BUILT_MASK: u8 = 0x80;
pub const INVERSE_PLAYER_BUILT_MASK: u8 = !PLAYER_BUILT_MASK;

// liquid[] byte: type in the top two bits, level below
pub const LIQUID_TYPE_SHIFT: u32 = 6;
pub const LIQUID_TYPE_MASK: u8 = 0xC0;
pub const INVERSE_LIQUID_TYPE_MASK: u8 = !LIQUID_TYPE_MASK;
pub const LIQUID_LEVEL_MASK: u8 = 0x3F;
pub const INVERSE_LIQUID_LEVEL_MASK: u8 = !LIQUID_LEVEL_MASK;
pub const MAXIMUM_LIQUID_LEVEL: u8 = LIQUID_LEVEL_MASK;

// Packed voxel selection ids (picking buffer)
pub const SELECTION_ID_BIT: u32 = 0x8000_0000;
pub const SELECTION_ID_Y_MASK: u32 = 0x7F;
pub const SELECTION_ID_Y_SHIFT: u32 = 24;
pub const SELECTION_ID_X_MASK: u32 = 0xFFF;
pub const SELECTION_ID_X_SHIFT: u32 = 12;
pub const SELECTION_ID_Z_MASK: u32 = 0xFFF;
pub const SELECTION_ID_Z_SHIFT: u32 = 0;

/// Linear index of a local coordinate. Y is the slowest axis so a horizontal
/// slice is one contiguous run of `CHUNK_SIZE_X * CHUNK_SIZE_Z` entries.
#[inline]
pub const fn data_index_of(x: usize, y: usize, z: usize) -> usize {
    (y * CHUNK_SIZE_Z + z) * CHUNK_SIZE_X + x
}

/// Inverse of [`data_index_of`].
#[inline]
pub const fn coordinate_of_index(i: usize) -> (usize, usize, usize) {
    let x = i % CHUNK_SIZE_X;
    let z = (i / CHUNK_SIZE_X) % CHUNK_SIZE_Z;
    let y = i / (CHUNK_SIZE_X * CHUNK_SIZE_Z);
    (x, y, z)
}
