use delve_catalog::{GrassTypeId, VoxelType, VoxelTypeId};
use delve_geom::Vec3;

use crate::chunk::VoxelChunk;
use crate::constants::{
    CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, EXPLORED_MASK, GRASS_DECAY_MASK, GRASS_TYPE_MASK,
    GRASS_TYPE_SHIFT, LIQUID_LEVEL_MASK, LIQUID_TYPE_MASK, LIQUID_TYPE_SHIFT,
    MAXIMUM_LIQUID_LEVEL, PLAYER_BUILT_MASK, RAMP_TYPE_MASK, SUNLIGHT_MASK,
};
use crate::coord::{GlobalVoxelCoordinate, GlobalVoxelOffset, LocalVoxelCoordinate};
use crate::data::Field;
use crate::manager::ChunkManager;
use crate::tables::RampType;

/// Borrowed view of one voxel.
///
/// Handles are obtained from [`ChunkManager::resolve`] and cannot outlive the
/// manager borrow. Every setter that can change what the voxel looks like
/// invalidates the affected slice meshes itself.
#[derive(Clone, Copy)]
pub struct VoxelHandle<'a> {
    manager: &'a ChunkManager,
    chunk: &'a VoxelChunk,
    local: LocalVoxelCoordinate,
    index: usize,
}

impl<'a> VoxelHandle<'a> {
    #[inline]
    pub(crate) fn new(
        manager: &'a ChunkManager,
        chunk: &'a VoxelChunk,
        local: LocalVoxelCoordinate,
    ) -> Self {
        Self {
            manager,
            chunk,
            local,
            index: local.index(),
        }
    }

    #[inline]
    pub fn manager(&self) -> &'a ChunkManager {
        self.manager
    }

    #[inline]
    pub fn chunk(&self) -> &'a VoxelChunk {
        self.chunk
    }

    #[inline]
    pub fn local(&self) -> LocalVoxelCoordinate {
        self.local
    }

    #[inline]
    pub fn coordinate(&self) -> GlobalVoxelCoordinate {
        GlobalVoxelCoordinate::from_chunk_local(self.chunk.coord(), self.local)
    }

    /// Minimum corner of the voxel in world units.
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        let g = self.coordinate();
        Vec3::new(g.x as f32, g.y as f32, g.z as f32)
    }

    /// Neighbor at `d`, staying inside this chunk without a map lookup when possible.
    #[inline]
    pub fn neighbor(&self, d: GlobalVoxelOffset) -> Option<VoxelHandle<'a>> {
        let x = self.local.x() as i32 + d.dx;
        let y = self.local.y() as i32 + d.dy;
        let z = self.local.z() as i32 + d.dz;
        let inside = (0..CHUNK_SIZE_X as i32).contains(&x)
            && (0..CHUNK_SIZE_Y as i32).contains(&y)
            && (0..CHUNK_SIZE_Z as i32).contains(&z);
        if inside {
            let local = LocalVoxelCoordinate::new(x as usize, y as usize, z as usize)?;
            Some(VoxelHandle::new(self.manager, self.chunk, local))
        } else {
            self.manager.resolve(self.coordinate().offset(d))
        }
    }

    #[inline]
    fn load(&self, field: Field) -> u8 {
        self.chunk.data().load(field, self.index)
    }

    #[inline]
    fn update(&self, field: Field, mask: u8, value: u8) -> u8 {
        self.chunk.data().update(field, self.index, mask, value)
    }

    // --- reads ---

    #[inline]
    pub fn type_id(&self) -> VoxelTypeId {
        self.load(Field::Type)
    }

    /// Catalog entry of the voxel's material; `None` for empty voxels and ids
    /// the catalog does not know.
    #[inline]
    pub fn voxel_type(&self) -> Option<&'a VoxelType> {
        self.manager.catalog().voxel_type(self.type_id())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_id() == 0
    }

    #[inline]
    pub fn grass_type(&self) -> GrassTypeId {
        (self.load(Field::Grass) & GRASS_TYPE_MASK) >> GRASS_TYPE_SHIFT
    }

    #[inline]
    pub fn grass_decay(&self) -> u8 {
        self.load(Field::Grass) & GRASS_DECAY_MASK
    }

    #[inline]
    pub fn liquid_type(&self) -> u8 {
        (self.load(Field::Liquid) & LIQUID_TYPE_MASK) >> LIQUID_TYPE_SHIFT
    }

    #[inline]
    pub fn liquid_level(&self) -> u8 {
        self.load(Field::Liquid) & LIQUID_LEVEL_MASK
    }

    #[inline]
    pub fn ramp_type(&self) -> RampType {
        RampType::from_bits(self.load(Field::Flags))
    }

    #[inline]
    pub fn sunlight(&self) -> bool {
        self.load(Field::Flags) & SUNLIGHT_MASK != 0
    }

    #[inline]
    pub fn is_explored(&self) -> bool {
        self.load(Field::Flags) & EXPLORED_MASK != 0
    }

    #[inline]
    pub fn is_player_built(&self) -> bool {
        self.load(Field::Flags) & PLAYER_BUILT_MASK != 0
    }

    /// Below the cutaway plane.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.coordinate().y < self.manager.max_viewing_level()
    }

    // --- writes ---

    fn changed(&self) {
        self.manager.invalidate_voxel(self.coordinate());
    }

    /// Sets the material. Emptying a voxel also clears its grass and ramp bits.
    pub fn set_type(&self, id: VoxelTypeId) {
        let prev = self.update(Field::Type, 0xFF, id);
        if prev == id {
            return;
        }
        let data = self.chunk.data();
        if (prev == 0) != (id == 0) {
            data.adjust_voxels_present(self.local.y(), id != 0);
        }
        if id == 0 {
            self.update(Field::Grass, 0xFF, 0);
            self.update(Field::Flags, RAMP_TYPE_MASK, 0);
        }
        self.changed();
    }

    /// Grass ids occupy the high nibble; `grass` must be below 16.
    pub fn set_grass_type(&self, grass: GrassTypeId) {
        debug_assert!(
            grass <= GRASS_TYPE_MASK >> GRASS_TYPE_SHIFT,
            "grass type {grass} out of range"
        );
        let value = grass << GRASS_TYPE_SHIFT;
        let prev = self.update(Field::Grass, GRASS_TYPE_MASK, value);
        if prev & GRASS_TYPE_MASK != value & GRASS_TYPE_MASK {
            self.changed();
        }
    }

    /// `decay` must fit the low nibble (0..=15).
    pub fn set_grass_decay(&self, decay: u8) {
        debug_assert!(decay <= GRASS_DECAY_MASK, "grass decay {decay} out of range");
        let prev = self.update(Field::Grass, GRASS_DECAY_MASK, decay);
        if prev & GRASS_DECAY_MASK != decay & GRASS_DECAY_MASK {
            self.changed();
        }
    }

    /// Liquid types take the top two bits; `liquid` must be below 4.
    pub fn set_liquid_type(&self, liquid: u8) {
        debug_assert!(
            liquid <= LIQUID_TYPE_MASK >> LIQUID_TYPE_SHIFT,
            "liquid type {liquid} out of range"
        );
        let value = liquid << LIQUID_TYPE_SHIFT;
        let prev = self.update(Field::Liquid, LIQUID_TYPE_MASK, value);
        let had = prev & LIQUID_TYPE_MASK != 0;
        let has = value & LIQUID_TYPE_MASK != 0;
        if had != has {
            self.chunk.data().adjust_liquid_present(self.local.y(), has);
        }
        if prev & LIQUID_TYPE_MASK != value & LIQUID_TYPE_MASK {
            self.changed();
        }
    }

    /// `level` runs from 0 to [`MAXIMUM_LIQUID_LEVEL`].
    pub fn set_liquid_level(&self, level: u8) {
        debug_assert!(level <= MAXIMUM_LIQUID_LEVEL, "liquid level {level} out of range");
        let prev = self.update(Field::Liquid, LIQUID_LEVEL_MASK, level);
        if prev & LIQUID_LEVEL_MASK != level & LIQUID_LEVEL_MASK {
            self.changed();
        }
    }

    pub fn set_ramp_type(&self, ramp: RampType) {
        if self.store_ramp(ramp) {
            self.changed();
        }
    }

    /// Writes ramp bits without invalidating anything. Used by the mesher's
    /// ramp pass, which owns the invalidation of what it recomputes.
    /// Returns whether the bits changed.
    pub fn store_ramp(&self, ramp: RampType) -> bool {
        let prev = self.update(Field::Flags, RAMP_TYPE_MASK, ramp.bits());
        prev & RAMP_TYPE_MASK != ramp.bits()
    }

    pub fn set_sunlight(&self, sunlit: bool) {
        self.set_flag(SUNLIGHT_MASK, sunlit);
    }

    pub fn set_explored(&self, explored: bool) {
        self.set_flag(EXPLORED_MASK, explored);
    }

    /// Bookkeeping only; does not affect rendering.
    pub fn set_player_built(&self, built: bool) {
        self.update(Field::Flags, PLAYER_BUILT_MASK, if built { PLAYER_BUILT_MASK } else { 0 });
    }

    fn set_flag(&self, mask: u8, on: bool) {
        let prev = self.update(Field::Flags, mask, if on { mask } else { 0 });
        if (prev & mask != 0) != on {
            self.changed();
        }
    }
}

impl core::fmt::Debug for VoxelHandle<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VoxelHandle")
            .field("coordinate", &self.coordinate())
            .field("type", &self.type_id())
            .finish()
    }
}
