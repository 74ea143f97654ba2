use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use delve_geom::MeshBuild;

use crate::constants::{CHUNK_SIZE_Y, CHUNK_VOXEL_COUNT};

/// Which packed byte array a raw access targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Field {
    Type,
    Grass,
    Liquid,
    Flags,
}

/// Per-voxel storage of one chunk.
///
/// Bytes are atomics so a mesher can read a chunk through a shared reference
/// while gameplay edits it; every packed-field write is one read-modify-write
/// and never disturbs the other bits of its byte. All mutation goes through
/// [`crate::VoxelHandle`].
pub struct VoxelData {
    types: Box<[AtomicU8]>,
    grass: Box<[AtomicU8]>,
    liquid: Box<[AtomicU8]>,
    flags: Box<[AtomicU8]>,
    voxels_present: [AtomicU32; CHUNK_SIZE_Y],
    liquid_present: [AtomicU32; CHUNK_SIZE_Y],
    slice_cache: SliceCache,
}

fn zeroed_bytes() -> Box<[AtomicU8]> {
    (0..CHUNK_VOXEL_COUNT).map(|_| AtomicU8::new(0)).collect()
}

impl VoxelData {
    /// All voxels empty, unexplored and unlit; every slice uncached.
    pub fn allocate() -> Self {
        Self {
            types: zeroed_bytes(),
            grass: zeroed_bytes(),
            liquid: zeroed_bytes(),
            flags: zeroed_bytes(),
            voxels_present: std::array::from_fn(|_| AtomicU32::new(0)),
            liquid_present: std::array::from_fn(|_| AtomicU32::new(0)),
            slice_cache: SliceCache::new(),
        }
    }

    /// Number of non-empty voxels in slice `y`.
    #[inline]
    pub fn voxels_present(&self, y: usize) -> u32 {
        self.voxels_present[y].load(Ordering::Relaxed)
    }

    /// Number of voxels holding liquid in slice `y`.
    #[inline]
    pub fn liquid_present(&self, y: usize) -> u32 {
        self.liquid_present[y].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn slice_cache(&self) -> &SliceCache {
        &self.slice_cache
    }

    #[inline]
    fn bytes(&self, field: Field) -> &[AtomicU8] {
        match field {
            Field::Type => &self.types,
            Field::Grass => &self.grass,
            Field::Liquid => &self.liquid,
            Field::Flags => &self.flags,
        }
    }

    #[inline]
    pub(crate) fn load(&self, field: Field, i: usize) -> u8 {
        self.bytes(field)[i].load(Ordering::Relaxed)
    }

    /// Replaces the bits under `mask` with `value` and returns the previous byte.
    #[inline]
    pub(crate) fn update(&self, field: Field, i: usize, mask: u8, value: u8) -> u8 {
        let cell = &self.bytes(field)[i];
        match cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |b| {
            Some((b & !mask) | (value & mask))
        }) {
            Ok(prev) | Err(prev) => prev,
        }
    }

    #[inline]
    pub(crate) fn adjust_voxels_present(&self, y: usize, became_solid: bool) {
        adjust(&self.voxels_present[y], became_solid);
    }

    #[inline]
    pub(crate) fn adjust_liquid_present(&self, y: usize, became_liquid: bool) {
        adjust(&self.liquid_present[y], became_liquid);
    }
}

#[inline]
fn adjust(counter: &AtomicU32, up: bool) {
    if up {
        counter.fetch_add(1, Ordering::Relaxed);
    } else {
        // saturating
        let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| c.checked_sub(1));
    }
}

#[derive(Default, Clone)]
struct SliceSlot {
    geometry: Option<Arc<MeshBuild>>,
    generation: u64,
}

/// Result of checking one slice's cache slot.
#[derive(Clone, Debug)]
pub enum SliceLookup {
    Cached(Arc<MeshBuild>),
    /// Build the slice, then hand this generation back to [`SliceCache::store`].
    Missing { generation: u64 },
}

/// Per-slice mesh cache guarded by one chunk-scoped lock.
///
/// Each invalidation bumps the slot's generation; a build that started before
/// the bump cannot store its (stale) result.
pub struct SliceCache {
    slots: Mutex<[SliceSlot; CHUNK_SIZE_Y]>,
}

impl SliceCache {
    fn new() -> Self {
        Self {
            slots: Mutex::new(std::array::from_fn(|_| SliceSlot::default())),
        }
    }

    // Poisoning is ignored: slots only hold derived data.
    fn slots(&self) -> MutexGuard<'_, [SliceSlot; CHUNK_SIZE_Y]> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn lookup(&self, y: usize) -> SliceLookup {
        let slots = self.slots();
        let slot = &slots[y];
        match &slot.geometry {
            Some(g) => SliceLookup::Cached(Arc::clone(g)),
            None => SliceLookup::Missing {
                generation: slot.generation,
            },
        }
    }

    /// Stores built geometry if the slot was not invalidated since `generation`
    /// was handed out. Returns whether it was stored.
    pub fn store(&self, y: usize, generation: u64, geometry: Arc<MeshBuild>) -> bool {
        let mut slots = self.slots();
        let slot = &mut slots[y];
        if slot.generation != generation {
            return false;
        }
        slot.geometry = Some(geometry);
        true
    }

    pub fn invalidate(&self, y: usize) {
        let mut slots = self.slots();
        let slot = &mut slots[y];
        slot.geometry = None;
        slot.generation = slot.generation.wrapping_add(1);
    }

    pub fn invalidate_all(&self) {
        let mut slots = self.slots();
        for slot in slots.iter_mut() {
            slot.geometry = None;
            slot.generation = slot.generation.wrapping_add(1);
        }
    }

    pub fn is_cached(&self, y: usize) -> bool {
        self.slots()[y].geometry.is_some()
    }
}
