use delve_catalog::DesignationType;
use hashbrown::HashMap;

use crate::coord::{ChunkCoord, GlobalVoxelCoordinate};
use crate::manager::ChunkManager;

/// A player order attached to one voxel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelDesignation {
    pub kind: DesignationType,
    /// Voxel type name a build preview shows; `None` uses the catalog default.
    pub tag: Option<String>,
}

impl VoxelDesignation {
    pub fn new(kind: DesignationType) -> Self {
        Self { kind, tag: None }
    }

    pub fn with_tag(kind: DesignationType, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: Some(tag.into()),
        }
    }
}

/// Designations by voxel, with a per-slice count so the mesher can skip
/// slices that have neither voxels nor overlays.
#[derive(Default, Debug)]
pub struct DesignationSet {
    by_voxel: HashMap<GlobalVoxelCoordinate, Vec<VoxelDesignation>>,
    per_slice: HashMap<(ChunkCoord, u8), u32>,
}

fn slice_key(at: GlobalVoxelCoordinate) -> (ChunkCoord, u8) {
    (at.chunk(), at.local().y() as u8)
}

impl DesignationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `d` unless a designation of the same kind is already on the voxel.
    /// Callers that are not going through [`Self::add_and_invalidate`] must
    /// invalidate the voxel themselves.
    pub fn add(&mut self, at: GlobalVoxelCoordinate, d: VoxelDesignation) -> bool {
        let list = self.by_voxel.entry(at).or_default();
        if list.iter().any(|e| e.kind == d.kind) {
            return false;
        }
        list.push(d);
        *self.per_slice.entry(slice_key(at)).or_default() += 1;
        true
    }

    pub fn remove(&mut self, at: GlobalVoxelCoordinate, kind: DesignationType) -> Option<VoxelDesignation> {
        let list = self.by_voxel.get_mut(&at)?;
        let pos = list.iter().position(|e| e.kind == kind)?;
        let out = list.remove(pos);
        if list.is_empty() {
            self.by_voxel.remove(&at);
        }
        let key = slice_key(at);
        if let Some(c) = self.per_slice.get_mut(&key) {
            *c -= 1;
            if *c == 0 {
                self.per_slice.remove(&key);
            }
        }
        Some(out)
    }

    pub fn add_and_invalidate(
        &mut self,
        manager: &ChunkManager,
        at: GlobalVoxelCoordinate,
        d: VoxelDesignation,
    ) -> bool {
        let added = self.add(at, d);
        if added {
            manager.invalidate_voxel(at);
        }
        added
    }

    pub fn remove_and_invalidate(
        &mut self,
        manager: &ChunkManager,
        at: GlobalVoxelCoordinate,
        kind: DesignationType,
    ) -> Option<VoxelDesignation> {
        let out = self.remove(at, kind);
        if out.is_some() {
            manager.invalidate_voxel(at);
        }
        out
    }

    pub fn enumerate(&self, at: GlobalVoxelCoordinate) -> impl Iterator<Item = &VoxelDesignation> {
        self.by_voxel.get(&at).into_iter().flatten()
    }

    pub fn contains(&self, at: GlobalVoxelCoordinate, kind: DesignationType) -> bool {
        self.enumerate(at).any(|d| d.kind == kind)
    }

    pub fn any_in_slice(&self, chunk: ChunkCoord, local_y: usize) -> bool {
        self.per_slice.contains_key(&(chunk, local_y as u8))
    }

    pub fn len(&self) -> usize {
        self.by_voxel.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_voxel.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_tracks_slices() {
        let mut set = DesignationSet::new();
        let at = GlobalVoxelCoordinate::new(-1, 17, 3);
        assert!(set.add(at, VoxelDesignation::new(DesignationType::DIG)));
        assert!(!set.add(at, VoxelDesignation::new(DesignationType::DIG)));
        assert!(set.add(at, VoxelDesignation::with_tag(DesignationType::PUT, "Stone")));
        assert_eq!(set.len(), 2);
        assert!(set.any_in_slice(ChunkCoord::new(-1, 1, 0), 1));
        assert!(!set.any_in_slice(ChunkCoord::new(-1, 1, 0), 2));

        assert!(set.remove(at, DesignationType::DIG).is_some());
        assert!(set.any_in_slice(ChunkCoord::new(-1, 1, 0), 1));
        assert!(set.remove(at, DesignationType::PUT).is_some());
        assert!(!set.any_in_slice(ChunkCoord::new(-1, 1, 0), 1));
        assert!(set.is_empty());
        assert!(set.remove(at, DesignationType::PUT).is_none());
    }
}
