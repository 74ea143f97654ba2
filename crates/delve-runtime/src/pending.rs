use std::sync::{Mutex, MutexGuard};

use delve_voxel::ChunkCoord;
use hashbrown::HashMap;

#[derive(Clone, Copy, Debug)]
struct Entry {
    rev: u64,
    /// A job for this chunk is sitting in a queue and has not started yet.
    queued: bool,
}

/// Latest requested revision per chunk. A chunk has at most one queued job;
/// further requests only raise the revision that job will report.
#[derive(Default)]
pub(crate) struct PendingRevisions {
    entries: Mutex<HashMap<ChunkCoord, Entry>>,
}

impl PendingRevisions {
    fn entries(&self) -> MutexGuard<'_, HashMap<ChunkCoord, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records a request at `rev`. Returns true when a new job must be queued.
    pub(crate) fn request(&self, coord: ChunkCoord, rev: u64) -> bool {
        let mut entries = self.entries();
        match entries.get_mut(&coord) {
            Some(e) if e.queued => {
                e.rev = rev;
                false
            }
            _ => {
                entries.insert(coord, Entry { rev, queued: true });
                true
            }
        }
    }

    /// A worker picked up the queued job for `coord`; returns the revision it
    /// now builds.
    pub(crate) fn start(&self, coord: ChunkCoord, job_rev: u64) -> u64 {
        match self.entries().get_mut(&coord) {
            Some(e) => {
                e.queued = false;
                e.rev
            }
            None => job_rev,
        }
    }

    /// Whether a finished build at `rev` is the newest one for `coord`; if so
    /// the chunk stops being pending.
    pub(crate) fn finish(&self, coord: ChunkCoord, rev: u64) -> bool {
        let mut entries = self.entries();
        let current = entries
            .get(&coord)
            .is_some_and(|e| e.rev == rev && !e.queued);
        if current {
            entries.remove(&coord);
        }
        current
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }
}
