//! Mesh worker pool: chunk meshes are built off the caller's thread and handed back over a channel.
#![forbid(unsafe_code)]

mod pending;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError, select, unbounded};
use delve_mesh::{ChunkMesh, MeshBuilder, MeshError, ViewSettings};
use delve_voxel::{ChunkCoord, ChunkManager, DesignationSet};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::pending::PendingRevisions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshJob {
    pub coord: ChunkCoord,
    pub rev: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    /// Player-visible edits; served first.
    Edit,
    Bg,
}

#[derive(Debug)]
pub enum MeshOutcome {
    Built(ChunkMesh),
    /// The chunk was removed before its job ran.
    Unloaded,
    Failed(MeshError),
}

#[derive(Debug)]
pub struct MeshJobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub kind: JobKind,
    pub outcome: MeshOutcome,
    pub t_total_ms: u32,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Everything a worker reads while building.
struct WorkerCtx {
    manager: Arc<RwLock<ChunkManager>>,
    designations: Arc<RwLock<DesignationSet>>,
    view: RwLock<ViewSettings>,
    builder: MeshBuilder,
    pending: PendingRevisions,
}

fn process_mesh_job(job: MeshJob, kind: JobKind, ctx: &WorkerCtx, tx: &Sender<MeshJobOut>) {
    let start = Instant::now();
    let rev = ctx.pending.start(job.coord, job.rev);
    let outcome = {
        let manager = read(&ctx.manager);
        match manager.get(job.coord).cloned() {
            None => MeshOutcome::Unloaded,
            Some(chunk) => {
                let designations = read(&ctx.designations);
                let view = *read(&ctx.view);
                match ctx
                    .builder
                    .build_chunk_mesh(&manager, &chunk, &designations, &view)
                {
                    Ok(mesh) => MeshOutcome::Built(mesh),
                    Err(e) => {
                        log::warn!("mesh {:?} rev={} failed: {}", job.coord, rev, e);
                        MeshOutcome::Failed(e)
                    }
                }
            }
        }
    };
    let _ = tx.send(MeshJobOut {
        coord: job.coord,
        rev,
        kind,
        outcome,
        t_total_ms: elapsed_ms(start),
    });
}

/// Queue counters for one lane.
#[derive(Default)]
struct LaneCounters {
    queued: AtomicUsize,
    inflight: AtomicUsize,
}

impl LaneCounters {
    fn run(&self, job: MeshJob, kind: JobKind, ctx: &WorkerCtx, tx: &Sender<MeshJobOut>) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        self.inflight.fetch_add(1, Ordering::Relaxed);
        process_mesh_job(job, kind, ctx, tx);
        self.inflight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Builds chunk meshes on a rayon pool.
///
/// One worker serves only the edit lane; the rest take background jobs and
/// help with edits whenever some are waiting. Requests for a chunk that
/// already has a queued job are folded into it, and results older than the
/// chunk's latest request are dropped by [`MeshWorkers::drain_ready`].
pub struct MeshWorkers {
    job_tx_edit: Sender<MeshJob>,
    job_tx_bg: Sender<MeshJob>,
    res_rx: Receiver<MeshJobOut>,
    _edit_pool: Arc<ThreadPool>,
    bg_pool: Option<Arc<ThreadPool>>,
    ctx: Arc<WorkerCtx>,
    edit: Arc<LaneCounters>,
    bg: Arc<LaneCounters>,
    next_rev: AtomicU64,
    pub w_edit: usize,
    pub w_bg: usize,
}

impl MeshWorkers {
    pub fn new(
        manager: Arc<RwLock<ChunkManager>>,
        designations: Arc<RwLock<DesignationSet>>,
        builder: MeshBuilder,
        view: ViewSettings,
        workers: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let (job_tx_edit, job_rx_edit) = unbounded::<MeshJob>();
        let (job_tx_bg, job_rx_bg) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshJobOut>();

        let w_edit = 1usize;
        let w_bg = workers.saturating_sub(w_edit);
        let ctx = Arc::new(WorkerCtx {
            manager,
            designations,
            view: RwLock::new(view),
            builder,
            pending: PendingRevisions::default(),
        });
        let edit = Arc::new(LaneCounters::default());
        let bg = Arc::new(LaneCounters::default());

        let edit_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_edit)
                .thread_name(|i| format!("delve-edit-{i}"))
                .build()?,
        );
        for _ in 0..w_edit {
            let rx = job_rx_edit.clone();
            let tx = res_tx.clone();
            let ctx = Arc::clone(&ctx);
            let edit = Arc::clone(&edit);
            edit_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    edit.run(job, JobKind::Edit, &ctx, &tx);
                }
            });
        }

        let bg_pool = if w_bg > 0 {
            let pool = Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(w_bg)
                    .thread_name(|i| format!("delve-bg-{i}"))
                    .build()?,
            );
            for _ in 0..w_bg {
                let bg_rx = job_rx_bg.clone();
                let edit_rx = job_rx_edit.clone();
                let tx = res_tx.clone();
                let ctx = Arc::clone(&ctx);
                let edit = Arc::clone(&edit);
                let bg = Arc::clone(&bg);
                pool.spawn(move || {
                    loop {
                        match edit_rx.try_recv() {
                            Ok(job) => {
                                edit.run(job, JobKind::Edit, &ctx, &tx);
                                continue;
                            }
                            Err(TryRecvError::Disconnected) => {
                                while let Ok(job) = bg_rx.recv() {
                                    bg.run(job, JobKind::Bg, &ctx, &tx);
                                }
                                break;
                            }
                            Err(TryRecvError::Empty) => {}
                        }

                        select! {
                            recv(bg_rx) -> res => match res {
                                Ok(job) => bg.run(job, JobKind::Bg, &ctx, &tx),
                                Err(_) => break,
                            },
                            recv(edit_rx) -> res => {
                                if let Ok(job) = res {
                                    edit.run(job, JobKind::Edit, &ctx, &tx);
                                }
                            },
                        }
                    }
                });
            }
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _edit_pool: edit_pool,
            bg_pool,
            ctx,
            edit,
            bg,
            next_rev: AtomicU64::new(1),
            w_edit,
            w_bg,
        })
    }

    /// Asks for `coord` to be (re)meshed. Returns the revision the eventual
    /// result will carry.
    pub fn request(&self, coord: ChunkCoord, kind: JobKind) -> u64 {
        let rev = self.next_rev.fetch_add(1, Ordering::Relaxed);
        if !self.ctx.pending.request(coord, rev) {
            return rev;
        }
        let job = MeshJob { coord, rev };
        let (tx, lane) = match kind {
            JobKind::Bg if self.bg_pool.is_some() => (&self.job_tx_bg, &self.bg),
            _ => (&self.job_tx_edit, &self.edit),
        };
        lane.queued.fetch_add(1, Ordering::Relaxed);
        if tx.send(job).is_err() {
            lane.queued.fetch_sub(1, Ordering::Relaxed);
        }
        rev
    }

    /// Requests every loaded chunk on the background lane.
    pub fn request_all(&self) -> usize {
        let coords: Vec<ChunkCoord> = read(&self.ctx.manager).chunk_coords().collect();
        for &c in &coords {
            self.request(c, JobKind::Bg);
        }
        coords.len()
    }

    /// Changes the designation filter. Cached slices were built under the old
    /// filter, so every chunk's cache is dropped.
    pub fn set_view(&self, view: ViewSettings) {
        {
            let mut current = self.ctx.view.write().unwrap_or_else(|e| e.into_inner());
            if *current == view {
                return;
            }
            *current = view;
        }
        for chunk in read(&self.ctx.manager).chunks() {
            chunk.slice_cache().invalidate_all();
        }
    }

    /// Finished results that are still the newest for their chunk.
    pub fn drain_ready(&self) -> Vec<MeshJobOut> {
        self.accept(self.res_rx.try_iter())
    }

    /// Like [`Self::drain_ready`], but waits up to `timeout` for the first result.
    pub fn recv_ready(&self, timeout: Duration) -> Vec<MeshJobOut> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(first) => self.accept(std::iter::once(first).chain(self.res_rx.try_iter())),
            Err(_) => Vec::new(),
        }
    }

    fn accept(&self, outs: impl Iterator<Item = MeshJobOut>) -> Vec<MeshJobOut> {
        outs.filter(|out| {
            let current = self.ctx.pending.finish(out.coord, out.rev);
            if !current {
                log::trace!("drop stale mesh {:?} rev={}", out.coord, out.rev);
            }
            current
        })
        .collect()
    }

    /// Chunks requested whose newest result has not been drained yet.
    pub fn pending(&self) -> usize {
        self.ctx.pending.len()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.edit.queued.load(Ordering::Relaxed),
            self.edit.inflight.load(Ordering::Relaxed),
            self.bg.queued.load(Ordering::Relaxed),
            self.bg.inflight.load(Ordering::Relaxed),
        )
    }
}
