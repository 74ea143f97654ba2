mod demo;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use clap::Parser;
use delve_catalog::{Catalog, DesignationType};
use delve_mesh::{GrassMotes, MeshBuilder, MeshStats, load_settings};
use delve_runtime::{JobKind, MeshOutcome, MeshWorkers};
use delve_voxel::{ChunkCoord, ChunkManager, DesignationSet};
use hashbrown::{HashMap, HashSet};

#[derive(Parser, Debug)]
#[command(name = "delve", about = "Generate a voxel world and build its chunk surface meshes")]
struct Args {
    /// Voxel, grass and designation catalog
    #[arg(long, default_value = "assets/catalog.toml")]
    catalog: PathBuf,
    /// Mesher switches and view filter
    #[arg(long, default_value = "assets/mesh_settings.toml")]
    settings: PathBuf,
    /// World size in chunks along x and z
    #[arg(long, default_value_t = 4)]
    chunks: i32,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Cut the world away at this height
    #[arg(long)]
    view_level: Option<i32>,
    /// Mesh worker threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Log filter, e.g. "info" or "debug,perf=off"; RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Default)]
struct Totals {
    chunks: usize,
    unloaded: usize,
    failed: usize,
    quads: usize,
    stats: MeshStats,
}

impl Totals {
    fn add(&mut self, s: &MeshStats) {
        self.chunks += 1;
        self.quads += s.indices as usize / 6;
        self.stats.slices_reused += s.slices_reused;
        self.stats.slices_rebuilt += s.slices_rebuilt;
        self.stats.slices_empty += s.slices_empty;
        self.stats.slices_not_stored += s.slices_not_stored;
        self.stats.ramps_changed += s.ramps_changed;
        self.stats.vertices += s.vertices;
        self.stats.indices += s.indices;
    }
}

/// Pumps finished jobs until nothing is pending.
fn collect(workers: &MeshWorkers) -> Totals {
    let mut totals = Totals::default();
    let mut latest: HashMap<ChunkCoord, u32> = HashMap::new();
    while workers.pending() > 0 {
        for out in workers.recv_ready(Duration::from_millis(50)) {
            match out.outcome {
                MeshOutcome::Built(mesh) => {
                    totals.add(&mesh.stats);
                    latest.insert(out.coord, out.t_total_ms);
                }
                MeshOutcome::Unloaded => totals.unloaded += 1,
                MeshOutcome::Failed(_) => totals.failed += 1,
            }
        }
    }
    if let Some((coord, ms)) = latest.iter().max_by_key(|(_, ms)| **ms) {
        log::debug!(target: "perf", "slowest chunk {:?} ms={}", coord, ms);
    }
    totals
}

fn report(label: &str, t: &Totals, elapsed: Duration) {
    log::info!(
        "{}: {} chunks in {:.1} ms, {} quads, {} vertices, slices rebuilt={} reused={} empty={}, ramps={}",
        label,
        t.chunks,
        elapsed.as_secs_f64() * 1000.0,
        t.quads,
        t.stats.vertices,
        t.stats.slices_rebuilt,
        t.stats.slices_reused,
        t.stats.slices_empty,
        t.stats.ramps_changed
    );
    if t.unloaded > 0 || t.failed > 0 || t.stats.slices_not_stored > 0 {
        log::warn!(
            "{}: unloaded={} failed={} not_stored={}",
            label,
            t.unloaded,
            t.failed,
            t.stats.slices_not_stored
        );
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let catalog = Arc::new(Catalog::load_from_path(&args.catalog)?);
    let (settings, view) = load_settings(&args.settings)?;
    log::info!(
        "catalog {}: {} voxel types, {} grass types",
        args.catalog.display(),
        catalog.voxel_types().count(),
        catalog.grass_types().count()
    );

    let chunks = args.chunks.max(1);
    let world = demo::generate(Arc::clone(&catalog), chunks, args.seed)?;
    if let Some(level) = args.view_level {
        world.set_max_viewing_level(level);
    }
    let (designations, dig) = demo::designate(&world, chunks);
    log::info!("{} designations, {} marked for digging", designations.len(), dig.len());

    let motes = Arc::new(GrassMotes::new());
    let motes_on = settings.grass_motes;
    let mut builder = MeshBuilder::new(settings);
    if motes_on {
        builder = builder.with_decorator(motes.clone());
    }

    let manager: Arc<RwLock<ChunkManager>> = Arc::new(RwLock::new(world));
    let designations: Arc<RwLock<DesignationSet>> = Arc::new(RwLock::new(designations));
    let threads = args
        .workers
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(2, |n| n.get()))
        .max(1);
    let workers = MeshWorkers::new(
        Arc::clone(&manager),
        Arc::clone(&designations),
        builder,
        view,
        threads,
    )?;
    log::info!("mesh workers: edit={} bg={}", workers.w_edit, workers.w_bg);

    let start = Instant::now();
    workers.request_all();
    report("initial build", &collect(&workers), start.elapsed());

    // carry out the dig and remesh only what it touched
    let mut touched: HashSet<ChunkCoord> = HashSet::new();
    {
        let world = manager.read().unwrap_or_else(|e| e.into_inner());
        let mut set = designations.write().unwrap_or_else(|e| e.into_inner());
        for &at in &dig {
            if let Some(v) = world.resolve(at) {
                v.set_type(0);
            }
            set.remove_and_invalidate(&world, at, DesignationType::DIG);
            for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let c = at.offset_xyz(dx, dy, dz).chunk();
                        if world.get(c).is_some() {
                            touched.insert(c);
                        }
                    }
                }
            }
        }
    }
    let start = Instant::now();
    for &c in &touched {
        workers.request(c, JobKind::Edit);
    }
    report("after dig", &collect(&workers), start.elapsed());

    if motes_on {
        log::info!("{} grass motes", motes.total());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_filters(&args.log_level)
        .parse_env("RUST_LOG")
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
