//! Runs spline generation on a small L-shaped ledge and logs each phase.
//!
//! Usage:
//! ```text
//! cargo run --example generate                      # default tuning
//! cargo run --example generate -- tuning.toml       # tuning from a file
//! RUST_LOG=grindline=debug cargo run --example generate
//! ```

use grindline::math::{Isometry3, Point3};
use grindline::operations::generation::{GenerateSplines, Progress};
use grindline::query::{BoxWorld, StaticMesh};
use grindline::scene::SceneStore;
use grindline::settings::{ColliderGenerationSettings, GenerationTuning, MidpointTest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, INFO for grindline.
    // Override with RUST_LOG env var (e.g. RUST_LOG=grindline=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("generate=info".parse().unwrap_or_default())
        .add_directive("grindline=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)?;
            GenerationTuning::from_toml_str(&source)?
        }
        None => GenerationTuning {
            midpoint_test: MidpointTest::Contact,
            ..GenerationTuning::default()
        },
    };

    let mut store = SceneStore::new();
    let surface = store.create_surface("Ledge", None, Isometry3::identity())?;
    let root = store.surface(surface)?.node;
    let body = store.spawn("Ledge Mesh", Some(root), Isometry3::identity())?;

    // Two boxes meeting at a right angle; their top front edges are grindable.
    let mut world = BoxWorld::new();
    world.add_box(body, Point3::new(0.0, -0.5, 0.0), Point3::new(4.0, 0.0, 1.0));
    world.add_box(body, Point3::new(4.0, -0.5, 0.0), Point3::new(5.0, 0.0, 4.0));

    let mut vertices: Vec<Point3> = (0..=8)
        .map(|i| Point3::new(0.5 * f64::from(i), 0.0, 0.0))
        .collect();
    vertices.extend((1..=8).map(|i| Point3::new(5.0, 0.0, 0.5 * f64::from(i))));
    let mut mesh = StaticMesh::new();
    mesh.add_mesh(body, vertices);

    let mut run = GenerateSplines::new(surface, &tuning)
        .with_settings(Some(ColliderGenerationSettings::boxed(0.1, 0.05).with_edge(true, false)));
    loop {
        match run.step(&mut store, &mesh, &world)? {
            Progress::Running(phase) => tracing::info!(?phase, "next phase"),
            Progress::Finished(report) => {
                tracing::info!(?report, "done");
                for spline in &report.splines {
                    let node = store.spline(*spline)?.node;
                    let points = store.spline_points(*spline)?;
                    tracing::info!(name = %store.node(node)?.name, points = points.len(), "spline");
                }
                break;
            }
        }
    }
    Ok(())
}
