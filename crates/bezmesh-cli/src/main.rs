//! bezmesh CLI - tessellate Bezier patch files
//!
//! Reads a `.bez` patch file, tessellates every patch uniformly or
//! adaptively, and optionally exports the triangles as OBJ. An `.obj`
//! input is loaded and summarized.

use anyhow::{Context, Result};
use bezmesh::{bezmesh_io, InputFormat, MeshBounds, PatchSet};
use clap::Parser;
use log::info;
use serde::Serialize;

mod config;

use config::{Cli, RunConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RunConfig::from_cli(&cli)?;
    log::debug!("{:?}", config);

    match config.format {
        InputFormat::Bez => run_patches(&config),
        InputFormat::Obj => run_mesh(&config),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run_patches(config: &RunConfig) -> Result<()> {
    let set = PatchSet::read(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    info!("loaded {} patches from {}", set.len(), config.input.display());

    let meshes = set.tessellate(&config.subdivision)?;
    let bounds = meshes.bounds();
    log_bounds(bounds.as_ref());

    if let Some(output) = &config.output {
        meshes
            .write_obj(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(
            "wrote {} triangles to {}",
            meshes.num_triangles(),
            output.display()
        );
    }

    if config.stats {
        print_stats(&Stats::Patches {
            subdivision: config.subdivision,
            patches: set.len(),
            triangles: meshes.num_triangles(),
            samples: meshes.num_samples(),
            degenerate_samples: meshes.degenerate_sample_count(),
            bounds: bounds.map(BoundsStats::from),
        })?;
    }

    Ok(())
}

fn run_mesh(config: &RunConfig) -> Result<()> {
    let mesh = bezmesh_io::read_obj(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    info!(
        "loaded {} vertices and {} faces from {}",
        mesh.num_vertices(),
        mesh.num_faces(),
        config.input.display()
    );

    let bounds = mesh.bounds();
    log_bounds(bounds.as_ref());

    if config.stats {
        print_stats(&Stats::Mesh {
            vertices: mesh.num_vertices(),
            faces: mesh.num_faces(),
            bounds: bounds.map(BoundsStats::from),
        })?;
    }

    Ok(())
}

fn log_bounds(bounds: Option<&MeshBounds>) {
    match bounds {
        Some(b) => {
            let c = b.center();
            info!(
                "scene center ({:.4}, {:.4}, {:.4}), largest extent {:.4}",
                c.x,
                c.y,
                c.z,
                b.largest_extent()
            );
        }
        None => info!("scene is empty"),
    }
}

fn print_stats(stats: &Stats) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// JSON summary printed by `--stats`.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
enum Stats {
    Patches {
        subdivision: bezmesh::Subdivision,
        patches: usize,
        triangles: usize,
        samples: usize,
        degenerate_samples: usize,
        bounds: Option<BoundsStats>,
    },
    Mesh {
        vertices: usize,
        faces: usize,
        bounds: Option<BoundsStats>,
    },
}

#[derive(Debug, Serialize)]
struct BoundsStats {
    min: [f64; 3],
    max: [f64; 3],
    center: [f64; 3],
    largest_extent: f64,
}

impl From<MeshBounds> for BoundsStats {
    fn from(b: MeshBounds) -> Self {
        let c = b.center();
        Self {
            min: [b.min.x, b.min.y, b.min.z],
            max: [b.max.x, b.max.y, b.max.z],
            center: [c.x, c.y, c.z],
            largest_extent: b.largest_extent(),
        }
    }
}
