//! Streams terrain around an observer walking in a straight line
//!
//! Run with `RUST_LOG=info cargo run --example stream_terrain [config.toml]`.
//! Without a config file the default landmass settings are used.

use anyhow::Context;
use glam::{Vec2, Vec3};
use hearth_landmass::terrain::generate_par;
use hearth_landmass::{
    create_streaming_manager, ChunkCoord, ChunkRenderSink, ColorGrid, LandmassConfig, MeshData,
};
use std::time::{Duration, Instant};

/// Counts what a renderer would have uploaded
#[derive(Default)]
struct LoggingSink {
    textures: usize,
    meshes: usize,
    triangles: usize,
    visible: usize,
}

impl ChunkRenderSink for LoggingSink {
    fn upload_texture(&mut self, coord: ChunkCoord, colors: &ColorGrid) {
        self.textures += 1;
        log::debug!("texture {} ({} bytes)", coord, colors.as_bytes().len());
    }

    fn upload_mesh(&mut self, coord: ChunkCoord, lod: u32, mesh: &MeshData, origin: Vec3) {
        self.meshes += 1;
        self.triangles += mesh.triangle_count();
        log::debug!("mesh {} lod {} at {:?}", coord, lod, origin);
    }

    fn set_visible(&mut self, _coord: ChunkCoord, visible: bool) {
        if visible {
            self.visible += 1;
        } else {
            self.visible = self.visible.saturating_sub(1);
        }
    }

    fn release_chunk(&mut self, coord: ChunkCoord) {
        log::debug!("released {}", coord);
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => LandmassConfig::from_file(&path)
            .with_context(|| format!("loading landmass config from {path}"))?,
        None => LandmassConfig::default(),
    };

    // One chunk's worth of raw noise on this thread, before any workers start
    let resolution = config.streaming.chunk_resolution;
    let preview = generate_par(resolution, resolution, &config.noise.to_noise_config());
    let mean = preview.values.iter().sum::<f32>() / preview.values.len().max(1) as f32;

    let mut manager = create_streaming_manager(&config).context("starting terrain streaming")?;
    let mut sink = LoggingSink::default();

    let speed = 120.0; // world units per second
    let tick = Duration::from_millis(16);
    let start = Instant::now();
    let mut observer = Vec2::ZERO;

    println!("Hearth Landmass streaming demo");
    println!("==============================");
    println!("preview mean height at origin: {:.3}", mean);

    for frame in 0..600u32 {
        manager.update(observer, &mut sink)?;

        if frame % 60 == 0 {
            let stats = manager.pipeline().stats();
            println!(
                "t={:>5.1}s observer=({:>7.1}, {:>7.1}) chunks={:>4} visible={:>3} meshes={:>4} in_flight={:>3}",
                start.elapsed().as_secs_f32(),
                observer.x,
                observer.y,
                manager.chunk_count(),
                sink.visible,
                sink.meshes,
                stats.in_flight(),
            );
        }

        observer.x += speed * tick.as_secs_f32();
        std::thread::sleep(tick);
    }

    let stats = manager.pipeline().stats();
    println!();
    println!("textures uploaded: {}", sink.textures);
    println!("meshes uploaded:   {} ({} triangles)", sink.meshes, sink.triangles);
    println!("map requests:      {}", stats.map_requested);
    println!("mesh requests:     {}", stats.mesh_requested);
    Ok(())
}
