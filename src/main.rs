//! Swell - procedural ocean wave field evaluator
//!
//! Generates a seeded wave set, evaluates a surface grid at a point in time
//! and optionally writes heightmap / normal map PNGs.

use std::error::Error;
use std::time::Instant;

use clap::Parser;

use swell::cli::Args;
use swell::export;
use swell::ocean::OceanSystem;
use swell::waves::{generate_wave_set, RandomBaseGenerator};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();

    let config = args.wave_set_config();
    let mut base = RandomBaseGenerator::new(args.seed, args.base_wave_params())?;
    let waves = generate_wave_set(&config, &mut base)?;

    let grid_params = args.grid_params();
    let mut ocean = OceanSystem::new(waves, &grid_params, args.field_params())?;
    let waves = ocean.waves();

    println!("Swell wave field");
    println!("  Seed: {}", args.seed);
    println!(
        "  Waves: {} (frequency x{}, amplitude x{})",
        waves.len(),
        config.frequency_multiplier,
        config.amplitude_multiplier
    );
    println!("  Amplitude bound: {:.3}m", waves.total_amplitude());
    println!("  Mode: {:?}", ocean.mode());
    println!(
        "  Grid: {}x{} cells, {}m spacing",
        grid_params.grid_size, grid_params.grid_size, grid_params.grid_spacing_m
    );

    let start = Instant::now();

    let time_s = if args.gpu {
        evaluate_on_gpu(&mut ocean, args.time)
    } else {
        ocean.update(args.time)
    };

    let elapsed = start.elapsed();
    let (lo, hi) = ocean.grid.height_range();
    println!("  Time: {:.3}s (evaluated at {:.3}s)", args.time, time_s);
    println!("  Heights: {:.3}m .. {:.3}m", lo, hi);
    println!("  Evaluation: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = &args.heightmap {
        export::write_heightmap(&ocean.grid, waves.total_amplitude(), path)?;
        println!("  Heightmap: {}", path.display());
    }

    if let Some(path) = &args.normal_map {
        export::write_normal_map(&ocean.grid, path)?;
        println!("  Normal map: {}", path.display());
    }

    if let Some(path) = &args.dump_waves {
        std::fs::write(path, waves.packed_bytes())?;
        println!("  Wave dump: {}", path.display());
    }

    Ok(())
}

/// Evaluate the grid with the compute backend, falling back to the CPU
#[cfg(feature = "gpu")]
fn evaluate_on_gpu(ocean: &mut OceanSystem, elapsed_s: f64) -> f32 {
    use swell::gpu::GpuWaveEvaluator;

    let waves = ocean.waves();
    let time_s = ocean.evaluation_time(elapsed_s);

    let samples = GpuWaveEvaluator::new(&waves).and_then(|evaluator| {
        evaluator.evaluate(ocean.grid.rest_positions(), time_s, ocean.mode())
    });

    match samples {
        Ok(samples) => {
            ocean.grid.apply_samples(&samples);
            time_s
        }
        Err(e) => {
            log::warn!("GPU evaluation failed ({}), using CPU", e);
            ocean.update(elapsed_s)
        }
    }
}

#[cfg(not(feature = "gpu"))]
fn evaluate_on_gpu(ocean: &mut OceanSystem, elapsed_s: f64) -> f32 {
    log::warn!("Built without the `gpu` feature, using CPU");
    ocean.update(elapsed_s)
}
