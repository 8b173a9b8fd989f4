//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{
    BaseWaveParams, DisplacementMode, FieldParams, GridParams, TimeWrap, WaveSetConfig,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "swell")]
#[command(about = "Procedural Gerstner wave field evaluator", long_about = None)]
pub struct Args {
    /// RNG seed for base wave generation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of waves in the set
    #[arg(long, default_value_t = 16)]
    pub waves: usize,

    /// Frequency multiplier per successive wave
    #[arg(long, default_value_t = 1.18)]
    pub frequency_multiplier: f32,

    /// Amplitude multiplier per successive wave
    #[arg(long, default_value_t = 0.82)]
    pub amplitude_multiplier: f32,

    /// Amplitude of the first wave (meters)
    #[arg(long, value_name = "METERS", default_value_t = 1.0)]
    pub amplitude: f32,

    /// Spatial frequency of the first wave (radians per meter)
    #[arg(long, default_value_t = 1.0)]
    pub frequency: f32,

    /// Prevailing wind direction (degrees, 0 = +X)
    #[arg(long, value_name = "DEGREES", default_value_t = 0.0)]
    pub wind: f32,

    /// Direction spread around the wind (degrees, 180 = isotropic)
    #[arg(long, value_name = "DEGREES", default_value_t = 180.0)]
    pub spread: f32,

    /// Displacement mode: gerstner (default), sines
    #[arg(long, value_name = "MODE", default_value = "gerstner")]
    pub mode: String,

    /// Elapsed time to evaluate (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f64,

    /// Loop period for seamless time wrapping (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub loop_period: Option<f32>,

    /// Grid resolution (cells per side)
    #[arg(long, default_value_t = 256)]
    pub grid_size: usize,

    /// Grid vertex spacing (meters)
    #[arg(long, value_name = "METERS", default_value_t = 0.5)]
    pub spacing: f32,

    /// Write a grayscale heightmap PNG
    #[arg(long, value_name = "PATH")]
    pub heightmap: Option<PathBuf>,

    /// Write an RGB normal map PNG
    #[arg(long, value_name = "PATH")]
    pub normal_map: Option<PathBuf>,

    /// Write the packed wave set (5 x f32 per wave) as raw bytes
    #[arg(long, value_name = "PATH")]
    pub dump_waves: Option<PathBuf>,

    /// Evaluate on the GPU compute backend (needs the `gpu` feature)
    #[arg(long)]
    pub gpu: bool,
}

impl Args {
    /// Parse displacement mode from command-line arguments
    pub fn parse_mode(&self) -> DisplacementMode {
        match self.mode.to_lowercase().as_str() {
            "gerstner" => DisplacementMode::Gerstner,
            "sines" | "sum-of-sines" => DisplacementMode::SumOfSines,
            other => {
                log::warn!("Unknown displacement mode '{}', using gerstner", other);
                DisplacementMode::Gerstner
            }
        }
    }

    pub fn wave_set_config(&self) -> WaveSetConfig {
        WaveSetConfig {
            wave_count: self.waves,
            frequency_multiplier: self.frequency_multiplier,
            amplitude_multiplier: self.amplitude_multiplier,
        }
    }

    pub fn base_wave_params(&self) -> BaseWaveParams {
        BaseWaveParams {
            amplitude_m: self.amplitude,
            frequency: self.frequency,
            wind_direction_deg: self.wind,
            direction_spread_deg: self.spread,
            ..Default::default()
        }
    }

    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            mode: self.parse_mode(),
            time_wrap: self
                .loop_period
                .map_or(TimeWrap::Unbounded, |period_s| TimeWrap::Loop { period_s }),
        }
    }

    pub fn grid_params(&self) -> GridParams {
        GridParams {
            grid_size: self.grid_size,
            grid_spacing_m: self.spacing,
        }
    }
}
