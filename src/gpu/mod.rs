//! GPU compute evaluation of the wave field.
//!
//! Uploads the packed wave set once and evaluates batches of sample
//! positions in `waves.wgsl`, reading displacement and normal perturbation
//! back into `SurfaceSample`s. Results match the CPU path to within
//! the GPU's trig precision.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::field::SurfaceSample;
use crate::params::DisplacementMode;
use crate::waves::WaveSet;

/// Threads per workgroup (must match `@workgroup_size` in the shader)
const WORKGROUP_SIZE: u32 = 64;

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Buffer readback failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("Readback channel closed before the GPU finished")]
    ReadbackCancelled(#[from] futures::channel::oneshot::Canceled),

    #[error("Batch of {samples} samples exceeds the storage buffer limit ({limit} bytes)")]
    BatchTooLarge { samples: usize, limit: u64 },
}

/// Uniform block for one dispatch
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct EvalParams {
    time: f32,
    wave_count: u32,
    sample_count: u32,
    mode: u32,
}

/// Output layout (w components unused)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GpuSurfacePoint {
    displacement: [f32; 4],
    normal: [f32; 4],
}

fn mode_code(mode: DisplacementMode) -> u32 {
    match mode {
        DisplacementMode::SumOfSines => 0,
        DisplacementMode::Gerstner => 1,
    }
}

/// Compute pipeline plus the uploaded wave set
pub struct GpuWaveEvaluator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    wave_buffer: wgpu::Buffer,
    wave_count: u32,
}

impl GpuWaveEvaluator {
    /// Create evaluator and upload `waves` (blocks on adapter/device setup)
    pub fn new(waves: &WaveSet) -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async(waves))
    }

    async fn new_async(waves: &WaveSet) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU wave evaluator using {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Wave Field Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wave Field Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("waves.wgsl").into()),
        });

        let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wave Field Bind Group Layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, true),
                storage_entry(2, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wave Field Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Wave Field Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let wave_buffer = create_wave_buffer(&device, waves);

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            wave_buffer,
            wave_count: waves.len() as u32,
        })
    }

    /// Upload a replacement wave set; later dispatches use it
    pub fn set_waves(&mut self, waves: &WaveSet) {
        self.wave_buffer = create_wave_buffer(&self.device, waves);
        self.wave_count = waves.len() as u32;
    }

    /// Evaluate displacement and normal perturbation for every position
    pub fn evaluate(
        &self,
        positions: &[Vec3],
        time: f32,
        mode: DisplacementMode,
    ) -> Result<Vec<SurfaceSample>, GpuError> {
        pollster::block_on(self.evaluate_async(positions, time, mode))
    }

    async fn evaluate_async(
        &self,
        positions: &[Vec3],
        time: f32,
        mode: DisplacementMode,
    ) -> Result<Vec<SurfaceSample>, GpuError> {
        // wgpu rejects zero-sized bindings
        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let sample_count = positions.len();
        let output_size = (sample_count * std::mem::size_of::<GpuSurfacePoint>()) as u64;
        let limit = self.device.limits().max_storage_buffer_binding_size as u64;
        if output_size > limit || sample_count > u32::MAX as usize {
            return Err(GpuError::BatchTooLarge {
                samples: sample_count,
                limit,
            });
        }

        // Only x and z are evaluated
        let xz: Vec<[f32; 2]> = positions.iter().map(|p| [p.x, p.z]).collect();
        let position_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sample Position Buffer"),
                contents: bytemuck::cast_slice(&xz),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Surface Output Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        // Create staging buffer for readback
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Surface Staging Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params = EvalParams {
            time,
            wave_count: self.wave_count,
            sample_count: sample_count as u32,
            mode: mode_code(mode),
        };
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Eval Params Buffer"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wave Field Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.wave_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: position_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Wave Field Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Wave Field Compute Pass"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);

            let (groups_x, groups_y) = workgroup_grid(
                sample_count as u32,
                self.device.limits().max_compute_workgroups_per_dimension,
            );
            compute_pass.dispatch_workgroups(groups_x, groups_y, 1);
        }

        // Copy output to staging buffer
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_size);

        self.queue.submit(Some(encoder.finish()));

        // Read back results
        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.device.poll(wgpu::Maintain::Wait);
        receiver.await??;

        let data = buffer_slice.get_mapped_range();
        let points: &[GpuSurfacePoint] = bytemuck::cast_slice(&data[..]);
        let samples = points
            .iter()
            .map(|p| SurfaceSample {
                displacement: Vec3::new(p.displacement[0], p.displacement[1], p.displacement[2]),
                normal_perturbation: Vec3::new(p.normal[0], p.normal[1], p.normal[2]),
            })
            .collect();

        drop(data);
        staging_buffer.unmap();

        Ok(samples)
    }
}

fn create_wave_buffer(device: &wgpu::Device, waves: &WaveSet) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Wave Set Buffer"),
        contents: bytemuck::cast_slice(&waves.packed()),
        usage: wgpu::BufferUsages::STORAGE,
    })
}

/// Workgroup counts covering `samples` invocations, spilling into y
/// once x reaches the per-dimension limit
fn workgroup_grid(samples: u32, max_per_dimension: u32) -> (u32, u32) {
    let groups = samples.div_ceil(WORKGROUP_SIZE);
    if groups <= max_per_dimension {
        (groups, 1)
    } else {
        (max_per_dimension, groups.div_ceil(max_per_dimension))
    }
}
