//! Ocean grid mesh displaced by the wave field each frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayon::prelude::*;

use crate::field::{SurfaceSample, WaveField};
use crate::params::GridParams;

/// Vertex data for ocean mesh (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Ocean grid mesh centered on the origin
pub struct OceanGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Undisplaced vertex positions on the flat surface
    rest_positions: Vec<Vec3>,
    grid_size: usize,
}

impl OceanGrid {
    /// Create a new flat ocean grid with specified parameters
    pub fn new(params: &GridParams) -> Self {
        let grid_size = params.grid_size;
        let grid_spacing = params.grid_spacing_m;
        let half_size = params.extent_m() / 2.0;

        let vertex_count = (grid_size + 1) * (grid_size + 1);
        let mut vertices = Vec::with_capacity(vertex_count);
        let mut rest_positions = Vec::with_capacity(vertex_count);
        let mut indices = Vec::with_capacity(grid_size * grid_size * 6);

        // Generate flat XZ plane grid
        for z in 0..=grid_size {
            for x in 0..=grid_size {
                let x_pos = x as f32 * grid_spacing - half_size;
                let z_pos = z as f32 * grid_spacing - half_size;

                rest_positions.push(Vec3::new(x_pos, 0.0, z_pos));
                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / grid_size as f32, z as f32 / grid_size as f32],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding)
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = (z * (grid_size + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (grid_size + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            rest_positions,
            grid_size,
        }
    }

    /// Cells per side
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Vertices per side
    pub fn side_vertices(&self) -> usize {
        self.grid_size + 1
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// Displace every vertex and refresh its normal
    ///
    /// # Arguments
    /// * `field` - Wave set and displacement mode
    /// * `time_s` - Evaluation time (already wrapped by the caller's clock)
    pub fn update(&mut self, field: &WaveField, time_s: f32) {
        self.vertices
            .par_iter_mut()
            .zip(self.rest_positions.par_iter())
            .for_each(|(vertex, &rest)| {
                let sample = field.sample(rest, time_s);
                write_sample(vertex, rest, &sample);
            });
    }

    /// Apply samples computed elsewhere (e.g. on the GPU), one per vertex
    ///
    /// Extra samples are ignored; missing ones leave vertices untouched.
    pub fn apply_samples(&mut self, samples: &[SurfaceSample]) {
        self.vertices
            .par_iter_mut()
            .zip(self.rest_positions.par_iter())
            .zip(samples.par_iter())
            .for_each(|((vertex, &rest), sample)| write_sample(vertex, rest, sample));
    }

    /// Lowest and highest displaced vertex heights
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .map(|v| v.position[1])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            })
    }
}

fn write_sample(vertex: &mut Vertex, rest: Vec3, sample: &SurfaceSample) {
    vertex.position = sample.position(rest).to_array();
    vertex.normal = sample.unit_normal().to_array();
}
