//! PNG export of evaluated grids (heightmaps and normal maps).

use std::path::Path;

use image::{GrayImage, ImageResult, Luma, Rgb, RgbImage};

use crate::ocean::OceanGrid;

/// Grayscale heightmap, one pixel per vertex.
///
/// Heights are mapped from `[-amplitude_bound, amplitude_bound]` to `[0, 255]`;
/// a zero bound renders mid gray.
pub fn heightmap_image(grid: &OceanGrid, amplitude_bound: f32) -> GrayImage {
    let side = grid.side_vertices() as u32;
    let mut img = GrayImage::new(side, side);

    for (i, vertex) in grid.vertices.iter().enumerate() {
        let normalized = if amplitude_bound > 0.0 {
            vertex.position[1] / amplitude_bound
        } else {
            0.0
        };
        // Map from [-1, 1] to grayscale [0, 255]
        let gray = ((normalized + 1.0) * 127.5).clamp(0.0, 255.0) as u8;

        let (x, y) = (i as u32 % side, i as u32 / side);
        img.put_pixel(x, y, Luma([gray]));
    }

    img
}

/// RGB normal map (`n * 0.5 + 0.5`), one pixel per vertex
pub fn normal_map_image(grid: &OceanGrid) -> RgbImage {
    let side = grid.side_vertices() as u32;
    let mut img = RgbImage::new(side, side);

    for (i, vertex) in grid.vertices.iter().enumerate() {
        let encode = |c: f32| ((c * 0.5 + 0.5) * 255.0).clamp(0.0, 255.0) as u8;
        let [nx, ny, nz] = vertex.normal;

        let (x, y) = (i as u32 % side, i as u32 / side);
        img.put_pixel(x, y, Rgb([encode(nx), encode(ny), encode(nz)]));
    }

    img
}

pub fn write_heightmap(
    grid: &OceanGrid,
    amplitude_bound: f32,
    path: impl AsRef<Path>,
) -> ImageResult<()> {
    heightmap_image(grid, amplitude_bound).save(path)
}

pub fn write_normal_map(grid: &OceanGrid, path: impl AsRef<Path>) -> ImageResult<()> {
    normal_map_image(grid).save(path)
}
