//! Heightmap terrain
//!
//! A grayscale image sampled as brightness becomes the elevation field
//! that displaces the terrain plane and places scattered objects. Loading
//! is synchronous; a decode failure falls back to a flat field with a
//! warning so dependent placement always runs.

use std::path::Path;

use rand::Rng;
use thiserror::Error;

use crate::gfx::geometry::primitives::generate_plane;
use crate::gfx::geometry::GeometryData;

/// Heightmap decode failure.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read heightmap image: {0}")]
    Image(#[from] image::ImageError),
}

/// Normalized elevation samples, row-major, values in `[0, 1]`.
pub struct Heightmap {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl Heightmap {
    /// Decodes an image; pixel brightness (mean of RGB) maps to elevation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        let mut samples = Vec::with_capacity((width * height) as usize);
        for pixel in img.pixels() {
            let [r, g, b, _] = pixel.0;
            let brightness = (r as f32 + g as f32 + b as f32) / 3.0;
            samples.push(brightness / 255.0);
        }

        Ok(Self {
            width: width as usize,
            height: height as usize,
            samples,
        })
    }

    /// Loads `path`, or substitutes a flat field when the image cannot be
    /// decoded, so tree/house placement never stalls on a missing asset.
    pub fn load_or_flat(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(heightmap) => {
                log::info!(
                    "loaded heightmap {} ({}x{})",
                    path.display(),
                    heightmap.width,
                    heightmap.height
                );
                heightmap
            }
            Err(err) => {
                log::warn!(
                    "heightmap {} unavailable ({err}), using flat terrain",
                    path.display()
                );
                Self::flat(2, 2)
            }
        }
    }

    /// All-zero elevation.
    pub fn flat(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Builds a heightmap from raw normalized samples.
    pub fn from_samples(width: usize, height: usize, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            samples,
        }
    }

    /// Elevation at world `(x, z)` for a plane of `plane_size` centered at
    /// the origin, scaled to `max_height`. Coordinates past the border
    /// clamp to the edge samples.
    pub fn height_at(&self, x: f32, z: f32, plane_size: f32, max_height: f32) -> f32 {
        let half = plane_size / 2.0;

        let img_x = ((x + half) / plane_size * self.width as f32).floor() as i64;
        let img_z = ((z + half) / plane_size * self.height as f32).floor() as i64;

        let cx = img_x.clamp(0, self.width as i64 - 1) as usize;
        let cz = img_z.clamp(0, self.height as i64 - 1) as usize;

        self.samples[cz * self.width + cx] * max_height
    }
}

/// Generates the terrain plane displaced by the heightmap, with normals
/// rebuilt to follow the displaced surface.
pub fn displace_plane(
    heightmap: &Heightmap,
    plane_size: f32,
    segments: u32,
    max_height: f32,
) -> GeometryData {
    let mut plane = generate_plane(plane_size, plane_size, segments, segments);
    for v in plane.vertices.iter_mut() {
        v[1] = heightmap.height_at(v[0], v[2], plane_size, max_height);
    }
    plane.recompute_normals();
    plane
}

/// Random XZ positions inside the square of `half_extent`, keeping
/// `margin` away from the edges.
pub fn scatter_positions<R: Rng>(
    rng: &mut R,
    count: usize,
    half_extent: f32,
    margin: f32,
) -> Vec<(f32, f32)> {
    let bound = half_extent - margin;
    (0..count)
        .map(|_| {
            (
                rng.random_range(-bound..bound),
                rng.random_range(-bound..bound),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_flat_heightmap_is_zero_everywhere() {
        let map = Heightmap::flat(4, 4);
        assert_eq!(map.height_at(0.0, 0.0, 100.0, 25.0), 0.0);
        assert_eq!(map.height_at(-50.0, 49.0, 100.0, 25.0), 0.0);
    }

    #[test]
    fn test_height_at_samples_and_scales() {
        // 2x2 map: only the south-east cell is raised.
        let map = Heightmap::from_samples(2, 2, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(map.height_at(25.0, 25.0, 100.0, 25.0), 25.0);
        assert_eq!(map.height_at(-25.0, -25.0, 100.0, 25.0), 0.0);
    }

    #[test]
    fn test_height_at_clamps_outside_the_plane() {
        let map = Heightmap::from_samples(2, 2, vec![0.0, 0.0, 0.0, 1.0]);
        // Far past the raised corner still reads the edge sample.
        assert_eq!(map.height_at(500.0, 500.0, 100.0, 25.0), 25.0);
        assert_eq!(map.height_at(-500.0, -500.0, 100.0, 25.0), 0.0);
    }

    #[test]
    fn test_load_or_flat_falls_back_on_missing_file() {
        let map = Heightmap::load_or_flat("definitely/not/a/real/file.png");
        assert_eq!(map.height_at(0.0, 0.0, 100.0, 25.0), 0.0);
    }

    #[test]
    fn test_displaced_plane_lifts_vertices() {
        let map = Heightmap::from_samples(2, 2, vec![1.0, 1.0, 1.0, 1.0]);
        let plane = displace_plane(&map, 100.0, 4, 25.0);
        for v in &plane.vertices {
            assert_eq!(v[1], 25.0);
        }
    }

    #[test]
    fn test_scatter_honors_the_margin() {
        let mut rng = StdRng::seed_from_u64(42);
        let positions = scatter_positions(&mut rng, 100, 125.0, 6.0);
        assert_eq!(positions.len(), 100);
        for (x, z) in positions {
            assert!(x.abs() <= 119.0);
            assert!(z.abs() <= 119.0);
        }
    }
}
