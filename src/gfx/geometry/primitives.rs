//! # Primitive Shape Generation
//!
//! Functions to generate the primitive shapes the demo scenes are built
//! from. All shapes carry outward normals and texture coordinates and are
//! centered at the origin, Y-up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes, four
/// vertices per face so normals stay flat.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    // One entry per face: outward normal, U tangent, V tangent, with
    // u cross v equal to the normal so winding stays counter-clockwise.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for (su, sv, tu, tv) in [
            (-0.5, -0.5, 0.0, 0.0),
            (0.5, -0.5, 1.0, 0.0),
            (0.5, 0.5, 1.0, 1.0),
            (-0.5, 0.5, 0.0, 1.0),
        ] {
            data.vertices.push([
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ]);
            data.normals.push(normal);
            data.tex_coords.push([tu, tv]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere of radius 1.0 centered at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    generate_sphere_slice(longitude_segments, latitude_segments, PI)
}

/// Generate the upper half of a UV sphere (a dome), radius 1.0
///
/// Used for the skydome; rendered from the inside with culling disabled.
pub fn generate_dome(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    generate_sphere_slice(longitude_segments, latitude_segments, PI / 2.0)
}

fn generate_sphere_slice(
    longitude_segments: u32,
    latitude_segments: u32,
    theta_length: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * theta_length / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a flat plane in the XZ plane with normal pointing up (+Y)
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` - Number of subdivisions along X
/// * `depth_segments` - Number of subdivisions along Z
pub fn generate_plane(
    width: f32,
    depth: f32,
    width_segments: u32,
    depth_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for zi in 0..=d_segs {
        let v = zi as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for xi in 0..=w_segs {
            let u = xi as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for zi in 0..d_segs {
        for xi in 0..w_segs {
            let i = zi * (w_segs + 1) + xi;
            let next_row = i + w_segs + 1;

            data.indices.push(i);
            data.indices.push(next_row);
            data.indices.push(i + 1);

            data.indices.push(next_row);
            data.indices.push(next_row + 1);
            data.indices.push(i + 1);
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `height` - Height along Y, centered at the origin
/// * `segments` - Number of circular segments
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side wall with radial normals.
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let x = radius * cos_a;
        let z = radius * sin_a;
        let u = i as f32 / segs as f32;

        data.vertices.push([x, -half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([x, half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;

        data.indices
            .extend_from_slice(&[bottom, top, bottom_next, top, top_next, bottom_next]);
    }

    // Cap rings carry their own vertices so the normals stay flat.
    for (y, ny) in [(-half_height, -1.0f32), (half_height, 1.0)] {
        let center = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, ny, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.vertices.push([radius * cos_a, y, radius * sin_a]);
            data.normals.push([0.0, ny, 0.0]);
            data.tex_coords.push([0.5 + cos_a * 0.5, 0.5 + sin_a * 0.5]);
        }

        for i in 0..segs {
            let current = center + 1 + i;
            let next = current + 1;
            if ny > 0.0 {
                data.indices.extend_from_slice(&[center, current, next]);
            } else {
                data.indices.extend_from_slice(&[center, next, current]);
            }
        }
    }

    data
}

/// Generate a triangular prism with its ridge along the X axis
///
/// The cross-section runs from a square base at y = -0.5 to an apex line
/// at y = 0.5, z = 0. Used for roofs.
pub fn generate_wedge() -> GeometryData {
    let mut data = GeometryData::new();

    // Outward slope normals, (0, 0.5, +-1) normalized.
    let n_len = (0.25f32 + 1.0).sqrt();
    let slope_pos_z = [0.0, 0.5 / n_len, 1.0 / n_len];
    let slope_neg_z = [0.0, 0.5 / n_len, -1.0 / n_len];

    let quads: [([f32; 3], [[f32; 3]; 4]); 3] = [
        (
            [0.0, -1.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
        ),
        (
            slope_pos_z,
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.0],
                [-0.5, 0.5, 0.0],
            ],
        ),
        (
            slope_neg_z,
            [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, 0.0],
                [0.5, 0.5, 0.0],
            ],
        ),
    ];

    for (normal, corners) in quads {
        let base = data.vertices.len() as u32;
        for (i, corner) in corners.iter().enumerate() {
            data.vertices.push(*corner);
            data.normals.push(normal);
            data.tex_coords
                .push([(i == 1 || i == 2) as u32 as f32, (i >= 2) as u32 as f32]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    // End-cap triangles.
    for (x, nx) in [(0.5f32, 1.0f32), (-0.5, -1.0)] {
        let base = data.vertices.len() as u32;
        let corners = if nx > 0.0 {
            [[x, -0.5, -0.5], [x, -0.5, 0.5], [x, 0.5, 0.0]]
        } else {
            [[x, -0.5, 0.5], [x, -0.5, -0.5], [x, 0.5, 0.0]]
        };
        for (i, corner) in corners.iter().enumerate() {
            data.vertices.push(*corner);
            data.normals.push([nx, 0.0, 0.0]);
            data.tex_coords
                .push([i as f32 * 0.5, (i == 2) as u32 as f32]);
        }
        data.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);

        let bounds = cube.local_aabb();
        assert_eq!(bounds.min, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vector3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertices.len(), 9 * 7);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        assert_eq!(sphere.indices.len() as u32, 8 * 6 * 6);
    }

    #[test]
    fn test_dome_stops_at_equator() {
        let dome = generate_dome(8, 4);
        let bounds = dome.local_aabb();
        assert!(bounds.min.y > -1e-6);
        assert!((bounds.max.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        for n in &plane.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let segs = 8;
        let cylinder = generate_cylinder(1.0, 2.0, segs);
        // Side ring pairs plus two caps (center + ring each).
        let expected_verts = (segs + 1) * 2 + 2 * (segs + 2);
        assert_eq!(cylinder.vertices.len() as u32, expected_verts);
        assert_eq!(cylinder.indices.len() as u32, 12 * segs);
    }

    #[test]
    fn test_wedge_generation() {
        let wedge = generate_wedge();
        assert_eq!(wedge.vertices.len(), 18);
        assert_eq!(wedge.indices.len(), 24);
        assert_eq!(wedge.local_aabb().max.y, 0.5);
    }

    #[test]
    fn test_displaced_plane_normals_follow_surface() {
        let mut plane = generate_plane(4.0, 4.0, 4, 4);
        // Tilt the grid into a ramp rising along +X.
        for v in plane.vertices.iter_mut() {
            v[1] = v[0];
        }
        plane.recompute_normals();
        for n in &plane.normals {
            // Ramp normals lean back along -X, never straight up.
            assert!(n[0] < -0.1);
            assert!(n[1] > 0.1);
        }
    }
}
