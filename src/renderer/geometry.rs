use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::forest_core::scene::Primitive;

#[repr(C)]
#[derive(Clone, Copy, Debug, Zeroable, Pod)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Flat-shaded triangle: three fresh vertices sharing the face normal.
/// Degenerate triangles (cone tips, sphere poles) are skipped.
pub fn append_triangle(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    a: Vec3,
    b: Vec3,
    c: Vec3,
    color: Vec3,
) {
    let normal = (b - a).cross(c - a);
    if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
        return;
    }
    let n = normal.normalize();
    let base = vertices.len() as u32;
    for p in [a, b, c] {
        vertices.push(Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: color.to_array(),
        });
    }
    indices.extend_from_slice(&[base, base + 1, base + 2]);
}

fn append_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    corners: [Vec3; 4],
    color: Vec3,
) {
    let [p0, p1, p2, p3] = corners;
    append_triangle(vertices, indices, p0, p1, p2, color);
    append_triangle(vertices, indices, p0, p2, p3, color);
}

fn ring_point(radius: f32, y: f32, i: u32, segments: u32) -> Vec3 {
    let theta = i as f32 / segments as f32 * TAU;
    Vec3::new(theta.sin() * radius, y, theta.cos() * radius)
}

/// Capped frustum along +Y, centred on the origin. Counter-clockwise seen from outside.
#[allow(clippy::too_many_arguments)]
pub fn append_cylinder(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    transform: Mat4,
    top_radius: f32,
    bottom_radius: f32,
    height: f32,
    segments: u32,
    color: Vec3,
) {
    let segments = segments.max(3);
    let half = height * 0.5;
    let top_center = transform.transform_point3(Vec3::new(0.0, half, 0.0));
    let bottom_center = transform.transform_point3(Vec3::new(0.0, -half, 0.0));

    for i in 0..segments {
        let t0 = transform.transform_point3(ring_point(top_radius, half, i, segments));
        let t1 = transform.transform_point3(ring_point(top_radius, half, i + 1, segments));
        let b0 = transform.transform_point3(ring_point(bottom_radius, -half, i, segments));
        let b1 = transform.transform_point3(ring_point(bottom_radius, -half, i + 1, segments));

        append_quad(vertices, indices, [t0, b0, b1, t1], color);
        if top_radius > 0.0 {
            append_triangle(vertices, indices, top_center, t0, t1, color);
        }
        if bottom_radius > 0.0 {
            append_triangle(vertices, indices, bottom_center, b1, b0, color);
        }
    }
}

pub fn append_cone(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    transform: Mat4,
    radius: f32,
    height: f32,
    segments: u32,
    color: Vec3,
) {
    append_cylinder(
        vertices, indices, transform, 0.0, radius, height, segments, color,
    );
}

/// UV sphere centred on the origin.
pub fn append_sphere(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    transform: Mat4,
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    color: Vec3,
) {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    // Poles are pinned so the collapsed triangles there are exactly degenerate.
    let point = |iu: u32, iv: u32| -> Vec3 {
        if iv == 0 {
            return transform.transform_point3(Vec3::Y * radius);
        }
        if iv == height_segments {
            return transform.transform_point3(Vec3::NEG_Y * radius);
        }
        let u = iu as f32 / width_segments as f32 * TAU;
        let v = iv as f32 / height_segments as f32 * PI;
        transform.transform_point3(Vec3::new(
            -radius * u.cos() * v.sin(),
            radius * v.cos(),
            radius * u.sin() * v.sin(),
        ))
    };

    for iv in 0..height_segments {
        for iu in 0..width_segments {
            let a = point(iu, iv);
            let b = point(iu, iv + 1);
            let c = point(iu + 1, iv + 1);
            let d = point(iu + 1, iv);
            append_quad(vertices, indices, [a, b, c, d], color);
        }
    }
}

/// Disc in the XZ plane, facing +Y.
pub fn append_disc(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    transform: Mat4,
    radius: f32,
    segments: u32,
    color: Vec3,
) {
    let segments = segments.max(3);
    let center = transform.transform_point3(Vec3::ZERO);
    for i in 0..segments {
        let p0 = transform.transform_point3(ring_point(radius, 0.0, i, segments));
        let p1 = transform.transform_point3(ring_point(radius, 0.0, i + 1, segments));
        append_triangle(vertices, indices, center, p0, p1, color);
    }
}

pub fn append_primitive(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    transform: Mat4,
    shape: Primitive,
    color: Vec3,
) {
    match shape {
        Primitive::Cylinder {
            top_radius,
            bottom_radius,
            height,
            radial_segments,
        } => append_cylinder(
            vertices,
            indices,
            transform,
            top_radius,
            bottom_radius,
            height,
            radial_segments,
            color,
        ),
        Primitive::Cone {
            radius,
            height,
            radial_segments,
        } => append_cone(
            vertices,
            indices,
            transform,
            radius,
            height,
            radial_segments,
            color,
        ),
        Primitive::Sphere {
            radius,
            width_segments,
            height_segments,
        } => append_sphere(
            vertices,
            indices,
            transform,
            radius,
            width_segments,
            height_segments,
            color,
        ),
        Primitive::Disc { radius, segments } => {
            append_disc(vertices, indices, transform, radius, segments, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{append_cone, append_cylinder, append_disc, append_sphere, Vertex};
    use glam::{Mat4, Vec3};

    fn triangles(indices: &[u32]) -> usize {
        indices.len() / 3
    }

    #[test]
    fn cylinder_has_sides_and_caps() {
        let (mut v, mut i) = (Vec::<Vertex>::new(), Vec::new());
        append_cylinder(&mut v, &mut i, Mat4::IDENTITY, 1.5, 2.0, 15.0, 6, Vec3::ONE);
        // 6 side quads + 6 top + 6 bottom cap triangles
        assert_eq!(triangles(&i), 24);
        assert_eq!(v.len(), i.len());
    }

    #[test]
    fn cone_drops_degenerate_tip() {
        let (mut v, mut i) = (Vec::<Vertex>::new(), Vec::new());
        append_cone(&mut v, &mut i, Mat4::IDENTITY, 6.0, 20.0, 6, Vec3::ONE);
        // one side triangle per segment plus the base cap
        assert_eq!(triangles(&i), 12);
        let top = v.iter().map(|vx| vx.position[1]).fold(f32::MIN, f32::max);
        assert!((top - 10.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_faces_point_outwards() {
        let (mut v, mut i) = (Vec::<Vertex>::new(), Vec::new());
        append_sphere(&mut v, &mut i, Mat4::IDENTITY, 10.0, 8, 8, Vec3::ONE);
        // 8x8 quads minus 8 degenerate triangles at each pole
        assert_eq!(triangles(&i), 8 * 8 * 2 - 16);
        for tri in i.chunks(3) {
            let centroid = tri
                .iter()
                .map(|&k| Vec3::from_array(v[k as usize].position))
                .sum::<Vec3>()
                / 3.0;
            let normal = Vec3::from_array(v[tri[0] as usize].normal);
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn disc_faces_up_and_follows_transform() {
        let (mut v, mut i) = (Vec::<Vertex>::new(), Vec::new());
        let lift = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        append_disc(&mut v, &mut i, lift, 100.0, 64, Vec3::ONE);
        assert_eq!(triangles(&i), 64);
        assert!(v.iter().all(|vx| vx.normal[1] > 0.999));
        assert!(v.iter().all(|vx| (vx.position[1] - 2.0).abs() < 1e-5));
    }
}
