//! Procedural meshes for the marker and the floor.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Torus in the XY plane around the Z axis.
pub fn torus(major: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut mesh = Mesh::default();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = major + tube * v.cos();
            let p = [ring * u.cos(), ring * u.sin(), tube * v.sin()];
            let c = [major * u.cos(), major * u.sin(), 0.0];
            let n = [p[0] - c[0], p[1] - c[1], p[2] - c[2]];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(1e-6);
            mesh.vertices.push(Vertex {
                position: p,
                normal: [n[0] / len, n[1] / len, n[2] / len],
            });
        }
    }
    let stride = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Square on the XZ plane facing +Y.
pub fn floor(half_size: f32) -> Mesh {
    let h = half_size;
    let up = [0.0, 1.0, 0.0];
    let corner = |x: f32, z: f32| Vertex {
        position: [x, 0.0, z],
        normal: up,
    };
    Mesh {
        vertices: vec![corner(-h, -h), corner(-h, h), corner(h, h), corner(h, -h)],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
