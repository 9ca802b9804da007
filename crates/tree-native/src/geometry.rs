use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Unit-radius UV sphere.
pub fn uv_sphere(segments: u16, rings: u16) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity((segments as usize + 1) * (rings as usize + 1));
    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        let (sp, cp) = phi.sin_cos();
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            let (st, ct) = theta.sin_cos();
            let n = [sp * ct, cp, sp * st];
            vertices.push(Vertex {
                position: n,
                normal: n,
            });
        }
    }
    let stride = segments + 1;
    let mut indices = Vec::with_capacity(segments as usize * rings as usize * 6);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Mesh { vertices, indices }
}

/// Unit cube centred on the origin, one flat normal per face.
pub fn cube() -> Mesh {
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, u axis, v axis
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = [
                n[0] * 0.5 + u[0] * su + v[0] * sv,
                n[1] * 0.5 + u[1] * su + v[1] * sv,
                n[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            vertices.push(Vertex {
                position,
                normal: n,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    Mesh { vertices, indices }
}

/// Capped cylinder centred on the origin along +Y, tapering from
/// `radius_bottom` to `radius_top`.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u16) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    let mut vertices = Vec::with_capacity((segments as usize + 1) * 4 + 2);
    let mut indices = Vec::with_capacity(segments as usize * 12);

    // side: bottom and top rings, one sloped normal per column
    for s in 0..=segments {
        let theta = TAU * s as f32 / segments as f32;
        let (st, ct) = theta.sin_cos();
        let len = (1.0 + slope * slope).sqrt();
        let normal = [ct / len, slope / len, st / len];
        for (r, y) in [(radius_bottom, -half), (radius_top, half)] {
            vertices.push(Vertex {
                position: [r * ct, y, r * st],
                normal,
            });
        }
    }
    for s in 0..segments {
        let a = s * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    // caps: a centre vertex fanned to its own ring
    for (r, y, ny) in [(radius_bottom, -half, -1.0), (radius_top, half, 1.0)] {
        let centre = vertices.len() as u16;
        vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal: [0.0, ny, 0.0],
        });
        for s in 0..=segments {
            let (st, ct) = (TAU * s as f32 / segments as f32).sin_cos();
            vertices.push(Vertex {
                position: [r * ct, y, r * st],
                normal: [0.0, ny, 0.0],
            });
        }
        for s in 0..segments {
            indices.extend_from_slice(&[centre, centre + 1 + s, centre + 2 + s]);
        }
    }
    Mesh { vertices, indices }
}
