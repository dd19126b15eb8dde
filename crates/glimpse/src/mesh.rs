//! Subdivided plane geometry, laid out like three.js `PlaneGeometry`.

/// Floats per wireframe vertex: position (3) then normal (3).
pub const WIREFRAME_STRIDE: usize = 6;

/// A `width × height` plane in the XY plane, centered at the origin, facing +Z.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Two counter-clockwise triangles per grid cell
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    /// Build a grid of `segments_x × segments_y` cells (each at least 1).
    #[allow(clippy::cast_precision_loss)]
    pub fn new(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let grid_x = segments_x.max(1);
        let grid_y = segments_y.max(1);
        let grid_x1 = grid_x + 1;
        let grid_y1 = grid_y + 1;
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;

        let vertex_count = (grid_x1 * grid_y1) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        for iy in 0..grid_y1 {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..grid_x1 {
                let x = ix as f32 * segment_width - width / 2.0;
                positions.push([x, -y, 0.0]);
            }
        }

        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            normals: vec![[0.0, 0.0, 1.0]; vertex_count],
            positions,
            indices,
        }
    }

    /// Line-list vertices for every triangle edge, interleaved position + normal.
    pub fn wireframe_vertices(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.indices.len() * 2 * WIREFRAME_STRIDE);
        for triangle in self.indices.chunks_exact(3) {
            for (from, to) in [(0, 1), (1, 2), (2, 0)] {
                for corner in [triangle[from], triangle[to]] {
                    let i = corner as usize;
                    out.extend_from_slice(&self.positions[i]);
                    out.extend_from_slice(&self.normals[i]);
                }
            }
        }
        out
    }
}
