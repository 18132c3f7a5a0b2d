//! Mesh Operations - Pure Functions
//!
//! Grid mesh generation with level-of-detail decimation and seam-correct
//! vertex normals.

use super::mesh_data::{MeshBuffers, MeshData, VertexRef};
use crate::constants::lod::simplification_increment;
use crate::constants::terrain::BORDER_WIDTH;
use crate::terrain::height_curve::HeightCurve;
use crate::terrain::noise_field_data::ScalarGrid;
use glam::{Vec2, Vec3};

/// Vertices along one mesh edge for an interior size and level of detail
pub fn vertices_per_line(interior_size: usize, level_of_detail: u32) -> usize {
    let stride = simplification_increment(level_of_detail) as usize;
    interior_size.saturating_sub(1) / stride + 1
}

/// Build a terrain mesh from a bordered height grid.
///
/// `heights` must be square with [`BORDER_WIDTH`] samples on every side. The
/// interior edge minus one must be divisible by the LOD stride. Edge normals
/// take in the ring one stride outside the interior, so a neighbour meshed at
/// the same LOD gets identical normals along the shared edge.
pub fn build(
    heights: &ScalarGrid,
    height_curve: &HeightCurve,
    height_multiplier: f32,
    level_of_detail: u32,
) -> MeshData {
    debug_assert!(heights.is_square(), "mesh builder expects a square grid");

    let border = BORDER_WIDTH as usize;
    let bordered_size = heights.width;
    if bordered_size < 2 * border + 1 {
        return MeshData::default();
    }

    let interior_size = bordered_size - 2 * border;
    let stride = simplification_increment(level_of_detail) as usize;
    debug_assert!(stride <= border, "LOD {} stride exceeds the border", level_of_detail);
    debug_assert_eq!(
        (interior_size - 1) % stride,
        0,
        "LOD {} stride does not divide interior size {}",
        level_of_detail,
        interior_size
    );

    let per_line = vertices_per_line(interior_size, level_of_detail);
    let samples = sample_positions(border, interior_size, stride, per_line);
    let vertex_map = build_vertex_map(samples.len());

    let span = (interior_size - 1).max(1) as f32;
    let half_span = (interior_size - 1) as f32 * 0.5;
    let line = samples.len();

    let mut buffers = MeshBuffers::with_capacity(per_line);

    for (row, &gy) in samples.iter().enumerate() {
        for (col, &gx) in samples.iter().enumerate() {
            // Interior starts at `border`; ring samples land one stride outside
            let local = Vec2::new(gx as f32 - border as f32, gy as f32 - border as f32);
            let uv = local / span;
            let height = height_curve.evaluate(heights.get(gx, gy)) * height_multiplier;
            let position = Vec3::new(local.x - half_span, height, half_span - local.y);

            add_vertex(&mut buffers, vertex_map[row * line + col], position, uv);

            if row + 1 < line && col + 1 < line {
                let a = vertex_map[row * line + col];
                let b = vertex_map[row * line + col + 1];
                let c = vertex_map[(row + 1) * line + col];
                let d = vertex_map[(row + 1) * line + col + 1];

                add_triangle(&mut buffers, [a, d, c]);
                add_triangle(&mut buffers, [d, a, b]);
            }
        }
    }

    finish(buffers)
}

/// Grid sample coordinates visited along one axis: the ring sample one
/// stride before the interior, the decimated interior samples, then the ring
/// sample one stride past it.
fn sample_positions(
    border: usize,
    interior_size: usize,
    stride: usize,
    per_line: usize,
) -> Vec<usize> {
    let mut samples = Vec::with_capacity(per_line + 2);
    samples.push(border - stride);
    samples.extend((0..per_line).map(|i| border + i * stride));
    samples.push(border + interior_size - 1 + stride);
    samples
}

/// Assign each visited sample to the interior or border index space
fn build_vertex_map(line: usize) -> Vec<VertexRef> {
    let mut map = Vec::with_capacity(line * line);
    let mut interior = 0u32;
    let mut border = 0u32;

    for row in 0..line {
        for col in 0..line {
            let on_border = row == 0 || col == 0 || row == line - 1 || col == line - 1;
            if on_border {
                map.push(VertexRef::Border(border));
                border += 1;
            } else {
                map.push(VertexRef::Interior(interior));
                interior += 1;
            }
        }
    }

    map
}

fn add_vertex(buffers: &mut MeshBuffers, vertex: VertexRef, position: Vec3, uv: Vec2) {
    match vertex {
        VertexRef::Interior(index) => {
            buffers.vertices[index as usize] = position;
            buffers.uvs[index as usize] = uv;
        }
        VertexRef::Border(index) => buffers.border_vertices[index as usize] = position,
    }
}

fn add_triangle(buffers: &mut MeshBuffers, triangle: [VertexRef; 3]) {
    match triangle {
        [VertexRef::Interior(a), VertexRef::Interior(b), VertexRef::Interior(c)] => {
            buffers.triangles.extend_from_slice(&[a, b, c]);
        }
        _ => buffers.border_triangles.push(triangle),
    }
}

/// Unnormalised face normal; its length weights the contribution by area
fn surface_normal(buffers: &MeshBuffers, [a, b, c]: [VertexRef; 3]) -> Vec3 {
    let point_a = buffers.position(a);
    let ab = buffers.position(b) - point_a;
    let ac = buffers.position(c) - point_a;
    ab.cross(ac)
}

fn calculate_normals(buffers: &MeshBuffers) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; buffers.vertices.len()];

    for triangle in buffers.triangles.chunks_exact(3) {
        let refs = [
            VertexRef::Interior(triangle[0]),
            VertexRef::Interior(triangle[1]),
            VertexRef::Interior(triangle[2]),
        ];
        let normal = surface_normal(buffers, refs);
        for &index in triangle {
            normals[index as usize] += normal;
        }
    }

    for &triangle in &buffers.border_triangles {
        let normal = surface_normal(buffers, triangle);
        for vertex in triangle {
            // border vertices are not kept, nothing to accumulate into
            if let VertexRef::Interior(index) = vertex {
                normals[index as usize] += normal;
            }
        }
    }

    normals
        .into_iter()
        .map(|normal| {
            let unit = normal.normalize_or_zero();
            if unit == Vec3::ZERO {
                Vec3::Y
            } else {
                unit
            }
        })
        .collect()
}

/// Compute normals and drop the border geometry
fn finish(buffers: MeshBuffers) -> MeshData {
    let normals = calculate_normals(&buffers);
    MeshData {
        vertices: buffers.vertices,
        uvs: buffers.uvs,
        triangles: buffers.triangles,
        normals,
        vertices_per_line: buffers.vertices_per_line,
    }
}
