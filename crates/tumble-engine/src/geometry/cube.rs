//! Literal cube data: 6 faces × 4 vertices, 2 triangles per face.

/// Number of faces.
pub const FACE_COUNT: usize = 6;

/// Vertices per face block.
pub const VERTICES_PER_FACE: usize = 4;

/// Total vertex count.
pub const CUBE_VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;

/// One color per face: front, back, top, bottom, right, left.
pub const FACE_COLORS: [[f32; 4]; FACE_COUNT] = [
    [1.0, 1.0, 1.0, 1.0], // front: white
    [1.0, 0.0, 0.0, 1.0], // back: red
    [0.0, 1.0, 0.0, 1.0], // top: green
    [0.0, 0.0, 1.0, 1.0], // bottom: blue
    [1.0, 1.0, 0.0, 1.0], // right: yellow
    [1.0, 0.0, 1.0, 1.0], // left: purple
];

/// Vertex positions, face blocks in `FACE_COLORS` order.
///
/// Each block is counter-clockwise when seen from outside the cube.
pub const CUBE_POSITIONS: [[f32; 3]; CUBE_VERTEX_COUNT] = [
    // front
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    // back
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    // top
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    // bottom
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    // right
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    // left
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
];

/// Triangle list: `0,1,2` and `0,2,3` of every face block.
pub const CUBE_INDICES: [u16; FACE_COUNT * 6] = [
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // top
    12, 13, 14, 12, 14, 15, // bottom
    16, 17, 18, 16, 18, 19, // right
    20, 21, 22, 20, 22, 23, // left
];

/// Per-vertex colors: every vertex of a face repeats that face's color.
pub fn cube_colors() -> [[f32; 4]; CUBE_VERTEX_COUNT] {
    std::array::from_fn(|i| FACE_COLORS[i / VERTICES_PER_FACE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn indices_form_twelve_triangles_over_all_vertices() {
        assert_eq!(CUBE_INDICES.len() % 3, 0);
        assert_eq!(CUBE_INDICES.len() / 3, 12);

        let distinct: BTreeSet<u16> = CUBE_INDICES.iter().copied().collect();
        assert_eq!(distinct.len(), CUBE_VERTEX_COUNT);
        assert!(distinct.iter().all(|&i| (i as usize) < CUBE_VERTEX_COUNT));
    }

    #[test]
    fn each_face_uses_its_own_block() {
        for (face, tris) in CUBE_INDICES.chunks(6).enumerate() {
            let base = (face * VERTICES_PER_FACE) as u16;
            assert_eq!(tris, &[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    #[test]
    fn colors_repeat_per_face_block() {
        let colors = cube_colors();
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(*c, colors[i - i % VERTICES_PER_FACE]);
        }
    }

    #[test]
    fn face_colors_are_distinct() {
        for i in 0..FACE_COUNT {
            for j in (i + 1)..FACE_COUNT {
                assert_ne!(FACE_COLORS[i], FACE_COLORS[j], "faces {i} and {j}");
            }
        }
    }

    #[test]
    fn faces_lie_on_unit_cube() {
        assert!(CUBE_POSITIONS.iter().flatten().all(|c| c.abs() == 1.0));
    }

    #[test]
    fn triangles_wind_outward() {
        for tri in CUBE_INDICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| CUBE_POSITIONS[tri[k] as usize]);
            let normal = cross(sub(b, a), sub(c, a));
            let center = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            assert!(dot(normal, center) > 0.0, "triangle {tri:?} winds inward");
        }
    }
}
