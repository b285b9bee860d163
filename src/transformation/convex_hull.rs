//! Incremental construction of the convex hull of a point set.

use crate::math::{Point, Real};

const INVALID: u16 = u16::MAX;

/// A point lying closer than this to a face plane is not considered to be in
/// front of the face.
const VISIBILITY_EPS: Real = 1.0e-5;

/// Degeneracy threshold for picking the seed tetrahedron.
const SEED_EPS: Real = 1.0e-10;

/// Errors that can occur during incremental convex hull computation.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConvexHullError {
    /// Fewer than four input points were given.
    #[error("fewer than four input points")]
    IncompleteInput,
    /// The input points are coincident, collinear, or coplanar.
    #[error("degenerate input: points are coincident, collinear, or coplanar")]
    Degenerate,
    /// The construction exceeded the 16-bit index space.
    #[error("16-bit index space exhausted")]
    IndexOverflow,
    /// A hole could not be retriangulated into a closed surface.
    #[error("hull construction reached a non-manifold state")]
    NonManifold,
}

#[derive(Copy, Clone)]
struct Halfedge {
    vertex: u16, // to
    face: u16,   // left
    next: u16,   // ccw
    prev: u16,   // cw
}

impl Halfedge {
    fn new(vertex: u16) -> Self {
        Halfedge {
            vertex,
            face: INVALID,
            next: INVALID,
            prev: INVALID,
        }
    }
}

/// Halfedges are stored in pairs: the twin of halfedge `h` is `h ^ 1`.
/// Only a single boundary loop per vertex is supported.
#[derive(Default)]
struct HalfedgeMesh {
    halfedges: Vec<Halfedge>,
    vertices: Vec<u16>, // vertex -> (boundary) halfedge
    faces: Vec<u16>,    // face -> halfedge
    num_triangles: usize,
}

impl HalfedgeMesh {
    fn find_halfedge(&self, v0: u16, v1: u16) -> u16 {
        let start = self.vertices[v0 as usize];
        let mut h = start;
        while h != INVALID && self.halfedges[h as usize].vertex != v1 {
            h = self.halfedges[(h ^ 1) as usize].next;
            if h == start {
                return INVALID;
            }
        }
        h
    }

    fn connect(&mut self, h0: u16, h1: u16) {
        self.halfedges[h0 as usize].next = h1;
        self.halfedges[h1 as usize].prev = h0;
    }

    fn add_triangle(&mut self, v0: u16, v1: u16, v2: u16) -> Result<(), ConvexHullError> {
        // Add new vertices.
        let n = v0.max(v1).max(v2) as usize + 1;
        if self.vertices.len() < n {
            self.vertices.resize(n, INVALID);
        }

        // Collect halfedges, prev and next of the triangle.
        let verts = [v0, v1, v2];
        let mut handles = [INVALID; 3];
        let mut prev = [INVALID; 3];
        let mut next = [INVALID; 3];
        for i in 0..3 {
            let j = (i + 1) % 3;
            let mut h = self.find_halfedge(verts[i], verts[j]);
            if h == INVALID {
                // Add a new edge.
                if self.halfedges.len() + 2 > u16::MAX as usize {
                    return Err(ConvexHullError::IndexOverflow);
                }
                h = self.halfedges.len() as u16;
                self.halfedges.push(Halfedge::new(verts[j]));
                self.halfedges.push(Halfedge::new(verts[i]));
            }
            handles[i] = h;
            prev[i] = self.halfedges[h as usize].prev;
            next[i] = self.halfedges[h as usize].next;
        }

        // Patch connectivity.
        for i in 0..3 {
            let j = (i + 1) % 3;

            if self.faces.len() >= u16::MAX as usize {
                return Err(ConvexHullError::IndexOverflow);
            }
            self.halfedges[handles[i] as usize].face = self.faces.len() as u16;

            // Connect prev and next.
            self.connect(handles[i], handles[j]);

            if next[j] == INVALID {
                // New next edge, connect the opposite.
                let to = if next[i] != INVALID {
                    next[i]
                } else {
                    handles[i] ^ 1
                };
                self.connect(handles[j] ^ 1, to);
            }

            if prev[i] == INVALID {
                // New prev edge, connect the opposite.
                let from = if prev[j] != INVALID {
                    prev[j]
                } else {
                    handles[j] ^ 1
                };
                self.connect(from, handles[i] ^ 1);
            }

            // Prev is boundary, update the middle vertex.
            if self.halfedges[(handles[i] ^ 1) as usize].face == INVALID {
                self.vertices[verts[j] as usize] = handles[i] ^ 1;
            }
        }

        self.faces.push(handles[2]);
        self.num_triangles += 1;
        Ok(())
    }

    /// Removes a triangle and returns one of its vertices that still touches
    /// a face, or `INVALID` if none does.
    fn remove_triangle(&mut self, f: u16) -> u16 {
        let mut result = INVALID;

        let mut h = self.faces[f as usize];
        for _ in 0..3 {
            let v0 = self.halfedges[(h ^ 1) as usize].vertex;
            let v1 = self.halfedges[h as usize].vertex;

            self.halfedges[h as usize].face = INVALID;

            if self.halfedges[(h ^ 1) as usize].face == INVALID {
                // Was a boundary edge, remove it.
                let v0_prev = self.halfedges[h as usize].prev;
                let v0_next = self.halfedges[(h ^ 1) as usize].next;
                let v1_prev = self.halfedges[(h ^ 1) as usize].prev;
                let v1_next = self.halfedges[h as usize].next;

                self.connect(v0_prev, v0_next);
                self.connect(v1_prev, v1_next);

                // Update the vertex boundary or delete the vertex.
                self.vertices[v0 as usize] = if (v0_prev ^ 1) == v0_next {
                    INVALID
                } else {
                    v0_next
                };
                self.vertices[v1 as usize] = if (v1_prev ^ 1) == v1_next {
                    INVALID
                } else {
                    v1_next
                };
            } else {
                self.vertices[v0 as usize] = h; // update the vertex boundary
                result = v1;
            }

            h = self.halfedges[h as usize].next;
        }

        self.faces[f as usize] = INVALID;
        self.num_triangles -= 1;

        result
    }

    fn face_vertices(&self, f: u16) -> Option<[u16; 3]> {
        let mut h = self.faces[f as usize];
        if h == INVALID {
            return None;
        }

        let v0 = self.halfedges[h as usize].vertex;
        h = self.halfedges[h as usize].next;
        let v1 = self.halfedges[h as usize].vertex;
        h = self.halfedges[h as usize].next;
        let v2 = self.halfedges[h as usize].vertex;
        Some([v0, v1, v2])
    }

    /// Is the vertex `v` in front of the face `f`?
    fn visible(&self, points: &[Point<Real>], v: u16, f: u16) -> bool {
        let Some([v0, v1, v2]) = self.face_vertices(f) else {
            return false;
        };

        let p0 = points[v0 as usize];
        let normal = (points[v1 as usize] - p0).cross(&(points[v2 as usize] - p0));
        normal.dot(&(points[v as usize] - p0)) > VISIBILITY_EPS
    }
}

/// Computes the convex hull of a set of points as a triangle mesh.
///
/// The mesh is built incrementally: a seed tetrahedron is selected from the
/// input, then every remaining point removes the faces it can see and the
/// resulting boundary loop is retriangulated as a fan from the point. Only
/// the vertices that ended up on the hull are returned; triangles index into
/// the returned vertex buffer and are wound counter-clockwise seen from the
/// outside.
pub fn try_convex_hull_mesh(
    points: &[Point<Real>],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
    if points.len() < 4 {
        return Err(ConvexHullError::IncompleteInput);
    }
    if points.len() > u16::MAX as usize {
        return Err(ConvexHullError::IndexOverflow);
    }

    // Pick a non-degenerate seed tetrahedron.
    let p0 = points[0];
    let i1 = points
        .iter()
        .position(|p| (p - p0).norm_squared() > SEED_EPS)
        .ok_or(ConvexHullError::Degenerate)? as u16;
    let e1 = points[i1 as usize] - p0;
    let i2 = points
        .iter()
        .position(|p| e1.cross(&(p - p0)).norm_squared() > SEED_EPS)
        .ok_or(ConvexHullError::Degenerate)? as u16;
    let normal = e1.cross(&(points[i2 as usize] - p0));
    let i3 = points
        .iter()
        .position(|p| normal.dot(&(p - p0)).abs() > SEED_EPS)
        .ok_or(ConvexHullError::Degenerate)? as u16;

    let (i0, i1) = if normal.dot(&(points[i3 as usize] - p0)) > 0.0 {
        // Inside-out, flip the base orientation.
        (i1, 0)
    } else {
        (0, i1)
    };

    let mut mesh = HalfedgeMesh::default();
    mesh.add_triangle(i0, i1, i2)?;
    mesh.add_triangle(i0, i3, i1)?;
    mesh.add_triangle(i1, i3, i2)?;
    mesh.add_triangle(i2, i3, i0)?;

    let seeds = [i0, i1, i2, i3];
    for i in 0..points.len() as u16 {
        if seeds.contains(&i) {
            continue;
        }

        // Remove any face visible from the new point.
        let mut v0 = INVALID;
        for f in 0..mesh.faces.len() as u16 {
            if mesh.visible(points, i, f) {
                v0 = v0.min(mesh.remove_triangle(f));
            }
        }

        if v0 == INVALID {
            continue; // no face removed, the point is interior
        }

        if mesh.num_triangles == 0 {
            return Err(ConvexHullError::Degenerate);
        }

        // Find a surviving boundary vertex.
        let mut h = 0;
        while mesh.vertices[v0 as usize] == INVALID {
            if h + 1 >= mesh.halfedges.len() {
                return Err(ConvexHullError::NonManifold);
            }
            if (mesh.halfedges[h].face == INVALID) != (mesh.halfedges[h + 1].face == INVALID) {
                v0 = mesh.halfedges[h].vertex;
            }
            h += 2;
        }

        // Retriangulate the hole as a fan from the new point.
        let start = v0;
        let mut vc = v0;
        loop {
            let h = mesh.vertices[vc as usize];
            let v1 = mesh.halfedges[h as usize].vertex;
            if mesh.faces.len() >= u16::MAX as usize {
                return Err(ConvexHullError::IndexOverflow);
            }
            mesh.add_triangle(vc, v1, i)?;
            vc = v1;
            if vc == start {
                break;
            }
        }

        // The fan must have closed every boundary edge.
        for h in (0..mesh.halfedges.len()).step_by(2) {
            if (mesh.halfedges[h].face == INVALID) != (mesh.halfedges[h + 1].face == INVALID) {
                return Err(ConvexHullError::NonManifold);
            }
        }
    }

    // Compact the output to the vertices actually on the hull.
    let mut remap = vec![u32::MAX; points.len()];
    let mut out_vertices = Vec::new();
    let mut out_faces = Vec::with_capacity(mesh.num_triangles);

    for f in 0..mesh.faces.len() as u16 {
        let Some(verts) = mesh.face_vertices(f) else {
            continue;
        };

        let mut tri = [0u32; 3];
        for (k, v) in verts.iter().enumerate() {
            let v = *v as usize;
            if remap[v] == u32::MAX {
                remap[v] = out_vertices.len() as u32;
                out_vertices.push(points[v]);
            }
            tri[k] = remap[v];
        }
        out_faces.push(tri);
    }

    Ok((out_vertices, out_faces))
}
