//! Convex polytopes stored as vertices, unique outward planes, and edges.

use crate::bounding_volume::Aabb;
use crate::math::{CofactorTransform, Isometry, Matrix, Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::plane::{intersect_planes, point_inside_planes};
use crate::shape::{Plane, SupportMap};
use crate::transformation;
use crate::utils::{self, SortedPair};

/// Sentinel face index of an edge side that has no adjacent face.
pub const NO_FACE: u16 = u16::MAX;

/// A hull edge: a canonical `(low, high)` vertex-index pair and the pair of
/// adjacent face indices.
///
/// One of the face indices may be [`NO_FACE`] on an open edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// The edge endpoints, sorted in increasing index order.
    pub vertices: [u16; 2],
    /// The faces on either side of the edge.
    pub faces: [u16; 2],
}

/// A convex polytope with precomputed (redundant) adjacency information.
///
/// The hull stores its corner vertices, one plane per unique face *direction*
/// (a direction whose opposite face also exists is stored once, together with
/// the slab width between the two supporting planes), the edge list with face
/// adjacency, and summary scalars (bounds, volume).
///
/// Builders degrade to the empty hull on degenerate input rather than
/// failing; every query against an empty hull reports no containment, no
/// overlap, and no extent.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    vertices: Vec<Point<Real>>,
    unique_planes: Vec<Plane>,
    widths: Vec<Real>,
    edges: Vec<Edge>,
    bounds: Aabb,
    volume: Real,
    unique_edge_direction_count: usize,
    paired_plane_count: usize,
}

impl Default for ConvexHull {
    fn default() -> Self {
        ConvexHull {
            vertices: Vec::new(),
            unique_planes: Vec::new(),
            widths: Vec::new(),
            edges: Vec::new(),
            bounds: Aabb::new_invalid(),
            volume: 0.0,
            unique_edge_direction_count: 0,
            paired_plane_count: 0,
        }
    }
}

struct FaceEdge {
    verts: SortedPair<u16>,
    face: u16,
    opposite: bool,
}

impl ConvexHull {
    /*
     * Builders.
     */

    /// Builds the convex hull of a point cloud.
    ///
    /// Fewer than four points, or a coplanar/collinear/coincident cloud,
    /// yield an empty hull. The cloud is first re-expressed in its
    /// principal-axis frame and rescaled to a unit cube for numerical
    /// conditioning; the hull is built there and transformed back.
    pub fn from_point_cloud(points: &[Point<Real>]) -> ConvexHull {
        if points.len() < 4 {
            return ConvexHull::default();
        }

        let (mean, cov) = utils::center_cov(points);
        let (_, axes) = utils::symmetric_eigen3(&cov);

        // Subtract the mean and rotate the points into the frame of the axes.
        let mut conditioned: Vec<Point<Real>> = points
            .iter()
            .map(|p| Point::from(axes.transpose() * (p - mean)))
            .collect();

        // Find a scale such that the maximum absolute coordinate on each axis
        // is one.
        let mut scale = Vector::<Real>::zeros();
        for p in &conditioned {
            for j in 0..3 {
                scale[j] = scale[j].max(p.coords[j].abs());
            }
        }
        if scale.x * scale.y * scale.z == 0.0 {
            log::debug!("convex hull build failed: planar, collinear or coincident points");
            return ConvexHull::default();
        }

        let recip_scale = Vector::new(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);
        for p in &mut conditioned {
            p.coords.component_mul_assign(&recip_scale);
        }

        let (hull_vertices, hull_faces) = match transformation::try_convex_hull_mesh(&conditioned)
        {
            Ok(mesh) => mesh,
            Err(err) => {
                log::debug!("convex hull build failed: {err}");
                return ConvexHull::default();
            }
        };

        let mut hull = ConvexHull::from_mesh(hull_vertices, &hull_faces);

        // Restore the original frame.
        let linear = Matrix::from_columns(&[
            axes.column(0).into_owned() * scale.x,
            axes.column(1).into_owned() * scale.y,
            axes.column(2).into_owned() * scale.z,
        ]);
        let _ = hull.apply_transform(&linear, &mean.coords);
        hull
    }

    /// Builds the hull bounded by a set of half-spaces.
    ///
    /// Every plane triple is intersected; an intersection point survives if
    /// it lies within `eps` of the non-positive side of every other plane.
    /// Surviving points (deduplicated within `eps`) seed the incremental
    /// hull construction. An unbounded or empty intersection yields an empty
    /// hull.
    pub fn from_planes(planes: &[Plane], eps: Real) -> ConvexHull {
        let mut points: Vec<Point<Real>> = Vec::new();

        for i in 0..planes.len() {
            for j in i + 1..planes.len() {
                for k in j + 1..planes.len() {
                    let Some(point) = intersect_planes(&planes[i], &planes[j], &planes[k]) else {
                        continue;
                    };

                    if point_inside_planes(&point, &planes[..i], eps)
                        && point_inside_planes(&point, &planes[i + 1..j], eps)
                        && point_inside_planes(&point, &planes[j + 1..k], eps)
                        && point_inside_planes(&point, &planes[k + 1..], eps)
                        && points.iter().all(|p| (point - p).norm_squared() >= eps)
                    {
                        points.push(point);
                    }
                }
            }
        }

        ConvexHull::from_point_cloud(&points)
    }

    /// Builds the hull of an axis-aligned box: 8 vertices, 3 unique plane
    /// directions (6 faces), and 12 edges in closed form.
    pub fn from_aabb(aabb: &Aabb) -> ConvexHull {
        if aabb.is_empty() {
            return ConvexHull::default();
        }

        let center = aabb.center();
        let extent = aabb.half_extents();

        let mut vertices = Vec::with_capacity(8);
        for i in 0..8usize {
            vertices.push(
                center
                    + Vector::new(
                        (2.0 * (i & 1) as Real - 1.0) * extent.x,
                        ((i & 2) as Real - 1.0) * extent.y,
                        (0.5 * (i & 4) as Real - 1.0) * extent.z,
                    ),
            );
        }

        let mut unique_planes = Vec::with_capacity(3);
        let mut widths = Vec::with_capacity(3);
        for i in 0..3 {
            let mut normal = Vector::zeros();
            normal[i] = -1.0;
            unique_planes.push(Plane::new(normal, aabb.mins[i]));
            widths.push(aabb.maxs[i] - aabb.mins[i]);
        }

        let mut edges = vec![
            Edge {
                vertices: [0; 2],
                faces: [0; 2]
            };
            12
        ];
        for i in 0..3u16 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;
            let v_offset1 = 1u16 << i1;
            let v_offset2 = 1u16 << i2;
            for j in 0..4u16 {
                let mut v0 = 0u16;
                let mut v1 = 1u16 << i;
                let mut f0 = i1;
                let mut f1 = i2;
                if j & 1 != 0 {
                    v0 += v_offset1;
                    v1 += v_offset1;
                    f0 += 3;
                }
                if j & 2 != 0 {
                    v0 += v_offset2;
                    v1 += v_offset2;
                    f1 += 3;
                }
                if j == 1 || j == 2 {
                    std::mem::swap(&mut f0, &mut f1);
                }
                edges[(i + 3 * j) as usize] = Edge {
                    vertices: [v0, v1],
                    faces: [f0, f1],
                };
            }
        }

        let diag = aabb.extents();
        ConvexHull {
            vertices,
            unique_planes,
            widths,
            edges,
            bounds: *aabb,
            volume: diag.x * diag.y * diag.z,
            unique_edge_direction_count: 3,
            paired_plane_count: 3,
        }
    }

    /// Builds a discrete-orientation polytope around a point cloud.
    ///
    /// For each direction the extreme projections of the cloud produce two
    /// opposing half-spaces; the resulting plane set is handed to
    /// [`ConvexHull::from_planes`].
    pub fn from_kdop(points: &[Point<Real>], directions: &[Vector<Real>]) -> ConvexHull {
        if points.is_empty() {
            return ConvexHull::default();
        }

        let mut size: Real = 0.0;
        let mut planes = Vec::with_capacity(2 * directions.len());
        for dir in directions {
            let Some(dir) = dir.try_normalize(0.0) else {
                continue;
            };
            let (min, max) = utils::points_extent(points, &dir);
            planes.push(Plane::new(dir, -max));
            planes.push(Plane::new(-dir, min));
            size = size.max(max - min);
        }

        ConvexHull::from_planes(&planes, 1.0e-5 * size)
    }

    /// Builds a hull from a closed triangle mesh whose faces are wound
    /// counter-clockwise seen from the outside.
    ///
    /// This is the shared bookkeeping stage of all builders: coplanar
    /// triangles are merged into faces, opposite face pairs into slabs, the
    /// edge list is deduplicated, and the directionally unique edges are
    /// moved to the front of the edge list.
    pub fn from_mesh(vertices: Vec<Point<Real>>, faces: &[[u32; 3]]) -> ConvexHull {
        if vertices.is_empty() || faces.is_empty() {
            return ConvexHull::default();
        }
        if vertices.len() >= u16::MAX as usize || faces.len() >= u16::MAX as usize {
            log::debug!("convex hull build failed: 16-bit index space exhausted");
            return ConvexHull::default();
        }

        let bounds = Aabb::from_points(&vertices);
        let center = bounds.center();

        let mut unique_planes: Vec<Plane> = Vec::new();
        let mut widths: Vec<Real> = Vec::new();
        let mut face_edges: Vec<FaceEdge> = Vec::with_capacity(faces.len() * 3);
        let mut volume = 0.0;

        for tri in faces {
            let v0 = vertices[tri[0] as usize];
            let v1 = vertices[tri[1] as usize];
            let v2 = vertices[tri[2] as usize];
            let normal_sum = (v1 - v0).cross(&(v2 - v0));
            volume += normal_sum.dot(&(v0 - center));

            let Some(normal) = normal_sum.try_normalize(0.0) else {
                continue;
            };
            let d = -(normal.dot(&v0.coords) + normal.dot(&v1.coords) + normal.dot(&v2.coords))
                / 3.0;

            // See if this face shares a direction with an existing one.
            let mut face_n = unique_planes.len();
            let mut opposite = false;
            for (j, unique) in unique_planes.iter().enumerate() {
                let cos_theta = normal.dot(&unique.normal);
                if cos_theta * cos_theta > 0.999999 {
                    face_n = j;
                    opposite = cos_theta < 0.0;
                    break;
                }
            }

            if face_n == unique_planes.len() {
                unique_planes.push(Plane::new(normal, d));
                widths.push(Real::MAX);
            } else if opposite && widths[face_n] == Real::MAX {
                // New slab.
                widths[face_n] = -unique_planes[face_n].distance(&v0);
            }

            for k in 0..3 {
                face_edges.push(FaceEdge {
                    verts: SortedPair::new(tri[k] as u16, tri[(k + 1) % 3] as u16),
                    face: face_n as u16,
                    opposite,
                });
            }
        }

        // Permute the paired directions (true slabs) to the front of the
        // plane list, keeping the map needed to fix up edge face indices.
        let mut inv_map: Vec<usize> = (0..widths.len()).collect();
        let mut slab_count = widths.len();
        for i in (0..widths.len()).rev() {
            if widths[i] == Real::MAX {
                slab_count -= 1;
                widths.swap(i, slab_count);
                unique_planes.swap(i, slab_count);
                inv_map.swap(i, slab_count);
            }
        }

        let mut map = vec![0usize; inv_map.len()];
        for (i, inv) in inv_map.iter().enumerate() {
            map[*inv] = i;
        }

        for fe in &mut face_edges {
            fe.face = map[fe.face as usize] as u16;
            if fe.opposite {
                fe.face += unique_planes.len() as u16;
            }
        }

        let paired_plane_count = slab_count;

        // The remaining directions have no structural opposite; their width
        // is the vertex-set extent along the direction.
        for f_i in slab_count..widths.len() {
            widths[f_i] = 0.0;
            for v in &vertices {
                let depth = -unique_planes[f_i].distance(v);
                if depth > widths[f_i] {
                    widths[f_i] = depth;
                }
            }
        }

        // Eliminate redundant edges. Stable order by (v0, v1, face) makes
        // records of a shared edge adjacent; a pair with two distinct faces
        // is a real edge, a pair within one merged face is interior.
        face_edges.sort_by_key(|e| (e.verts, e.face));
        let mut edges: Vec<Edge> = Vec::new();
        let mut e_i = 0;
        while e_i < face_edges.len() {
            let fe = &face_edges[e_i];
            let [i0, i1] = *fe.verts.as_array();
            if e_i + 1 < face_edges.len() && face_edges[e_i + 1].verts == fe.verts {
                if fe.face != face_edges[e_i + 1].face {
                    edges.push(Edge {
                        vertices: [i0, i1],
                        faces: [fe.face, face_edges[e_i + 1].face],
                    });
                }
                e_i += 2;
            } else {
                edges.push(Edge {
                    vertices: [i0, i1],
                    faces: [NO_FACE, fe.face],
                });
                e_i += 1;
            }
        }

        // Find the directionally unique edges and put them at the front of
        // the edge list.
        let mut unique_edge_direction_count = 0;
        if !edges.is_empty() {
            unique_edge_direction_count = 1;
            for test_index in 1..edges.len() {
                let test_edge = edge_direction_of(&vertices, &edges[test_index]);
                let test2 = test_edge.norm_squared();
                let mut unique_index = 0;
                while unique_index < unique_edge_direction_count {
                    let unique_edge = edge_direction_of(&vertices, &edges[unique_index]);
                    if unique_edge.cross(&test_edge).norm_squared()
                        < test2
                            * unique_edge.norm_squared()
                            * DEFAULT_EPSILON
                            * DEFAULT_EPSILON
                    {
                        break;
                    }
                    unique_index += 1;
                }
                if unique_index == unique_edge_direction_count {
                    edges.swap(unique_edge_direction_count, test_index);
                    unique_edge_direction_count += 1;
                }
            }
        }

        volume /= 6.0;

        ConvexHull {
            vertices,
            unique_planes,
            widths,
            edges,
            bounds,
            volume,
            unique_edge_direction_count,
            paired_plane_count,
        }
    }

    /*
     * In-place mutators.
     */

    /// Truncates this hull by a half-space, keeping the non-positive side of
    /// `plane`.
    ///
    /// A plane that keeps every vertex (within a size-relative epsilon) is a
    /// no-op; a plane that discards every vertex empties the hull. Otherwise
    /// new vertices are introduced where the cutting plane crosses existing
    /// face-plane pairs and the hull is rebuilt.
    pub fn truncate(&mut self, plane: &Plane) {
        if self.is_empty() {
            return;
        }

        let size = self.bounds.extents().norm();
        let eps = 1.0e-5 * size;

        let old_vertex_count = self.vertices.len();
        let mut vertices: Vec<Point<Real>> = self
            .vertices
            .iter()
            .copied()
            .filter(|v| plane.distance(v) <= eps)
            .collect();

        if vertices.is_empty() {
            // The plane excludes this whole hull.
            *self = ConvexHull::default();
            return;
        }

        if vertices.len() == old_vertex_count {
            // The plane includes this whole hull.
            return;
        }

        // Intersect the new plane with all pairs of old planes.
        let plane_count = self.plane_count();
        for j in 1..plane_count {
            let plane_j = self.plane(j);
            for i in 0..j {
                let plane_i = self.plane(i);
                let Some(point) = intersect_planes(plane, &plane_i, &plane_j) else {
                    continue;
                };

                let excluded = (0..plane_count)
                    .any(|k| k != i && k != j && self.plane(k).distance(&point) > eps);
                if !excluded && vertices.iter().all(|v| (point - v).norm_squared() >= eps) {
                    vertices.push(point);
                }
            }
        }

        *self = ConvexHull::from_point_cloud(&vertices);
    }

    /// Replaces this hull by its intersection with another hull.
    pub fn intersect_with(&mut self, hull: &ConvexHull) {
        if hull.plane_count() == 0 {
            *self = ConvexHull::default();
            return;
        }

        let mut planes = Vec::with_capacity(self.plane_count() + hull.plane_count());
        planes.extend((0..self.plane_count()).map(|i| self.plane(i)));
        planes.extend((0..hull.plane_count()).map(|i| hull.plane(i)));

        let size = self.bounds.extents().norm();
        *self = ConvexHull::from_planes(&planes, 1.0e-5 * size);
    }

    /// Applies an arbitrary invertible affine transform to this hull in
    /// place.
    ///
    /// Vertices are mapped directly; planes go through the cofactor
    /// transform and are renormalized, scaling the slab widths accordingly.
    /// Returns `true` when the transform is mirroring (negative determinant):
    /// the hull's own plane orientation is corrected, but a consuming
    /// triangle mesh must have its winding reversed by the caller.
    pub fn apply_transform(&mut self, linear: &Matrix<Real>, translation: &Vector<Real>) -> bool {
        let det3 = linear.determinant();
        let mirrored = det3 < 0.0;
        let abs_det = det3.abs();

        let mut cof = CofactorTransform::new(linear, translation);
        cof.normalize_sign();

        for (plane, width) in self.unique_planes.iter_mut().zip(self.widths.iter_mut()) {
            let dst = cof.transform_plane(plane);
            *plane = dst;
            let n2 = dst.normal.norm_squared();
            if n2 > 0.0 {
                let recip_n = 1.0 / n2.sqrt();
                *plane = Plane::new(dst.normal * recip_n, dst.d * recip_n);
                *width *= abs_det * recip_n;
            }
        }

        self.bounds = Aabb::new_invalid();
        for v in self.vertices.iter_mut() {
            *v = Point::from(linear * v.coords + translation);
            self.bounds.take_point(*v);
        }

        self.volume *= abs_det;
        mirrored
    }

    /// Applies a rigid transform followed by a positive uniform scale about
    /// the origin, the common fast path of the consuming system.
    pub fn apply_isometry(&mut self, iso: &Isometry<Real>, scale: Real) {
        let scaled_translation = iso.translation.vector * scale;

        for plane in self.unique_planes.iter_mut() {
            let normal = iso.rotation * plane.normal;
            let d = plane.d * scale - normal.dot(&scaled_translation);
            *plane = Plane::new(normal, d);
        }

        for width in self.widths.iter_mut() {
            *width *= scale;
        }

        self.bounds = Aabb::new_invalid();
        for v in self.vertices.iter_mut() {
            *v = Point::from(iso.transform_point(v).coords * scale);
            self.bounds.take_point(*v);
        }

        self.volume *= scale * scale * scale;
    }

    /*
     * Queries.
     */

    /// The min and max projections of the hull vertices onto `dir`.
    ///
    /// An empty hull yields the inverted interval `(Real::MAX, -Real::MAX)`.
    pub fn extent(&self, dir: &Vector<Real>) -> (Real, Real) {
        utils::points_extent(&self.vertices, dir)
    }

    /// Intersects a world-space ray with this hull under the given pose and
    /// non-uniform scale.
    ///
    /// `t_in` and `t_out` are both input and output: on input they carry the
    /// minimum and maximum admissible ray times, on output the times the ray
    /// enters and exits the hull. The direction need not be normalized (a
    /// zero direction acts as a point containment test). If `normal` is
    /// provided it receives the world-space entry normal, or zero when the
    /// ray origin starts inside the hull.
    pub fn ray_cast(
        &self,
        t_in: &mut Real,
        t_out: &mut Real,
        world_orig: &Point<Real>,
        world_dir: &Vector<Real>,
        local_to_world: &Isometry<Real>,
        scale: &Vector<Real>,
        mut normal: Option<&mut Vector<Real>>,
    ) -> bool {
        if self.unique_planes.is_empty() {
            return false;
        }

        // Singular transforms are not handled.
        let det_s = scale.x * scale.y * scale.z;
        if det_s == 0.0 {
            return false;
        }
        let recip_det_s = 1.0 / det_s;
        let inv_s =
            Vector::new(scale.y * scale.z, scale.z * scale.x, scale.x * scale.y) * recip_det_s;

        // Hull-local ray; local and world intersection times are equal.
        let local_orig = Point::from(
            local_to_world
                .inverse_transform_point(world_orig)
                .coords
                .component_mul(&inv_s),
        );
        let local_dir = local_to_world
            .inverse_transform_vector(world_dir)
            .component_mul(&inv_s);

        if let Some(n) = normal.as_deref_mut() {
            // This is the reported value if the ray origin is inside the hull.
            *n = Vector::zeros();
        }

        let tol2 = 1.0e-14 * local_dir.norm_squared();

        for (plane, width) in self.unique_planes.iter().zip(self.widths.iter()) {
            let num0 = -plane.distance(&local_orig);
            let num1 = *width - num0;
            let den = local_dir.dot(&plane.normal);
            if den * den <= tol2 {
                // Needs to be <=, so that a zero direction acts as a point check.
                if num0 < 0.0 || num1 < 0.0 {
                    return false;
                }
            } else if den > 0.0 {
                if num0 < *t_in * den || num1 < *t_out * -den {
                    return false;
                }
                let recip_den = 1.0 / den;
                let slab_in = -num1 * recip_den;
                if slab_in > *t_in {
                    *t_in = slab_in;
                    if let Some(n) = normal.as_deref_mut() {
                        *n = -plane.normal;
                    }
                }
                *t_out = (num0 * recip_den).min(*t_out);
            } else {
                if num0 < *t_out * den || num1 < *t_in * -den {
                    return false;
                }
                let recip_den = 1.0 / den;
                let slab_in = num0 * recip_den;
                if slab_in > *t_in {
                    *t_in = slab_in;
                    if let Some(n) = normal.as_deref_mut() {
                        *n = plane.normal;
                    }
                }
                *t_out = (-num1 * recip_den).min(*t_out);
            }
        }

        if let Some(n) = normal {
            let cof = CofactorTransform::from_isometry_scale(local_to_world, scale);
            *n = (cof.block() * *n)
                .try_normalize(0.0)
                .unwrap_or_else(Vector::zeros);
        }

        true
    }

    /// Sweeps a world-space oriented box along a displacement against this
    /// hull and computes the overlap time interval.
    ///
    /// The test is a continuous separating-axis test over the hull's slab
    /// normals, the box's face normals, and the cross products of the box
    /// axes with the hull's unique edge directions. `t_in`/`t_out` carry the
    /// admissible time interval on input (relative to the displacement
    /// length) and the entering/exiting times on output. The axis producing
    /// the latest entering time supplies the reported contact normal.
    pub fn obb_sweep(
        &self,
        t_in: &mut Real,
        t_out: &mut Real,
        world_box_center: &Point<Real>,
        world_box_extents: &Vector<Real>,
        world_box_axes: &[Vector<Real>; 3],
        world_disp: &Vector<Real>,
        local_to_world: &Isometry<Real>,
        scale: &Vector<Real>,
        mut normal: Option<&mut Vector<Real>>,
    ) -> bool {
        if self.is_empty() {
            return false;
        }

        let det_s = scale.x * scale.y * scale.z;
        if det_s == 0.0 {
            return false;
        }
        let recip_det_s = 1.0 / det_s;
        let inv_s =
            Vector::new(scale.y * scale.z, scale.z * scale.x, scale.x * scale.y) * recip_det_s;

        // The hull stays untransformed; the box is brought into hull-local
        // space, where it becomes a parallelepiped in general. For brevity
        // it is still called a box.
        let disp = local_to_world
            .inverse_transform_vector(world_disp)
            .component_mul(&inv_s);
        let box_center = Point::from(
            local_to_world
                .inverse_transform_point(world_box_center)
                .coords
                .component_mul(&inv_s),
        );

        let mut box_axes = [Vector::zeros(); 3];
        for i in 0..3 {
            box_axes[i] = (local_to_world.inverse_transform_vector(&world_box_axes[i])
                * world_box_extents[i])
                .component_mul(&inv_s);
        }

        let octant_vol = box_axes[0].dot(&box_axes[1].cross(&box_axes[2]));
        let mut box_face_normals = [Vector::zeros(); 3];
        let mut box_radii = [0.0; 3];
        for i in 0..3 {
            let n = box_axes[(1 << i) & 3].cross(&box_axes[(3 >> i) ^ 1]);
            let recip_norm = 1.0 / n.norm();
            box_face_normals[i] = n * recip_norm;
            box_radii[i] = octant_vol * recip_norm;
        }

        let mut t_normal = -Real::MAX;

        // Test the box against the slabs of the hull.
        for (plane, width) in self.unique_planes.iter().zip(self.widths.iter()) {
            let projected_radius = plane.normal.dot(&box_axes[0]).abs()
                + plane.normal.dot(&box_axes[1]).abs()
                + plane.normal.dot(&box_axes[2]).abs();
            let projected_center = plane.normal.dot(&box_center.coords);
            let vel0 = disp.dot(&plane.normal);
            let tt = utils::extent_overlap_time_interval(
                vel0,
                projected_center - projected_radius,
                projected_center + projected_radius,
                -plane.d - *width,
                -plane.d,
            );
            if !update_time_interval_and_normal(
                t_in,
                t_out,
                &mut t_normal,
                &mut normal,
                tt,
                -vel0.signum() * plane.normal,
            ) {
                return false;
            }
        }

        // Test the hull against the box face directions.
        for i in 0..3 {
            let face_normal = box_face_normals[i];
            let (min, max) = utils::points_extent(&self.vertices, &face_normal);
            let projected_radius = box_radii[i];
            let projected_center = face_normal.dot(&box_center.coords);
            let vel0 = disp.dot(&face_normal);
            let tt = utils::extent_overlap_time_interval(
                vel0,
                projected_center - projected_radius,
                projected_center + projected_radius,
                min,
                max,
            );
            if !update_time_interval_and_normal(
                t_in,
                t_out,
                &mut t_normal,
                &mut normal,
                tt,
                -vel0.signum() * face_normal,
            ) {
                return false;
            }
        }

        // Test the hull against the cross-edge planes.
        for hull_edge_index in 0..self.unique_edge_direction_count {
            let hull_edge = self.edge_direction(hull_edge_index);
            for box_edge_index in 0..3 {
                let mut n = hull_edge.cross(&box_axes[box_edge_index]);
                let n2 = n.norm_squared();
                if n2 < DEFAULT_EPSILON * DEFAULT_EPSILON {
                    continue;
                }
                n /= n2.sqrt();
                // Choose the direction such that the normal component of the
                // velocity is negative.
                let mut vel0 = disp.dot(&n);
                if vel0 > 0.0 {
                    vel0 = -vel0;
                    n = -n;
                }
                let projected_radius = n.dot(&box_axes[(1 << box_edge_index) & 3]).abs()
                    + n.dot(&box_axes[(3 >> box_edge_index) ^ 1]).abs();
                let projected_center = n.dot(&box_center.coords);
                let (min, max) = utils::points_extent(&self.vertices, &n);
                let tt = utils::extent_overlap_time_interval(
                    vel0,
                    projected_center - projected_radius,
                    projected_center + projected_radius,
                    min,
                    max,
                );
                if !update_time_interval_and_normal(t_in, t_out, &mut t_normal, &mut normal, tt, n)
                {
                    return false;
                }
            }
        }

        if let Some(n) = normal {
            let cof = CofactorTransform::from_isometry_scale(local_to_world, scale);
            *n = (cof.block() * *n)
                .try_normalize(0.0)
                .unwrap_or_else(Vector::zeros);
        }

        true
    }

    /// Samples the hull interior on a regular grid under the given pose and
    /// scale.
    ///
    /// Grid columns run along the axis with the smallest cross-section area;
    /// each column is clipped against the hull faces and filled with
    /// `spacing`-separated points, optionally jittered by `jitter * spacing`
    /// (deterministic). When `adjust_spacing` is set, the spacing is enlarged
    /// so that roughly `max_points` cells cover the hull's bounding box; the
    /// output never exceeds `max_points` points either way.
    pub fn fill_with_sample_points(
        &self,
        local_to_world: &Isometry<Real>,
        scale: &Vector<Real>,
        mut spacing: Real,
        jitter: Real,
        mut max_points: usize,
        adjust_spacing: bool,
    ) -> Vec<Point<Real>> {
        let mut out = Vec::new();
        if max_points == 0 || self.is_empty() || spacing <= 0.0 {
            return out;
        }

        let cof = CofactorTransform::from_isometry_scale(local_to_world, scale);

        let mut bounds = Aabb::new_invalid();
        for v in &self.vertices {
            let world = local_to_world.transform_point(&Point::from(v.coords.component_mul(scale)));
            bounds.take_point(world);
        }
        let center = bounds.center();
        let extents = bounds.half_extents();

        let areas = Vector::new(
            extents.y * extents.z,
            extents.z * extents.x,
            extents.x * extents.y,
        );
        let axis_n = if areas[0] < areas[1] {
            if areas[0] < areas[2] {
                0
            } else {
                2
            }
        } else if areas[1] < areas[2] {
            1
        } else {
            2
        };
        let axis_n1 = (axis_n + 1) % 3;
        let axis_n2 = (axis_n + 2) % 3;

        if adjust_spacing {
            let box_volume = 8.0 * extents.x * extents.y * extents.z;
            let cell_volume = spacing * spacing * spacing;
            if box_volume > max_points as Real * cell_volume {
                spacing = (box_volume / max_points as Real).powf(1.0 / 3.0);
            }
        }

        let num_planes = self.plane_count();
        let mut hull_planes = Vec::with_capacity(num_planes);
        let mut recip_dens = Vec::with_capacity(num_planes);
        for plane_n in 0..num_planes {
            let world_plane = cof.transform_plane(&self.plane(plane_n));
            recip_dens.push(if world_plane.normal[axis_n].abs() > 1.0e-7 {
                1.0 / world_plane.normal[axis_n]
            } else {
                0.0
            });
            hull_planes.push(world_plane);
        }

        let recip_spacing = 1.0 / spacing;
        let num1 = (extents[axis_n1] * recip_spacing) as i32;
        let num2 = (extents[axis_n2] * recip_spacing) as i32;

        let mut rng = oorandom::Rand32::new(0);
        let scaled_jitter = jitter * spacing;
        let mut rand_unit = move || rng.rand_float() * 2.0 - 1.0;

        let mut orig = Point::origin();
        for i1 in -num1..=num1 {
            orig[axis_n1] = i1 as Real * spacing + center[axis_n1];
            for i2 in -num2..=num2 {
                orig[axis_n2] = i2 as Real * spacing + center[axis_n2];

                let mut col_out = extents[axis_n];
                let mut col_in = -col_out;
                orig[axis_n] = center[axis_n];

                let mut outside = false;
                for (plane, recip_den) in hull_planes.iter().zip(recip_dens.iter()) {
                    let num = -plane.distance(&orig);
                    if *recip_den == 0.0 {
                        if num < 0.0 {
                            outside = true;
                            break;
                        }
                    } else {
                        let t = num * recip_den;
                        if *recip_den > 0.0 {
                            if t < col_in {
                                outside = true;
                                break;
                            }
                            col_out = t.min(col_out);
                        } else {
                            if t > col_out {
                                outside = true;
                                break;
                            }
                            col_in = t.max(col_in);
                        }
                    }
                }
                if outside {
                    continue;
                }

                let depth = col_out - col_in;
                let stop = orig[axis_n] + col_out;
                orig[axis_n] +=
                    col_in + 0.5 * (depth - spacing * (depth * recip_spacing) as i32 as Real);
                loop {
                    out.push(
                        orig + scaled_jitter * Vector::new(rand_unit(), rand_unit(), rand_unit()),
                    );
                    max_points -= 1;
                    if max_points == 0 {
                        return out;
                    }
                    orig[axis_n] += spacing;
                    if orig[axis_n] > stop {
                        break;
                    }
                }
            }
        }

        out
    }

    /*
     * Accessors.
     */

    /// Does this hull hold no geometry at all?
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The hull vertices, in local space.
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The number of faces, counting both sides of every paired direction.
    pub fn plane_count(&self) -> usize {
        self.unique_planes.len() + self.paired_plane_count
    }

    /// The number of unique face directions.
    pub fn unique_plane_count(&self) -> usize {
        self.unique_planes.len()
    }

    /// The unique face-direction planes. The paired directions (true slabs)
    /// come first.
    pub fn unique_planes(&self) -> &[Plane] {
        &self.unique_planes
    }

    /// The hull widths along each unique face direction.
    pub fn widths(&self) -> &[Real] {
        &self.widths
    }

    /// The `index`-th face plane.
    ///
    /// Indices past the unique planes address the mirrored back face of the
    /// corresponding paired direction.
    pub fn plane(&self, index: usize) -> Plane {
        if index < self.unique_planes.len() {
            return self.unique_planes[index];
        }
        let index = index - self.unique_planes.len();
        let plane = self.unique_planes[index];
        Plane::new(-plane.normal, -plane.d - self.widths[index])
    }

    /// The hull edges. The first
    /// [`Self::unique_edge_direction_count`] entries are pairwise
    /// non-parallel.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The number of directionally unique edges at the front of the edge
    /// list.
    pub fn unique_edge_direction_count(&self) -> usize {
        self.unique_edge_direction_count
    }

    /// The (unnormalized) direction of the `index`-th edge.
    pub fn edge_direction(&self, index: usize) -> Vector<Real> {
        edge_direction_of(&self.vertices, &self.edges[index])
    }

    /// The local-space bounds of this hull.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// The signed hull volume (zero for an empty hull).
    pub fn volume(&self) -> Real {
        self.volume
    }
}

impl SupportMap for ConvexHull {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut best = Point::origin();
        let mut best_dot = -Real::MAX;
        for v in &self.vertices {
            let d = dir.dot(&v.coords);
            if d > best_dot {
                best_dot = d;
                best = *v;
            }
        }
        best
    }
}

fn edge_direction_of(vertices: &[Point<Real>], edge: &Edge) -> Vector<Real> {
    vertices[edge.vertices[1] as usize] - vertices[edge.vertices[0] as usize]
}

fn update_time_interval_and_normal(
    t_in: &mut Real,
    t_out: &mut Real,
    t_normal: &mut Real,
    normal: &mut Option<&mut Vector<Real>>,
    (tt_in, tt_out): (Real, Real),
    test_normal: Vector<Real>,
) -> bool {
    if tt_in >= *t_out || tt_out <= *t_in {
        return false; // no intersection will occur
    }

    if let Some(n) = normal.as_deref_mut() {
        if tt_in > *t_normal {
            *t_normal = tt_in;
            *n = test_normal;
        }
    }

    *t_in = tt_in.max(*t_in);
    *t_out = tt_out.min(*t_out);

    true
}
