use earcutr::earcut;
use foundation::math::Vec3;
use layers::VectorStyle;
use scene::{Feature, Geometry, MeshPrimitive, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::converters::line_string::build_polyline;
use crate::converters::{apply_colors, rebuild_required};

pub struct PolygonConverter;

/// Builds the drawables for one polygon: a triangulated fill mesh when the
/// style has a fill, and one closed outline polyline per valid ring when
/// it has a stroke. Returns an empty vector for degenerate input.
pub(crate) fn build_polygon(rings: &[Vec<Vec3>], style: &VectorStyle) -> Vec<Primitive> {
    let mut out = Vec::new();

    if let Some(fill) = &style.fill {
        let triangles = triangulate_rings(rings);
        if !triangles.is_empty() {
            out.push(Primitive::Mesh(MeshPrimitive {
                triangles,
                color: fill.color,
            }));
        }
    }

    if let Some(stroke) = &style.stroke {
        for ring in rings {
            let closed = closed_ring(ring);
            if closed.len() < 4 {
                continue;
            }
            if let Some(outline) = build_polyline(&closed, stroke) {
                out.push(outline);
            }
        }
    }

    out
}

/// Triangulates rings given in planar map coordinates into a flat triangle
/// list. The first ring is the exterior, the rest are holes. Degenerate
/// rings are skipped; a degenerate exterior yields no triangles.
pub(crate) fn triangulate_rings(rings: &[Vec<Vec3>]) -> Vec<Vec3> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (ring_i, ring) in rings.iter().enumerate() {
        let mut points = ring.clone();
        drop_closing_duplicate(&mut points);
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            if ring_i == 0 {
                return Vec::new();
            }
            continue;
        }

        if ring_i > 0 {
            hole_indices.push(vertices.len());
        }
        for p in points {
            coords.push(p.x);
            coords.push(p.y);
            vertices.push(p);
        }
    }

    if vertices.len() < 3 {
        return Vec::new();
    }

    let indices = match earcut(&coords, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    let mut out = Vec::with_capacity(indices.len());
    for idx in indices {
        if let Some(v) = vertices.get(idx) {
            out.push(*v);
        }
    }
    out
}

fn drop_closing_duplicate(points: &mut Vec<Vec3>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = *points.last().unwrap();
        if (first.x - last.x).abs() < 1e-9
            && (first.y - last.y).abs() < 1e-9
            && (first.z - last.z).abs() < 1e-9
        {
            points.pop();
        }
    }
}

fn closed_ring(ring: &[Vec3]) -> Vec<Vec3> {
    let mut out = ring.to_vec();
    drop_closing_duplicate(&mut out);
    if let Some(first) = out.first().copied()
        && out.len() >= 3
    {
        out.push(first);
    }
    out
}

impl GeometryConverter for PolygonConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::Polygon { rings } = geometry.shape() else {
            return false;
        };
        let primitives = build_polygon(rings, style);
        if primitives.is_empty() {
            return false;
        }
        for primitive in primitives {
            ctx.add_primitive(primitive, feature.id(), geometry.id());
        }
        true
    }

    /// Same policy as line strings: width, dash and vertex data are baked
    /// in, so only color changes apply in place. Ring count and fill
    /// presence changes also reject.
    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::Polygon { rings } = geometry.shape() else {
            return false;
        };
        let expected = build_polygon(rings, style);
        if expected.is_empty() {
            return false;
        }
        if rebuild_required(ctx, handles, &expected) {
            return false;
        }
        apply_colors(ctx, handles, &expected);
        true
    }
}
