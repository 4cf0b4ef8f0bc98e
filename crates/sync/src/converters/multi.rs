use foundation::math::Vec3;
use layers::VectorStyle;
use scene::{Feature, Geometry, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::converters::line_string::build_polyline;
use crate::converters::point::{billboard_apply, billboard_kind_compatible, build_billboard};
use crate::converters::polygon::build_polygon;
use crate::converters::{apply_colors, rebuild_required};

pub struct MultiPointConverter;
pub struct MultiLineStringConverter;
pub struct MultiPolygonConverter;

/// One polyline per constituent line string, all built before any is
/// registered; a single degenerate part fails the whole create.
fn build_multi_polylines(lines: &[Vec<Vec3>], style: &VectorStyle) -> Option<Vec<Primitive>> {
    let stroke = style.stroke.as_ref()?;
    if lines.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        out.push(build_polyline(line, stroke)?);
    }
    Some(out)
}

/// The drawables for every constituent polygon, concatenated in input
/// order; a polygon that yields nothing fails the whole create.
fn build_multi_polygons(polygons: &[Vec<Vec<Vec3>>], style: &VectorStyle) -> Option<Vec<Primitive>> {
    if polygons.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    for rings in polygons {
        let primitives = build_polygon(rings, style);
        if primitives.is_empty() {
            return None;
        }
        out.extend(primitives);
    }
    Some(out)
}

impl GeometryConverter for MultiPointConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::MultiPoint { positions } = geometry.shape() else {
            return false;
        };
        if positions.is_empty() {
            return false;
        }

        let mut built = Vec::with_capacity(positions.len());
        for position in positions {
            let Some(primitive) = build_billboard(*position, style) else {
                return false;
            };
            built.push(primitive);
        }
        for primitive in built {
            ctx.add_primitive(primitive, feature.id(), geometry.id());
        }
        true
    }

    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::MultiPoint { positions } = geometry.shape() else {
            return false;
        };
        // The registered billboard count stays in lock-step with the
        // input array; a grown or shrunk array means delete-and-recreate.
        if handles.len() != positions.len() || positions.is_empty() {
            return false;
        }
        if positions.iter().any(|p| !p.is_finite()) {
            return false;
        }
        for handle in handles {
            let Some(primitive) = ctx.primitive(*handle) else {
                return false;
            };
            if !billboard_kind_compatible(primitive, style) {
                return false;
            }
        }

        for (handle, position) in handles.iter().zip(positions) {
            if let Some(primitive) = ctx.primitive_mut(*handle) {
                billboard_apply(primitive, *position, style);
            }
        }
        true
    }
}

impl GeometryConverter for MultiLineStringConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::MultiLineString { lines } = geometry.shape() else {
            return false;
        };
        let Some(built) = build_multi_polylines(lines, style) else {
            return false;
        };
        for primitive in built {
            ctx.add_primitive(primitive, feature.id(), geometry.id());
        }
        true
    }

    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::MultiLineString { lines } = geometry.shape() else {
            return false;
        };
        let Some(expected) = build_multi_polylines(lines, style) else {
            return false;
        };
        if rebuild_required(ctx, handles, &expected) {
            return false;
        }
        apply_colors(ctx, handles, &expected);
        true
    }
}

impl GeometryConverter for MultiPolygonConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::MultiPolygon { polygons } = geometry.shape() else {
            return false;
        };
        let Some(built) = build_multi_polygons(polygons, style) else {
            return false;
        };
        for primitive in built {
            ctx.add_primitive(primitive, feature.id(), geometry.id());
        }
        true
    }

    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::MultiPolygon { polygons } = geometry.shape() else {
            return false;
        };
        let Some(expected) = build_multi_polygons(polygons, style) else {
            return false;
        };
        if rebuild_required(ctx, handles, &expected) {
            return false;
        }
        apply_colors(ctx, handles, &expected);
        true
    }
}
