use foundation::math::{Projection, Vec3};
use layers::VectorStyle;
use scene::{Ellipse, EllipsoidPrimitive, Feature, Geometry, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::dispatch::{ELLIPSOID, POLYGON};
use crate::ground_reference::sync_ground_reference;

/// Decorator over the two ellipse rendering modes. The per-layer
/// `show_ellipsoids` flag picks between a true 3D ellipsoid and a flat
/// boundary polygon; the ground-reference line is maintained either way.
pub struct EllipseConverter;

/// Renders an ellipse as an ellipsoid centered at the (possibly elevated)
/// ellipse center, with the vertical radius matching the semi-minor axis.
pub struct EllipsoidConverter;

const BOUNDARY_SEGMENTS: usize = 64;

pub(crate) fn valid_ellipse(ellipse: &Ellipse) -> bool {
    ellipse.center.is_finite()
        && ellipse.semi_major_m.is_finite()
        && ellipse.semi_minor_m.is_finite()
        && ellipse.rotation_rad.is_finite()
        && ellipse.semi_major_m > 0.0
        && ellipse.semi_minor_m > 0.0
}

fn ellipsoid_color(style: &VectorStyle) -> [f32; 4] {
    if let Some(fill) = &style.fill {
        return fill.color;
    }
    if let Some(stroke) = &style.stroke {
        return stroke.color;
    }
    [1.0, 1.0, 1.0, 1.0]
}

fn build_ellipsoid(ellipse: &Ellipse, style: &VectorStyle) -> Primitive {
    Primitive::Ellipsoid(EllipsoidPrimitive {
        center: ellipse.center,
        radii: Vec3::new(ellipse.semi_major_m, ellipse.semi_minor_m, ellipse.semi_minor_m),
        rotation_rad: ellipse.rotation_rad,
        color: ellipsoid_color(style),
    })
}

/// Samples the ellipse boundary into a ring in map units; semi-axes arrive
/// in meters and are scaled through the context projection.
pub(crate) fn boundary_ring(ellipse: &Ellipse, projection: Projection) -> Vec<Vec3> {
    let meters_per_unit = projection.meters_per_unit();
    let a = ellipse.semi_major_m / meters_per_unit;
    let b = ellipse.semi_minor_m / meters_per_unit;
    let (sin_r, cos_r) = ellipse.rotation_rad.sin_cos();

    let mut ring = Vec::with_capacity(BOUNDARY_SEGMENTS);
    for i in 0..BOUNDARY_SEGMENTS {
        let t = std::f64::consts::TAU * i as f64 / BOUNDARY_SEGMENTS as f64;
        let x = a * t.cos();
        let y = b * t.sin();
        ring.push(Vec3::new(
            ellipse.center.x + x * cos_r - y * sin_r,
            ellipse.center.y + x * sin_r + y * cos_r,
            ellipse.center.z,
        ));
    }
    ring
}

/// The flat rendering of an ellipse is an ordinary polygon under the same
/// geometry id, so the polygon converter's bookkeeping lines up with the
/// ellipse's record.
fn flat_geometry(geometry: &Geometry, ellipse: &Ellipse, projection: Projection) -> Geometry {
    Geometry::new(geometry.id(), Shape::Polygon {
        rings: vec![boundary_ring(ellipse, projection)],
    })
}

impl GeometryConverter for EllipsoidConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::Ellipse(ellipse) = geometry.shape() else {
            return false;
        };
        if !valid_ellipse(ellipse) {
            return false;
        }
        ctx.add_primitive(build_ellipsoid(ellipse, style), feature.id(), geometry.id());
        true
    }

    /// Center, radii and rotation are baked into the ellipsoid mesh; only
    /// the color mutates in place.
    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::Ellipse(ellipse) = geometry.shape() else {
            return false;
        };
        if !valid_ellipse(ellipse) {
            return false;
        }
        let [handle] = handles else {
            return false;
        };
        let Primitive::Ellipsoid(expected) = build_ellipsoid(ellipse, style) else {
            return false;
        };
        let Some(Primitive::Ellipsoid(current)) = ctx.primitive_mut(*handle) else {
            return false;
        };
        if current.center != expected.center
            || current.radii != expected.radii
            || current.rotation_rad != expected.rotation_rad
        {
            return false;
        }
        current.color = expected.color;
        true
    }
}

impl GeometryConverter for EllipseConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::Ellipse(ellipse) = geometry.shape() else {
            return false;
        };
        let ellipse = *ellipse;
        if !valid_ellipse(&ellipse) {
            return false;
        }

        let created = if ctx.config().show_ellipsoids {
            ELLIPSOID.create(feature, geometry, style, ctx)
        } else {
            let flat = flat_geometry(geometry, &ellipse, ctx.projection());
            POLYGON.create(feature, &flat, style, ctx)
        };
        if created {
            sync_ground_reference(feature, geometry.id(), &ellipse, style, ctx);
        }
        created
    }

    fn update(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::Ellipse(ellipse) = geometry.shape() else {
            return false;
        };
        let ellipse = *ellipse;
        if !valid_ellipse(&ellipse) {
            return false;
        }

        let updated = if ctx.config().show_ellipsoids {
            ELLIPSOID.update(feature, geometry, style, ctx, handles)
        } else {
            let flat = flat_geometry(geometry, &ellipse, ctx.projection());
            POLYGON.update(feature, &flat, style, ctx, handles)
        };
        if updated {
            sync_ground_reference(feature, geometry.id(), &ellipse, style, ctx);
        }
        updated
    }

    // The default delete already removes the derived ground-reference
    // record along with the ellipse's own primitives. The geometry cached
    // on the feature stays: a rebuild pass (delete then create) must not
    // churn it, and feature removal clears it separately.
}
