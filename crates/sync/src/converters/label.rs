use foundation::math::Vec3;
use layers::VectorStyle;
use scene::{Feature, Geometry, LabelPrimitive, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;

pub struct LabelConverter;

/// Where a label anchors for each shape: points at the point, lines at
/// their arc-length midpoint, areas at the outer-ring centroid; multis and
/// collections at their first usable constituent, ellipses at the center.
pub(crate) fn anchor_for_shape(shape: &Shape) -> Option<Vec3> {
    match shape {
        Shape::Point { position } => finite(*position),
        Shape::LineString { vertices } => line_midpoint(vertices),
        Shape::Polygon { rings } => area_centroid(rings),
        Shape::MultiPoint { positions } => positions.iter().copied().find_map(finite),
        Shape::MultiLineString { lines } => lines.iter().find_map(|l| line_midpoint(l)),
        Shape::MultiPolygon { polygons } => polygons.iter().find_map(|p| area_centroid(p)),
        Shape::Collection { children } => {
            children.iter().find_map(|c| anchor_for_shape(c.shape()))
        }
        Shape::Ellipse(ellipse) => finite(ellipse.center),
    }
}

fn finite(v: Vec3) -> Option<Vec3> {
    v.is_finite().then_some(v)
}

fn line_midpoint(vertices: &[Vec3]) -> Option<Vec3> {
    if vertices.len() < 2 {
        return vertices.first().copied().and_then(finite);
    }

    let mut total = 0.0;
    let mut segments: Vec<(Vec3, Vec3, f64)> = Vec::with_capacity(vertices.len() - 1);
    for pair in vertices.windows(2) {
        let len = (pair[1] - pair[0]).length();
        if !len.is_finite() || len <= 0.0 {
            continue;
        }
        total += len;
        segments.push((pair[0], pair[1], len));
    }
    if total <= 0.0 {
        return vertices.first().copied().and_then(finite);
    }

    let mut acc = 0.0;
    let target = total * 0.5;
    for (a, b, len) in segments {
        if acc + len >= target {
            let t = (target - acc) / len;
            return Some(a.lerp(b, t));
        }
        acc += len;
    }

    vertices.last().copied().and_then(finite)
}

fn area_centroid(rings: &[Vec<Vec3>]) -> Option<Vec3> {
    let outer = rings.first()?;
    let mut sum = Vec3::new(0.0, 0.0, 0.0);
    let mut count = 0.0_f64;
    for v in outer {
        if v.is_finite() {
            sum = sum + *v;
            count += 1.0;
        }
    }
    if count <= 0.0 {
        return None;
    }
    Some(sum.scale(1.0 / count))
}

impl GeometryConverter for LabelConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Some(text) = style.text.as_ref() else {
            return false;
        };
        if text.text.trim().is_empty() {
            return false;
        }
        let Some(position) = anchor_for_shape(geometry.shape()) else {
            return false;
        };

        ctx.add_primitive(
            Primitive::Label(LabelPrimitive {
                position,
                text: text.text.clone(),
                font_size_px: text.font_size_px,
                color: text.color,
                halo_color: text.halo_color,
                halo_width_px: text.halo_width_px,
            }),
            feature.id(),
            geometry.id(),
        );
        true
    }

    /// Text, font, colors, halo and the anchor are all mutable label
    /// attributes.
    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Some(text) = style.text.as_ref() else {
            return false;
        };
        if text.text.trim().is_empty() {
            return false;
        }
        let Some(position) = anchor_for_shape(geometry.shape()) else {
            return false;
        };
        let [handle] = handles else {
            return false;
        };
        let Some(Primitive::Label(label)) = ctx.primitive_mut(*handle) else {
            return false;
        };

        label.position = position;
        label.text = text.text.clone();
        label.font_size_px = text.font_size_px;
        label.color = text.color;
        label.halo_color = text.halo_color;
        label.halo_width_px = text.halo_width_px;
        true
    }
}
