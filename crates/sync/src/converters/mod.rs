use scene::{Primitive, PrimitiveHandle};

use crate::context::VectorContext;

pub mod collection;
pub mod dynamic;
pub mod ellipse;
pub mod label;
pub mod line_string;
pub mod multi;
pub mod point;
pub mod polygon;

pub use collection::GeometryCollectionConverter;
pub use dynamic::{DynamicLineStringConverter, DynamicPointConverter};
pub use ellipse::{EllipseConverter, EllipsoidConverter};
pub use label::LabelConverter;
pub use line_string::LineStringConverter;
pub use multi::{MultiLineStringConverter, MultiPointConverter, MultiPolygonConverter};
pub use point::PointConverter;
pub use polygon::PolygonConverter;

/// Compares freshly built line/area primitives against the registered
/// ones on the attributes baked in at build time (everything but color).
/// Any mismatch, including a count change, means a rebuild.
pub(crate) fn rebuild_required(
    ctx: &VectorContext,
    handles: &[PrimitiveHandle],
    expected: &[Primitive],
) -> bool {
    if handles.len() != expected.len() {
        return true;
    }
    for (handle, expect) in handles.iter().zip(expected) {
        let Some(current) = ctx.primitive(*handle) else {
            return true;
        };
        match (current, expect) {
            (Primitive::Polyline(current), Primitive::Polyline(expect)) => {
                if current.width_px != expect.width_px
                    || current.dash != expect.dash
                    || current.positions != expect.positions
                {
                    return true;
                }
            }
            (Primitive::Mesh(current), Primitive::Mesh(expect)) => {
                if current.triangles != expect.triangles {
                    return true;
                }
            }
            _ => return true,
        }
    }
    false
}

/// Applies the color attributes of freshly built primitives to the
/// registered ones in place. Callers check `rebuild_required` first.
pub(crate) fn apply_colors(
    ctx: &mut VectorContext,
    handles: &[PrimitiveHandle],
    expected: &[Primitive],
) {
    for (handle, expect) in handles.iter().zip(expected) {
        let Some(current) = ctx.primitive_mut(*handle) else {
            continue;
        };
        match (current, expect) {
            (Primitive::Polyline(current), Primitive::Polyline(expect)) => {
                current.color = expect.color;
            }
            (Primitive::Mesh(current), Primitive::Mesh(expect)) => {
                current.color = expect.color;
            }
            _ => {}
        }
    }
}
