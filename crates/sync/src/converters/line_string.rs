use foundation::math::Vec3;
use layers::{Stroke, VectorStyle};
use scene::{Feature, Geometry, PolylinePrimitive, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::converters::{apply_colors, rebuild_required};

pub struct LineStringConverter;

pub(crate) fn build_polyline(vertices: &[Vec3], stroke: &Stroke) -> Option<Primitive> {
    if vertices.len() < 2 {
        return None;
    }
    if vertices.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Primitive::Polyline(PolylinePrimitive {
        positions: vertices.to_vec(),
        color: stroke.color,
        width_px: stroke.width_px,
        dash: stroke.dash.clone(),
    }))
}

impl GeometryConverter for LineStringConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::LineString { vertices } = geometry.shape() else {
            return false;
        };
        let Some(stroke) = style.stroke.as_ref() else {
            return false;
        };
        let Some(primitive) = build_polyline(vertices, stroke) else {
            return false;
        };
        ctx.add_primitive(primitive, feature.id(), geometry.id());
        true
    }

    /// Stroke width and dash are encoded in the polyline's vertex buffer
    /// at build time, so changing either (or the vertices themselves)
    /// rejects; a color change alone mutates in place.
    fn update(
        &self,
        _feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::LineString { vertices } = geometry.shape() else {
            return false;
        };
        let Some(stroke) = style.stroke.as_ref() else {
            return false;
        };
        let Some(expected) = build_polyline(vertices, stroke) else {
            return false;
        };
        let expected = [expected];
        if rebuild_required(ctx, handles, &expected) {
            return false;
        }
        apply_colors(ctx, handles, &expected);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::LineStringConverter;
    use crate::context::VectorContext;
    use crate::converter::GeometryConverter;
    use foundation::ids::{FeatureId, GeometryId};
    use foundation::math::{Projection, Vec3};
    use layers::{LayerId, VectorLayerConfig, VectorStyle};
    use scene::{Feature, Geometry, Primitive, Shape};

    fn context() -> VectorContext {
        VectorContext::new(
            LayerId(1),
            Projection::Geographic,
            VectorLayerConfig::default(),
        )
    }

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::new(GeometryId(1), Shape::LineString {
            vertices: points
                .iter()
                .map(|(x, y)| Vec3::new(*x, *y, 0.0))
                .collect(),
        })
    }

    #[test]
    fn create_then_delete_restores_collection_size() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let style = VectorStyle::default();

        assert!(LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        assert_eq!(ctx.primitive_count(), 1);
        assert!(LineStringConverter.delete(&mut feature, &geometry, &mut ctx));
        assert_eq!(ctx.primitive_count(), 0);
    }

    #[test]
    fn single_vertex_is_degenerate() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = line(&[(0.0, 0.0)]);
        let style = VectorStyle::default();

        assert!(!LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        assert_eq!(ctx.primitive_count(), 0);
    }

    #[test]
    fn color_change_applies_in_place() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let style = VectorStyle::default();

        assert!(LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = LineStringConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        let mut restyled = style.clone();
        restyled.stroke.as_mut().unwrap().color = [0.0, 0.0, 1.0, 1.0];
        assert!(LineStringConverter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));

        let Some(Primitive::Polyline(polyline)) = ctx.primitive(handles[0]) else {
            panic!("expected a polyline");
        };
        assert_eq!(polyline.color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn width_change_requests_a_rebuild() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let style = VectorStyle::default();

        assert!(LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = LineStringConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        let mut restyled = style.clone();
        restyled.stroke.as_mut().unwrap().width_px = 3.0;
        assert!(!LineStringConverter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));
    }

    #[test]
    fn dash_change_requests_a_rebuild() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let style = VectorStyle::default();

        assert!(LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = LineStringConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        let mut restyled = style.clone();
        restyled.stroke.as_mut().unwrap().dash = Some(vec![8.0, 4.0]);
        assert!(!LineStringConverter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));
    }

    #[test]
    fn replaced_vertices_request_a_rebuild() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let mut geometry = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let style = VectorStyle::default();

        assert!(LineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = LineStringConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        geometry.set_shape(Shape::LineString {
            vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 0.0)],
        });
        assert!(!LineStringConverter.update(&mut feature, &geometry, &style, &mut ctx, &handles));
    }
}
