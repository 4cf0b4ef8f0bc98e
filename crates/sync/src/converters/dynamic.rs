use layers::VectorStyle;
use scene::{Feature, Geometry, Primitive, PrimitiveHandle, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::converters::line_string::build_polyline;
use crate::converters::point::{billboard_apply, build_billboard};

/// Converters for continuously animated geometry (tracks). They produce
/// the same primitives as their static counterparts but route every change
/// through attribute mutation, so a moving feature never pays for a
/// rebuild per frame.
pub struct DynamicPointConverter;
pub struct DynamicLineStringConverter;

impl GeometryConverter for DynamicPointConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::Point { position } = geometry.shape() else {
            return false;
        };
        let Some(primitive) = build_billboard(*position, style) else {
            return false;
        };
        ctx.add_primitive(primitive, feature.id(), geometry.id());
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
        let Shape::Point { position } = geometry.shape() else {
            return false;
        };
        if !position.is_finite() {
            return false;
        }
        let [handle] = handles else {
            return false;
        };
        let Some(primitive) = ctx.primitive_mut(*handle) else {
            return false;
        };
        if !matches!(primitive, Primitive::Billboard(_)) {
            return false;
        }
        // Unlike the static path, an icon/disc switch is applied in place.
        billboard_apply(primitive, *position, style);
        true
    }
}

impl GeometryConverter for DynamicLineStringConverter {
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

    /// The dynamic polyline path keeps width and dash as mutable
    /// attributes, so restyles and vertex replacement never reject.
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
        if vertices.len() < 2 || vertices.iter().any(|v| !v.is_finite()) {
            return false;
        }
        let [handle] = handles else {
            return false;
        };
        let Some(Primitive::Polyline(polyline)) = ctx.primitive_mut(*handle) else {
            return false;
        };

        polyline.positions = vertices.clone();
        polyline.color = stroke.color;
        polyline.width_px = stroke.width_px;
        polyline.dash = stroke.dash.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DynamicLineStringConverter, DynamicPointConverter};
    use crate::context::VectorContext;
    use crate::converter::GeometryConverter;
    use foundation::ids::{FeatureId, GeometryId};
    use foundation::math::{Projection, Vec3};
    use layers::{LayerId, Marker, MarkerShape, VectorLayerConfig, VectorStyle};
    use scene::{Feature, Geometry, Primitive, Shape};

    fn context() -> VectorContext {
        VectorContext::new(
            LayerId(1),
            Projection::Geographic,
            VectorLayerConfig::default(),
        )
    }

    #[test]
    fn width_and_dash_changes_apply_in_place() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let geometry = Geometry::new(GeometryId(1), Shape::LineString {
            vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)],
        });
        let style = VectorStyle::default();

        assert!(DynamicLineStringConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = DynamicLineStringConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        let mut restyled = style.clone();
        {
            let stroke = restyled.stroke.as_mut().unwrap();
            stroke.width_px = 6.0;
            stroke.dash = Some(vec![4.0, 2.0]);
        }
        assert!(DynamicLineStringConverter.update(
            &mut feature,
            &geometry,
            &restyled,
            &mut ctx,
            &handles
        ));

        let Some(Primitive::Polyline(polyline)) = ctx.primitive(handles[0]) else {
            panic!("expected a polyline");
        };
        assert_eq!(polyline.width_px, 6.0);
        assert_eq!(polyline.dash, Some(vec![4.0, 2.0]));
    }

    #[test]
    fn moving_track_head_keeps_the_same_primitive() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let mut geometry = Geometry::new(GeometryId(1), Shape::Point {
            position: Vec3::new(0.0, 0.0, 0.0),
        });
        let style = VectorStyle::default();

        assert!(DynamicPointConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = DynamicPointConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        geometry.set_shape(Shape::Point {
            position: Vec3::new(1.0, 1.0, 0.0),
        });
        assert!(DynamicPointConverter.update(&mut feature, &geometry, &style, &mut ctx, &handles));

        let Some(Primitive::Billboard(billboard)) = ctx.primitive(handles[0]) else {
            panic!("expected a billboard");
        };
        assert_eq!(billboard.position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn dynamic_marker_kind_switch_applies_in_place() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let geometry = Geometry::new(GeometryId(1), Shape::Point {
            position: Vec3::new(0.0, 0.0, 0.0),
        });
        let style = VectorStyle::default();

        assert!(DynamicPointConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = DynamicPointConverter
            .retrieve(&feature, &geometry, &ctx)
            .expect("handles");

        let mut restyled = style.clone();
        restyled.marker = Some(Marker {
            shape: MarkerShape::Icon {
                src: "track.png".into(),
            },
            radius_px: 4.0,
            color: [1.0, 1.0, 0.0, 1.0],
        });
        assert!(DynamicPointConverter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));
    }
}
