use layers::VectorStyle;
use scene::{Feature, Geometry, GeometryKind};

use crate::converter::GeometryConverter;
use crate::converters::{
    DynamicLineStringConverter, DynamicPointConverter, EllipseConverter, EllipsoidConverter,
    GeometryCollectionConverter, LabelConverter, LineStringConverter, MultiLineStringConverter,
    MultiPointConverter, MultiPolygonConverter, PointConverter, PolygonConverter,
};

static POINT: PointConverter = PointConverter;
static LINE_STRING: LineStringConverter = LineStringConverter;
pub(crate) static POLYGON: PolygonConverter = PolygonConverter;
static MULTI_POINT: MultiPointConverter = MultiPointConverter;
static MULTI_LINE_STRING: MultiLineStringConverter = MultiLineStringConverter;
static MULTI_POLYGON: MultiPolygonConverter = MultiPolygonConverter;
static LABEL: LabelConverter = LabelConverter;
static ELLIPSE: EllipseConverter = EllipseConverter;
pub(crate) static ELLIPSOID: EllipsoidConverter = EllipsoidConverter;
static DYNAMIC_POINT: DynamicPointConverter = DynamicPointConverter;
pub(crate) static DYNAMIC_LINE_STRING: DynamicLineStringConverter = DynamicLineStringConverter;
static COLLECTION: GeometryCollectionConverter = GeometryCollectionConverter::new(converter_for);

/// Selects the converter for a (feature, geometry, style) triple.
///
/// The precedence is a hard contract: a requested label wins over
/// everything, the dynamic path wins over the per-kind table for dynamic
/// features, and ellipses take their decorator before the static lookup.
/// `None` means the kind has no 3D rendering; the caller no-ops.
pub fn converter_for(
    feature: &Feature,
    geometry: &Geometry,
    style: &VectorStyle,
) -> Option<&'static dyn GeometryConverter> {
    if style.text.is_some() {
        return Some(&LABEL);
    }

    let kind = geometry.kind();
    if feature.is_dynamic() && kind.supports_dynamic() {
        return dynamic_converter(kind);
    }
    if kind == GeometryKind::Ellipse {
        return Some(&ELLIPSE);
    }
    static_converter(kind)
}

fn dynamic_converter(kind: GeometryKind) -> Option<&'static dyn GeometryConverter> {
    match kind {
        GeometryKind::Point => Some(&DYNAMIC_POINT),
        GeometryKind::LineString => Some(&DYNAMIC_LINE_STRING),
        _ => None,
    }
}

fn static_converter(kind: GeometryKind) -> Option<&'static dyn GeometryConverter> {
    match kind {
        GeometryKind::Point => Some(&POINT),
        GeometryKind::LineString => Some(&LINE_STRING),
        GeometryKind::Polygon => Some(&POLYGON),
        GeometryKind::MultiPoint => Some(&MULTI_POINT),
        GeometryKind::MultiLineString => Some(&MULTI_LINE_STRING),
        GeometryKind::MultiPolygon => Some(&MULTI_POLYGON),
        GeometryKind::Collection => Some(&COLLECTION),
        GeometryKind::Ellipse => Some(&ELLIPSE),
    }
}

#[cfg(test)]
mod tests {
    use super::converter_for;
    use crate::context::VectorContext;
    use crate::converter::GeometryConverter;
    use foundation::ids::{FeatureId, GeometryId};
    use foundation::math::{Projection, Vec3};
    use layers::{LayerId, TextStyle, VectorLayerConfig, VectorStyle};
    use scene::{Feature, Geometry, GeometryKind, Primitive, Shape};

    fn context() -> VectorContext {
        VectorContext::new(
            LayerId(1),
            Projection::Geographic,
            VectorLayerConfig::default(),
        )
    }

    fn line() -> Geometry {
        Geometry::new(GeometryId(1), Shape::LineString {
            vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)],
        })
    }

    #[test]
    fn every_dynamic_capable_kind_has_a_dynamic_converter() {
        for kind in [
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
            GeometryKind::Collection,
            GeometryKind::Ellipse,
        ] {
            assert_eq!(
                super::dynamic_converter(kind).is_some(),
                kind.supports_dynamic()
            );
        }
    }

    #[test]
    fn label_takes_precedence_over_dynamic_and_static() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let geometry = line();
        let mut style = VectorStyle::default();
        style.text = Some(TextStyle::new("Track 12"));

        let converter = converter_for(&feature, &geometry, &style).expect("converter");
        assert!(converter.create(&mut feature, &geometry, &style, &mut ctx));

        let record = ctx.record(feature.id(), geometry.id()).expect("record");
        assert!(matches!(
            ctx.primitive(record.handles[0]),
            Some(Primitive::Label(_))
        ));
    }

    #[test]
    fn dynamic_features_take_the_dynamic_path() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let geometry = line();
        let style = VectorStyle::default();

        let converter = converter_for(&feature, &geometry, &style).expect("converter");
        assert!(converter.create(&mut feature, &geometry, &style, &mut ctx));
        let record = ctx.record(feature.id(), geometry.id()).expect("record");
        let handles = record.handles.clone();

        // The dynamic line path accepts a width change in place; the
        // static path would reject it.
        let mut restyled = style.clone();
        restyled.stroke.as_mut().unwrap().width_px = 7.0;
        assert!(converter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));
    }

    #[test]
    fn dynamic_flag_without_dynamic_support_falls_back_to_static() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        feature.set_dynamic(true);
        let geometry = Geometry::new(GeometryId(1), Shape::MultiLineString {
            lines: vec![vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 0.0)]],
        });
        let style = VectorStyle::default();

        let converter = converter_for(&feature, &geometry, &style).expect("converter");
        assert!(converter.create(&mut feature, &geometry, &style, &mut ctx));
        let handles = ctx
            .record(feature.id(), geometry.id())
            .expect("record")
            .handles
            .clone();

        let mut restyled = style.clone();
        restyled.stroke.as_mut().unwrap().width_px = 7.0;
        assert!(!converter.update(&mut feature, &geometry, &restyled, &mut ctx, &handles));
    }

    #[test]
    fn ellipses_route_to_the_ellipse_decorator() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = Geometry::new(GeometryId(1), Shape::Ellipse(scene::Ellipse {
            center: Vec3::new(0.0, 0.0, 0.0),
            semi_major_m: 2000.0,
            semi_minor_m: 1000.0,
            rotation_rad: 0.0,
        }));
        let style = VectorStyle::default();

        let converter = converter_for(&feature, &geometry, &style).expect("converter");
        assert!(converter.create(&mut feature, &geometry, &style, &mut ctx));
        let record = ctx.record(feature.id(), geometry.id()).expect("record");
        // Flat mode by default: the ellipse renders as a boundary
        // polyline, not a billboard or ellipsoid.
        assert!(matches!(
            ctx.primitive(record.handles[0]),
            Some(Primitive::Polyline(_))
        ));
    }
}
