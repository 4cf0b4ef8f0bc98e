use foundation::ids::GeometryId;
use foundation::math::Vec3;
use layers::{Stroke, VectorStyle};
use scene::{Ellipse, Feature, Geometry, Shape};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;
use crate::dispatch::DYNAMIC_LINE_STRING;

/// Center moves at or below this distance (per axis, map units) keep the
/// cached ground-reference geometry untouched.
pub const GROUND_REFERENCE_EPSILON: f64 = 1e-9;

/// Keeps an elevated ellipse's vertical reference line in step with its
/// center.
///
/// The derived line runs from the center to its ground projection and is
/// cached on the feature under the ellipse's derived geometry id. Height
/// changes continuously while a track climbs, so the line is synchronized
/// through the dynamic line-string converter in both rendering modes.
pub(crate) fn sync_ground_reference(
    feature: &mut Feature,
    ellipse_geometry: GeometryId,
    ellipse: &Ellipse,
    style: &VectorStyle,
    ctx: &mut VectorContext,
) {
    let derived = ellipse_geometry.derived();
    let wanted = ctx.config().show_ground_reference && ellipse.center.z != 0.0;
    if !wanted {
        ctx.remove_geometry_tree(feature.id(), derived);
        feature.set_ground_reference(None);
        return;
    }

    let top = ellipse.center;
    let bottom = Vec3::new(top.x, top.y, 0.0);

    let reusable = matches!(
        feature.ground_reference(),
        Some(cached) if cached.id() == derived
    );
    let stale = match feature.ground_reference() {
        Some(cached) => !reusable || moved_beyond_epsilon(cached, top),
        None => true,
    };
    if stale {
        let vertices = vec![top, bottom];
        if reusable {
            if let Some(cached) = feature.ground_reference_mut() {
                cached.set_shape(Shape::LineString { vertices });
            }
        } else {
            feature.set_ground_reference(Some(Geometry::new(derived, Shape::LineString {
                vertices,
            })));
        }
    }

    let Some(line) = feature.ground_reference().cloned() else {
        return;
    };
    let line_style = ground_reference_style(style);
    let existing = ctx
        .record(feature.id(), derived)
        .map(|record| record.handles.clone());
    match existing {
        Some(handles) => {
            if !DYNAMIC_LINE_STRING.update(feature, &line, &line_style, ctx, &handles) {
                ctx.remove_geometry_tree(feature.id(), derived);
                DYNAMIC_LINE_STRING.create(feature, &line, &line_style, ctx);
            }
        }
        None => {
            DYNAMIC_LINE_STRING.create(feature, &line, &line_style, ctx);
        }
    }
}

fn moved_beyond_epsilon(cached: &Geometry, top: Vec3) -> bool {
    let Shape::LineString { vertices } = cached.shape() else {
        return true;
    };
    let Some(first) = vertices.first() else {
        return true;
    };
    (first.x - top.x).abs() > GROUND_REFERENCE_EPSILON
        || (first.y - top.y).abs() > GROUND_REFERENCE_EPSILON
        || (first.z - top.z).abs() > GROUND_REFERENCE_EPSILON
}

fn ground_reference_style(style: &VectorStyle) -> VectorStyle {
    VectorStyle {
        stroke: Some(style.stroke.clone().unwrap_or_else(|| Stroke {
            width_px: 1.0,
            ..Stroke::default()
        })),
        fill: None,
        marker: None,
        text: None,
    }
}

#[cfg(test)]
mod tests {
    use crate::context::VectorContext;
    use crate::converter::GeometryConverter;
    use crate::converters::EllipseConverter;
    use foundation::ids::{FeatureId, GeometryId};
    use foundation::math::{Projection, Vec3};
    use layers::{LayerId, VectorLayerConfig, VectorStyle};
    use scene::{Ellipse, Feature, Geometry, Shape};

    fn context() -> VectorContext {
        VectorContext::new(LayerId(1), Projection::Geographic, VectorLayerConfig {
            show_ground_reference: true,
            ..VectorLayerConfig::default()
        })
    }

    fn ellipse_at(x: f64, y: f64, z: f64) -> Geometry {
        Geometry::new(GeometryId(1), Shape::Ellipse(Ellipse {
            center: Vec3::new(x, y, z),
            semi_major_m: 2000.0,
            semi_minor_m: 1000.0,
            rotation_rad: 0.0,
        }))
    }

    #[test]
    fn elevated_ellipse_gets_a_vertical_reference_line() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = ellipse_at(10.0, 20.0, 500.0);
        let style = VectorStyle::default();

        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));

        let cached = feature.ground_reference().expect("cached line");
        let Shape::LineString { vertices } = cached.shape() else {
            panic!("expected a line string");
        };
        assert_eq!(vertices[0], Vec3::new(10.0, 20.0, 500.0));
        assert_eq!(vertices[1], Vec3::new(10.0, 20.0, 0.0));
        assert!(
            ctx.record(feature.id(), GeometryId(1).derived())
                .is_some()
        );
    }

    #[test]
    fn ground_level_ellipse_gets_no_reference_line() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let geometry = ellipse_at(10.0, 20.0, 0.0);
        let style = VectorStyle::default();

        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));
        assert!(feature.ground_reference().is_none());
        assert_eq!(ctx.primitive_count(), 1);
    }

    #[test]
    fn sub_epsilon_moves_keep_the_cached_geometry() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let mut geometry = ellipse_at(10.0, 20.0, 500.0);
        let style = VectorStyle::default();

        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let revision_before = feature.ground_reference().unwrap().revision();

        geometry.set_shape(Shape::Ellipse(Ellipse {
            center: Vec3::new(10.0 + 5e-10, 20.0, 500.0),
            semi_major_m: 2000.0,
            semi_minor_m: 1000.0,
            rotation_rad: 0.0,
        }));
        // The flat boundary changed, so the ellipse pass rebuilds (delete
        // then create), but the cached reference geometry must not churn.
        EllipseConverter.delete(&mut feature, &geometry, &mut ctx);
        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));
        assert_eq!(
            feature.ground_reference().unwrap().revision(),
            revision_before
        );
    }

    #[test]
    fn larger_moves_refresh_the_cached_geometry() {
        let mut ctx = context();
        let mut feature = Feature::new(FeatureId(1));
        let mut geometry = ellipse_at(10.0, 20.0, 500.0);
        let style = VectorStyle::default();

        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));
        let revision_before = feature.ground_reference().unwrap().revision();

        geometry.set_shape(Shape::Ellipse(Ellipse {
            center: Vec3::new(11.0, 20.0, 500.0),
            semi_major_m: 2000.0,
            semi_minor_m: 1000.0,
            rotation_rad: 0.0,
        }));
        EllipseConverter.delete(&mut feature, &geometry, &mut ctx);
        assert!(EllipseConverter.create(&mut feature, &geometry, &style, &mut ctx));

        let cached = feature.ground_reference().expect("cached line");
        assert_ne!(cached.revision(), revision_before);
        let Shape::LineString { vertices } = cached.shape() else {
            panic!("expected a line string");
        };
        assert_eq!(vertices[0], Vec3::new(11.0, 20.0, 500.0));
        assert_eq!(vertices[1], Vec3::new(11.0, 20.0, 0.0));
    }
}
