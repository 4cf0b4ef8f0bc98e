use foundation::math::Vec3;
use layers::{MarkerShape, VectorStyle};
use scene::{
    BillboardImage, BillboardPrimitive, Feature, Geometry, Primitive, PrimitiveHandle, Shape,
};

use crate::context::VectorContext;
use crate::converter::GeometryConverter;

pub struct PointConverter;

pub(crate) fn build_billboard(position: Vec3, style: &VectorStyle) -> Option<Primitive> {
    if !position.is_finite() {
        return None;
    }
    let marker = style.marker.clone().unwrap_or_default();
    Some(Primitive::Billboard(BillboardPrimitive {
        position,
        radius_px: marker.radius_px,
        color: marker.color,
        image: billboard_image(&marker.shape),
    }))
}

fn billboard_image(shape: &MarkerShape) -> BillboardImage {
    match shape {
        MarkerShape::Circle => BillboardImage::Disc,
        MarkerShape::Icon { src } => BillboardImage::Icon { src: src.clone() },
    }
}

/// Whether the styled marker still renders through the same billboard
/// topology. A disc/icon switch needs a rebuild; everything else is a
/// mutable attribute.
pub(crate) fn billboard_kind_compatible(primitive: &Primitive, style: &VectorStyle) -> bool {
    let Primitive::Billboard(billboard) = primitive else {
        return false;
    };
    let marker = style.marker.clone().unwrap_or_default();
    matches!(
        (&billboard.image, &marker.shape),
        (BillboardImage::Disc, MarkerShape::Circle)
            | (BillboardImage::Icon { .. }, MarkerShape::Icon { .. })
    )
}

/// Applies position, radius, color and (within the same kind) the icon
/// texture in place.
pub(crate) fn billboard_apply(primitive: &mut Primitive, position: Vec3, style: &VectorStyle) {
    let Primitive::Billboard(billboard) = primitive else {
        return;
    };
    let marker = style.marker.clone().unwrap_or_default();
    billboard.position = position;
    billboard.radius_px = marker.radius_px;
    billboard.color = marker.color;
    billboard.image = billboard_image(&marker.shape);
}

impl GeometryConverter for PointConverter {
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
        let Some(primitive) = ctx.primitive(*handle) else {
            return false;
        };
        if !billboard_kind_compatible(primitive, style) {
            return false;
        }

        let Some(primitive) = ctx.primitive_mut(*handle) else {
            return false;
        };
        billboard_apply(primitive, *position, style);
        true
    }
}
