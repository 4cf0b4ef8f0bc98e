use std::collections::BTreeSet;

use foundation::ids::GeometryId;
use layers::VectorStyle;
use scene::{Feature, Geometry, PrimitiveHandle, Shape};
use tracing::debug;

use crate::context::VectorContext;
use crate::converter::{DispatchFn, GeometryConverter};

/// Recursing converter for geometry collections. The top-level dispatch
/// function is injected at construction so this module never refers back
/// to the dispatch table that refers to it.
pub struct GeometryCollectionConverter {
    dispatch: DispatchFn,
}

impl GeometryCollectionConverter {
    pub const fn new(dispatch: DispatchFn) -> Self {
        Self { dispatch }
    }

    /// Child ids that currently have a converter under the given style.
    /// Children without one are skipped at create time and ignored when
    /// comparing against the registered set.
    fn convertible_children(
        &self,
        feature: &Feature,
        children: &[Geometry],
        style: &VectorStyle,
    ) -> BTreeSet<GeometryId> {
        children
            .iter()
            .filter(|child| (self.dispatch)(feature, child, style).is_some())
            .map(|child| child.id())
            .collect()
    }
}

impl GeometryConverter for GeometryCollectionConverter {
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool {
        let Shape::Collection { children } = geometry.shape() else {
            return false;
        };
        if children.is_empty() {
            return false;
        }

        let mut created: Vec<GeometryId> = Vec::new();
        for child in children {
            let Some(converter) = (self.dispatch)(feature, child, style) else {
                debug!(kind = ?child.kind(), "no 3d converter for collection child");
                continue;
            };
            if converter.create(feature, child, style, ctx) {
                created.push(child.id());
            }
        }
        if created.is_empty() {
            return false;
        }

        // The parent record carries no primitives of its own; it marks the
        // pair as present and remembers which children it expanded into.
        ctx.ensure_record(feature.id(), geometry.id());
        ctx.set_record_children(feature.id(), geometry.id(), created);
        true
    }

    /// Aggregates the child primitives registered under the parent
    /// feature.
    fn retrieve(
        &self,
        feature: &Feature,
        geometry: &Geometry,
        ctx: &VectorContext,
    ) -> Option<Vec<PrimitiveHandle>> {
        let record = ctx.record(feature.id(), geometry.id())?;
        let mut handles = record.handles.clone();
        for child in &record.children {
            if let Some(child_record) = ctx.record(feature.id(), *child) {
                handles.extend(child_record.handles.iter().copied());
            }
        }
        Some(handles)
    }

    fn update(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        _handles: &[PrimitiveHandle],
    ) -> bool {
        let Shape::Collection { children } = geometry.shape() else {
            return false;
        };
        let Some(record) = ctx.record(feature.id(), geometry.id()) else {
            return false;
        };

        // A changed child set means members came or went; rebuild the
        // whole expansion rather than patching it piecemeal.
        let registered: BTreeSet<GeometryId> = record.children.iter().copied().collect();
        if self.convertible_children(feature, children, style) != registered {
            return false;
        }

        for child in children {
            let Some(converter) = (self.dispatch)(feature, child, style) else {
                continue;
            };
            let Some(child_handles) = converter.retrieve(feature, child, ctx) else {
                return false;
            };
            if !converter.update(feature, child, style, ctx, &child_handles) {
                return false;
            }
        }
        true
    }
}
