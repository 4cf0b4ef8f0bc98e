use layers::VectorStyle;
use scene::{Feature, Geometry};
use tracing::debug;

use crate::context::VectorContext;
use crate::dispatch::converter_for;

/// What one sync pass did for a (feature, geometry) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No primitives existed; they were created.
    Created,
    /// Existing primitives were restyled in place.
    Updated,
    /// The in-place update was rejected; primitives were deleted and
    /// recreated.
    Rebuilt,
    /// Nothing was dirty; the pass was a no-op.
    Unchanged,
    /// No converter is registered for the geometry kind.
    Unsupported,
    /// Create (or the create half of a rebuild) produced nothing; the
    /// pair holds no primitives.
    Failed,
}

/// Runs the per-pair state machine: create when absent, skip when clean,
/// update when dirty, rebuild when the update rejects.
///
/// A pair counts as dirty when the synchronizer flagged it or when the
/// geometry's revision drifted from the one the primitives were built
/// against (the shape was replaced wholesale). Requests are handled one at
/// a time in call order; nothing is batched or reordered here.
pub fn sync_geometry(
    feature: &mut Feature,
    geometry: &Geometry,
    style: &VectorStyle,
    ctx: &mut VectorContext,
) -> SyncOutcome {
    let Some(converter) = converter_for(feature, geometry, style) else {
        debug!(
            feature = feature.id().0,
            kind = ?geometry.kind(),
            "no 3d converter registered; geometry not rendered"
        );
        return SyncOutcome::Unsupported;
    };

    let Some(handles) = converter.retrieve(feature, geometry, ctx) else {
        return if converter.create(feature, geometry, style, ctx) {
            ctx.mark_synced(feature.id(), geometry.id(), geometry.revision());
            SyncOutcome::Created
        } else {
            debug!(
                feature = feature.id().0,
                kind = ?geometry.kind(),
                "create produced no primitives"
            );
            SyncOutcome::Failed
        };
    };

    let Some(record) = ctx.record(feature.id(), geometry.id()) else {
        return SyncOutcome::Failed;
    };
    let dirty = record.dirty || record.geometry_revision != geometry.revision();
    if !dirty {
        return SyncOutcome::Unchanged;
    }

    if converter.update(feature, geometry, style, ctx, &handles) {
        ctx.mark_synced(feature.id(), geometry.id(), geometry.revision());
        return SyncOutcome::Updated;
    }

    converter.delete(feature, geometry, ctx);
    if converter.create(feature, geometry, style, ctx) {
        ctx.mark_synced(feature.id(), geometry.id(), geometry.revision());
        SyncOutcome::Rebuilt
    } else {
        debug!(
            feature = feature.id().0,
            kind = ?geometry.kind(),
            "rebuild produced no primitives; pair is now absent"
        );
        SyncOutcome::Failed
    }
}

/// The Removed terminal state for one geometry: primitives and index
/// entries are released through the pair's converter.
pub fn remove_geometry(
    feature: &mut Feature,
    geometry: &Geometry,
    style: &VectorStyle,
    ctx: &mut VectorContext,
) -> bool {
    match converter_for(feature, geometry, style) {
        Some(converter) => converter.delete(feature, geometry, ctx),
        None => ctx.remove_geometry_tree(feature.id(), geometry.id()) > 0,
    }
}

/// The Removed terminal state for a whole feature, including records from
/// collection expansion and derived geometries. Returns the number of
/// primitives released.
pub fn remove_feature(feature: &mut Feature, ctx: &mut VectorContext) -> usize {
    feature.set_ground_reference(None);
    ctx.remove_feature(feature.id())
}
