use layers::VectorStyle;
use scene::{Feature, Geometry, PrimitiveHandle};

use crate::context::VectorContext;

/// Top-level converter selection, injectable where a converter needs to
/// recurse (geometry collections) without referring back to the dispatch
/// module.
pub type DispatchFn =
    fn(&Feature, &Geometry, &VectorStyle) -> Option<&'static dyn GeometryConverter>;

/// The create/retrieve/update/delete quartet for one geometry kind.
///
/// All four operate against the shared [`VectorContext`]; converters never
/// touch the scene collection behind its back. The normal operating path
/// is exception-free: degenerate input yields a `false` create, and a
/// `false` update asks the orchestrator for a rebuild rather than
/// signalling an error.
pub trait GeometryConverter {
    /// Builds the primitives for the pair and registers them. Atomic:
    /// primitives are fully built and validated before any is added, so a
    /// `false` result leaves the context untouched.
    fn create(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
    ) -> bool;

    /// Returns the handles previously created for the pair, or `None` if
    /// the pair has never been (successfully) converted.
    fn retrieve(
        &self,
        feature: &Feature,
        geometry: &Geometry,
        ctx: &VectorContext,
    ) -> Option<Vec<PrimitiveHandle>> {
        ctx.record(feature.id(), geometry.id())
            .map(|record| record.handles.clone())
    }

    /// Applies the style/geometry to the existing primitives in place
    /// where the change is compatible. `false` means "rebuild required".
    fn update(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        style: &VectorStyle,
        ctx: &mut VectorContext,
        handles: &[PrimitiveHandle],
    ) -> bool;

    /// Releases the pair's primitives and index entries.
    fn delete(
        &self,
        feature: &mut Feature,
        geometry: &Geometry,
        ctx: &mut VectorContext,
    ) -> bool {
        ctx.remove_geometry_tree(feature.id(), geometry.id()) > 0
    }
}
