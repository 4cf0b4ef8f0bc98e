use std::collections::BTreeMap;

use foundation::ids::{FeatureId, GeometryId};
use foundation::math::Projection;
use layers::{LayerId, VectorLayerConfig};
use scene::{Primitive, PrimitiveCollection, PrimitiveHandle, PrimitiveOwner};

/// Bookkeeping for the primitives one (feature, geometry) pair expanded
/// into.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrimitiveRecord {
    pub handles: Vec<PrimitiveHandle>,
    /// Set by the synchronizer when the pair needs a re-sync decision;
    /// cleared exactly once per successful create/update.
    pub dirty: bool,
    /// Geometry revision the primitives were last built/updated against.
    pub geometry_revision: u64,
    /// Child geometry ids a collection record expanded into. Recorded so
    /// deletion reaches descendants even after the source shape changed.
    pub children: Vec<GeometryId>,
}

/// Per-layer bridge between the vector data layer and the 3D scene.
///
/// Owns the scene's primitive collection for the layer and the ownership
/// index converters create/retrieve/delete through. All scene mutation
/// flows through these methods. Records are keyed in a `BTreeMap` for
/// stable traversal order.
///
/// Invariant: at most one record exists per (feature, geometry) pair;
/// replacing primitives always removes the old ones first.
#[derive(Debug)]
pub struct VectorContext {
    layer: LayerId,
    projection: Projection,
    config: VectorLayerConfig,
    primitives: PrimitiveCollection,
    records: BTreeMap<(FeatureId, GeometryId), PrimitiveRecord>,
}

impl VectorContext {
    pub fn new(layer: LayerId, projection: Projection, config: VectorLayerConfig) -> Self {
        Self {
            layer,
            projection,
            config,
            primitives: PrimitiveCollection::new(),
            records: BTreeMap::new(),
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn config(&self) -> &VectorLayerConfig {
        &self.config
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.primitives.get(handle)
    }

    pub fn primitive_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut Primitive> {
        self.primitives.get_mut(handle)
    }

    pub fn record(&self, feature: FeatureId, geometry: GeometryId) -> Option<&PrimitiveRecord> {
        self.records.get(&(feature, geometry))
    }

    /// Inserts into the scene collection and registers ownership under the
    /// (feature, geometry) pair, creating the record if absent.
    pub fn add_primitive(
        &mut self,
        primitive: Primitive,
        feature: FeatureId,
        geometry: GeometryId,
    ) -> PrimitiveHandle {
        let handle = self.primitives.add(
            primitive,
            PrimitiveOwner {
                feature,
                geometry,
            },
        );
        self.records
            .entry((feature, geometry))
            .or_default()
            .handles
            .push(handle);
        handle
    }

    /// Removes one primitive from the scene collection and from its
    /// owner's record. Empty leaf records are dropped.
    pub fn remove_primitive(&mut self, handle: PrimitiveHandle) -> bool {
        let Some(owner) = self.primitives.owner(handle) else {
            return false;
        };
        if self.primitives.remove(handle).is_none() {
            return false;
        }

        let key = (owner.feature, owner.geometry);
        if let Some(record) = self.records.get_mut(&key) {
            record.handles.retain(|h| *h != handle);
            if record.handles.is_empty() && record.children.is_empty() {
                self.records.remove(&key);
            }
        }
        true
    }

    pub(crate) fn ensure_record(&mut self, feature: FeatureId, geometry: GeometryId) {
        self.records.entry((feature, geometry)).or_default();
    }

    pub(crate) fn set_record_children(
        &mut self,
        feature: FeatureId,
        geometry: GeometryId,
        children: Vec<GeometryId>,
    ) {
        if let Some(record) = self.records.get_mut(&(feature, geometry)) {
            record.children = children;
        }
    }

    /// Flags a pair for a re-sync decision on the next orchestration pass.
    pub fn mark_dirty(&mut self, feature: FeatureId, geometry: GeometryId) -> bool {
        match self.records.get_mut(&(feature, geometry)) {
            Some(record) => {
                record.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_feature_dirty(&mut self, feature: FeatureId) {
        for (_, record) in self
            .records
            .range_mut((feature, GeometryId(0))..=(feature, GeometryId(u64::MAX)))
        {
            record.dirty = true;
        }
    }

    pub(crate) fn mark_synced(
        &mut self,
        feature: FeatureId,
        geometry: GeometryId,
        revision: u64,
    ) {
        if let Some(record) = self.records.get_mut(&(feature, geometry)) {
            record.dirty = false;
            record.geometry_revision = revision;
        }
    }

    /// Removes a record, its primitives, its derived sibling (the ground
    /// reference, if any) and, recursively, its recorded children.
    /// Returns the number of primitives released.
    pub fn remove_geometry_tree(&mut self, feature: FeatureId, geometry: GeometryId) -> usize {
        let mut removed = 0;

        if let Some(record) = self.records.remove(&(feature, geometry)) {
            for handle in record.handles {
                if self.primitives.remove(handle).is_some() {
                    removed += 1;
                }
            }
            for child in record.children {
                removed += self.remove_geometry_tree(feature, child);
            }
        }

        if !geometry.is_derived() {
            removed += self.remove_geometry_tree(feature, geometry.derived());
        }

        removed
    }

    /// Removes every record owned by the feature, including records from
    /// collection expansion and derived geometries. Returns the number of
    /// primitives released.
    pub fn remove_feature(&mut self, feature: FeatureId) -> usize {
        let geometries: Vec<GeometryId> = self
            .records
            .range((feature, GeometryId(0))..=(feature, GeometryId(u64::MAX)))
            .map(|((_, geometry), _)| *geometry)
            .collect();

        let mut removed = 0;
        for geometry in geometries {
            removed += self.remove_geometry_tree(feature, geometry);
        }
        removed
    }
}
