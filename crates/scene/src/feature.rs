use foundation::ids::FeatureId;

use crate::geometry::Geometry;

/// A record in the collaborator data layer, seen from the sync core.
///
/// The core never creates or destroys features; it only reacts to the
/// feature/geometry pairs the synchronizer hands it. The one piece of state
/// it does maintain here is the cached ground-reference geometry an ellipse
/// feature carries while its vertical reference line is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    dynamic: bool,
    ground_reference: Option<Geometry>,
}

impl Feature {
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            dynamic: false,
            ground_reference: None,
        }
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Marks the feature as continuously animated (e.g. a moving track).
    /// Dynamic features route to converters that favor in-place updates.
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn ground_reference(&self) -> Option<&Geometry> {
        self.ground_reference.as_ref()
    }

    pub fn ground_reference_mut(&mut self) -> Option<&mut Geometry> {
        self.ground_reference.as_mut()
    }

    pub fn set_ground_reference(&mut self, geometry: Option<Geometry>) {
        self.ground_reference = geometry;
    }
}

#[cfg(test)]
mod tests {
    use super::Feature;
    use foundation::ids::FeatureId;

    #[test]
    fn features_start_static_with_no_ground_reference() {
        let feature = Feature::new(FeatureId(7));
        assert!(!feature.is_dynamic());
        assert!(feature.ground_reference().is_none());
    }
}
