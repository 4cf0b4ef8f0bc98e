/// Stable identity of a feature, assigned by the owning data layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u64);

/// Stable identity of a geometry within a layer.
///
/// The high bit is reserved for geometries derived internally from a caller
/// geometry (ground references); caller-assigned ids must leave it clear.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(pub u64);

const DERIVED_BIT: u64 = 1 << 63;

impl GeometryId {
    pub fn derived(self) -> GeometryId {
        GeometryId(self.0 | DERIVED_BIT)
    }

    pub fn is_derived(self) -> bool {
        self.0 & DERIVED_BIT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryId;

    #[test]
    fn derived_ids_live_in_their_own_space() {
        let id = GeometryId(42);
        assert!(!id.is_derived());

        let derived = id.derived();
        assert!(derived.is_derived());
        assert_ne!(id, derived);
        // Deriving is idempotent.
        assert_eq!(derived.derived(), derived);
    }
}
