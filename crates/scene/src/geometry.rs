use foundation::ids::GeometryId;
use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Collection,
    Ellipse,
}

impl GeometryKind {
    /// Whether a dynamic (continuously animated) rendering path exists for
    /// this kind. Orthogonal to the kind itself; dispatch consults this
    /// before the per-kind converter tables.
    pub fn supports_dynamic(self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::LineString)
    }
}

/// An ellipse on the map: center in map units (z is height above ground in
/// scene units), semi-axes in meters, rotation in radians from east,
/// counterclockwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Vec3,
    pub semi_major_m: f64,
    pub semi_minor_m: f64,
    pub rotation_rad: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point { position: Vec3 },
    LineString { vertices: Vec<Vec3> },
    Polygon { rings: Vec<Vec<Vec3>> },
    MultiPoint { positions: Vec<Vec3> },
    MultiLineString { lines: Vec<Vec<Vec3>> },
    MultiPolygon { polygons: Vec<Vec<Vec<Vec3>>> },
    Collection { children: Vec<Geometry> },
    Ellipse(Ellipse),
}

impl Shape {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Point { .. } => GeometryKind::Point,
            Shape::LineString { .. } => GeometryKind::LineString,
            Shape::Polygon { .. } => GeometryKind::Polygon,
            Shape::MultiPoint { .. } => GeometryKind::MultiPoint,
            Shape::MultiLineString { .. } => GeometryKind::MultiLineString,
            Shape::MultiPolygon { .. } => GeometryKind::MultiPolygon,
            Shape::Collection { .. } => GeometryKind::Collection,
            Shape::Ellipse(_) => GeometryKind::Ellipse,
        }
    }
}

/// Identified shape data with a revision counter.
///
/// Coordinates are never mutated in place: the owner replaces the shape
/// wholesale through `set_shape`, which bumps the revision. The sync layer
/// compares revisions to detect replaced coordinates between passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    id: GeometryId,
    revision: u64,
    shape: Shape,
}

impl Geometry {
    pub fn new(id: GeometryId, shape: Shape) -> Self {
        Self {
            id,
            revision: 0,
            shape,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn kind(&self) -> GeometryKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.revision += 1;
    }
}
