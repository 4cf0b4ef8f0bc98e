use foundation::math::Vec3;

/// What a billboard renders at its anchor point.
#[derive(Debug, Clone, PartialEq)]
pub enum BillboardImage {
    /// A filled disc of the billboard's radius.
    Disc,
    /// A textured icon; the renderer resolves `src`.
    Icon { src: String },
}

/// Line drawable. Width and dash are baked into the vertex buffer when the
/// polyline is built; only the color is a mutable attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    pub positions: Vec<Vec3>,
    pub color: [f32; 4],
    pub width_px: f32,
    pub dash: Option<Vec<f32>>,
}

/// Filled-area drawable: a flat triangle list (3 vertices per triangle)
/// in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPrimitive {
    pub triangles: Vec<Vec3>,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillboardPrimitive {
    pub position: Vec3,
    pub radius_px: f32,
    pub color: [f32; 4],
    pub image: BillboardImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPrimitive {
    pub position: Vec3,
    pub text: String,
    pub font_size_px: f32,
    pub color: [f32; 4],
    pub halo_color: [f32; 4],
    pub halo_width_px: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipsoidPrimitive {
    pub center: Vec3,
    pub radii: Vec3,
    pub rotation_rad: f64,
    pub color: [f32; 4],
}

/// A GPU-resident drawable owned by exactly one converter invocation for
/// one (feature, geometry) pair. Opaque to everything but the converters
/// and the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polyline(PolylinePrimitive),
    Mesh(MeshPrimitive),
    Billboard(BillboardPrimitive),
    Label(LabelPrimitive),
    Ellipsoid(EllipsoidPrimitive),
}
