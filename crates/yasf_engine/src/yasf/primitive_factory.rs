//! Primitive factory
//!
//! Turns one leaf definition into one drawable, or into a light plus its
//! helper. The factory is a pure function of its arguments: it never looks at
//! the rest of the document and never caches.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::document::{ColorDef, Vec2Def, Vec3Def};
use super::error::CompileError;
use crate::foundation::math::{utils, Vec3, Vec4};
use crate::render::color::Color;
use crate::render::geometry::{
    BoxGeometry, CylinderGeometry, NurbsSurface, PlaneGeometry, PolygonGeometry, SphereGeometry, TriangleGeometry,
};
use crate::render::lighting::{self, Light, LightHelper, LightType, ShadowFrustum, ShadowSettings};
use crate::render::material::Material;
use crate::render::primitives::Mesh;
use crate::scene::MeshObject;

/// Leaf node types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Axis-aligned rectangle in the XY plane
    Rectangle,
    /// Single triangle
    Triangle,
    /// Axis-aligned box
    Box,
    /// Cylinder or truncated cone
    Cylinder,
    /// Sphere or spherical patch
    Sphere,
    /// Rational B-spline surface
    Nurbs,
    /// Vertex-colored disc
    Polygon,
    /// Point light
    PointLight,
    /// Spot light
    SpotLight,
    /// Directional light
    DirectionalLight,
}

impl PrimitiveKind {
    /// Every kind, in tag order
    pub const ALL: [Self; 10] = [
        Self::Rectangle,
        Self::Triangle,
        Self::Box,
        Self::Cylinder,
        Self::Sphere,
        Self::Nurbs,
        Self::Polygon,
        Self::PointLight,
        Self::SpotLight,
        Self::DirectionalLight,
    ];

    /// Type tag used in documents
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Box => "box",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::Nurbs => "nurbs",
            Self::Polygon => "polygon",
            Self::PointLight => "pointlight",
            Self::SpotLight => "spotlight",
            Self::DirectionalLight => "directionallight",
        }
    }

    /// Parse a type tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// True for the three light kinds
    pub const fn is_light(self) -> bool {
        matches!(self, Self::PointLight | Self::SpotLight | Self::DirectionalLight)
    }
}

const fn one_segment() -> u32 {
    1
}

const fn enabled() -> bool {
    true
}

const fn unit() -> f32 {
    1.0
}

const fn default_distance() -> f32 {
    lighting::DEFAULT_DISTANCE
}

const fn default_decay() -> f32 {
    lighting::DEFAULT_DECAY
}

const fn default_shadow_far() -> f32 {
    lighting::DEFAULT_SHADOW_FAR
}

const fn default_shadow_map_size() -> u32 {
    lighting::DEFAULT_SHADOW_MAP_SIZE
}

fn default_shadow_min() -> f32 {
    -lighting::DEFAULT_SHADOW_EXTENT
}

const fn default_shadow_max() -> f32 {
    lighting::DEFAULT_SHADOW_EXTENT
}

/// `rectangle` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RectangleDef {
    /// First corner
    pub xy1: Vec2Def,
    /// Opposite corner
    pub xy2: Vec2Def,
    /// Columns
    #[serde(default = "one_segment")]
    pub parts_x: u32,
    /// Rows
    #[serde(default = "one_segment")]
    pub parts_y: u32,
}

/// `triangle` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TriangleDef {
    /// First corner
    pub xyz1: Vec3Def,
    /// Second corner
    pub xyz2: Vec3Def,
    /// Third corner
    pub xyz3: Vec3Def,
}

/// `box` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxDef {
    /// First corner
    pub xyz1: Vec3Def,
    /// Opposite corner
    pub xyz2: Vec3Def,
    /// Segments along X
    #[serde(default = "one_segment")]
    pub parts_x: u32,
    /// Segments along Y
    #[serde(default = "one_segment")]
    pub parts_y: u32,
    /// Segments along Z
    #[serde(default = "one_segment")]
    pub parts_z: u32,
}

/// `cylinder` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CylinderDef {
    /// Bottom radius
    pub base: f32,
    /// Top radius
    pub top: f32,
    /// Height along Y
    pub height: f32,
    /// Radial segments
    pub slices: u32,
    /// Height segments
    #[serde(default = "one_segment")]
    pub stacks: u32,
    /// Close both ends
    #[serde(default, alias = "cap")]
    pub capsclose: bool,
    /// Sweep start, radians
    #[serde(default, alias = "theta_start")]
    pub thetastart: Option<f32>,
    /// Sweep length, radians
    #[serde(default, alias = "theta_length")]
    pub thetalength: Option<f32>,
}

/// `sphere` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SphereDef {
    /// Radius
    pub radius: f32,
    /// Segments around Y
    pub slices: u32,
    /// Segments pole to pole
    pub stacks: u32,
    /// Vertical start, radians
    #[serde(default, alias = "theta_start")]
    pub thetastart: Option<f32>,
    /// Vertical sweep, radians
    #[serde(default, alias = "theta_length")]
    pub thetalength: Option<f32>,
    /// Horizontal start, radians
    #[serde(default, alias = "phi_start")]
    pub phistart: Option<f32>,
    /// Horizontal sweep, radians
    #[serde(default, alias = "phi_length")]
    pub philength: Option<f32>,
}

/// Homogeneous control point; `w` defaults to 1
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ControlPointDef {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
    /// Weight
    #[serde(default = "unit")]
    pub w: f32,
}

/// `nurbs` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NurbsDef {
    /// Degree along U
    #[serde(alias = "degreeU")]
    pub degree_u: usize,
    /// Degree along V
    #[serde(alias = "degreeV")]
    pub degree_v: usize,
    /// Samples along U
    #[serde(alias = "partsU")]
    pub parts_u: u32,
    /// Samples along V
    #[serde(alias = "partsV")]
    pub parts_v: u32,
    /// Flat control point list, row-major
    #[serde(alias = "controlPoints")]
    pub controlpoints: Vec<ControlPointDef>,
}

/// `polygon` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolygonDef {
    /// Outer radius
    pub radius: f32,
    /// Rings
    pub stacks: u32,
    /// Points per ring
    pub slices: u32,
    /// Center color
    pub color_c: ColorDef,
    /// Perimeter color
    pub color_p: ColorDef,
}

/// `pointlight` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointLightDef {
    /// Contributes light
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Light color
    pub color: ColorDef,
    /// Intensity
    #[serde(default = "unit")]
    pub intensity: f32,
    /// Range
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Falloff exponent
    #[serde(default = "default_decay")]
    pub decay: f32,
    /// Position
    pub position: Vec3Def,
    /// Render a shadow map
    #[serde(default)]
    pub castshadow: bool,
    /// Shadow camera far plane
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    /// Shadow map size
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

/// `spotlight` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpotLightDef {
    /// Contributes light
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Light color
    pub color: ColorDef,
    /// Intensity
    #[serde(default = "unit")]
    pub intensity: f32,
    /// Range
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Cone half-angle, degrees
    pub angle: f32,
    /// Falloff exponent
    #[serde(default = "default_decay")]
    pub decay: f32,
    /// Attenuated fraction of the cone
    #[serde(default = "unit")]
    pub penumbra: f32,
    /// Position
    pub position: Vec3Def,
    /// Aim point
    pub target: Vec3Def,
    /// Render a shadow map
    #[serde(default)]
    pub castshadow: bool,
    /// Shadow camera far plane
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    /// Shadow map size
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

/// `directionallight` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionalLightDef {
    /// Contributes light
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Light color
    pub color: ColorDef,
    /// Intensity
    #[serde(default = "unit")]
    pub intensity: f32,
    /// Position; the light shines towards the origin
    pub position: Vec3Def,
    /// Render a shadow map
    #[serde(default)]
    pub castshadow: bool,
    /// Shadow frustum left
    #[serde(default = "default_shadow_min")]
    pub shadowleft: f32,
    /// Shadow frustum right
    #[serde(default = "default_shadow_max")]
    pub shadowright: f32,
    /// Shadow frustum bottom
    #[serde(default = "default_shadow_min")]
    pub shadowbottom: f32,
    /// Shadow frustum top
    #[serde(default = "default_shadow_max")]
    pub shadowtop: f32,
    /// Shadow camera far plane
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    /// Shadow map size
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

/// Decoded parameters of one leaf
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveDef {
    /// `rectangle`
    Rectangle(RectangleDef),
    /// `triangle`
    Triangle(TriangleDef),
    /// `box`
    Box(BoxDef),
    /// `cylinder`
    Cylinder(CylinderDef),
    /// `sphere`
    Sphere(SphereDef),
    /// `nurbs`
    Nurbs(NurbsDef),
    /// `polygon`
    Polygon(PolygonDef),
    /// `pointlight`
    PointLight(PointLightDef),
    /// `spotlight`
    SpotLight(SpotLightDef),
    /// `directionallight`
    DirectionalLight(DirectionalLightDef),
}

impl PrimitiveDef {
    /// Decode the parameters of a leaf of the given kind
    pub fn decode(node_id: &str, kind: PrimitiveKind, value: &Value) -> Result<Self, CompileError> {
        let decoded = match kind {
            PrimitiveKind::Rectangle => RectangleDef::deserialize(value).map(Self::Rectangle),
            PrimitiveKind::Triangle => TriangleDef::deserialize(value).map(Self::Triangle),
            PrimitiveKind::Box => BoxDef::deserialize(value).map(Self::Box),
            PrimitiveKind::Cylinder => CylinderDef::deserialize(value).map(Self::Cylinder),
            PrimitiveKind::Sphere => SphereDef::deserialize(value).map(Self::Sphere),
            PrimitiveKind::Nurbs => NurbsDef::deserialize(value).map(Self::Nurbs),
            PrimitiveKind::Polygon => PolygonDef::deserialize(value).map(Self::Polygon),
            PrimitiveKind::PointLight => PointLightDef::deserialize(value).map(Self::PointLight),
            PrimitiveKind::SpotLight => SpotLightDef::deserialize(value).map(Self::SpotLight),
            PrimitiveKind::DirectionalLight => DirectionalLightDef::deserialize(value).map(Self::DirectionalLight),
        };
        decoded.map_err(|e| CompileError::invalid_primitive(node_id, e))
    }

    /// Kind of this leaf
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Rectangle(_) => PrimitiveKind::Rectangle,
            Self::Triangle(_) => PrimitiveKind::Triangle,
            Self::Box(_) => PrimitiveKind::Box,
            Self::Cylinder(_) => PrimitiveKind::Cylinder,
            Self::Sphere(_) => PrimitiveKind::Sphere,
            Self::Nurbs(_) => PrimitiveKind::Nurbs,
            Self::Polygon(_) => PrimitiveKind::Polygon,
            Self::PointLight(_) => PrimitiveKind::PointLight,
            Self::SpotLight(_) => PrimitiveKind::SpotLight,
            Self::DirectionalLight(_) => PrimitiveKind::DirectionalLight,
        }
    }
}

/// Result of compiling one leaf
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Geometry with its material
    Drawable(MeshObject),
    /// A light and the helper that visualizes it
    Light(Light, LightHelper),
}

/// Builds compiled objects from leaf definitions
pub struct PrimitiveFactory;

impl PrimitiveFactory {
    /// Compile one leaf
    ///
    /// `material` is the resolved material in effect for the leaf; without one
    /// the leaf falls back to [`Material::fallback`] (or, for polygons, to
    /// [`Material::vertex_colored`]). Shadow flags apply to drawables only;
    /// lights carry their own `castshadow` setting.
    pub fn create(
        node_id: &str,
        def: &PrimitiveDef,
        material: Option<Arc<Material>>,
        cast_shadow: bool,
        receive_shadow: bool,
    ) -> Result<Primitive, CompileError> {
        log::trace!("Creating {} '{}'", def.kind().tag(), node_id);

        let (mesh, center) = match def {
            PrimitiveDef::Rectangle(rect) => rectangle(rect),
            PrimitiveDef::Triangle(tri) => (triangle(tri), Vec3::zeros()),
            PrimitiveDef::Box(cuboid) => box_mesh(cuboid),
            PrimitiveDef::Cylinder(cyl) => (cylinder(node_id, cyl)?, Vec3::zeros()),
            PrimitiveDef::Sphere(sphere_def) => (sphere(node_id, sphere_def)?, Vec3::zeros()),
            PrimitiveDef::Nurbs(nurbs_def) => (nurbs(node_id, nurbs_def)?, Vec3::zeros()),
            PrimitiveDef::Polygon(poly) => {
                let mesh = polygon(node_id, poly)?;
                let material = material.unwrap_or_else(|| Arc::new(Material::vertex_colored()));
                return Ok(Self::drawable(node_id, mesh, Vec3::zeros(), material, cast_shadow, receive_shadow));
            }
            PrimitiveDef::PointLight(light) => return Ok(pair(point_light(node_id, light))),
            PrimitiveDef::SpotLight(light) => return Ok(pair(spot_light(node_id, light))),
            PrimitiveDef::DirectionalLight(light) => return Ok(pair(directional_light(node_id, light))),
        };

        let material = material.unwrap_or_else(|| Arc::new(Material::fallback()));
        Ok(Self::drawable(node_id, mesh, center, material, cast_shadow, receive_shadow))
    }

    fn drawable(
        node_id: &str,
        mesh: Mesh,
        position: Vec3,
        material: Arc<Material>,
        cast_shadow: bool,
        receive_shadow: bool,
    ) -> Primitive {
        let mut object = MeshObject::new(node_id, mesh, material);
        object.transform.position = position;
        object.cast_shadow = cast_shadow;
        object.receive_shadow = receive_shadow;
        Primitive::Drawable(object)
    }
}

fn pair(light: Light) -> Primitive {
    let helper = light.helper();
    Primitive::Light(light, helper)
}

fn require(node_id: &str, condition: bool, reason: &str) -> Result<(), CompileError> {
    if condition {
        Ok(())
    } else {
        Err(CompileError::invalid_primitive(node_id, reason))
    }
}

/// Geometry centered on the origin plus the offset that puts it back between its corners
fn rectangle(def: &RectangleDef) -> (Mesh, Vec3) {
    let (a, b) = (def.xy1, def.xy2);
    let mesh = PlaneGeometry {
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
        width_segments: def.parts_x,
        height_segments: def.parts_y,
    }
    .build();
    (mesh, Vec3::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, 0.0))
}

fn triangle(def: &TriangleDef) -> Mesh {
    TriangleGeometry {
        corners: [def.xyz1.into(), def.xyz2.into(), def.xyz3.into()],
    }
    .build()
}

fn box_mesh(def: &BoxDef) -> (Mesh, Vec3) {
    let (a, b): (Vec3, Vec3) = (def.xyz1.into(), def.xyz2.into());
    let size = (b - a).abs();
    let mesh = BoxGeometry {
        width_segments: def.parts_x,
        height_segments: def.parts_y,
        depth_segments: def.parts_z,
        ..BoxGeometry::new(size.x, size.y, size.z)
    }
    .build();
    (mesh, (a + b) / 2.0)
}

fn cylinder(node_id: &str, def: &CylinderDef) -> Result<Mesh, CompileError> {
    require(node_id, def.slices >= 3, "cylinder needs at least 3 slices")?;
    require(node_id, def.base >= 0.0 && def.top >= 0.0, "cylinder radii must not be negative")?;
    require(node_id, def.base > 0.0 || def.top > 0.0, "cylinder needs a positive radius")?;

    Ok(CylinderGeometry {
        open_ended: !def.capsclose,
        theta_start: def.thetastart.unwrap_or(0.0),
        theta_length: def.thetalength.unwrap_or(TAU),
        ..CylinderGeometry::new(def.top, def.base, def.height, def.slices, def.stacks)
    }
    .build())
}

fn sphere(node_id: &str, def: &SphereDef) -> Result<Mesh, CompileError> {
    require(node_id, def.radius > 0.0, "sphere radius must be positive")?;
    require(node_id, def.slices >= 3, "sphere needs at least 3 slices")?;
    require(node_id, def.stacks >= 2, "sphere needs at least 2 stacks")?;

    Ok(SphereGeometry {
        theta_start: def.thetastart.unwrap_or(0.0),
        theta_length: def.thetalength.unwrap_or(PI),
        phi_start: def.phistart.unwrap_or(0.0),
        phi_length: def.philength.unwrap_or(TAU),
        ..SphereGeometry::new(def.radius, def.slices, def.stacks)
    }
    .build())
}

fn nurbs(node_id: &str, def: &NurbsDef) -> Result<Mesh, CompileError> {
    require(node_id, def.parts_u > 0 && def.parts_v > 0, "nurbs needs at least one part in each direction")?;
    let grid = (u64::from(def.parts_u) + 1) * (u64::from(def.parts_v) + 1);
    require(node_id, grid <= u64::from(u32::MAX), "nurbs tessellation does not fit 32-bit indices")?;

    let points: Vec<Vec4> = def.controlpoints.iter().map(|p| Vec4::new(p.x, p.y, p.z, p.w)).collect();
    let surface = NurbsSurface::new(def.degree_u, def.degree_v, &points).ok_or_else(|| {
        CompileError::invalid_primitive(
            node_id,
            format!(
                "{} control points do not fit degrees {}x{}",
                points.len(),
                def.degree_u,
                def.degree_v
            ),
        )
    })?;

    Ok(surface.tessellate(def.parts_u, def.parts_v))
}

fn polygon(node_id: &str, def: &PolygonDef) -> Result<Mesh, CompileError> {
    require(node_id, def.radius > 0.0, "polygon radius must be positive")?;
    require(node_id, def.stacks >= 1, "polygon needs at least 1 stack")?;
    require(node_id, def.slices >= 3, "polygon needs at least 3 slices")?;

    Ok(PolygonGeometry {
        radius: def.radius,
        stacks: def.stacks,
        slices: def.slices,
        center_color: def.color_c.into(),
        perimeter_color: def.color_p.into(),
    }
    .build())
}

fn shadow(cast: bool, far: f32, map_size: u32) -> ShadowSettings {
    ShadowSettings { cast, map_size, far }
}

fn point_light(node_id: &str, def: &PointLightDef) -> Light {
    Light {
        name: node_id.to_owned(),
        light_type: LightType::Point {
            distance: def.distance,
            decay: def.decay,
        },
        position: def.position.into(),
        color: Color::from(def.color),
        intensity: def.intensity,
        enabled: def.enabled,
        shadow: shadow(def.castshadow, def.shadowfar, def.shadowmapsize),
    }
}

fn spot_light(node_id: &str, def: &SpotLightDef) -> Light {
    Light {
        name: node_id.to_owned(),
        light_type: LightType::Spot {
            distance: def.distance,
            decay: def.decay,
            angle: utils::deg_to_rad(def.angle),
            penumbra: def.penumbra,
            target: def.target.into(),
        },
        position: def.position.into(),
        color: Color::from(def.color),
        intensity: def.intensity,
        enabled: def.enabled,
        shadow: shadow(def.castshadow, def.shadowfar, def.shadowmapsize),
    }
}

fn directional_light(node_id: &str, def: &DirectionalLightDef) -> Light {
    Light {
        name: node_id.to_owned(),
        light_type: LightType::Directional {
            shadow_frustum: ShadowFrustum {
                left: def.shadowleft,
                right: def.shadowright,
                bottom: def.shadowbottom,
                top: def.shadowtop,
            },
        },
        position: def.position.into(),
        color: Color::from(def.color),
        intensity: def.intensity,
        enabled: def.enabled,
        shadow: shadow(def.castshadow, def.shadowfar, def.shadowmapsize),
    }
}
