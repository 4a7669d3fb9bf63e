//! Lighting system
//!
//! Light objects placed in the compiled graph, their shadow settings, and the
//! debug helpers that visualize them.

use crate::foundation::math::Vec3;
use crate::render::color::Color;

/// Default reach of point and spot lights
pub const DEFAULT_DISTANCE: f32 = 1000.0;
/// Default physical falloff exponent
pub const DEFAULT_DECAY: f32 = 2.0;
/// Default square shadow map resolution
pub const DEFAULT_SHADOW_MAP_SIZE: u32 = 512;
/// Default far plane of the shadow camera
pub const DEFAULT_SHADOW_FAR: f32 = 500.0;
/// Default half-extent of a directional light's shadow frustum
pub const DEFAULT_SHADOW_EXTENT: f32 = 5.0;

/// Orthographic bounds of a directional light's shadow camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFrustum {
    /// Left plane
    pub left: f32,
    /// Right plane
    pub right: f32,
    /// Bottom plane
    pub bottom: f32,
    /// Top plane
    pub top: f32,
}

impl Default for ShadowFrustum {
    fn default() -> Self {
        Self {
            left: -DEFAULT_SHADOW_EXTENT,
            right: DEFAULT_SHADOW_EXTENT,
            bottom: -DEFAULT_SHADOW_EXTENT,
            top: DEFAULT_SHADOW_EXTENT,
        }
    }
}

/// Shadow casting configuration of a light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    /// Whether the light renders a shadow map
    pub cast: bool,
    /// Shadow map width and height in texels
    pub map_size: u32,
    /// Far plane of the shadow camera
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            cast: false,
            map_size: DEFAULT_SHADOW_MAP_SIZE,
            far: DEFAULT_SHADOW_FAR,
        }
    }
}

/// Light type with its type-specific parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LightType {
    /// Point light (like a lightbulb)
    Point {
        /// Maximum range, 0 for unlimited
        distance: f32,
        /// Falloff exponent
        decay: f32,
    },
    /// Spot light (like a flashlight)
    Spot {
        /// Maximum range
        distance: f32,
        /// Falloff exponent
        decay: f32,
        /// Cone half-angle in radians
        angle: f32,
        /// Fraction of the cone attenuated at the edge
        penumbra: f32,
        /// Point the cone aims at
        target: Vec3,
    },
    /// Directional light (like sunlight), shining from its position towards the origin
    Directional {
        /// Orthographic shadow bounds
        shadow_frustum: ShadowFrustum,
    },
}

impl LightType {
    /// Short label for logs and helpers
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::Spot { .. } => "spot",
            Self::Directional { .. } => "directional",
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Node id of the light
    pub name: String,
    /// Light type
    pub light_type: LightType,
    /// Light position in parent space
    pub position: Vec3,
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Disabled lights stay in the graph but contribute nothing
    pub enabled: bool,
    /// Shadow configuration
    pub shadow: ShadowSettings,
}

impl Light {
    /// Create a point light
    pub fn point(name: impl Into<String>, position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            name: name.into(),
            light_type: LightType::Point {
                distance: DEFAULT_DISTANCE,
                decay: DEFAULT_DECAY,
            },
            position,
            color,
            intensity,
            enabled: true,
            shadow: ShadowSettings::default(),
        }
    }

    /// Direction the light shines in, if it has one
    pub fn direction(&self) -> Option<Vec3> {
        match &self.light_type {
            LightType::Point { .. } => None,
            LightType::Spot { target, .. } => Some((target - self.position).normalize()),
            LightType::Directional { .. } => Some((-self.position).normalize()),
        }
    }

    /// Build the debug visualization for this light
    pub fn helper(&self) -> LightHelper {
        LightHelper {
            light_name: self.name.clone(),
            kind: self.light_type.label(),
            position: self.position,
            direction: self.direction(),
            color: self.color,
            size: 1.0,
        }
    }
}

/// Debug visualization bound to a light by name
#[derive(Debug, Clone, PartialEq)]
pub struct LightHelper {
    /// Name of the light this helper follows
    pub light_name: String,
    /// Light type label
    pub kind: &'static str,
    /// Position of the light
    pub position: Vec3,
    /// Direction gizmo, for spot and directional lights
    pub direction: Option<Vec3>,
    /// Gizmo color
    pub color: Color,
    /// Gizmo size in world units
    pub size: f32,
}

/// Uniform ambient term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Ambient light color
    pub color: Color,
    /// Ambient light intensity
    pub intensity: f32,
}
