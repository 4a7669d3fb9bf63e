//! Material records for compiled meshes

use crate::foundation::math::Vec2;
use crate::render::color::Color;
use crate::render::texture::TextureHandle;

/// Which faces a material is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Back faces are culled
    #[default]
    Front,
    /// No culling
    Double,
}

/// Phong-style material properties for 3D rendering
#[derive(Debug, Clone)]
pub struct Material {
    /// Material id from the document
    pub name: String,
    /// Diffuse color
    pub color: Color,
    /// Specular highlight color
    pub specular: Color,
    /// Emissive color
    pub emissive: Color,
    /// Specular exponent
    pub shininess: f32,
    /// Alpha (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,
    /// Whether alpha blending is enabled
    pub transparent: bool,
    /// Render edges only
    pub wireframe: bool,
    /// Face culling
    pub side: Side,
    /// Per-face normals instead of smooth shading
    pub flat_shading: bool,
    /// Multiply by per-vertex colors
    pub vertex_colors: bool,
    /// Diffuse texture
    pub map: Option<TextureHandle>,
    /// Bump texture
    pub bump_map: Option<TextureHandle>,
    /// Bump strength
    pub bump_scale: f32,
    /// Specular texture
    pub specular_map: Option<TextureHandle>,
    /// UV repeat, one tile per declared texture length
    pub uv_repeat: Vec2,
}

impl Material {
    /// Create a new material with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            specular: Color::new(0.067, 0.067, 0.067),
            emissive: Color::BLACK,
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
            flat_shading: false,
            vertex_colors: false,
            map: None,
            bump_map: None,
            bump_scale: 1.0,
            specular_map: None,
            uv_repeat: Vec2::new(1.0, 1.0),
        }
    }

    /// Material used when a primitive has no resolvable material anywhere in its ancestry:
    /// neutral grey, flat-shaded and visible from both sides
    pub fn fallback() -> Self {
        Self::new("default")
            .with_color(Color::new(0.8, 0.8, 0.8))
            .with_side(Side::Double)
            .with_flat_shading(true)
    }

    /// Material for vertex-colored geometry without a material of its own
    pub fn vertex_colored() -> Self {
        let mut material = Self::new("vertex_colors").with_side(Side::Double);
        material.vertex_colors = true;
        material
    }

    /// Set the diffuse color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set face culling
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Enable or disable flat shading
    pub fn with_flat_shading(mut self, enabled: bool) -> Self {
        self.flat_shading = enabled;
        self
    }

    /// Set the alpha/transparency
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Attach a diffuse texture
    pub fn with_map(mut self, texture: TextureHandle) -> Self {
        self.map = Some(texture);
        self
    }

    /// True if back faces are drawn
    pub fn is_double_sided(&self) -> bool {
        self.side == Side::Double
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_flat_and_double_sided() {
        let material = Material::fallback();
        assert!(material.is_double_sided());
        assert!(material.flat_shading);
        assert!(material.map.is_none());
    }

    #[test]
    fn test_opacity_is_clamped() {
        assert_eq!(Material::new("m").with_opacity(1.5).opacity, 1.0);
        assert_eq!(Material::new("m").with_opacity(-0.5).opacity, 0.0);
    }
}
