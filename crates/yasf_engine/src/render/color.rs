//! Linear RGB color values

use crate::foundation::math::{utils, Vec3};

/// RGB color with components nominally in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Interpolate towards `other`; `t = 0` yields `self` and `t = 1` yields `other` exactly
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: utils::lerp(self.r, other.r, t),
            g: utils::lerp(self.g, other.g, t),
            b: utils::lerp(self.b, other.b, t),
        }
    }

    /// Components as an array, the layout vertex color buffers use
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Components as a vector
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_midpoint() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(mid, Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Color::new(0.13, 0.27, 0.91);
        let b = Color::new(0.77, 0.05, 0.33);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
