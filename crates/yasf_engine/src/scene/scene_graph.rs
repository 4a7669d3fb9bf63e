//! Compiled scene graph
//!
//! A strict tree: every object owns its children and nothing points back up.
//! Two occurrences of the same node definition are two independent subtrees.

use std::sync::Arc;

use crate::foundation::math::{Mat4, Transform, Vec3, Vec4};
use crate::render::lighting::{Light, LightHelper};
use crate::render::material::Material;
use crate::render::primitives::Mesh;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full edge lengths along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Smallest box containing this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let local = Vec4::new(
                if corner & 1 == 0 { self.min.x } else { self.max.x },
                if corner & 2 == 0 { self.min.y } else { self.max.y },
                if corner & 4 == 0 { self.min.z } else { self.max.z },
                1.0,
            );
            let p = (matrix * local).xyz();
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Self { min, max }
    }
}

/// Any object that can appear in the compiled tree
#[derive(Debug, Clone)]
pub enum SceneObject {
    /// Transformable container
    Group(Group),
    /// Drawable geometry
    Mesh(MeshObject),
    /// Light source
    Light(Light),
    /// Debug visualization of a light
    LightHelper(LightHelper),
    /// Distance-keyed switch between alternative subtrees
    Lod(Lod),
}

impl SceneObject {
    /// Object name
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => &group.name,
            Self::Mesh(mesh) => &mesh.name,
            Self::Light(light) => &light.name,
            Self::LightHelper(helper) => &helper.light_name,
            Self::Lod(lod) => &lod.name,
        }
    }

    /// Short label for logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Mesh(_) => "mesh",
            Self::Light(_) => "light",
            Self::LightHelper(_) => "light_helper",
            Self::Lod(_) => "lod",
        }
    }

    /// Depth-first pre-order walk, including every LOD level
    pub fn visit<'a, F>(&'a self, depth: usize, visitor: &mut F)
    where
        F: FnMut(&'a Self, usize),
    {
        visitor(self, depth);
        match self {
            Self::Group(group) => {
                for child in &group.children {
                    child.visit(depth + 1, visitor);
                }
            }
            Self::Lod(lod) => {
                for level in &lod.levels {
                    level.object.visit(depth + 1, visitor);
                }
            }
            Self::Mesh(_) | Self::Light(_) | Self::LightHelper(_) => {}
        }
    }
}

/// Group node with its own transform and shadow flags
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Node id
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Shadow casting in effect for this subtree
    pub cast_shadow: bool,
    /// Shadow receiving in effect for this subtree
    pub receive_shadow: bool,
    /// Owned children in compile order
    pub children: Vec<SceneObject>,
}

impl Group {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a child
    pub fn add(&mut self, child: SceneObject) {
        self.children.push(child);
    }

    /// True if the group has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Local-to-parent matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<&SceneObject> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Direct child group by name
    pub fn child_group(&self, name: &str) -> Option<&Group> {
        self.children.iter().find_map(|child| match child {
            SceneObject::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    /// Mutable direct child group by name
    pub fn child_group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.children.iter_mut().find_map(|child| match child {
            SceneObject::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    /// Every mesh in the subtree, LOD levels included
    pub fn meshes(&self) -> Vec<&MeshObject> {
        let mut meshes = Vec::new();
        self.walk(&mut |object, _| {
            if let SceneObject::Mesh(mesh) = object {
                meshes.push(mesh);
            }
        });
        meshes
    }

    /// Every light in the subtree
    pub fn lights(&self) -> Vec<&Light> {
        let mut lights = Vec::new();
        self.walk(&mut |object, _| {
            if let SceneObject::Light(light) = object {
                lights.push(light);
            }
        });
        lights
    }

    /// Number of objects below this group
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Depth-first walk over the descendants, children at depth 1
    pub fn walk<'a, F>(&'a self, visitor: &mut F)
    where
        F: FnMut(&'a SceneObject, usize),
    {
        for child in &self.children {
            child.visit(1, visitor);
        }
    }
}

/// Drawable leaf: geometry plus a shared material
#[derive(Debug, Clone)]
pub struct MeshObject {
    /// Node id of the primitive
    pub name: String,
    /// Geometry
    pub mesh: Mesh,
    /// Shared material record
    pub material: Arc<Material>,
    /// Local transform
    pub transform: Transform,
    /// Casts shadows
    pub cast_shadow: bool,
    /// Receives shadows
    pub receive_shadow: bool,
}

impl MeshObject {
    /// Mesh at the origin with identity transform
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Arc<Material>) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            transform: Transform::identity(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Bounds in the object's own space
    pub fn local_bounds(&self) -> Option<AABB> {
        self.mesh.bounds()
    }

    /// Bounds in the parent group's space
    pub fn parent_bounds(&self) -> Option<AABB> {
        self.local_bounds().map(|bounds| bounds.transformed(&self.transform.to_matrix()))
    }
}

/// One entry of a level-of-detail table
#[derive(Debug, Clone)]
pub struct LodLevel {
    /// Minimum viewer distance at which this level is shown
    pub distance: f32,
    /// Subtree shown for this level
    pub object: SceneObject,
}

/// Level-of-detail switch
#[derive(Debug, Clone, Default)]
pub struct Lod {
    /// Node id
    pub name: String,
    /// Levels in ascending distance order
    pub levels: Vec<LodLevel>,
}

impl Lod {
    /// Create an empty switch
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: Vec::new(),
        }
    }

    /// Register a level, keeping the table sorted by distance
    ///
    /// Levels with equal distances keep their insertion order.
    pub fn add_level(&mut self, object: SceneObject, distance: f32) {
        let distance = distance.abs();
        let index = self.levels.partition_point(|level| level.distance <= distance);
        self.levels.insert(index, LodLevel { distance, object });
    }

    /// Breakpoint table
    pub fn distances(&self) -> Vec<f32> {
        self.levels.iter().map(|level| level.distance).collect()
    }

    /// Level to show for a viewer at `distance`: the last one whose
    /// threshold has been reached, or the first one when none has
    pub fn select(&self, distance: f32) -> Option<&LodLevel> {
        let reached = self.levels.partition_point(|level| level.distance <= distance);
        self.levels.get(reached.saturating_sub(1))
    }
}
