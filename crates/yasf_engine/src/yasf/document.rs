//! Scene document records
//!
//! Typed views over the sections of a YASF document. Flat sections are
//! decoded eagerly; node definitions stay raw JSON until the node builder
//! reaches them, so one malformed node only costs its own subtree.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::CompileError;
use super::primitive_factory::PrimitiveKind;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::color::Color;

/// Texture definitions by id
pub type TextureDefs = BTreeMap<String, TextureDef>;

/// Material definitions by id
pub type MaterialDefs = BTreeMap<String, MaterialDef>;

/// The scene object itself, unwrapping an outer `{"yasf": ...}` if present
pub fn unwrap_root(document: &Value) -> &Value {
    document.get("yasf").filter(|inner| inner.is_object()).unwrap_or(document)
}

/// `{r, g, b}` triple; an `a` component is accepted and ignored
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorDef {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl From<ColorDef> for Color {
    fn from(def: ColorDef) -> Self {
        Self::new(def.r, def.g, def.b)
    }
}

/// `{x, y}` pair
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Vec2Def {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
}

impl From<Vec2Def> for Vec2 {
    fn from(def: Vec2Def) -> Self {
        Self::new(def.x, def.y)
    }
}

/// `{x, y, z}` triple
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Vec3Def {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
}

impl From<Vec3Def> for Vec3 {
    fn from(def: Vec3Def) -> Self {
        Self::new(def.x, def.y, def.z)
    }
}

/// Field reader over one JSON object that reports missing fields by name
#[derive(Debug, Clone)]
pub struct Section<'a> {
    name: String,
    value: &'a Value,
}

impl<'a> Section<'a> {
    /// Wrap `value`, naming it `name` in errors
    pub fn new(name: impl Into<String>, value: &'a Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Section name used in errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying value
    pub const fn value(&self) -> &'a Value {
        self.value
    }

    /// Optional field; JSON `null` counts as absent
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.value.get(field).filter(|value| !value.is_null())
    }

    /// Field that must be present
    pub fn required(&self, field: &str) -> Result<&'a Value, CompileError> {
        self.get(field).ok_or_else(|| CompileError::missing(&self.name, field))
    }

    /// Nested object
    pub fn child(&self, field: &str) -> Result<Section<'a>, CompileError> {
        let value = self.required(field)?;
        if !value.is_object() {
            return Err(CompileError::invalid(&self.name, field, "expected an object"));
        }
        Ok(Section::new(format!("{}.{}", self.name, field), value))
    }

    /// Required number
    pub fn number(&self, field: &str) -> Result<f32, CompileError> {
        self.required(field)?
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| CompileError::invalid(&self.name, field, "expected a number"))
    }

    /// Required string
    pub fn string(&self, field: &str) -> Result<&'a str, CompileError> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| CompileError::invalid(&self.name, field, "expected a string"))
    }

    /// This object read as `{r, g, b}`
    pub fn as_color(&self) -> Result<Color, CompileError> {
        Ok(Color::new(self.number("r")?, self.number("g")?, self.number("b")?))
    }

    /// Required `{r, g, b}` field
    pub fn color(&self, field: &str) -> Result<Color, CompileError> {
        self.child(field)?.as_color()
    }

    /// Required `{x, y, z}` field
    pub fn vec3(&self, field: &str) -> Result<Vec3, CompileError> {
        let child = self.child(field)?;
        Ok(Vec3::new(child.number("x")?, child.number("y")?, child.number("z")?))
    }

    /// Decode every entry of this object except `skip`, keyed by id
    pub fn entries<T: DeserializeOwned>(&self, skip: &[&str]) -> Result<BTreeMap<String, T>, CompileError> {
        let Some(object) = self.value.as_object() else {
            return Err(CompileError::invalid(&self.name, "*", "expected an object"));
        };

        object
            .iter()
            .filter(|(id, _)| !skip.contains(&id.as_str()))
            .map(|(id, value)| {
                T::deserialize(value)
                    .map(|decoded| (id.clone(), decoded))
                    .map_err(|e| CompileError::invalid(&self.name, id, e))
            })
            .collect()
    }

    /// Decode every entry on its own; an entry that fails is reported and left out
    pub fn entries_recovering<T: DeserializeOwned>(&self) -> (BTreeMap<String, T>, Vec<CompileError>) {
        let Some(object) = self.value.as_object() else {
            return (BTreeMap::new(), vec![CompileError::invalid(&self.name, "*", "expected an object")]);
        };

        let mut decoded = BTreeMap::new();
        let mut errors = Vec::new();
        for (id, value) in object {
            match T::deserialize(value) {
                Ok(entry) => {
                    decoded.insert(id.clone(), entry);
                }
                Err(e) => errors.push(CompileError::invalid(&self.name, id, e)),
            }
        }
        (decoded, errors)
    }
}

/// Camera definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CameraDef {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in degrees
        angle: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
        /// Eye position
        location: Vec3Def,
        /// Look-at point
        target: Vec3Def,
    },
    /// Orthographic projection
    #[serde(alias = "orthographic")]
    Orthogonal {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Top plane
        top: f32,
        /// Bottom plane
        bottom: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
        /// Eye position
        location: Vec3Def,
        /// Look-at point
        target: Vec3Def,
    },
}

/// Texture definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextureDef {
    /// Image or video path
    pub filepath: String,
    /// Bind to a live video instead of a still image
    #[serde(default, rename = "isVideo", alias = "isvideo")]
    pub is_video: bool,
    #[serde(default)]
    mipmap0: Option<String>,
    #[serde(default)]
    mipmap1: Option<String>,
    #[serde(default)]
    mipmap2: Option<String>,
    #[serde(default)]
    mipmap3: Option<String>,
    #[serde(default)]
    mipmap4: Option<String>,
    #[serde(default)]
    mipmap5: Option<String>,
    #[serde(default)]
    mipmap6: Option<String>,
    #[serde(default)]
    mipmap7: Option<String>,
}

impl TextureDef {
    /// Declared mipmap levels as `(level, path)`, lowest level first
    pub fn mipmaps(&self) -> impl Iterator<Item = (usize, &str)> {
        [
            &self.mipmap0, &self.mipmap1, &self.mipmap2, &self.mipmap3,
            &self.mipmap4, &self.mipmap5, &self.mipmap6, &self.mipmap7,
        ]
        .into_iter()
        .enumerate()
        .filter_map(|(level, path)| path.as_deref().map(|path| (level, path)))
    }
}

/// Shading model override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Per-face normals
    Flat,
    /// Interpolated normals
    Smooth,
}

const fn one() -> f32 {
    1.0
}

const fn default_shininess() -> f32 {
    30.0
}

/// Material definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDef {
    /// Diffuse color
    pub color: ColorDef,
    /// Specular color
    #[serde(default)]
    pub specular: Option<ColorDef>,
    /// Emissive color
    #[serde(default)]
    pub emissive: Option<ColorDef>,
    /// Specular exponent
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    /// Alpha blending
    #[serde(default)]
    pub transparent: bool,
    /// Alpha
    #[serde(default = "one")]
    pub opacity: f32,
    /// Edges only
    #[serde(default)]
    pub wireframe: bool,
    /// Shading override
    #[serde(default)]
    pub shading: Option<Shading>,
    /// Diffuse texture id
    #[serde(default)]
    pub textureref: Option<String>,
    /// World length covered by one texture tile along S
    #[serde(default)]
    pub texlength_s: Option<f32>,
    /// World length covered by one texture tile along T
    #[serde(default)]
    pub texlength_t: Option<f32>,
    /// Draw back faces
    #[serde(default)]
    pub twosided: bool,
    /// Bump texture id
    #[serde(default)]
    pub bumpref: Option<String>,
    /// Bump strength
    #[serde(default = "one")]
    pub bumpscale: f32,
    /// Specular texture id
    #[serde(default)]
    pub specularref: Option<String>,
}

/// `{materialId}` reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaterialRef {
    /// Referenced material id
    #[serde(rename = "materialId", alias = "materialid")]
    pub material_id: String,
}

/// One entry of a node's `transforms` list
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformDef {
    /// Move along the current local axes
    Translate {
        /// Offset
        amount: Vec3Def,
    },
    /// Rotate around the current local axes, degrees
    Rotate {
        /// Angles in degrees
        amount: Vec3Def,
    },
    /// Set absolute scale
    Scale {
        /// Scale factors
        amount: Vec3Def,
    },
}

/// Group definition (`type: node`)
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GroupDef {
    /// Inline children plus the `nodesList` and `lodsList` collections
    #[serde(default)]
    pub children: Map<String, Value>,
    /// Transforms in declaration order
    #[serde(default)]
    pub transforms: Vec<TransformDef>,
    /// Material inherited by descendants
    #[serde(default)]
    pub materialref: Option<MaterialRef>,
    /// Shadow casting override
    #[serde(default, alias = "castShadows")]
    pub castshadows: Option<bool>,
    /// Shadow receiving override
    #[serde(default, alias = "receiveShadows")]
    pub receiveshadows: Option<bool>,
}

/// Children of a group in compile order
#[derive(Debug, Clone, Default)]
pub struct ChildList<'a> {
    /// Primitive and reference children declared inline
    pub inline: Vec<(&'a str, &'a Value)>,
    /// Ids from `nodesList`
    pub nodes: Vec<String>,
    /// Ids from `lodsList`
    pub lods: Vec<String>,
}

impl GroupDef {
    const NODES_LIST: &'static str = "nodesList";
    const LODS_LIST: &'static str = "lodsList";

    /// Split `children` into inline definitions and the two id lists
    pub fn child_list(&self, node_id: &str) -> Result<ChildList<'_>, CompileError> {
        let mut list = ChildList::default();
        for (id, value) in &self.children {
            match id.as_str() {
                Self::NODES_LIST => list.nodes = id_list(node_id, id, value)?,
                Self::LODS_LIST => list.lods = id_list(node_id, id, value)?,
                _ => list.inline.push((id.as_str(), value)),
            }
        }
        Ok(list)
    }
}

fn id_list(node_id: &str, field: &str, value: &Value) -> Result<Vec<String>, CompileError> {
    Vec::<String>::deserialize(value).map_err(|e| CompileError::malformed(node_id, format!("{field}: {e}")))
}

/// Reference definition (`type: noderef`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeRefDef {
    /// Referenced node id
    #[serde(rename = "nodeId", alias = "nodeid")]
    pub node_id: String,
}

/// One level of a LOD definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LodMemberDef {
    /// Node shown at this level
    #[serde(rename = "nodeId", alias = "nodeid")]
    pub node_id: String,
    /// Distance from which the level applies
    #[serde(rename = "mindist", alias = "minDist")]
    pub min_dist: f32,
}

/// LOD definition (`type: lod`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LodDef {
    /// Levels as declared
    #[serde(rename = "lodNodes", alias = "lodnodes")]
    pub levels: Vec<LodMemberDef>,
}

/// A graph entry, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDef {
    /// `node`
    Group(GroupDef),
    /// `noderef`
    Reference(NodeRefDef),
    /// `lod`
    Lod(LodDef),
    /// Any leaf type; parameters are decoded by the primitive factory
    Primitive(PrimitiveKind),
}

impl NodeDef {
    /// Read the type tag and decode the structural part of a definition
    pub fn parse(node_id: &str, value: &Value) -> Result<Self, CompileError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CompileError::malformed(node_id, "missing 'type'"))?;

        let malformed = |e: serde_json::Error| CompileError::malformed(node_id, e);
        match kind {
            "node" => GroupDef::deserialize(value).map(Self::Group).map_err(malformed),
            "noderef" => NodeRefDef::deserialize(value).map(Self::Reference).map_err(malformed),
            "lod" => LodDef::deserialize(value).map(Self::Lod).map_err(malformed),
            other => PrimitiveKind::from_tag(other).map(Self::Primitive).ok_or_else(|| {
                CompileError::UnknownPrimitive {
                    node_id: node_id.to_owned(),
                    kind: other.to_owned(),
                }
            }),
        }
    }
}

/// The `graph` section: root id plus raw node definitions
#[derive(Debug, Clone, Default)]
pub struct GraphSection {
    /// Id of the root node
    pub root_id: String,
    /// Node definitions by id
    pub nodes: BTreeMap<String, Value>,
}

impl GraphSection {
    const ROOT_KEYS: [&'static str; 2] = ["rootid", "rootId"];

    /// Read the section from the scene object
    pub fn from_root(root: &Value) -> Result<Self, CompileError> {
        let graph = Section::new("yasf", root).child("graph")?;
        let root_id = Self::ROOT_KEYS
            .iter()
            .find_map(|key| graph.get(key))
            .ok_or_else(|| CompileError::missing("graph", "rootid"))?
            .as_str()
            .ok_or_else(|| CompileError::invalid("graph", "rootid", "expected a string"))?
            .to_owned();

        let nodes = graph
            .value()
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(id, _)| !Self::ROOT_KEYS.contains(&id.as_str()))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect();

        Ok(Self { root_id, nodes })
    }

    /// Raw definition of a node
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.nodes.get(id)
    }
}

/// Texture definitions plus the entries that failed to decode; the section is optional
pub fn texture_defs(root: &Value) -> (TextureDefs, Vec<CompileError>) {
    optional_entries(root, "textures")
}

/// Material definitions plus the entries that failed to decode; the section is optional
pub fn material_defs(root: &Value) -> (MaterialDefs, Vec<CompileError>) {
    optional_entries(root, "materials")
}

fn optional_entries<T: DeserializeOwned>(root: &Value, section: &str) -> (BTreeMap<String, T>, Vec<CompileError>) {
    match Section::new("yasf", root).get(section) {
        Some(value) => Section::new(section, value).entries_recovering(),
        None => (BTreeMap::new(), Vec::new()),
    }
}
