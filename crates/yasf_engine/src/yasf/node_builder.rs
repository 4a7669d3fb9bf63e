//! Node builder
//!
//! Compiles the graph section depth-first. Every occurrence of a node id is
//! compiled from its original definition with the context inherited at that
//! spot, so two references to the same id can resolve different materials and
//! shadow flags and never share children.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::document::{GraphSection, GroupDef, LodDef, MaterialRef, NodeDef, TransformDef};
use super::error::CompileError;
use super::primitive_factory::{Primitive, PrimitiveDef, PrimitiveFactory, PrimitiveKind};
use crate::foundation::math::{utils, Transform};
use crate::render::material::Material;
use crate::scene::{Group, Lod, SceneObject};

/// Context inherited from the ancestors of the node being compiled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Material id in effect
    pub material_id: Option<String>,
    /// Shadow casting in effect
    pub cast_shadow: bool,
    /// Shadow receiving in effect
    pub receive_shadow: bool,
    /// Graph ids currently being compiled, outermost first
    pub ancestry: Vec<String>,
}

impl BuildContext {
    fn with_ancestor(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.ancestry.push(id.to_owned());
        next
    }

    /// Apply a group's own declarations on top of the inherited ones
    fn inherit(mut self, def: &GroupDef) -> Self {
        if let Some(reference) = &def.materialref {
            self.material_id = Some(reference.material_id.clone());
        }
        if let Some(cast) = def.castshadows {
            self.cast_shadow = cast;
        }
        if let Some(receive) = def.receiveshadows {
            self.receive_shadow = receive;
        }
        self
    }
}

/// Apply transform operations in declaration order
pub fn apply_transforms(transform: &mut Transform, operations: &[TransformDef]) {
    for operation in operations {
        match *operation {
            TransformDef::Translate { amount } => transform.translate_local(amount.into()),
            TransformDef::Rotate { amount } => transform.rotate_local(utils::deg_to_rad_vec(amount.into())),
            TransformDef::Scale { amount } => transform.set_scale(amount.into()),
        }
    }
}

/// Recursive compiler for the graph section
pub struct NodeBuilder<'a> {
    graph: &'a GraphSection,
    materials: &'a HashMap<String, Arc<Material>>,
    max_depth: usize,
    diagnostics: Vec<CompileError>,
}

impl<'a> NodeBuilder<'a> {
    /// Id used as the referrer of the root node in diagnostics
    const GRAPH: &'static str = "graph";

    /// Builder over a graph section and the resolved materials
    pub fn new(graph: &'a GraphSection, materials: &'a HashMap<String, Arc<Material>>, max_depth: usize) -> Self {
        Self {
            graph,
            materials,
            max_depth,
            diagnostics: Vec::new(),
        }
    }

    /// Compile the whole graph from its root id
    ///
    /// Never fails: a root that cannot be compiled yields an empty group named
    /// after the root id, and every recovered error is returned alongside.
    pub fn build_root(mut self) -> (Group, Vec<CompileError>) {
        let root_id = self.graph.root_id.clone();
        log::debug!("Building graph from root '{}'", root_id);

        let root = match self.build_node(&root_id, &BuildContext::default()) {
            Ok(group) => group,
            Err(err) => {
                self.record(err);
                Group::new(root_id)
            }
        };

        (root, self.diagnostics)
    }

    /// Compile one graph node into a group
    ///
    /// Non-group definitions are wrapped in a group named after the id.
    pub fn build_node(&mut self, id: &str, context: &BuildContext) -> Result<Group, CompileError> {
        let from = context.ancestry.last().map_or(Self::GRAPH, String::as_str).to_owned();
        match self.build_object(&from, id, context)? {
            SceneObject::Group(group) => Ok(group),
            other => {
                let mut group = Group::new(id);
                group.cast_shadow = context.cast_shadow;
                group.receive_shadow = context.receive_shadow;
                group.add(other);
                Ok(group)
            }
        }
    }

    /// Errors recovered so far
    pub fn diagnostics(&self) -> &[CompileError] {
        &self.diagnostics
    }

    fn record(&mut self, error: CompileError) {
        log::error!("{}", error);
        self.diagnostics.push(error);
    }

    /// Resolve a graph id referenced from `from` and compile its definition
    fn build_object(&mut self, from: &str, id: &str, context: &BuildContext) -> Result<SceneObject, CompileError> {
        if context.ancestry.iter().any(|ancestor| ancestor == id) {
            return Err(CompileError::CyclicReference {
                node_id: from.to_owned(),
                reference: id.to_owned(),
            });
        }
        if context.ancestry.len() >= self.max_depth {
            return Err(CompileError::DepthExceeded {
                node_id: id.to_owned(),
                max_depth: self.max_depth,
            });
        }

        let graph = self.graph;
        let value = graph.get(id).ok_or_else(|| CompileError::UnresolvedReference {
            node_id: from.to_owned(),
            reference: id.to_owned(),
        })?;

        let context = context.with_ancestor(id);
        match NodeDef::parse(id, value)? {
            NodeDef::Group(def) => self.build_group(id, &def, context).map(SceneObject::Group),
            NodeDef::Lod(def) => Ok(SceneObject::Lod(self.build_lod(id, &def, &context))),
            NodeDef::Reference(reference) => self.build_object(id, &reference.node_id, &context),
            NodeDef::Primitive(kind) => {
                let mut objects = self.build_primitive(id, kind, value, &context)?;
                if objects.len() == 1 {
                    if let Some(object) = objects.pop() {
                        return Ok(object);
                    }
                }
                let mut group = Group::new(id);
                group.children = objects;
                Ok(SceneObject::Group(group))
            }
        }
    }

    fn build_group(&mut self, id: &str, def: &GroupDef, inherited: BuildContext) -> Result<Group, CompileError> {
        let context = inherited.inherit(def);
        let children = def.child_list(id)?;

        let mut group = Group::new(id);
        group.cast_shadow = context.cast_shadow;
        group.receive_shadow = context.receive_shadow;

        for (child_id, value) in children.inline {
            match self.build_inline(id, child_id, value, &context) {
                Ok(objects) => group.children.extend(objects),
                Err(err) => self.record(err),
            }
        }

        for child_id in children.nodes.iter().chain(&children.lods) {
            match self.build_object(id, child_id, &context) {
                Ok(object) => group.add(object),
                Err(err) => self.record(err),
            }
        }

        apply_transforms(&mut group.transform, &def.transforms);
        log::trace!("Built group '{}' with {} children", id, group.children.len());
        Ok(group)
    }

    /// Compile an entry of a group's `children` object
    fn build_inline(
        &mut self,
        parent: &str,
        child_id: &str,
        value: &Value,
        context: &BuildContext,
    ) -> Result<Vec<SceneObject>, CompileError> {
        match NodeDef::parse(child_id, value)? {
            NodeDef::Group(_) => Err(CompileError::NestedGroup {
                node_id: parent.to_owned(),
                child_id: child_id.to_owned(),
            }),
            NodeDef::Reference(reference) => Ok(vec![self.build_object(parent, &reference.node_id, context)?]),
            NodeDef::Lod(def) => Ok(vec![SceneObject::Lod(self.build_lod(child_id, &def, context))]),
            NodeDef::Primitive(kind) => self.build_primitive(child_id, kind, value, context),
        }
    }

    fn build_lod(&mut self, id: &str, def: &LodDef, context: &BuildContext) -> Lod {
        let mut lod = Lod::new(id);
        for member in &def.levels {
            match self.build_object(id, &member.node_id, context) {
                Ok(object) => lod.add_level(object, member.min_dist),
                Err(err) => self.record(err),
            }
        }
        lod
    }

    fn build_primitive(
        &self,
        id: &str,
        kind: PrimitiveKind,
        value: &Value,
        context: &BuildContext,
    ) -> Result<Vec<SceneObject>, CompileError> {
        let def = PrimitiveDef::decode(id, kind, value)?;

        let own_material = match value.get("materialref") {
            Some(reference) => Some(MaterialRef::deserialize(reference).map_err(|e| CompileError::invalid_primitive(id, e))?),
            None => None,
        };
        let material_id = own_material.map(|r| r.material_id).or_else(|| context.material_id.clone());
        let material = material_id.and_then(|material_id| {
            let material = self.materials.get(&material_id).cloned();
            if material.is_none() {
                log::warn!("Primitive '{}': material '{}' is not defined, using the default", id, material_id);
            }
            material
        });

        let objects = match PrimitiveFactory::create(id, &def, material, context.cast_shadow, context.receive_shadow)? {
            Primitive::Drawable(mesh) => vec![SceneObject::Mesh(mesh)],
            Primitive::Light(light, helper) => vec![SceneObject::Light(light), SceneObject::LightHelper(helper)],
        };
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
    use approx::assert_relative_eq;
    use serde_json::json;

    fn graph(value: Value) -> GraphSection {
        GraphSection::from_root(&json!({ "graph": value })).unwrap()
    }

    fn build(section: &GraphSection) -> (Group, Vec<CompileError>) {
        let materials = HashMap::new();
        NodeBuilder::new(section, &materials, 16).build_root()
    }

    #[test]
    fn test_context_inherit_overrides_only_declared_fields() {
        let parent = BuildContext {
            material_id: Some("red".into()),
            cast_shadow: true,
            receive_shadow: true,
            ancestry: vec!["root".into()],
        };
        let def: GroupDef = serde_json::from_value(json!({"castshadows": false})).unwrap();

        let child = parent.clone().inherit(&def);
        assert_eq!(child.material_id.as_deref(), Some("red"));
        assert!(!child.cast_shadow);
        assert!(child.receive_shadow);
        assert_eq!(child.ancestry, parent.ancestry);
    }

    #[test]
    fn test_translate_then_rotate_matrix() {
        let mut transform = Transform::identity();
        apply_transforms(
            &mut transform,
            &serde_json::from_value::<Vec<TransformDef>>(json!([
                {"type": "translate", "amount": {"x": 1, "y": 0, "z": 0}},
                {"type": "rotate", "amount": {"x": 0, "y": 90, "z": 0}}
            ]))
            .unwrap(),
        );

        let expected = Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)) * Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(transform.to_matrix(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_self_reference_is_cycle_not_overflow() {
        let section = graph(json!({
            "rootid": "root",
            "root": {"type": "node", "children": {"nodesList": ["loop"]}},
            "loop": {"type": "node", "children": {"nodesList": ["loop"]}}
        }));

        let (root, diagnostics) = build(&section);
        assert_eq!(root.children.len(), 1);
        assert!(matches!(
            &diagnostics[..],
            [CompileError::CyclicReference { node_id, reference }] if node_id == "loop" && reference == "loop"
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut nodes = serde_json::Map::new();
        nodes.insert("rootid".into(), json!("n0"));
        for i in 0..20 {
            nodes.insert(format!("n{i}"), json!({"type": "node", "children": {"nodesList": [format!("n{}", i + 1)]}}));
        }
        nodes.insert("n20".into(), json!({"type": "node"}));

        let (_, diagnostics) = build(&graph(Value::Object(nodes)));
        assert!(matches!(&diagnostics[..], [CompileError::DepthExceeded { max_depth: 16, .. }]));
    }

    #[test]
    fn test_inline_group_rejected() {
        let section = graph(json!({
            "rootid": "root",
            "root": {"type": "node", "children": {
                "inner": {"type": "node"},
                "ball": {"type": "sphere", "radius": 1, "slices": 8, "stacks": 8}
            }}
        }));

        let (root, diagnostics) = build(&section);
        assert_eq!(root.children.len(), 1);
        assert!(matches!(&diagnostics[..], [CompileError::NestedGroup { child_id, .. }] if child_id == "inner"));
    }
}
