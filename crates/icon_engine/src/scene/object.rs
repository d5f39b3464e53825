//! Renderable object graphs
//!
//! A [`SceneObject`] is a small transform hierarchy stored as a node arena.
//! Node 0 is always the root; every other node refers to a parent that was
//! added before it, so world matrices can be resolved in a single forward pass.

use std::sync::Arc;

use thiserror::Error;

use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::render::{material::Material, mesh::Mesh};
use crate::scene::bounds::BoundingVolume;

/// Errors raised while editing an object graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Node id does not belong to this object
    #[error("node {0} does not exist in '{1}'")]
    UnknownNode(usize, String),
}

/// Index of a node inside a [`SceneObject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Mesh plus material attached to a node
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    /// Shared geometry
    pub mesh: Arc<Mesh>,
    /// Surface material
    pub material: Material,
}

impl MeshRenderer {
    /// Create a new mesh renderer
    pub fn new(mesh: Arc<Mesh>, material: Material) -> Self {
        Self { mesh, material }
    }
}

/// One node of an object graph
///
/// The parent link is fixed when the node is added, so a hierarchy can only
/// be built through [`SceneObject::add_child`]:
///
/// ```compile_fail
/// use icon_engine::scene::SceneObject;
/// use icon_engine::foundation::math::Transform;
///
/// let mut object = SceneObject::new("Loop");
/// let child = object.add_child(object.root_id(), "Child", Transform::identity()).unwrap();
/// object.root_mut().parent = Some(child);
/// ```
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, used by animation track paths
    pub name: String,
    parent: Option<NodeId>,
    /// Transform relative to the parent
    pub local: Transform,
    /// Optional renderable part
    pub renderer: Option<MeshRenderer>,
}

/// Renderable part resolved to world space
#[derive(Debug, Clone, Copy)]
pub struct WorldPart<'a> {
    /// Node carrying the part
    pub node: NodeId,
    /// Mesh renderer of the node
    pub renderer: &'a MeshRenderer,
    /// Local-to-world matrix of the node
    pub world: Mat4,
}

impl SceneNode {
    /// Parent node, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A transform hierarchy with optional mesh renderers on its nodes
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    nodes: Vec<SceneNode>,
}

impl SceneObject {
    /// Create an object with a single root node at the origin
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            nodes: vec![SceneNode {
                name: name.clone(),
                parent: None,
                local: Transform::identity(),
                renderer: None,
            }],
            name,
        }
    }

    /// Create a single-node object that renders one mesh
    pub fn with_mesh(name: impl Into<String>, mesh: Arc<Mesh>, material: Material) -> Self {
        let mut object = Self::new(name);
        object.root_mut().renderer = Some(MeshRenderer::new(mesh, material));
        object
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the root node
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Root node
    pub fn root(&self) -> &SceneNode {
        &self.nodes[0]
    }

    /// Mutable root node
    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.nodes[0]
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Attach a new child node under `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent.0, self.name.clone()));
        }
        self.nodes.push(SceneNode {
            name: name.into(),
            parent: Some(parent),
            local,
            renderer: None,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Resolve a slash-separated path of node names below the root
    ///
    /// The empty path names the root itself. `"Arm/Hand"` finds the child
    /// `Hand` of the root's child `Arm`.
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root_id(), |current, segment| {
                self.nodes
                    .iter()
                    .position(|n| n.parent == Some(current) && n.name == segment)
                    .map(NodeId)
            })
    }

    /// Local-to-world matrices of every node, indexed like the arena
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut worlds: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.local.to_matrix();
            let world = match node.parent {
                Some(parent) => worlds[parent.0] * local,
                None => local,
            };
            worlds.push(world);
        }
        worlds
    }

    /// World-space position of the root node
    pub fn origin(&self) -> Vec3 {
        self.root().local.position
    }

    /// Every node with a non-empty mesh, resolved to world space
    pub fn world_parts(&self) -> Vec<WorldPart<'_>> {
        let worlds = self.world_matrices();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| {
                let renderer = node.renderer.as_ref()?;
                (!renderer.mesh.is_empty()).then_some(WorldPart {
                    node: NodeId(i),
                    renderer,
                    world: worlds[i],
                })
            })
            .collect()
    }

    /// World-space bounds of each renderable part
    ///
    /// Each part's bounds are the eight corners of its mesh's local box
    /// carried through the part's world matrix.
    pub fn part_bounds(&self) -> Vec<BoundingVolume> {
        self.world_parts()
            .iter()
            .filter_map(|part| {
                let (min, max) = part.renderer.mesh.local_bounds()?;
                let corners = (0..8).map(|i| {
                    let corner = Point3::new(
                        if i & 1 == 0 { min.x } else { max.x },
                        if i & 2 == 0 { min.y } else { max.y },
                        if i & 4 == 0 { min.z } else { max.z },
                    );
                    part.world.transform_point(&corner).coords
                });
                let (lo, hi) = corners.fold(
                    (Vec3::repeat(f32::INFINITY), Vec3::repeat(f32::NEG_INFINITY)),
                    |(lo, hi), p| (lo.inf(&p), hi.sup(&p)),
                );
                Some(BoundingVolume::from_min_max(lo, hi))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three_level_object() -> (SceneObject, NodeId, NodeId) {
        let mut object = SceneObject::new("Crane");
        let arm = object
            .add_child(object.root_id(), "Arm", Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();
        let hook = object
            .add_child(arm, "Hook", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        (object, arm, hook)
    }

    #[test]
    fn test_find_by_path() {
        let (object, arm, hook) = three_level_object();
        assert_eq!(object.find_by_path(""), Some(object.root_id()));
        assert_eq!(object.find_by_path("Arm"), Some(arm));
        assert_eq!(object.find_by_path("Arm/Hook"), Some(hook));
        assert_eq!(object.find_by_path("Hook"), None);
        assert_eq!(object.find_by_path("Arm/Missing"), None);
    }

    #[test]
    fn test_world_matrices_chain_parents() {
        let (mut object, _, hook) = three_level_object();
        object.root_mut().local = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));

        let worlds = object.world_matrices();
        let hook_origin = worlds[hook.index()].transform_point(&Point3::origin());
        assert_relative_eq!(hook_origin, Point3::new(11.0, 2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_add_child_rejects_foreign_node() {
        let mut object = SceneObject::new("Small");
        let err = object
            .add_child(NodeId(7), "Orphan", Transform::identity())
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(7, "Small".to_string()));
    }

    #[test]
    fn test_parents_precede_children() {
        let (mut object, arm, hook) = three_level_object();
        let tip = object.add_child(hook, "Tip", Transform::identity()).unwrap();
        object.add_child(arm, "Counterweight", Transform::identity()).unwrap();

        assert_eq!(object.root().parent(), None);
        assert_eq!(object.node(tip).unwrap().parent(), Some(hook));
        for index in 1..object.node_count() {
            let parent = object.node(NodeId(index)).unwrap().parent().unwrap();
            assert!(parent.index() < index);
        }
        assert_eq!(object.world_matrices().len(), object.node_count());
    }

    #[test]
    fn test_part_bounds_follow_scale() {
        let mut object = SceneObject::with_mesh("Box", Arc::new(Mesh::unit_cube()), Material::new());
        object.root_mut().local = Transform::identity().with_scale(Vec3::new(2.0, 4.0, 1.0));

        let parts = object.part_bounds();
        assert_eq!(parts.len(), 1);
        assert_relative_eq!(parts[0].size, Vec3::new(2.0, 4.0, 1.0), epsilon = 1e-6);
    }
}
