//! Owned scene hierarchy.
//!
//! Children are owned exclusively by their parent until detached, so the
//! tree needs no reference counting or parent back-pointers. Teardown
//! consumes the tree in post-order with an explicit stack, which keeps
//! arbitrarily deep hierarchies off the call stack.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::core::sync::lock_recover;
use crate::resources::traits::Disposable;

/// Material binding of a node: one material or an ordered list
#[derive(Clone)]
pub enum MaterialSlot {
    Single(Arc<dyn Disposable>),
    List(Vec<Arc<dyn Disposable>>),
}

impl MaterialSlot {
    /// Members in binding order
    pub fn members(&self) -> Vec<Arc<dyn Disposable>> {
        match self {
            MaterialSlot::Single(material) => vec![Arc::clone(material)],
            MaterialSlot::List(materials) => materials.clone(),
        }
    }
}

impl fmt::Debug for MaterialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialSlot::Single(m) => write!(f, "Single({})", m.label()),
            MaterialSlot::List(ms) => f
                .debug_list()
                .entries(ms.iter().map(|m| m.label()))
                .finish(),
        }
    }
}

/// A node of the scene graph
pub struct SceneNode {
    name: String,
    geometry: Option<Arc<dyn Disposable>>,
    material: Option<MaterialSlot>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
            material: None,
            children: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: Arc<dyn Disposable>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_material(mut self, material: MaterialSlot) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> Option<&Arc<dyn Disposable>> {
        self.geometry.as_ref()
    }

    pub fn material(&self) -> Option<&MaterialSlot> {
        self.material.as_ref()
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Number of nodes in this subtree, this node included
    pub fn subtree_len(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }

    /// Consume the subtree, yielding every node after all of its children.
    /// Yielded nodes have no children left; siblings keep insertion order.
    pub fn into_post_order(self) -> PostOrder {
        PostOrder {
            stack: vec![(self, false)],
        }
    }
}

impl Drop for SceneNode {
    // Flatten before dropping so deep chains do not recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("geometry", &self.geometry.as_ref().map(|g| g.label()))
            .field("material", &self.material)
            .field("children", &self.children)
            .finish()
    }
}

/// Post-order consuming traversal, see [`SceneNode::into_post_order`]
pub struct PostOrder {
    stack: Vec<(SceneNode, bool)>,
}

impl Iterator for PostOrder {
    type Item = SceneNode;

    fn next(&mut self) -> Option<SceneNode> {
        while let Some((mut node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node);
            }
            let children = std::mem::take(&mut node.children);
            self.stack.push((node, true));
            self.stack
                .extend(children.into_iter().rev().map(|child| (child, false)));
        }
        None
    }
}

/// A registered scene: the root node plus an optional dispose hook
pub struct Scene {
    root: Mutex<SceneNode>,
    dispose_hook: Option<Arc<dyn Disposable>>,
}

impl Scene {
    pub fn new(root: SceneNode) -> Self {
        Self {
            root: Mutex::new(root),
            dispose_hook: None,
        }
    }

    pub fn with_dispose_hook(mut self, hook: Arc<dyn Disposable>) -> Self {
        self.dispose_hook = Some(hook);
        self
    }

    pub fn name(&self) -> String {
        lock_recover(&self.root).name.clone()
    }

    pub fn add(&self, child: SceneNode) {
        lock_recover(&self.root).add(child);
    }

    /// Nodes currently in the graph, root included
    pub fn node_count(&self) -> usize {
        lock_recover(&self.root).subtree_len()
    }

    pub fn dispose_hook(&self) -> Option<&Arc<dyn Disposable>> {
        self.dispose_hook.as_ref()
    }

    /// Take the whole graph out, leaving an empty root with the same name
    pub fn detach_root(&self) -> SceneNode {
        let mut root = lock_recover(&self.root);
        let name = root.name.clone();
        std::mem::replace(&mut *root, SceneNode::new(name))
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("root", &*lock_recover(&self.root))
            .field("has_dispose_hook", &self.dispose_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(root: SceneNode) -> Vec<String> {
        root.into_post_order().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn test_post_order_visits_children_before_parent() {
        let root = SceneNode::new("root")
            .with_child(
                SceneNode::new("a")
                    .with_child(SceneNode::new("a1"))
                    .with_child(SceneNode::new("a2")),
            )
            .with_child(SceneNode::new("b"));

        assert_eq!(names(root), vec!["a1", "a2", "a", "b", "root"]);
    }

    #[test]
    fn test_post_order_yields_detached_nodes() {
        let root = SceneNode::new("root").with_child(SceneNode::new("child"));
        for node in root.into_post_order() {
            assert!(node.children().is_empty());
        }
    }

    #[test]
    fn test_deep_hierarchy_does_not_recurse() {
        let mut node = SceneNode::new("leaf");
        for depth in 0..100_000 {
            node = SceneNode::new(format!("n{}", depth)).with_child(node);
        }
        assert_eq!(node.subtree_len(), 100_001);

        let mut visited = 0;
        let mut first = None;
        for n in node.into_post_order() {
            if first.is_none() {
                first = Some(n.name().to_string());
            }
            visited += 1;
        }
        assert_eq!(visited, 100_001);
        assert_eq!(first.as_deref(), Some("leaf"));
    }

    #[test]
    fn test_dropping_deep_hierarchy() {
        let mut node = SceneNode::new("leaf");
        for depth in 0..100_000 {
            node = SceneNode::new(format!("n{}", depth)).with_child(node);
        }
        drop(node);
    }

    #[test]
    fn test_detach_root_empties_scene() {
        let scene = Scene::new(
            SceneNode::new("world")
                .with_child(SceneNode::new("a"))
                .with_child(SceneNode::new("b")),
        );
        assert_eq!(scene.node_count(), 3);

        let root = scene.detach_root();
        assert_eq!(root.children().len(), 2);
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.name(), "world");
    }
}
