//! Search tree storage
//!
//! A tree is an append-only arena: configurations and vertex records are
//! stored in parallel vectors indexed by `VertexId`, and each vertex keeps
//! the id of its parent. Vertices are never removed, so ids stay valid for
//! the life of the tree.

use crate::common::{Configuration, TreeRole, VertexId};

/// Per-vertex bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    /// Incoming edge; `None` only for the root
    pub parent: Option<VertexId>,
    /// `f64::INFINITY` unless the vertex was marked as boundary
    pub boundary_radius: f64,
    /// Failed extension attempts through this vertex
    pub fail_count: u32,
}

impl Vertex {
    fn new(id: VertexId, parent: Option<VertexId>) -> Self {
        Vertex {
            id,
            parent,
            boundary_radius: f64::INFINITY,
            fail_count: 0,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary_radius.is_finite()
    }
}

/// One of the two search trees
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    role: TreeRole,
    vertices: Vec<Vertex>,
    configurations: Vec<Configuration>,
}

impl Tree {
    /// Create a tree holding a single root vertex
    pub fn with_root(role: TreeRole, root: Configuration) -> Self {
        Tree {
            role,
            vertices: vec![Vertex::new(VertexId(0), None)],
            configurations: vec![root],
        }
    }

    pub fn role(&self) -> TreeRole {
        self.role
    }

    pub fn root(&self) -> VertexId {
        VertexId(0)
    }

    pub fn root_configuration(&self) -> &Configuration {
        &self.configurations[0]
    }

    /// Append a vertex together with the edge `parent -> vertex`
    pub fn add_child(&mut self, parent: VertexId, q: Configuration) -> VertexId {
        debug_assert!(parent.index() < self.vertices.len(), "parent not in tree");
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(id, Some(parent)));
        self.configurations.push(q);
        id
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a tree starts with its root
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn configuration(&self, id: VertexId) -> &Configuration {
        &self.configurations[id.index()]
    }

    pub fn parent(&self, id: VertexId) -> Option<VertexId> {
        self.vertices[id.index()].parent
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vertex, &Configuration)> {
        self.vertices.iter().zip(self.configurations.iter())
    }

    /// Edges as `(parent, child)` pairs in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices
            .iter()
            .filter_map(|v| v.parent.map(|parent| (parent, v.id)))
    }

    /// Vertex ids from `id` up to and including the root
    pub fn path_to_root(&self, id: VertexId) -> Vec<VertexId> {
        let mut ids = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            ids.push(parent);
            current = parent;
        }
        ids
    }

    /// Give the vertex the search's boundary radius
    pub fn mark_boundary(&mut self, id: VertexId, radius: f64) {
        self.vertices[id.index()].boundary_radius = radius;
    }

    pub fn record_failure(&mut self, id: VertexId) {
        self.vertices[id.index()].fail_count += 1;
    }

    pub fn is_exhausted(&self, id: VertexId, limit: u32) -> bool {
        self.vertices[id.index()].fail_count >= limit
    }

    pub fn boundary_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_boundary()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn q(x: f64, y: f64) -> Configuration {
        DVector::from_vec(vec![x, y])
    }

    fn chain() -> Tree {
        let mut tree = Tree::with_root(TreeRole::Start, q(0.0, 0.0));
        let a = tree.add_child(tree.root(), q(1.0, 0.0));
        let b = tree.add_child(a, q(2.0, 0.0));
        tree.add_child(tree.root(), q(0.0, 1.0));
        tree.add_child(b, q(3.0, 0.0));
        tree
    }

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = Tree::with_root(TreeRole::Goal, q(5.0, 5.0));
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.role(), TreeRole::Goal);
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.root_configuration(), &q(5.0, 5.0));
        assert_eq!(tree.edges().count(), 0);
    }

    #[test]
    fn test_every_non_root_has_one_parent() {
        let tree = chain();
        assert_eq!(tree.edges().count(), tree.len() - 1);
        for (vertex, _) in tree.iter().skip(1) {
            let parent = vertex.parent.unwrap();
            assert!(parent < vertex.id);
        }
    }

    #[test]
    fn test_path_to_root() {
        let tree = chain();
        let ids = tree.path_to_root(VertexId(4));
        assert_eq!(ids, vec![VertexId(4), VertexId(2), VertexId(1), VertexId(0)]);
        assert_eq!(tree.path_to_root(tree.root()), vec![VertexId(0)]);
    }

    #[test]
    fn test_new_vertex_state() {
        let tree = chain();
        for (vertex, _) in tree.iter() {
            assert_eq!(vertex.fail_count, 0);
            assert_eq!(vertex.boundary_radius, f64::INFINITY);
            assert!(!vertex.is_boundary());
        }
    }

    #[test]
    fn test_boundary_and_exhaustion() {
        let mut tree = chain();
        let v = VertexId(2);
        tree.mark_boundary(v, 1.5);
        assert!(tree.vertex(v).is_boundary());
        assert_eq!(tree.vertex(v).boundary_radius, 1.5);
        assert_eq!(tree.boundary_count(), 1);

        for _ in 0..3 {
            assert!(!tree.is_exhausted(v, 3));
            tree.record_failure(v);
        }
        assert!(tree.is_exhausted(v, 3));
        assert_eq!(tree.vertex(v).fail_count, 3);
    }
}
