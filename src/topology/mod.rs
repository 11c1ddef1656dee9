pub mod edge;
pub mod subset;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use subset::{SubsetAllocator, SubsetInfo, SubsetTable};
pub use vertex::{VertexData, VertexId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns the converted morphology: vertices, edges and the
/// subset table.
///
/// Entities reference each other via typed IDs (generational indices).
/// Iteration follows creation order, which is also the order exporters write.
#[derive(Debug, Default)]
pub struct MorphologyGraph {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    vertex_order: Vec<VertexId>,
    edge_order: Vec<EdgeId>,
    subsets: SubsetTable,
}

impl MorphologyGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every vertex, edge and subset.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.vertex_order.clear();
        self.edge_order.clear();
        self.subsets.clear();
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3, diameter: f64, subset: usize) -> VertexId {
        let id = self.vertices.insert(VertexData::new(point, diameter, subset));
        self.vertex_order.push(id);
        id
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Iterates vertices in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> + '_ {
        self.vertex_order
            .iter()
            .filter_map(|&id| self.vertices.get(id).map(|v| (id, v)))
    }

    /// Iterates the vertices assigned to `subset`, in creation order.
    pub fn vertices_in_subset(
        &self,
        subset: usize,
    ) -> impl Iterator<Item = (VertexId, &VertexData)> + '_ {
        self.vertices().filter(move |(_, v)| v.subset == subset)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Keeps only the vertices for which `keep` returns `true`.
    ///
    /// Edges referencing removed vertices must be dropped by the caller.
    pub(crate) fn retain_vertices(&mut self, mut keep: impl FnMut(VertexId, &VertexData) -> bool) {
        self.vertices.retain(|id, v| keep(id, v));
        let vertices = &self.vertices;
        self.vertex_order.retain(|&id| vertices.contains_key(id));
    }

    // --- Edge operations ---

    /// Inserts an edge between two existing vertices and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not in the graph.
    pub fn add_edge(
        &mut self,
        start: VertexId,
        end: VertexId,
        subset: usize,
    ) -> Result<EdgeId, TopologyError> {
        self.vertex(start)?;
        self.vertex(end)?;
        let id = self.edges.insert(EdgeData::new(start, end, subset));
        self.edge_order.push(id);
        Ok(id)
    }

    /// Iterates edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> + '_ {
        self.edge_order
            .iter()
            .filter_map(|&id| self.edges.get(id).map(|e| (id, e)))
    }

    /// Iterates the edges assigned to `subset`, in creation order.
    pub fn edges_in_subset(&self, subset: usize) -> impl Iterator<Item = (EdgeId, &EdgeData)> + '_ {
        self.edges().filter(move |(_, e)| e.subset == subset)
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Applies `f` to every edge in creation order, keeping the edge when it
    /// returns `true`.
    pub(crate) fn retain_edges(&mut self, mut f: impl FnMut(EdgeId, &mut EdgeData) -> bool) {
        let mut removed = Vec::new();
        for &id in &self.edge_order {
            if let Some(edge) = self.edges.get_mut(id) {
                if !f(id, edge) {
                    removed.push(id);
                }
            }
        }
        for id in removed {
            self.edges.remove(id);
        }
        let edges = &self.edges;
        self.edge_order.retain(|&id| edges.contains_key(id));
    }

    // --- Subset operations ---

    /// Returns the subset table.
    #[must_use]
    pub fn subsets(&self) -> &SubsetTable {
        &self.subsets
    }

    /// Returns the subset table mutably.
    pub fn subsets_mut(&mut self) -> &mut SubsetTable {
        &mut self.subsets
    }

    /// Rewrites the subset of every vertex and edge through `f`.
    pub(crate) fn reassign_subsets(&mut self, mut f: impl FnMut(usize) -> usize) {
        for v in self.vertices.values_mut() {
            v.subset = f(v.subset);
        }
        for e in self.edges.values_mut() {
            e.subset = f(e.subset);
        }
    }
}
