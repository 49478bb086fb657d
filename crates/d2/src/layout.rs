//! Mutable layout state: fixed pieces, the placement adjacency graph and the
//! running aggregates.

use std::collections::{BTreeMap, BTreeSet};

use crate::point::Point;
use crate::polygon::{convex_hull, Polygon};

/// Stable identifier of a fixed piece in the adjacency graph.
pub type NodeId = usize;

/// The plate's node. Every layout has it and it is never removed.
pub const PLATE_NODE: NodeId = 0;

/// Undirected graph recording which fixed piece each placement attached to.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Default for AdjacencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjacencyGraph {
    /// A graph holding only the plate node.
    pub fn new() -> Self {
        let mut adjacency = BTreeMap::new();
        adjacency.insert(PLATE_NODE, Vec::new());
        Self { adjacency }
    }

    /// Adds an isolated node.
    pub fn add_node(&mut self, node: NodeId) {
        self.adjacency.entry(node).or_default();
    }

    /// Adds the edge `a <-> b`. Both nodes must exist.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        debug_assert!(self.contains(a) && self.contains(b), "edge to missing node");
        for (from, to) in [(a, b), (b, a)] {
            if let Some(list) = self.adjacency.get_mut(&from) {
                if !list.contains(&to) {
                    list.push(to);
                }
            }
        }
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, node: NodeId) {
        debug_assert_ne!(node, PLATE_NODE, "the plate node cannot be removed");
        if let Some(neighbors) = self.adjacency.remove(&node) {
            for n in neighbors {
                if let Some(list) = self.adjacency.get_mut(&n) {
                    list.retain(|&x| x != node);
                }
            }
        }
    }

    /// Neighbors of `node`, in insertion order.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map_or(&[], |v| v.as_slice())
    }

    /// Returns true if the node exists.
    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Number of nodes, plate included.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns true if only the plate remains.
    pub fn is_empty(&self) -> bool {
        self.adjacency.len() <= 1
    }

    /// Checks that every edge is mirrored and points to an existing node.
    pub fn is_consistent(&self) -> bool {
        self.adjacency.iter().all(|(&a, list)| {
            list.iter()
                .all(|&b| self.adjacency.get(&b).is_some_and(|back| back.contains(&a)))
        })
    }
}

/// A placed piece.
#[derive(Debug, Clone)]
pub struct FixedPiece {
    /// Graph node of this piece.
    pub node: NodeId,
    /// Index of the piece template it instantiates.
    pub piece: usize,
    /// Placed outline.
    pub polygon: Polygon,
}

/// Pieces fixed on the plate plus derived aggregates.
///
/// Pieces are kept in placement order, which is also increasing node order.
#[derive(Debug, Clone)]
pub struct Layout {
    pieces: Vec<FixedPiece>,
    graph: AdjacencyGraph,
    fixed_area: f64,
    hull: Option<Polygon>,
    track_hull: bool,
    next_node: NodeId,
}

impl Layout {
    /// An empty layout. The convex hull of the fixed pieces is maintained only
    /// when `track_hull` is set.
    pub fn new(track_hull: bool) -> Self {
        Self {
            pieces: Vec::new(),
            graph: AdjacencyGraph::new(),
            fixed_area: 0.0,
            hull: None,
            track_hull,
            next_node: PLATE_NODE + 1,
        }
    }

    /// Removes every piece.
    pub fn clear(&mut self) {
        *self = Self::new(self.track_hull);
    }

    /// Fixed pieces in placement order.
    pub fn pieces(&self) -> &[FixedPiece] {
        &self.pieces
    }

    /// The adjacency graph.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// Number of fixed pieces, plate excluded.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if no piece is fixed.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Total area of the fixed pieces.
    pub fn fixed_area(&self) -> f64 {
        self.fixed_area
    }

    /// Convex hull of every fixed vertex, when tracked and non-empty.
    pub fn hull(&self) -> Option<&Polygon> {
        self.hull.as_ref()
    }

    /// Looks up a fixed piece by node.
    pub fn get(&self, node: NodeId) -> Option<&FixedPiece> {
        self.pieces
            .binary_search_by_key(&node, |p| p.node)
            .ok()
            .map(|i| &self.pieces[i])
    }

    /// Instances of piece template `piece` currently fixed.
    pub fn count_of(&self, piece: usize) -> usize {
        self.pieces.iter().filter(|p| p.piece == piece).count()
    }

    /// Largest x over every fixed vertex, `+inf` for an empty layout.
    pub fn extent(&self) -> f64 {
        if self.pieces.is_empty() {
            return f64::INFINITY;
        }
        self.pieces
            .iter()
            .map(|p| p.polygon.bbox().max_x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Fixes `polygon` as an instance of `piece`, attached to `anchor`.
    pub fn push(&mut self, piece: usize, polygon: Polygon, anchor: NodeId) -> NodeId {
        let node = self.next_node;
        self.next_node += 1;

        self.fixed_area += polygon.area();
        if self.track_hull {
            let mut points: Vec<Point> = self
                .hull
                .as_ref()
                .map(|h| h.vertices().to_vec())
                .unwrap_or_default();
            points.extend_from_slice(polygon.vertices());
            self.hull = Some(convex_hull(points));
        }

        self.graph.add_node(node);
        self.graph.add_edge(node, anchor);
        self.pieces.push(FixedPiece {
            node,
            piece,
            polygon,
        });
        node
    }

    /// Removes the given nodes and recomputes the aggregates from scratch.
    pub fn remove_nodes(&mut self, removed: &BTreeSet<NodeId>) {
        debug_assert!(!removed.contains(&PLATE_NODE), "the plate cannot be removed");
        if removed.is_empty() {
            return;
        }

        self.pieces.retain(|p| !removed.contains(&p.node));
        for &node in removed {
            self.graph.remove_node(node);
        }

        self.fixed_area = self.pieces.iter().map(|p| p.polygon.area()).sum();
        if self.track_hull {
            let points: Vec<Point> = self
                .pieces
                .iter()
                .flat_map(|p| p.polygon.vertices().iter().copied())
                .collect();
            self.hull = (!points.is_empty()).then(|| convex_hull(points));
        }
        debug_assert!(self.graph.is_consistent());
    }
}
