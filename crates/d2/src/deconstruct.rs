//! Destroy operator: removes a connected region of the layout.

use std::collections::{BTreeSet, VecDeque};

use ignest_core::Deadline;
use rand::rngs::StdRng;
use rand::Rng;

use crate::layout::{Layout, NodeId, PLATE_NODE};

/// Removes fixed pieces reachable from a random seed in the adjacency graph
/// until their combined area reaches `target_area`.
///
/// The traversal is breadth-first and never enters the plate node. When the
/// current component is exhausted before the target is met, a new random
/// position is drawn and the first unvisited piece from there in placement
/// order (wrapping around) seeds a new traversal. Stops early when every piece
/// is gone or the deadline passes.
///
/// Returns the removed nodes. The layout's aggregates are recomputed.
pub fn deconstruct(
    layout: &mut Layout,
    target_area: f64,
    rng: &mut StdRng,
    deadline: &Deadline,
) -> BTreeSet<NodeId> {
    let mut removed = BTreeSet::new();
    let total = layout.len();
    if total == 0 || target_area <= 0.0 {
        return removed;
    }

    let nodes: Vec<NodeId> = layout.pieces().iter().map(|p| p.node).collect();
    let seed_pos = rng.gen_range(0..total);
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut queue = VecDeque::new();
    let mut area = 0.0;

    visited.insert(nodes[seed_pos]);
    queue.push_back(nodes[seed_pos]);

    while area < target_area && removed.len() < total && !deadline.expired() {
        let node = match queue.pop_front() {
            Some(node) => node,
            None => {
                // Component exhausted, reseed from a random position
                let start = rng.gen_range(0..total);
                let next = (0..total)
                    .map(|step| (start + step) % total)
                    .find(|&pos| !visited.contains(&nodes[pos]));
                match next {
                    Some(pos) => {
                        visited.insert(nodes[pos]);
                        nodes[pos]
                    }
                    None => break,
                }
            }
        };

        if let Some(piece) = layout.get(node) {
            area += piece.polygon.area();
        }
        removed.insert(node);

        for &next in layout.graph().neighbors(node) {
            if next != PLATE_NODE && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    log::debug!(
        "deconstruct: removed {} of {} pieces, area {:.4} (target {:.4})",
        removed.len(),
        total,
        area,
        target_area
    );
    layout.remove_nodes(&removed);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Polygon;
    use rand::SeedableRng;

    fn square_at(x: f64, y: f64) -> Polygon {
        Polygon::from_tuples([(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)])
    }

    /// A row of `n` unit squares, each attached to its left neighbor.
    fn chain(n: usize) -> Layout {
        let mut layout = Layout::new(true);
        let mut anchor = PLATE_NODE;
        for i in 0..n {
            anchor = layout.push(0, square_at(i as f64, 0.0), anchor);
        }
        layout
    }

    #[test]
    fn test_removes_until_target_area() {
        let mut layout = chain(10);
        let mut rng = StdRng::seed_from_u64(7);
        let removed = deconstruct(&mut layout, 4.0, &mut rng, &Deadline::unlimited());

        assert_eq!(removed.len(), 4);
        assert_eq!(layout.len(), 6);
        assert!((layout.fixed_area() - 6.0).abs() < 1e-12);
        assert!(!removed.contains(&PLATE_NODE));
        assert!(layout.graph().is_consistent());
    }

    #[test]
    fn test_removed_region_is_connected_in_a_chain() {
        for seed in 0..20 {
            let mut layout = chain(12);
            let mut rng = StdRng::seed_from_u64(seed);
            let removed = deconstruct(&mut layout, 3.0, &mut rng, &Deadline::unlimited());

            // In a path graph a connected region is a run of consecutive nodes
            let ids: Vec<NodeId> = removed.iter().copied().collect();
            assert_eq!(ids.len(), 3);
            assert!(ids.windows(2).all(|w| w[1] == w[0] + 1), "seed {seed}: {ids:?}");
        }
    }

    #[test]
    fn test_unreachable_target_removes_everything() {
        let mut layout = chain(3);
        let mut rng = StdRng::seed_from_u64(1);
        let removed = deconstruct(&mut layout, 100.0, &mut rng, &Deadline::unlimited());

        assert_eq!(removed.len(), 3);
        assert!(layout.is_empty());
        assert_eq!(layout.fixed_area(), 0.0);
        assert!(layout.hull().is_none());
        assert_eq!(layout.graph().len(), 1);
    }

    #[test]
    fn test_jumps_between_components() {
        // Two pieces attached only to the plate form separate components
        let mut layout = Layout::new(false);
        layout.push(0, square_at(0.0, 0.0), PLATE_NODE);
        layout.push(0, square_at(5.0, 0.0), PLATE_NODE);
        let mut rng = StdRng::seed_from_u64(3);

        let removed = deconstruct(&mut layout, 2.0, &mut rng, &Deadline::unlimited());
        assert_eq!(removed.len(), 2);
        assert!(layout.is_empty());
    }

    #[test]
    fn test_reseeds_across_many_components() {
        // Ten isolated pieces, each its own component
        for seed in 0..10 {
            let mut layout = Layout::new(false);
            for i in 0..10 {
                layout.push(0, square_at(2.0 * i as f64, 0.0), PLATE_NODE);
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let removed = deconstruct(&mut layout, 4.0, &mut rng, &Deadline::unlimited());

            assert_eq!(removed.len(), 4, "seed {seed}");
            assert_eq!(layout.len(), 6);
            assert!(layout.graph().is_consistent());
        }
    }

    #[test]
    fn test_expired_deadline_removes_nothing() {
        let deadline = Deadline::start(1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(deadline.expired());

        let mut layout = chain(6);
        let mut rng = StdRng::seed_from_u64(9);
        let removed = deconstruct(&mut layout, 3.0, &mut rng, &deadline);

        assert!(removed.is_empty());
        assert_eq!(layout.len(), 6);
        assert!((layout.fixed_area() - 6.0).abs() < 1e-12);
        assert!((layout.hull().expect("pieces left").area() - 6.0).abs() < 1e-12);
        assert!(layout.graph().is_consistent());
        assert_eq!(layout.graph().len(), 7);
    }

    #[test]
    fn test_empty_layout_and_zero_target() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut empty = Layout::new(false);
        assert!(deconstruct(&mut empty, 1.0, &mut rng, &Deadline::unlimited()).is_empty());

        let mut layout = chain(4);
        assert!(deconstruct(&mut layout, 0.0, &mut rng, &Deadline::unlimited()).is_empty());
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn test_hull_recomputed_after_removal() {
        let mut layout = chain(2);
        let mut rng = StdRng::seed_from_u64(11);
        let removed = deconstruct(&mut layout, 1.0, &mut rng, &Deadline::unlimited());
        assert_eq!(removed.len(), 1);

        let hull = layout.hull().expect("one piece left");
        assert!((hull.area() - 1.0).abs() < 1e-12);
    }
}
