//! Random-placement baseline.

use ignest_core::SearchStats;
use rand::rngs::StdRng;
use rand::Rng;

use crate::greedy_nesting::commit;
use crate::instance::{FloatingPiece, PieceSpec};
use crate::layout::Layout;
use crate::placement::PlacementSearch;

/// One baseline step: draws a floating entry and one of its angles uniformly,
/// then fixes the piece at the first feasible alignment. An entry whose draw
/// finds no alignment leaves the pool.
///
/// Returns true if a piece was fixed.
pub fn place_random(
    search: &PlacementSearch<'_>,
    pieces: &[PieceSpec],
    floating: &mut Vec<FloatingPiece>,
    layout: &mut Layout,
    stats: &mut SearchStats,
    rng: &mut StdRng,
) -> bool {
    if floating.is_empty() {
        return false;
    }

    let index = rng.gen_range(0..floating.len());
    let spec = &pieces[floating[index].piece];
    let angle = if spec.angles.is_empty() {
        0.0
    } else {
        spec.angles[rng.gen_range(0..spec.angles.len())]
    };

    let placement = search.first_feasible(index, &spec.polygon, angle, layout, stats);
    if placement.is_none() {
        log::debug!("random placement: dropping piece {}", floating[index].piece);
        floating.remove(index);
        return false;
    }
    commit(placement, Vec::new(), floating, layout).is_some()
}
