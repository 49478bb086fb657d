//! Run-ready problem data: the sampled plate, piece templates with their
//! resolved angle lists, and the floating pool.

use ignest_core::{Config, Geometry, GeometryId, RotationConstraint};

use crate::boundary::Boundary2D;
use crate::geometry::Geometry2D;
use crate::layout::Layout;
use crate::polygon::Polygon;

/// A piece template ready for placement.
#[derive(Debug, Clone)]
pub struct PieceSpec {
    /// Id of the geometry it came from.
    pub id: GeometryId,
    /// Outline, super-sampled when configured.
    pub polygon: Polygon,
    /// Candidate rotations in radians.
    pub angles: Vec<f64>,
    /// Instances requested.
    pub quantity: usize,
}

/// An entry of the floating pool: a piece template and how many instances
/// are still waiting for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingPiece {
    /// Index into [`NestingInstance::pieces`].
    pub piece: usize,
    /// Instances left.
    pub remaining: usize,
}

/// Plate and pieces prepared once per run.
#[derive(Debug, Clone)]
pub struct NestingInstance {
    plate: Boundary2D,
    pieces: Vec<PieceSpec>,
    /// Piece indices sorted by decreasing area, ties in input order.
    order: Vec<usize>,
}

impl NestingInstance {
    /// Applies super-sampling and the global rotation sweep from `config`.
    pub fn prepare(geometries: &[Geometry2D], boundary: &Boundary2D, config: &Config) -> Self {
        let plate = boundary.super_sampled(config.plate_super_sample);
        let sweep = (config.rotation_step_deg > 0.0)
            .then(|| RotationConstraint::every_deg(config.rotation_step_deg).angles());

        let pieces: Vec<PieceSpec> = geometries
            .iter()
            .map(|g| PieceSpec {
                id: g.id().clone(),
                polygon: g
                    .polygon()
                    .counter_clockwise()
                    .super_sample(config.piece_super_sample),
                angles: sweep.clone().unwrap_or_else(|| g.rotations()),
                quantity: g.quantity(),
            })
            .collect();

        let mut order: Vec<usize> = (0..pieces.len()).collect();
        order.sort_by(|&a, &b| pieces[b].polygon.area().total_cmp(&pieces[a].polygon.area()));

        Self {
            plate,
            pieces,
            order,
        }
    }

    /// The plate as used for placement.
    pub fn plate(&self) -> &Boundary2D {
        &self.plate
    }

    /// Piece templates in input order.
    pub fn pieces(&self) -> &[PieceSpec] {
        &self.pieces
    }

    /// Total instances requested.
    pub fn total_quantity(&self) -> usize {
        self.pieces.iter().map(|p| p.quantity).sum()
    }

    /// The floating pool for a construction starting from `layout`: every
    /// template with instances left after subtracting those already fixed,
    /// largest area first.
    pub fn floating(&self, layout: &Layout) -> Vec<FloatingPiece> {
        self.order
            .iter()
            .map(|&piece| FloatingPiece {
                piece,
                remaining: self.pieces[piece]
                    .quantity
                    .saturating_sub(layout.count_of(piece)),
            })
            .filter(|f| f.remaining > 0)
            .collect()
    }
}
