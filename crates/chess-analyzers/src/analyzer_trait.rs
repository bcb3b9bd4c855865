//! Base trait and types for ply annotators.

use chess_core::clock::ClockSample;
use chess_core::time_control::TimeControl;
use chess_core::{Board, Color, Piece, Ply, Role};
use serde::Serialize;

use crate::analyzers::phase::GamePhase;
use crate::analyzers::think_time::ClockUsage;
use crate::error::GameError;

/// Context available to annotators at each ply.
pub struct PlyContext<'a> {
    pub ply: &'a Ply,
    pub before: &'a Board, // Board state BEFORE the move
    pub is_final: bool,
    /// Side the result metadata reports as checkmated.
    pub checkmated: Option<Color>,
    /// One sample per ply of the game, in order.
    pub clocks: &'a [ClockSample],
    pub time_control: &'a TimeControl,
}

impl PlyContext<'_> {
    /// Board state AFTER the move.
    pub fn after(&self) -> &Board {
        &self.ply.board
    }
}

/// Everything computed for one ply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub ply: usize,
    pub captured: Option<Piece>,
    pub forked_pieces: Vec<Piece>,
    pub checkmate_attackers: Vec<Role>,
    pub major_minor_count: usize,
    pub backrank_sparse: bool,
    pub phase: GamePhase,
    #[serde(flatten)]
    pub clock: ClockUsage,
}

impl Annotation {
    pub fn new(ply: usize) -> Self {
        Self {
            ply,
            captured: None,
            forked_pieces: Vec::new(),
            checkmate_attackers: Vec::new(),
            major_minor_count: 0,
            backrank_sparse: false,
            phase: GamePhase::Opening,
            clock: ClockUsage::default(),
        }
    }
}

/// Trait that all annotators implement. Each one reads the context and fills
/// in its own fields of the annotation; none sees another ply's output.
pub trait PlyAnnotator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn annotate(&self, ctx: &PlyContext, annotation: &mut Annotation) -> Result<(), GameError>;
}
