//! Shared test-only agents used across the integration test binaries.

use rand::Rng;
use schnapsen::{Agent, Move, PlayerPerspective};

/// Plays a fixed, pre-scripted sequence of moves. Panics if asked for more
/// moves than were scripted; used to drive the concrete scenarios in
/// `tests/scenarios.rs` where every card is chosen in advance.
#[derive(Debug)]
pub struct ScriptedAgent {
    moves: std::collections::VecDeque<Move>,
}

impl ScriptedAgent {
    pub fn new(moves: Vec<Move>) -> Self {
        ScriptedAgent { moves: moves.into() }
    }
}

impl Agent for ScriptedAgent {
    fn get_move(&mut self, _perspective: &dyn PlayerPerspective) -> Move {
        self.moves.pop_front().expect("scripted agent ran out of moves before the game ended")
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Picks a uniformly random legal move every time it is asked. Used by the
/// property tests in `tests/invariants.rs` to drive whole games without
/// encoding any strategy of its own.
#[derive(Debug)]
pub struct RandomLegalAgent<R> {
    rng: R,
}

impl<R: Rng> RandomLegalAgent<R> {
    pub fn new(rng: R) -> Self {
        RandomLegalAgent { rng }
    }
}

impl<R: Rng + std::fmt::Debug> Agent for RandomLegalAgent<R> {
    fn get_move(&mut self, perspective: &dyn PlayerPerspective) -> Move {
        let moves = perspective.valid_moves().expect("a non-terminal perspective always has valid moves");
        let index = self.rng.gen_range(0..moves.len());
        moves[index]
    }

    fn name(&self) -> &str {
        "random-legal"
    }
}
