//! The Agent capability (spec.md §6.1) — the one interface concrete bot
//! strategies (random, heuristic, alpha-beta, rdeep, ML, GUI, ...) implement.
//! No concrete strategy lives in this crate; that is deliberately out of
//! scope (spec.md §1).

use crate::moves::Move;
use crate::perspective::PlayerPerspective;

/// A decision-making participant in a game. `get_move` is a blocking call:
/// the engine owns the game state exclusively for the duration of the game
/// and there is no suspension point (spec.md §5).
pub trait Agent: std::fmt::Debug {
    /// Choose a move for the given perspective. The returned move must be a
    /// member of `perspective.valid_moves()`; returning anything else is an
    /// agent protocol violation and aborts the game.
    fn get_move(&mut self, perspective: &dyn PlayerPerspective) -> Move;

    /// Called on both agents after a trump exchange is applied to the talon,
    /// before the next leader decision. Default: no-op.
    fn notify_trump_exchange(&mut self, _exchange: Move) {}

    /// Called on both agents after the game ends: winner first, then loser
    /// (spec.md §5). `won` is true for the winner's call.
    fn notify_game_end(&mut self, _won: bool, _perspective: &dyn PlayerPerspective) {}

    /// An optional display name, used in error messages identifying a
    /// misbehaving agent and in trick-level logging.
    fn name(&self) -> &str {
        "unnamed agent"
    }
}

/// An agent that never gets asked for a real decision. Installed by
/// [`crate::perspective::make_assumption`] on both sides of the sampled
/// state: that state is for analysis, not continuation, unless the caller
/// substitutes real agents first (spec.md §4.4, §9).
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyAgent;

impl Agent for DummyAgent {
    fn get_move(&mut self, _perspective: &dyn PlayerPerspective) -> Move {
        panic!("DummyAgent cannot play; substitute real agents via GamePlayEngine::copy_with_other_bots before continuing play");
    }

    fn name(&self) -> &str {
        "dummy"
    }
}
