//! The trick implementer (L4): the per-trick state machine that requests
//! moves, applies a trump exchange or a regular/marriage trick, scores it,
//! redeems pending points, draws from the talon, and appends to history.

use crate::deck::CardCollection;
use crate::engine::GamePlayEngine;
use crate::errors::EngineError;
use crate::moves::Move;
use crate::perspective::{FollowerPerspective, LeaderPerspective, PlayerPerspective};
use crate::state::{GameState, Previous, Side, TrickRecord};

/// Asks the agents on each side of the table for their move, validating the
/// result against the engine's [`crate::validate::MoveValidator`]. Kept as
/// its own capability (rather than inlined into the trick implementer) so a
/// variant can intercept or log every request without touching the trick
/// state machine itself.
pub trait MoveRequester {
    fn request_leader_move(&self, engine: &GamePlayEngine, state: &GameState) -> Result<Move, EngineError>;
    fn request_follower_move(&self, engine: &GamePlayEngine, state: &GameState, leader_move: &Move) -> Result<Move, EngineError>;
}

/// Hands the agent its perspective, takes its move, and rejects anything
/// outside the validator's legal-move set as an
/// [`EngineError::AgentProtocolViolation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMoveRequester;

impl MoveRequester for SimpleMoveRequester {
    fn request_leader_move(&self, engine: &GamePlayEngine, state: &GameState) -> Result<Move, EngineError> {
        let perspective = LeaderPerspective::new(state, engine);
        let mv = state.leader.agent.borrow_mut().get_move(&perspective);
        if !engine.move_validator.is_legal_leader_move(state, &mv) {
            log::warn!("leader {} played illegal move {mv}, aborting game", state.leader.name);
            return Err(EngineError::AgentProtocolViolation {
                offender: state.leader.name.clone(),
                reason: format!("leader played illegal move {mv}"),
            });
        }
        log::debug!("leader {} played {mv}", state.leader.name);
        Ok(mv)
    }

    fn request_follower_move(&self, engine: &GamePlayEngine, state: &GameState, leader_move: &Move) -> Result<Move, EngineError> {
        let perspective = FollowerPerspective::new(state, engine, *leader_move);
        let mv = state.follower.agent.borrow_mut().get_move(&perspective);
        if !engine.move_validator.is_legal_follower_move(state, engine.trick_scorer.as_ref(), leader_move, &mv) {
            log::warn!("follower {} played illegal move {mv} in response to {leader_move}, aborting game", state.follower.name);
            return Err(EngineError::AgentProtocolViolation {
                offender: state.follower.name.clone(),
                reason: format!("follower played illegal move {mv} in response to {leader_move}"),
            });
        }
        log::debug!("follower {} played {mv}", state.follower.name);
        Ok(mv)
    }
}

/// The per-trick state machine. [`SchnapsenTrickImplementer`] is the only
/// implementation this crate ships; it is generic over the
/// [`MoveRequester`] used to ask the agents for their moves, a seam that
/// exists so a logging or replay-capturing requester can be substituted
/// without touching the trick logic itself.
pub trait TrickImplementer {
    fn play_trick(&self, engine: &GamePlayEngine, state: GameState) -> Result<GameState, EngineError>;

    /// Play one trick with the leader's move already decided, validating it
    /// just as `play_trick` would have validated whatever the leader's agent
    /// returned. Used by [`GamePlayEngine::play_game_from_state`] to
    /// optionally pre-commit the first trick's leader move (spec.md §4.5).
    fn play_trick_with_leader_move(&self, engine: &GamePlayEngine, state: GameState, leader_move: Move) -> Result<GameState, EngineError>;
}

pub struct SchnapsenTrickImplementer<R: MoveRequester> {
    move_requester: R,
}

impl<R: MoveRequester> SchnapsenTrickImplementer<R> {
    pub fn new(move_requester: R) -> Self {
        SchnapsenTrickImplementer { move_requester }
    }
}

impl<R: MoveRequester> TrickImplementer for SchnapsenTrickImplementer<R> {
    fn play_trick(&self, engine: &GamePlayEngine, state: GameState) -> Result<GameState, EngineError> {
        let leader_move = self.move_requester.request_leader_move(engine, &state)?;
        self.continue_trick(engine, state, leader_move)
    }

    fn play_trick_with_leader_move(&self, engine: &GamePlayEngine, state: GameState, leader_move: Move) -> Result<GameState, EngineError> {
        if !engine.move_validator.is_legal_leader_move(&state, &leader_move) {
            log::warn!("pre-committed leader move {leader_move} for {} is illegal, aborting game", state.leader.name);
            return Err(EngineError::AgentProtocolViolation {
                offender: state.leader.name.clone(),
                reason: format!("pre-committed leader move {leader_move} is illegal"),
            });
        }
        self.continue_trick(engine, state, leader_move)
    }
}

impl<R: MoveRequester> SchnapsenTrickImplementer<R> {
    /// Shared tail of `play_trick`/`play_trick_with_leader_move` once the
    /// leader's (validated) move is in hand: exchange short-circuit, or
    /// request the follower's move and play out a regular trick.
    fn continue_trick(&self, engine: &GamePlayEngine, state: GameState, leader_move: Move) -> Result<GameState, EngineError> {
        if leader_move.is_trump_exchange() {
            return self.play_trump_exchange(engine, state, leader_move);
        }

        let follower_move = self.move_requester.request_follower_move(engine, &state, &leader_move)?;
        self.play_regular_trick(engine, state, leader_move, follower_move)
    }

    /// A trump exchange is its own atomic trick: the jack swaps with the
    /// talon's trump card, the leader's hand gains the old trump card in
    /// place of the jack, both agents are notified, and the leader stays
    /// leader — no follower move is requested (spec.md §4.2, §9).
    fn play_trump_exchange(&self, engine: &GamePlayEngine, mut state: GameState, exchange: Move) -> Result<GameState, EngineError> {
        let jack = exchange.played_card();
        let displaced_trump = state.talon.trump_exchange(jack)?;
        state.leader.hand.remove(jack)?;
        state.leader.hand.add(displaced_trump)?;

        log::debug!("{} exchanged {jack} for the talon's {displaced_trump}", state.leader.name);
        engine.notify_trump_exchange(&state, exchange);

        let mut next = state.copy_for_next();
        next.previous = Some(Previous {
            prior_state: Box::new(state),
            trick: TrickRecord::Exchange { exchange, displaced_trump },
            leader_remained_leader: true,
        });
        Ok(next)
    }

    fn play_regular_trick(&self, engine: &GamePlayEngine, mut state: GameState, leader_move: Move, follower_move: Move) -> Result<GameState, EngineError> {
        if let Some(suit) = leader_move.marriage_suit() {
            let pending = engine.trick_scorer.marriage_score(suit, state.trump_suit());
            state.leader.score = state.leader.score + pending;
        }

        // Only the physically played card leaves the hand: a marriage's queen stays
        // behind, already revealed, to be played as a regular move later (moves.rs).
        state.leader.hand.remove(leader_move.played_card())?;
        state.follower.hand.remove(follower_move.played_card())?;

        let leader_card = leader_move.played_card();
        let follower_card = follower_move.played_card();
        let trump = state.trump_suit();
        let winner_side = engine.trick_scorer.score_trick(leader_card, follower_card, &mut state.leader, &mut state.follower, trump);

        if !state.talon.is_empty() {
            let (winner_draw, loser_draw) = match winner_side {
                Side::Leader => (Side::Leader, Side::Follower),
                Side::Follower => (Side::Follower, Side::Leader),
            };
            let mut drawn = state.talon.draw_n(1)?;
            state.side_mut(winner_draw).hand.add(drawn.remove(0))?;
            if !state.talon.is_empty() {
                let mut drawn = state.talon.draw_n(1)?;
                state.side_mut(loser_draw).hand.add(drawn.remove(0))?;
            }
        }

        log::debug!(
            "trick {leader_card} vs {follower_card} won by {}",
            if winner_side == Side::Leader { &state.leader.name } else { &state.follower.name }
        );

        let leader_remained_leader = winner_side == Side::Leader;
        let mut next = state.copy_for_next();
        if !leader_remained_leader {
            std::mem::swap(&mut next.leader, &mut next.follower);
        }
        next.previous = Some(Previous {
            prior_state: Box::new(state),
            trick: TrickRecord::Regular { leader_move, follower_move },
            leader_remained_leader,
        });
        Ok(next)
    }
}
