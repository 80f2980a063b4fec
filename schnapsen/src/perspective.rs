//! The perspective layer (L6): what each agent is entitled to see, and the
//! `make_assumption` operation that samples a concrete, fully-observable
//! state consistent with that partial view.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::agent::DummyAgent;
use crate::deck::{Card, CardCollection, Suit};
use crate::engine::GamePlayEngine;
use crate::errors::EngineError;
use crate::moves::Move;
use crate::state::{agent_handle, BotState, GamePhase, GameState, Hand, Score, Side, Talon, TrickRecord};

/// A lightweight projection of what a player's perspective looked like at a
/// past decision point, paired by [`PlayerPerspective::get_game_history`]
/// with the trick that followed it. Kept as a plain enum rather than a
/// recursive `Box<dyn PlayerPerspective>` — it is a read-only snapshot, not
/// something that needs dynamic dispatch.
#[derive(Debug, Clone)]
pub enum HistoricPerspective {
    Leader,
    Follower { leader_move: Move },
    ExchangeFollower,
}

/// Crate-private access to the full, otherwise-hidden [`GameState`] and the
/// engine it was played under. Deliberately not part of the public
/// [`PlayerPerspective`] trait: an agent only ever holds a `&dyn
/// PlayerPerspective`, and if `state()`/`engine()` were public methods on
/// that trait, an agent could read `state().follower.hand` or
/// `state().talon.cards()` directly and see cards it has no business
/// knowing, the same type-bypass omniscience spec.md §9 calls out and
/// forbids. Keeping this trait in a private module seals it — an external
/// crate cannot `use` an item it cannot name, so `.state()`/`.engine()`
/// are uncallable outside this crate, and the only route to unseen cards
/// is [`PlayerPerspective::make_assumption`]. Mirrors the reference
/// implementation's name-mangled `self.__game_state`.
mod sealed {
    use crate::engine::GamePlayEngine;
    use crate::state::GameState;

    pub trait PerspectiveAccess {
        fn state(&self) -> &GameState;
        fn engine(&self) -> &GamePlayEngine;
    }
}

/// The imperfect-information view an agent is given when asked for a move.
/// All variants expose the same read-only surface over the underlying
/// (otherwise hidden) [`GameState`]; only [`PlayerPerspective::valid_moves`]
/// differs per concrete perspective, and only
/// [`PlayerPerspective::make_assumption`] is privileged to reconstruct a full
/// state (sampling unseen cards rather than revealing them).
pub trait PlayerPerspective: sealed::PerspectiveAccess {
    fn viewer_side(&self) -> Side;

    /// The moves legal for this perspective. Fails with
    /// [`EngineError::TerminalStateAccess`] on a terminal (winner/loser)
    /// perspective.
    fn valid_moves(&self) -> Result<Vec<Move>, EngineError>;

    fn hand(&self) -> &Hand {
        &self.state().side(self.viewer_side()).hand
    }

    fn own_score(&self) -> Score {
        self.state().side(self.viewer_side()).score
    }

    fn opponent_score(&self) -> Score {
        self.state().side(GameState::opposite(self.viewer_side())).score
    }

    fn own_won_cards(&self) -> &[Card] {
        &self.state().side(self.viewer_side()).won_cards
    }

    fn opponent_won_cards(&self) -> &[Card] {
        &self.state().side(GameState::opposite(self.viewer_side())).won_cards
    }

    fn trump_suit(&self) -> Suit {
        self.state().trump_suit()
    }

    /// The visible trump card at the bottom of the talon, if any remain.
    fn trump_card(&self) -> Option<Card> {
        self.state().talon.trump_card()
    }

    fn talon_size(&self) -> usize {
        self.state().talon.len()
    }

    fn phase(&self) -> GamePhase {
        self.state().game_phase()
    }

    fn am_i_leader(&self) -> bool {
        self.viewer_side() == Side::Leader
    }

    /// Own hand, the trump card, every card revealed by a past trick
    /// (regular plays, marriages, exchanges), and — if supplied — the cards
    /// in the leader's move for the trick currently in progress.
    fn seen_cards(&self, leader_move: Option<&Move>) -> HashSet<Card> {
        let mut seen: HashSet<Card> = self.hand().cards().iter().copied().collect();
        if let Some(trump) = self.trump_card() {
            seen.insert(trump);
        }
        let mut cursor = self.state().previous.as_ref();
        while let Some(prev) = cursor {
            seen.extend(prev.trick.revealed_cards());
            cursor = prev.prior_state.previous.as_ref();
        }
        if let Some(lm) = leader_move {
            seen.extend(lm.cards());
        }
        seen
    }

    /// Cards the opponent must still hold that our side has observed: all of
    /// the opponent's hand in Phase Two (nothing is hidden anymore), else
    /// the subset of it that we have already seen (a drawn trump card that
    /// ended up in their hand, cards revealed by a trick they were not part
    /// of but we tracked, etc).
    fn known_opponent_cards(&self, leader_move: Option<&Move>) -> Vec<Card> {
        let opponent_hand = &self.state().side(GameState::opposite(self.viewer_side())).hand;
        if self.phase() == GamePhase::Two {
            opponent_hand.cards().to_vec()
        } else {
            let seen = self.seen_cards(leader_move);
            opponent_hand.cards().iter().copied().filter(|c| seen.contains(c)).collect()
        }
    }

    /// Project the history list into the perspective this player had at each
    /// past decision point, paired with the trick that followed it. Walks
    /// the `Previous` chain, using each recorded bot's name to determine
    /// which side this player occupied at that point (leader/follower swap
    /// trick to trick as the lead changes hands).
    fn get_game_history(&self) -> Vec<(HistoricPerspective, TrickRecord)> {
        let my_name = self.state().side(self.viewer_side()).name.clone();
        let mut entries = Vec::new();
        let mut cursor = self.state().previous.as_ref();
        while let Some(prev) = cursor {
            let prior = &prev.prior_state;
            let was_leader = prior.leader.name == my_name;
            let historic = match (&prev.trick, was_leader) {
                (TrickRecord::Exchange { .. }, true) => HistoricPerspective::Leader,
                (TrickRecord::Exchange { .. }, false) => HistoricPerspective::ExchangeFollower,
                (TrickRecord::Regular { .. }, true) => HistoricPerspective::Leader,
                (TrickRecord::Regular { leader_move, .. }, false) => HistoricPerspective::Follower { leader_move: *leader_move },
            };
            entries.push((historic, prev.trick.clone()));
            cursor = prior.previous.as_ref();
        }
        entries.reverse();
        entries
    }

    /// Sample a fully-observable `GameState` consistent with this
    /// perspective: own hand, own score, own won cards, and the talon's
    /// known (trump) position are preserved exactly; every other unseen
    /// card — in the opponent's hand and the rest of the talon — is
    /// reshuffled from the set of cards this perspective has not seen.
    /// Both bots in the returned state are substituted with a
    /// [`DummyAgent`]: the result is for analysis, not continuation, unless
    /// the caller re-substitutes real agents via
    /// [`GameState::copy_with_other_bots`].
    ///
    /// # Panics
    /// Panics if `leader_move` is given but one of its cards is not present
    /// in the true opponent hand — a caller should never be able to observe
    /// a leader move whose cards the leader does not actually hold.
    fn make_assumption(&self, leader_move: Option<&Move>, rng: &mut dyn RngCore) -> GameState {
        let state = self.state();
        let viewer_side = self.viewer_side();
        let opponent_side = GameState::opposite(viewer_side);

        let seen = self.seen_cards(leader_move);
        let full_deck = self.engine().deck_generator.get_initial_deck();
        let mut unseen: Vec<Card> = full_deck.into_cards().into_iter().filter(|c| !seen.contains(c)).collect();
        unseen.shuffle(rng);

        let known_opponent = self.known_opponent_cards(leader_move);
        if let Some(lm) = leader_move {
            let opponent_hand_real = &state.side(opponent_side).hand;
            for card in lm.cards() {
                assert!(
                    opponent_hand_real.has(&card),
                    "leader_move card {card} is not actually held by the opponent; perspective is inconsistent with the true state"
                );
            }
        }

        let opponent_hand_real = &state.side(opponent_side).hand;
        let mut new_opponent_cards = Vec::with_capacity(opponent_hand_real.len());
        for card in opponent_hand_real.cards() {
            if known_opponent.contains(card) {
                new_opponent_cards.push(*card);
            } else {
                new_opponent_cards.push(unseen.pop().expect("enough unseen cards to fill the opponent's hand"));
            }
        }

        let talon_real = &state.talon;
        let mut new_talon_cards = Vec::with_capacity(talon_real.len());
        let bottom_index = talon_real.len().checked_sub(1);
        for (i, card) in talon_real.cards().iter().enumerate() {
            if Some(i) == bottom_index || seen.contains(card) {
                new_talon_cards.push(*card);
            } else {
                new_talon_cards.push(unseen.pop().expect("enough unseen cards to fill the talon"));
            }
        }

        let dummy_leader = agent_handle(DummyAgent);
        let dummy_follower = agent_handle(DummyAgent);

        let (leader_hand, follower_hand) = match opponent_side {
            Side::Leader => (Hand::new(new_opponent_cards, state.leader.hand.max_size()), state.follower.hand.clone()),
            Side::Follower => (state.leader.hand.clone(), Hand::new(new_opponent_cards, state.follower.hand.max_size())),
        };

        let leader = BotState {
            agent: dummy_leader,
            hand: leader_hand,
            score: state.leader.score,
            won_cards: state.leader.won_cards.clone(),
            name: state.leader.name.clone(),
        };
        let follower = BotState {
            agent: dummy_follower,
            hand: follower_hand,
            score: state.follower.score,
            won_cards: state.follower.won_cards.clone(),
            name: state.follower.name.clone(),
        };
        let talon = Talon::new(new_talon_cards, Some(state.trump_suit()));

        GameState::new(leader, follower, talon)
    }
}

/// The perspective of the player about to lead a trick.
pub struct LeaderPerspective<'a> {
    state: &'a GameState,
    engine: &'a GamePlayEngine,
}

impl<'a> LeaderPerspective<'a> {
    pub fn new(state: &'a GameState, engine: &'a GamePlayEngine) -> Self {
        LeaderPerspective { state, engine }
    }
}

impl<'a> sealed::PerspectiveAccess for LeaderPerspective<'a> {
    fn state(&self) -> &GameState {
        self.state
    }

    fn engine(&self) -> &GamePlayEngine {
        self.engine
    }
}

impl<'a> PlayerPerspective for LeaderPerspective<'a> {
    fn viewer_side(&self) -> Side {
        Side::Leader
    }

    fn valid_moves(&self) -> Result<Vec<Move>, EngineError> {
        Ok(self.engine.move_validator.legal_leader_moves(self.state))
    }
}

/// The perspective of the player about to respond to a leader's move.
pub struct FollowerPerspective<'a> {
    state: &'a GameState,
    engine: &'a GamePlayEngine,
    leader_move: Move,
}

impl<'a> FollowerPerspective<'a> {
    pub fn new(state: &'a GameState, engine: &'a GamePlayEngine, leader_move: Move) -> Self {
        FollowerPerspective { state, engine, leader_move }
    }

    /// The leader's move this follower is responding to. Already revealed to
    /// the follower by construction, so exposing it leaks nothing beyond
    /// what this perspective was handed.
    pub fn leader_move(&self) -> Move {
        self.leader_move
    }
}

impl<'a> sealed::PerspectiveAccess for FollowerPerspective<'a> {
    fn state(&self) -> &GameState {
        self.state
    }

    fn engine(&self) -> &GamePlayEngine {
        self.engine
    }
}

impl<'a> PlayerPerspective for FollowerPerspective<'a> {
    fn viewer_side(&self) -> Side {
        Side::Follower
    }

    fn valid_moves(&self) -> Result<Vec<Move>, EngineError> {
        Ok(self.engine.move_validator.legal_follower_moves(self.state, self.engine.trick_scorer.as_ref(), &self.leader_move))
    }
}

/// Produced only as a history projection for the follower during a
/// trump-exchange trick: there was no follower move to make.
pub struct ExchangeFollowerPerspective<'a> {
    state: &'a GameState,
    engine: &'a GamePlayEngine,
}

impl<'a> ExchangeFollowerPerspective<'a> {
    pub fn new(state: &'a GameState, engine: &'a GamePlayEngine) -> Self {
        ExchangeFollowerPerspective { state, engine }
    }
}

impl<'a> sealed::PerspectiveAccess for ExchangeFollowerPerspective<'a> {
    fn state(&self) -> &GameState {
        self.state
    }

    fn engine(&self) -> &GamePlayEngine {
        self.engine
    }
}

impl<'a> PlayerPerspective for ExchangeFollowerPerspective<'a> {
    fn viewer_side(&self) -> Side {
        Side::Follower
    }

    fn valid_moves(&self) -> Result<Vec<Move>, EngineError> {
        Ok(Vec::new())
    }
}

/// A terminal perspective handed to the winning side at game end.
pub struct WinnerPerspective<'a> {
    state: &'a GameState,
    engine: &'a GamePlayEngine,
    winner_side: Side,
}

impl<'a> WinnerPerspective<'a> {
    pub fn new(state: &'a GameState, engine: &'a GamePlayEngine, winner_side: Side) -> Self {
        WinnerPerspective { state, engine, winner_side }
    }
}

impl<'a> sealed::PerspectiveAccess for WinnerPerspective<'a> {
    fn state(&self) -> &GameState {
        self.state
    }

    fn engine(&self) -> &GamePlayEngine {
        self.engine
    }
}

impl<'a> PlayerPerspective for WinnerPerspective<'a> {
    fn viewer_side(&self) -> Side {
        self.winner_side
    }

    fn valid_moves(&self) -> Result<Vec<Move>, EngineError> {
        Err(EngineError::TerminalStateAccess)
    }
}

/// A terminal perspective handed to the losing side at game end.
pub struct LoserPerspective<'a> {
    state: &'a GameState,
    engine: &'a GamePlayEngine,
    loser_side: Side,
}

impl<'a> LoserPerspective<'a> {
    pub fn new(state: &'a GameState, engine: &'a GamePlayEngine, loser_side: Side) -> Self {
        LoserPerspective { state, engine, loser_side }
    }
}

impl<'a> sealed::PerspectiveAccess for LoserPerspective<'a> {
    fn state(&self) -> &GameState {
        self.state
    }

    fn engine(&self) -> &GamePlayEngine {
        self.engine
    }
}

impl<'a> PlayerPerspective for LoserPerspective<'a> {
    fn viewer_side(&self) -> Side {
        self.loser_side
    }

    fn valid_moves(&self) -> Result<Vec<Move>, EngineError> {
        Err(EngineError::TerminalStateAccess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DummyAgent;
    use crate::deck::Rank;
    use crate::state::agent_handle;
    use crate::variants::schnapsen_engine;
    use rand::SeedableRng;

    fn sample_state(engine: &GamePlayEngine) -> GameState {
        let leader = BotState::new(
            agent_handle(DummyAgent),
            Hand::with_capacity(vec![Card::canonical(Rank::Jack, Suit::Hearts), Card::canonical(Rank::Ace, Suit::Spades)]),
            "leader",
        );
        let follower = BotState::new(
            agent_handle(DummyAgent),
            Hand::with_capacity(vec![Card::canonical(Rank::Ten, Suit::Clubs), Card::canonical(Rank::King, Suit::Diamonds)]),
            "follower",
        );
        let talon = Talon::new(
            vec![
                Card::canonical(Rank::Queen, Suit::Clubs),
                Card::canonical(Rank::Ace, Suit::Hearts),
                Card::canonical(Rank::Ten, Suit::Hearts),
            ],
            None,
        );
        let _ = engine;
        GameState::new(leader, follower, talon)
    }

    #[test]
    fn seen_cards_includes_own_hand_and_trump_card() {
        let engine = schnapsen_engine();
        let state = sample_state(&engine);
        let perspective = LeaderPerspective::new(&state, &engine);
        let seen = perspective.seen_cards(None);
        assert!(seen.contains(&Card::canonical(Rank::Jack, Suit::Hearts)));
        assert!(seen.contains(&Card::canonical(Rank::Ten, Suit::Hearts))); // bottommost = trump card
        assert!(!seen.contains(&Card::canonical(Rank::Ten, Suit::Clubs))); // opponent's hand, unseen
    }

    #[test]
    fn known_opponent_cards_is_full_hand_in_phase_two() {
        let engine = schnapsen_engine();
        let mut state = sample_state(&engine);
        state.talon = Talon::new(vec![], Some(Suit::Hearts));
        let perspective = LeaderPerspective::new(&state, &engine);
        assert_eq!(perspective.phase(), GamePhase::Two);
        let known = perspective.known_opponent_cards(None);
        assert_eq!(known.len(), state.follower.hand.len());
    }

    #[test]
    fn make_assumption_preserves_own_side_and_fills_rest() {
        let engine = schnapsen_engine();
        let state = sample_state(&engine);
        let perspective = LeaderPerspective::new(&state, &engine);
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(7);
        let assumption = perspective.make_assumption(None, &mut rng);
        assert_eq!(assumption.leader.hand.cards(), state.leader.hand.cards());
        assert_eq!(assumption.leader.score, state.leader.score);
        assert_eq!(assumption.follower.hand.len(), state.follower.hand.len());
        assert_eq!(assumption.talon.len(), state.talon.len());
        assert_eq!(assumption.talon.trump_card(), state.talon.trump_card());
    }
}
