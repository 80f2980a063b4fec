//! The game-play engine (L7): the capability composition that ties the deck,
//! hand, validator, trick implementer, and scorer together into a single
//! configuration object, plus the entry points that actually play a game.

use rand::RngCore;

use crate::deck::{Card, CardCollection, OrderedCardCollection, Rank, Suit};
use crate::errors::EngineError;
use crate::moves::Move;
use crate::perspective::{LoserPerspective, WinnerPerspective};
use crate::scorer::{GamePoints, TrickScorer};
use crate::state::{AgentHandle, BotState, GameState, Hand, Side, Talon};
use crate::trick::TrickImplementer;
use crate::validate::MoveValidator;

/// Produces the full, shuffled deck a game is dealt from. Swappable per
/// variant ([`crate::variants`] swaps in a 24-card deck).
pub trait DeckGenerator {
    fn get_initial_deck(&self) -> OrderedCardCollection;
}

/// The standard 20-card Schnapsen deck: J/Q/K/10/A in all four suits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenDeckGenerator;

impl DeckGenerator for SchnapsenDeckGenerator {
    fn get_initial_deck(&self) -> OrderedCardCollection {
        let mut cards = Vec::with_capacity(Rank::SCHNAPSEN_RANKS.len() * Suit::ALL.len());
        for &suit in &Suit::ALL {
            for &rank in &Rank::SCHNAPSEN_RANKS {
                cards.push(Card::canonical(rank, suit));
            }
        }
        OrderedCardCollection::new(cards)
    }
}

/// Deals a shuffled deck out into two hands and a talon.
pub trait HandGenerator {
    /// `deck` has already been shuffled by the caller. Returns
    /// (leader_hand, follower_hand, talon_cards).
    fn deal(&self, deck: &OrderedCardCollection, hand_size: usize) -> (Vec<Card>, Vec<Card>, Vec<Card>);
}

/// Deals by alternating cards at even indices to the leader and odd indices
/// to the follower, then hands the remainder to the talon — the standard
/// Schnapsen deal order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenHandGenerator;

impl HandGenerator for SchnapsenHandGenerator {
    fn deal(&self, deck: &OrderedCardCollection, hand_size: usize) -> (Vec<Card>, Vec<Card>, Vec<Card>) {
        let cards = deck.cards();
        let dealt = hand_size * 2;
        assert!(cards.len() >= dealt, "deck of {} cards cannot deal two hands of {hand_size}", cards.len());
        let mut leader = Vec::with_capacity(hand_size);
        let mut follower = Vec::with_capacity(hand_size);
        for (i, &card) in cards[..dealt].iter().enumerate() {
            if i % 2 == 0 {
                leader.push(card);
            } else {
                follower.push(card);
            }
        }
        let talon = cards[dealt..].to_vec();
        (leader, follower, talon)
    }
}

/// The pluggable capabilities a game is played with, composed as trait
/// objects so a variant can swap any one of them independently (spec.md
/// §4.5, §8 variants). This is the engine's configuration surface, not
/// mutable game state — construct one per variant and reuse it across many
/// games.
pub struct GamePlayEngine {
    pub deck_generator: Box<dyn DeckGenerator>,
    pub hand_generator: Box<dyn HandGenerator>,
    pub move_validator: Box<dyn MoveValidator>,
    pub trick_implementer: Box<dyn TrickImplementer>,
    pub trick_scorer: Box<dyn TrickScorer>,
    pub hand_size: usize,
}

impl GamePlayEngine {
    pub fn new(
        deck_generator: Box<dyn DeckGenerator>,
        hand_generator: Box<dyn HandGenerator>,
        move_validator: Box<dyn MoveValidator>,
        trick_implementer: Box<dyn TrickImplementer>,
        trick_scorer: Box<dyn TrickScorer>,
        hand_size: usize,
    ) -> Self {
        GamePlayEngine { deck_generator, hand_generator, move_validator, trick_implementer, trick_scorer, hand_size }
    }

    /// Deal a fresh game between the two given agents, using `rng` to
    /// shuffle the deck.
    pub fn deal_game(&self, leader_agent: AgentHandle, follower_agent: AgentHandle, rng: &mut dyn RngCore) -> GameState {
        let mut deck = self.deck_generator.get_initial_deck();
        deck.shuffle(rng);
        let (leader_cards, follower_cards, talon_cards) = self.hand_generator.deal(&deck, self.hand_size);
        let leader = BotState::new(leader_agent, Hand::new(leader_cards, self.hand_size), "leader");
        let follower = BotState::new(follower_agent, Hand::new(follower_cards, self.hand_size), "follower");
        let talon = Talon::new(talon_cards, None);
        GameState::new(leader, follower, talon)
    }

    /// Play a fresh game from scratch to completion, notifying both agents
    /// of the result. Returns the winning side, the game points awarded, and
    /// the final state, rather than a winner agent reference directly —
    /// `state.side(winner)` recovers the winning `BotState` (and its agent)
    /// from the returned tuple.
    pub fn play_game(&self, leader_agent: AgentHandle, follower_agent: AgentHandle, rng: &mut dyn RngCore) -> Result<(Side, GamePoints, GameState), EngineError> {
        let state = self.deal_game(leader_agent, follower_agent, rng);
        self.play_game_from_state(state, None)
    }

    /// Play to completion from an arbitrary starting state (including one
    /// produced by [`crate::perspective::PlayerPerspective::make_assumption`]
    /// after substituting real agents via
    /// [`GameState::copy_with_other_bots`]). If `leader_move` is given, it is
    /// used (and validated) as the leader's move for the first trick instead
    /// of asking `state`'s leader agent — lets a search agent commit to a
    /// candidate move and have the engine play out the rest of the game.
    pub fn play_game_from_state(&self, mut state: GameState, leader_move: Option<Move>) -> Result<(Side, GamePoints, GameState), EngineError> {
        if let Some(leader_move) = leader_move {
            if self.trick_scorer.declare_winner(&state)?.is_some() {
                return Err(EngineError::InvariantViolation("a leader move was pre-committed for a state that is already game over".to_string()));
            }
            state = self.trick_implementer.play_trick_with_leader_move(self, state, leader_move)?;
        }
        loop {
            if let Some((winner, points)) = self.trick_scorer.declare_winner(&state)? {
                log::info!("game over: {} wins {points} game point(s)", state.side(winner).name);
                self.notify_game_end(&state, winner);
                return Ok((winner, points, state));
            }
            state = self.trick_implementer.play_trick(self, state)?;
        }
    }

    /// Play at most `n` tricks (or until the game ends, whichever comes
    /// first), after substituting `new_leader`/`new_follower` as the agents
    /// for the current leader/follower side of `state`. Does not notify
    /// either agent of a game end. Useful for search agents that want to
    /// roll a sampled state (e.g. one produced by
    /// [`crate::perspective::PlayerPerspective::make_assumption`]) forward a
    /// bounded number of tricks with concrete bots and evaluate the result
    /// themselves. Returns the resulting state and how many tricks were
    /// actually played (fewer than `n` if the game ended first). `n == 1` is
    /// aliased by [`Self::play_one_trick`].
    pub fn play_at_most_n_tricks(
        &self,
        state: GameState,
        new_leader: AgentHandle,
        new_follower: AgentHandle,
        n: usize,
    ) -> Result<(GameState, usize), EngineError> {
        let mut state = state.copy_with_other_bots(new_leader, new_follower);
        let mut tricks_played = 0;
        for _ in 0..n {
            if self.trick_scorer.declare_winner(&state)?.is_some() {
                break;
            }
            state = self.trick_implementer.play_trick(self, state)?;
            tricks_played += 1;
        }
        Ok((state, tricks_played))
    }

    /// Play exactly one trick.
    pub fn play_one_trick(&self, state: GameState) -> Result<GameState, EngineError> {
        self.trick_implementer.play_trick(self, state)
    }

    fn notify_game_end(&self, state: &GameState, winner: Side) {
        let loser = GameState::opposite(winner);
        {
            let winner_perspective = WinnerPerspective::new(state, self, winner);
            state.side(winner).agent.borrow_mut().notify_game_end(true, &winner_perspective);
        }
        {
            let loser_perspective = LoserPerspective::new(state, self, loser);
            state.side(loser).agent.borrow_mut().notify_game_end(false, &loser_perspective);
        }
    }

    /// Notify both agents that a trump exchange occurred, in leader-then-
    /// follower order, per spec.md §5.
    pub fn notify_trump_exchange(&self, state: &GameState, exchange: Move) {
        state.leader.agent.borrow_mut().notify_trump_exchange(exchange);
        state.follower.agent.borrow_mut().notify_trump_exchange(exchange);
    }
}

pub fn schnapsen_game_play_engine(hand_size: usize) -> GamePlayEngine {
    GamePlayEngine::new(
        Box::new(SchnapsenDeckGenerator),
        Box::new(SchnapsenHandGenerator),
        Box::new(crate::validate::SchnapsenMoveValidator),
        Box::new(crate::trick::SchnapsenTrickImplementer::new(crate::trick::SimpleMoveRequester)),
        Box::new(crate::scorer::SchnapsenTrickScorer),
        hand_size,
    )
}
