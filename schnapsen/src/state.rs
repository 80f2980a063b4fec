//! State containers (L2): `Hand`, `Talon`, `Score`, `BotState`, `Previous`,
//! `GameState`, and the derived `GamePhase` view.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::deck::{Card, CardCollection, Suit};
use crate::errors::{HandError, TalonError};
use crate::moves::Move;

/// Number of cards a Schnapsen hand ever holds at once.
pub const HAND_CAPACITY: usize = 5;

/// An ordered, mutable multiset of cards with a maximum capacity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hand {
    cards: Vec<Card>,
    max_size: usize,
}

impl Hand {
    pub fn new(cards: Vec<Card>, max_size: usize) -> Self {
        assert!(
            cards.len() <= max_size,
            "hand has {} cards, more than the maximum of {max_size}",
            cards.len()
        );
        Hand { cards, max_size }
    }

    /// A hand with the standard Schnapsen capacity of 5.
    pub fn with_capacity(cards: Vec<Card>) -> Self {
        Hand::new(cards, HAND_CAPACITY)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn add(&mut self, card: Card) -> Result<(), HandError> {
        if self.cards.len() >= self.max_size {
            return Err(HandError::Full { max_size: self.max_size });
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove one occurrence of `card` from the hand.
    pub fn remove(&mut self, card: Card) -> Result<(), HandError> {
        let position = self
            .cards
            .iter()
            .position(|&c| c == card)
            .ok_or(HandError::CardNotHeld { card })?;
        self.cards.remove(position);
        Ok(())
    }

    pub fn has(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn has_cards(&self, cards: &[Card]) -> bool {
        cards.iter().all(|card| self.has(card))
    }
}

impl CardCollection for Hand {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// The face-down draw pile. `cards()[0]` is the top (drawable next);
/// `cards()[last]` is the bottommost card, whose suit is the trump suit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Talon {
    cards: Vec<Card>,
    trump_suit: Suit,
}

impl Talon {
    /// Build a talon from `cards` (top to bottom). If `cards` is non-empty,
    /// the trump suit is taken from the bottommost card; if `trump_suit` is
    /// also given, it must agree. If `cards` is empty, `trump_suit` must be
    /// supplied (the talon has been exhausted but the trump suit it
    /// established is still load-bearing for the rest of the game).
    pub fn new(cards: Vec<Card>, trump_suit: Option<Suit>) -> Self {
        let resolved = match (cards.last(), trump_suit) {
            (Some(bottom), Some(declared)) => {
                assert_eq!(bottom.suit(), declared, "talon's bottommost card must match the declared trump suit");
                declared
            }
            (Some(bottom), None) => bottom.suit(),
            (None, Some(declared)) => declared,
            (None, None) => panic!("an empty talon must be given an explicit trump suit"),
        };
        Talon { cards, trump_suit: resolved }
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    /// The visible trump card at the bottom of the talon, if any remain.
    pub fn trump_card(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Draw `amount` cards from the top of the talon.
    pub fn draw_n(&mut self, amount: usize) -> Result<Vec<Card>, TalonError> {
        if self.cards.len() < amount {
            return Err(TalonError::UnderSupplied { requested: amount, available: self.cards.len() });
        }
        Ok(self.cards.drain(0..amount).collect())
    }

    /// Atomically swap the bottommost (trump) card for `new_trump`, a jack of
    /// the same suit, and return the displaced trump card. Requires at least
    /// two cards on the talon. The trump suit itself never changes.
    pub fn trump_exchange(&mut self, new_trump: Card) -> Result<Card, TalonError> {
        if new_trump.rank() != crate::deck::Rank::Jack {
            return Err(TalonError::NotAJack { card: new_trump });
        }
        if self.cards.len() < 2 {
            return Err(TalonError::TooFewForExchange { available: self.cards.len() });
        }
        if new_trump.suit() != self.trump_suit {
            return Err(TalonError::WrongSuit { card: new_trump });
        }
        let last = self.cards.len() - 1;
        let old_trump = self.cards[last];
        self.cards[last] = new_trump;
        Ok(old_trump)
    }
}

/// An immutable pair of (direct, pending) points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub direct_points: i64,
    pub pending_points: i64,
}

impl Score {
    pub fn new(direct_points: i64, pending_points: i64) -> Self {
        Score { direct_points, pending_points }
    }

    /// Move all pending points into direct points, leaving pending at 0.
    pub fn redeem_pending_points(self) -> Score {
        Score { direct_points: self.direct_points + self.pending_points, pending_points: 0 }
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score {
            direct_points: self.direct_points + other.direct_points,
            pending_points: self.pending_points + other.pending_points,
        }
    }
}

/// Which side of the table a perspective or bot state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Leader,
    Follower,
}

/// Shared handle to a live [`Agent`]. Multiple [`BotState`]s across a game's
/// history chain point at the same underlying agent instance — the agent's
/// own internal state (an rng, a search cache, ...) must evolve continuously
/// across tricks, so it cannot simply be deep-copied alongside the hand and
/// score. `Rc<RefCell<_>>` is the documented exception to this crate's
/// otherwise move/owned-copy style (spec.md §9, "avoid reference-counted
/// sharing unless Previous chains become hot" — here the chain's whole point
/// is to keep re-invoking the same live agent).
pub type AgentHandle = Rc<RefCell<dyn Agent>>;

pub fn agent_handle<A: Agent + 'static>(agent: A) -> AgentHandle {
    Rc::new(RefCell::new(agent))
}

/// A bot's mutable per-game container: its implementation, hand, score, and
/// the cards it has won so far.
#[derive(Clone)]
pub struct BotState {
    pub agent: AgentHandle,
    pub hand: Hand,
    pub score: Score,
    pub won_cards: Vec<Card>,
    pub name: String,
}

impl BotState {
    pub fn new(agent: AgentHandle, hand: Hand, name: impl Into<String>) -> Self {
        BotState { agent, hand, score: Score::default(), won_cards: Vec::new(), name: name.into() }
    }

    /// A data-only copy sharing the same agent handle: used whenever a new
    /// `GameState` is derived from a previous one mid-game.
    pub fn copy_for_next(&self) -> BotState {
        self.clone()
    }

    /// A copy with a new agent substituted in, used by
    /// `GamePlayEngine::copy_with_other_bots` and by search agents that
    /// sample an assumption and then want to roll it out with real bots.
    pub fn with_agent(&self, agent: AgentHandle) -> BotState {
        BotState { agent, hand: self.hand.clone(), score: self.score, won_cards: self.won_cards.clone(), name: self.name.clone() }
    }
}

impl std::fmt::Debug for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotState")
            .field("name", &self.name)
            .field("hand", &self.hand)
            .field("score", &self.score)
            .field("won_cards", &self.won_cards)
            .finish()
    }
}

/// The phase of play: `One` while the talon still has cards (no follow-suit
/// obligation), `Two` once it is empty (follow-suit rules apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    One,
    Two,
}

/// The outcome of one completed trick, as recorded in history.
#[derive(Debug, Clone)]
pub enum TrickRecord {
    Regular { leader_move: Move, follower_move: Move },
    Exchange { exchange: Move, displaced_trump: Card },
}

impl TrickRecord {
    /// All cards that became publicly visible as a result of this trick.
    pub fn revealed_cards(&self) -> Vec<Card> {
        match self {
            TrickRecord::Regular { leader_move, follower_move } => {
                let mut cards = leader_move.cards();
                cards.extend(follower_move.cards());
                cards
            }
            TrickRecord::Exchange { exchange, displaced_trump } => {
                let mut cards = exchange.cards();
                cards.push(*displaced_trump);
                cards
            }
        }
    }
}

/// An immutable link in the append-only history chain: the state before a
/// trick, the trick that was played, and whether the leader kept the lead.
pub struct Previous {
    pub prior_state: Box<GameState>,
    pub trick: TrickRecord,
    pub leader_remained_leader: bool,
}

/// The full, authoritative state of a game in progress. `leader` is whoever
/// plays first in the *next* trick.
pub struct GameState {
    pub leader: BotState,
    pub follower: BotState,
    pub talon: Talon,
    pub previous: Option<Previous>,
}

impl GameState {
    pub fn new(leader: BotState, follower: BotState, talon: Talon) -> Self {
        GameState { leader, follower, talon, previous: None }
    }

    pub fn trump_suit(&self) -> Suit {
        self.talon.trump_suit()
    }

    pub fn game_phase(&self) -> GamePhase {
        if self.talon.is_empty() {
            GamePhase::Two
        } else {
            GamePhase::One
        }
    }

    pub fn all_cards_played(&self) -> bool {
        self.leader.hand.is_empty() && self.follower.hand.is_empty() && self.talon.is_empty()
    }

    /// A fresh, mutable state ready to have the next trick played into it:
    /// leader/follower data is cloned (sharing agent handles), the talon is
    /// cloned, and `previous` starts `None` — the caller links it in once the
    /// trick completes.
    pub fn copy_for_next(&self) -> GameState {
        GameState { leader: self.leader.copy_for_next(), follower: self.follower.copy_for_next(), talon: self.talon.clone(), previous: None }
    }

    /// A copy with both bot implementations substituted, used to continue
    /// play from an assumption or to hand a state to different search
    /// agents. Hand/score/won_cards/talon are preserved exactly.
    pub fn copy_with_other_bots(&self, leader_agent: AgentHandle, follower_agent: AgentHandle) -> GameState {
        GameState {
            leader: self.leader.with_agent(leader_agent),
            follower: self.follower.with_agent(follower_agent),
            talon: self.talon.clone(),
            previous: None,
        }
    }

    pub fn side(&self, side: Side) -> &BotState {
        match side {
            Side::Leader => &self.leader,
            Side::Follower => &self.follower,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BotState {
        match side {
            Side::Leader => &mut self.leader,
            Side::Follower => &mut self.follower,
        }
    }

    pub fn opposite(side: Side) -> Side {
        match side {
            Side::Leader => Side::Follower,
            Side::Follower => Side::Leader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Rank;

    #[test]
    fn score_addition_and_redemption() {
        let s1 = Score::new(10, 20);
        let s2 = Score::new(5, 0);
        assert_eq!(s1 + s2, Score::new(15, 20));
        assert_eq!(s1 + Score::default(), s1);
        assert_eq!((s1 + s2) + Score::default(), s2 + s1);
        assert_eq!(s1.redeem_pending_points(), Score::new(30, 0));
        assert_eq!(s1.redeem_pending_points().pending_points, 0);
    }

    #[test]
    fn hand_capacity_enforced() {
        let mut hand = Hand::with_capacity(vec![]);
        for suit in Suit::ALL {
            hand.add(Card::canonical(Rank::Ace, suit)).unwrap();
        }
        assert!(hand.add(Card::canonical(Rank::Ten, Suit::Hearts)).is_err());
    }

    #[test]
    fn hand_remove_missing_card_errors() {
        let mut hand = Hand::with_capacity(vec![Card::canonical(Rank::Jack, Suit::Hearts)]);
        assert!(hand.remove(Card::canonical(Rank::Queen, Suit::Hearts)).is_err());
        assert!(hand.remove(Card::canonical(Rank::Jack, Suit::Hearts)).is_ok());
        assert!(hand.is_empty());
    }

    #[test]
    fn talon_trump_exchange_displaces_the_bottom_card() {
        let jack = Card::canonical(Rank::Jack, Suit::Hearts);
        let ten = Card::canonical(Rank::Ten, Suit::Hearts);
        let ace = Card::canonical(Rank::Ace, Suit::Hearts);
        let mut talon = Talon::new(vec![ten, ace], None);
        assert_eq!(talon.trump_suit(), Suit::Hearts);
        let displaced = talon.trump_exchange(jack).unwrap();
        assert_eq!(displaced, ace);
        assert_eq!(talon.trump_card(), Some(jack));

        // `displaced` is an Ace, not a Jack, so it can't itself be exchanged back
        // in; the pre-exchange talon can only be reconstructed directly.
        let original = Talon::new(vec![ten, ace], None);
        assert_eq!(original.cards(), &[ten, ace]);
    }

    #[test]
    fn talon_exchange_requires_two_cards() {
        let jack = Card::canonical(Rank::Jack, Suit::Hearts);
        let ace = Card::canonical(Rank::Ace, Suit::Hearts);
        let mut talon = Talon::new(vec![ace], None);
        assert!(talon.trump_exchange(jack).is_err());
    }

    #[test]
    fn talon_exchange_rejects_wrong_suit_or_rank() {
        let ten = Card::canonical(Rank::Ten, Suit::Hearts);
        let ace = Card::canonical(Rank::Ace, Suit::Hearts);
        let mut talon = Talon::new(vec![ten, ace], None);
        assert!(talon.trump_exchange(Card::canonical(Rank::Jack, Suit::Clubs)).is_err());
        assert!(talon.trump_exchange(Card::canonical(Rank::Queen, Suit::Hearts)).is_err());
    }
}
