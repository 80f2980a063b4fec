//! Deck and scoring variants (spec.md §8): alternate [`DeckGenerator`] and
//! [`TrickScorer`] instantiations plugged into the same [`GamePlayEngine`]
//! rather than new crates or new state machinery.

use crate::deck::{Card, CardCollection, OrderedCardCollection, Rank, Suit};
use crate::engine::{schnapsen_game_play_engine, DeckGenerator, GamePlayEngine, SchnapsenDeckGenerator};
use crate::scorer::{SchnapsenTrickScorer, TrickScorer};
use crate::state::HAND_CAPACITY;
use crate::trick::{SchnapsenTrickImplementer, SimpleMoveRequester};
use crate::validate::SchnapsenMoveValidator;

/// The standard 20-card engine: J/Q/K/10/A, rank→points Ace=11 Ten=10 King=4
/// Queen=3 Jack=2.
pub fn schnapsen_engine() -> GamePlayEngine {
    schnapsen_game_play_engine(HAND_CAPACITY)
}

/// Prepends a Nine of each suit to the standard deck, making 24 cards in
/// play. Hand size is unchanged (5); the four extra cards lengthen the
/// talon instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwentyFourCardDeckGenerator;

impl DeckGenerator for TwentyFourCardDeckGenerator {
    fn get_initial_deck(&self) -> OrderedCardCollection {
        let mut cards = Vec::with_capacity(6 * Suit::ALL.len());
        for &suit in &Suit::ALL {
            cards.push(Card::canonical(Rank::Nine, suit));
        }
        cards.extend(SchnapsenDeckGenerator.get_initial_deck().into_cards());
        OrderedCardCollection::new(cards)
    }
}

/// The standard table plus Nine=1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwentyFourCardTrickScorer;

impl TrickScorer for TwentyFourCardTrickScorer {
    fn rank_to_points(&self, rank: Rank) -> i64 {
        match rank {
            Rank::Nine => 1,
            other => SchnapsenTrickScorer.rank_to_points(other),
        }
    }
}

pub fn twenty_four_card_engine() -> GamePlayEngine {
    GamePlayEngine::new(
        Box::new(TwentyFourCardDeckGenerator),
        Box::new(crate::engine::SchnapsenHandGenerator),
        Box::new(SchnapsenMoveValidator),
        Box::new(SchnapsenTrickImplementer::new(SimpleMoveRequester)),
        Box::new(TwentyFourCardTrickScorer),
        HAND_CAPACITY,
    )
}

/// Ace-One scoring: the ace is worth only 1 point instead of 11, rebalancing
/// the standard table toward the ten as the highest-value card.
#[derive(Debug, Clone, Copy, Default)]
pub struct AceOneTrickScorer;

impl TrickScorer for AceOneTrickScorer {
    fn rank_to_points(&self, rank: Rank) -> i64 {
        match rank {
            Rank::Ace => 1,
            other => SchnapsenTrickScorer.rank_to_points(other),
        }
    }
}

pub fn ace_one_engine() -> GamePlayEngine {
    GamePlayEngine::new(
        Box::new(SchnapsenDeckGenerator),
        Box::new(crate::engine::SchnapsenHandGenerator),
        Box::new(SchnapsenMoveValidator),
        Box::new(SchnapsenTrickImplementer::new(SimpleMoveRequester)),
        Box::new(AceOneTrickScorer),
        HAND_CAPACITY,
    )
}

/// Negative-Ace scoring: a penalty variant where holding the ace costs the
/// trick winner 11 points instead of earning them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeAceTrickScorer;

impl TrickScorer for NegativeAceTrickScorer {
    fn rank_to_points(&self, rank: Rank) -> i64 {
        match rank {
            Rank::Ace => -11,
            other => SchnapsenTrickScorer.rank_to_points(other),
        }
    }
}

pub fn negative_ace_engine() -> GamePlayEngine {
    GamePlayEngine::new(
        Box::new(SchnapsenDeckGenerator),
        Box::new(crate::engine::SchnapsenHandGenerator),
        Box::new(SchnapsenMoveValidator),
        Box::new(SchnapsenTrickImplementer::new(SimpleMoveRequester)),
        Box::new(NegativeAceTrickScorer),
        HAND_CAPACITY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_four_card_deck_has_six_suits_worth_of_ranks() {
        let deck = TwentyFourCardDeckGenerator.get_initial_deck();
        assert_eq!(deck.len(), 24);
        assert_eq!(deck.filter_rank(Rank::Nine).len(), 4);
    }

    #[test]
    fn ace_one_devalues_the_ace() {
        let scorer = AceOneTrickScorer;
        assert_eq!(scorer.rank_to_points(Rank::Ace), 1);
        assert_eq!(scorer.rank_to_points(Rank::Ten), 10);
    }

    #[test]
    fn negative_ace_penalizes_the_ace() {
        let scorer = NegativeAceTrickScorer;
        assert_eq!(scorer.rank_to_points(Rank::Ace), -11);
    }
}
