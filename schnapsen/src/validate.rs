//! The move validator (L3): phase-aware legal-move enumeration.

use crate::deck::{CardCollection, Rank};
use crate::moves::Move;
use crate::scorer::TrickScorer;
use crate::state::{GamePhase, GameState};

/// The pluggable legality capability. [`SchnapsenMoveValidator`] is the only
/// implementation this crate ships; variants only ever swap the
/// [`TrickScorer`] they are handed, not the validator itself.
pub trait MoveValidator {
    fn legal_leader_moves(&self, state: &GameState) -> Vec<Move>;
    fn legal_follower_moves(&self, state: &GameState, scorer: &dyn TrickScorer, leader_move: &Move) -> Vec<Move>;

    fn is_legal_leader_move(&self, state: &GameState, mv: &Move) -> bool {
        self.legal_leader_moves(state).contains(mv)
    }

    fn is_legal_follower_move(&self, state: &GameState, scorer: &dyn TrickScorer, leader_move: &Move, mv: &Move) -> bool {
        self.legal_follower_moves(state, scorer, leader_move).contains(mv)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenMoveValidator;

impl MoveValidator for SchnapsenMoveValidator {
    fn legal_leader_moves(&self, state: &GameState) -> Vec<Move> {
        let hand = &state.leader.hand;
        let mut moves: Vec<Move> = hand.cards().iter().map(|&card| Move::Regular(card)).collect();

        if !state.talon.is_empty() {
            let trump_jack = crate::deck::Card::canonical(Rank::Jack, state.trump_suit());
            if hand.has(&trump_jack) {
                moves.push(Move::trump_exchange(trump_jack));
            }
        }

        for queen in hand.filter_rank(Rank::Queen) {
            let king = crate::deck::Card::canonical(Rank::King, queen.suit());
            if hand.has(&king) {
                moves.push(Move::marriage(queen, king));
            }
        }

        moves
    }

    fn legal_follower_moves(&self, state: &GameState, scorer: &dyn TrickScorer, leader_move: &Move) -> Vec<Move> {
        let hand = &state.follower.hand;
        let leader_card = leader_move.leader_card();

        if state.game_phase() == GamePhase::One {
            // No obligation to follow suit in phase one.
            return hand.cards().iter().map(|&card| Move::Regular(card)).collect();
        }

        let leader_points = scorer.rank_to_points(leader_card.rank());
        let same_suit = hand.filter_suit(leader_card.suit());
        if !same_suit.is_empty() {
            let (higher, lower): (Vec<_>, Vec<_>) = same_suit.into_iter().partition(|card| scorer.rank_to_points(card.rank()) > leader_points);
            if !higher.is_empty() {
                return higher.into_iter().map(Move::Regular).collect();
            }
            // same_suit was non-empty and none were higher, so lower must be non-empty.
            return lower.into_iter().map(Move::Regular).collect();
        }

        let trump_cards = hand.filter_suit(state.trump_suit());
        if leader_card.suit() != state.trump_suit() && !trump_cards.is_empty() {
            return trump_cards.into_iter().map(Move::Regular).collect();
        }

        hand.cards().iter().map(|&card| Move::Regular(card)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DummyAgent;
    use crate::deck::{Card, Suit};
    use crate::scorer::SchnapsenTrickScorer;
    use crate::state::{agent_handle, BotState, GameState, Hand, Talon};

    fn state_with_hands(leader_cards: Vec<Card>, follower_cards: Vec<Card>, talon_cards: Vec<Card>) -> GameState {
        let leader = BotState::new(agent_handle(DummyAgent), Hand::with_capacity(leader_cards), "leader");
        let follower = BotState::new(agent_handle(DummyAgent), Hand::with_capacity(follower_cards), "follower");
        let talon = if talon_cards.is_empty() {
            Talon::new(vec![], Some(Suit::Hearts))
        } else {
            Talon::new(talon_cards, None)
        };
        GameState::new(leader, follower, talon)
    }

    #[test]
    fn leader_sees_regular_marriage_and_exchange_moves() {
        let hand = vec![
            Card::canonical(Rank::Jack, Suit::Hearts),
            Card::canonical(Rank::Queen, Suit::Spades),
            Card::canonical(Rank::King, Suit::Spades),
        ];
        let state = state_with_hands(hand, vec![], vec![Card::canonical(Rank::Ace, Suit::Hearts), Card::canonical(Rank::Ten, Suit::Hearts)]);
        let validator = SchnapsenMoveValidator;
        let moves = validator.legal_leader_moves(&state);
        // 3 regular + 1 marriage + 1 trump exchange (trump suit is Hearts, jack held is Hearts).
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().any(Move::is_trump_exchange));
        assert!(moves.iter().any(Move::is_marriage));
    }

    #[test]
    fn leader_trump_exchange_requires_two_talon_cards() {
        let hand = vec![Card::canonical(Rank::Jack, Suit::Hearts)];
        let with_talon = state_with_hands(hand.clone(), vec![], vec![Card::canonical(Rank::Ace, Suit::Hearts), Card::canonical(Rank::Ten, Suit::Hearts)]);
        let validator = SchnapsenMoveValidator;
        assert!(validator.legal_leader_moves(&with_talon).iter().any(Move::is_trump_exchange));

        let without_enough_talon = state_with_hands(hand, vec![], vec![]);
        assert!(!validator.legal_leader_moves(&without_enough_talon).iter().any(Move::is_trump_exchange));
    }

    #[test]
    fn phase_one_follower_is_unconstrained() {
        let leader_hand = vec![Card::canonical(Rank::Ten, Suit::Hearts)];
        let follower_hand = vec![Card::canonical(Rank::Ace, Suit::Clubs), Card::canonical(Rank::King, Suit::Spades)];
        let state = state_with_hands(leader_hand, follower_hand, vec![Card::canonical(Rank::Jack, Suit::Diamonds), Card::canonical(Rank::Ten, Suit::Diamonds)]);
        let validator = SchnapsenMoveValidator;
        let scorer = SchnapsenTrickScorer;
        let moves = validator.legal_follower_moves(&state, &scorer, &Move::Regular(Card::canonical(Rank::Ten, Suit::Hearts)));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn phase_two_must_overtrump_if_possible() {
        let leader_hand = vec![];
        let follower_hand = vec![Card::canonical(Rank::Ace, Suit::Hearts), Card::canonical(Rank::Jack, Suit::Hearts)];
        let state = state_with_hands(leader_hand, follower_hand, vec![]);
        let validator = SchnapsenMoveValidator;
        let scorer = SchnapsenTrickScorer;
        let moves = validator.legal_follower_moves(&state, &scorer, &Move::Regular(Card::canonical(Rank::Ten, Suit::Hearts)));
        assert_eq!(moves, vec![Move::Regular(Card::canonical(Rank::Ace, Suit::Hearts))]);
    }

    #[test]
    fn phase_two_forced_trump_when_no_same_suit() {
        let leader_hand = vec![];
        let follower_hand = vec![Card::canonical(Rank::Jack, Suit::Clubs), Card::canonical(Rank::Ace, Suit::Diamonds)];
        let state = state_with_hands(leader_hand, follower_hand, vec![]);
        let validator = SchnapsenMoveValidator;
        let scorer = SchnapsenTrickScorer;
        // trump suit is Clubs (bottommost-derived trump before talon emptied out);
        // but our test talon is empty, so it had to be declared explicitly.
        let mut state = state;
        state.talon = Talon::new(vec![], Some(Suit::Clubs));
        let moves = validator.legal_follower_moves(&state, &scorer, &Move::Regular(Card::canonical(Rank::Ten, Suit::Hearts)));
        assert_eq!(moves, vec![Move::Regular(Card::canonical(Rank::Jack, Suit::Clubs))]);
    }
}
