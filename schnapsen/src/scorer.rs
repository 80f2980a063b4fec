//! The trick scorer (L5): rank→points table, trick winner determination,
//! marriage pending points, and game-point award.

use crate::deck::{Card, Rank, Suit};
use crate::errors::EngineError;
use crate::state::{BotState, GameState, Score, Side};

/// Game points awarded at game end: 1 (Normal), 2 (Schneider), 3 (Schwarz).
pub type GamePoints = u8;

/// The pluggable scoring capability: a rank→points table plus the winner and
/// game-end rules built on it. [`SchnapsenTrickScorer`] is the standard
/// table; the variants in [`crate::variants`] only ever override
/// `rank_to_points`.
pub trait TrickScorer {
    fn rank_to_points(&self, rank: Rank) -> i64;

    /// Pending points added to the declarer's score for announcing a
    /// marriage in `suit`, given the game's `trump` suit: 40 if royal
    /// (marriage suit == trump), else 20.
    fn marriage_score(&self, suit: Suit, trump: Suit) -> Score {
        if suit == trump {
            Score::new(0, 40)
        } else {
            Score::new(0, 20)
        }
    }

    /// Which side wins a trick of (leader_card, follower_card) given the
    /// trump suit.
    fn trick_winner(&self, leader_card: Card, follower_card: Card, trump: Suit) -> Side {
        if leader_card.suit() == follower_card.suit() {
            if self.rank_to_points(leader_card.rank()) > self.rank_to_points(follower_card.rank()) {
                Side::Leader
            } else {
                Side::Follower
            }
        } else if leader_card.suit() == trump {
            Side::Leader
        } else if follower_card.suit() == trump {
            Side::Follower
        } else {
            Side::Leader
        }
    }

    /// Apply the result of one trick: the winner collects both cards,
    /// gains the sum of their point values as direct points, and redeems
    /// any pending (marriage) points. Returns the winning side.
    fn score_trick(&self, leader_card: Card, follower_card: Card, leader: &mut BotState, follower: &mut BotState, trump: Suit) -> Side {
        let winner_side = self.trick_winner(leader_card, follower_card, trump);
        let points_gained = self.rank_to_points(leader_card.rank()) + self.rank_to_points(follower_card.rank());
        let winner = match winner_side {
            Side::Leader => &mut *leader,
            Side::Follower => &mut *follower,
        };
        winner.won_cards.push(leader_card);
        winner.won_cards.push(follower_card);
        winner.score = (winner.score + Score::new(points_gained, 0)).redeem_pending_points();
        winner_side
    }

    /// Evaluate whether the game has a winner yet, following
    /// <https://www.pagat.com/marriage/schnaps.html#marriages>, simplified
    /// because this engine never closes the talon.
    fn declare_winner(&self, state: &GameState) -> Result<Option<(Side, GamePoints)>, EngineError> {
        let leader_points = state.leader.score.direct_points;
        let follower_points = state.follower.score.direct_points;
        if leader_points >= 66 {
            let points = if follower_points == 0 {
                3
            } else if follower_points >= 33 {
                1
            } else {
                2
            };
            Ok(Some((Side::Leader, points)))
        } else if follower_points >= 66 {
            Err(EngineError::InvariantViolation(
                "follower reached 66 direct points before becoming leader; the trick winner must become leader before the next check".to_string(),
            ))
        } else if state.all_cards_played() {
            Ok(Some((Side::Leader, 1)))
        } else {
            Ok(None)
        }
    }
}

/// The standard Schnapsen rank→points table: Ace=11, Ten=10, King=4, Queen=3,
/// Jack=2.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnapsenTrickScorer;

impl TrickScorer for SchnapsenTrickScorer {
    fn rank_to_points(&self, rank: Rank) -> i64 {
        match rank {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
            other => panic!("{other:?} has no point value in standard Schnapsen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Suit;
    use crate::state::{agent_handle, BotState, Hand};
    use crate::agent::DummyAgent;

    fn bot(name: &str) -> BotState {
        BotState::new(agent_handle(DummyAgent), Hand::with_capacity(vec![]), name)
    }

    #[test]
    fn same_suit_higher_card_wins() {
        let scorer = SchnapsenTrickScorer;
        let leader_card = Card::canonical(Rank::King, Suit::Hearts);
        let follower_card = Card::canonical(Rank::Ace, Suit::Hearts);
        assert_eq!(scorer.trick_winner(leader_card, follower_card, Suit::Spades), Side::Follower);
    }

    #[test]
    fn trump_beats_offsuit() {
        let scorer = SchnapsenTrickScorer;
        let leader_card = Card::canonical(Rank::Jack, Suit::Clubs);
        let follower_card = Card::canonical(Rank::Ten, Suit::Clubs);
        assert_eq!(scorer.trick_winner(leader_card, follower_card, Suit::Hearts), Side::Follower);
        let leader_card = Card::canonical(Rank::Jack, Suit::Hearts);
        assert_eq!(scorer.trick_winner(leader_card, follower_card, Suit::Hearts), Side::Leader);
    }

    #[test]
    fn follower_failing_to_follow_or_trump_loses() {
        let scorer = SchnapsenTrickScorer;
        let leader_card = Card::canonical(Rank::Ten, Suit::Clubs);
        let follower_card = Card::canonical(Rank::Ace, Suit::Diamonds);
        assert_eq!(scorer.trick_winner(leader_card, follower_card, Suit::Hearts), Side::Leader);
    }

    #[test]
    fn marriage_pending_points() {
        let scorer = SchnapsenTrickScorer;
        assert_eq!(scorer.marriage_score(Suit::Hearts, Suit::Hearts), Score::new(0, 40));
        assert_eq!(scorer.marriage_score(Suit::Hearts, Suit::Spades), Score::new(0, 20));
    }

    #[test]
    fn schwarz_schneider_and_normal_awards() {
        let scorer = SchnapsenTrickScorer;
        let mut state = GameState::new(bot("leader"), bot("follower"), crate::state::Talon::new(vec![Card::canonical(Rank::Ace, Suit::Hearts)], None));

        state.leader.score = Score::new(66, 0);
        state.follower.score = Score::new(0, 0);
        assert_eq!(scorer.declare_winner(&state).unwrap(), Some((Side::Leader, 3)));

        state.follower.score = Score::new(32, 0);
        assert_eq!(scorer.declare_winner(&state).unwrap(), Some((Side::Leader, 2)));

        state.follower.score = Score::new(33, 0);
        assert_eq!(scorer.declare_winner(&state).unwrap(), Some((Side::Leader, 1)));

        state.follower.score = Score::new(65, 0);
        assert_eq!(scorer.declare_winner(&state).unwrap(), Some((Side::Leader, 1)));
    }

    #[test]
    fn exact_66_vs_65() {
        let scorer = SchnapsenTrickScorer;
        let mut state = GameState::new(bot("leader"), bot("follower"), crate::state::Talon::new(vec![Card::canonical(Rank::Ace, Suit::Hearts)], None));
        state.leader.score = Score::new(65, 0);
        state.follower.score = Score::new(40, 0);
        assert_eq!(scorer.declare_winner(&state).unwrap(), None);
        state.leader.score = Score::new(66, 0);
        assert!(scorer.declare_winner(&state).unwrap().is_some());
    }

    #[test]
    fn follower_reaching_66_first_is_an_engine_error() {
        let scorer = SchnapsenTrickScorer;
        let mut state = GameState::new(bot("leader"), bot("follower"), crate::state::Talon::new(vec![Card::canonical(Rank::Ace, Suit::Hearts)], None));
        state.follower.score = Score::new(66, 0);
        assert!(scorer.declare_winner(&state).is_err());
    }
}
