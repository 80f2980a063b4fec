//! The move algebra (L1): the three shapes a turn can take.

use crate::deck::{Card, Rank, Suit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single decision a player can make during a trick.
///
/// `Marriage` asserts in its constructor that the queen and king share a
/// suit, and `TrumpExchange` asserts its card is a jack — both invariants are
/// structural, not re-checked by callers, the same way the reference
/// implementation's frozen dataclasses assert in `__post_init__`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Move {
    Regular(Card),
    Marriage { queen: Card, king: Card },
    TrumpExchange(Card),
}

impl Move {
    /// Construct a marriage move. Panics if the two cards are not,
    /// respectively, a queen and a king of the same suit.
    pub fn marriage(queen: Card, king: Card) -> Move {
        assert_eq!(queen.rank(), Rank::Queen, "marriage must be declared with a queen");
        assert_eq!(king.rank(), Rank::King, "marriage must be declared with a king");
        assert_eq!(queen.suit(), king.suit(), "marriage queen and king must share a suit");
        Move::Marriage { queen, king }
    }

    /// Construct a trump exchange move. Panics if the card is not a jack.
    pub fn trump_exchange(jack: Card) -> Move {
        assert_eq!(jack.rank(), Rank::Jack, "trump exchange must be played with a jack");
        Move::TrumpExchange(jack)
    }

    /// All cards this move involves.
    pub fn cards(&self) -> Vec<Card> {
        match self {
            Move::Regular(card) => vec![*card],
            Move::Marriage { queen, king } => vec![*queen, *king],
            Move::TrumpExchange(jack) => vec![*jack],
        }
    }

    pub fn is_marriage(&self) -> bool {
        matches!(self, Move::Marriage { .. })
    }

    pub fn is_trump_exchange(&self) -> bool {
        matches!(self, Move::TrumpExchange(_))
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, Move::Regular(_))
    }

    /// The suit a marriage was declared in. `None` for non-marriage moves.
    pub fn marriage_suit(&self) -> Option<Suit> {
        match self {
            Move::Marriage { queen, .. } => Some(queen.suit()),
            _ => None,
        }
    }

    /// The card that is physically discarded to the trick. For a marriage
    /// this is the king, per the design note in spec.md §9 ("playing the
    /// king gives you the highest score"): the queen stays in hand as the
    /// declared "leader card" used for phase-two follow-suit legality, and
    /// the king is what actually leaves the hand and is scored in the trick.
    pub fn played_card(&self) -> Card {
        match self {
            Move::Regular(card) => *card,
            Move::Marriage { king, .. } => *king,
            Move::TrumpExchange(jack) => *jack,
        }
    }

    /// The card that determines follow-suit legality for the follower. For a
    /// marriage this is the queen (she is the card "announced" first),
    /// per spec.md §9.
    pub fn leader_card(&self) -> Card {
        match self {
            Move::Regular(card) => *card,
            Move::Marriage { queen, .. } => *queen,
            Move::TrumpExchange(jack) => *jack,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Regular(card) => write!(f, "Regular({card})"),
            Move::Marriage { queen, king } => write!(f, "Marriage(queen={queen}, king={king})"),
            Move::TrumpExchange(jack) => write!(f, "TrumpExchange({jack})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marriage_projects_both_cards() {
        let queen = Card::canonical(Rank::Queen, Suit::Spades);
        let king = Card::canonical(Rank::King, Suit::Spades);
        let mv = Move::marriage(queen, king);
        assert_eq!(mv.cards(), vec![queen, king]);
        assert!(mv.is_marriage());
        assert_eq!(mv.leader_card(), queen);
        assert_eq!(mv.played_card(), king);
    }

    #[test]
    #[should_panic]
    fn marriage_rejects_mismatched_suits() {
        let queen = Card::canonical(Rank::Queen, Suit::Spades);
        let king = Card::canonical(Rank::King, Suit::Hearts);
        Move::marriage(queen, king);
    }

    #[test]
    fn trump_exchange_projects_jack() {
        let jack = Card::canonical(Rank::Jack, Suit::Diamonds);
        let mv = Move::trump_exchange(jack);
        assert_eq!(mv.cards(), vec![jack]);
        assert!(mv.is_trump_exchange());
    }
}
