//! The card model (L0): suits, ranks, cards, and the ordered collections built on them.

use std::collections::HashMap;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the four suits. Closed set; Schnapsen and its variants never add a fifth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Suit {
    Hearts,
    Clubs,
    Spades,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Spades, Suit::Diamonds];
}

/// Rank space for a full 52-card deck. Schnapsen's 20-card deck only ever uses
/// [`Rank::Jack`], [`Rank::Queen`], [`Rank::King`], [`Rank::Ten`], [`Rank::Ace`];
/// the rest of the space exists so the 24-card variant (which adds
/// [`Rank::Nine`]) and any future variant can be expressed without widening
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Canonical iteration order used by the Schnapsen deck generators and by
    /// the feature-vector encoder in [`crate::trace`] (which iterates "the
    /// canonical deck in generator order").
    pub const SCHNAPSEN_RANKS: [Rank; 5] = [Rank::Jack, Rank::Queen, Rank::King, Rank::Ten, Rank::Ace];
}

/// A single playing card, identified by (rank, suit). Two cards with the same
/// rank and suit always compare equal; [`Card::canonical`] returns the single
/// cached instance for a given (rank, suit), mirroring the process-wide card
/// cache of the reference implementation this engine is modeled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Look up the canonical instance of (rank, suit) from the process-wide cache.
    pub fn canonical(rank: Rank, suit: Suit) -> Card {
        static CACHE: OnceLock<HashMap<(Rank, Suit), Card>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| {
            let mut map = HashMap::with_capacity(Rank::ALL.len() * Suit::ALL.len());
            for &rank in &Rank::ALL {
                for &suit in &Suit::ALL {
                    map.insert((rank, suit), Card { rank, suit });
                }
            }
            map
        });
        *cache
            .get(&(rank, suit))
            .expect("every (rank, suit) pair is present in the canonical cache")
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} of {:?}", self.rank, self.suit)
    }
}

/// Shared read-only behavior for finite card collections: iteration,
/// suit/rank filters, length, and membership. Implemented by both
/// [`OrderedCardCollection`] and [`crate::state::Hand`].
pub trait CardCollection {
    fn cards(&self) -> &[Card];

    fn filter_suit(&self, suit: Suit) -> Vec<Card> {
        self.cards().iter().copied().filter(|c| c.suit == suit).collect()
    }

    fn filter_rank(&self, rank: Rank) -> Vec<Card> {
        self.cards().iter().copied().filter(|c| c.rank == rank).collect()
    }

    fn len(&self) -> usize {
        self.cards().len()
    }

    fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    fn contains(&self, card: &Card) -> bool {
        self.cards().contains(card)
    }
}

/// A finite, ordered sequence of cards with no uniqueness constraint unless
/// documented by the caller. Used to represent full decks as they are
/// generated and shuffled, before being dealt into hands and a talon.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderedCardCollection {
    cards: Vec<Card>,
}

impl OrderedCardCollection {
    pub fn new(cards: Vec<Card>) -> Self {
        OrderedCardCollection { cards }
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

impl CardCollection for OrderedCardCollection {
    fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_instances_are_value_equal_and_stable() {
        let a = Card::canonical(Rank::Jack, Suit::Hearts);
        let b = Card::canonical(Rank::Jack, Suit::Hearts);
        assert_eq!(a, b);
        assert_eq!(a.rank(), Rank::Jack);
        assert_eq!(a.suit(), Suit::Hearts);
    }

    #[test]
    fn all_rank_suit_pairs_are_cached() {
        for &rank in &Rank::ALL {
            for &suit in &Suit::ALL {
                let card = Card::canonical(rank, suit);
                assert_eq!(card.rank(), rank);
                assert_eq!(card.suit(), suit);
            }
        }
    }

    #[test]
    fn ordered_collection_filters() {
        let cards = vec![
            Card::canonical(Rank::Jack, Suit::Hearts),
            Card::canonical(Rank::Queen, Suit::Hearts),
            Card::canonical(Rank::Jack, Suit::Clubs),
        ];
        let collection = OrderedCardCollection::new(cards);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.filter_suit(Suit::Hearts).len(), 2);
        assert_eq!(collection.filter_rank(Rank::Jack).len(), 2);
    }
}
