//! ML trace line encoding (spec.md §6.2): a pure feature-vector encoder and
//! line formatter. Deliberately narrow — no file I/O, no trace buffering
//! across a game, no model loading. Those are left to callers outside this
//! crate's scope.

use crate::deck::{CardCollection, Rank, Suit};
use crate::engine::{DeckGenerator, SchnapsenDeckGenerator};
use crate::moves::Move;
use crate::perspective::PlayerPerspective;
use crate::state::GamePhase;

/// Total width of the feature vector for standard (20-card) Schnapsen.
pub const FEATURE_VECTOR_LEN: usize = 165;

fn suit_one_hot(suit: Suit) -> [i64; 4] {
    match suit {
        Suit::Hearts => [0, 0, 0, 1],
        Suit::Clubs => [0, 0, 1, 0],
        Suit::Spades => [0, 1, 0, 0],
        Suit::Diamonds => [1, 0, 0, 0],
    }
}

fn rank_one_hot(rank: Rank) -> [i64; 13] {
    let mut bits = [0i64; 13];
    let index = Rank::ALL.iter().position(|&r| r == rank).expect("Rank::ALL covers every rank");
    // Ace is the highest-order bit, matching the reference encoder's ordering.
    bits[12 - index] = 1;
    bits
}

/// The 16-wide per-move slot: a 3-bit move-type one-hot (regular / exchange /
/// marriage) followed by a 13-bit rank one-hot of the card that determines
/// the move's trick-taking power (`Move::leader_card`). All zero if `mv` is
/// `None`.
///
/// This crate's canonical shape omits a separate suit one-hot from the move
/// slot: spec.md's stated total width (165) only has room for 16 bits per
/// move (3 + 13), not the 20 bits (3 + 13 + 4) the reference implementation's
/// move encoder actually produces. Per spec.md §9's own note that two
/// inconsistent revisions of this encoder exist upstream, this is treated as
/// an open question resolved in favor of the width spec.md states explicitly
/// everywhere else in §6.2 — see DESIGN.md. The card's suit is still fully
/// recoverable from the per-card deck-knowledge block ([13..133)) for any
/// move that changed a card's category.
fn move_features(mv: Option<&Move>) -> [i64; 16] {
    let mut out = [0i64; 16];
    let Some(mv) = mv else {
        return out;
    };
    let type_bits: [i64; 3] = if mv.is_marriage() {
        [0, 0, 1]
    } else if mv.is_trump_exchange() {
        [0, 1, 0]
    } else {
        [1, 0, 0]
    };
    out[0..3].copy_from_slice(&type_bits);
    out[3..16].copy_from_slice(&rank_one_hot(mv.leader_card().rank()));
    out
}

/// Encode one decision point into the fixed-width feature vector described
/// in spec.md §6.2. `leader_move`/`follower_move` are the moves actually
/// played in the trick this perspective is being recorded for; pass `None`
/// for a move that has not happened yet (or never will, e.g. a trump
/// exchange trick has no follower move).
pub fn encode_features(perspective: &dyn PlayerPerspective, leader_move: Option<&Move>, follower_move: Option<&Move>) -> [i64; FEATURE_VECTOR_LEN] {
    let mut features = [0i64; FEATURE_VECTOR_LEN];
    let mut cursor = 0usize;

    let own_score = perspective.own_score();
    let opponent_score = perspective.opponent_score();
    let state_scalars = [own_score.direct_points, own_score.pending_points, opponent_score.direct_points, opponent_score.pending_points];
    features[cursor..cursor + 4].copy_from_slice(&state_scalars);
    cursor += 4;

    features[cursor..cursor + 4].copy_from_slice(&suit_one_hot(perspective.trump_suit()));
    cursor += 4;

    features[cursor..cursor + 2].copy_from_slice(&if perspective.phase() == GamePhase::Two { [1, 0] } else { [0, 1] });
    cursor += 2;

    features[cursor] = perspective.talon_size() as i64;
    cursor += 1;

    features[cursor..cursor + 2].copy_from_slice(&if perspective.am_i_leader() { [0, 1] } else { [1, 0] });
    cursor += 2;

    let hand = perspective.hand();
    let own_won = perspective.own_won_cards();
    let opponent_won = perspective.opponent_won_cards();
    let opponent_known = perspective.known_opponent_cards(None);
    let trump_card = perspective.trump_card();

    for card in SchnapsenDeckGenerator.get_initial_deck().cards() {
        let category: [i64; 6] = if hand.has(card) {
            [0, 0, 0, 0, 0, 1]
        } else if own_won.contains(card) {
            [0, 0, 0, 0, 1, 0]
        } else if opponent_known.contains(card) {
            [0, 0, 0, 1, 0, 0]
        } else if opponent_won.contains(card) {
            [0, 0, 1, 0, 0, 0]
        } else if trump_card == Some(*card) {
            [0, 1, 0, 0, 0, 0]
        } else {
            [1, 0, 0, 0, 0, 0]
        };
        features[cursor..cursor + 6].copy_from_slice(&category);
        cursor += 6;
    }

    features[cursor..cursor + 16].copy_from_slice(&move_features(leader_move));
    cursor += 16;
    features[cursor..cursor + 16].copy_from_slice(&move_features(follower_move));
    cursor += 16;

    debug_assert_eq!(cursor, FEATURE_VECTOR_LEN);
    features
}

/// Format one trace line: `<features, comma-separated> || <0|1>\n`.
pub fn format_trace_line(features: &[i64], bot_won: bool) -> String {
    let joined = features.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    format!("{joined} || {}\n", if bot_won { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Card;
    use crate::state::{agent_handle, BotState, GameState, Hand, Talon};
    use crate::agent::DummyAgent;
    use crate::perspective::LeaderPerspective;
    use crate::variants::schnapsen_engine;

    #[test]
    fn feature_vector_has_the_spec_width() {
        let engine = schnapsen_engine();
        let leader = BotState::new(agent_handle(DummyAgent), Hand::with_capacity(vec![Card::canonical(Rank::Jack, Suit::Hearts)]), "leader");
        let follower = BotState::new(agent_handle(DummyAgent), Hand::with_capacity(vec![]), "follower");
        let talon = Talon::new(vec![Card::canonical(Rank::Ace, Suit::Hearts)], None);
        let state = GameState::new(leader, follower, talon);
        let perspective = LeaderPerspective::new(&state, &engine);

        let features = encode_features(&perspective, None, None);
        assert_eq!(features.len(), FEATURE_VECTOR_LEN);
        // own hand's jack of hearts is marked own-hand in its deck slot.
        assert_eq!(&features[13..19], &[0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn move_slot_encodes_type_and_rank_and_zeros_when_absent() {
        let regular = Move::Regular(Card::canonical(Rank::Ace, Suit::Clubs));
        let encoded = move_features(Some(&regular));
        assert_eq!(&encoded[0..3], &[1, 0, 0]);
        assert_eq!(encoded[15], 1); // ace is the highest-order rank bit
        assert_eq!(move_features(None), [0i64; 16]);
    }

    #[test]
    fn trace_line_formats_features_and_outcome_bit() {
        let line = format_trace_line(&[1, 2, 3], true);
        assert_eq!(line, "1,2,3 || 1\n");
        let line = format_trace_line(&[1, 2, 3], false);
        assert_eq!(line, "1,2,3 || 0\n");
    }
}
