//! A reference rules engine for Schnapsen and its deck/scoring variants.
//!
//! The engine is organized into layers, each a small trait-based capability
//! that a [`engine::GamePlayEngine`] composes: a card model ([`deck`]), a
//! move algebra ([`moves`]), state containers ([`state`]), legal-move
//! generation ([`validate`]), a per-trick state machine ([`trick`]), scoring
//! ([`scorer`]), an imperfect-information perspective layer
//! ([`perspective`]), and the engine façade itself ([`engine`]). No concrete
//! playing strategy lives here: [`agent::Agent`] is the interface a caller's
//! own bots implement.
//!
//! [`variants`] holds the 24-card, Ace-One, and Negative-Ace rule variants,
//! each a different choice of [`engine::DeckGenerator`]/[`scorer::TrickScorer`]
//! plugged into the same engine. [`trace`] encodes one decision into the
//! fixed-width feature vector used by an external ML data recorder.

pub mod agent;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod moves;
pub mod perspective;
pub mod scorer;
pub mod state;
pub mod trace;
pub mod trick;
pub mod validate;
pub mod variants;

pub use agent::Agent;
pub use deck::{Card, CardCollection, Rank, Suit};
pub use engine::GamePlayEngine;
pub use errors::EngineError;
pub use moves::Move;
pub use perspective::PlayerPerspective;
pub use scorer::{GamePoints, TrickScorer};
pub use state::{BotState, GamePhase, GameState, Hand, Score, Side, Talon};
pub use validate::MoveValidator;
