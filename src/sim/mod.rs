//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Board layout is a pure function of its configuration
//! - Physics runs on a fixed tick with a seeded RNG
//! - Payouts are pure integer arithmetic
//! - The round state machine owns all mutable session state

pub mod board;
pub mod collision;
pub mod resolve;
pub mod state;
pub mod tick;
pub mod token;

pub use board::{Board, BoardBounds, BoardConfig, Peg, RiskTier, RowCount, Slot, SlotTier};
pub use collision::{CollisionResult, reflect_velocity, token_peg_collision};
pub use resolve::{Multiplier, Payout, resolve};
pub use state::{Game, Phase, PhaseKind, RenderSnapshot, RoundState};
pub use tick::{PhysicsEvent, simulate_drop, spawn_token, step};
pub use token::{Settlement, Token};
