//! Plinko Drop - a single-player peg-board chance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board layout, drop physics, payouts, round state)
//! - `money`: Fixed-point currency amounts in minor units
//! - `settings`: Data-driven game configuration
//! - `history`: Recent rounds and session stats

pub mod error;
pub mod history;
pub mod money;
pub mod settings;
pub mod sim;

pub use error::{BetError, ConfigError, GameError};
pub use history::{RoundHistory, RoundRecord};
pub use money::{Currency, Money};
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Physics tick rate (60 Hz, one step per animation frame)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 500.0;
    /// Height of the payout slot band at the bottom of the playfield
    pub const SLOT_BAND_HEIGHT: f32 = 60.0;
    /// Y of the first peg row (the wedge apex)
    pub const TOP_MARGIN: f32 = 60.0;
    /// Gap between the last peg row and the slot band
    pub const BOTTOM_GAP: f32 = 30.0;
    /// Y at which a new token is spawned
    pub const DROP_Y: f32 = 20.0;

    pub const PEG_RADIUS: f32 = 8.0;
    pub const TOKEN_RADIUS: f32 = 6.0;

    /// Downward acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.2;
    /// Per-tick velocity damping, applied to both axes
    pub const AIR_RESISTANCE: f32 = 0.99;
    /// Speed retained after a peg or wall bounce
    pub const BOUNCE_DAMPING: f32 = 0.7;
    /// Max random velocity nudge per axis on a peg bounce
    pub const BOUNCE_JITTER: f32 = 0.4;

    /// Number of trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 8;

    /// Ticks the token eases into its slot before the payout fires
    pub const SETTLE_TICKS: u32 = 45;
    /// Fraction of the remaining distance covered per settle tick
    pub const SETTLE_EASING: f32 = 0.2;
    /// Velocity damping while settling
    pub const SETTLE_DAMPING: f32 = 0.8;
}
