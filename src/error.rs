//! Error types for board configuration and player input

use thiserror::Error;

use crate::sim::board::RiskTier;
use crate::sim::state::PhaseKind;

/// Board or session configuration is unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unsupported row count: {0} (allowed: 8, 10, 12, 14, 16)")]
    UnsupportedRows(u8),

    #[error("Unknown risk tier: {0}")]
    UnknownRisk(String),

    #[error("No multiplier table for {rows} rows at {risk} risk")]
    MissingTable { rows: u8, risk: RiskTier },

    #[error("Multiplier table for {rows} rows at {risk} risk is not symmetric and edge-weighted")]
    UnfairTable { rows: u8, risk: RiskTier },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Initial balance {0} does not fit the currency's minor units")]
    BalanceOverflow(u64),

    #[error("Invalid config JSON: {0}")]
    Json(String),

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Rejected bet amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetError {
    #[error("Bet amount '{0}' is not a number")]
    NotNumeric(String),

    #[error("Bet amount must be greater than zero")]
    NotPositive,

    #[error("Bet amount has more than {max_decimals} decimal places")]
    TooPrecise { max_decimals: u32 },

    #[error("Not enough balance for this bet")]
    ExceedsBalance,

    #[error("Place a bet first")]
    NoBet,

    #[error("Bet is too large: its best payout would overflow the balance")]
    PayoutOverflow,
}

/// Any action the state machine refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Bet(#[from] BetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: PhaseKind,
    },
}
