//! Game configuration
//!
//! Loaded from JSON (all fields optional) or built in code. Physics
//! tunables are compile-time constants in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::money::{Currency, Money};
use crate::sim::board::{BoardConfig, RiskTier};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting (and reset) balance, in whole currency units
    pub initial_balance: u64,
    /// Currency the session starts in
    pub currency: Currency,

    // === Board ===
    /// Peg rows (8, 10, 12, 14 or 16)
    pub rows: u8,
    pub risk: RiskTier,

    // === Timing ===
    /// "Get ready" seconds before the drop (0 = drop immediately)
    pub countdown_secs: u32,
    /// How long the result stays up before betting reopens
    pub result_delay_ms: u64,

    /// Seed for the bounce jitter RNG
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000,
            currency: Currency::Usd,

            rows: 8,
            risk: RiskTier::Low,

            countdown_secs: 3,
            result_delay_ms: 3000,

            seed: 0x5EED,
        }
    }
}

impl GameConfig {
    /// No countdown and no result delay, for headless runs and tests
    pub fn instant() -> Self {
        Self {
            countdown_secs: 0,
            result_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn board_config(&self) -> Result<BoardConfig, ConfigError> {
        BoardConfig::new(self.rows, self.risk)
    }

    /// Initial balance expressed in a currency's minor units
    pub fn initial_balance_in(&self, currency: Currency) -> Result<Money, ConfigError> {
        Money::from_major(self.initial_balance, currency)
            .ok_or(ConfigError::BalanceOverflow(self.initial_balance))
    }

    /// Check everything a session needs before any round starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board_config()?;
        // Every currency can be switched to later
        for currency in Currency::ALL {
            self.initial_balance_in(currency)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "rows": 12, "risk": "high", "currency": "BTC" }"#)
            .unwrap();
        assert_eq!(config.rows, 12);
        assert_eq!(config.risk, RiskTier::High);
        assert_eq!(config.currency, Currency::Btc);
        assert_eq!(config.initial_balance, 1000);
        assert_eq!(config.countdown_secs, 3);
    }

    #[test]
    fn test_bad_rows_rejected() {
        assert_eq!(
            GameConfig::from_json(r#"{ "rows": 9 }"#),
            Err(ConfigError::UnsupportedRows(9))
        );
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ rows: }"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "risk": "extreme" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_balance_overflow_rejected() {
        let config = GameConfig {
            initial_balance: u64::MAX / 10,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BalanceOverflow(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::instant();
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GameConfig::load(Path::new("/nonexistent/plinko.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
