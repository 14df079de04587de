//! Board generation: peg triangle, payout slots, multiplier tables
//!
//! A board is a pure function of (row count, risk tier, playfield size).
//! Row `r` holds `r + 3` pegs; the last row spans the full playfield width,
//! and the `rows + 1` slots sit in the gaps under it.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::resolve::Multiplier;
use crate::consts::*;
use crate::error::ConfigError;

/// Payout volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" | "med" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            _ => Err(ConfigError::UnknownRisk(s.to_string())),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated peg row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RowCount(u8);

impl RowCount {
    pub const ALLOWED: [u8; 5] = [8, 10, 12, 14, 16];

    pub fn new(rows: u8) -> Result<Self, ConfigError> {
        if Self::ALLOWED.contains(&rows) {
            Ok(Self(rows))
        } else {
            Err(ConfigError::UnsupportedRows(rows))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn slot_count(self) -> usize {
        self.0 as usize + 1
    }
}

impl Default for RowCount {
    fn default() -> Self {
        Self(8)
    }
}

impl TryFrom<u8> for RowCount {
    type Error = ConfigError;

    fn try_from(rows: u8) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<RowCount> for u8 {
    fn from(rows: RowCount) -> u8 {
        rows.0
    }
}

/// Board configuration selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: RowCount,
    pub risk: RiskTier,
}

impl BoardConfig {
    pub fn new(rows: u8, risk: RiskTier) -> Result<Self, ConfigError> {
        Ok(Self {
            rows: RowCount::new(rows)?,
            risk,
        })
    }
}

/// Half multiplier tables in hundredths, edge slot first, center slot last.
/// Mirrored at generation time, so every board is symmetric by construction.
fn half_table(rows: u8, risk: RiskTier) -> Option<&'static [u32]> {
    use RiskTier::*;
    let table: &'static [u32] = match (rows, risk) {
        (8, Low) => &[560, 210, 110, 100, 50],
        (8, Medium) => &[1300, 300, 130, 70, 40],
        (8, High) => &[2900, 400, 150, 30, 20],
        (10, Low) => &[890, 300, 140, 110, 100, 50],
        (10, Medium) => &[2200, 500, 200, 140, 60, 40],
        (10, High) => &[7600, 1000, 300, 90, 30, 20],
        (12, Low) => &[1000, 300, 160, 140, 110, 100, 50],
        (12, Medium) => &[3300, 1100, 400, 200, 110, 60, 30],
        (12, High) => &[17000, 2400, 810, 200, 70, 20, 20],
        (14, Low) => &[710, 400, 190, 140, 130, 110, 100, 50],
        (14, Medium) => &[5800, 1500, 700, 400, 190, 100, 50, 20],
        (14, High) => &[42000, 5600, 1800, 500, 190, 30, 20, 20],
        (16, Low) => &[1600, 900, 200, 140, 140, 120, 110, 100, 50],
        (16, Medium) => &[11000, 4100, 1000, 500, 300, 150, 100, 50, 30],
        (16, High) => &[100000, 13000, 2600, 900, 400, 200, 20, 20, 20],
        _ => return None,
    };
    Some(table)
}

/// Full left-to-right multiplier sequence for a board
pub fn multiplier_table(config: BoardConfig) -> Result<Vec<Multiplier>, ConfigError> {
    let rows = config.rows.get();
    let half = half_table(rows, config.risk).ok_or(ConfigError::MissingTable {
        rows,
        risk: config.risk,
    })?;

    let slot_count = config.rows.slot_count();
    let edge_weighted = half.windows(2).all(|w| w[0] >= w[1]);
    if half.len() != slot_count / 2 + 1 || !edge_weighted {
        return Err(ConfigError::UnfairTable {
            rows,
            risk: config.risk,
        });
    }

    let mut table: Vec<Multiplier> = half.iter().copied().map(Multiplier::from_hundredths).collect();
    // Odd slot count: the center entry is not repeated
    table.extend(half.iter().rev().skip(1).copied().map(Multiplier::from_hundredths));
    Ok(table)
}

/// A static obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// Display tier of a slot, derived from its multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotTier {
    /// Below 1x
    Low,
    /// 1x up to 2x
    Even,
    /// 2x up to 5x
    High,
    /// 5x and above
    Jackpot,
}

impl SlotTier {
    pub fn from_multiplier(m: Multiplier) -> Self {
        match m.hundredths() {
            500.. => SlotTier::Jackpot,
            200.. => SlotTier::High,
            100.. => SlotTier::Even,
            _ => SlotTier::Low,
        }
    }

    /// RGBA color for the renderer
    pub fn color(&self) -> u32 {
        match self {
            SlotTier::Jackpot => 0xFF47_57FF,
            SlotTier::High => 0xFF63_48FF,
            SlotTier::Even => 0xFFA5_02FF,
            SlotTier::Low => 0x2ED5_73FF,
        }
    }
}

/// A payout bucket covering the half-open x-range `[x, x + width)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub multiplier: Multiplier,
    pub tier: SlotTier,
}

impl Slot {
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x < self.x + self.width
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Playfield extents and the wedge the pegs form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardBounds {
    pub width: f32,
    pub height: f32,
    /// Y of the first peg row
    pub apex_y: f32,
    /// Y of the last peg row
    pub base_y: f32,
    /// Half-width of the wedge at `apex_y`
    pub apex_half_width: f32,
    /// Half-width of the wedge at `base_y`
    pub base_half_width: f32,
    /// Top edge of the slot band
    pub slot_top: f32,
}

impl BoardBounds {
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Left/right x limits at height `y`
    ///
    /// Inside the peg rows the limits follow the wedge through the outer pegs;
    /// above and below it they fall back to the playfield walls.
    pub fn at(&self, y: f32) -> (f32, f32) {
        if y < self.apex_y || y > self.base_y {
            return (0.0, self.width);
        }
        let span = self.base_y - self.apex_y;
        let t = if span > 0.0 { (y - self.apex_y) / span } else { 1.0 };
        let half = self.apex_half_width + (self.base_half_width - self.apex_half_width) * t;
        let cx = self.center_x();
        ((cx - half).max(0.0), (cx + half).min(self.width))
    }
}

/// Pegs, slots, and bounds for one configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub config: BoardConfig,
    pub pegs: Vec<Peg>,
    pub slots: Vec<Slot>,
    pub bounds: BoardBounds,
}

impl Board {
    /// Generate a board on the default playfield
    pub fn generate(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::generate_in(config, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }

    /// Generate a board on a playfield of the given size
    pub fn generate_in(config: BoardConfig, width: f32, height: f32) -> Result<Self, ConfigError> {
        let multipliers = multiplier_table(config)?;
        let rows = config.rows.get() as usize;
        let slot_count = config.rows.slot_count();

        let slot_top = height - SLOT_BAND_HEIGHT;
        let apex_y = TOP_MARGIN;
        let base_y = slot_top - BOTTOM_GAP;
        let row_spacing = (base_y - apex_y) / (rows - 1) as f32;
        // Last row has rows + 2 pegs spanning the full width
        let peg_spacing = width / slot_count as f32;
        let cx = width / 2.0;

        let mut pegs = Vec::with_capacity((rows * (rows + 5)) / 2);
        for row in 0..rows {
            let count = row + 3;
            let y = apex_y + row as f32 * row_spacing;
            let start_x = cx - (count - 1) as f32 * peg_spacing / 2.0;
            for col in 0..count {
                pegs.push(Peg {
                    pos: Vec2::new(start_x + col as f32 * peg_spacing, y),
                    radius: PEG_RADIUS,
                });
            }
        }

        // Edges are computed independently so adjacent slots share them exactly
        let edge = |i: usize| {
            if i == slot_count {
                width
            } else {
                i as f32 * width / slot_count as f32
            }
        };
        let slots = multipliers
            .into_iter()
            .enumerate()
            .map(|(i, multiplier)| {
                let x = edge(i);
                Slot {
                    x,
                    y: slot_top,
                    width: edge(i + 1) - x,
                    height: SLOT_BAND_HEIGHT,
                    multiplier,
                    tier: SlotTier::from_multiplier(multiplier),
                }
            })
            .collect();

        let bounds = BoardBounds {
            width,
            height,
            apex_y,
            base_y,
            apex_half_width: peg_spacing,
            base_half_width: width / 2.0,
            slot_top,
        };

        log::debug!(
            "Generated board: {} rows, {} risk, {} pegs, {} slots",
            rows,
            config.risk,
            pegs.len(),
            slot_count
        );

        Ok(Self {
            config,
            pegs,
            slots,
            bounds,
        })
    }

    /// Index of the slot under `x`, clamped to the nearest slot on overshoot
    pub fn slot_at(&self, x: f32) -> usize {
        if let Some(i) = self.slots.iter().position(|s| s.contains_x(x)) {
            return i;
        }
        let avg_width = self.bounds.width / self.slots.len() as f32;
        let i = (x / avg_width).floor().max(0.0) as usize;
        i.min(self.slots.len() - 1)
    }

    /// Pegs in each row, top to bottom
    pub fn row_sizes(&self) -> Vec<usize> {
        (0..self.config.rows.get() as usize).map(|r| r + 3).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_rows_low() {
        let board = Board::generate(BoardConfig::new(8, RiskTier::Low).unwrap()).unwrap();
        assert_eq!(board.slots.len(), 9);
        assert_eq!(board.pegs.len(), (3..=10).sum::<usize>());

        // Peg rows 0..7 contain 3..10 pegs, grouped by y
        let mut rows: Vec<(f32, usize)> = Vec::new();
        for peg in &board.pegs {
            match rows.last_mut() {
                Some((y, n)) if (*y - peg.pos.y).abs() < 1e-3 => *n += 1,
                _ => rows.push((peg.pos.y, 1)),
            }
        }
        let sizes: Vec<usize> = rows.iter().map(|(_, n)| *n).collect();
        assert_eq!(sizes, (3..=10).collect::<Vec<_>>());
        assert_eq!(board.row_sizes(), sizes);
    }

    #[test]
    fn test_unsupported_rows_rejected() {
        assert_eq!(
            BoardConfig::new(9, RiskTier::Low),
            Err(ConfigError::UnsupportedRows(9))
        );
        assert_eq!(
            BoardConfig::new(0, RiskTier::High),
            Err(ConfigError::UnsupportedRows(0))
        );
    }

    #[test]
    fn test_risk_parse() {
        assert_eq!(RiskTier::parse("High"), Ok(RiskTier::High));
        assert_eq!(RiskTier::parse("med"), Ok(RiskTier::Medium));
        assert!(matches!(RiskTier::parse("extreme"), Err(ConfigError::UnknownRisk(_))));
    }

    #[test]
    fn test_slots_are_contiguous() {
        for rows in RowCount::ALLOWED {
            for risk in RiskTier::ALL {
                let board = Board::generate(BoardConfig::new(rows, risk).unwrap()).unwrap();
                assert_eq!(board.slots[0].x, 0.0);
                for pair in board.slots.windows(2) {
                    assert_eq!(pair[0].x + pair[0].width, pair[1].x);
                }
                let last = board.slots.last().unwrap();
                assert!((last.x + last.width - PLAYFIELD_WIDTH).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_wedge_passes_through_outer_pegs() {
        let board = Board::generate(BoardConfig::new(12, RiskTier::Medium).unwrap()).unwrap();
        let first = board.pegs.first().unwrap().pos;
        let last = board.pegs.last().unwrap().pos;
        let (left, _) = board.bounds.at(first.y);
        let (_, right) = board.bounds.at(last.y);
        assert!((left - first.x).abs() < 1e-3);
        assert!((right - last.x).abs() < 1e-3);
        // Walls above the pegs
        assert_eq!(board.bounds.at(0.0), (0.0, PLAYFIELD_WIDTH));
    }

    #[test]
    fn test_slot_at_clamps_overshoot() {
        let board = Board::generate(BoardConfig::default()).unwrap();
        assert_eq!(board.slot_at(-5.0), 0);
        assert_eq!(board.slot_at(PLAYFIELD_WIDTH), board.slots.len() - 1);
        assert_eq!(board.slot_at(PLAYFIELD_WIDTH / 2.0), 4);
    }

    #[test]
    fn test_slot_tier() {
        assert_eq!(SlotTier::from_multiplier(Multiplier::from_hundredths(50)), SlotTier::Low);
        assert_eq!(SlotTier::from_multiplier(Multiplier::from_hundredths(100)), SlotTier::Even);
        assert_eq!(SlotTier::from_multiplier(Multiplier::from_hundredths(210)), SlotTier::High);
        assert_eq!(SlotTier::from_multiplier(Multiplier::from_hundredths(560)), SlotTier::Jackpot);
    }
}
