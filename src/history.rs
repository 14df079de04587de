//! Recent rounds and session stats
//!
//! Kept in memory only; cleared on reset.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::sim::resolve::Payout;

/// Maximum number of rounds to keep
pub const MAX_HISTORY: usize = 20;

/// A single finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number within the session
    pub round: u32,
    pub stake: Money,
    pub payout: Payout,
}

impl RoundRecord {
    pub fn is_win(&self) -> bool {
        self.payout.winnings > self.stake
    }
}

/// Session history, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundHistory {
    pub entries: Vec<RoundRecord>,
    games_played: u32,
    total_staked: Money,
    total_returned: Money,
    biggest_win: Option<RoundRecord>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished round; returns its round number
    pub fn record(&mut self, stake: Money, payout: Payout) -> u32 {
        self.games_played += 1;
        let entry = RoundRecord {
            round: self.games_played,
            stake,
            payout,
        };
        self.total_staked = self.total_staked.saturating_add(stake);
        self.total_returned = self.total_returned.saturating_add(payout.winnings);

        let beats_best = self
            .biggest_win
            .map(|best| payout.winnings > best.payout.winnings)
            .unwrap_or(true);
        if entry.is_win() && beats_best {
            self.biggest_win = Some(entry);
        }

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY);
        entry.round
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.entries.first()
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn total_staked(&self) -> Money {
        self.total_staked
    }

    pub fn total_returned(&self) -> Money {
        self.total_returned
    }

    /// Largest payout among winning rounds
    pub fn biggest_win(&self) -> Option<&RoundRecord> {
        self.biggest_win.as_ref()
    }
}
