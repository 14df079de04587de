//! The falling token

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Where the token is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Bouncing through the pegs
    Falling,
    /// Landed in a slot, easing toward its center
    Settling { slot: usize, countdown: u32 },
    /// Result reported; the token takes no further steps
    Settled { slot: usize },
}

/// Default token color before it lands (RGBA)
pub const TOKEN_COLOR: u32 = 0xFFFF_FFFF;

/// A token dropped through the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub settlement: Settlement,
    /// Color shown by the renderer (slot color once collected)
    pub color: u32,
    /// Recent positions, oldest first
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Token {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: TOKEN_RADIUS,
            settlement: Settlement::Falling,
            color: TOKEN_COLOR,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Record current position to trail, dropping the oldest point
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn is_collected(&self) -> bool {
        !matches!(self.settlement, Settlement::Falling)
    }

    pub fn collected_slot(&self) -> Option<usize> {
        match self.settlement {
            Settlement::Falling => None,
            Settlement::Settling { slot, .. } | Settlement::Settled { slot } => Some(slot),
        }
    }

    pub fn settle_countdown(&self) -> u32 {
        match self.settlement {
            Settlement::Settling { countdown, .. } => countdown,
            _ => 0,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.settlement, Settlement::Settled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_drops_oldest() {
        let mut token = Token::new(Vec2::ZERO);
        for i in 0..(TRAIL_LENGTH + 3) {
            token.pos = Vec2::new(i as f32, 0.0);
            token.record_trail();
        }
        assert_eq!(token.trail.len(), TRAIL_LENGTH);
        assert_eq!(token.trail.front().unwrap().x, 3.0);
        assert_eq!(token.trail.back().unwrap().x, (TRAIL_LENGTH + 2) as f32);
    }

    #[test]
    fn test_settlement_accessors() {
        let mut token = Token::new(Vec2::ZERO);
        assert!(!token.is_collected());
        assert_eq!(token.collected_slot(), None);

        token.settlement = Settlement::Settling { slot: 2, countdown: 5 };
        assert!(token.is_collected());
        assert_eq!(token.collected_slot(), Some(2));
        assert_eq!(token.settle_countdown(), 5);
        assert!(!token.is_settled());

        token.settlement = Settlement::Settled { slot: 2 };
        assert_eq!(token.settle_countdown(), 0);
        assert!(token.is_settled());
    }
}
