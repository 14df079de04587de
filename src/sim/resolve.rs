//! Payout resolution for a settled token

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Slot;
use crate::money::Money;

/// Payout factor in fixed-point hundredths (`250` is 2.5x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ZERO: Multiplier = Multiplier(0);
    pub const ONE: Multiplier = Multiplier(100);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// `amount * self`, rounded half away from zero to whole minor units
    ///
    /// None if the result does not fit in `Money`.
    pub fn apply(self, amount: Money) -> Option<Money> {
        let scaled = amount.minor() as u128 * self.0 as u128;
        let rounded = (scaled + 50) / 100;
        u64::try_from(rounded).ok().map(Money::from_minor)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}x", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}x", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}x", whole, frac)
        }
    }
}

/// Outcome of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub slot: usize,
    pub multiplier: Multiplier,
    pub winnings: Money,
}

/// Compute the winnings for a token that settled in `slot`
///
/// Pure: the same inputs always give the same payout.
///
/// # Panics
/// If `slot` is not a valid index into `slots`, or the winnings overflow
/// `Money` (callers bound the bet first).
pub fn resolve(slot: usize, bet: Money, slots: &[Slot]) -> Payout {
    assert!(
        slot < slots.len(),
        "resolve: slot index {} out of range (board has {} slots)",
        slot,
        slots.len()
    );
    let multiplier = slots[slot].multiplier;
    let Some(winnings) = multiplier.apply(bet) else {
        panic!("resolve: {} x {} overflows", bet.minor(), multiplier);
    };
    Payout {
        slot,
        multiplier,
        winnings,
    }
}
