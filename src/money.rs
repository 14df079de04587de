//! Currency amounts in integer minor units
//!
//! Balances, bets, and winnings never touch floating point, so the balance
//! invariants hold exactly across any number of rounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BetError;

/// Selectable currencies (display and minor-unit precision only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Btc,
    Eth,
    Usdt,
    Doge,
    Sol,
    Bnb,
    Xrp,
    Ltc,
    Trx,
    Ada,
}

impl Currency {
    pub const ALL: [Currency; 11] = [
        Currency::Usd,
        Currency::Btc,
        Currency::Eth,
        Currency::Usdt,
        Currency::Doge,
        Currency::Sol,
        Currency::Bnb,
        Currency::Xrp,
        Currency::Ltc,
        Currency::Trx,
        Currency::Ada,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Btc => "BTC",
            Currency::Eth => "ETH",
            Currency::Usdt => "USDT",
            Currency::Doge => "DOGE",
            Currency::Sol => "SOL",
            Currency::Bnb => "BNB",
            Currency::Xrp => "XRP",
            Currency::Ltc => "LTC",
            Currency::Trx => "TRX",
            Currency::Ada => "ADA",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd | Currency::Usdt => "$",
            Currency::Btc => "₿",
            Currency::Eth => "Ξ",
            Currency::Doge => "Ð",
            Currency::Sol => "◎",
            Currency::Bnb => "BNB ",
            Currency::Xrp => "✕",
            Currency::Ltc => "Ł",
            Currency::Trx => "T",
            Currency::Ada => "₳",
        }
    }

    /// Digits after the decimal point in one minor unit
    pub fn decimals(&self) -> u32 {
        match self {
            Currency::Usd | Currency::Usdt => 2,
            Currency::Xrp | Currency::Trx | Currency::Ada => 6,
            _ => 8,
        }
    }

    /// Minor units per major unit
    pub fn scale(&self) -> u64 {
        10u64.pow(self.decimals())
    }

    pub fn from_code(s: &str) -> Option<Self> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-negative amount in the minor units of some currency
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whole major units, or None if it overflows the minor-unit range
    pub fn from_major(major: u64, currency: Currency) -> Option<Self> {
        major.checked_mul(currency.scale()).map(Self)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Parse a user-typed decimal amount ("12", "12.5", "0.00010000")
    ///
    /// Rejects signs, exponents, and more fractional digits than the
    /// currency can represent. Zero is rejected as not positive.
    pub fn parse(input: &str, currency: Currency) -> Result<Self, BetError> {
        let text = input.trim();
        if text.starts_with('-') {
            return Err(BetError::NotPositive);
        }
        let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(BetError::NotNumeric(input.to_string()));
        }

        let decimals = currency.decimals();
        if frac.len() > decimals as usize {
            return Err(BetError::TooPrecise {
                max_decimals: decimals,
            });
        }

        let overflow = || BetError::NotNumeric(input.to_string());
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_minor: u64 = if frac.is_empty() {
            0
        } else {
            let padding = 10u64.pow(decimals - frac.len() as u32);
            frac.parse::<u64>().map_err(|_| overflow())? * padding
        };

        let minor = whole
            .checked_mul(currency.scale())
            .and_then(|m| m.checked_add(frac_minor))
            .ok_or_else(overflow)?;
        if minor == 0 {
            return Err(BetError::NotPositive);
        }
        Ok(Self(minor))
    }

    /// Formatter that renders this amount with a currency's symbol and precision
    pub fn display(self, currency: Currency) -> MoneyDisplay {
        MoneyDisplay {
            amount: self,
            currency,
        }
    }
}

/// `Display` adapter returned by [`Money::display`]
#[derive(Debug, Clone, Copy)]
pub struct MoneyDisplay {
    amount: Money,
    currency: Currency,
}

impl fmt::Display for MoneyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.currency.scale();
        let whole = self.amount.0 / scale;
        let frac = self.amount.0 % scale;
        let width = self.currency.decimals() as usize;
        write!(f, "{}{}.{:0width$}", self.currency.symbol(), whole, frac, width = width)
    }
}
