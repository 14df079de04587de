//! Round lifecycle: betting, countdown, drop, result
//!
//! `Game` owns every piece of mutable session state. Per-phase data (the
//! countdown timer, the live token, the result timer) lives inside the
//! `Phase` variant, so leaving a phase drops it and a reset cannot leave a
//! timer or token behind.

use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, BoardConfig, Peg, RiskTier, Slot};
use super::resolve::{Payout, resolve};
use super::tick::{PhysicsEvent, spawn_token, step};
use super::token::Token;
use crate::error::{BetError, ConfigError, GameError};
use crate::history::RoundHistory;
use crate::money::{Currency, Money};
use crate::settings::GameConfig;

const STATUS_WELCOME: &str = "Select your bet amount to start!";
const STATUS_NEXT_ROUND: &str = "Select your bet amount for next round!";
const STATUS_GAME_OVER: &str = "Game Over! Click Reset to play again.";
const STATUS_GET_READY: &str = "Get ready...";
const STATUS_IN_PLAY: &str = "Ball in play! Watch it fall...";

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Phase name without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    Betting,
    Countdown,
    Playing,
    Result,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhaseKind::Betting => "betting",
            PhaseKind::Countdown => "counting down",
            PhaseKind::Playing => "a ball is in play",
            PhaseKind::Result => "showing a result",
        })
    }
}

/// Current phase of a round
#[derive(Debug, Clone)]
pub enum Phase {
    /// Bet and board may change; waiting for start
    Betting,
    /// Stake escrowed, counting whole seconds down to the drop
    Countdown {
        remaining_secs: u32,
        /// Time carried toward the next whole second
        elapsed: Duration,
        stake: Money,
    },
    /// The single live token is falling
    Playing { token: Token, stake: Money },
    /// Payout credited, waiting to return to betting
    Result {
        payout: Payout,
        stake: Money,
        remaining: Duration,
    },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Betting => PhaseKind::Betting,
            Phase::Countdown { .. } => PhaseKind::Countdown,
            Phase::Playing { .. } => PhaseKind::Playing,
            Phase::Result { .. } => PhaseKind::Result,
        }
    }
}

/// Serializable view of the bookkeeping for UI panels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub balance: Money,
    pub bet: Money,
    pub total_won: Money,
    pub currency: Currency,
    pub phase: PhaseKind,
    pub status: String,
    pub countdown: Option<u32>,
    /// Payout of the round on screen, while showing a result
    pub payout: Option<Payout>,
}

/// Read-only snapshot for drawing one frame
#[derive(Debug, Clone)]
pub struct RenderSnapshot<'a> {
    pub pegs: &'a [Peg],
    pub slots: &'a [Slot],
    /// Payout each slot would return for the current bet (None on overflow)
    pub slot_payouts: Vec<Option<Money>>,
    pub token: Option<&'a Token>,
    pub currency: Currency,
}

/// The game session
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    currency: Currency,
    /// Validated starting balance in `currency`, restored by reset
    initial_balance: Money,
    board: Board,
    balance: Money,
    bet: Money,
    total_won: Money,
    phase: Phase,
    status: String,
    history: RoundHistory,
    rng: Pcg32,
}

impl Game {
    /// Create a session from config, generating the initial board
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let board = Board::generate(config.board_config()?)?;
        let balance = config.initial_balance_in(config.currency)?;
        log::info!(
            "New game: balance {}, {} rows, {} risk, seed {}",
            balance.display(config.currency),
            board.config.rows.get(),
            board.config.risk,
            config.seed
        );
        Ok(Self {
            currency: config.currency,
            initial_balance: balance,
            board,
            balance,
            bet: Money::ZERO,
            total_won: Money::ZERO,
            phase: Phase::Betting,
            status: STATUS_WELCOME.to_string(),
            history: RoundHistory::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn bet(&self) -> Money {
        self.bet
    }

    pub fn total_won(&self) -> Money {
        self.total_won
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    /// Seconds left before the drop, while counting down
    pub fn countdown(&self) -> Option<u32> {
        match self.phase {
            Phase::Countdown { remaining_secs, .. } => Some(remaining_secs),
            _ => None,
        }
    }

    /// Stake and payout of the finished round, while showing its result
    pub fn last_payout(&self) -> Option<(Money, Payout)> {
        match self.phase {
            Phase::Result { payout, stake, .. } => Some((stake, payout)),
            _ => None,
        }
    }

    /// The live token, while playing
    pub fn token(&self) -> Option<&Token> {
        match &self.phase {
            Phase::Playing { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn round_state(&self) -> RoundState {
        RoundState {
            balance: self.balance,
            bet: self.bet,
            total_won: self.total_won,
            currency: self.currency,
            phase: self.phase.kind(),
            status: self.status.clone(),
            countdown: self.countdown(),
            payout: self.last_payout().map(|(_, payout)| payout),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            pegs: &self.board.pegs,
            slots: &self.board.slots,
            slot_payouts: self
                .board
                .slots
                .iter()
                .map(|s| s.multiplier.apply(self.bet))
                .collect(),
            token: self.token(),
            currency: self.currency,
        }
    }

    /// Record a rejection in the status line and hand the error back
    fn reject<T>(&mut self, err: impl Into<GameError>) -> Result<T, GameError> {
        let err = err.into();
        log::warn!("Rejected: {}", err);
        self.status = err.to_string();
        Err(err)
    }

    fn require_betting(&mut self, action: &'static str) -> Result<(), GameError> {
        match self.phase.kind() {
            PhaseKind::Betting => Ok(()),
            phase => self.reject(GameError::WrongPhase { action, phase }),
        }
    }

    /// Select a bet from user-typed text
    pub fn select_bet(&mut self, input: &str) -> Result<Money, GameError> {
        self.require_betting("change the bet")?;
        match Money::parse(input, self.currency) {
            Ok(amount) => self.set_bet(amount),
            Err(err) => self.reject(err),
        }
    }

    /// Select a bet amount in minor units
    pub fn set_bet(&mut self, amount: Money) -> Result<Money, GameError> {
        self.require_betting("change the bet")?;
        if amount.is_zero() {
            return self.reject(BetError::NotPositive);
        }
        if amount > self.balance {
            return self.reject(BetError::ExceedsBalance);
        }
        self.bet = amount;
        self.status = format!(
            "Bet selected: {}. Ready to play!",
            amount.display(self.currency)
        );
        Ok(amount)
    }

    /// Switch rows/risk; the new board replaces the old one between rounds
    pub fn configure_board(&mut self, rows: u8, risk: RiskTier) -> Result<(), GameError> {
        self.require_betting("change the board")?;
        let board = match BoardConfig::new(rows, risk).and_then(Board::generate) {
            Ok(board) => board,
            Err(err) => return self.reject(err),
        };
        self.board = board;
        self.status = format!("Board set: {} rows, {} risk", rows, risk);
        log::info!("{}", self.status);
        Ok(())
    }

    /// Switch currency
    ///
    /// Re-selecting the current currency changes nothing. Any other currency
    /// is a reset: the session restarts with the initial balance in it.
    pub fn set_currency(&mut self, currency: Currency) -> Result<(), GameError> {
        self.require_betting("change currency")?;
        if currency == self.currency {
            return Ok(());
        }
        let balance = match self.config.initial_balance_in(currency) {
            Ok(balance) => balance,
            Err(err) => return self.reject(err),
        };
        log::info!("Currency {} -> {}; resetting session", self.currency, currency);
        self.currency = currency;
        self.initial_balance = balance;
        self.restart_session();
        self.status = format!("Playing in {}. {}", currency, STATUS_WELCOME);
        Ok(())
    }

    /// Start a round: escrow the bet, then count down or drop immediately
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require_betting("start a round")?;
        if self.bet.is_zero() {
            return self.reject(BetError::NoBet);
        }
        // Public setters keep bet <= balance; this guards direct misuse
        let Some(balance) = self.balance.checked_sub(self.bet) else {
            return self.reject(BetError::ExceedsBalance);
        };
        let stake = self.bet;
        let credit_fits = self.board.slots.iter().all(|slot| {
            slot.multiplier
                .apply(stake)
                .and_then(|winnings| balance.checked_add(winnings))
                .is_some()
        });
        if !credit_fits {
            return self.reject(BetError::PayoutOverflow);
        }
        self.balance = balance;
        log::info!(
            "Round started: stake {}, balance now {}",
            stake.display(self.currency),
            balance.display(self.currency)
        );

        if self.config.countdown_secs > 0 {
            self.phase = Phase::Countdown {
                remaining_secs: self.config.countdown_secs,
                elapsed: Duration::ZERO,
                stake,
            };
            self.status = STATUS_GET_READY.to_string();
        } else {
            self.begin_drop(stake);
        }
        Ok(())
    }

    fn begin_drop(&mut self, stake: Money) {
        self.phase = Phase::Playing {
            token: spawn_token(&self.board),
            stake,
        };
        self.status = STATUS_IN_PLAY.to_string();
    }

    /// Advance the physics clock by one tick
    ///
    /// No-op outside `Playing`. When the token settles the round is resolved
    /// and the game moves to `Result`.
    pub fn tick(&mut self) -> Vec<PhysicsEvent> {
        let Phase::Playing { token, stake } = &mut self.phase else {
            return Vec::new();
        };
        let stake = *stake;
        let events = step(token, &self.board, &mut self.rng);
        let settled = events.iter().find_map(|e| match e {
            PhysicsEvent::Settled { slot } => Some(*slot),
            _ => None,
        });
        if let Some(slot) = settled {
            self.finish_round(slot, stake);
        }
        events
    }

    fn finish_round(&mut self, slot: usize, stake: Money) {
        let payout = resolve(slot, stake, &self.board.slots);
        let winnings = payout.winnings;
        // start() rejected any stake whose best payout would not fit
        self.balance = self.balance.saturating_add(winnings);
        self.total_won = self
            .total_won
            .saturating_add(winnings.saturating_sub(stake));
        let round = self.history.record(stake, payout);

        let shown = winnings.display(self.currency);
        self.status = if winnings > stake {
            format!("You won {}! ({} multiplier)", shown, payout.multiplier)
        } else if winnings == stake {
            format!("You broke even! Got your {} back!", shown)
        } else {
            format!("You won {}. Better luck next time!", shown)
        };
        log::info!(
            "Round {} settled in slot {} ({}): {} -> {}",
            round,
            slot,
            payout.multiplier,
            stake.display(self.currency),
            shown
        );

        self.phase = Phase::Result {
            payout,
            stake,
            remaining: Duration::from_millis(self.config.result_delay_ms),
        };
    }

    /// Leave `Result` regardless of balance; a broke player can still reset
    fn return_to_betting(&mut self) {
        self.phase = Phase::Betting;
        if self.balance.is_zero() {
            self.bet = Money::ZERO;
            self.status = STATUS_GAME_OVER.to_string();
        } else if self.bet > self.balance {
            // Selected bet must stay affordable
            self.bet = Money::ZERO;
            self.status = format!("{} {}", BetError::ExceedsBalance, STATUS_NEXT_ROUND);
        } else {
            self.status = STATUS_NEXT_ROUND.to_string();
        }
    }

    /// Advance the real-time clock driving the countdown and result timers
    pub fn advance_clock(&mut self, elapsed: Duration) {
        match &mut self.phase {
            Phase::Countdown {
                remaining_secs,
                elapsed: acc,
                stake,
            } => {
                *acc = acc.saturating_add(elapsed);
                while *remaining_secs > 0 {
                    let Some(rest) = acc.checked_sub(ONE_SECOND) else {
                        break;
                    };
                    *acc = rest;
                    *remaining_secs -= 1;
                }
                if *remaining_secs == 0 {
                    let stake = *stake;
                    self.begin_drop(stake);
                }
            }
            Phase::Result { remaining, .. } => {
                *remaining = remaining.saturating_sub(elapsed);
                if remaining.is_zero() {
                    self.return_to_betting();
                }
            }
            Phase::Betting | Phase::Playing { .. } => {}
        }
    }

    /// Restore balance, bet, total won, and phase from any state
    ///
    /// Any live token and pending timer are dropped with the old phase.
    pub fn reset(&mut self) {
        if !matches!(self.phase, Phase::Betting) {
            log::info!("Reset during {}; discarding round", self.phase.kind());
        }
        self.restart_session();
        self.status = STATUS_WELCOME.to_string();
        log::info!("Game reset");
    }

    fn restart_session(&mut self) {
        self.phase = Phase::Betting;
        self.balance = self.initial_balance;
        self.bet = Money::ZERO;
        self.total_won = Money::ZERO;
        self.history.clear();
    }
}
