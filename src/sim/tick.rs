//! Fixed timestep physics step
//!
//! Advances one token by one tick. The only randomness is the jitter added
//! on peg bounces, drawn from the caller's RNG.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::collision::{clamp_to_bounds, first_peg_hit, reflect_velocity};
use super::token::{Settlement, Token};
use crate::consts::*;

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    /// Bounced off the peg at this index
    PegHit { peg: usize },
    /// Pushed back inside the wedge or walls
    WallHit,
    /// Reached the slot band; settling begins
    SlotEntered { slot: usize },
    /// Settle animation done; emitted once per token
    Settled { slot: usize },
}

/// A fresh token at the drop point above the apex
pub fn spawn_token(board: &Board) -> Token {
    Token::new(Vec2::new(board.bounds.center_x(), DROP_Y))
}

/// Advance `token` by one tick
///
/// # Panics
/// If the board has no pegs or slots, or the token already reported `Settled`.
pub fn step<R: Rng + ?Sized>(token: &mut Token, board: &Board, rng: &mut R) -> Vec<PhysicsEvent> {
    assert!(!board.pegs.is_empty(), "step: board has no pegs");
    assert!(!board.slots.is_empty(), "step: board has no slots");

    match token.settlement {
        Settlement::Falling => fall(token, board, rng),
        Settlement::Settling { slot, countdown } => settle(token, board, slot, countdown),
        Settlement::Settled { slot } => {
            panic!("step: token already settled in slot {}", slot)
        }
    }
}

fn fall<R: Rng + ?Sized>(token: &mut Token, board: &Board, rng: &mut R) -> Vec<PhysicsEvent> {
    let mut events = Vec::new();

    token.vel.y += GRAVITY;
    token.vel *= AIR_RESISTANCE;
    token.pos += token.vel;
    token.record_trail();

    // One peg per tick; simultaneous contacts resolve on later ticks
    if let Some((peg, hit)) = first_peg_hit(token.pos, token.radius, &board.pegs) {
        if token.vel.dot(hit.normal) < 0.0 {
            token.vel = reflect_velocity(token.vel, hit.normal);
        }
        token.vel *= BOUNCE_DAMPING;
        token.vel += Vec2::new(
            rng.random_range(-BOUNCE_JITTER..=BOUNCE_JITTER),
            rng.random_range(-BOUNCE_JITTER..=BOUNCE_JITTER),
        );
        token.pos += hit.normal * hit.penetration;
        events.push(PhysicsEvent::PegHit { peg });
    }

    if clamp_to_bounds(
        &mut token.pos,
        &mut token.vel,
        token.radius,
        &board.bounds,
        BOUNCE_DAMPING,
    )
    .is_some()
    {
        events.push(PhysicsEvent::WallHit);
    }

    if token.pos.y + token.radius >= board.bounds.slot_top {
        let slot = board.slot_at(token.pos.x);
        token.settlement = Settlement::Settling {
            slot,
            countdown: SETTLE_TICKS,
        };
        token.color = board.slots[slot].tier.color();
        log::debug!(
            "Token entered slot {} ({}) at x={:.1}",
            slot,
            board.slots[slot].multiplier,
            token.pos.x
        );
        events.push(PhysicsEvent::SlotEntered { slot });
    }

    events
}

fn settle(token: &mut Token, board: &Board, slot: usize, countdown: u32) -> Vec<PhysicsEvent> {
    let target = board.slots[slot].center();
    token.pos += (target - token.pos) * SETTLE_EASING;
    token.vel *= SETTLE_DAMPING;
    token.record_trail();

    let remaining = countdown.saturating_sub(1);
    if remaining == 0 {
        token.settlement = Settlement::Settled { slot };
        vec![PhysicsEvent::Settled { slot }]
    } else {
        token.settlement = Settlement::Settling {
            slot,
            countdown: remaining,
        };
        Vec::new()
    }
}

/// Drop a token and run it to completion, headless
///
/// Returns the slot index, or None if it has not settled after `max_ticks`.
pub fn simulate_drop<R: Rng + ?Sized>(board: &Board, rng: &mut R, max_ticks: u32) -> Option<usize> {
    let mut token = spawn_token(board);
    for _ in 0..max_ticks {
        for event in step(&mut token, board, rng) {
            if let PhysicsEvent::Settled { slot } = event {
                return Some(slot);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::{BoardConfig, RiskTier};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn board(rows: u8) -> Board {
        Board::generate(BoardConfig::new(rows, RiskTier::Low).unwrap()).unwrap()
    }

    #[test]
    fn test_first_step_integrates_gravity() {
        let board = board(8);
        let mut token = spawn_token(&board);
        let mut rng = Pcg32::seed_from_u64(1);
        let events = step(&mut token, &board, &mut rng);
        assert!(events.is_empty());
        assert!((token.vel.y - GRAVITY * AIR_RESISTANCE).abs() < 1e-6);
        assert!((token.pos.y - (DROP_Y + GRAVITY * AIR_RESISTANCE)).abs() < 1e-5);
        assert_eq!(token.trail.len(), 1);
    }

    #[test]
    fn test_drop_settles_once() {
        let board = board(8);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut token = spawn_token(&board);
        let mut settled = Vec::new();
        let mut entered = 0;
        for _ in 0..10_000 {
            if token.is_settled() {
                break;
            }
            for event in step(&mut token, &board, &mut rng) {
                match event {
                    PhysicsEvent::SlotEntered { .. } => entered += 1,
                    PhysicsEvent::Settled { slot } => settled.push(slot),
                    _ => {}
                }
            }
        }
        assert_eq!(entered, 1);
        assert_eq!(settled.len(), 1);
        assert_eq!(token.collected_slot(), Some(settled[0]));
        assert_eq!(token.color, board.slots[settled[0]].tier.color());
    }

    #[test]
    fn test_settle_takes_fixed_ticks() {
        let board = board(8);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut token = spawn_token(&board);
        while !token.is_collected() {
            step(&mut token, &board, &mut rng);
        }
        let slot = token.collected_slot().unwrap();
        for _ in 1..SETTLE_TICKS {
            assert!(step(&mut token, &board, &mut rng).is_empty());
        }
        assert_eq!(
            step(&mut token, &board, &mut rng),
            vec![PhysicsEvent::Settled { slot }]
        );
        let center = board.slots[slot].center();
        assert!((token.pos.x - center.x).abs() < board.slots[slot].width / 2.0);
    }

    #[test]
    #[should_panic(expected = "already settled")]
    fn test_step_after_settled_panics() {
        let board = board(8);
        let mut token = spawn_token(&board);
        token.settlement = Settlement::Settled { slot: 0 };
        let mut rng = Pcg32::seed_from_u64(0);
        step(&mut token, &board, &mut rng);
    }

    #[test]
    #[should_panic(expected = "no pegs")]
    fn test_step_without_pegs_panics() {
        let mut board = board(8);
        board.pegs.clear();
        let mut token = spawn_token(&board);
        let mut rng = Pcg32::seed_from_u64(0);
        step(&mut token, &board, &mut rng);
    }

    #[test]
    fn test_determinism() {
        // Same seed, same path
        let board = board(12);
        let a = simulate_drop(&board, &mut Pcg32::seed_from_u64(99_999), 10_000);
        let b = simulate_drop(&board, &mut Pcg32::seed_from_u64(99_999), 10_000);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_board_resolves() {
        for rows in crate::sim::board::RowCount::ALLOWED {
            let board = board(rows);
            let mut rng = Pcg32::seed_from_u64(rows as u64);
            for _ in 0..5 {
                let slot = simulate_drop(&board, &mut rng, 10_000);
                assert!(matches!(slot, Some(s) if s < board.slots.len()));
            }
        }
    }
}
