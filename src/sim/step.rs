/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Snapshot (working = committed)
///   2. Player resolution (one direction, possibly `None`)
///   3. Physics pass over the working grid
///   4. Tick counter
///   5. Terminal check: dead or won → stop, keep working grid;
///      otherwise commit working → committed
///
/// Exactly one direction is consumed per call. Calls on a terminal
/// state are no-ops.

use log::{debug, trace};

use crate::domain::physics;
use crate::domain::rules::{self, Direction, PlayerOutcome};
use super::event::GameEvent;
use super::world::GameState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(state: &mut GameState, dir: Direction) -> Vec<GameEvent> {
    if state.is_terminal() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    state.snapshot();
    resolve_player(state, dir, &mut events);
    resolve_physics(state, &mut events);
    state.tick = state.tick.wrapping_add(1);

    if state.is_terminal() {
        debug!(
            "tick {}: game over (dead={}, won={}, gems={})",
            state.tick, state.dead, state.won, state.gems_collected,
        );
        return events;
    }

    state.commit();
    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player(state: &mut GameState, dir: Direction, events: &mut Vec<GameEvent>) {
    let outcome = rules::resolve_player(&mut state.working, &mut state.player, dir);
    trace!("tick {}: {:?} -> {:?}", state.tick, dir, outcome);

    match outcome {
        PlayerOutcome::Idle | PlayerOutcome::Moved | PlayerOutcome::Blocked => {}
        PlayerOutcome::Collected { at: (row, col) } => {
            state.gems_collected += 1;
            events.push(GameEvent::GemCollected { row, col });
        }
        PlayerOutcome::Pushed { rock_to: (row, col) } => {
            events.push(GameEvent::RockPushed { row, col });
        }
        PlayerOutcome::Won => {
            state.won = true;
            events.push(GameEvent::ExitReached);
        }
        PlayerOutcome::Killed => {
            state.dead = true;
            events.push(GameEvent::PlayerStruck);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Physics
// ══════════════════════════════════════════════════════════════

fn resolve_physics(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let report = physics::physics_pass(&mut state.working);

    if report.landed > 0 {
        events.push(GameEvent::ObjectsLanded { count: report.landed });
    }
    // A tick ends in at most one outcome: an exit reached earlier this
    // tick stands even if something lands on the player afterwards.
    if report.crushed && !state.is_terminal() {
        state.dead = true;
        events.push(GameEvent::PlayerCrushed);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
