//! Turn Resolution
//!
//! One exchange: the current attacker rolls, the defender takes the hit,
//! the log and event queue record it, and the turn passes. This is the
//! only place a battle's fighters are mutated after start.

use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::archetype::Strike;
use crate::game::events::BattleEvent;
use crate::game::fighter::{Fighter, FighterError};
use crate::game::state::{BattleError, BattlePhase, BattleState, Side};
use crate::render::stage::{Stage, StageError};

/// Upper bound on turns a headless replay will play.
pub const MAX_REPLAY_TURNS: u32 = 1_000;

/// Everything a renderer needs about a resolved turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnReport {
    /// Who struck.
    pub attacker: Side,
    /// Who was hit.
    pub defender: Side,
    /// The roll that was applied.
    pub strike: Strike,
    /// Where the hit effects belong.
    pub anchor: Vec2,
    /// Defender health after the hit.
    pub defender_health: i32,
    /// The hit ended the battle.
    pub battle_over: bool,
}

/// Why a turn did not resolve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurnError {
    /// No battle in progress.
    #[error("Battle not in progress")]
    NotInProgress,

    /// Effects could not be anchored. Nothing was applied.
    #[error("{0}")]
    Stage(#[from] StageError),

    /// Applying the strike broke a fighter invariant. The roll has
    /// already been drawn.
    #[error("{0}")]
    Invariant(FighterError),
}

impl TurnError {
    /// The turn can be retried on the next cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TurnError::Stage(_))
    }
}

/// Result of [`resolve_turn`].
#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    /// The strike landed.
    Resolved(TurnReport),
    /// The turn was skipped.
    Failed(TurnError),
}

impl TurnOutcome {
    /// The report, if the turn resolved.
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            TurnOutcome::Resolved(report) => Some(report),
            TurnOutcome::Failed(_) => None,
        }
    }
}

/// Play the current attacker's turn.
///
/// The effect anchor is looked up before anything changes, so a stage
/// failure leaves the state (RNG included) exactly as it was. An invariant
/// failure is only detected after the roll, so the attacker's RNG draws
/// and archetype state have already advanced. It is not recoverable and
/// the session aborts the battle on it.
pub fn resolve_turn(state: &mut BattleState, stage: &dyn Stage) -> TurnOutcome {
    if state.phase != BattlePhase::InProgress {
        return TurnOutcome::Failed(TurnError::NotInProgress);
    }

    let attacker = state.attacker();
    let defender = attacker.opposite();

    let anchor = match stage.anchor(defender) {
        Ok(anchor) => anchor,
        Err(e) => return TurnOutcome::Failed(e.into()),
    };

    let strike = {
        let (fighter, rng) = state.fighter_and_rng(attacker);
        fighter.attack(rng)
    };

    if let Err(e) = state.fighter_mut(defender).take_damage(strike.damage) {
        return TurnOutcome::Failed(TurnError::Invariant(e));
    }

    state.turn += 1;

    let attacker_name = state.fighter(attacker).name().to_string();
    let defender_fighter: &Fighter = state.fighter(defender);
    let defender_name = defender_fighter.name().to_string();
    let defender_health = defender_fighter.health();
    let defender_alive = defender_fighter.is_alive();

    debug!(
        turn = state.turn,
        attacker = %attacker_name,
        damage = strike.damage,
        kind = ?strike.kind,
        defender_health,
        "Turn resolved"
    );

    state.push_log(format!(
        "{} strikes {} for {} damage!",
        attacker_name, defender_name, strike.damage
    ));
    state.push_event(BattleEvent::turn_resolved(
        state.turn,
        attacker,
        attacker_name,
        defender_name,
        strike,
        defender_health,
    ));
    state.flip_turn();

    let battle_over = !defender_alive;
    if battle_over {
        // Phase was checked above; finishing cannot fail here.
        let _ = state.finish(attacker);
    }

    TurnOutcome::Resolved(TurnReport {
        attacker,
        defender,
        strike,
        anchor,
        defender_health,
        battle_over,
    })
}

/// Play a battle headlessly from seed to finish.
///
/// Returns the final state and every event in order. Two calls with the
/// same inputs produce identical states and hashes.
pub fn replay_battle(
    mut state: BattleState,
    stage: &dyn Stage,
) -> Result<(BattleState, Vec<BattleEvent>), BattleError> {
    let mut all_events = Vec::new();

    state.start()?;
    all_events.extend(state.take_events());

    for _ in 0..MAX_REPLAY_TURNS {
        let outcome = resolve_turn(&mut state, stage);
        all_events.extend(state.take_events());

        match outcome {
            TurnOutcome::Resolved(report) if report.battle_over => break,
            TurnOutcome::Resolved(_) => {}
            TurnOutcome::Failed(TurnError::Invariant(e)) => return Err(BattleError::Invariant(e)),
            TurnOutcome::Failed(TurnError::NotInProgress) => return Err(BattleError::NotInProgress),
            TurnOutcome::Failed(TurnError::Stage(e)) => {
                state.abort(e.to_string());
                all_events.extend(state.take_events());
                break;
            }
        }
    }

    Ok((state, all_events))
}
