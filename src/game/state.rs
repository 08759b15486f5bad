//! Battle State Definitions
//!
//! The two fighters, the turn flag, the battle RNG and the battle log.
//! Everything here is deterministic given the seed.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::events::BattleEvent;
use crate::game::fighter::{Fighter, FighterError};

// =============================================================================
// SIDE
// =============================================================================

/// Display slot of a fighter. Player one fights from the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Player one.
    Left = 0,
    /// Player two.
    Right = 1,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// The other side.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Battle lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Fighters built, no turn taken.
    NotStarted,
    /// Turns are being exchanged.
    InProgress,
    /// One fighter fell.
    Finished {
        /// Side still standing.
        winner: Side,
    },
    /// Stopped without a winner (failure cap or invariant violation).
    Aborted {
        /// Why the battle stopped.
        reason: String,
    },
}

impl BattlePhase {
    /// Finished or aborted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Finished { .. } | BattlePhase::Aborted { .. })
    }

    fn tag(&self) -> u8 {
        match self {
            BattlePhase::NotStarted => 0,
            BattlePhase::InProgress => 1,
            BattlePhase::Finished { .. } => 2,
            BattlePhase::Aborted { .. } => 3,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Battle-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// Fighter construction or invariant failure.
    #[error(transparent)]
    Fighter(#[from] FighterError),

    /// Same name and same type on both sides.
    #[error("Champions must have unique names if they are the same type (\"{name}\").")]
    DuplicateChampion {
        /// The shared name.
        name: String,
    },

    /// Operation needs a battle that has not started.
    #[error("Battle already started")]
    AlreadyStarted,

    /// Operation needs a battle in progress.
    #[error("Battle not in progress")]
    NotInProgress,

    /// Recoverable turn failures hit the configured cap.
    #[error("Battle aborted after {count} consecutive failed turns")]
    TooManyFailures {
        /// Consecutive failures observed.
        count: u32,
    },

    /// A turn broke a fighter invariant.
    #[error("Invariant violated during turn: {0}")]
    Invariant(FighterError),
}

// =============================================================================
// BATTLE STATE
// =============================================================================

/// Log line that opens every battle.
pub const BATTLE_BEGINS_LINE: &str = "Battle Begins!";

/// Full battle state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleState {
    /// Fighters indexed by [`Side`].
    fighters: [Fighter; 2],

    /// Current phase.
    pub phase: BattlePhase,

    /// Side that attacks next.
    attacker: Side,

    /// Side that attacked first (set on start).
    first_attacker: Option<Side>,

    /// Resolved turns so far.
    pub turn: u32,

    /// Seed the RNG was built from.
    pub rng_seed: u64,

    /// Battle RNG (first attacker + archetype rolls).
    pub rng: DeterministicRng,

    /// Human-readable battle log.
    log: Vec<String>,

    /// Events not yet taken by the session.
    #[serde(skip)]
    pending_events: Vec<BattleEvent>,
}

impl BattleState {
    /// Pair two fighters. Left is player one.
    ///
    /// Rejects a mirror matchup where both champions share name and type.
    pub fn new(left: Fighter, right: Fighter, rng_seed: u64) -> Result<Self, BattleError> {
        if left.name() == right.name() && left.character_type() == right.character_type() {
            return Err(BattleError::DuplicateChampion {
                name: left.name().to_string(),
            });
        }

        Ok(Self {
            fighters: [left, right],
            phase: BattlePhase::NotStarted,
            attacker: Side::Left,
            first_attacker: None,
            turn: 0,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            log: Vec::new(),
            pending_events: Vec::new(),
        })
    }

    /// Build both fighters from selector strings and pair them.
    pub fn from_selectors(
        left: (&str, &str),
        right: (&str, &str),
        rng_seed: u64,
    ) -> Result<Self, BattleError> {
        let (left_name, left_type) = left;
        let (right_name, right_type) = right;
        let left = Fighter::from_selector(left_type, left_name)?;
        let right = Fighter::from_selector(right_type, right_name)?;
        Self::new(left, right, rng_seed)
    }

    /// Flip for the first attacker and open the log.
    pub fn start(&mut self) -> Result<Side, BattleError> {
        if self.phase != BattlePhase::NotStarted {
            return Err(BattleError::AlreadyStarted);
        }

        let first = if self.rng.next_coin() { Side::Left } else { Side::Right };
        self.attacker = first;
        self.first_attacker = Some(first);
        self.phase = BattlePhase::InProgress;

        let first_name = self.fighter(first).name().to_string();
        self.push_log(BATTLE_BEGINS_LINE);
        self.push_log(format!("{} goes first!", first_name));
        self.push_log("");
        self.push_event(BattleEvent::battle_started(first, first_name));

        Ok(first)
    }

    /// Fighter in a slot.
    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    /// Mutable fighter in a slot.
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    /// Mutable fighter together with the battle RNG.
    pub fn fighter_and_rng(&mut self, side: Side) -> (&mut Fighter, &mut DeterministicRng) {
        (&mut self.fighters[side.index()], &mut self.rng)
    }

    /// Both fighters, left first.
    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    /// Side that attacks next.
    pub fn attacker(&self) -> Side {
        self.attacker
    }

    /// Side that took the first turn (None before start).
    pub fn first_attacker(&self) -> Option<Side> {
        self.first_attacker
    }

    /// Hand the turn to the other side.
    pub fn flip_turn(&mut self) {
        self.attacker = self.attacker.opposite();
    }

    /// True while turns may be played.
    pub fn is_in_progress(&self) -> bool {
        self.phase == BattlePhase::InProgress
    }

    /// Winning side, once finished.
    pub fn winner_side(&self) -> Option<Side> {
        match self.phase {
            BattlePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Winning fighter, once finished.
    pub fn winner(&self) -> Option<&Fighter> {
        self.winner_side().map(|side| self.fighter(side))
    }

    /// Close the battle with a winner. Only valid while in progress.
    pub fn finish(&mut self, winner: Side) -> Result<(), BattleError> {
        if !self.is_in_progress() {
            return Err(BattleError::NotInProgress);
        }
        self.phase = BattlePhase::Finished { winner };

        let winner_name = self.fighter(winner).name().to_string();
        self.push_log("");
        self.push_log(format!("{} is victorious!", winner_name));
        self.push_event(BattleEvent::battle_ended(self.turn, winner, winner_name));
        Ok(())
    }

    /// Stop the battle without a winner.
    pub fn abort(&mut self, reason: impl Into<String>) {
        if self.phase.is_terminal() {
            return;
        }
        let reason = reason.into();
        self.push_log(format!("Battle aborted: {}", reason));
        self.push_event(BattleEvent::battle_aborted(self.turn, reason.clone()));
        self.phase = BattlePhase::Aborted { reason };
    }

    /// Append a line to the battle log.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Battle log so far.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Queue an event for the session.
    pub fn push_event(&mut self, event: BattleEvent) {
        self.pending_events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute deterministic state hash.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn, self.rng.state(), |hasher| {
            hasher.update_u64(self.rng_seed);
            hasher.update_u8(self.phase.tag());
            hasher.update_u8(self.attacker as u8);
            for fighter in &self.fighters {
                fighter.hash_into(hasher);
            }
            hasher.update_u32(self.log.len() as u32);
        })
    }
}
