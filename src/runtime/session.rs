//! Battle Session Management
//!
//! Owns one battle: the deterministic state, the animation clock, the
//! stage that anchors effects, and the event fan-out to renderers.
//! The runner drives a session; hosts that pace turns themselves can
//! call it directly.

use std::time::Duration;
use serde::{Serialize, Deserialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, debug, warn, error};
use uuid::Uuid;

use crate::game::events::BattleEvent;
use crate::game::state::{BattleError, BattleState, Side};
use crate::game::turn::{resolve_turn, TurnError, TurnOutcome};
use crate::effects::clock::AnimationClock;
use crate::render::stage::{Stage, StageLayout};
use crate::render::surface::Surface;
use crate::ANIMATION_TICK_MS;

/// Unique battle identifier (UUID bytes).
pub type BattleId = [u8; 16];

/// Pacing and limits for a battle.
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Delay before the first turn (ms).
    pub start_delay_ms: u64,
    /// Attack pose duration after each hit (ms).
    pub attack_duration_ms: u64,
    /// Pause between turns (ms).
    pub turn_pause_ms: u64,
    /// Wait after a failed turn (ms).
    pub failure_delay_ms: u64,
    /// Animation clock period (ms).
    pub tick_interval_ms: u64,
    /// Abort after more than this many failed turns in a row (None = never).
    pub max_consecutive_failures: Option<u32>,
    /// Broadcast channel capacity for battle events.
    pub event_capacity: usize,
    /// Viewport width used for the default stage layout.
    pub viewport_width: f32,
    /// Viewport height used for the default stage layout.
    pub viewport_height: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 500,
            attack_duration_ms: 800,
            turn_pause_ms: 400,
            failure_delay_ms: 1000,
            tick_interval_ms: ANIMATION_TICK_MS,
            max_consecutive_failures: Some(5),
            event_capacity: 256,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

impl BattleConfig {
    /// Delay before the first turn.
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Attack pose duration.
    pub fn attack_duration(&self) -> Duration {
        Duration::from_millis(self.attack_duration_ms)
    }

    /// Pause between turns.
    pub fn turn_pause(&self) -> Duration {
        Duration::from_millis(self.turn_pause_ms)
    }

    /// Wait after a failed turn.
    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_delay_ms)
    }

    /// Animation clock period (at least 1 ms).
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Stage layout for the configured viewport.
    pub fn stage_layout(&self) -> StageLayout {
        StageLayout::for_viewport(self.viewport_width, self.viewport_height)
    }
}

/// A battle session.
pub struct BattleSession {
    /// Unique battle identifier.
    pub id: BattleId,
    /// Session configuration.
    pub config: BattleConfig,
    /// Deterministic battle state.
    state: BattleState,
    /// Effects and attack pose.
    clock: AnimationClock,
    /// Anchor provider for hit effects.
    stage: Box<dyn Stage>,
    /// Recoverable failures since the last resolved turn.
    consecutive_failures: u32,
    /// Recoverable failures over the whole battle.
    failed_turns: u32,
    /// Event broadcast channel.
    event_tx: broadcast::Sender<BattleEvent>,
}

impl BattleSession {
    /// New session with a fresh random id.
    pub fn new(state: BattleState, stage: Box<dyn Stage>, config: BattleConfig) -> Self {
        Self::with_id(Uuid::new_v4().into_bytes(), state, stage, config)
    }

    /// New session with a caller-chosen id.
    pub fn with_id(
        id: BattleId,
        state: BattleState,
        stage: Box<dyn Stage>,
        config: BattleConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            id,
            config,
            state,
            clock: AnimationClock::new(),
            stage,
            consecutive_failures: 0,
            failed_turns: 0,
            event_tx,
        }
    }

    /// Session laid out on the configured viewport.
    pub fn with_viewport(state: BattleState, config: BattleConfig) -> Self {
        let stage = Box::new(config.stage_layout());
        Self::new(state, stage, config)
    }

    /// Id formatted as a UUID string.
    pub fn id_string(&self) -> String {
        Uuid::from_bytes(self.id).to_string()
    }

    /// Subscribe to battle events.
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.event_tx.subscribe()
    }

    /// Battle state.
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Animation clock.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Swap the stage (e.g. after the host window is rebuilt).
    pub fn replace_stage(&mut self, stage: Box<dyn Stage>) {
        self.stage = stage;
    }

    /// Recoverable failures over the whole battle.
    pub fn failed_turns(&self) -> u32 {
        self.failed_turns
    }

    /// Recoverable failures since the last resolved turn.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Finished or aborted.
    pub fn is_over(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// Flip for the first attacker and announce the battle.
    pub fn start(&mut self) -> Result<Side, BattleError> {
        let first = self.state.start()?;
        info!(
            "Battle {} started: {} vs {}, {} goes first",
            &self.id_string()[..8],
            self.state.fighter(Side::Left).name(),
            self.state.fighter(Side::Right).name(),
            self.state.fighter(first).name()
        );
        self.flush_events();
        Ok(first)
    }

    /// Play one turn.
    ///
    /// A resolved turn puts the attacker in its pose and spawns the hit
    /// effects. A recoverable failure is logged and counted; once the
    /// count passes the configured cap the battle is aborted. Invariant
    /// violations abort immediately.
    pub fn play_turn(&mut self) -> Result<TurnOutcome, BattleError> {
        let outcome = resolve_turn(&mut self.state, self.stage.as_ref());

        match &outcome {
            TurnOutcome::Resolved(report) => {
                self.consecutive_failures = 0;
                self.clock.begin_attack(report.attacker);
                self.clock.spawn_hit(report.anchor, &report.strike);

                if report.battle_over {
                    if let Some(winner) = self.state.winner() {
                        info!(
                            "Battle {} ended after {} turns, winner: {}",
                            &self.id_string()[..8],
                            self.state.turn,
                            winner.name()
                        );
                    }
                }
            }
            TurnOutcome::Failed(TurnError::NotInProgress) => {
                return Err(BattleError::NotInProgress);
            }
            TurnOutcome::Failed(TurnError::Invariant(e)) => {
                error!("Battle {} aborted: {}", &self.id_string()[..8], e);
                self.state.abort(e.to_string());
                self.flush_events();
                return Err(BattleError::Invariant(e.clone()));
            }
            TurnOutcome::Failed(e) => {
                self.consecutive_failures += 1;
                self.failed_turns += 1;

                warn!("Error during battle turn: {}", e);
                self.state.push_log(format!("Error during battle turn: {}", e));
                self.state.push_event(BattleEvent::turn_failed(
                    self.state.turn,
                    e.to_string(),
                    self.consecutive_failures,
                ));

                if let Some(max) = self.config.max_consecutive_failures {
                    if self.consecutive_failures > max {
                        let count = self.consecutive_failures;
                        error!(
                            "Battle {} aborted after {} consecutive failed turns",
                            &self.id_string()[..8],
                            count
                        );
                        self.state.abort(format!("{} consecutive failed turns", count));
                        self.flush_events();
                        return Err(BattleError::TooManyFailures { count });
                    }
                }
            }
        }

        self.flush_events();
        Ok(outcome)
    }

    /// Clear the attack pose once its duration has passed.
    pub fn end_attack_pose(&mut self) {
        self.clock.end_attack();
    }

    /// One animation clock step.
    pub fn tick_animation(&mut self, delta_seconds: f32) {
        self.clock.tick(delta_seconds);
    }

    /// Paint active effects.
    pub fn draw_effects(&self, surface: &mut dyn Surface) {
        self.clock.draw(surface);
    }

    fn flush_events(&mut self) {
        for event in self.state.take_events() {
            debug!(turn = event.turn, "Broadcasting {:?}", event.data);
            // No subscribers is fine
            let _ = self.event_tx.send(event);
        }
    }
}

/// Next event for a subscriber, or `None` once every sender is gone.
///
/// A subscriber that fell behind loses the events that were overwritten
/// and resumes at the oldest one still buffered.
pub async fn next_event(rx: &mut broadcast::Receiver<BattleEvent>) -> Option<BattleEvent> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event subscriber lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::BattleEventData;
    use crate::game::state::BattlePhase;

    fn battle(seed: u64) -> BattleState {
        BattleState::from_selectors(
            ("A", "Ante Maloi Crusader"),
            ("B", "The OA Sorcerer"),
            seed,
        )
        .unwrap()
    }

    fn drain(rx: &mut broadcast::Receiver<BattleEvent>) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_next_event_skips_past_lag() {
        let (tx, mut rx) = broadcast::channel(2);
        for turn in 1..=4 {
            tx.send(BattleEvent::turn_failed(turn, "slot".into(), turn)).unwrap();
        }

        // Turns 1 and 2 were overwritten
        assert_eq!(next_event(&mut rx).await.map(|e| e.turn), Some(3));
        assert_eq!(next_event(&mut rx).await.map(|e| e.turn), Some(4));

        drop(tx);
        assert!(next_event(&mut rx).await.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.start_delay(), Duration::from_millis(500));
        assert_eq!(config.attack_duration(), Duration::from_millis(800));
        assert_eq!(config.turn_pause(), Duration::from_millis(400));
        assert_eq!(config.failure_delay(), Duration::from_millis(1000));
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.max_consecutive_failures, Some(5));
    }

    #[test]
    fn test_config_partial_json() {
        let config: BattleConfig =
            serde_json::from_str(r#"{"turn_pause_ms": 0, "max_consecutive_failures": null}"#)
                .unwrap();
        assert_eq!(config.turn_pause_ms, 0);
        assert_eq!(config.max_consecutive_failures, None);
        assert_eq!(config.attack_duration_ms, 800);
    }

    #[test]
    fn test_resolved_turn_spawns_effects_and_pose() {
        let mut session = BattleSession::with_viewport(battle(3), BattleConfig::default());
        let mut rx = session.subscribe();

        let first = session.start().unwrap();
        let outcome = session.play_turn().unwrap();
        let report = outcome.report().copied().unwrap();

        assert_eq!(report.attacker, first);
        assert!(session.clock().pose().is_attacking(first));
        assert_eq!(session.clock().effects().len(), 2);
        assert!(session.clock().effects().iter().all(|e| e.position() == report.anchor));

        session.end_attack_pose();
        assert_eq!(session.clock().pose().attacker(), None);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].data, BattleEventData::BattleStarted { .. }));
        assert!(matches!(events[1].data, BattleEventData::TurnResolved { .. }));
    }

    #[test]
    fn test_turn_before_start_is_rejected() {
        let mut session = BattleSession::with_viewport(battle(3), BattleConfig::default());
        assert_eq!(session.play_turn().unwrap_err(), BattleError::NotInProgress);
    }

    #[test]
    fn test_unlaid_stage_counts_failures_then_aborts() {
        let config = BattleConfig {
            max_consecutive_failures: Some(2),
            ..BattleConfig::default()
        };
        let mut session =
            BattleSession::new(battle(3), Box::new(StageLayout::default()), config);
        let mut rx = session.subscribe();
        session.start().unwrap();

        for expected in 1..=2 {
            let outcome = session.play_turn().unwrap();
            assert!(matches!(outcome, TurnOutcome::Failed(_)));
            assert_eq!(session.consecutive_failures(), expected);
        }
        assert_eq!(session.state().fighter(Side::Left).health(), 100);
        assert!(session
            .state()
            .log()
            .iter()
            .any(|line| line.starts_with("Error during battle turn: ")));

        assert_eq!(
            session.play_turn().unwrap_err(),
            BattleError::TooManyFailures { count: 3 }
        );
        assert!(matches!(session.state().phase, BattlePhase::Aborted { .. }));
        assert!(session.is_over());

        let events = drain(&mut rx);
        assert!(events.last().unwrap().is_terminal());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e.data, BattleEventData::TurnFailed { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_recovery_resets_consecutive_count() {
        let mut session =
            BattleSession::new(battle(3), Box::new(StageLayout::default()), BattleConfig::default());
        session.start().unwrap();

        session.play_turn().unwrap();
        session.play_turn().unwrap();
        assert_eq!(session.consecutive_failures(), 2);

        session.replace_stage(Box::new(StageLayout::for_viewport(800.0, 600.0)));
        assert!(session.play_turn().unwrap().report().is_some());
        assert_eq!(session.consecutive_failures(), 0);
        assert_eq!(session.failed_turns(), 2);
    }

    #[test]
    fn test_animation_ticks_through_session() {
        let mut session = BattleSession::with_viewport(battle(8), BattleConfig::default());
        session.start().unwrap();
        session.play_turn().unwrap();

        for _ in 0..21 {
            session.tick_animation(0.05);
        }
        assert!(session.clock().effects().is_empty());
    }
}
