//! Battle Runner
//!
//! Paces a session in real time. The turn loop and the animation clock
//! run as two futures joined on one task, so a current-thread runtime is
//! enough. The clock stops when the turn loop exits for any reason.

use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{info, debug};

use crate::game::state::{BattleError, BattleState};
use crate::game::turn::TurnOutcome;
use crate::runtime::session::{BattleConfig, BattleSession};

/// What a finished battle looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Battle UUID.
    pub battle_id: String,
    /// Seed the battle RNG was built from.
    pub seed: u64,
    /// Surviving fighter.
    pub winner_name: Option<String>,
    /// Fallen fighter.
    pub loser_name: Option<String>,
    /// Resolved turns.
    pub turns: u32,
    /// Turns skipped after a recoverable failure.
    pub failed_turns: u32,
    /// Final state hash (hex).
    pub final_hash: String,
    /// When the runner started.
    pub started_at: DateTime<Utc>,
    /// When the turn loop exited.
    pub finished_at: DateTime<Utc>,
    /// Full battle log.
    pub log: Vec<String>,
}

impl BattleSummary {
    /// Snapshot a session.
    pub fn from_session(
        session: &BattleSession,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let state: &BattleState = session.state();
        let winner = state.winner_side();

        Self {
            battle_id: session.id_string(),
            seed: state.rng_seed,
            winner_name: winner.map(|side| state.fighter(side).name().to_string()),
            loser_name: winner.map(|side| state.fighter(side.opposite()).name().to_string()),
            turns: state.turn,
            failed_turns: session.failed_turns(),
            final_hash: hex::encode(state.compute_hash()),
            started_at,
            finished_at,
            log: state.log().to_vec(),
        }
    }
}

/// Drives a shared session to completion.
#[derive(Clone)]
pub struct BattleRunner {
    session: Arc<Mutex<BattleSession>>,
}

impl BattleRunner {
    /// Wrap a session.
    pub fn new(session: BattleSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Shared handle, for hosts that draw or subscribe while running.
    pub fn session(&self) -> Arc<Mutex<BattleSession>> {
        Arc::clone(&self.session)
    }

    /// Run the battle to its end.
    pub async fn run(&self) -> Result<BattleSummary, BattleError> {
        let config = self.session.lock().await.config.clone();
        let started_at = Utc::now();

        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        let battle = async {
            let result = self.battle_loop(&config).await;
            let _ = shutdown_tx.send(());
            result
        };
        let clock = self.clock_loop(config.tick_interval(), shutdown_rx);

        let (result, ()) = tokio::join!(battle, clock);
        result?;

        let finished_at = Utc::now();
        let session = self.session.lock().await;
        Ok(BattleSummary::from_session(&session, started_at, finished_at))
    }

    async fn battle_loop(&self, config: &BattleConfig) -> Result<(), BattleError> {
        sleep(config.start_delay()).await;
        self.session.lock().await.start()?;

        loop {
            let outcome = self.session.lock().await.play_turn()?;

            match outcome {
                TurnOutcome::Resolved(report) => {
                    sleep(config.attack_duration()).await;
                    self.session.lock().await.end_attack_pose();

                    if report.battle_over {
                        break;
                    }
                    sleep(config.turn_pause()).await;
                }
                TurnOutcome::Failed(_) => {
                    sleep(config.failure_delay()).await;
                }
            }
        }

        Ok(())
    }

    async fn clock_loop(&self, period: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let step = period.as_secs_f32();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.session.lock().await.tick_animation(step);
                }
                _ = shutdown.recv() => {
                    debug!("Animation clock stopped");
                    break;
                }
            }
        }
    }
}

/// Convenience: run a session and log the outcome.
pub async fn run_battle(session: BattleSession) -> Result<BattleSummary, BattleError> {
    let summary = BattleRunner::new(session).run().await?;
    info!(
        "Battle {} finished in {} turns, final hash {}",
        &summary.battle_id[..8],
        summary.turns,
        &summary.final_hash[..16]
    );
    Ok(summary)
}
