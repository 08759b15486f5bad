//! Classmates Battle
//!
//! Headless battle runner. Plays one paced battle between two champions
//! and prints the summary as JSON.
//!
//! Usage: `classmates-battle [<name1> <type1> <name2> <type2> [seed]]`
//!
//! Pacing can be overridden with JSON in `CLASSMATES_BATTLE_CONFIG`.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use classmates_battle::{
    VERSION,
    BattleConfig, BattleSession, BattleState, CharacterType,
    core::rng::derive_battle_seed,
    game::events::BattleEventData,
    runtime::{next_event, run_battle},
};

/// Environment variable holding JSON config overrides.
const CONFIG_ENV: &str = "CLASSMATES_BATTLE_CONFIG";

struct Matchup {
    left: (String, String),
    right: (String, String),
    seed: Option<u64>,
}

impl Matchup {
    fn from_args(args: &[String]) -> anyhow::Result<Self> {
        match args {
            [] => Ok(Self {
                left: ("A".into(), CharacterType::Crusader.display_name().into()),
                right: ("B".into(), CharacterType::Sorcerer.display_name().into()),
                seed: None,
            }),
            [n1, t1, n2, t2, rest @ ..] if rest.len() <= 1 => {
                let seed = rest
                    .first()
                    .map(|s| s.parse::<u64>().with_context(|| format!("Invalid seed: {}", s)))
                    .transpose()?;
                Ok(Self {
                    left: (n1.clone(), t1.clone()),
                    right: (n2.clone(), t2.clone()),
                    seed,
                })
            }
            _ => bail!("Usage: classmates-battle [<name1> <type1> <name2> <type2> [seed]]"),
        }
    }
}

fn load_config() -> anyhow::Result<BattleConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(json) => serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in {}", CONFIG_ENV)),
        Err(_) => Ok(BattleConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Classmates Battle v{}", VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let matchup = Matchup::from_args(&args)?;
    let config = load_config()?;

    let battle_id = Uuid::new_v4().into_bytes();
    let seed = matchup.seed.unwrap_or_else(|| {
        derive_battle_seed(&battle_id, &[matchup.left.0.as_str(), matchup.right.0.as_str()])
    });

    info!("Battle ID: {}", hex::encode(battle_id));
    info!("RNG Seed: {}", seed);

    let state = BattleState::from_selectors(
        (matchup.left.0.as_str(), matchup.left.1.as_str()),
        (matchup.right.0.as_str(), matchup.right.1.as_str()),
        seed,
    )?;
    let stage = Box::new(config.stage_layout());
    let session = BattleSession::with_id(battle_id, state, stage, config);

    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = next_event(&mut events).await {
            match &event.data {
                BattleEventData::TurnResolved { attacker_name, defender_name, damage, is_critical, defender_health, .. } => {
                    info!(
                        "Turn {}: {} hits {} for {}{} ({} HP left)",
                        event.turn,
                        attacker_name,
                        defender_name,
                        damage,
                        if *is_critical { "!" } else { "" },
                        defender_health
                    );
                }
                BattleEventData::TurnFailed { reason, consecutive_failures } => {
                    info!("Turn skipped ({} in a row): {}", consecutive_failures, reason);
                }
                _ => {}
            }
            if event.is_terminal() {
                break;
            }
        }
    });

    let summary = run_battle(session).await?;
    if let Err(e) = printer.await {
        warn!("Event printer failed: {}", e);
    }

    info!("=== Battle Results ===");
    for line in &summary.log {
        info!("{}", line);
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
