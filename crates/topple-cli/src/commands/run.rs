//! Headless level simulation

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use topple_core::{LevelConfiguration, TuningConfig};
use topple_game::{AutoPlayer, FrameGates, Game};
use topple_runtime::{ChargeController, ChargeEvent, ChargeGates, GameSession, SessionOutcome};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames to wait between scripted shots
const SHOT_SPACING_FRAMES: u32 = 150;

pub struct RunArgs {
    pub level: PathBuf,
    pub frames: u32,
    pub config: Option<PathBuf>,
    pub autoplay: bool,
    pub shots: Option<u32>,
    pub hold_ms: f64,
    pub json: bool,
}

#[derive(Serialize)]
struct Summary {
    level_id: String,
    outcome: SessionOutcome,
    score: u32,
    frames: u32,
    shots: u32,
    fallen: Vec<String>,
    golden_fallen: bool,
}

/// Fires a fixed number of shots through the charge controller, one at a
/// time, each aimed at the golden block and held for `hold_ms`.
///
/// Charge timing runs on the shooter's own clock, which keeps going while
/// the game is paused.
struct ScriptedShooter {
    charge: ChargeController,
    remaining: u32,
    hold_ms: f64,
    elapsed_ms: f64,
    started_ms: f64,
    cooldown: u32,
}

impl ScriptedShooter {
    fn new(charge: ChargeController, shots: u32, hold_ms: f64) -> Self {
        Self {
            charge,
            remaining: shots,
            hold_ms,
            elapsed_ms: 0.0,
            started_ms: 0.0,
            // let the structure settle before the first shot
            cooldown: 30,
        }
    }

    /// Advance the charge clock by one loop iteration
    fn advance(&mut self, dt: f32) {
        self.elapsed_ms += f64::from(dt) * 1000.0;
    }

    fn update(&mut self, game: &mut Game, session: &mut GameSession, gates: ChargeGates) -> bool {
        let now = self.elapsed_ms;

        if self.charge.is_charging() {
            self.charge.tick(now);
            if now - self.started_ms < self.hold_ms {
                return false;
            }
            let Some(power) = self.charge.release(now) else {
                return false;
            };
            let kind = session.selected();
            if session.try_consume(kind).is_err() {
                return false;
            }
            game.launch_projectile(power, kind);
            self.remaining -= 1;
            self.cooldown = SHOT_SPACING_FRAMES;
            return true;
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return false;
        }
        if self.remaining == 0 {
            return false;
        }
        let Some(target) = game.golden_block_position() else {
            return false;
        };

        if self.charge.begin(now, gates) {
            game.point_camera_towards(target);
            self.started_ms = now;
        }
        false
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let level = LevelConfiguration::load_from_file(&args.level)
        .with_context(|| format!("Failed to load level {}", args.level.display()))?;
    let config = match &args.config {
        Some(path) => TuningConfig::load_from_file(path)
            .with_context(|| format!("Failed to load tuning {}", path.display()))?,
        None => TuningConfig::default(),
    };

    for issue in level.audit() {
        log::warn!("[cli] {issue}");
    }
    if let Some(message) = &level.game_message {
        println!("{message}");
    }

    let mut game = Game::new(config.clone(), &level);
    let mut session = GameSession::new(&level, 0);
    let mut agent = AutoPlayer::default();
    agent.set_active(args.autoplay);

    let mut shooter = ScriptedShooter::new(
        ChargeController::new(config.charge.clone()),
        args.shots.unwrap_or_else(|| session.total_ammo()),
        args.hold_ms,
    );

    let mut shots = 0;
    let mut fallen = Vec::new();
    let mut golden_fallen = false;
    let mut frames = 0;

    while frames < args.frames {
        shooter.advance(FRAME_DT);
        let fired = if agent.is_active() {
            agent.update(&mut game, &mut session).is_some()
        } else {
            let gates = agent.charge_gates(&session);
            shooter.update(&mut game, &mut session, gates)
        };
        if fired {
            shots += 1;
        }

        game.frame(FRAME_DT, FrameGates::default());
        frames += 1;

        for fall in game.drain_falls() {
            session.on_block_fallen(fall.golden);
            println!(
                "[frame {frames:>5}] block '{}' fell{}",
                fall.block_id,
                if fall.golden { " (golden)" } else { "" }
            );
            golden_fallen |= fall.golden;
            fallen.push(fall.block_id);
        }
        for event in game.drain_events() {
            log::trace!("[cli] {event:?}");
        }
        for event in shooter.charge.drain_events() {
            if let ChargeEvent::Completed(power) = event {
                log::debug!("[cli] Charge completed at {power:.2}");
            }
        }

        session.update_game_over(game.projectiles().active_count());
        if session.outcome() != SessionOutcome::Playing {
            break;
        }
    }
    shooter.charge.stop();

    let summary = Summary {
        level_id: level.level_id.clone(),
        outcome: session.outcome(),
        score: session.score(),
        frames,
        shots,
        fallen,
        golden_fallen,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Level '{}': {:?} after {} frame(s), {} shot(s), score {}",
            summary.level_id, summary.outcome, summary.frames, summary.shots, summary.score
        );
    }
    Ok(())
}
