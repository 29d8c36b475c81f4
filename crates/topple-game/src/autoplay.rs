//! Scripted agent that plays a level without input

use topple_core::{EntityId, ProjectileKind};
use topple_runtime::{ChargeGates, GameSession};

use crate::game::Game;

/// Order in which the agent spends ammunition
const PREFERENCE: [ProjectileKind; 4] = [
    ProjectileKind::Explosive,
    ProjectileKind::Heavy,
    ProjectileKind::Standard,
    ProjectileKind::Cluster,
];

/// Aims at the golden block and fires at a fixed power after a cooldown.
///
/// While active it suppresses manual charging through [`ChargeGates`].
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    active: bool,
    power: f32,
    cooldown_ms: f64,
    last_shot_ms: Option<f64>,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self::new(0.8, 2500.0)
    }
}

impl AutoPlayer {
    pub fn new(power: f32, cooldown_ms: f64) -> Self {
        Self {
            active: false,
            power,
            cooldown_ms,
            last_shot_ms: None,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if active != self.active {
            log::info!("[autoplay] {}", if active { "Engaged" } else { "Released" });
        }
        self.active = active;
        self.last_shot_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Gates for the manual charge controller this frame
    pub fn charge_gates(&self, session: &GameSession) -> ChargeGates {
        ChargeGates {
            can_attempt: session.can_fire(),
            auto_play: self.active,
        }
    }

    /// Next kind to fire, by preference, among those with ammunition
    pub fn choose_kind(session: &GameSession) -> Option<ProjectileKind> {
        PREFERENCE.into_iter().find(|k| session.ammo(*k) > 0)
    }

    /// Fire if active, the cooldown has elapsed and the level is still on.
    pub fn update(&mut self, game: &mut Game, session: &mut GameSession) -> Option<EntityId> {
        if !self.active || session.is_won() || session.is_over() {
            return None;
        }
        let now = game.now_ms();
        if self
            .last_shot_ms
            .is_some_and(|last| now - last < self.cooldown_ms)
        {
            return None;
        }

        let target = game.golden_block_position()?;
        let kind = Self::choose_kind(session)?;
        session.select(kind);
        session.try_consume(kind).ok()?;

        game.point_camera_towards(target);
        self.last_shot_ms = Some(now);
        Some(game.launch_projectile(self.power, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::FrameGates;
    use topple_core::{LevelConfiguration, TuningConfig};

    fn level() -> LevelConfiguration {
        LevelConfiguration::from_json(
            r#"{
                "levelId": "auto",
                "name": "Auto",
                "initialProjectiles": 0,
                "initialProjectileCounts": { "standard": 1, "heavy": 1 },
                "structure": [
                    { "id": "g", "position": { "x": 0, "y": 0.5, "z": 0 }, "isGolden": true }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn inactive_agent_does_nothing() {
        let level = level();
        let mut game = Game::new(TuningConfig::default(), &level);
        let mut session = GameSession::new(&level, 0);
        let mut agent = AutoPlayer::default();
        assert!(agent.update(&mut game, &mut session).is_none());
        assert!(agent.charge_gates(&session).allows_manual());
    }

    #[test]
    fn fires_by_preference_with_cooldown() {
        let level = level();
        let mut game = Game::new(TuningConfig::default(), &level);
        let mut session = GameSession::new(&level, 0);
        let mut agent = AutoPlayer::new(0.5, 100.0);
        agent.set_active(true);
        assert!(!agent.charge_gates(&session).allows_manual());

        let first = agent.update(&mut game, &mut session).unwrap();
        assert_eq!(game.projectiles().get(first).unwrap().kind, ProjectileKind::Heavy);
        assert!(agent.update(&mut game, &mut session).is_none());

        for _ in 0..10 {
            game.frame(1.0 / 60.0, FrameGates::default());
        }
        assert!(game.now_ms() >= 100.0);
        let second = agent.update(&mut game, &mut session).unwrap();
        assert_eq!(
            game.projectiles().get(second).map(|p| p.kind),
            Some(ProjectileKind::Standard)
        );
        assert_eq!(session.total_ammo(), 0);
        assert!(agent.update(&mut game, &mut session).is_none());
    }
}
