//! Score, ammunition and win/lose state for one level attempt

use serde::Serialize;
use std::collections::HashMap;
use crate::event::GameEvent;
use topple_core::{LevelConfiguration, ProjectileKind, Result, ToppleError};

pub const BLOCK_POINTS: u32 = 10;
pub const GOLDEN_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Playing,
    Won,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    level_id: String,
    level_index: usize,
    score: u32,
    ammo: HashMap<ProjectileKind, u32>,
    selected: ProjectileKind,
    won: bool,
    over: bool,
}

impl GameSession {
    pub fn new(level: &LevelConfiguration, level_index: usize) -> Self {
        let mut session = Self {
            level_id: String::new(),
            level_index: 0,
            score: 0,
            ammo: HashMap::new(),
            selected: ProjectileKind::Standard,
            won: false,
            over: false,
        };
        session.reset(level, level_index);
        session
    }

    /// Restart for `level`, refilling ammunition from its configuration.
    pub fn reset(&mut self, level: &LevelConfiguration, level_index: usize) {
        self.level_id = level.level_id.clone();
        self.level_index = level_index;
        self.score = 0;
        self.won = false;
        self.over = false;
        self.ammo = ProjectileKind::ALL
            .into_iter()
            .map(|kind| (kind, level.ammo_for(kind)))
            .collect();
        self.selected = self.first_available().unwrap_or(ProjectileKind::Standard);
        log::info!(
            "[session] Level '{}' ({}): {} shot(s)",
            self.level_id,
            level_index,
            self.total_ammo()
        );
    }

    pub fn ammo(&self, kind: ProjectileKind) -> u32 {
        self.ammo.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_ammo(&self) -> u32 {
        self.ammo.values().sum()
    }

    /// First kind in declaration order with ammunition left
    pub fn first_available(&self) -> Option<ProjectileKind> {
        ProjectileKind::ALL.into_iter().find(|k| self.ammo(*k) > 0)
    }

    /// Select a kind; refused when it has no ammunition.
    pub fn select(&mut self, kind: ProjectileKind) -> bool {
        if self.ammo(kind) == 0 {
            return false;
        }
        self.selected = kind;
        true
    }

    pub fn selected(&self) -> ProjectileKind {
        self.selected
    }

    /// Whether a new shot may be charged right now
    pub fn can_fire(&self) -> bool {
        !self.won && !self.over && self.ammo(self.selected) > 0
    }

    /// Spend one round of `kind`.
    pub fn try_consume(&mut self, kind: ProjectileKind) -> Result<()> {
        if self.won || self.over {
            return Err(ToppleError::OutOfAmmunition(format!(
                "level '{}' has ended",
                self.level_id
            )));
        }
        let Some(count) = self.ammo.get_mut(&kind).filter(|c| **c > 0) else {
            return Err(ToppleError::OutOfAmmunition(kind.to_string()));
        };
        *count -= 1;
        if self.ammo(self.selected) == 0 {
            if let Some(next) = self.first_available() {
                self.selected = next;
            }
        }
        Ok(())
    }

    pub fn on_block_fallen(&mut self, golden: bool) {
        if golden {
            self.score += GOLDEN_POINTS;
            if !self.won {
                log::info!("[session] Golden block down, level won");
            }
            self.won = true;
        } else {
            self.score += BLOCK_POINTS;
        }
    }

    /// Fold a frame-loop event into the score
    pub fn observe(&mut self, event: &GameEvent) {
        if let GameEvent::BlockFallen { golden, .. } = event {
            self.on_block_fallen(*golden);
        }
    }

    /// Game over once every round is spent, nothing is still flying and the
    /// level was not won.
    pub fn update_game_over(&mut self, active_projectiles: usize) -> bool {
        if !self.won && !self.over && self.total_ammo() == 0 && active_projectiles == 0 {
            self.over = true;
            log::info!("[session] Out of ammunition, game over");
        }
        self.over
    }

    pub fn outcome(&self) -> SessionOutcome {
        if self.won {
            SessionOutcome::Won
        } else if self.over {
            SessionOutcome::GameOver
        } else {
            SessionOutcome::Playing
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_over(&self) -> bool {
        self.over
    }
}
