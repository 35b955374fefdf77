//! Table settings
//!
//! Everything an operator can tune without touching code: jar layout and
//! hit-box calibration, shuffle pacing, token mode and reveal timing.
//! Loaded from JSON; every field falls back to its default when omitted.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::sim::{Bounds, Calibration, Viewport};

/// One jar as placed on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Nominal position of the slot this jar starts in (game coordinates)
    pub position: Vec2,
    /// Hit-box size
    pub size: Vec2,
    /// Anchor point within the hit-box (0..1 on both axes)
    pub anchor: Vec2,
    /// Per-jar hit-box calibration
    pub calibration: Calibration,
    /// Inactive jars are never hit and never hide a token
    pub active: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(160.0, 200.0),
            anchor: Vec2::splat(0.5),
            calibration: Calibration::default(),
            active: true,
        }
    }
}

impl ContainerConfig {
    /// A default-sized jar at the given position
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            size: self.size,
            anchor: self.anchor,
            calibration: self.calibration,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Table ===
    /// Jars in logical index order; index `i` starts in slot `i`
    pub containers: Vec<ContainerConfig>,
    /// Screen to game coordinate mapping
    pub viewport: Viewport,

    // === Difficulty ===
    /// Swaps per round at streak 0
    pub base_swap_count: u32,
    /// Seconds per swap at streak 0
    pub base_swap_pace: f32,

    // === Tokens ===
    /// Hide two balls instead of one; finding either wins
    pub double_token: bool,
    /// After a miss, lift the jar that actually held the ball
    pub reveal_on_miss: bool,

    // === Timing ===
    pub swap_settle_secs: f32,
    pub reveal_secs: f32,
    pub win_restart_secs: f32,
    pub loss_restart_secs: f32,
    pub demo_settle_secs: f32,

    /// RNG seed for a reproducible session (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            containers: vec![
                ContainerConfig::at(Vec2::new(-250.0, 0.0)),
                ContainerConfig::at(Vec2::new(0.0, 0.0)),
                ContainerConfig::at(Vec2::new(250.0, 0.0)),
            ],
            viewport: Viewport::default(),

            base_swap_count: BASE_SWAP_COUNT,
            base_swap_pace: BASE_SWAP_PACE,

            double_token: false,
            reveal_on_miss: true,

            swap_settle_secs: SWAP_SETTLE_SECS,
            reveal_secs: REVEAL_SECS,
            win_restart_secs: WIN_RESTART_SECS,
            loss_restart_secs: LOSS_RESTART_SECS,
            demo_settle_secs: DEMO_SETTLE_SECS,

            seed: None,
        }
    }
}

impl Settings {
    /// Default table with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings from {} ({} containers)",
            path.display(),
            settings.containers.len()
        );
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Number of jars that can hide a token
    pub fn active_count(&self) -> usize {
        self.containers.iter().filter(|c| c.active).count()
    }

    /// Distinct active jars a round must hide its tokens in. A lone jar may
    /// hold both tokens in double-token mode.
    pub fn required_active(&self) -> usize {
        if self.double_token && self.containers.len() > 1 {
            2
        } else {
            1
        }
    }

    /// Check everything a round needs before it starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.containers.is_empty() {
            return Err(ConfigError::NoContainers);
        }
        let active = self.active_count();
        if active == 0 {
            return Err(ConfigError::NoActiveContainers);
        }
        let needed = self.required_active();
        if active < needed {
            return Err(ConfigError::NotEnoughActiveContainers { needed, active });
        }
        for (id, container) in self.containers.iter().enumerate() {
            if container.size.x <= 0.0 || container.size.y <= 0.0 {
                return Err(ConfigError::InvalidContainer {
                    id,
                    reason: "size must be positive",
                });
            }
            if !(0.0..=1.0).contains(&container.anchor.x) || !(0.0..=1.0).contains(&container.anchor.y)
            {
                return Err(ConfigError::InvalidContainer {
                    id,
                    reason: "anchor must lie within 0..1",
                });
            }
            let cal = container.calibration;
            if cal.left_inset < 0.0 || cal.right_inset < 0.0 {
                return Err(ConfigError::InvalidContainer {
                    id,
                    reason: "insets must not be negative",
                });
            }
            if cal.left_inset + cal.right_inset >= container.size.x {
                return Err(ConfigError::InvalidContainer {
                    id,
                    reason: "insets leave no hit-box",
                });
            }
        }
        self.viewport.validate()?;
        if self.base_swap_pace <= 0.0 {
            return Err(ConfigError::InvalidPacing("base swap pace must be positive"));
        }
        let delays = [
            self.swap_settle_secs,
            self.reveal_secs,
            self.win_restart_secs,
            self.loss_restart_secs,
            self.demo_settle_secs,
        ];
        if delays.iter().any(|d| *d < 0.0 || !d.is_finite()) {
            return Err(ConfigError::InvalidPacing("delays must be finite and not negative"));
        }
        Ok(())
    }
}
