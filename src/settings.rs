//! Game settings and tunables
//!
//! Loaded from a JSON file; any field missing from the file keeps its default.

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ball ===
    /// Ball radius (meters)
    pub ball_radius: f32,
    /// Ball color (RGBA, 0-1)
    pub ball_color: [f32; 4],
    pub ball_restitution: f32,
    pub ball_rolling_friction: f32,
    /// Spawn point relative to the viewer
    pub spawn_offset: Vec3,
    /// Launch impulse in viewer space (w = 0, direction only)
    pub launch_impulse: Vec4,

    // === Projectile cleanup ===
    /// Despawn thrown balls after this many seconds (None = never)
    pub projectile_lifetime_secs: Option<f32>,
    /// Maximum live balls; the oldest is removed when exceeded
    pub max_projectiles: usize,

    // === Sunk animation ===
    /// Cup fade duration (seconds)
    pub cup_fade_secs: f32,
    /// Ball fade duration, also the hide delay (seconds)
    pub ball_fade_secs: f32,

    // === Scanning ===
    /// Plane overlay color (RGBA, 0-1)
    pub plane_overlay_color: [f32; 4],
    /// Name of the table template asset
    pub table_template: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            ball_color: BALL_COLOR,
            ball_restitution: BALL_RESTITUTION,
            ball_rolling_friction: BALL_ROLLING_FRICTION,
            spawn_offset: BALL_SPAWN_OFFSET,
            launch_impulse: BALL_LAUNCH_IMPULSE,

            projectile_lifetime_secs: Some(PROJECTILE_LIFETIME_SECS),
            max_projectiles: MAX_PROJECTILES,

            cup_fade_secs: SHORT_FADE_SECS,
            ball_fade_secs: LONG_FADE_SECS,

            plane_overlay_color: PLANE_OVERLAY_COLOR,
            table_template: TABLE_TEMPLATE.to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Invalid settings file {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({})", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Effective projectile cap (always at least one live ball)
    pub fn projectile_cap(&self) -> usize {
        self.max_projectiles.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_throw() {
        let settings = Settings::default();
        assert_eq!(settings.spawn_offset, Vec3::new(0.0, -0.05, -0.2));
        assert_eq!(settings.launch_impulse, Vec4::new(-2.2, 0.0, -1.0, 0.0));
        assert!((settings.cup_fade_secs - 0.5).abs() < 1e-6);
        assert!((settings.ball_fade_secs - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "ball_radius": 0.05, "muted": true }"#)
            .expect("valid json");
        assert!((settings.ball_radius - 0.05).abs() < 1e-6);
        assert!(settings.muted);
        assert_eq!(settings.table_template, TABLE_TEMPLATE);
        assert_eq!(settings.max_projectiles, MAX_PROJECTILES);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.projectile_lifetime_secs = None;
        settings.max_projectiles = 3;
        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json).expect("parse"), settings);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/beer-pong/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_projectile_cap_never_zero() {
        let settings = Settings {
            max_projectiles: 0,
            ..Default::default()
        };
        assert_eq!(settings.projectile_cap(), 1);
    }
}
