// Aquarium tuning parameters.
// Defaults reproduce the classic tank; an optional RON file can override any field.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default override file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "aquarium.ron";
/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "AQUARIUM_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AquariumConfig {
    // Window
    pub window_width: u32,
    pub window_height: u32,

    // Tank
    /// Half-extent of the tank on X.
    pub bound_x: f32,
    /// Half-extent of the tank on Z.
    pub bound_z: f32,

    // School fish
    /// Subtracted from `bound_x` to get the X turnaround edge.
    pub school_inset_x: f32,
    /// Subtracted from `bound_z` to get the Z clamp.
    pub school_margin_z: f32,
    pub school_floor_y: f32,
    pub school_speed: f32,
    pub school_scale: f32,

    // Player fish
    pub player_inset_x: f32,
    pub player_min_y: f32,
    pub player_max_y: f32,
    pub player_speed: f32,
    pub player_rotation_speed: f32,
    /// Seconds for the teeth to slide from rest to fully extended.
    pub mouth_duration: f32,

    // Animation
    pub tail_animation_speed: f32,
    pub wave_frequency: f32,

    /// Upper clamp on a single frame's delta time (seconds).
    pub max_frame_dt: f32,

    // Camera
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub camera_fov_degrees: f32,
}

impl Default for AquariumConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            bound_x: 35.0,
            bound_z: 20.0,
            school_inset_x: 20.0,
            school_margin_z: 8.0,
            school_floor_y: 1.0,
            school_speed: 3.0,
            school_scale: 2.0,
            player_inset_x: 20.0,
            player_min_y: 1.5,
            player_max_y: 18.0,
            player_speed: 2.0,
            player_rotation_speed: 2.0,
            mouth_duration: 1.0,
            tail_animation_speed: 5.0,
            wave_frequency: 1.5,
            max_frame_dt: 0.1,
            camera_eye: Vec3::new(0.0, 10.0, 25.0),
            camera_target: Vec3::new(0.0, 8.0, 0.0),
            camera_fov_degrees: 45.0,
        }
    }
}

impl AquariumConfig {
    /// X position at which school fish turn around.
    pub fn school_edge_x(&self) -> f32 {
        self.bound_x - self.school_inset_x
    }

    /// Z half-extent school fish are clamped to.
    pub fn school_edge_z(&self) -> f32 {
        self.bound_z - self.school_margin_z
    }

    /// X half-extent the player fish is clamped to.
    pub fn player_edge_x(&self) -> f32 {
        self.bound_x - self.player_inset_x
    }

    /// Reject values the simulation cannot run with: non-finite numbers,
    /// empty or inverted ranges, and a degenerate camera.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("bound_x", self.bound_x),
            ("bound_z", self.bound_z),
            ("school_inset_x", self.school_inset_x),
            ("school_margin_z", self.school_margin_z),
            ("school_floor_y", self.school_floor_y),
            ("school_speed", self.school_speed),
            ("school_scale", self.school_scale),
            ("player_inset_x", self.player_inset_x),
            ("player_min_y", self.player_min_y),
            ("player_max_y", self.player_max_y),
            ("player_speed", self.player_speed),
            ("player_rotation_speed", self.player_rotation_speed),
            ("mouth_duration", self.mouth_duration),
            ("tail_animation_speed", self.tail_animation_speed),
            ("wave_frequency", self.wave_frequency),
            ("max_frame_dt", self.max_frame_dt),
            ("camera_fov_degrees", self.camera_fov_degrees),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not a finite number")));
            }
        }
        for (field, value) in [("camera_eye", self.camera_eye), ("camera_target", self.camera_target)] {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not a finite vector")));
            }
        }

        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid("window_width", format!(
                "window must be non-empty, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.bound_x <= 0.0 {
            return Err(invalid("bound_x", format!("must be positive, got {}", self.bound_x)));
        }
        if self.bound_z <= 0.0 {
            return Err(invalid("bound_z", format!("must be positive, got {}", self.bound_z)));
        }
        if self.school_edge_x() <= 0.0 {
            return Err(invalid("school_inset_x", format!(
                "leaves no room to swim: bound_x {} - inset {} <= 0",
                self.bound_x, self.school_inset_x
            )));
        }
        if self.school_edge_z() < 0.0 {
            return Err(invalid("school_margin_z", format!(
                "exceeds bound_z: {} > {}",
                self.school_margin_z, self.bound_z
            )));
        }
        if self.player_edge_x() < 0.0 {
            return Err(invalid("player_inset_x", format!(
                "exceeds bound_x: {} > {}",
                self.player_inset_x, self.bound_x
            )));
        }
        if self.player_min_y > self.player_max_y {
            return Err(invalid("player_min_y", format!(
                "above player_max_y: {} > {}",
                self.player_min_y, self.player_max_y
            )));
        }
        if self.max_frame_dt < 0.0 {
            return Err(invalid("max_frame_dt", format!("must not be negative, got {}", self.max_frame_dt)));
        }
        if self.school_scale <= 0.0 {
            return Err(invalid("school_scale", format!("must be positive, got {}", self.school_scale)));
        }
        if !(self.camera_fov_degrees > 0.0 && self.camera_fov_degrees < 180.0) {
            return Err(invalid("camera_fov_degrees", format!(
                "must be in (0, 180), got {}",
                self.camera_fov_degrees
            )));
        }
        if self.camera_eye == self.camera_target {
            return Err(invalid("camera_target", "coincides with camera_eye".to_string()));
        }
        Ok(())
    }

    /// Parse a config from RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$AQUARIUM_CONFIG`, else `./aquarium.ron`, else defaults.
    ///
    /// An explicitly named file that cannot be read is an error; a missing
    /// default file is not.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("Loading config from ${} = {}", CONFIG_ENV_VAR, path);
            return Self::from_file(path);
        }
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_edges() {
        let config = AquariumConfig::default();
        assert_eq!(config.school_edge_x(), 15.0);
        assert_eq!(config.school_edge_z(), 12.0);
        assert_eq!(config.player_edge_x(), 15.0);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = AquariumConfig::from_ron_str("(wave_frequency: 2.0, bound_x: 40.0)").unwrap();
        assert_eq!(config.wave_frequency, 2.0);
        assert_eq!(config.bound_x, 40.0);
        assert_eq!(config.bound_z, 20.0);
        assert_eq!(config.school_edge_x(), 20.0);
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        let err = AquariumConfig::from_ron_str("(wave_frequency: \"fast\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = AquariumConfig::from_file("/nonexistent/aquarium.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    fn rejected_field(text: &str) -> &'static str {
        match AquariumConfig::from_ron_str(text) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("{text} should be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AquariumConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        assert_eq!(rejected_field("(bound_z: 5.0)"), "school_margin_z");
        assert_eq!(rejected_field("(player_min_y: 20.0)"), "player_min_y");
        assert_eq!(rejected_field("(bound_x: 10.0)"), "school_inset_x");
        assert_eq!(rejected_field("(max_frame_dt: -1.0)"), "max_frame_dt");
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut config = AquariumConfig::default();
        config.wave_frequency = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "wave_frequency", .. })));

        config = AquariumConfig::default();
        config.player_max_y = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "player_max_y", .. })));

        config = AquariumConfig::default();
        config.camera_eye.y = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "camera_eye", .. })));
    }

    #[test]
    fn test_degenerate_camera_is_rejected() {
        assert_eq!(rejected_field("(camera_fov_degrees: 0.0)"), "camera_fov_degrees");
        assert_eq!(rejected_field("(camera_eye: (0.0, 8.0, 0.0))"), "camera_target");
    }

    #[test]
    fn test_validated_config_never_panics_in_update() {
        // Tightest ranges validation still admits: zero-width Z band, flat Y band, zero dt cap.
        let config = AquariumConfig::from_ron_str(
            "(bound_z: 8.0, player_min_y: 5.0, player_max_y: 5.0, max_frame_dt: 0.0, player_inset_x: 35.0)",
        )
        .unwrap();
        let mut fish = crate::engine::components::SchoolFish::new(
            Vec3::new(0.0, 2.0, 3.0),
            true,
            crate::engine::components::MeshKind::FishA,
            config.school_speed,
            config.school_scale,
            crate::engine::components::Color::WHITE,
        );
        crate::engine::systems::step_school_fish(&mut fish, &config, 0.1);
        assert_eq!(fish.position.z, 0.0);

        let mut player = crate::engine::components::PlayerFish::default();
        let dt = crate::engine::systems::clamp_delta(0.016, config.max_frame_dt);
        crate::engine::systems::step_player(&mut player, &Default::default(), &config, dt);
        assert_eq!(player.position, Vec3::new(0.0, 5.0, 0.0));
    }
}
