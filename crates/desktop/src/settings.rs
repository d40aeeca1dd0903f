use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use livecheck_core::detection::domain::detector_params::DetectorParams;
use livecheck_core::liveness::domain::threshold::{clamp_threshold, DEFAULT_THRESHOLD};
use livecheck_core::pipeline::capture_session::SessionConfig;
use livecheck_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

pub const SCALE_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 1.05..=2.0;
pub const MIN_NEIGHBORS_RANGE: std::ops::RangeInclusive<u32> = 0..=10;
pub const MIN_FACE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 0..=300;
pub const FONT_SCALE_RANGE: std::ops::RangeInclusive<f32> = 0.8..=1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::Light, Appearance::Dark];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// User preferences persisted between runs. Missing fields fall back to
/// their defaults, and out-of-range values are pulled back into range on
/// load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub threshold: u32,
    pub camera_index: u32,
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub min_face_size: u32,
    /// Overrides the automatic cascade lookup when set.
    pub cascade_path: Option<PathBuf>,
    pub appearance: Appearance,
    pub high_contrast: bool,
    pub font_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            camera_index: DEFAULT_CAMERA_INDEX,
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_face_size: 0,
            cascade_path: None,
            appearance: Appearance::Light,
            high_contrast: false,
            font_scale: 1.0,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("LiveCheck").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    fn load_from(path: &Path) -> Self {
        let settings: Self = fs::read_to_string(path)
            .ok()
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("Ignoring unreadable settings at {}: {e}", path.display());
                    None
                }
            })
            .unwrap_or_default();
        settings.sanitised()
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialise settings: {e}"),
        }
    }

    /// Pulls every value into the range the UI can represent.
    pub fn sanitised(mut self) -> Self {
        let defaults = Self::default();
        self.threshold = clamp_threshold(self.threshold);
        self.scale_factor = if self.scale_factor.is_finite() {
            self.scale_factor
                .clamp(*SCALE_FACTOR_RANGE.start(), *SCALE_FACTOR_RANGE.end())
        } else {
            defaults.scale_factor
        };
        self.min_neighbors = self.min_neighbors.min(*MIN_NEIGHBORS_RANGE.end());
        self.min_face_size = self.min_face_size.min(*MIN_FACE_SIZE_RANGE.end());
        self.font_scale = if self.font_scale.is_finite() {
            self.font_scale
                .clamp(*FONT_SCALE_RANGE.start(), *FONT_SCALE_RANGE.end())
        } else {
            defaults.font_scale
        };
        if self
            .cascade_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.cascade_path = None;
        }
        self
    }

    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            scale_factor: self.scale_factor,
            min_neighbors: self.min_neighbors,
            min_size: self.min_face_size,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            camera_index: self.camera_index,
            detector: self.detector_params(),
        }
    }

    /// Resets capture and detection preferences; appearance is untouched.
    pub fn restore_detection_defaults(&mut self) {
        let defaults = Self::default();
        self.threshold = defaults.threshold;
        self.camera_index = defaults.camera_index;
        self.scale_factor = defaults.scale_factor;
        self.min_neighbors = defaults.min_neighbors;
        self.min_face_size = defaults.min_face_size;
        self.cascade_path = defaults.cascade_path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "threshold": 80, "appearance": "dark" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.threshold, 80);
        assert_eq!(settings.appearance, Appearance::Dark);
        assert_eq!(settings.min_neighbors, DEFAULT_MIN_NEIGHBORS);
    }

    #[test]
    fn test_saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            threshold: 120,
            camera_index: 1,
            cascade_path: Some(PathBuf::from("/tmp/cascade.xml")),
            ..Settings::default()
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[rstest]
    #[case::below(0, 10)]
    #[case::inside(75, 75)]
    #[case::above(1000, 150)]
    fn test_threshold_is_sanitised(#[case] stored: u32, #[case] expected: u32) {
        let settings = Settings {
            threshold: stored,
            ..Settings::default()
        }
        .sanitised();
        assert_eq!(settings.threshold, expected);
    }

    #[rstest]
    #[case::not_growing(1.0, 1.05)]
    #[case::too_coarse(5.0, 2.0)]
    #[case::nan(f64::NAN, DEFAULT_SCALE_FACTOR)]
    fn test_scale_factor_is_sanitised(#[case] stored: f64, #[case] expected: f64) {
        let settings = Settings {
            scale_factor: stored,
            ..Settings::default()
        }
        .sanitised();
        assert_eq!(settings.scale_factor, expected);
        assert!(settings.detector_params().validate().is_ok());
    }

    #[test]
    fn test_empty_cascade_path_means_automatic() {
        let settings = Settings {
            cascade_path: Some(PathBuf::new()),
            ..Settings::default()
        }
        .sanitised();
        assert!(settings.cascade_path.is_none());
    }

    #[test]
    fn test_restore_detection_defaults_keeps_appearance() {
        let mut settings = Settings {
            threshold: 140,
            min_neighbors: 0,
            appearance: Appearance::Light,
            font_scale: 1.3,
            ..Settings::default()
        };
        settings.restore_detection_defaults();
        assert_eq!(settings.threshold, DEFAULT_THRESHOLD);
        assert_eq!(settings.min_neighbors, DEFAULT_MIN_NEIGHBORS);
        assert_eq!(settings.appearance, Appearance::Light);
        assert_eq!(settings.font_scale, 1.3);
    }

    #[test]
    fn test_session_config_carries_detector_params() {
        let settings = Settings {
            camera_index: 2,
            scale_factor: 1.2,
            min_neighbors: 3,
            min_face_size: 60,
            ..Settings::default()
        };
        let config = settings.session_config();
        assert_eq!(config.camera_index, 2);
        assert_eq!(config.detector.scale_factor, 1.2);
        assert_eq!(config.detector.min_neighbors, 3);
        assert_eq!(config.detector.min_size, 60);
    }
}
