//! Versioned tuning configuration for the detector and tracker.
//!
//! Every constant that shapes segmentation, scoring or confidence lives here
//! so that profiles can be recalibrated against labelled footage without
//! touching the algorithm code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrackError};

/// Current layout version of [`DetectorConfig`].
pub const CONFIG_VERSION: u32 = 1;

/// Built-in tuning profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningProfile {
    /// Higher working resolution, 5x5 conditioning and motion prediction.
    /// Accepts elongated motion streaks on the primary colour.
    #[default]
    Tracking,
    /// Lower working resolution, 3x3 conditioning, stricter shape and
    /// colour gates, no motion prediction.
    Baseline,
}

impl std::str::FromStr for TuningProfile {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tracking" => Ok(Self::Tracking),
            "baseline" => Ok(Self::Baseline),
            other => Err(TrackError::InvalidConfig(format!(
                "unknown tuning profile '{other}'"
            ))),
        }
    }
}

/// Inclusive HSV window. Hue is on the 0..=180 scale, saturation and value
/// on 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

/// Idealised ball colour used by the purity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTarget {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Geometric gates applied to every contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateParams {
    /// Smallest accepted contour area in working-frame pixels.
    pub min_area: f64,
    /// Largest accepted area as a fraction of `min(h, w)²`. Typical range
    /// 0.02..=0.08.
    pub max_area_fraction: f64,
    /// Circularity floor for ordinary searches (0.1..=0.3 works well).
    pub min_circularity: f64,
    /// Relaxed floor on the primary colour when motion prediction is on,
    /// letting motion-blurred streaks through.
    pub streak_min_circularity: f64,
    /// Half-size of the purity sampling square as a fraction of `√area`.
    /// Values above ~0.45 start sampling background around a round blob.
    pub purity_radius_factor: f64,
}

/// Ranking heuristics used when choosing among candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier on the purity score; must dwarf raw pixel areas so a small
    /// pure blob beats a large impure one. Range 100..=10_000.
    pub purity_weight: f64,
    /// Bonus added for a candidate sitting exactly on the prediction,
    /// decaying linearly to zero at the prediction radius. Range 0..=5_000.
    pub prediction_bonus: f64,
    /// Prediction radius as a fraction of `min(h, w)`. Range 0.05..=0.3.
    pub prediction_radius_fraction: f64,
}

/// Convex weighting of purity and circularity into a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub purity: f64,
    pub circularity: f64,
}

/// Complete detector and tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub version: u32,
    pub profile: TuningProfile,
    /// Longest side of the working frame; larger inputs are downscaled.
    pub working_resolution: u32,
    /// Radius of the disk structuring element (1 ≈ 3x3, 2 ≈ 5x5).
    pub kernel_radius: u8,
    /// Target colour window (bright orange).
    pub primary: HsvRange,
    /// Fallback window for washed-out or backlit balls (bright, unsaturated).
    pub secondary: HsvRange,
    pub target: ColorTarget,
    pub candidate: CandidateParams,
    pub scoring: ScoringWeights,
    pub confidence: ConfidenceWeights,
    /// Whether the tracker feeds motion predictions into candidate scoring.
    pub motion_prediction: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from_profile(TuningProfile::default())
    }
}

impl DetectorConfig {
    pub fn from_profile(profile: TuningProfile) -> Self {
        let target = ColorTarget {
            hue: 12.0,
            saturation: 220.0,
            value: 240.0,
        };
        let secondary = HsvRange::new([0, 0, 130], [180, 65, 255]);
        let scoring = ScoringWeights {
            purity_weight: 1000.0,
            prediction_bonus: 2000.0,
            prediction_radius_fraction: 0.15,
        };

        match profile {
            TuningProfile::Tracking => Self {
                version: CONFIG_VERSION,
                profile,
                working_resolution: 800,
                kernel_radius: 2,
                primary: HsvRange::new([8, 100, 110], [28, 255, 255]),
                secondary,
                target,
                candidate: CandidateParams {
                    min_area: 2.0,
                    max_area_fraction: 0.05,
                    min_circularity: 0.14,
                    streak_min_circularity: 0.04,
                    purity_radius_factor: 0.35,
                },
                scoring,
                confidence: ConfidenceWeights {
                    purity: 0.6,
                    circularity: 0.4,
                },
                motion_prediction: true,
            },
            TuningProfile::Baseline => Self {
                version: CONFIG_VERSION,
                profile,
                working_resolution: 640,
                kernel_radius: 1,
                primary: HsvRange::new([5, 120, 120], [25, 255, 255]),
                secondary,
                target,
                candidate: CandidateParams {
                    min_area: 4.0,
                    max_area_fraction: 0.04,
                    min_circularity: 0.2,
                    streak_min_circularity: 0.2,
                    purity_radius_factor: 0.35,
                },
                scoring,
                confidence: ConfidenceWeights {
                    purity: 0.65,
                    circularity: 0.35,
                },
                motion_prediction: false,
            },
        }
    }

    /// Load a configuration from a JSON file. See [`Self::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TrackError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON configuration. Fields left out, including
    /// fields of nested sections, take the values of the profile named by
    /// `profile` (the tracking profile when that is absent too).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        let profile = match overrides.get("profile") {
            Some(p) => TuningProfile::deserialize(p)?,
            None => TuningProfile::default(),
        };

        let mut merged = serde_json::to_value(Self::from_profile(profile))?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(TrackError::InvalidConfig(format!(
                "unsupported config version {} (expected {CONFIG_VERSION})",
                self.version
            )));
        }
        if self.working_resolution == 0 {
            return Err(TrackError::InvalidConfig(
                "working_resolution must be positive".into(),
            ));
        }
        for (name, range) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if (0..3).any(|c| range.lower[c] > range.upper[c]) || range.upper[0] > 180 {
                return Err(TrackError::InvalidConfig(format!(
                    "{name} HSV range is empty or exceeds the 0..=180 hue scale"
                )));
            }
        }
        let c = &self.candidate;
        if c.min_area <= 0.0 || c.max_area_fraction <= 0.0 || c.purity_radius_factor <= 0.0 {
            return Err(TrackError::InvalidConfig(
                "candidate area and purity parameters must be positive".into(),
            ));
        }
        let w = self.confidence;
        if w.purity < 0.0 || w.circularity < 0.0 || (w.purity + w.circularity - 1.0).abs() > 1e-6 {
            return Err(TrackError::InvalidConfig(format!(
                "confidence weights must be non-negative and sum to 1 (got {} + {})",
                w.purity, w.circularity
            )));
        }
        if self.scoring.prediction_radius_fraction <= 0.0 {
            return Err(TrackError::InvalidConfig(
                "prediction_radius_fraction must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Overlay `overrides` onto `base`, recursing into objects present in both.
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_validate() {
        DetectorConfig::from_profile(TuningProfile::Tracking)
            .validate()
            .unwrap();
        DetectorConfig::from_profile(TuningProfile::Baseline)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = DetectorConfig::default();
        config.confidence.circularity = 0.5;
        assert!(matches!(
            config.validate(),
            Err(TrackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            DetectorConfig::from_json_str(r#"{ "working_resolution": 640, "kernel_radius": 1 }"#)
                .unwrap();
        assert_eq!(config.working_resolution, 640);
        assert_eq!(config.kernel_radius, 1);
        assert_eq!(config.profile, TuningProfile::Tracking);
        assert_eq!(config.primary, DetectorConfig::default().primary);
    }

    #[test]
    fn test_json_profile_selects_its_constants() {
        let config = DetectorConfig::from_json_str(r#"{ "profile": "baseline" }"#).unwrap();
        assert_eq!(config, DetectorConfig::from_profile(TuningProfile::Baseline));
        assert_eq!(config.working_resolution, 640);
        assert!(!config.motion_prediction);
    }

    #[test]
    fn test_nested_override_keeps_profile_siblings() {
        let config = DetectorConfig::from_json_str(
            r#"{ "profile": "baseline", "candidate": { "min_area": 6.0 } }"#,
        )
        .unwrap();
        let baseline = DetectorConfig::from_profile(TuningProfile::Baseline);
        assert_eq!(config.candidate.min_area, 6.0);
        assert_eq!(
            config.candidate.min_circularity,
            baseline.candidate.min_circularity
        );
        assert_eq!(config.kernel_radius, baseline.kernel_radius);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let err = DetectorConfig::from_json_str(r#"{ "working_resolution": 0 }"#).unwrap_err();
        assert!(matches!(err, TrackError::InvalidConfig(_)));
        let err = DetectorConfig::from_json_str(r#"{ "profile": "fastest" }"#).unwrap_err();
        assert!(matches!(err, TrackError::Json(_)));
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "Baseline".parse::<TuningProfile>().unwrap(),
            TuningProfile::Baseline
        );
        assert!("fastest".parse::<TuningProfile>().is_err());
    }

    #[test]
    fn test_hsv_range_is_inclusive() {
        let range = HsvRange::new([8, 100, 110], [28, 255, 255]);
        assert!(range.contains([8, 100, 110]));
        assert!(range.contains([28, 255, 255]));
        assert!(!range.contains([29, 200, 200]));
    }
}
