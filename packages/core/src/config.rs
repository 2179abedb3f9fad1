use crate::error::ConfigError;
use crate::types::DetectionParams;
use serde::{Deserialize, Serialize};

/// Detector returns at most this many labels
pub const DEFAULT_MAX_LABELS: i32 = 10;
/// Detector drops labels below this confidence
pub const DEFAULT_MIN_CONFIDENCE: f32 = 85.0;
/// A "Cat" label must be strictly above this confidence to accept the image
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f32 = 90.0;

/// Key prefix of images waiting for classification
pub const STAGING_PREFIX: &str = "tmp/";
/// Key prefix of accepted images in the destination bucket
pub const DESTINATION_PREFIX: &str = "cat-images/";

/// Tuning parameters of detection and classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_max_labels")]
    pub max_labels: i32,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f32,
}

fn default_max_labels() -> i32 {
    DEFAULT_MAX_LABELS
}
fn default_min_confidence() -> f32 {
    DEFAULT_MIN_CONFIDENCE
}
fn default_acceptance_threshold() -> f32 {
    DEFAULT_ACCEPTANCE_THRESHOLD
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_labels: default_max_labels(),
            min_confidence: default_min_confidence(),
            acceptance_threshold: default_acceptance_threshold(),
        }
    }
}

/// Parse `name` from `get`, keeping it only if `valid` accepts it
fn parse_setting<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    valid: impl Fn(&T) -> bool,
    default: fn() -> T,
) -> T
where
    T: std::str::FromStr,
{
    let Some(raw) = get(name) else {
        return default();
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(variable = name, value = %raw, "Invalid setting, using default");
            default()
        }
    }
}

fn is_confidence(value: &f32) -> bool {
    value.is_finite() && (0.0..=100.0).contains(value)
}

impl ClassifierConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup. Unset, unparseable or out-of-range values
    /// fall back to the defaults: thresholds must be finite and within
    /// `0..=100`, `max_labels` at least 1.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_labels: parse_setting(
                &get,
                "WHISKER_MAX_LABELS",
                |v: &i32| *v >= 1,
                default_max_labels,
            ),
            min_confidence: parse_setting(
                &get,
                "WHISKER_MIN_CONFIDENCE",
                is_confidence,
                default_min_confidence,
            ),
            acceptance_threshold: parse_setting(
                &get,
                "WHISKER_ACCEPTANCE_THRESHOLD",
                is_confidence,
                default_acceptance_threshold,
            ),
        }
    }

    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            max_labels: self.max_labels,
            min_confidence: self.min_confidence,
        }
    }
}

/// Where images come from and where accepted ones go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Bucket that receives uploads under [`STAGING_PREFIX`]; also the copy source
    pub trigger_bucket: String,
    pub destination_bucket: String,
}

impl RelocationConfig {
    pub fn new(trigger_bucket: impl Into<String>, destination_bucket: impl Into<String>) -> Self {
        Self {
            trigger_bucket: trigger_bucket.into(),
            destination_bucket: destination_bucket.into(),
        }
    }

    /// Reads `TRIGGER_BUCKET_NAME` (required) and `DESTINATION_BUCKET_NAME`
    /// (defaults to the trigger bucket; accepted images then live under a
    /// different prefix of the same bucket).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let trigger_bucket = get("TRIGGER_BUCKET_NAME")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("TRIGGER_BUCKET_NAME"))?;
        let destination_bucket = get("DESTINATION_BUCKET_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| trigger_bucket.clone());

        Ok(Self {
            trigger_bucket,
            destination_bucket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_production_contract() {
        let config = ClassifierConfig::default();
        assert_eq!(config.max_labels, 10);
        assert_eq!(config.min_confidence, 85.0);
        assert_eq!(config.acceptance_threshold, 90.0);
        assert_eq!(
            config.detection_params(),
            DetectionParams {
                max_labels: 10,
                min_confidence: 85.0,
            }
        );
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{ "acceptance_threshold": 96.0 }"#).unwrap();
        assert_eq!(config.max_labels, DEFAULT_MAX_LABELS);
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(config.acceptance_threshold, 96.0);
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn valid_settings_are_read() {
        let config = ClassifierConfig::from_lookup(lookup(&[
            ("WHISKER_MAX_LABELS", "5"),
            ("WHISKER_MIN_CONFIDENCE", " 70.5 "),
            ("WHISKER_ACCEPTANCE_THRESHOLD", "95"),
        ]));
        assert_eq!(config.max_labels, 5);
        assert_eq!(config.min_confidence, 70.5);
        assert_eq!(config.acceptance_threshold, 95.0);
    }

    #[test]
    fn unset_settings_use_defaults() {
        let config = ClassifierConfig::from_lookup(lookup(&[]));
        assert_eq!(config.max_labels, DEFAULT_MAX_LABELS);
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(config.acceptance_threshold, DEFAULT_ACCEPTANCE_THRESHOLD);
    }

    #[test]
    fn unparseable_settings_use_defaults() {
        let config = ClassifierConfig::from_lookup(lookup(&[
            ("WHISKER_MAX_LABELS", "ten"),
            ("WHISKER_MIN_CONFIDENCE", ""),
            ("WHISKER_ACCEPTANCE_THRESHOLD", "high"),
        ]));
        assert_eq!(config.max_labels, DEFAULT_MAX_LABELS);
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(config.acceptance_threshold, DEFAULT_ACCEPTANCE_THRESHOLD);
    }

    #[test]
    fn out_of_range_settings_use_defaults() {
        let config = ClassifierConfig::from_lookup(lookup(&[
            ("WHISKER_MAX_LABELS", "-1"),
            ("WHISKER_MIN_CONFIDENCE", "inf"),
            ("WHISKER_ACCEPTANCE_THRESHOLD", "NaN"),
        ]));
        assert_eq!(config.max_labels, DEFAULT_MAX_LABELS);
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(config.acceptance_threshold, DEFAULT_ACCEPTANCE_THRESHOLD);

        let config = ClassifierConfig::from_lookup(lookup(&[
            ("WHISKER_MAX_LABELS", "0"),
            ("WHISKER_ACCEPTANCE_THRESHOLD", "100.5"),
        ]));
        assert_eq!(config.max_labels, DEFAULT_MAX_LABELS);
        assert_eq!(config.acceptance_threshold, DEFAULT_ACCEPTANCE_THRESHOLD);
    }

    #[test]
    fn nan_threshold_still_accepts_confident_cat() {
        let config =
            ClassifierConfig::from_lookup(lookup(&[("WHISKER_ACCEPTANCE_THRESHOLD", "NaN")]));
        let result = crate::classify(
            &[crate::Label::new("Cat", 99.9)],
            config.acceptance_threshold,
        );
        assert!(result.is_accepted);
    }

    #[test]
    fn missing_trigger_bucket_is_an_error() {
        assert!(matches!(
            RelocationConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("TRIGGER_BUCKET_NAME"))
        ));
        assert!(matches!(
            RelocationConfig::from_lookup(lookup(&[
                ("TRIGGER_BUCKET_NAME", ""),
                ("DESTINATION_BUCKET_NAME", "cats"),
            ])),
            Err(ConfigError::Missing("TRIGGER_BUCKET_NAME"))
        ));
    }

    #[test]
    fn destination_bucket_defaults_to_trigger_bucket() {
        let config =
            RelocationConfig::from_lookup(lookup(&[("TRIGGER_BUCKET_NAME", "uploads")])).unwrap();
        assert_eq!(config.trigger_bucket, "uploads");
        assert_eq!(config.destination_bucket, "uploads");

        let config = RelocationConfig::from_lookup(lookup(&[
            ("TRIGGER_BUCKET_NAME", "uploads"),
            ("DESTINATION_BUCKET_NAME", "cats"),
        ]))
        .unwrap();
        assert_eq!(config.destination_bucket, "cats");
    }
}
