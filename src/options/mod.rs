//! Centralized motion/orbit/analytics options with TOML support.
//!
//! Options serialize to/from TOML. All sub-structs use `#[serde(default)]`
//! so partial files (e.g. only overriding `[orbit]`) work.

mod analytics;
mod motion;
mod orbit;

use std::path::Path;

pub use analytics::AnalyticsOptions;
pub use motion::MotionOptions;
pub use orbit::OrbitOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CardfolioError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Card choreography timing and scales.
    pub motion: MotionOptions,
    /// Sub-card orbit parameters.
    pub orbit: OrbitOptions,
    /// Request logger options.
    pub analytics: AnalyticsOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text and validate them.
    pub fn from_toml(text: &str) -> Result<Self, CardfolioError> {
        let options: Self = toml::from_str(text)
            .map_err(|e| CardfolioError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, CardfolioError> {
        let content = std::fs::read_to_string(path).map_err(CardfolioError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), CardfolioError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CardfolioError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CardfolioError::Io)?;
        }
        std::fs::write(path, content).map_err(CardfolioError::Io)
    }

    /// Reject values the choreography cannot work with. NaN and infinite
    /// values never fall in range.
    pub fn validate(&self) -> Result<(), CardfolioError> {
        let motion = self
            .motion
            .bounded_fields()
            .into_iter()
            .map(|(name, value, range)| ("motion", name, value, range));
        let orbit = self
            .orbit
            .bounded_fields()
            .into_iter()
            .map(|(name, value, range)| ("orbit", name, value, range));
        for (section, name, value, range) in motion.chain(orbit) {
            if !range.contains(&value) {
                return Err(CardfolioError::OptionsInvalid(format!(
                    "{section}.{name} must be within {}..={}, got {value}",
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[orbit]
base_period = 12.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.orbit.base_period, 12.0);
        assert_eq!(opts.orbit.radius_fraction, 0.32);
        assert_eq!(opts.motion.select_scale, 1.2);
        assert!(opts.analytics.anonymize_ip);
    }

    #[test]
    fn out_of_range_rejected() {
        let err = Options::from_toml("[motion]\nfocus_scale = 3.0\n").unwrap_err();
        assert!(matches!(err, CardfolioError::OptionsInvalid(_)));

        let err = Options::from_toml("[orbit]\nradius_fraction = 0.5\n").unwrap_err();
        assert!(matches!(err, CardfolioError::OptionsInvalid(_)));

        let err = Options::from_toml("[motion]\nflip_delay = -1.0\n").unwrap_err();
        assert!(matches!(err, CardfolioError::OptionsInvalid(_)));
    }

    #[test]
    fn non_finite_and_oversized_values_rejected() {
        for text in [
            "[orbit]\nperiod_jitter = inf\n",
            "[orbit]\nbase_period = inf\n",
            "[orbit]\nbase_period = 0.0\n",
            "[orbit]\nmin_period = inf\n",
            "[orbit]\nmin_period = 0.0\n",
            "[orbit]\npath_opacity = nan\n",
            "[motion]\nselect_duration = 1e30\n",
            "[motion]\nreturn_duration = 3.5\n",
            "[motion]\nhide_duration = inf\n",
            "[motion]\nselect_scale = nan\n",
        ] {
            let err = Options::from_toml(text).unwrap_err();
            assert!(
                matches!(err, CardfolioError::OptionsInvalid(_)),
                "{text:?} gave {err:?}"
            );
        }
        let err = Options::from_toml("[orbit]\nperiod_jitter = inf\n").unwrap_err();
        assert!(err.to_string().contains("orbit.period_jitter"), "{err}");
    }

    #[test]
    fn range_edges_accepted() {
        let text = "[motion]\nselect_duration = 3.0\nspawn_stagger = 0.0\n\
                    [orbit]\nbase_period = 120.0\nperiod_jitter = 20.0\n";
        assert!(Options::from_toml(text).is_ok());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Options::from_toml("[orbit\n").unwrap_err();
        assert!(matches!(err, CardfolioError::OptionsParse(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("motion"));
        assert!(props.contains_key("orbit"));
        assert!(props.contains_key("analytics"));

        let motion = &props["motion"]["properties"];
        assert!(motion.get("select_duration").is_some());
        assert!(motion.get("flip_delay").is_none());
    }
}
