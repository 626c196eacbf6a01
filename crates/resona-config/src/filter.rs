//! Filter parameter sets.

use serde::{Deserialize, Serialize};

use resona_core::FilterType;

use crate::error::ConfigError;

/// Default cutoff / center frequency in Hz.
pub const DEFAULT_FREQUENCY: f32 = 1000.0;

/// Default resonance.
pub const DEFAULT_Q_FACTOR: f32 = 1.0;

/// Default response shape.
pub const DEFAULT_FILTER_TYPE: FilterType = FilterType::Lowpass;

/// The three filter parameters a group or voice carries.
///
/// Copying is cheap and intended: a voice owns its own copy, taken from its
/// group when the voice is created or reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParameters {
    /// Cutoff or center frequency in Hz.
    pub frequency: f32,
    /// Resonance (dimensionless).
    #[serde(alias = "qFactor", alias = "q")]
    pub q_factor: f32,
    /// Response shape.
    #[serde(alias = "filterType", alias = "type")]
    pub filter_type: FilterType,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            q_factor: DEFAULT_Q_FACTOR,
            filter_type: DEFAULT_FILTER_TYPE,
        }
    }
}

impl FilterParameters {
    /// Creates a parameter set.
    pub fn new(frequency: f32, q_factor: f32, filter_type: FilterType) -> Self {
        Self {
            frequency,
            q_factor,
            filter_type,
        }
    }

    /// Checks that frequency and Q are finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::invalid(
                "frequency",
                format!("{} is not a finite positive frequency", self.frequency),
            ));
        }
        if !(self.q_factor.is_finite() && self.q_factor > 0.0) {
            return Err(ConfigError::invalid(
                "q_factor",
                format!("{} is not a finite positive Q", self.q_factor),
            ));
        }
        Ok(())
    }
}

/// A partial filter update, as accepted by `add_filter`.
///
/// Fields left as `None` keep the target voice's current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterBundle {
    /// New frequency in Hz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f32>,
    /// New resonance.
    #[serde(alias = "qFactor", alias = "Q", skip_serializing_if = "Option::is_none")]
    pub q_factor: Option<f32>,
    /// New response shape.
    #[serde(alias = "filterType", alias = "type", skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<FilterType>,
}

impl FilterBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frequency.
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the resonance.
    pub fn with_q_factor(mut self, q_factor: f32) -> Self {
        self.q_factor = Some(q_factor);
        self
    }

    /// Sets the response shape.
    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = Some(filter_type);
        self
    }

    /// Applies the bundle on top of `current`.
    ///
    /// Non-finite numbers are treated as absent.
    pub fn resolve(&self, current: &FilterParameters) -> FilterParameters {
        FilterParameters {
            frequency: self
                .frequency
                .filter(|f| f.is_finite())
                .unwrap_or(current.frequency),
            q_factor: self
                .q_factor
                .filter(|q| q.is_finite())
                .unwrap_or(current.q_factor),
            filter_type: self.filter_type.unwrap_or(current.filter_type),
        }
    }
}

impl From<FilterParameters> for FilterBundle {
    fn from(params: FilterParameters) -> Self {
        Self {
            frequency: Some(params.frequency),
            q_factor: Some(params.q_factor),
            filter_type: Some(params.filter_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = FilterParameters::default();
        assert_eq!(params.frequency, 1000.0);
        assert_eq!(params.q_factor, 1.0);
        assert_eq!(params.filter_type, FilterType::Lowpass);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_and_non_positive() {
        assert!(FilterParameters::new(f32::NAN, 1.0, FilterType::Notch).validate().is_err());
        assert!(FilterParameters::new(0.0, 1.0, FilterType::Notch).validate().is_err());
        assert!(FilterParameters::new(100.0, -1.0, FilterType::Notch).validate().is_err());
        assert!(FilterParameters::new(100.0, f32::INFINITY, FilterType::Notch).validate().is_err());
    }

    #[test]
    fn bundle_falls_back_per_field() {
        let current = FilterParameters::new(440.0, 3.0, FilterType::Bandpass);
        let bundle = FilterBundle::new().with_frequency(500.0);
        assert_eq!(
            bundle.resolve(&current),
            FilterParameters::new(500.0, 3.0, FilterType::Bandpass)
        );
    }

    #[test]
    fn bundle_ignores_non_finite_numbers() {
        let current = FilterParameters::default();
        let bundle = FilterBundle::new()
            .with_frequency(f32::NAN)
            .with_q_factor(f32::INFINITY)
            .with_filter_type(FilterType::Highpass);
        let resolved = bundle.resolve(&current);
        assert_eq!(resolved.frequency, current.frequency);
        assert_eq!(resolved.q_factor, current.q_factor);
        assert_eq!(resolved.filter_type, FilterType::Highpass);
    }

    #[test]
    fn empty_bundle_is_identity() {
        let current = FilterParameters::new(1.0, 2.0, FilterType::Notch);
        assert_eq!(FilterBundle::new().resolve(&current), current);
        assert_eq!(FilterBundle::from(current).resolve(&FilterParameters::default()), current);
    }

    #[test]
    fn deserializes_camel_case_aliases() {
        let params: FilterParameters =
            toml::from_str("frequency = 250.0\nqFactor = 4.0\nfilterType = \"notch\"").unwrap();
        assert_eq!(params, FilterParameters::new(250.0, 4.0, FilterType::Notch));

        let bundle: FilterBundle = toml::from_str("Q = 2.0").unwrap();
        assert_eq!(bundle, FilterBundle::new().with_q_factor(2.0));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let params: FilterParameters = toml::from_str("filter_type = \"highpass\"").unwrap();
        assert_eq!(params.frequency, DEFAULT_FREQUENCY);
        assert_eq!(params.q_factor, DEFAULT_Q_FACTOR);
        assert_eq!(params.filter_type, FilterType::Highpass);
    }
}
