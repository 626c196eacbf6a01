//! Construction options for a sound group.

use serde::{Deserialize, Serialize};

use resona_core::FilterType;

use crate::error::ConfigError;
use crate::filter::{DEFAULT_FREQUENCY, DEFAULT_Q_FACTOR, FilterParameters};

fn default_volume() -> f32 {
    1.0
}

fn default_pool() -> usize {
    5
}

fn default_frequency() -> f32 {
    DEFAULT_FREQUENCY
}

fn default_q_factor() -> f32 {
    DEFAULT_Q_FACTOR
}

/// Options a group is built from.
///
/// A `frequency` or `q_factor` of exactly zero means "unset" and falls back to
/// the default in [`GroupOptions::filter_params`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Display name, used only for logging and lookup.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Output volume, linear.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Whether sources loop at the end of the buffer.
    #[serde(default, alias = "loop")]
    pub looping: bool,

    /// Number of ended voices kept for reuse.
    #[serde(default = "default_pool")]
    pub pool: usize,

    /// Default filter frequency in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    /// Default filter resonance.
    #[serde(default = "default_q_factor", alias = "qFactor", alias = "q")]
    pub q_factor: f32,

    /// Default filter shape.
    #[serde(default, alias = "filterType")]
    pub filter_type: FilterType,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            volume: default_volume(),
            looping: false,
            pool: default_pool(),
            frequency: DEFAULT_FREQUENCY,
            q_factor: DEFAULT_Q_FACTOR,
            filter_type: FilterType::default(),
        }
    }
}

impl GroupOptions {
    /// Options with the given name and defaults for everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the volume.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Sets looping.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Sets the pool size.
    pub fn with_pool(mut self, pool: usize) -> Self {
        self.pool = pool;
        self
    }

    /// Sets the default frequency.
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the default resonance.
    pub fn with_q_factor(mut self, q_factor: f32) -> Self {
        self.q_factor = q_factor;
        self
    }

    /// Sets the default filter shape.
    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    /// The group's initial filter parameters.
    pub fn filter_params(&self) -> FilterParameters {
        let or_default = |value: f32, default: f32| if value == 0.0 { default } else { value };
        FilterParameters {
            frequency: or_default(self.frequency, DEFAULT_FREQUENCY),
            q_factor: or_default(self.q_factor, DEFAULT_Q_FACTOR),
            filter_type: self.filter_type,
        }
    }

    /// Checks volume and filter defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.volume.is_finite() && self.volume >= 0.0) {
            return Err(ConfigError::invalid(
                "volume",
                format!("{} is not a finite non-negative gain", self.volume),
            ));
        }
        self.filter_params().validate()
    }
}
