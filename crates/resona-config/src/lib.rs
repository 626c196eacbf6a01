//! Configuration for resona players.
//!
//! This crate holds the plain-data side of the filter extension: the three
//! filter parameters every group and voice carries, the partial bundle
//! accepted by `add_filter`, per-group construction options and the mixer's
//! TOML configuration file.
//!
//! # Features
//!
//! - **Filter parameters**: [`FilterParameters`] with the canonical defaults
//!   (1000 Hz, Q 1, lowpass) and [`FilterBundle`] for partial updates
//! - **Group options**: [`GroupOptions`], the construction-time defaults of a
//!   group, including its filter defaults
//! - **Mixer config**: [`MixerConfig`], loaded from and saved to TOML
//!
//! # Example
//!
//! ```rust
//! use resona_config::{FilterType, MixerConfig};
//!
//! let config = MixerConfig::from_toml(r#"
//!     sample_rate = 44100
//!
//!     [[groups]]
//!     name = "footsteps"
//!     frequency = 800.0
//!     filter_type = "bandpass"
//! "#).unwrap();
//!
//! let params = config.groups[0].filter_params();
//! assert_eq!(params.frequency, 800.0);
//! assert_eq!(params.filter_type, FilterType::Bandpass);
//! ```

mod error;
mod filter;
mod mixer;
mod options;

pub use error::ConfigError;
pub use filter::{
    DEFAULT_FILTER_TYPE, DEFAULT_FREQUENCY, DEFAULT_Q_FACTOR, FilterBundle, FilterParameters,
};
pub use mixer::MixerConfig;
pub use options::GroupOptions;

/// Re-exported so configuration users need not depend on resona-core.
pub use resona_core::FilterType;
