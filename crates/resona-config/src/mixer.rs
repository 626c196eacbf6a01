//! Mixer configuration files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::GroupOptions;

fn default_sample_rate() -> u32 {
    48000
}

fn default_block_size() -> usize {
    256
}

fn default_audio() -> bool {
    true
}

/// Top-level mixer configuration.
///
/// ```toml
/// sample_rate = 48000
/// block_size = 256
///
/// [[groups]]
/// name = "ambience"
/// looping = true
/// frequency = 400.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    /// Graph sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Largest block rendered in one graph pass.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// When false the mixer runs without an audio graph and every filter
    /// call is a no-op.
    #[serde(default = "default_audio")]
    pub audio: bool,

    /// Groups created with the mixer, in order.
    #[serde(default)]
    pub groups: Vec<GroupOptions>,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            block_size: default_block_size(),
            audio: default_audio(),
            groups: Vec::new(),
        }
    }
}

impl MixerConfig {
    /// Adds a group.
    pub fn with_group(mut self, group: GroupOptions) -> Self {
        self.groups.push(group);
        self
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the render block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Enables or disables the audio graph.
    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Finds a group by name.
    pub fn group(&self, name: &str) -> Option<&GroupOptions> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Checks the sample rate, block size and every group.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(8000..=384_000).contains(&self.sample_rate) {
            return Err(ConfigError::invalid(
                "sample_rate",
                format!("{} Hz is outside 8000..=384000", self.sample_rate),
            ));
        }
        if self.block_size == 0 {
            return Err(ConfigError::invalid("block_size", "must be at least 1"));
        }
        for (i, group) in self.groups.iter().enumerate() {
            group.validate().map_err(|e| match e {
                ConfigError::InvalidParameter { param, reason } => {
                    ConfigError::invalid(format!("groups[{i}].{param}"), reason)
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
