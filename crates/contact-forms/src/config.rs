// File: src/config.rs
// Purpose: Configuration parsing from forms.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::binding::{FormId, FormSpec};

/// Forms configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormsConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub forms: Vec<FormSpec>,
}

/// Timing knobs of the controller, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Deadline for the submission request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Quiet period before re-validating a touched field while typing
    #[serde(default = "default_input_debounce_ms")]
    pub input_debounce_ms: u64,

    /// How long a field keeps its success highlight
    #[serde(default = "default_success_cue_ms")]
    pub success_cue_ms: u64,

    /// How long a field keeps its invalid cue after a failed validation
    #[serde(default = "default_invalid_cue_ms")]
    pub invalid_cue_ms: u64,

    /// How long the error banner stays up
    #[serde(default = "default_banner_hide_ms")]
    pub banner_hide_ms: u64,

    /// How long the success message stays up
    #[serde(default = "default_success_hide_ms")]
    pub success_hide_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            input_debounce_ms: default_input_debounce_ms(),
            success_cue_ms: default_success_cue_ms(),
            invalid_cue_ms: default_invalid_cue_ms(),
            banner_hide_ms: default_banner_hide_ms(),
            success_hide_ms: default_success_hide_ms(),
        }
    }
}

impl ControllerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms)
    }

    pub fn success_cue(&self) -> Duration {
        Duration::from_millis(self.success_cue_ms)
    }

    pub fn invalid_cue(&self) -> Duration {
        Duration::from_millis(self.invalid_cue_ms)
    }

    pub fn banner_hide(&self) -> Duration {
        Duration::from_millis(self.banner_hide_ms)
    }

    pub fn success_hide(&self) -> Duration {
        Duration::from_millis(self.success_hide_ms)
    }
}

// Default values
fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_input_debounce_ms() -> u64 {
    300
}

fn default_success_cue_ms() -> u64 {
    2_000
}

fn default_invalid_cue_ms() -> u64 {
    500
}

fn default_banner_hide_ms() -> u64 {
    5_000
}

fn default_success_hide_ms() -> u64 {
    5_000
}

impl FormsConfig {
    /// Load configuration from a forms.toml file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FormsConfig = toml::from_str(content).context("Invalid forms configuration")?;
        Ok(config)
    }

    pub fn form(&self, id: &FormId) -> Option<&FormSpec> {
        self.forms.iter().find(|form| &form.id == id)
    }
}
