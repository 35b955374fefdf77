//! Error taxonomy
//!
//! Ignored clicks are not errors and never show up here; see
//! [`crate::sim::IgnoreReason`].

use thiserror::Error;

/// A table configuration that cannot run a round
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no containers configured")]
    NoContainers,

    #[error("no active container can hide a token")]
    NoActiveContainers,

    #[error("a round needs {needed} active containers, only {active} available")]
    NotEnoughActiveContainers { needed: usize, active: usize },

    #[error("container {id} is invalid: {reason}")]
    InvalidContainer { id: usize, reason: &'static str },

    #[error("viewport is invalid: {0}")]
    InvalidViewport(&'static str),

    #[error("pacing is invalid: {0}")]
    InvalidPacing(&'static str),
}

/// Failure to load or save a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}
