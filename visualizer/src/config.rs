//! Visualizer configuration module.
//!
//! Configuration is read from environment variables.
//!
//! # Environment Variables
//!
//! - `BTREE_ORDER`: Maximum keys per node before a split (default: `3`, minimum `3`)
//! - `BTREE_RENDER_FORMAT`: `text` or `json` (default: `text`)
//! - `BTREE_SHOW_IDS`: Prefix rendered nodes with their id (default: `false`)
//! - `BTREE_MAX_RANDOM`: Upper bound for a single `random` command (default: `1000`)
//!
//! # Invariants
//!
//! - `order` is always a valid [`Order`]
//! - `max_random` is always at least 1

use crate::btree::{MIN_ORDER, Order};
use crate::render::RenderFormat;

/// Visualizer configuration.
///
/// Everything a session needs to build its tree and pick a renderer.
///
/// # Pre-conditions
///
/// When constructed via `from_env()`:
/// - Variables that are set must parse for their respective types
/// - Unset variables take their defaults
///
/// # Post-conditions
///
/// - `order` is at least [`MIN_ORDER`]
/// - `max_random` is at least 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Order of every tree the session creates.
    pub order: Order,
    /// Format used after each mutation.
    pub render_format: RenderFormat,
    /// Whether text output includes node ids.
    pub show_ids: bool,
    /// Largest count accepted by `random`.
    pub max_random: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            order: Order::default(),
            render_format: RenderFormat::default(),
            show_ids: false,
            max_random: Self::DEFAULT_MAX_RANDOM,
        }
    }
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl VisualizerConfig {
    /// Default cap for `random`.
    pub const DEFAULT_MAX_RANDOM: usize = 1000;

    pub const ORDER_VAR: &'static str = "BTREE_ORDER";
    pub const RENDER_FORMAT_VAR: &'static str = "BTREE_RENDER_FORMAT";
    pub const SHOW_IDS_VAR: &'static str = "BTREE_SHOW_IDS";
    pub const MAX_RANDOM_VAR: &'static str = "BTREE_MAX_RANDOM";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let order = Self::load_order(lookup(Self::ORDER_VAR))?;
        let render_format = Self::load_render_format(lookup(Self::RENDER_FORMAT_VAR))?;
        let show_ids = Self::load_show_ids(lookup(Self::SHOW_IDS_VAR).as_deref())?;
        let max_random = Self::load_max_random(lookup(Self::MAX_RANDOM_VAR))?;

        Ok(Self {
            order,
            render_format,
            show_ids,
            max_random,
        })
    }

    fn load_order(value: Option<String>) -> Result<Order, ConfigError> {
        let Some(value) = value else {
            return Ok(Order::default());
        };
        let invalid = || ConfigError::InvalidValue {
            name: Self::ORDER_VAR.to_string(),
            message: format!("'{value}' is not an integer of at least {MIN_ORDER}"),
        };
        let raw = value.trim().parse::<usize>().map_err(|_| invalid())?;
        Order::new(raw).map_err(|_| invalid())
    }

    fn load_render_format(value: Option<String>) -> Result<RenderFormat, ConfigError> {
        let Some(value) = value else {
            return Ok(RenderFormat::default());
        };
        value
            .parse::<RenderFormat>()
            .map_err(|message| ConfigError::InvalidValue {
                name: Self::RENDER_FORMAT_VAR.to_string(),
                message,
            })
    }

    fn load_show_ids(value: Option<&str>) -> Result<bool, ConfigError> {
        match value.map(str::trim) {
            None | Some("0" | "false" | "no") => Ok(false),
            Some("1" | "true" | "yes") => Ok(true),
            Some(other) => Err(ConfigError::InvalidValue {
                name: Self::SHOW_IDS_VAR.to_string(),
                message: format!("'{other}' is not a boolean"),
            }),
        }
    }

    fn load_max_random(value: Option<String>) -> Result<usize, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::DEFAULT_MAX_RANDOM);
        };
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidValue {
                name: Self::MAX_RANDOM_VAR.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }
}
