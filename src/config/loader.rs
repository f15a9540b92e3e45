//! Configuration file loading with precedence handling.

use crate::view_state::FocusTuning;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "COACH_FOCUS_CONFIG";

/// Environment variable overriding whether replies are spoken.
pub const SPEECH_ENV_VAR: &str = "COACH_FOCUS_SPEECH";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/coach-focus/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Speak AI replies.
    #[serde(default)]
    pub speech_enabled: Option<bool>,

    /// Delay before a canned reply arrives.
    #[serde(default)]
    pub reply_delay_ms: Option<u64>,

    /// How long a reply streams before it is complete.
    #[serde(default)]
    pub streaming_duration_ms: Option<u64>,

    /// Width of one terminal cell in layout pixels.
    #[serde(default)]
    pub cell_width_px: Option<f64>,

    /// Height of one terminal cell in layout pixels.
    #[serde(default)]
    pub cell_height_px: Option<f64>,

    /// Focus-tracking tuning overrides.
    #[serde(default)]
    pub focus: Option<FocusSection>,
}

/// `[focus]` section: overrides for individual tuning constants.
///
/// ```toml
/// [focus]
/// padding_modifier = 1.5
/// min_visibility_down = 0.3
/// intersection_thresholds = [0.25, 0.5, 0.75]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FocusSection {
    /// See [`FocusTuning::padding_modifier`].
    pub padding_modifier: Option<f64>,
    /// See [`FocusTuning::padding_floor`].
    pub padding_floor: Option<f64>,
    /// See [`FocusTuning::mount_settle_ms`].
    pub mount_settle_ms: Option<u64>,
    /// See [`FocusTuning::scroll_target_fraction`].
    pub scroll_target_fraction: Option<f64>,
    /// See [`FocusTuning::scroll_to_latest_delay_ms`].
    pub scroll_to_latest_delay_ms: Option<u64>,
    /// See [`FocusTuning::up_bias`].
    pub up_bias: Option<f64>,
    /// See [`FocusTuning::down_bias`].
    pub down_bias: Option<f64>,
    /// See [`FocusTuning::min_visibility_up`].
    pub min_visibility_up: Option<f64>,
    /// See [`FocusTuning::min_visibility_down`].
    pub min_visibility_down: Option<f64>,
    /// See [`FocusTuning::resolve_debounce_ms`].
    pub resolve_debounce_ms: Option<u64>,
    /// See [`FocusTuning::intersection_thresholds`].
    pub intersection_thresholds: Option<Vec<f64>>,
    /// See [`FocusTuning::transition_in_ms`].
    pub transition_in_ms: Option<u64>,
    /// See [`FocusTuning::position_settle_ms`].
    pub position_settle_ms: Option<u64>,
    /// See [`FocusTuning::position_debounce_ms`].
    pub position_debounce_ms: Option<u64>,
    /// See [`FocusTuning::avatar_gap_px`].
    pub avatar_gap_px: Option<f64>,
    /// See [`FocusTuning::avatar_half_width_px`].
    pub avatar_half_width_px: Option<f64>,
    /// See [`FocusTuning::avatar_half_height_px`].
    pub avatar_half_height_px: Option<f64>,
    /// See [`FocusTuning::in_view_threshold`].
    pub in_view_threshold: Option<f64>,
    /// See [`FocusTuning::focus_scale`].
    pub focus_scale: Option<f64>,
    /// See [`FocusTuning::dimmed_opacity`].
    pub dimmed_opacity: Option<f64>,
}

impl FocusSection {
    /// Overlay the set fields onto `tuning`.
    pub fn apply(self, tuning: FocusTuning) -> FocusTuning {
        FocusTuning {
            padding_modifier: self.padding_modifier.unwrap_or(tuning.padding_modifier),
            padding_floor: self.padding_floor.unwrap_or(tuning.padding_floor),
            mount_settle_ms: self.mount_settle_ms.unwrap_or(tuning.mount_settle_ms),
            scroll_target_fraction: self
                .scroll_target_fraction
                .unwrap_or(tuning.scroll_target_fraction),
            scroll_to_latest_delay_ms: self
                .scroll_to_latest_delay_ms
                .unwrap_or(tuning.scroll_to_latest_delay_ms),
            up_bias: self.up_bias.unwrap_or(tuning.up_bias),
            down_bias: self.down_bias.unwrap_or(tuning.down_bias),
            min_visibility_up: self.min_visibility_up.unwrap_or(tuning.min_visibility_up),
            min_visibility_down: self.min_visibility_down.unwrap_or(tuning.min_visibility_down),
            resolve_debounce_ms: self.resolve_debounce_ms.unwrap_or(tuning.resolve_debounce_ms),
            intersection_thresholds: self
                .intersection_thresholds
                .unwrap_or(tuning.intersection_thresholds),
            transition_in_ms: self.transition_in_ms.unwrap_or(tuning.transition_in_ms),
            position_settle_ms: self.position_settle_ms.unwrap_or(tuning.position_settle_ms),
            position_debounce_ms: self.position_debounce_ms.unwrap_or(tuning.position_debounce_ms),
            avatar_gap_px: self.avatar_gap_px.unwrap_or(tuning.avatar_gap_px),
            avatar_half_width_px: self.avatar_half_width_px.unwrap_or(tuning.avatar_half_width_px),
            avatar_half_height_px: self
                .avatar_half_height_px
                .unwrap_or(tuning.avatar_half_height_px),
            in_view_threshold: self.in_view_threshold.unwrap_or(tuning.in_view_threshold),
            focus_scale: self.focus_scale.unwrap_or(tuning.focus_scale),
            dimmed_opacity: self.dimmed_opacity.unwrap_or(tuning.dimmed_opacity),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Speak coach replies aloud.
    pub speech_enabled: bool,
    /// Delay before a canned reply arrives.
    pub reply_delay_ms: u64,
    /// How long a reply streams in.
    pub streaming_duration_ms: u64,
    /// Nominal pixel width of one terminal cell.
    pub cell_width_px: f64,
    /// Nominal pixel height of one terminal cell.
    pub cell_height_px: f64,
    /// Focus-tracking constants.
    pub tuning: FocusTuning,
    /// Show the focus diagnostics overlay on startup.
    pub debug_overlay: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_path(),
            speech_enabled: true,
            reply_delay_ms: 1000,
            streaming_duration_ms: 2500,
            cell_width_px: 10.0,
            cell_height_px: 20.0,
            tuning: FocusTuning::default(),
            debug_overlay: false,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/coach-focus/coach-focus.log` on Unix-like
/// systems, or the platform's state or data directory elsewhere. Falls
/// back to the current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir().or_else(dirs::data_local_dir) {
        Some(dir) => dir.join("coach-focus").join("coach-focus.log"),
        None => PathBuf::from("coach-focus.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path, `~/.config/coach-focus/config.toml`
/// on Unix. `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("coach-focus").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `COACH_FOCUS_CONFIG` environment variable
/// 3. Default path `~/.config/coach-focus/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(env_path) if env_path.trim().is_empty() => {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV_VAR} is empty")));
        }
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Parse a boolean-ish environment value.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `COACH_FOCUS_SPEECH`: `on`/`off` (also `true`/`false`, `1`/`0`)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(SPEECH_ENV_VAR) {
        match parse_flag(&raw) {
            Some(enabled) => config.speech_enabled = enabled,
            None => warn!(value = %raw, "Ignoring unrecognised {SPEECH_ENV_VAR}"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        speech_enabled: config.speech_enabled.unwrap_or(defaults.speech_enabled),
        reply_delay_ms: config.reply_delay_ms.unwrap_or(defaults.reply_delay_ms),
        streaming_duration_ms: config
            .streaming_duration_ms
            .unwrap_or(defaults.streaming_duration_ms),
        cell_width_px: config.cell_width_px.unwrap_or(defaults.cell_width_px),
        cell_height_px: config.cell_height_px.unwrap_or(defaults.cell_height_px),
        tuning: match config.focus {
            Some(section) => section.apply(defaults.tuning),
            None => defaults.tuning,
        },
        debug_overlay: defaults.debug_overlay,
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).
/// Only flags the user actually passed are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    speech_override: Option<bool>,
    debug_overlay_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(enabled) = speech_override {
        config.speech_enabled = enabled;
    }

    if let Some(debug_overlay) = debug_overlay_override {
        config.debug_overlay = debug_overlay;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
