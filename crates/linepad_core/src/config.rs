//! Cache and history settings, with `LINEPAD_*` environment overrides.

use crate::constants::{
    DEFAULT_MAX_LOADED_WINDOWS, DEFAULT_UNDO_LIMIT, DEFAULT_UNDO_MAX_BYTES, DEFAULT_WINDOW_SIZE,
    ENV_COALESCE_TYPING, ENV_MAX_LOADED_WINDOWS, ENV_UNDO_LIMIT, ENV_UNDO_MAX_BYTES,
    ENV_WINDOW_SIZE,
};
use crate::error::{EditorError, Result};
use serde::Deserialize;
use std::env;
use tracing::warn;

/// Layout cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Lines per cache window.
    pub window_size: usize,
    /// Cap on simultaneously populated windows.
    pub maximum_loaded_windows: usize,
}

impl CacheConfig {
    /// Validated cache configuration.
    ///
    /// # Errors
    /// [`EditorError::InvalidArgument`] when either value is zero.
    pub fn new(window_size: usize, maximum_loaded_windows: usize) -> Result<Self> {
        let config = Self {
            window_size,
            maximum_loaded_windows,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// [`EditorError::InvalidArgument`] when either value is zero.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(EditorError::invalid("window_size must be at least one"));
        }
        if self.maximum_loaded_windows == 0 {
            return Err(EditorError::invalid(
                "maximum_loaded_windows must be at least one",
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            maximum_loaded_windows: DEFAULT_MAX_LOADED_WINDOWS,
        }
    }
}

/// Undo history limits and typing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of commands kept on the undo stack.
    pub max_commands: usize,
    /// Maximum text bytes retained by the undo stack.
    pub max_bytes: usize,
    /// Merge consecutive typed characters of one word into one command.
    pub coalesce_typing: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_UNDO_LIMIT,
            max_bytes: DEFAULT_UNDO_MAX_BYTES,
            coalesce_typing: true,
        }
    }
}

/// Runtime configuration for the editing core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub cache: CacheConfig,
    pub history: HistoryConfig,
}

/// Interpret a switch value such as `LINEPAD_COALESCE_TYPING=off`.
///
/// Accepts `on`/`off`, `yes`/`no`, `true`/`false` and `1`/`0` in any case,
/// with surrounding blanks ignored. A blank value reads as off.
pub fn read_switch(raw: &str) -> Option<bool> {
    const ON: [&str; 4] = ["on", "yes", "true", "1"];
    const OFF: [&str; 4] = ["off", "no", "false", "0"];
    let word = raw.trim();
    if word.is_empty() || OFF.iter().any(|off| word.eq_ignore_ascii_case(off)) {
        Some(false)
    } else if ON.iter().any(|on| word.eq_ignore_ascii_case(on)) {
        Some(true)
    } else {
        None
    }
}

fn switch_var(name: &str, fallback: bool) -> bool {
    let Ok(raw) = env::var(name) else {
        return fallback;
    };
    read_switch(&raw).unwrap_or_else(|| {
        warn!(variable = name, value = %raw, "unrecognized switch; keeping {}", fallback);
        fallback
    })
}

fn positive_var(name: &str, fallback: usize) -> usize {
    let Ok(raw) = env::var(name) else {
        return fallback;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!(variable = name, value = %raw, "expected a positive count; keeping {}", fallback);
            fallback
        }
    }
}

impl Config {
    /// Defaults overridden by any `LINEPAD_*` variables that are set.
    /// Values that are missing, malformed or zero keep the default.
    ///
    /// # Returns
    /// A [`Config`] that always passes [`CacheConfig::validate`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig {
                window_size: positive_var(ENV_WINDOW_SIZE, defaults.cache.window_size),
                maximum_loaded_windows: positive_var(
                    ENV_MAX_LOADED_WINDOWS,
                    defaults.cache.maximum_loaded_windows,
                ),
            },
            history: HistoryConfig {
                max_commands: positive_var(ENV_UNDO_LIMIT, defaults.history.max_commands),
                max_bytes: positive_var(ENV_UNDO_MAX_BYTES, defaults.history.max_bytes),
                coalesce_typing: switch_var(
                    ENV_COALESCE_TYPING,
                    defaults.history.coalesce_typing,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScopedEnv;

    #[test]
    fn switches_read_common_spellings() {
        assert_eq!(read_switch("On"), Some(true));
        assert_eq!(read_switch(" YES"), Some(true));
        assert_eq!(read_switch("1"), Some(true));
        assert_eq!(read_switch("   "), Some(false));
        assert_eq!(read_switch("False"), Some(false));
        assert_eq!(read_switch("0"), Some(false));
        assert_eq!(read_switch("sometimes"), None);
    }

    #[test]
    fn from_env_reads_overrides_and_ignores_garbage() {
        let mut env = ScopedEnv::lock();
        env.set(ENV_WINDOW_SIZE, "8")
            .set(ENV_MAX_LOADED_WINDOWS, "0")
            .set(ENV_UNDO_LIMIT, "not-a-number")
            .remove(ENV_UNDO_MAX_BYTES)
            .set(ENV_COALESCE_TYPING, "off");

        let config = Config::from_env();
        assert_eq!(config.cache.window_size, 8);
        assert_eq!(config.cache.maximum_loaded_windows, DEFAULT_MAX_LOADED_WINDOWS);
        assert_eq!(config.history.max_commands, DEFAULT_UNDO_LIMIT);
        assert_eq!(config.history.max_bytes, DEFAULT_UNDO_MAX_BYTES);
        assert!(!config.history.coalesce_typing);
    }

    #[test]
    fn cache_config_rejects_zero_sizes() {
        assert!(CacheConfig::new(0, 4).is_err());
        assert!(CacheConfig::new(4, 0).is_err());
        assert_eq!(
            CacheConfig::new(4, 2).expect("config"),
            CacheConfig {
                window_size: 4,
                maximum_loaded_windows: 2
            }
        );
    }
}
