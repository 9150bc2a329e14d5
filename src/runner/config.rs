//! Runtime configuration and its file format.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Default limit on nested evaluations.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Invalid { line: usize, message: String },
}

/// Limits applied by a `Runtime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum number of nested evaluations. None means unlimited.
    pub max_depth: Option<usize>,
}

impl RuntimeConfig {
    pub fn unlimited() -> Self {
        RuntimeConfig { max_depth: None }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        RuntimeConfig {
            max_depth: Some(max_depth),
        }
    }

    /// Load configuration from a TOML-style file.
    ///
    /// Expected format:
    /// ```toml
    /// [runtime]
    /// max_depth = 5000        # or "unlimited"
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string. Unknown sections are ignored so a
    /// project file can carry settings for other tools.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = RuntimeConfig::default();
        let mut current_section = String::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            if current_section != "runtime" {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => {
                    return Err(ConfigError::Invalid {
                        line: index + 1,
                        message: format!("expected `key = value`, got `{}`", line),
                    })
                }
            };

            match key {
                "max_depth" => config.max_depth = parse_limit(value, index + 1)?,
                _ => {
                    return Err(ConfigError::Invalid {
                        line: index + 1,
                        message: format!("unknown runtime setting `{}`", key),
                    })
                }
            }
        }

        Ok(config)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_limit(value: &str, line: usize) -> Result<Option<usize>, ConfigError> {
    let value = value.trim_matches('"');
    if value == "unlimited" {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid {
            line,
            message: format!("expected a positive integer or \"unlimited\", got `{}`", value),
        })
}
