//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/jmxplan/jmxplan.toml`
//! 3. Local config: `<project_dir>/.jmxplan.toml`
//! 4. Environment variables: `JMXPLAN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::jmx::{
    RenderOptions, DEFAULT_INDENT, DEFAULT_JMETER_VERSION, DEFAULT_PROPERTIES_VERSION,
};
use crate::application::ApplicationError;

/// Largest accepted indentation width.
const MAX_INDENT: usize = 16;

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub jmeter_version: Option<String>,
    pub properties_version: Option<String>,
    pub indent: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Unified configuration for jmxplan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JMeter version written into the plan header
    pub jmeter_version: String,
    /// Property-file version written into the plan header
    pub properties_version: String,
    /// Spaces per nesting level in emitted XML
    pub indent: usize,
    /// Directory for generated plans when no output path is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jmeter_version: DEFAULT_JMETER_VERSION.to_string(),
            properties_version: DEFAULT_PROPERTIES_VERSION.to_string(),
            indent: DEFAULT_INDENT,
            output_dir: None,
        }
    }
}

/// Get the XDG config directory for jmxplan.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jmxplan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("jmxplan.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".jmxplan.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Header and layout options for the JMX renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            jmeter_version: self.jmeter_version.clone(),
            properties_version: self.properties_version.clone(),
            indent: self.indent,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.output_dir {
            let expanded = expand_env_vars(dir.to_string_lossy().as_ref());
            self.output_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            jmeter_version: overlay
                .jmeter_version
                .clone()
                .unwrap_or_else(|| self.jmeter_version.clone()),
            properties_version: overlay
                .properties_version
                .clone()
                .unwrap_or_else(|| self.properties_version.clone()),
            indent: overlay.indent.unwrap_or(self.indent),
            output_dir: overlay
                .output_dir
                .clone()
                .or_else(|| self.output_dir.clone()),
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.jmeter_version.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "jmeter_version must not be empty".to_string(),
            });
        }
        if self.indent > MAX_INDENT {
            return Err(ApplicationError::Config {
                message: format!("indent {} exceeds maximum of {}", self.indent, MAX_INDENT),
            });
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/jmxplan/jmxplan.toml`
    /// 3. Local config: `<project_dir>/.jmxplan.toml`
    /// 4. Environment variables: `JMXPLAN_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply JMXPLAN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing; JMXPLAN_JMETER_VERSION -> jmeter_version
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("JMXPLAN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("jmeter_version") {
            settings.jmeter_version = val;
        }
        if let Ok(val) = config.get_string("properties_version") {
            settings.properties_version = val;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val.trim().parse().map_err(|_| ApplicationError::Config {
                message: format!("JMXPLAN_INDENT is not a non-negative number: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# jmxplan configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/jmxplan/jmxplan.toml
#   Local:  <project_dir>/.jmxplan.toml
#   Env:    JMXPLAN_* environment variables (explicit overrides)

# JMeter version written into the plan header
# jmeter_version = "{}"

# Property-file version written into the plan header
# properties_version = "{}"

# Spaces per nesting level in the generated XML
# indent = {}

# Directory for generated plans when `build` gets no --output
# output_dir = "~/jmeter/plans"
"#,
            DEFAULT_JMETER_VERSION, DEFAULT_PROPERTIES_VERSION, DEFAULT_INDENT
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(!settings.jmeter_version.is_empty());
        assert!(settings.indent <= MAX_INDENT);
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            output_dir: Some(PathBuf::from("~/plans")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.output_dir.unwrap();
        assert!(
            dir.to_string_lossy().starts_with(&home),
            "output_dir should start with home dir: {}",
            dir.display()
        );
    }

    #[test]
    fn given_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            indent: Some(4),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.indent, 4);
        assert_eq!(merged.jmeter_version, DEFAULT_JMETER_VERSION);
        assert_eq!(merged.output_dir, None);
    }

    #[test]
    fn given_huge_indent_when_validating_then_config_error() {
        let settings = Settings {
            indent: 64,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.jmeter_version.is_none());
    }
}
