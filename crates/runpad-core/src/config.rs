//! Editor and runner configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the code to convert these
//! structs to and from TOML. `#[serde(default)]` uses `Default::default()`
//! for missing fields, so a config file only needs the keys it changes:
//!
//! ```toml
//! [runner]
//! interpreter = "/usr/local/bin/python3.12"
//!
//! [prompt]
//! markers = ["input", "enter"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How scripts are launched
    pub runner: RunnerConfig,

    /// How interactive input prompts are recognised
    pub prompt: PromptConfig,

    /// Output pane behavior
    pub output: OutputConfig,

    /// Window and font settings
    pub ui: UiConfig,

    /// File dialog settings
    pub files: FileConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("runpad").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Where the child process starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingDir {
    /// The directory containing the script, so relative paths resolve
    /// the way they would from a shell in that folder
    #[default]
    Script,
    /// Whatever directory the editor was started from
    Inherit,
}

/// Script launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interpreter program
    pub interpreter: String,

    /// Arguments placed before the script path
    pub args: Vec<String>,

    /// Working directory policy
    pub working_dir: WorkingDir,

    /// Extra environment variables for the child
    pub env: BTreeMap<String, String>,

    /// Capacity of the event channel between readers and the UI
    pub event_capacity: usize,

    /// How long a pipe may stay silent after the child exits before it is
    /// abandoned (ms)
    pub drain_timeout_ms: u64,

    /// Save the document before running it
    pub save_before_run: bool,
}

impl RunnerConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let interpreter = if cfg!(windows) { "python" } else { "python3" };
        Self {
            interpreter: interpreter.to_string(),
            // Unbuffered, otherwise prompts sit in the child's stdio buffer
            args: vec!["-u".to_string()],
            working_dir: WorkingDir::default(),
            env: BTreeMap::new(),
            event_capacity: 256,
            drain_timeout_ms: 2000,
            save_before_run: true,
        }
    }
}

/// Input prompt detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Quiet period after an unterminated fragment before it counts (ms)
    pub idle_ms: u64,

    /// Treat a fragment left hanging for `idle_ms` as a prompt
    pub idle_prompt: bool,

    /// Treat complete lines ending in ':' that mention a marker as prompts
    pub line_heuristic: bool,

    /// Lowercase words the line heuristic looks for
    pub markers: Vec<String>,
}

impl PromptConfig {
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    /// A config that never reports prompts, used for stderr.
    pub fn disabled() -> Self {
        Self {
            idle_prompt: false,
            line_heuristic: false,
            ..Self::default()
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            idle_ms: 150,
            idle_prompt: true,
            line_heuristic: true,
            markers: vec!["input".to_string()],
        }
    }
}

/// Output pane configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Lines kept in the output pane before the oldest are dropped
    pub max_lines: usize,

    /// Print start/finish banners around each run
    pub show_banners: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_lines: 5000,
            show_banners: true,
        }
    }
}

/// UI appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Font size in points
    pub font_size: f32,

    /// Initial window width
    pub window_width: f32,

    /// Initial window height
    pub window_height: f32,

    /// Share of the vertical space given to the editor pane (0.2 - 0.9)
    pub editor_ratio: f32,
}

impl UiConfig {
    /// Editor/output split as fill portions, clamped to a usable range.
    pub fn split_portions(&self) -> (u16, u16) {
        let ratio = self.editor_ratio.clamp(0.2, 0.9);
        let editor = (ratio * 100.0).round() as u16;
        (editor, 100 - editor)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            window_width: 1000.0,
            window_height: 600.0,
            editor_ratio: 0.65,
        }
    }
}

/// A named group of extensions for the open/save dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// File handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Dialog filters, in display order
    pub filters: Vec<FileFilter>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            filters: vec![
                FileFilter::new("Python Files", &["py"]),
                FileFilter::new("Text Files", &["txt"]),
                FileFilter::new("All Files", &["*"]),
            ],
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.runner.args, vec!["-u"]);
        assert!(config.runner.save_before_run);
        assert_eq!(config.prompt.markers, vec!["input"]);
        assert_eq!(config.output.max_lines, 5000);
        assert_eq!(config.files.filters.len(), 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [runner]
            interpreter = "python3.12"
            working_dir = "inherit"

            [prompt]
            idle_ms = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.runner.interpreter, "python3.12");
        assert_eq!(config.runner.working_dir, WorkingDir::Inherit);
        assert_eq!(config.runner.args, vec!["-u"]);
        assert_eq!(config.prompt.idle(), Duration::from_millis(400));
        assert!(config.prompt.line_heuristic);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.runner.env.insert("PYTHONIOENCODING".into(), "utf-8".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.runner.env.get("PYTHONIOENCODING").unwrap(), "utf-8");
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runner\ninterpreter = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_split_portions_clamped() {
        let mut ui = UiConfig::default();
        assert_eq!(ui.split_portions(), (65, 35));
        ui.editor_ratio = 5.0;
        assert_eq!(ui.split_portions(), (90, 10));
    }

    #[test]
    fn test_stderr_prompt_config_is_disabled() {
        let config = PromptConfig::disabled();
        assert!(!config.idle_prompt);
        assert!(!config.line_heuristic);
    }
}
