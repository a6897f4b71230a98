//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use poms_extractor::ExtractorConfig;
use poms_llm::openai::{DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available model profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// File this configuration was loaded from
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// A model service the CLI can talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    /// Model name sent with each request
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".poms").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self {
                source: Some(path.to_path_buf()),
                ..Self::default()
            })
        }
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.source = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Check the active profile exists and the extractor settings are usable.
    pub fn validate(&self) -> Result<()> {
        self.get_active_profile()?;
        self.extractor.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.source {
            Some(path) => path.clone(),
            None => Self::path()?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Profile names in alphabetical order.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        );
        profiles.insert(
            "local".to_string(),
            Profile {
                endpoint: "http://localhost:11434/v1".to_string(),
                model: "llama3.1".to_string(),
                api_key_env: "LOCAL_LLM_API_KEY".to_string(),
                timeout_secs: 120,
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            extractor: ExtractorConfig::default(),
            source: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert_eq!(config.profile_names(), vec!["default", "local"]);
        assert!(config.settings.color);
        assert!(config.validate().is_ok());

        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.api_key_env, "OPENAI_API_KEY");
        assert_eq!(profile.timeout_secs, 60);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            endpoint: "http://example.com/v1".to_string(),
            model: "test-model".to_string(),
            api_key_env: "TEST_KEY".to_string(),
            timeout_secs: 5,
        };

        config.set_profile("test".to_string(), profile.clone());
        config.switch_profile("test".to_string()).unwrap();
        assert_eq!(config.active_profile, "test");
        assert_eq!(config.get_active_profile().unwrap(), &profile);
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(matches!(result, Err(CliError::Config(_))));
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_or_default(&path).unwrap();
        config.switch_profile("local".to_string()).unwrap();
        config.extractor.include_examples = false;
        config.settings.format = OutputFormat::Json;
        config.save().unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.active_profile, "local");
        assert!(!reloaded.extractor.include_examples);
        assert_eq!(reloaded.settings.format, OutputFormat::Json);
        assert_eq!(reloaded.profiles.len(), 2);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
active_profile = "work"

[profiles.work]
endpoint = "https://llm.internal/v1"
model = "gpt-4o"

[extractor]
max_query_length = 500
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.api_key_env, "OPENAI_API_KEY");
        assert_eq!(profile.timeout_secs, 60);
        assert_eq!(config.extractor.max_query_length, 500);
        assert!(config.extractor.include_examples);
        assert_eq!(config.settings.history_size, 1000);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "active_profile = [").unwrap();
        assert!(matches!(Config::from_file(&path), Err(CliError::Toml(_))));

        fs::write(&path, "active_profile = \"missing\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(CliError::Config(_))));

        fs::write(
            &path,
            "[profiles.default]\nendpoint = \"x\"\nmodel = \"y\"\n\n[extractor]\nmax_query_length = 0\n",
        )
        .unwrap();
        assert!(matches!(Config::from_file(&path), Err(CliError::Config(_))));
    }
}
