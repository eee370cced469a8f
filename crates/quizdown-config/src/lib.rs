use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_STATE_DIR: &str = "~/.local/state/quizdown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from `~/.config/quizdown/config.toml`. Every key is
/// optional; quiz settings left out fall back to the engine defaults.
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub expiry_in_days: Option<i64>,
    #[serde(default)]
    pub submission_id: Option<String>,
    /// Where answer state and the log file live.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Host data echoed back in every submission.
    #[serde(default)]
    pub state: Option<toml::Table>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the state directory
        config.state_dir = config
            .state_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/quizdown");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The configured state directory, or `~/.local/state/quizdown`.
    pub fn state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from(shellexpand::tilde(DEFAULT_STATE_DIR).as_ref()),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/quizdown/config.toml"));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_state_dir_is_expanded() {
        let state_dir = Config::default().state_dir();
        let path_str = state_dir.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".local/state/quizdown"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("QUIZDOWN_TEST_VAR", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$QUIZDOWN_TEST_VAR/subdir")).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("QUIZDOWN_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_leaves_plain_paths_alone() {
        assert_eq!(
            Config::expand_path(Path::new("/absolute/path")).unwrap(),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            Config::expand_path(Path::new("relative/path")).unwrap(),
            PathBuf::from("relative/path")
        );
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "debug = maybe").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { config_path, .. }) if config_path == config_file
        ));
    }

    #[test]
    fn test_load_reads_quiz_settings_and_state_table() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            r#"
source = "https://example.com/questions.xml"
debug = true
expiry_in_days = 14
state_dir = "~/quiz-state"

[state]
cohort = "spring"
seat = 12
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.source.as_deref(), Some("https://example.com/questions.xml"));
        assert_eq!(config.debug, Some(true));
        assert_eq!(config.expiry_in_days, Some(14));
        assert_eq!(config.submission_id, None);

        let state_dir = config.state_dir();
        assert!(!state_dir.to_string_lossy().starts_with('~'));
        assert!(state_dir.ends_with("quiz-state"));

        let state = config.state.unwrap();
        assert_eq!(state["cohort"].as_str(), Some("spring"));
        assert_eq!(state["seat"].as_integer(), Some(12));
    }

    #[test]
    fn test_absolute_state_dir_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "state_dir = \"/var/lib/quizdown\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.state_dir(), PathBuf::from("/var/lib/quizdown"));
        assert_eq!(config.state, None);
    }
}
