use std::path::{Path, PathBuf};

/// Application directory name under the platform config/data roots.
const APP_DIR: &str = "credentials-timeline";

/// Environment override for the config directory.
pub const CONFIG_DIR_ENV: &str = "CREDENTIALS_TIMELINE_CONFIG_DIR";

/// Where to look for the settings file and where to put the log file.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI arg → ENV var → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Path of a configuration file.
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. CREDENTIALS_TIMELINE_CONFIG_DIR environment variable
/// 3. Current directory IF the file exists there
/// 4. Platform config directory from dirs-next
///
/// Platform paths:
/// - Linux: ~/.config/credentials-timeline/{name}
/// - macOS: ~/Library/Application Support/credentials-timeline/{name}
/// - Windows: %APPDATA%\credentials-timeline\{name}
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve(name, config, dirs_next::config_dir())
}

/// Path of a data file (logs). Same priority as [`config_file`], rooted at
/// the platform data directory.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve(name, config, dirs_next::data_dir())
}

fn resolve(name: &str, config: &PathConfig, platform_root: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.join(name);
    }

    if let Ok(current_dir) = std::env::current_dir() {
        if has_local_file(&current_dir, name) {
            return current_dir.join(name);
        }
    }

    if let Some(dir) = platform_root {
        return dir.join(APP_DIR).join(name);
    }

    PathBuf::from(".").join(name)
}

fn has_local_file(dir: &Path, name: &str) -> bool {
    dir.join(name).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_with_custom_dir() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };

        let path = config_file("test.json", &config);
        assert_eq!(path, PathBuf::from("/custom/test.json"));
    }

    #[test]
    fn test_data_file_with_custom_dir() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };

        let path = data_file("timeline.log", &config);
        assert_eq!(path, PathBuf::from("/custom/timeline.log"));
    }

    #[test]
    fn test_cli_dir_wins_over_env() {
        let config = PathConfig::from_env_and_cli(Some(PathBuf::from("/from-cli")));
        assert_eq!(config.config_dir, Some(PathBuf::from("/from-cli")));
    }

    #[test]
    fn test_platform_default_names_app_dir() {
        let config = PathConfig { config_dir: None };

        // A file name nobody keeps in the working directory
        let path = config_file("no-such-local-file-7f3a.json", &config);
        assert!(path.to_string_lossy().contains("no-such-local-file-7f3a.json"));
        if dirs_next::config_dir().is_some() {
            assert!(path.to_string_lossy().contains(APP_DIR));
        }
    }
}
