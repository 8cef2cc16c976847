use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use validator::ValidateUrl;

use crate::error::AppError;

/// Configuration file, resolved against the current working directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Top-level configuration file contents.
///
/// Every field is optional at parse time; requiredness is enforced by the
/// settings resolver and per-command validation so the error taxonomy stays
/// in one place.
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub pull_request: PullRequestConfig,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// `git` section: remote server coordinates and branch/remote defaults
#[derive(Deserialize, Debug, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub main_branch: String,
    #[serde(default)]
    pub remote_name: String,
    #[serde(default)]
    pub repository_id: String,
}

/// `pull_request` section: user names to resolve into merge-request roles
#[derive(Deserialize, Debug, Default)]
pub struct PullRequestConfig {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub reviewers: Vec<String>,
}

/// One entry of the `projects` section; the map key is the project id
#[derive(Deserialize, Debug)]
pub struct ProjectConfig {
    pub path: String,
}

impl Config {
    /// Loads and parses the configuration file.
    ///
    /// This is a distinct fallible stage: any error here is fatal, since no
    /// run is possible without valid configuration. The caller prints the
    /// error and exits before any workflow object is constructed.
    pub fn load(path: &Path) -> Result<Config, AppError> {
        let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config =
            serde_yaml::from_str(&raw).map_err(|source| AppError::ConfigParse {
                path: path.display().to_string(),
                source,
            })?;

        if !config.git.server.is_empty() && !config.git.server.validate_url() {
            return Err(AppError::InvalidServerUrl(config.git.server.clone()));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn parses_full_config() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(
            &dir,
            "git:\n\
             \x20 enable: true\n\
             \x20 server: \"https://gitlab.example.com\"\n\
             \x20 token: \"secret\"\n\
             \x20 main_branch: \"main\"\n\
             \x20 remote_name: \"origin\"\n\
             \x20 repository_id: \"platform\"\n\
             pull_request:\n\
             \x20 authors: [\"alice\"]\n\
             \x20 reviewers: [\"bob\", \"carol\"]\n\
             projects:\n\
             \x20 backend:\n\
             \x20   path: /tmp/backend\n",
        );

        let config = Config::load(&path).expect("load config");
        assert!(config.git.enable);
        assert_eq!(config.git.main_branch, "main");
        assert_eq!(config.pull_request.authors, vec!["alice".to_string()]);
        assert_eq!(config.projects["backend"].path, "/tmp/backend");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "git:\n  main_branch: main\n");

        let config = Config::load(&path).expect("load config");
        assert!(!config.git.enable);
        assert!(config.pull_request.reviewers.is_empty());
        assert!(config.projects.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let result = Config::load(&dir.path().join(CONFIG_FILE_NAME));
        assert!(matches!(result, Err(AppError::ConfigRead { .. })));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "git: [not, a, mapping\n");
        let result = Config::load(&path);
        assert!(matches!(result, Err(AppError::ConfigParse { .. })));
    }

    #[test]
    fn rejects_invalid_server_url() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "git:\n  server: \"not a url\"\n");
        let result = Config::load(&path);
        assert!(matches!(result, Err(AppError::InvalidServerUrl(url)) if url == "not a url"));
    }
}
