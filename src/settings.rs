use std::collections::BTreeMap;
use std::fs;
use std::path::MAIN_SEPARATOR;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::AppError;
use crate::identity::GitUser;

/// One configured checkout of the project set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    /// Local path, normalized to end with exactly one separator
    pub path: String,
}

/// Workflow selected on the command line.
///
/// Unknown names are rejected here, where the variant is constructed; the
/// dispatcher match over this enum is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    NewTask,
    NewTag,
    NewMergeRequest,
}

impl CommandKind {
    pub fn parse(name: &str) -> Result<CommandKind, AppError> {
        match name {
            "new-task" => Ok(CommandKind::NewTask),
            "new-tag" => Ok(CommandKind::NewTag),
            "new-merge-request" => Ok(CommandKind::NewMergeRequest),
            other => Err(AppError::InvalidCommand(other.to_string())),
        }
    }
}

/// Run configuration, merged from the config file and command line.
///
/// Built once per invocation; commands only read it.
#[derive(Debug)]
pub struct Settings {
    pub projects: BTreeMap<String, Project>,
    pub command: CommandKind,
    /// Target project ids in the order the operator gave them; duplicates
    /// simply re-execute
    pub targets: Vec<String>,
    pub branch: Option<String>,
    pub task_title: Option<String>,
    pub git_users: Vec<GitUser>,
}

impl Settings {
    /// Resolves and validates the run configuration.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Settings, AppError> {
        let command_name = cli.command.as_deref().ok_or(AppError::NotEnoughArguments)?;
        let project_ids = cli
            .project_ids
            .as_deref()
            .ok_or(AppError::NotEnoughArguments)?;

        let command = CommandKind::parse(command_name)?;

        let targets: Vec<String> = project_ids
            .split(',')
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if targets.is_empty() {
            return Err(AppError::EmptyProjects);
        }

        let mut projects = BTreeMap::new();
        for (id, entry) in &config.projects {
            if id.is_empty() {
                return Err(AppError::EmptyProjectId);
            }

            let metadata = fs::metadata(&entry.path)
                .map_err(|_| AppError::ProjectPathNotExist(entry.path.clone()))?;
            if !metadata.is_dir() {
                return Err(AppError::ProjectPathNotDirectory(entry.path.clone()));
            }

            projects.insert(
                id.clone(),
                Project {
                    id: id.clone(),
                    path: normalize_path(&entry.path),
                },
            );
        }

        for target in &targets {
            if !projects.contains_key(target) {
                return Err(AppError::ProjectIdNotExist(target.clone()));
            }
        }

        if config.git.main_branch.is_empty() {
            return Err(AppError::EmptyGitSourceBranch);
        }

        Ok(Settings {
            projects,
            command,
            targets,
            branch: cli.branch.clone(),
            task_title: cli.title.clone(),
            git_users: Vec::new(),
        })
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }
}

/// Strips trailing separators and re-appends exactly one, so downstream
/// path concatenation is unambiguous.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches(MAIN_SEPARATOR);
    format!("{trimmed}{MAIN_SEPARATOR}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(command: &str, project_ids: &str) -> Cli {
        Cli {
            command: Some(command.to_string()),
            project_ids: Some(project_ids.to_string()),
            branch: None,
            title: None,
        }
    }

    fn config_with_project(id: &str, path: &str) -> Config {
        let mut config = Config::default();
        config.git.main_branch = "main".to_string();
        config.projects.insert(
            id.to_string(),
            ProjectConfig {
                path: path.to_string(),
            },
        );
        config
    }

    #[test]
    fn resolves_targets_in_given_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().to_str().expect("utf8 path");
        let mut config = config_with_project("backend", path);
        config.projects.insert(
            "frontend".to_string(),
            ProjectConfig {
                path: path.to_string(),
            },
        );

        let settings = Settings::resolve(&cli("new-task", "frontend,backend,frontend"), &config)
            .expect("resolve");
        assert_eq!(settings.targets, vec!["frontend", "backend", "frontend"]);
        assert_eq!(settings.command, CommandKind::NewTask);
    }

    #[test]
    fn normalizes_project_path_to_one_trailing_separator() {
        let dir = TempDir::new().expect("tempdir");
        let raw = format!("{}{}{}", dir.path().display(), MAIN_SEPARATOR, MAIN_SEPARATOR);
        let config = config_with_project("backend", &raw);

        let settings = Settings::resolve(&cli("new-task", "backend"), &config).expect("resolve");
        let normalized = &settings.project("backend").expect("project").path;
        assert!(normalized.ends_with(MAIN_SEPARATOR));
        assert!(!normalized.ends_with(&format!("{MAIN_SEPARATOR}{MAIN_SEPARATOR}")));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        let config = Config::default();
        let bare = Cli {
            command: Some("new-task".to_string()),
            project_ids: None,
            branch: None,
            title: None,
        };
        let result = Settings::resolve(&bare, &config);
        assert!(matches!(result, Err(AppError::NotEnoughArguments)));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let config = Config::default();
        let result = Settings::resolve(&cli("release", "backend"), &config);
        assert!(matches!(result, Err(AppError::InvalidCommand(name)) if name == "release"));
    }

    #[test]
    fn empty_project_list_is_rejected() {
        let config = Config::default();
        let result = Settings::resolve(&cli("new-task", ""), &config);
        assert!(matches!(result, Err(AppError::EmptyProjects)));
    }

    #[test]
    fn nonexistent_project_path_is_rejected() {
        let config = config_with_project("backend", "/definitely/not/here");
        let result = Settings::resolve(&cli("new-task", "backend"), &config);
        assert!(matches!(result, Err(AppError::ProjectPathNotExist(_))));
    }

    #[test]
    fn file_project_path_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("checkout");
        fs::write(&file, "").expect("write file");
        let config = config_with_project("backend", file.to_str().expect("utf8 path"));

        let result = Settings::resolve(&cli("new-task", "backend"), &config);
        assert!(matches!(result, Err(AppError::ProjectPathNotDirectory(_))));
    }

    #[test]
    fn unknown_target_id_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let config = config_with_project("backend", dir.path().to_str().expect("utf8 path"));

        let result = Settings::resolve(&cli("new-task", "backend,api"), &config);
        assert!(matches!(result, Err(AppError::ProjectIdNotExist(id)) if id == "api"));
    }

    #[test]
    fn empty_main_branch_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let mut config = config_with_project("backend", dir.path().to_str().expect("utf8 path"));
        config.git.main_branch = String::new();

        let result = Settings::resolve(&cli("new-task", "backend"), &config);
        assert!(matches!(result, Err(AppError::EmptyGitSourceBranch)));
    }
}
