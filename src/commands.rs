use colored::Colorize;
use inquire::Text;

use crate::config::Config;
use crate::error::AppError;
use crate::git;
use crate::gitlab::{GitLabClient, MergeRequestParams};
use crate::identity::Role;
use crate::settings::{CommandKind, Settings};
use crate::version;

/// Runs the selected workflow once per target project, in the order the
/// operator gave them. The first failing project stops the run; completed
/// projects are not rolled back.
pub fn run(
    settings: &Settings,
    config: &Config,
    client: Option<&GitLabClient>,
) -> Result<(), AppError> {
    for id in &settings.targets {
        println!("{} '{}'", "running command in project".blue(), id);

        settings
            .command
            .validate(settings, config)
            .and_then(|()| settings.command.execute(id, settings, config, client))
            .map_err(|source| AppError::Project {
                id: id.clone(),
                source: Box::new(source),
            })?;

        println!("{} '{}'", "command finished in project".green(), id);
    }

    Ok(())
}

impl CommandKind {
    /// Checks the command's own preconditions before any external side
    /// effect.
    pub fn validate(self, settings: &Settings, config: &Config) -> Result<(), AppError> {
        match self {
            CommandKind::NewTask => {
                require_branch(settings)?;
                require_remote_name(config)?;
            }
            CommandKind::NewTag => {
                require_repository_id(config)?;
            }
            CommandKind::NewMergeRequest => {
                require_branch(settings)?;
                require_task_title(settings)?;
                require_repository_id(config)?;
                if !config.git.enable {
                    return Err(AppError::GitDisabled);
                }
            }
        }

        Ok(())
    }

    pub fn execute(
        self,
        project_id: &str,
        settings: &Settings,
        config: &Config,
        client: Option<&GitLabClient>,
    ) -> Result<(), AppError> {
        match self {
            CommandKind::NewTask => new_task(project_id, settings, config),
            CommandKind::NewTag => new_tag(project_id, settings, config),
            CommandKind::NewMergeRequest => new_merge_request(project_id, settings, config, client),
        }
    }
}

/// Creates a task branch off the main branch and pushes it.
fn new_task(project_id: &str, settings: &Settings, config: &Config) -> Result<(), AppError> {
    let branch = require_branch(settings)?;
    enter_project(settings, project_id)?;

    step(project_id, &format!("checkout '{}'", config.git.main_branch));
    git::checkout(&config.git.main_branch)?;

    step(project_id, "remote update");
    git::remote_update()?;

    step(project_id, &format!("create branch '{branch}'"));
    git::checkout_new(branch)?;

    step(
        project_id,
        &format!("push branch '{branch}' to '{}'", config.git.remote_name),
    );
    git::push(&config.git.remote_name, branch)?;

    Ok(())
}

/// Derives the next version tag from the branch's tag list, confirms it
/// with the operator, then creates and pushes it.
fn new_tag(project_id: &str, settings: &Settings, config: &Config) -> Result<(), AppError> {
    enter_project(settings, project_id)?;

    step(project_id, &format!("checkout '{}'", config.git.main_branch));
    git::checkout(&config.git.main_branch)?;

    step(project_id, "remote update");
    git::remote_update()?;

    step(project_id, "pull");
    git::pull()?;

    step(project_id, "list tags");
    let tag_list = git::list_tags()?;
    let derivation = version::derive_next_tag(&tag_list)?;
    step(project_id, &format!("latest tag is '{}'", derivation.latest));

    let tag = confirm_tag(&derivation.next)?;

    step(project_id, &format!("create tag '{tag}'"));
    git::create_tag(&tag)?;

    step(
        project_id,
        &format!("push tag '{tag}' to '{}'", config.git.remote_name),
    );
    git::push(&config.git.remote_name, &tag)?;

    Ok(())
}

/// Opens a merge request for the task branch against the main branch.
fn new_merge_request(
    project_id: &str,
    settings: &Settings,
    config: &Config,
    client: Option<&GitLabClient>,
) -> Result<(), AppError> {
    let branch = require_branch(settings)?;
    let title = require_task_title(settings)?;
    let client = client.ok_or(AppError::GitDisabled)?;

    let mut reviewer_ids = Vec::new();
    let mut assignee_ids = Vec::new();
    for user in &settings.git_users {
        match user.role {
            Role::Reviewer => reviewer_ids.push(user.id),
            Role::Author => assignee_ids.push(user.id),
        }
    }

    let project_path = format!("{}/{}", config.git.repository_id, project_id);
    let params = MergeRequestParams {
        source_branch: branch,
        target_branch: &config.git.main_branch,
        title,
        description: "",
        remove_source_branch: true,
        reviewer_ids,
        assignee_ids,
    };

    step(
        project_id,
        &format!("create merge request '{branch}' -> '{}'", config.git.main_branch),
    );
    let created = client.create_merge_request(&project_path, &params)?;

    println!(
        "{} {}",
        "merge request url:".green(),
        client.merge_request_url(&project_path, created.iid)
    );

    Ok(())
}

/// Prints a per-project step announcement.
fn step(project_id: &str, message: &str) {
    println!("{} '{}': {}", "step".blue(), project_id, message);
}

/// Changes the process working directory to the project's checkout. The
/// directory stays changed after the command finishes.
fn enter_project(settings: &Settings, project_id: &str) -> Result<(), AppError> {
    let project = settings
        .project(project_id)
        .ok_or_else(|| AppError::ProjectIdNotExist(project_id.to_string()))?;
    step(&project.id, &format!("enter '{}'", project.path));
    std::env::set_current_dir(&project.path)?;
    Ok(())
}

/// Asks the operator about the derived tag. An empty or affirmative answer
/// keeps the derived name, a negative answer aborts, and any other input is
/// used verbatim as the tag name.
fn confirm_tag(derived: &str) -> Result<String, AppError> {
    let answer: String = Text::new(&format!("create tag '{derived}'? (Y/n or a tag name)"))
        .prompt()?;

    let trimmed = answer.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "y" | "yes" => Ok(derived.to_string()),
        "n" | "no" => Err(AppError::TagCreationRejected),
        _ => Ok(trimmed.to_string()),
    }
}

fn require_branch(settings: &Settings) -> Result<&str, AppError> {
    settings
        .branch
        .as_deref()
        .filter(|branch| !branch.is_empty())
        .ok_or(AppError::EmptyBranch)
}

fn require_task_title(settings: &Settings) -> Result<&str, AppError> {
    settings
        .task_title
        .as_deref()
        .filter(|title| !title.is_empty())
        .ok_or(AppError::EmptyTaskTitle)
}

fn require_repository_id(config: &Config) -> Result<(), AppError> {
    if config.git.repository_id.is_empty() {
        return Err(AppError::EmptyGitRepositoryId);
    }
    Ok(())
}

fn require_remote_name(config: &Config) -> Result<(), AppError> {
    if config.git.remote_name.is_empty() {
        return Err(AppError::EmptyGitRemoteName);
    }
    Ok(())
}
