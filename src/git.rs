use std::process::{Command, Output};

use crate::error::AppError;

/// Runs a git subcommand in the current working directory.
///
/// Stdout and stderr are captured and combined; a non-zero exit status is
/// reported as an error carrying that combined output.
pub fn run_git(args: &[&str]) -> Result<String, AppError> {
    let git_command_output: Output = Command::new("git").args(args).output()?;

    let mut combined = String::from_utf8_lossy(&git_command_output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&git_command_output.stderr));

    if !git_command_output.status.success() {
        return Err(AppError::GitCommand {
            args: args.join(" "),
            output: combined.trim().to_string(),
        });
    }

    Ok(combined)
}

/// Checks out an existing branch
pub fn checkout(branch: &str) -> Result<String, AppError> {
    run_git(&["checkout", branch])
}

/// Creates and checks out a new branch
pub fn checkout_new(branch: &str) -> Result<String, AppError> {
    run_git(&["checkout", "-b", branch])
}

/// Refreshes remote refs
pub fn remote_update() -> Result<String, AppError> {
    run_git(&["remote", "update"])
}

pub fn pull() -> Result<String, AppError> {
    run_git(&["pull"])
}

/// Lists tags in ascending version order
pub fn list_tags() -> Result<String, AppError> {
    run_git(&["tag", "-l", "--sort=v:refname"])
}

pub fn create_tag(name: &str) -> Result<String, AppError> {
    run_git(&["tag", name])
}

/// Pushes a branch or tag to the named remote
pub fn push(remote: &str, reference: &str) -> Result<String, AppError> {
    run_git(&["push", remote, reference])
}
