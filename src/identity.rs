use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::gitlab::GitLabClient;

/// Identity cache file, resolved against the current working directory
pub const CACHE_FILE_NAME: &str = "gitreviewusers.json";

/// Role a resolved user plays on created merge requests
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Author,
    Reviewer,
}

/// A remote git user identity, as persisted in the cache file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GitUser {
    /// Remote-assigned numeric id
    pub id: i64,
    /// Username, the lookup key
    pub username: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// Resolves the remote identities for every configured author and reviewer
/// name, using the cache file to avoid repeated remote lookups.
///
/// Any required name missing from the cache triggers a full refresh: every
/// name is re-fetched and the cache file is overwritten with the complete
/// fresh list. A single name without an exact match on the server aborts
/// the whole resolution; nothing is written in that case.
pub fn resolve_git_users(
    config: &Config,
    client: Option<&GitLabClient>,
    cache_path: &Path,
) -> Result<Vec<GitUser>, AppError> {
    let required = required_names(config);
    if required.is_empty() {
        return Ok(Vec::new());
    }

    let names: Vec<String> = required.iter().map(|(name, _)| name.clone()).collect();
    let mut users = load_cached_users(cache_path);

    if is_all_users_found(&users, &names) {
        tag_roles(&mut users, &required);
    } else {
        let client = client.ok_or(AppError::GitDisabled)?;
        users = fetch_users(config, client, &required)?;
        save_cached_users(cache_path, &users)?;
    }

    if !users.iter().any(|user| user.role == Role::Author) {
        return Err(AppError::EmptyAuthors);
    }
    if !users.iter().any(|user| user.role == Role::Reviewer) {
        return Err(AppError::EmptyReviewers);
    }

    Ok(users)
}

/// Union of the configured author and reviewer names, paired with the role
/// each resolves to. Authors come first, so a name present in both lists is
/// only ever tagged author.
fn required_names(config: &Config) -> Vec<(String, Role)> {
    let mut names: Vec<(String, Role)> = Vec::new();
    let configured = config
        .pull_request
        .authors
        .iter()
        .map(|name| (name, Role::Author))
        .chain(
            config
                .pull_request
                .reviewers
                .iter()
                .map(|name| (name, Role::Reviewer)),
        );

    for (name, role) in configured {
        if !names.iter().any(|(existing, _)| existing == name) {
            names.push((name.clone(), role));
        }
    }

    names
}

/// True iff every required name has an exact username match in the cached
/// list. An empty cache never satisfies anything.
pub fn is_all_users_found(users: &[GitUser], required: &[String]) -> bool {
    if users.is_empty() {
        return false;
    }

    required
        .iter()
        .all(|name| users.iter().any(|user| &user.username == name))
}

/// Re-applies configured roles to cached entries; entries no longer in
/// either name list keep their persisted role.
fn tag_roles(users: &mut [GitUser], required: &[(String, Role)]) {
    for user in users {
        if let Some((_, role)) = required.iter().find(|(name, _)| name == &user.username) {
            user.role = *role;
        }
    }
}

fn fetch_users(
    config: &Config,
    client: &GitLabClient,
    required: &[(String, Role)],
) -> Result<Vec<GitUser>, AppError> {
    let mut users = Vec::with_capacity(required.len());

    for (name, role) in required {
        let trimmed = name.trim();
        let candidates = client.search_users(trimmed)?;

        let matched = candidates
            .into_iter()
            .find(|candidate| candidate.username == trimmed)
            .ok_or_else(|| AppError::UserNotFound(trimmed.to_string()))?;

        users.push(GitUser {
            id: matched.id,
            username: matched.username,
            server_name: config.git.server.clone(),
            role: *role,
        });
    }

    Ok(users)
}

/// Loads previously cached identities. A missing, empty or unreadable file
/// yields an empty list; the next refresh overwrites it.
pub fn load_cached_users(path: &Path) -> Vec<GitUser> {
    let Ok(file_contents) = fs::read_to_string(path) else {
        return Vec::new();
    };

    if file_contents.trim().is_empty() {
        return Vec::new();
    }

    serde_json::from_str(&file_contents).unwrap_or_default()
}

/// Overwrites the cache file with the given list
pub fn save_cached_users(path: &Path, users: &[GitUser]) -> Result<(), AppError> {
    let json: String = serde_json::to_string_pretty(users)?;
    fs::write(path, json)?;
    Ok(())
}
