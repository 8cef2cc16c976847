use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// A user record returned by the remote user search
#[derive(Deserialize, Debug, Clone)]
pub struct RemoteUser {
    pub id: i64,
    pub username: String,
}

/// Request body for merge-request creation
#[derive(Serialize, Debug)]
pub struct MergeRequestParams<'a> {
    pub source_branch: &'a str,
    pub target_branch: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub remove_source_branch: bool,
    pub reviewer_ids: Vec<i64>,
    pub assignee_ids: Vec<i64>,
}

/// The created merge request, reduced to what the tool reports
#[derive(Deserialize, Debug)]
pub struct CreatedMergeRequest {
    /// Project-scoped merge-request number, used in the browser URL
    pub iid: u64,
}

/// Client for the git server's REST API, authenticated with a bearer token
pub struct GitLabClient {
    http: Client,
    server: String,
    token: String,
}

impl GitLabClient {
    /// Builds a client when both server and token are configured.
    ///
    /// `None` means remote integration is not set up; commands that need it
    /// fail their own validation instead.
    pub fn from_config(config: &Config) -> Result<Option<GitLabClient>, AppError> {
        let server = config.git.server.trim_end_matches('/');
        if server.is_empty() || config.git.token.is_empty() {
            return Ok(None);
        }

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Some(GitLabClient {
            http,
            server: server.to_string(),
            token: config.git.token.clone(),
        }))
    }

    /// Searches users by name. Exact-match filtering is the caller's job;
    /// the server returns all candidates for the search term.
    pub fn search_users(&self, name: &str) -> Result<Vec<RemoteUser>, AppError> {
        let response = self
            .http
            .get(format!("{}/api/v4/users", self.server))
            .bearer_auth(&self.token)
            .query(&[("search", name)])
            .send()?;

        Ok(ensure_success(response)?.json()?)
    }

    /// Creates a merge request on the given namespaced project path
    pub fn create_merge_request(
        &self,
        project_path: &str,
        params: &MergeRequestParams<'_>,
    ) -> Result<CreatedMergeRequest, AppError> {
        let response = self
            .http
            .post(format!(
                "{}/api/v4/projects/{}/merge_requests",
                self.server,
                encode_project_path(project_path)
            ))
            .bearer_auth(&self.token)
            .json(params)
            .send()?;

        Ok(ensure_success(response)?.json()?)
    }

    /// Browser URL of a merge request
    pub fn merge_request_url(&self, project_path: &str, iid: u64) -> String {
        format!("{}/{}/-/merge_requests/{}", self.server, project_path, iid)
    }
}

/// Namespaced project paths travel as a single URL path element
fn encode_project_path(path: &str) -> String {
    path.replace('/', "%2F")
}

fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(AppError::RemoteStatus {
        status,
        body: body.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_requires_server_and_token() {
        let mut config = Config::default();
        assert!(GitLabClient::from_config(&config).expect("build").is_none());

        config.git.server = "https://gitlab.example.com".to_string();
        assert!(GitLabClient::from_config(&config).expect("build").is_none());

        config.git.token = "secret".to_string();
        assert!(GitLabClient::from_config(&config).expect("build").is_some());
    }

    #[test]
    fn trailing_server_slash_is_stripped() {
        let mut config = Config::default();
        config.git.server = "https://gitlab.example.com/".to_string();
        config.git.token = "secret".to_string();

        let client = GitLabClient::from_config(&config)
            .expect("build")
            .expect("client");
        assert_eq!(
            client.merge_request_url("platform/backend", 42),
            "https://gitlab.example.com/platform/backend/-/merge_requests/42"
        );
    }

    #[test]
    fn project_path_is_encoded_as_one_element() {
        assert_eq!(encode_project_path("platform/backend"), "platform%2Fbackend");
    }
}
