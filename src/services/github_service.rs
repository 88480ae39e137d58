use crate::error::{Error, Result};
use crate::utils::encoding::decode_b64_lossy;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "recruitment-scoring";

#[derive(Debug, Clone, Default, Deserialize)]
struct GithubUser {
    name: Option<String>,
    bio: Option<String>,
    public_repos: Option<u64>,
    followers: Option<u64>,
    following: Option<u64>,
    created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    created_at: Option<String>,
    updated_at: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    fork: bool,
}

#[derive(Debug, Deserialize)]
struct GithubContent {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub topics: Vec<String>,
}

impl From<GithubRepo> for RepoSummary {
    fn from(repo: GithubRepo) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            topics: repo.topics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GithubProfile {
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub joined_at: Option<String>,
    pub profile_readme: String,
    pub repositories: Vec<RepoSummary>,
}

/// Read-only client for the public GitHub REST API.
#[derive(Clone)]
pub struct GithubService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubService {
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self::with_base_url(client, GITHUB_API_URL, token)
    }

    pub fn with_base_url(client: Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let req = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .timeout(Duration::from_secs(30));
        match &self.token {
            Some(token) => req.header("Authorization", format!("token {}", token)),
            None => req,
        }
    }

    /// Fetches the user, their own (non-fork) repositories and the profile
    /// README. A missing README is not an error.
    pub async fn fetch_profile(&self, username: &str) -> Result<GithubProfile> {
        if username.trim().is_empty() {
            return Err(Error::BadRequest("Invalid GitHub username".to_string()));
        }

        let user: GithubUser = self
            .get(&format!("/users/{}", username))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let repos: Vec<GithubRepo> = self
            .get(&format!("/users/{}/repos", username))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let profile_readme = match self.fetch_readme(username).await {
            Ok(readme) => readme,
            Err(e) => {
                tracing::debug!("No profile README for {}: {:?}", username, e);
                String::new()
            }
        };

        let profile = build_profile(username, user, repos, profile_readme);
        tracing::info!(
            username = %profile.username,
            repositories = profile.repositories.len(),
            "GitHub profile fetched"
        );
        Ok(profile)
    }

    async fn fetch_readme(&self, username: &str) -> Result<String> {
        let content: GithubContent = self
            .get(&format!("/repos/{}/{}/readme", username, username))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decode_b64_lossy(&content.content))
    }
}

fn build_profile(
    username: &str,
    user: GithubUser,
    repos: Vec<GithubRepo>,
    profile_readme: String,
) -> GithubProfile {
    GithubProfile {
        username: username.to_string(),
        name: user.name,
        bio: user.bio,
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        joined_at: user.created_at,
        profile_readme,
        repositories: repos
            .into_iter()
            .filter(|r| !r.fork)
            .map(RepoSummary::from)
            .collect(),
    }
}
