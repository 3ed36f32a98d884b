//! GitHub repository context extraction
//!
//! Fetches front-end-related files from a public GitHub repository through
//! the contents API so they can be embedded in a generation prompt. The walk
//! is breadth-first, bounded in file count and byte size, and skips paths it
//! cannot read rather than failing the whole extraction.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const API_BASE_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("uismith/", env!("CARGO_PKG_VERSION"));

/// File extensions considered front-end material
const FRONTEND_EXTENSIONS: &[&str] = &[
    ".html", ".css", ".js", ".jsx", ".tsx", ".vue", ".svelte", ".py",
];

/// Caps on how much repository content one extraction may pull
mod limits {
    /// Most files embedded into a single prompt
    pub const MAX_FILES: usize = 24;
    /// Largest single file worth embedding, in bytes
    pub const MAX_FILE_BYTES: u64 = 48 * 1024;
    /// Total bytes of context across all files
    pub const MAX_TOTAL_BYTES: usize = 256 * 1024;
    /// Most directories visited during the walk
    pub const MAX_DIRS: usize = 64;

    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Error types for context extraction
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Not a GitHub repository URL: {0}")]
    InvalidUrl(String),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No front-end files found in {0}")]
    NoFrontendFiles(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Basic repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
}

/// A fetched repository file
#[derive(Debug, Clone, Serialize)]
pub struct RepoFile {
    pub path: String,
    pub contents: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    download_url: Option<String>,
}

/// The contents API returns a listing for directories and a bare object
/// for single files
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentsEntry>),
    Single(ContentsEntry),
}

impl ContentsResponse {
    fn into_entries(self) -> Vec<ContentsEntry> {
        match self {
            ContentsResponse::Listing(entries) => entries,
            ContentsResponse::Single(entry) => vec![entry],
        }
    }
}

/// Parse `owner` and `repo` out of a GitHub repository URL
///
/// Accepts full URLs (`https://github.com/owner/repo`, with or without
/// extra path segments or a `.git` suffix) and bare `github.com/owner/repo`
/// forms.
pub fn parse_repo_url(url: &str) -> Result<(String, String), ContextError> {
    let trimmed = url.trim();
    let rest = trimmed
        .split_once("github.com/")
        .map(|(_, rest)| rest)
        .ok_or_else(|| ContextError::InvalidUrl(trimmed.to_string()))?;

    let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
    let owner = segments.next();
    let repo = segments.next().map(|repo| repo.trim_end_matches(".git"));

    match (owner, repo) {
        (Some(owner), Some(repo)) if !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ContextError::InvalidUrl(trimmed.to_string())),
    }
}

/// Whether a repository path looks like front-end material
pub fn is_frontend_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    FRONTEND_EXTENSIONS
        .iter()
        .any(|extension| lower.ends_with(extension))
}

/// Client for the GitHub contents API
#[derive(Clone)]
pub struct RepoExtractor {
    http_client: reqwest::Client,
    api_base_url: String,
    /// Optional token for higher rate limits; anonymous works for public repos
    token: Option<String>,
}

impl RepoExtractor {
    pub fn new(token: Option<String>) -> Result<Self, ContextError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(limits::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http_client,
            api_base_url: API_BASE_URL.to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Fetch basic repository information
    pub async fn fetch_repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, ContextError> {
        let url = format!("{}/repos/{}/{}", self.api_base_url, owner, repo);
        let response: RepoResponse = self.get_json(&url).await?;
        Ok(RepoInfo {
            name: response.name,
            description: response.description,
            language: response.language,
            stars: response.stargazers_count,
            forks: response.forks_count,
        })
    }

    /// Fetch front-end-related files from the repository
    ///
    /// Breadth-first walk over the contents API. Paths that fail to fetch
    /// are logged and skipped; the extraction only fails outright when the
    /// repository root itself is unreadable or nothing front-end-shaped was
    /// found at all.
    pub async fn fetch_frontend_files(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<RepoFile>, ContextError> {
        let mut files = Vec::new();
        let mut total_bytes = 0usize;
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([String::new()]);
        let mut dirs_walked = 0usize;

        while let Some(path) = queue.pop_front() {
            if files.len() >= limits::MAX_FILES || total_bytes >= limits::MAX_TOTAL_BYTES {
                log::info!(
                    "Context caps reached for {}/{} ({} files, {} bytes)",
                    owner,
                    repo,
                    files.len(),
                    total_bytes
                );
                break;
            }
            if !visited.insert(path.clone()) {
                continue;
            }
            if dirs_walked >= limits::MAX_DIRS {
                break;
            }
            dirs_walked += 1;

            let entries = match self.list_contents(owner, repo, &path).await {
                Ok(entries) => entries,
                Err(e) if path.is_empty() => return Err(e),
                Err(e) => {
                    log::warn!("Skipping {}/{}/{}: {}", owner, repo, path, e);
                    continue;
                }
            };

            for entry in entries {
                match entry.kind.as_str() {
                    "dir" => queue.push_back(entry.path),
                    "file" => {
                        if !is_frontend_path(&entry.path) {
                            continue;
                        }
                        if entry.size.unwrap_or(0) > limits::MAX_FILE_BYTES {
                            log::debug!("Skipping oversized file {}", entry.path);
                            continue;
                        }
                        if files.len() >= limits::MAX_FILES {
                            break;
                        }
                        let Some(download_url) = entry.download_url.as_deref() else {
                            continue;
                        };
                        match self.fetch_file_text(download_url).await {
                            Ok(contents) => {
                                total_bytes += contents.len();
                                log::debug!("Fetched {} ({} bytes)", entry.path, contents.len());
                                files.push(RepoFile {
                                    path: entry.path,
                                    contents,
                                });
                                if total_bytes >= limits::MAX_TOTAL_BYTES {
                                    break;
                                }
                            }
                            Err(e) => {
                                log::warn!("Couldn't fetch content for {}: {}", entry.path, e);
                            }
                        }
                    }
                    // symlinks, submodules
                    _ => {}
                }
            }
        }

        if files.is_empty() {
            return Err(ContextError::NoFrontendFiles(format!("{}/{}", owner, repo)));
        }

        Ok(files)
    }

    async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<ContentsEntry>, ContextError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base_url, owner, repo, path
        );
        let response: ContentsResponse = self.get_json(&url).await?;
        Ok(response.into_entries())
    }

    async fn fetch_file_text(&self, download_url: &str) -> Result<String, ContextError> {
        let response = self.request(download_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContextError::Api {
                status: status.as_u16(),
                message: format!("failed to download {}", download_url),
            });
        }
        Ok(response.text().await?)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ContextError> {
        let response = self
            .request(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // GitHub error bodies carry a "message" field worth surfacing
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ContextError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http_client.get(url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let (owner, repo) = parse_repo_url("https://github.com/sveltejs/svelte").unwrap();
        assert_eq!(owner, "sveltejs");
        assert_eq!(repo, "svelte");
    }

    #[test]
    fn test_parse_url_with_extra_segments() {
        let (owner, repo) =
            parse_repo_url("https://github.com/sveltejs/svelte/tree/main/packages").unwrap();
        assert_eq!(owner, "sveltejs");
        assert_eq!(repo, "svelte");
    }

    #[test]
    fn test_parse_url_strips_git_suffix() {
        let (_, repo) = parse_repo_url("https://github.com/sveltejs/svelte.git").unwrap();
        assert_eq!(repo, "svelte");
    }

    #[test]
    fn test_parse_bare_url() {
        let (owner, repo) = parse_repo_url("github.com/rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn test_parse_rejects_non_github() {
        assert!(matches!(
            parse_repo_url("https://gitlab.com/owner/repo"),
            Err(ContextError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert!(parse_repo_url("https://github.com/onlyowner").is_err());
        assert!(parse_repo_url("https://github.com/").is_err());
    }

    #[test]
    fn test_frontend_path_filter() {
        assert!(is_frontend_path("src/App.jsx"));
        assert!(is_frontend_path("styles/MAIN.CSS"));
        assert!(is_frontend_path("pages/index.vue"));
        assert!(is_frontend_path("lib/Button.svelte"));
        assert!(!is_frontend_path("Cargo.toml"));
        assert!(!is_frontend_path("src/main.rs"));
        assert!(!is_frontend_path("README.md"));
    }

    #[test]
    fn test_contents_response_single_and_listing() {
        let single: ContentsResponse = serde_json::from_str(
            r#"{"path":"index.html","type":"file","size":120,"download_url":"https://raw.example/x"}"#,
        )
        .unwrap();
        assert_eq!(single.into_entries().len(), 1);

        let listing: ContentsResponse = serde_json::from_str(
            r#"[{"path":"src","type":"dir"},{"path":"index.html","type":"file"}]"#,
        )
        .unwrap();
        assert_eq!(listing.into_entries().len(), 2);
    }

    #[test]
    fn test_extractor_drops_blank_token() {
        let extractor = RepoExtractor::new(Some("  ".to_string())).unwrap();
        assert!(extractor.token.is_none());
    }
}
