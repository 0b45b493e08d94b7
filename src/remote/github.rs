//! GitHub REST API provider.
//!
//! Uses two read endpoints:
//! - `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1` for the tree
//! - `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` for a file,
//!   whose body carries the content base64 encoded.
//!
//! Requests are blocking and sequential. A token, when present, is sent as a
//! bearer token; without one the provider's anonymous rate limits apply.

use super::{RemoteProvider, TreeEntry};
use crate::config::SourceConfig;
use crate::defaults::USER_AGENT;
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// `RemoteProvider` talking to the GitHub REST API.
pub struct GitHubProvider {
    agent: ureq::Agent,
    api_url: Url,
    token: Option<String>,
}

impl GitHubProvider {
    /// Create a provider for the API rooted at `api_url`.
    pub fn new(api_url: &str, token: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let api_url = Url::parse(api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(Error::Path {
                message: format!("API URL cannot be used as a base: {}", api_url),
            });
        }

        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            agent: builder.build(),
            api_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Build `{api}/repos/{repository}/{tail...}`. Each `/`-separated piece
    /// becomes its own URL segment so that it is percent-encoded on its own.
    fn endpoint(&self, repository: &str, tail: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::Path {
                message: format!("API URL cannot be used as a base: {}", self.api_url),
            })?;
            segments.pop_if_empty().push("repos");
            segments.extend(repository.split('/').filter(|s| !s.is_empty()));
            for piece in tail {
                segments.extend(piece.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    fn tree_url(&self, source: &SourceConfig) -> Result<Url> {
        let mut url = self.endpoint(&source.repository, &["git", "trees", source.branch.as_str()])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    fn content_url(&self, source: &SourceConfig, path: &str) -> Result<Url> {
        let mut url = self.endpoint(&source.repository, &["contents", path])?;
        url.query_pairs_mut().append_pair("ref", &source.branch);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        debug!("GET {}", url);
        let mut request = self.agent.get(url.as_str()).set("Accept", ACCEPT);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        match request.call() {
            Ok(response) => {
                let body = response.into_string().map_err(|e| Error::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                serde_json::from_str(&body).map_err(Error::Json)
            }
            Err(ureq::Error::Status(status, response)) => Err(Error::RemoteFetch {
                url: url.to_string(),
                status,
                message: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(Error::Network {
                url: url.to_string(),
                message: transport.to_string(),
            }),
        }
    }
}

impl RemoteProvider for GitHubProvider {
    fn fetch_tree(&self, source: &SourceConfig) -> Result<Vec<TreeEntry>> {
        let url = self.tree_url(source)?;
        let response: TreeResponse = self.get_json(&url)?;
        if response.truncated {
            warn!(
                "Tree listing for {}@{} was truncated; some files will not be considered",
                source.repository, source.branch
            );
        }
        Ok(response.tree)
    }

    fn fetch_content(&self, source: &SourceConfig, path: &str) -> Result<String> {
        let url = self.content_url(source, path)?;
        let response: ContentResponse = self.get_json(&url)?;
        decode_content(path, &response)
    }
}

/// Decode the `content` field of a contents response into text.
fn decode_content(path: &str, response: &ContentResponse) -> Result<String> {
    let bytes = match response.encoding.as_deref() {
        None | Some("base64") => {
            // GitHub wraps the encoded body at 60 columns
            let compact: String = response
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            STANDARD.decode(compact).map_err(|e| Error::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })?
        }
        Some("utf-8") | Some("utf8") => response.content.clone().into_bytes(),
        Some(other) => {
            return Err(Error::Decode {
                path: path.to_string(),
                message: format!("unsupported encoding '{}'", other),
            })
        }
    };

    String::from_utf8(bytes).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
