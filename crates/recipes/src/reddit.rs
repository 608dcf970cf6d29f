use std::future::Future;
use std::time::Duration;

use crate::config::RedditConfig;
use crate::prelude::*;
use recipes_core::reddit::{parse_comments_response, parse_search_page, Comment, Post, SearchPage};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tokio::sync::Mutex;

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

/// Largest `limit` the listing endpoints honour per request
const MAX_PAGE_SIZE: usize = 100;

/// Sort order for subreddit search
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    /// Best match for the query (default)
    #[default]
    Relevance,
    /// Currently trending
    Hot,
    /// Highest score
    Top,
    /// Most recent
    New,
    /// Most commented
    Comments,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Hot => "hot",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

/// Where posts and their comments come from.
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    /// Search `subreddit` and return up to `limit` posts in the order the API ranks them
    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<Post>>;

    /// Top-level comments of `post`, with "load more" placeholders dropped
    async fn expand_comments(&self, post: &Post) -> Result<Vec<Comment>>;
}

#[derive(Debug, serde::Deserialize)]
struct AccessToken {
    access_token: String,
}

/// Application-only OAuth client for the Reddit API.
///
/// The access token is requested on first use, so an authentication failure
/// only affects the topic that triggered it. A token the API rejects is
/// dropped and requested again once.
pub struct RedditClient {
    http: reqwest::Client,
    config: RedditConfig,
    token: Mutex<Option<String>>,
}

impl RedditClient {
    pub fn new(config: RedditConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    async fn token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = fetch_access_token(&self.http, &self.config).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn clear_token(&self) {
        *self.token.lock().await = None;
    }

    async fn send(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let token = self.token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("{url}: {e}")))?;

        Ok(response)
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let mut response = self.send(url, query).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            log::debug!("access token rejected for {url}, re-authenticating");
            self.clear_token().await;
            response = self.send(url, query).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .text()
            .await
            .map_err(|e| Error::Network(format!("{url}: {e}")).into())
    }

    async fn search_page(
        &self,
        url: &str,
        query: &str,
        sort: SearchSort,
        after: Option<String>,
        limit: usize,
    ) -> Result<SearchPage> {
        let mut params = vec![
            ("q", query.to_string()),
            ("restrict_sr", "1".to_string()),
            ("sort", sort.as_str().to_string()),
            ("limit", limit.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = after {
            params.push(("after", after));
        }

        let body = self.get(url, &params).await?;
        parse_search_page(&body).context("Failed to parse search response")
    }
}

/// Collect up to `limit` posts by following `after` cursors.
///
/// Stops early when a page is empty or has no cursor.
async fn collect_pages<F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<Post>>
where
    F: FnMut(Option<String>, usize) -> Fut,
    Fut: Future<Output = Result<SearchPage>>,
{
    let mut posts = Vec::new();
    let mut after = None;

    while posts.len() < limit {
        let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
        let page = fetch_page(after.take(), page_size).await?;

        if page.posts.is_empty() {
            break;
        }
        posts.extend(page.posts);

        match page.after {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    posts.truncate(limit);
    Ok(posts)
}

impl ContentSource for RedditClient {
    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<Post>> {
        let url = format!(
            "{REDDIT_API_BASE}/r/{}/search",
            urlencoding::encode(subreddit)
        );
        let url = url.as_str();

        collect_pages(limit, move |after, page_size| {
            self.search_page(url, query, sort, after, page_size)
        })
        .await
    }

    async fn expand_comments(&self, post: &Post) -> Result<Vec<Comment>> {
        let url = format!(
            "{REDDIT_API_BASE}/comments/{}",
            urlencoding::encode(&post.id)
        );
        let params = [("raw_json", "1".to_string())];

        let body = self.get(&url, &params).await?;
        parse_comments_response(&body).context("Failed to parse comments response")
    }
}

/// Basic auth header value for the client-credentials grant
fn basic_auth_header(config: &RedditConfig) -> Result<HeaderValue> {
    use base64::Engine;

    let auth_string = format!("{}:{}", config.client_id, config.client_secret);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    HeaderValue::from_str(&format!("Basic {auth_encoded}"))
        .map_err(|e| eyre!("Invalid header value: {}", e))
}

async fn fetch_access_token(http: &reqwest::Client, config: &RedditConfig) -> Result<String> {
    log::debug!("requesting application access token");

    let response = http
        .post(REDDIT_AUTH_URL)
        .header(AUTHORIZATION, basic_auth_header(config)?)
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| Error::Network(format!("{REDDIT_AUTH_URL}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Auth(format!("HTTP {}", response.status())).into());
    }

    let token: AccessToken = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Failed to parse token response: {e}")))?;

    Ok(token.access_token)
}
