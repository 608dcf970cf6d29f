use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prelude::{print, println, *};
use crate::reddit::{ContentSource, RedditClient, SearchSort};
use crate::transfer::{save_image, HttpTransfer, Transfer};
use colored::Colorize;
use recipes_core::report::{build_search_query, RecipeResult};
use recipes_core::select::{resolve_image_url, select_best_comment, select_best_post};
use serde::Serialize;

const SEPARATOR_WIDTH: usize = 56;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct FindOptions {
    /// Topics to search for
    #[arg(
        short,
        long,
        num_args = 1..,
        default_values = ["christmas", "fruitcake", "meatloaf", "new year's", "pie"]
    )]
    pub topics: Vec<String>,

    /// Subreddit to search
    #[arg(short, long, env = "RECIPES_SUBREDDIT", default_value = "recipes")]
    pub subreddit: String,

    /// Directory to save images into
    #[arg(short, long, env = "RECIPES_OUTDIR", default_value = ".")]
    pub outdir: PathBuf,

    /// Search result pool size per topic
    #[arg(short, long, env = "RECIPES_LIMIT", default_value = "25")]
    pub limit: usize,

    /// Flair text a post must contain to be preferred (case-insensitive)
    #[arg(long, env = "RECIPES_FLAIR", default_value = "recipe")]
    pub flair: String,

    /// Search sort order
    #[arg(long, value_enum, default_value_t = SearchSort::Relevance)]
    pub sort: SearchSort,

    /// Pause between topics, in milliseconds
    #[arg(long, env = "RECIPES_PAUSE_MS", default_value = "1000")]
    pub pause_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "RECIPES_TIMEOUT", default_value = "15")]
    pub timeout: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Per-run settings shared by every topic
#[derive(Debug, Clone)]
pub struct FindSettings {
    pub subreddit: String,
    pub flair: String,
    pub sort: SearchSort,
    pub limit: usize,
    pub out_dir: PathBuf,
    pub timeout: Duration,
    pub pause: Duration,
}

impl From<&FindOptions> for FindSettings {
    fn from(options: &FindOptions) -> Self {
        Self {
            subreddit: options.subreddit.clone(),
            flair: options.flair.clone(),
            sort: options.sort,
            limit: options.limit,
            out_dir: options.outdir.clone(),
            timeout: Duration::from_secs(options.timeout),
            pause: Duration::from_millis(options.pause_ms),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Saved { path: PathBuf },
    Failed { url: String, error: String },
    NotFound,
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopicOutcome {
    Failed {
        topic: String,
        error: String,
    },
    NoResults {
        topic: String,
    },
    Found {
        topic: String,
        result: RecipeResult,
        image: ImageOutcome,
    },
}

/// Progress of a single topic, reported as it happens
#[derive(Debug, Clone, Copy)]
pub enum TopicEvent<'a> {
    Started { topic: &'a str },
    Finished(&'a TopicOutcome),
}

pub async fn run(options: FindOptions, global: crate::Global) -> Result<()> {
    let config = global.reddit_config()?;
    let settings = FindSettings::from(&options);

    if global.verbose {
        println!("Subreddit: r/{}", settings.subreddit);
        println!("Output directory: {}", settings.out_dir.display());
        println!("User agent: {}", config.user_agent);
        println!();
    }

    let transfer = HttpTransfer::new(&config.user_agent)?;
    let source = RedditClient::new(config, settings.timeout)?;

    let json = options.json;
    let outcomes = run_topics(&source, &transfer, &options.topics, &settings, |event| {
        if json {
            return;
        }
        match event {
            TopicEvent::Started { topic } => print!("{}", format_topic_header(topic)),
            TopicEvent::Finished(outcome) => println!("{}", format_outcome(outcome)),
        }
    })
    .await;

    if json {
        let json = serde_json::to_string_pretty(&outcomes)?;
        println!("{}", json);
    }

    Ok(())
}

/// Process every topic in order, pausing between them.
///
/// `report` sees each topic when it starts and again with its outcome. A
/// failing topic never stops the ones after it.
pub async fn run_topics<S, T, F>(
    source: &S,
    transfer: &T,
    topics: &[String],
    settings: &FindSettings,
    mut report: F,
) -> Vec<TopicOutcome>
where
    S: ContentSource,
    T: Transfer,
    F: FnMut(TopicEvent<'_>),
{
    let mut outcomes = Vec::with_capacity(topics.len());

    for (idx, topic) in topics.iter().enumerate() {
        if idx > 0 && !settings.pause.is_zero() {
            tokio::time::sleep(settings.pause).await;
        }

        report(TopicEvent::Started {
            topic: topic.as_str(),
        });
        let outcome = process_topic(source, transfer, topic, settings).await;
        report(TopicEvent::Finished(&outcome));
        outcomes.push(outcome);
    }

    outcomes
}

/// Search, select and download for a single topic
pub async fn process_topic<S: ContentSource, T: Transfer>(
    source: &S,
    transfer: &T,
    topic: &str,
    settings: &FindSettings,
) -> TopicOutcome {
    log::info!("searching r/{} for {:?}", settings.subreddit, topic);

    let result = match find_recipe_for_topic(source, topic, settings).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            return TopicOutcome::NoResults {
                topic: topic.to_string(),
            }
        }
        Err(err) => {
            log::warn!("search for {:?} failed: {:#}", topic, err);
            return TopicOutcome::Failed {
                topic: topic.to_string(),
                error: format!("{err:#}"),
            };
        }
    };

    let image = match &result.image_url {
        Some(url) => download_image(transfer, url, &settings.out_dir, topic, settings.timeout).await,
        None => ImageOutcome::NotFound,
    };

    TopicOutcome::Found {
        topic: topic.to_string(),
        result,
        image,
    }
}

/// Find the best post for `topic` and its best comment.
///
/// Returns `Ok(None)` when the search comes back empty. A failure to load
/// comments is logged and treated as a post without comments.
pub async fn find_recipe_for_topic<S: ContentSource>(
    source: &S,
    topic: &str,
    settings: &FindSettings,
) -> Result<Option<RecipeResult>> {
    let query = build_search_query(topic);
    let posts = source
        .search(&settings.subreddit, &query, settings.sort, settings.limit)
        .await?;

    log::debug!("{} candidates for {:?}", posts.len(), topic);

    let Some(post) = select_best_post(&posts, &settings.flair) else {
        return Ok(None);
    };

    let image_url = resolve_image_url(post);

    let comments = match source.expand_comments(post).await {
        Ok(comments) => comments,
        Err(err) => {
            log::warn!("could not load comments for post {}: {:#}", post.id, err);
            Vec::new()
        }
    };

    let best_comment = select_best_comment(&comments);

    Ok(Some(RecipeResult::from_selection(
        post,
        image_url,
        best_comment,
    )))
}

async fn download_image<T: Transfer>(
    transfer: &T,
    url: &str,
    out_dir: &Path,
    topic: &str,
    timeout: Duration,
) -> ImageOutcome {
    match save_image(transfer, url, out_dir, topic, timeout).await {
        Ok(path) => ImageOutcome::Saved { path },
        Err(err) => {
            log::warn!("image download for {:?} failed: {:#}", topic, err);
            ImageOutcome::Failed {
                url: url.to_string(),
                error: format!("{err:#}"),
            }
        }
    }
}

/// Separator and topic line printed before a topic is searched
pub fn format_topic_header(topic: &str) -> String {
    format!(
        "{}\n{} {}\n",
        "#".repeat(SEPARATOR_WIDTH).bright_cyan(),
        "Topic :".green(),
        topic.bold()
    )
}

/// Render one topic outcome as terminal text
pub fn format_outcome(outcome: &TopicOutcome) -> String {
    let mut out = String::new();

    match outcome {
        TopicOutcome::Failed { topic, error } => {
            out.push_str(&format!(
                "{}\n",
                format!("  [!] Error searching for topic '{topic}': {error}").red()
            ));
        }
        TopicOutcome::NoResults { topic } => {
            out.push_str(&format!(
                "{}\n",
                format!("  No results found for topic '{topic}'.").yellow()
            ));
        }
        TopicOutcome::Found { result, image, .. } => {
            out.push_str(&format!("{}\n\n", result.title.white().bold()));

            match &result.recipe_text {
                Some(text) => out.push_str(&format!("{text}\n\n")),
                None => out.push_str(&format!(
                    "{}\n\n",
                    "  [!] No top comment recipe found for this post.".yellow()
                )),
            }

            out.push_str(&format!("{} {}\n", "Source :".green(), result.author));
            out.push_str(&format!(
                "{} {}\n",
                "Post URL:".green(),
                result.post_url.cyan().underline()
            ));

            match image {
                ImageOutcome::Saved { path } => {
                    out.push_str(&format!(
                        "{} {}\n",
                        "Saved local file:".green(),
                        path.display()
                    ));
                }
                ImageOutcome::Failed { url, error } => {
                    out.push_str(&format!(
                        "{}\n",
                        format!("  [!] Failed to download image from {url}: {error}").red()
                    ));
                }
                ImageOutcome::NotFound => {
                    out.push_str(&format!(
                        "{}\n",
                        "  [!] No image URL found for this post.".yellow()
                    ));
                }
            }
        }
    }

    out
}
