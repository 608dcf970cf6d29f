use std::time::Duration;

use crate::prelude::{println, *};
use crate::reddit::{ContentSource, RedditClient, SearchSort};
use colored::Colorize;
use recipes_core::reddit::Post;
use recipes_core::report::{build_search_query, canonical_post_url};
use recipes_core::select::{flair_matches, select_best_post};
use serde::Serialize;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchOptions {
    /// Topic to search for
    #[arg(value_name = "TOPIC")]
    pub topic: String,

    /// Subreddit to search
    #[arg(short, long, env = "RECIPES_SUBREDDIT", default_value = "recipes")]
    pub subreddit: String,

    /// Search result pool size
    #[arg(short, long, env = "RECIPES_LIMIT", default_value = "25")]
    pub limit: usize,

    /// Flair text a post must contain to be preferred (case-insensitive)
    #[arg(long, env = "RECIPES_FLAIR", default_value = "recipe")]
    pub flair: String,

    /// Search sort order
    #[arg(long, value_enum, default_value_t = SearchSort::Relevance)]
    pub sort: SearchSort,

    /// Per-request timeout in seconds
    #[arg(long, env = "RECIPES_TIMEOUT", default_value = "15")]
    pub timeout: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub flair: Option<String>,
    pub score: i64,
    pub author: Option<String>,
    pub post_url: String,
    pub flair_match: bool,
    pub selected: bool,
}

/// Candidate pool for a topic, with the post the selector would pick
#[derive(Debug, Serialize, Clone)]
pub struct SearchOutput {
    pub topic: String,
    pub query: String,
    pub subreddit: String,
    pub candidates: Vec<Candidate>,
    pub selected_id: Option<String>,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let config = global.reddit_config()?;
    let source = RedditClient::new(config, Duration::from_secs(options.timeout))?;

    if global.verbose {
        println!("Searching r/{} for '{}'...", options.subreddit, options.topic);
    }

    let output = search_data(&source, &options).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_formatted(&output);
    }

    Ok(())
}

/// Fetch the candidate pool for a topic and mark the selector's choice
pub async fn search_data<S: ContentSource>(
    source: &S,
    options: &SearchOptions,
) -> Result<SearchOutput> {
    let query = build_search_query(&options.topic);
    let posts = source
        .search(&options.subreddit, &query, options.sort, options.limit)
        .await
        .with_context(|| format!("Error searching for topic '{}'", options.topic))?;

    Ok(summarize_candidates(
        &options.topic,
        query,
        &options.subreddit,
        &posts,
        &options.flair,
    ))
}

pub fn summarize_candidates(
    topic: &str,
    query: String,
    subreddit: &str,
    posts: &[Post],
    flair: &str,
) -> SearchOutput {
    let selected_id = select_best_post(posts, flair).map(|p| p.id.clone());

    let candidates = posts
        .iter()
        .map(|p| Candidate {
            id: p.id.clone(),
            title: p.title.clone(),
            flair: p.flair.clone(),
            score: p.score,
            author: p.author.clone(),
            post_url: canonical_post_url(&p.permalink),
            flair_match: flair_matches(p, flair),
            selected: selected_id.as_deref() == Some(p.id.as_str()),
        })
        .collect();

    SearchOutput {
        topic: topic.to_string(),
        query,
        subreddit: subreddit.to_string(),
        candidates,
        selected_id,
    }
}

fn output_formatted(output: &SearchOutput) {
    println!(
        "\n{}",
        format!(
            "r/{} results for '{}' ({} candidates)",
            output.subreddit,
            output.topic,
            output.candidates.len()
        )
        .bright_cyan()
        .bold()
    );

    if output.candidates.is_empty() {
        println!("{}", format!("No results found for topic '{}'.", output.topic).yellow());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["", "Score", "Flair", "Match", "Title", "ID"]);

    for c in &output.candidates {
        let marker = if c.selected { "*" } else { "" };
        let flair = c.flair.as_deref().unwrap_or("-");
        let flair_match = if c.flair_match { "yes" } else { "no" };
        table.add_row(prettytable::row![marker, c.score, flair, flair_match, c.title, c.id]);
    }

    table.printstd();

    if let Some(selected) = output.candidates.iter().find(|c| c.selected) {
        println!("\n{} {}", "Selected:".green(), selected.post_url.cyan().underline());
        if !selected.flair_match {
            println!(
                "{}",
                "  [!] No post matched the flair filter; picked the top score overall.".yellow()
            );
        }
    }
}
