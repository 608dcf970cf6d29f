use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod find;
mod prelude;
mod reddit;
mod search;
mod transfer;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Find recipes on Reddit by topic and save their images"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Reddit application client id
    #[clap(long, env = "REDDIT_CLIENT_ID", global = true, hide_env_values = true)]
    client_id: Option<String>,

    /// Reddit application client secret
    #[clap(long, env = "REDDIT_CLIENT_SECRET", global = true, hide_env_values = true)]
    client_secret: Option<String>,

    /// User agent sent to Reddit
    #[clap(long, env = "REDDIT_USER_AGENT", global = true)]
    user_agent: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "RECIPES_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Credentials for this run. Missing ones abort before any request is made.
    pub fn reddit_config(&self) -> Result<config::RedditConfig> {
        Ok(config::RedditConfig::from_parts(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.user_agent.clone(),
        )?)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Find the best recipe post for each topic and download its image
    Find(crate::find::FindOptions),

    /// List the search candidates for a topic and the post that would be picked
    Search(crate::search::SearchOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Find(options) => crate::find::run(options, app.global).await,
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
