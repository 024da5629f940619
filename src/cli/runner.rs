//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, SearchArgs};
use crate::config::Profile;
use crate::error::Result;
use crate::search::{SearchClient, SearchResult};
use crate::transport::HttpTransport;
use crate::types::ResultType;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Search { query, args } => {
                let profile = apply_overrides(self.profile()?, args);
                self.search(&profile, query).await
            }
            Commands::ShowConfig => {
                let profile = self.profile()?;
                self.output_message(&serde_json::to_value(profile.masked())?);
                Ok(())
            }
        }
    }

    /// Load the profile named on the command line
    fn profile(&self) -> Result<Profile> {
        Profile::load(self.cli.config.as_deref())
    }

    async fn search(&self, profile: &Profile, query: &str) -> Result<()> {
        let transport = HttpTransport::new(profile.transport_config()?)?;
        let client = SearchClient::new(transport, profile.search_config());

        let result = client.search(query).await?;
        info!(
            "Search finished: {} tweets over {} pages ({})",
            result.len(),
            result.pages,
            result.stop_reason
        );
        match (&result.rate_limit, result.min_id()) {
            (Some(state), Some(min_id)) => info!(
                "Rate limit {}/{} resets at {}; resume with --max-id {}",
                state.remaining,
                state.limit,
                state.reset,
                min_id.saturating_sub(1)
            ),
            (Some(state), None) => info!(
                "Rate limit {}/{} resets at {}",
                state.remaining, state.limit, state.reset
            ),
            (None, _) => {}
        }

        match self.cli.format {
            OutputFormat::Json => {
                for tweet in &result.tweets {
                    self.output_message(&json!({
                        "type": "RECORD",
                        "record": tweet,
                    }));
                }
            }
            OutputFormat::Pretty => {
                for tweet in &result.tweets {
                    let author = tweet
                        .user
                        .as_ref()
                        .and_then(|u| u.screen_name.as_deref())
                        .unwrap_or("?");
                    println!("{}  @{}  {}", tweet.id, author, tweet.text.replace('\n', " "));
                }
            }
        }
        self.output_message(&summary(&result));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Final state message: where to resume and when
fn summary(result: &SearchResult) -> Value {
    json!({
        "type": "STATE",
        "state": {
            "tweets": result.len(),
            "pages": result.pages,
            "stop_reason": result.stop_reason,
            "min_id": result.min_id(),
            "resume_max_id": result.min_id().and_then(|id| id.checked_sub(1)),
            "rate_limit": result.rate_limit,
            "resume_after_secs": result.resume_after(Utc::now()).map(|d| d.as_secs()),
        }
    })
}

/// Command-line flags win over the profile
fn apply_overrides(mut profile: Profile, args: &SearchArgs) -> Profile {
    if args.since_id.is_some() {
        profile.since_id = args.since_id;
    }
    if args.max_id.is_some() {
        profile.max_id = args.max_id;
    }
    if args.lang.is_some() {
        profile.language = args.lang.clone();
    }
    if let Some(result_type) = args.result_type.as_deref() {
        profile.result_type = Some(ResultType::from_str_lossy(result_type));
    }
    if let Some(auth) = args.auth {
        profile.throttle = auth;
    }
    if let Some(policy) = args.policy {
        profile.policy = policy;
    }
    if let Some(base_url) = &args.base_url {
        profile.base_url = base_url.clone();
    }
    profile
}
