use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::Utc;
use interfaces_github_client::{BuildClientError, GitHubClient};
use interfaces_github_stargazers::{fetch_recent_stargazers, FetchRecentStargazersError, StarEvent};
use interfaces_github_users::{enrich, EnrichError, Enrichment};
use interfaces_webhook::{deliver, DeliverError, DeliveryOutcome};
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::leads::{aggregate, rank, Lead};
use crate::sink::{write_snapshot, WriteSnapshotError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("BuildGitHubClient: {source}")]
    BuildGitHubClient {
        #[from]
        source: BuildClientError,
    },

    #[error("BuildWebhookClient: {source}")]
    BuildWebhookClient { source: reqwest::Error },

    #[error("FetchStargazers {repository}: {source}")]
    FetchStargazers {
        repository: String,
        source: FetchRecentStargazersError,
    },

    #[error("Enrich {username}: {source}")]
    Enrich { username: String, source: EnrichError },

    #[error("WriteSnapshot: {source}")]
    WriteSnapshot {
        #[from]
        source: WriteSnapshotError,
    },

    /// The webhook could not be reached at all. The snapshot is already on disk.
    #[error("Deliver: {source}")]
    Deliver {
        #[from]
        source: DeliverError,
    },
}

/// How the webhook step ended when the webhook answered or was not configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    Skipped,
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
}

#[derive(Debug)]
pub struct RunSummary {
    /// Stargazers collected per watched repository, in config order.
    pub per_repository: Vec<(String, usize)>,
    pub total_stargazers: usize,
    pub leads: Vec<Lead>,
    /// `None` when nothing was collected and the run stopped early.
    pub snapshot: Option<PathBuf>,
    pub delivery: Option<DeliveryReport>,
}

/// Collect, enrich, rank, snapshot, deliver. One request at a time.
pub async fn run(config: &Config) -> Result<RunSummary, RunError> {
    let github = GitHubClient::new(config.github.clone())?;

    let mut per_repository = Vec::with_capacity(config.repositories.len());
    let mut events: Vec<StarEvent> = Vec::new();

    for repository in &config.repositories {
        let collected = fetch_recent_stargazers(&github, repository, config.max_per_repo)
            .await
            .map_err(|source| RunError::FetchStargazers {
                repository: repository.clone(),
                source,
            })?;

        per_repository.push((repository.clone(), collected.len()));
        events.extend(collected);
    }

    let total_stargazers = events.len();
    info!(total_stargazers, "stargazers collected");

    if events.is_empty() {
        info!("no stargazers found, nothing to deliver");
        return Ok(RunSummary {
            per_repository,
            total_stargazers,
            leads: Vec::new(),
            snapshot: None,
            delivery: None,
        });
    }

    let enrichments = enrich_unique(&github, &events).await?;
    let leads = rank(aggregate(events, &enrichments));
    info!(count = leads.len(), "leads ranked");

    write_snapshot(&config.snapshot_path, &leads)?;

    let delivery = deliver_leads(config, &leads).await?;

    Ok(RunSummary {
        per_repository,
        total_stargazers,
        leads,
        snapshot: Some(config.snapshot_path.clone()),
        delivery: Some(delivery),
    })
}

/// One lookup per distinct username, in first-seen order.
async fn enrich_unique(
    github: &GitHubClient,
    events: &[StarEvent],
) -> Result<HashMap<String, Enrichment>, RunError> {
    let mut seen = HashSet::new();
    let usernames: Vec<&str> = events
        .iter()
        .map(|event| event.username.as_str())
        .filter(|username| seen.insert(*username))
        .collect();

    let total = usernames.len();
    info!(total, "enriching users");

    let mut enrichments = HashMap::with_capacity(total);
    for (position, username) in usernames.into_iter().enumerate() {
        let enrichment = enrich(github, username)
            .await
            .map_err(|source| RunError::Enrich {
                username: username.to_string(),
                source,
            })?;

        let company = if enrichment.company_clean.is_empty() {
            "(no company)"
        } else {
            enrichment.company_clean.as_str()
        };
        info!("[{}/{}] {} -> {}", position + 1, total, username, company);

        enrichments.insert(username.to_string(), enrichment);
    }

    Ok(enrichments)
}

async fn deliver_leads(config: &Config, leads: &[Lead]) -> Result<DeliveryReport, RunError> {
    let client = reqwest::Client::builder()
        .user_agent(config.github.user_agent.clone())
        .build()
        .map_err(|source| RunError::BuildWebhookClient { source })?;

    let outcome = deliver(&client, config.webhook_url.as_deref(), leads, Utc::now()).await?;

    let report = match outcome {
        DeliveryOutcome::Skipped => DeliveryReport::Skipped,
        DeliveryOutcome::Delivered { status } => DeliveryReport::Delivered {
            status: status.as_u16(),
        },
        DeliveryOutcome::Rejected { status, body } => DeliveryReport::Rejected {
            status: status.as_u16(),
            body,
        },
    };

    Ok(report)
}
