//! Human-readable run report printed to stdout.

use std::fmt;

use crate::config::Config;
use crate::leads::Lead;
use crate::pipeline::{DeliveryReport, RunSummary};

const RULE: &str = "============================================================";
const TOP_LEADS: usize = 10;

/// Startup banner: token state and what is about to be watched.
pub struct Banner<'a>(pub &'a Config);

impl fmt::Display for Banner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;

        writeln!(f, "{RULE}")?;
        writeln!(f, "GitHub Stargazer Prospector")?;
        writeln!(f, "{RULE}")?;

        if config.github.token.is_some() {
            writeln!(f, "GitHub token configured (5000 requests/hour)")?;
        } else {
            writeln!(f, "No GitHub token, limited to 60 requests/hour")?;
            writeln!(f, "  set GITHUB_TOKEN for a higher rate limit")?;
        }

        writeln!(f, "\nLast {} stargazers per repository", config.max_per_repo)?;
        writeln!(f, "Repos: {}", config.repositories.join(", "))
    }
}

/// `score | username | company` rows for the best `limit` leads.
pub struct TopLeads<'a> {
    pub leads: &'a [Lead],
    pub limit: usize,
}

impl fmt::Display for TopLeads<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Top {} Leads by Score:", self.limit)?;
        writeln!(f, "{RULE}")?;

        for lead in self.leads.iter().take(self.limit) {
            let company = if lead.company_clean.is_empty() {
                "-"
            } else {
                lead.company_clean.as_str()
            };
            writeln!(f, "  {:2} | {:20} | {:30}", lead.score, lead.username, company)?;
        }

        Ok(())
    }
}

pub struct Summary<'a>(pub &'a RunSummary);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;

        writeln!(f)?;
        for (repository, count) in &summary.per_repository {
            writeln!(f, "  {repository}: {count} stargazers")?;
        }
        writeln!(f, "Total stargazers found: {}", summary.total_stargazers)?;

        if summary.total_stargazers == 0 {
            return writeln!(f, "No stargazers found. Nothing to deliver.");
        }

        writeln!(f, "Final lead count: {}\n", summary.leads.len())?;
        write!(
            f,
            "{}",
            TopLeads {
                leads: &summary.leads,
                limit: TOP_LEADS,
            }
        )?;

        if let Some(path) = &summary.snapshot {
            writeln!(f, "\nSaved {} leads to {}", summary.leads.len(), path.display())?;
        }

        match &summary.delivery {
            Some(DeliveryReport::Skipped) => writeln!(f, "No webhook configured, delivery skipped")?,
            Some(DeliveryReport::Delivered { status }) => writeln!(f, "Delivered to webhook ({status})")?,
            Some(DeliveryReport::Rejected { status, body }) => {
                writeln!(f, "Webhook delivery failed: {status} - {body}")?
            }
            None => {}
        }

        writeln!(f, "\nDone!")
    }
}
