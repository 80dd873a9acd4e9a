use std::collections::HashMap;

use interfaces_github_stargazers::StarEvent;
use interfaces_github_users::Enrichment;

use crate::leads::models::Lead;

/// Folds star events into one lead per username, in first-seen order.
///
/// Later stars by the same user only add the repository, if new. Users
/// without an enrichment entry get an empty one.
pub fn aggregate(events: Vec<StarEvent>, enrichments: &HashMap<String, Enrichment>) -> Vec<Lead> {
    let mut leads: Vec<Lead> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        if let Some(&position) = index.get(&event.username) {
            leads[position].add_repository(event.source_repository);
            continue;
        }

        let enrichment = enrichments
            .get(&event.username)
            .cloned()
            .unwrap_or_default();

        index.insert(event.username.clone(), leads.len());
        leads.push(Lead::from_first_star(event, enrichment));
    }

    leads
}

/// Interest score. Each signal is counted independently:
///
/// | signal | points |
/// |---|---|
/// | cleaned company | 3 |
/// | any public org | 2 |
/// | email | 2 |
/// | each starred repo past the first | 3 |
/// | followers > 100 / > 10 | 2 / 1 |
pub fn score(lead: &Lead) -> i64 {
    let mut score = 0;

    if !lead.company_clean.is_empty() {
        score += 3;
    }

    if lead.org_count > 0 {
        score += 2;
    }

    if lead.profile.has_email() {
        score += 2;
    }

    score += 3 * lead.repos_starred.len().saturating_sub(1) as i64;

    let followers = lead.profile.followers.unwrap_or(0);
    if followers > 100 {
        score += 2;
    } else if followers > 10 {
        score += 1;
    }

    score
}

/// Scores every lead and sorts best first; ties keep their order.
pub fn rank(mut leads: Vec<Lead>) -> Vec<Lead> {
    for lead in &mut leads {
        lead.score = score(lead);
    }

    leads.sort_by(|a, b| b.score.cmp(&a.score));
    leads
}
