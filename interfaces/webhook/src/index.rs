use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

const ACCEPTED: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED];

#[derive(Debug, Serialize)]
pub struct LeadEnvelope<'a, T> {
    pub leads: &'a [T],
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No webhook configured.
    Skipped,
    Delivered { status: StatusCode },
    /// The webhook answered with something other than 200/201/202.
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },
}

/// POSTs `{leads, fetchedAt}` to `url`. A missing URL is a skip, and a
/// refusal by the webhook is reported in the outcome rather than as an error.
pub async fn deliver<T: Serialize>(
    client: &Client,
    url: Option<&str>,
    leads: &[T],
    fetched_at: DateTime<Utc>,
) -> Result<DeliveryOutcome, DeliverError> {
    let Some(url) = url else {
        warn!("no webhook configured, skipping delivery");
        return Ok(DeliveryOutcome::Skipped);
    };

    info!(count = leads.len(), "sending leads to webhook");

    let envelope = LeadEnvelope { leads, fetched_at };
    let response = client
        .post(url)
        .json(&envelope)
        .send()
        .await
        .map_err(|source| DeliverError::RequestSend { source })?;

    let status = response.status();
    if ACCEPTED.contains(&status) {
        info!(status = status.as_u16(), "webhook accepted leads");
        return Ok(DeliveryOutcome::Delivered { status });
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), %body, "webhook rejected leads");

    Ok(DeliveryOutcome::Rejected { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Serialize)]
    struct Row {
        username: &'static str,
        score: i64,
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_is_skipped() {
        let rows = [Row { username: "a", score: 1 }];
        let outcome = deliver(&Client::new(), None, &rows, fetched_at()).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_envelope_is_posted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "leads": [{"username": "octocat", "score": 12}],
                "fetchedAt": "2024-05-01T08:00:00Z"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let rows = [Row { username: "octocat", score: 12 }];
        let url = format!("{}/hook", server.uri());
        let outcome = deliver(&Client::new(), Some(&url), &rows, fetched_at()).await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Delivered { status: StatusCode::ACCEPTED });
    }

    #[tokio::test]
    async fn test_non_accepted_status_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let rows: [Row; 0] = [];
        let url = format!("{}/hook", server.uri());
        let outcome = deliver(&Client::new(), Some(&url), &rows, fetched_at()).await.unwrap();

        assert!(matches!(
            outcome,
            DeliveryOutcome::Rejected { status, .. } if status == StatusCode::NO_CONTENT
        ));
    }

    #[tokio::test]
    async fn test_server_error_body_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let rows = [Row { username: "a", score: 0 }];
        let url = format!("{}/hook", server.uri());
        let outcome = deliver(&Client::new(), Some(&url), &rows, fetched_at()).await.unwrap();

        assert_eq!(
            outcome,
            DeliveryOutcome::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_an_error() {
        let rows = [Row { username: "a", score: 0 }];
        let result = deliver(&Client::new(), Some("http://127.0.0.1:1/hook"), &rows, fetched_at()).await;

        assert!(matches!(result, Err(DeliverError::RequestSend { .. })));
    }
}
