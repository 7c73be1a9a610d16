//! Aggregated alert building and webhook delivery.

use log::{debug, info};
use mockall::automock;
use reqwest::Client;

use crate::error::WatchError;
use crate::watch::structs::ParsedActivity;

/// The single aggregated notification of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Distinct matched team names, semicolon-joined. Sized for an SMS.
    pub summary: String,
    /// One line per matched activity: team name and feed URL.
    pub detail: String,
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing matched, no call was made.
    Skipped,
    /// The alert was delivered.
    Sent,
}

/// Builds the aggregated alert message, or `None` when nothing matched.
///
/// Each distinct team name appears exactly once in the summary, in first-seen
/// order.
pub fn build_message(matched: &[ParsedActivity]) -> Option<AlertMessage> {
    if matched.is_empty() {
        return None;
    }

    let mut team_names: Vec<&str> = Vec::new();
    for activity in matched {
        if !team_names.contains(&activity.team.name.as_str()) {
            team_names.push(&activity.team.name);
        }
    }

    let detail = matched
        .iter()
        .map(|activity| format!("Team: {}, URL: {}\n", activity.team.name, activity.feed_url))
        .collect();

    Some(AlertMessage {
        summary: team_names.join(";"),
        detail,
    })
}

/// Trait for sending the aggregated alert.
///
/// This trait abstracts the outbound call for easier testing with mocks.
#[automock]
pub trait Notify {
    /// Sends at most one alert for the matched activities.
    async fn dispatch(&self, matched: &[ParsedActivity]) -> Result<DispatchOutcome, WatchError>;
}

/// [`Notify`] implementation posting to a webhook endpoint.
///
/// The payload is the two-field JSON shape the webhook service expects:
/// `value1` carries the summary, `value2` the detail body.
pub struct WebhookNotifier {
    /// Full webhook URL, including the trigger key.
    url: String,
    /// HTTP client
    client: Client,
}

impl WebhookNotifier {
    /// Create a new [WebhookNotifier] posting to `url`.
    pub fn new(url: &str) -> Self {
        WebhookNotifier {
            url: url.to_string(),
            client: Client::new(),
        }
    }
}

impl Notify for WebhookNotifier {
    /// Posts the aggregated alert, exactly once per run.
    ///
    /// An empty matched set is a no-op. A transport failure or a non-success
    /// status fails with [`WatchError::Dispatch`]; the call is not retried.
    async fn dispatch(&self, matched: &[ParsedActivity]) -> Result<DispatchOutcome, WatchError> {
        let Some(message) = build_message(matched) else {
            info!("no matched activities, skipping alert");
            return Ok(DispatchOutcome::Skipped);
        };

        let payload = serde_json::json!({
            "value1": message.summary,
            "value2": message.detail,
        });
        debug!("dispatching alert payload {}", payload);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::Dispatch {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Dispatch {
                reason: format!("webhook answered {status}"),
            });
        }

        info!("alert sent for teams [{}], status {}", message.summary, status);

        Ok(DispatchOutcome::Sent)
    }
}
