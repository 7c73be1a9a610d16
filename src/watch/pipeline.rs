//! Run orchestration: bootstrap, bounded fan-out, matching, dispatch.
//!
//! This module provides the [`Watcher`] struct that drives one stateless run
//! end to end. It interacts with the site through a [`Requester`] and a
//! [`DocumentExtractor`] implementation and delivers the aggregated alert
//! through a [`Notify`] implementation, so the whole flow is testable with
//! mocks.

use futures::future::join_all;
use log::{debug, info};

use crate::error::WatchError;
use crate::notify::{DispatchOutcome, Notify};
use crate::scrape::{Credentials, DocumentExtractor, Requester};
use crate::watch::fetcher::fetch_team_activities;
use crate::watch::limiter::FetchGate;
use crate::watch::matcher::{AlertPattern, match_activities};
use crate::watch::structs::Team;

/// Counters reported by a completed run.
///
/// Reported regardless of partial per-feed failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Teams discovered during bootstrap, after deduplication.
    pub teams_discovered: usize,
    /// Activities within the recency window, across all feeds.
    pub activities_seen: usize,
    /// Activities left after pattern matching.
    pub activities_matched: usize,
    /// Whether an alert went out.
    pub dispatch: DispatchOutcome,
}

/// Drives one watch run.
///
/// A run is stateless: bootstrap a session, fetch every discovered feed under
/// the admission gate, flatten, match, dispatch at most one alert. Nothing is
/// carried over to the next run.
pub struct Watcher<R, E, N>
where
    R: Requester,
    E: DocumentExtractor,
    N: Notify,
{
    /// Site access under one shared authenticated session.
    requester: R,
    /// Markup-specific extraction seam.
    extractor: E,
    /// Outbound alert delivery.
    notifier: N,
    /// Gate bounding simultaneous in-flight fetches.
    gate: FetchGate,
    /// Maximum age in seconds an activity may have.
    threshold_secs: i64,
    /// Compiled alert pattern set.
    patterns: Vec<AlertPattern>,
}

impl<R, E, N> Watcher<R, E, N>
where
    R: Requester,
    E: DocumentExtractor,
    N: Notify,
{
    /// Create a new [Watcher].
    ///
    /// # Arguments
    ///
    /// * `requester` - site access implementation.
    /// * `extractor` - document extraction implementation.
    /// * `notifier` - alert delivery implementation.
    /// * `concurrency` - how many feeds may be fetched at once.
    /// * `threshold_secs` - recency window in seconds.
    /// * `patterns` - compiled alert pattern set.
    pub fn new(
        requester: R,
        extractor: E,
        notifier: N,
        concurrency: usize,
        threshold_secs: i64,
        patterns: Vec<AlertPattern>,
    ) -> Self {
        Watcher {
            requester,
            extractor,
            notifier,
            gate: FetchGate::new(concurrency),
            threshold_secs,
            patterns,
        }
    }

    /// Runs the pipeline once.
    ///
    /// Steps:
    ///
    /// 1. Login and discover the team list from the landing page.
    /// 2. Start one fetch task per team; every task blocks on a gate permit
    ///    before issuing its request, so at most `concurrency` fetches are in
    ///    flight. All tasks share the requester's session.
    /// 3. Flatten the per-feed results in completion order and match them
    ///    against the alert pattern set.
    /// 4. Hand the matched set to the notifier, which sends at most one
    ///    aggregated alert.
    ///
    /// Per-feed failures degrade to zero activities from that feed; only
    /// bootstrap and dispatch failures abort the run.
    ///
    /// # Errors
    ///
    /// * [`WatchError::Auth`] when no session can be established or the
    ///   landing page carries no team navigation (wrong credentials).
    /// * [`WatchError::Dispatch`] when the outbound alert call fails.
    pub async fn run(&self, credentials: &Credentials) -> Result<RunReport, WatchError> {
        let teams = self.bootstrap(credentials).await?;
        info!("total teams to scrape: {}", teams.len());

        let fetches = teams.iter().map(|team| async move {
            let _permit = self.gate.acquire().await;
            fetch_team_activities(&self.requester, &self.extractor, team, self.threshold_secs)
                .await
        });

        let activities: Vec<_> = join_all(fetches).await.into_iter().flatten().collect();
        info!("total activities before filtering: {}", activities.len());

        let activities_seen = activities.len();
        let matched = match_activities(activities, &self.patterns);
        info!("total activities after filtering: {}", matched.len());
        for activity in matched.iter().take(10) {
            debug!("matched: {}", activity);
        }

        let dispatch = self.notifier.dispatch(&matched).await?;

        Ok(RunReport {
            teams_discovered: teams.len(),
            activities_seen,
            activities_matched: matched.len(),
            dispatch,
        })
    }

    /// Logs in and extracts the deduplicated team list.
    ///
    /// An extraction failure on the landing page is reported as an
    /// authentication failure: the navigation region is only present for a
    /// logged-in account.
    async fn bootstrap(&self, credentials: &Credentials) -> Result<Vec<Team>, WatchError> {
        let landing = self.requester.login(credentials).await?;

        let links = self
            .extractor
            .team_links(&landing)
            .map_err(|e| WatchError::Auth {
                reason: format!("landing page has no team navigation ({e}), wrong credentials?"),
            })?;

        // The navigation menu may list a team more than once.
        let mut teams: Vec<Team> = Vec::new();
        for team in links {
            if teams.iter().any(|known| known.name == team.name) {
                debug!("ignoring duplicate team link {}", team);
                continue;
            }
            teams.push(team);
        }

        // An account in no teams is a valid, empty run; only the missing
        // navigation region above signals a rejected login.
        Ok(teams)
    }
}
