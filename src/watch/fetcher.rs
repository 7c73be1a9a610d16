//! Per-feed fetching, parsing and recency filtering.

use log::{debug, warn};

use crate::scrape::{DocumentExtractor, Requester};
use crate::timedelta::parse_relative;
use crate::watch::structs::{ParsedActivity, Team};

/// Fetches one team's feed and returns its recent activities.
///
/// Items are walked in feed order, newest first. An item older than
/// `threshold_secs` stops the walk: the feed is reverse-chronological, so
/// everything after it is older still. An unparsable time label stops the
/// walk the same way, since it cannot be trusted to indicate recency.
///
/// Failures are contained here: a transport or extraction error is logged
/// and yields an empty list, it never aborts sibling feeds.
pub async fn fetch_team_activities<R, E>(
    requester: &R,
    extractor: &E,
    team: &Team,
    threshold_secs: i64,
) -> Vec<ParsedActivity>
where
    R: Requester,
    E: DocumentExtractor,
{
    let feed_url = requester.feed_url(&team.name);

    let document = match requester.fetch_feed(&feed_url).await {
        Ok(document) => document,
        Err(e) => {
            warn!("skipping feed of team {}: {}", team.name, e);
            return Vec::new();
        }
    };

    let items = match extractor.activity_items(&document) {
        Ok(items) => items,
        Err(e) => {
            warn!("skipping feed of team {}: {}", team.name, e);
            return Vec::new();
        }
    };

    let mut activities = Vec::new();
    for item in items {
        let age = match parse_relative(&item.time_label) {
            Ok(age) => age,
            Err(e) => {
                warn!(
                    "stopping feed of team {} at unparsable time label: {}",
                    team.name, e
                );
                break;
            }
        };

        // Items at the threshold are kept, strictly older ones end the feed.
        if age.num_seconds() < -threshold_secs {
            debug!(
                "feed of team {} reached stale item ({}), stopping",
                team.name, item.time_label
            );
            break;
        }

        activities.push(ParsedActivity {
            team: team.clone(),
            feed_url: feed_url.clone(),
            age,
            time_label: item.time_label,
            text: item.text,
        });
    }

    debug!(
        "feed of team {} yielded {} recent activities",
        team.name,
        activities.len()
    );

    activities
}
