//! Extraction of structured data from fetched site documents.
//!
//! The pipeline never looks at markup itself: everything it needs from a page
//! goes through the narrow [`DocumentExtractor`] seam, so the markup-specific
//! part can be swapped without touching the control flow.

use mockall::automock;
use scraper::{Html, Selector};

use crate::error::WatchError;
use crate::watch::structs::{RawActivityItem, Team};

/// Extraction contract between the pipeline and the site's markup.
#[automock]
pub trait DocumentExtractor {
    /// Extracts the team links from the authenticated landing page.
    ///
    /// Only team-page links are returned; the reserved `my` pagination entry
    /// of the navigation menu is excluded. Duplicates are returned as found,
    /// deduplication is the caller's concern.
    fn team_links(&self, html: &str) -> Result<Vec<Team>, WatchError>;

    /// Extracts the ordered activity items from one feed document.
    ///
    /// Items are returned in feed order, newest first.
    fn activity_items(&self, html: &str) -> Result<Vec<RawActivityItem>, WatchError>;
}

/// [`DocumentExtractor`] implementation for the site's HTML pages.
///
/// Team links live in the navigation list following the `#user-menu` element;
/// activity items are the `li` children of `#activity-list`, each carrying a
/// `.timestamp` label.
pub struct HtmlExtractor;

fn selector(css: &str) -> Selector {
    // All selectors in this module are static and known-valid.
    Selector::parse(css).expect("static selector")
}

/// Returns the team name for a navigation href of the form
/// `.../teams/<name>/`, or `None` for any other link.
fn team_name_from_href(href: &str) -> Option<&str> {
    let mut segments = href.trim_end_matches('/').rsplit('/');
    let name = segments.next()?;
    if segments.next()? != "teams" || name.is_empty() {
        return None;
    }
    Some(name)
}

fn normalized_text(element: scraper::ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl DocumentExtractor for HtmlExtractor {
    fn team_links(&self, html: &str) -> Result<Vec<Team>, WatchError> {
        let document = Html::parse_document(html);

        let nav = document
            .select(&selector("#user-menu ~ ul"))
            .next()
            .ok_or_else(|| WatchError::Extract {
                what: "team navigation menu".to_owned(),
            })?;

        let mut teams = Vec::new();
        for anchor in nav.select(&selector("a")) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(name) = team_name_from_href(href) else {
                continue;
            };
            // The paged "my teams" listing link lives in the same menu.
            if name == "my" {
                continue;
            }
            teams.push(Team {
                name: name.to_owned(),
                path: href.to_owned(),
            });
        }

        Ok(teams)
    }

    fn activity_items(&self, html: &str) -> Result<Vec<RawActivityItem>, WatchError> {
        let document = Html::parse_document(html);

        let list = document
            .select(&selector("#activity-list"))
            .next()
            .ok_or_else(|| WatchError::Extract {
                what: "activity list".to_owned(),
            })?;

        let timestamp_selector = selector(".timestamp");
        let mut items = Vec::new();
        for item in list.select(&selector("li")) {
            let timestamp = item.select(&timestamp_selector).next().ok_or_else(|| {
                WatchError::Extract {
                    what: "timestamp on activity item".to_owned(),
                }
            })?;
            items.push(RawActivityItem {
                time_label: normalized_text(timestamp),
                text: normalized_text(item),
            });
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDING: &str = r#"
        <html><body>
          <div id="user-menu">watcher</div>
          <ul>
            <li><a href="/en/teams/alpha/">Alpha Team</a></li>
            <li><a href="/en/teams/beta/">Beta Team</a></li>
            <li><a href="/en/teams/my/">My teams</a></li>
            <li><a href="/en/profile/">Profile</a></li>
            <li><a>broken</a></li>
          </ul>
        </body></html>"#;

    #[test]
    fn test_team_links_extracts_team_pages_only() {
        let teams = HtmlExtractor.team_links(LANDING).unwrap();

        assert_eq!(
            teams,
            vec![
                Team {
                    name: "alpha".to_string(),
                    path: "/en/teams/alpha/".to_string(),
                },
                Team {
                    name: "beta".to_string(),
                    path: "/en/teams/beta/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_team_links_fails_without_navigation() {
        // What the landing page looks like when the login was rejected.
        let error = HtmlExtractor
            .team_links("<html><body>Sign in</body></html>")
            .unwrap_err();

        assert!(matches!(error, WatchError::Extract { .. }));
    }

    #[test]
    fn test_activity_items_in_feed_order() {
        let feed = r#"
            <html><body>
              <ul id="activity-list">
                <li><span class="timestamp">3 minutes ago</span> X added a video to the Y playlist</li>
                <li><span class="timestamp">1 day, 5 hours ago</span> Z endorsed Q (transcriber)</li>
              </ul>
            </body></html>"#;

        let items = HtmlExtractor.activity_items(feed).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].time_label, "3 minutes ago");
        assert_eq!(items[0].text, "3 minutes ago X added a video to the Y playlist");
        assert_eq!(items[1].time_label, "1 day, 5 hours ago");
    }

    #[test]
    fn test_activity_items_fails_without_list() {
        let error = HtmlExtractor
            .activity_items("<html><body></body></html>")
            .unwrap_err();

        assert!(matches!(
            error,
            WatchError::Extract { what } if what == "activity list"
        ));
    }

    #[test]
    fn test_activity_items_fails_without_timestamp() {
        let feed = r#"<ul id="activity-list"><li>no label here</li></ul>"#;
        let error = HtmlExtractor.activity_items(feed).unwrap_err();

        assert!(matches!(error, WatchError::Extract { .. }));
    }

    #[test]
    fn test_team_name_from_href() {
        assert_eq!(team_name_from_href("/en/teams/alpha/"), Some("alpha"));
        assert_eq!(team_name_from_href("/teams/beta"), Some("beta"));
        assert_eq!(team_name_from_href("/en/profile/"), None);
        assert_eq!(team_name_from_href("/"), None);
    }
}
