//! Error types for the watch pipeline.
//!
//! Only two failures abort a run: [`WatchError::Auth`] (no session, nothing to
//! fetch) and [`WatchError::Dispatch`] (the alert could not be delivered).
//! Everything else is contained at the feed-task boundary and degrades to
//! "zero activities from this feed".

/// Errors raised by the watch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The login handshake did not yield an authenticated session.
    ///
    /// Fatal: the run aborts before any feed is fetched.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// Network or transport failure while fetching one feed.
    ///
    /// Contained to the affected feed; sibling fetches continue.
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An expected document region was absent from a fetched page.
    ///
    /// Contained to the affected feed, same as [`WatchError::Fetch`].
    #[error("expected document region missing: {what}")]
    Extract { what: String },

    /// A configured alert pattern could not be compiled.
    #[error("invalid alert pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The outbound alert call failed.
    ///
    /// Surfaced as the run's terminal status; not retried within the run.
    #[error("alert dispatch failed: {reason}")]
    Dispatch { reason: String },
}

/// Errors raised when parsing a relative time label.
///
/// An unparsable label on an activity item is treated like a stale item:
/// processing of that feed stops, the run continues.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// A comma-separated component did not match `<integer> <unit>[s] [ago]`.
    #[error("malformed time component {input:?}")]
    Malformed { input: String },

    /// The unit word is not in the known unit table.
    #[error("unknown time unit {unit:?}")]
    UnknownUnit { unit: String },
}
