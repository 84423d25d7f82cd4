// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navigation session and target detection
//!
//! A [`GameSession`] is fed the URLs reported by the embedded article view,
//! one at a time and in order. The first report is the page the round
//! started on and is never counted. A report identical to the previous URL is
//! a redundant callback and is ignored. Every other report counts as a page
//! visit and is checked against the target article.

use crate::article::ArticleIdentifier;
use crate::NavigationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page change reported by the article view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    /// Raw URL of the displayed page
    pub url: String,
}

impl NavigationEvent {
    /// Create a new navigation event
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// What a single navigation event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// First report after the round started, not counted
    InitialLoad,
    /// Same URL as the previous report
    Duplicate,
    /// A new page that is not the target
    Visited,
    /// The target article was reached
    Matched,
}

impl NavigationOutcome {
    /// True only for the event that reached the target
    pub fn is_match(&self) -> bool {
        matches!(self, NavigationOutcome::Matched)
    }
}

/// Time and page count captured when the target was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time_taken_seconds: f64,
    pub pages_visited: u32,
}

/// State of one play-through from start article to target article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    start: ArticleIdentifier,
    target: ArticleIdentifier,
    started_at: DateTime<Utc>,
    page_visit_count: u32,
    previous_url: String,
    is_initial_load: bool,
    matched: bool,
}

impl GameSession {
    /// Create a session racing towards `target`
    pub fn new(start: ArticleIdentifier, target: ArticleIdentifier, started_at: DateTime<Utc>) -> Self {
        Self {
            start,
            target,
            started_at,
            page_visit_count: 1,
            previous_url: String::new(),
            is_initial_load: true,
            matched: false,
        }
    }

    /// Create a session from the start and target article URLs.
    ///
    /// The target identifier is extracted exactly like the identifiers of
    /// visited pages, so titles containing `#` or `?` still compare equal.
    pub fn from_urls(start_url: &str, target_url: &str, started_at: DateTime<Utc>) -> Self {
        Self::new(
            ArticleIdentifier::from_url(start_url),
            ArticleIdentifier::from_url(target_url),
            started_at,
        )
    }

    /// Feed one navigation event
    pub fn process_navigation(
        &mut self,
        event: &NavigationEvent,
    ) -> Result<NavigationOutcome, NavigationError> {
        if self.matched {
            return Err(NavigationError::SessionTerminated);
        }
        if event.url.is_empty() {
            return Err(NavigationError::EmptyUrl);
        }

        if self.is_initial_load {
            self.is_initial_load = false;
            self.previous_url = event.url.clone();
            tracing::debug!("Initial load of {}, not counted", event.url);
            return Ok(NavigationOutcome::InitialLoad);
        }

        if event.url == self.previous_url {
            tracing::debug!("Duplicate navigation callback for {}", event.url);
            return Ok(NavigationOutcome::Duplicate);
        }

        self.page_visit_count += 1;
        self.previous_url = event.url.clone();

        let current = ArticleIdentifier::from_url(&event.url);
        tracing::debug!(
            current = %current,
            target = %self.target,
            pages = self.page_visit_count,
            "Page visited"
        );

        if current.matches(&self.target) {
            self.matched = true;
            tracing::info!("Target {} reached after {} pages", self.target, self.page_visit_count);
            Ok(NavigationOutcome::Matched)
        } else {
            Ok(NavigationOutcome::Visited)
        }
    }

    /// Time since the round started, zero if `now` precedes the start
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.started_at).max(chrono::Duration::zero())
    }

    /// Elapsed seconds rounded to hundredths
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        let millis = self.elapsed(now).num_milliseconds() as f64;
        (millis / 10.0).round() / 100.0
    }

    /// Capture time taken and pages visited. Only available once matched;
    /// call it in the same step that observed [`NavigationOutcome::Matched`].
    pub fn snapshot(&self, now: DateTime<Utc>) -> Option<MatchSnapshot> {
        self.matched.then(|| MatchSnapshot {
            time_taken_seconds: self.elapsed_seconds(now),
            pages_visited: self.page_visit_count,
        })
    }

    pub fn start(&self) -> &ArticleIdentifier {
        &self.start
    }

    pub fn target(&self) -> &ArticleIdentifier {
        &self.target
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn page_visit_count(&self) -> u32 {
        self.page_visit_count
    }

    pub fn previous_url(&self) -> &str {
        &self.previous_url
    }

    pub fn is_initial_load(&self) -> bool {
        self.is_initial_load
    }

    /// True once the target was reached; the session is then terminal
    pub fn is_matched(&self) -> bool {
        self.matched
    }
}
