// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaderboard ordering, ranking and top-N admission
//!
//! Scores are ordered by pages visited, then time taken, then submission
//! instant, all ascending. Submission instants are unique, so the order is
//! total.

use crate::navigation::MatchSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One completed round as stored in the score collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Player name
    pub name: String,
    /// Pages visited, including the start page
    pub pages_visited: u32,
    /// Seconds from round start to reaching the target
    #[serde(rename = "timeTaken")]
    pub time_taken_seconds: f64,
    /// When the score was submitted
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Create a new score record
    pub fn new(
        name: impl Into<String>,
        pages_visited: u32,
        time_taken_seconds: f64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            pages_visited,
            time_taken_seconds,
            submitted_at,
        }
    }

    /// Build the record for a finished session
    pub fn from_snapshot(name: impl Into<String>, snapshot: MatchSnapshot, submitted_at: DateTime<Utc>) -> Self {
        Self::new(name, snapshot.pages_visited, snapshot.time_taken_seconds, submitted_at)
    }

    /// Compare two records in leaderboard order (better first)
    pub fn leaderboard_cmp(&self, other: &ScoreRecord) -> Ordering {
        self.pages_visited
            .cmp(&other.pages_visited)
            .then_with(|| self.time_taken_seconds.total_cmp(&other.time_taken_seconds))
            .then_with(|| self.submitted_at.cmp(&other.submitted_at))
    }

    /// True if `self` ranks strictly above `other`
    pub fn sorts_before(&self, other: &ScoreRecord) -> bool {
        self.leaderboard_cmp(other) == Ordering::Less
    }
}

/// Outcome of checking a candidate against the top-N window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionResult {
    /// Whether the candidate enters the top N
    pub qualifies: bool,
    /// 1-based rank inside the window, `None` when not admitted
    pub rank: Option<usize>,
}

/// Decide whether `candidate` enters the leaderboard window.
///
/// `existing_top_n` must be the current top `n` records in leaderboard order,
/// freshly queried from the whole corpus. Records past index `n` are ignored.
pub fn rank_and_admit(candidate: &ScoreRecord, existing_top_n: &[ScoreRecord], n: usize) -> AdmissionResult {
    let window = &existing_top_n[..existing_top_n.len().min(n)];

    let qualifies = if window.len() < n {
        true
    } else {
        window.last().is_some_and(|worst| candidate.sorts_before(worst))
    };

    if !qualifies {
        return AdmissionResult { qualifies, rank: None };
    }

    let ahead = window.iter().filter(|r| r.sorts_before(candidate)).count();
    AdmissionResult {
        qualifies,
        rank: Some(ahead + 1),
    }
}

/// 1-based rank of `candidate` within an arbitrary, possibly unsorted corpus.
///
/// Scans every record; use it for display of out-of-window players only.
pub fn full_corpus_rank(candidate: &ScoreRecord, corpus: &[ScoreRecord]) -> usize {
    corpus.iter().filter(|r| r.sorts_before(candidate)).count() + 1
}

/// Sort records into leaderboard order
pub fn sort_leaderboard(records: &mut [ScoreRecord]) {
    records.sort_by(ScoreRecord::leaderboard_cmp);
}

/// The first `n` records of an already sorted list
pub fn top_n(mut sorted: Vec<ScoreRecord>, n: usize) -> Vec<ScoreRecord> {
    sorted.truncate(n);
    sorted
}

/// A player's own record and its rank in the whole corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub record: ScoreRecord,
    pub rank: usize,
}

/// The player's most recently submitted record and its full-corpus rank
pub fn latest_for_player(corpus: &[ScoreRecord], name: &str) -> Option<PlayerStanding> {
    let record = corpus
        .iter()
        .filter(|r| r.name == name)
        .max_by_key(|r| r.submitted_at)?;

    Some(PlayerStanding {
        rank: full_corpus_rank(record, corpus),
        record: record.clone(),
    })
}

/// Displayed leaderboard: the top-N window plus the viewing player's standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub size: usize,
    pub top: Vec<ScoreRecord>,
    pub standing: Option<PlayerStanding>,
}

impl Leaderboard {
    /// Build the leaderboard from the full corpus
    pub fn from_corpus(mut corpus: Vec<ScoreRecord>, size: usize, player: Option<&str>) -> Self {
        sort_leaderboard(&mut corpus);
        let standing = player.and_then(|name| latest_for_player(&corpus, name));

        Self {
            size,
            top: top_n(corpus, size),
            standing,
        }
    }

    /// The player's standing when it falls below the window
    pub fn standing_outside_window(&self) -> Option<&PlayerStanding> {
        self.standing.as_ref().filter(|s| s.rank > self.size)
    }

    /// True if the row at `index` in `top` is the player's own record
    pub fn is_player_row(&self, index: usize) -> bool {
        match (&self.standing, self.top.get(index)) {
            (Some(standing), Some(row)) => standing.record == *row,
            _ => false,
        }
    }
}

/// Issues strictly increasing submission instants
#[derive(Debug, Clone, Default)]
pub struct SubmissionClock {
    last: Option<DateTime<Utc>>,
}

impl SubmissionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume after the latest instant already present in a corpus
    pub fn resume_after(last: Option<DateTime<Utc>>) -> Self {
        Self { last }
    }

    /// Return `now`, bumped past the previously issued instant if needed
    pub fn issue(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.last {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.last = Some(next);
        next
    }
}
