// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completed-round state machine
//!
//! `InProgress -> Matched -> Scored -> Ranked -> Displayed`
//!
//! A [`Round`] owns its [`GameSession`] exclusively. Each transition is a
//! method that refuses to run from the wrong phase.

use crate::navigation::{GameSession, MatchSnapshot, NavigationEvent, NavigationOutcome};
use crate::scoring::{rank_and_admit, AdmissionResult, ScoreRecord};
use crate::store::{ScoreStore, StoreError};
use crate::NavigationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Player is still navigating
    InProgress,
    /// Target reached, score not yet stored
    Matched,
    /// Score appended to the store
    Scored,
    /// Admission decided against the top-N window
    Ranked,
    /// Result shown to the player
    Displayed,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundPhase::InProgress => "in progress",
            RoundPhase::Matched => "matched",
            RoundPhase::Scored => "scored",
            RoundPhase::Ranked => "ranked",
            RoundPhase::Displayed => "displayed",
        };
        f.write_str(name)
    }
}

/// Errors from driving a round
#[derive(Debug, Error)]
pub enum RoundError {
    /// The action is not valid in the current phase
    #[error("Cannot {action} a round that is {from}")]
    InvalidTransition { from: RoundPhase, action: &'static str },

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Store append or query failed; the round keeps its record for a retry
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One play-through and its scoring
#[derive(Debug, Clone)]
pub struct Round {
    id: Uuid,
    player: String,
    session: GameSession,
    phase: RoundPhase,
    snapshot: Option<MatchSnapshot>,
    record: Option<ScoreRecord>,
    admission: Option<AdmissionResult>,
}

impl Round {
    /// Start a round for `player`
    pub fn new(player: impl Into<String>, session: GameSession) -> Self {
        let id = Uuid::new_v4();
        let player = player.into();
        tracing::info!(
            round = %id,
            player = %player,
            start = %session.start(),
            target = %session.target(),
            "Round started"
        );

        Self {
            id,
            player,
            session,
            phase: RoundPhase::InProgress,
            snapshot: None,
            record: None,
            admission: None,
        }
    }

    fn expect_phase(&self, phase: RoundPhase, action: &'static str) -> Result<(), RoundError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(RoundError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }

    /// Feed a navigation event; on a match the elapsed time is captured at `now`
    pub fn observe(&mut self, event: &NavigationEvent, now: DateTime<Utc>) -> Result<NavigationOutcome, RoundError> {
        self.expect_phase(RoundPhase::InProgress, "navigate")?;

        let outcome = self.session.process_navigation(event)?;
        if outcome.is_match() {
            self.snapshot = self.session.snapshot(now);
            self.phase = RoundPhase::Matched;
            tracing::info!(round = %self.id, snapshot = ?self.snapshot, "Round matched");
        }
        Ok(outcome)
    }

    /// Append the score to `store`.
    ///
    /// The record is built on the first call and reused on retries, so a
    /// failed append can be repeated without re-running match detection.
    pub fn submit(&mut self, store: &mut dyn ScoreStore, submitted_at: DateTime<Utc>) -> Result<&ScoreRecord, RoundError> {
        self.expect_phase(RoundPhase::Matched, "submit")?;

        let record = match (self.record.take(), self.snapshot) {
            (Some(record), _) => record,
            (None, Some(snapshot)) => ScoreRecord::from_snapshot(self.player.clone(), snapshot, submitted_at),
            (None, None) => {
                return Err(RoundError::InvalidTransition {
                    from: self.phase,
                    action: "submit",
                })
            }
        };

        let inserted = store.insert(record.clone());
        let record = self.record.insert(record);
        if let Err(e) = inserted {
            tracing::warn!(round = %self.id, "Score submission failed: {}", e);
            return Err(e.into());
        }

        self.phase = RoundPhase::Scored;
        Ok(record)
    }

    /// Decide admission against the current top-N window.
    ///
    /// The window may already contain this round's record (queried after the
    /// insert); that copy is skipped so the candidate is not compared with
    /// itself.
    pub fn rank(&mut self, existing_top_n: &[ScoreRecord], n: usize) -> Result<AdmissionResult, RoundError> {
        self.expect_phase(RoundPhase::Scored, "rank")?;
        let Some(record) = self.record.as_ref() else {
            return Err(RoundError::InvalidTransition {
                from: self.phase,
                action: "rank",
            });
        };

        let others: Vec<ScoreRecord> = existing_top_n
            .iter()
            .filter(|r| *r != record)
            .cloned()
            .collect();
        let admission = rank_and_admit(record, &others, n);

        tracing::info!(
            round = %self.id,
            qualifies = admission.qualifies,
            rank = ?admission.rank,
            "Round ranked"
        );
        self.admission = Some(admission);
        self.phase = RoundPhase::Ranked;
        Ok(admission)
    }

    /// Mark the result as shown
    pub fn display(&mut self) -> Result<(), RoundError> {
        self.expect_phase(RoundPhase::Ranked, "display")?;
        self.phase = RoundPhase::Displayed;
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Time and pages captured when the target was reached
    pub fn snapshot(&self) -> Option<MatchSnapshot> {
        self.snapshot
    }

    /// The score record, once built by [`Round::submit`]
    pub fn record(&self) -> Option<&ScoreRecord> {
        self.record.as_ref()
    }

    pub fn admission(&self) -> Option<AdmissionResult> {
        self.admission
    }
}
