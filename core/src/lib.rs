// SPDX-License-Identifier: MIT OR Apache-2.0

//! WikiRace Core - Navigation Matching and Leaderboard Logic
//!
//! This crate provides the core game functionality including:
//! - Article identifier extraction and normalization from navigation URLs
//! - The per-round navigation session (visit counting, target detection)
//! - Leaderboard ordering, ranking and top-N admission
//! - The round state machine tying a session to a score store
//! - Popular title lists, configuration and CBOR helpers

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod article;
pub mod cbor;
pub mod config;
pub mod host;
pub mod navigation;
pub mod round;
pub mod scoring;
pub mod store;
pub mod titles;

use thiserror::Error;

pub use article::{article_url, ArticleIdentifier, UrlError};
pub use navigation::{GameSession, MatchSnapshot, NavigationEvent, NavigationOutcome};
pub use round::{Round, RoundError, RoundPhase};
pub use scoring::{rank_and_admit, AdmissionResult, Leaderboard, ScoreRecord};
pub use store::{FileScoreStore, MemoryScoreStore, ScoreStore, StoreError};

/// Default number of rows in the displayed leaderboard window
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Errors raised while feeding navigation events to a session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The session already reached its target and accepts no more events
    #[error("Session already reached its target")]
    SessionTerminated,

    /// The navigation event carried no URL
    #[error("Navigation event has an empty URL")]
    EmptyUrl,
}
