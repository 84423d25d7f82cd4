// SPDX-License-Identifier: MIT OR Apache-2.0

//! Popular article titles and round setup

use crate::article::{article_url, ArticleIdentifier};
use crate::navigation::GameSession;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Default cap on the popular titles list
pub const DEFAULT_POPULAR_TITLES_LIMIT: usize = 5000;

const SPECIAL_PREFIX: &str = "Special:";
const MAIN_PAGE: &str = "Main_Page";

/// Errors from loading titles or setting up a round
#[derive(Debug, Error)]
pub enum TitlesError {
    #[error("Failed to read titles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Titles file is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A round needs two different titles
    #[error("Need at least two distinct titles, got {0}")]
    NotEnoughTitles(usize),
}

/// Drop special pages and the main page, remove duplicates keeping the first
/// occurrence, and cap the list at `limit`
pub fn filter_popular_titles<I>(raw: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|t| !t.starts_with(SPECIAL_PREFIX) && t != MAIN_PAGE)
        .filter(|t| seen.insert(t.clone()))
        .take(limit)
        .collect()
}

/// Read a JSON array of titles
pub fn load_titles(path: &Path) -> Result<Vec<String>, TitlesError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a JSON array of titles
pub fn save_titles(path: &Path, titles: &[String]) -> Result<(), TitlesError> {
    let json = serde_json::to_string_pretty(titles)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// The start and target articles of a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSetup {
    pub start_title: String,
    pub target_title: String,
    pub start_url: String,
    pub target_url: String,
}

impl RoundSetup {
    /// Build the setup, with article URLs on `host`
    pub fn new(host: &str, start_title: impl Into<String>, target_title: impl Into<String>) -> Self {
        let start_title = start_title.into();
        let target_title = target_title.into();
        Self {
            start_url: article_url(host, &start_title),
            target_url: article_url(host, &target_title),
            start_title,
            target_title,
        }
    }

    /// A fresh session for this setup
    pub fn session(&self, started_at: DateTime<Utc>) -> GameSession {
        GameSession::from_urls(&self.start_url, &self.target_url, started_at)
    }
}

/// Pick start and target titles naming different articles at random
pub fn pick_round<R: Rng + ?Sized>(host: &str, titles: &[String], rng: &mut R) -> Result<RoundSetup, TitlesError> {
    let distinct: Vec<&String> = {
        let mut seen = HashSet::new();
        titles
            .iter()
            .filter(|t| seen.insert(ArticleIdentifier::from_title(t)))
            .collect()
    };
    if distinct.len() < 2 {
        return Err(TitlesError::NotEnoughTitles(distinct.len()));
    }

    let mut picked = distinct.choose_multiple(rng, 2);
    match (picked.next(), picked.next()) {
        (Some(start), Some(target)) => Ok(RoundSetup::new(host, start.as_str(), target.as_str())),
        _ => Err(TitlesError::NotEnoughTitles(distinct.len())),
    }
}

/// The fixed articles of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyArticles {
    pub start_article_title: String,
    pub target_article_title: String,
}

impl DailyArticles {
    pub fn into_setup(self, host: &str) -> RoundSetup {
        RoundSetup::new(host, self.start_article_title, self.target_article_title)
    }
}
