// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Duration, TimeZone, Utc};
use wikirace_core::scoring::{full_corpus_rank, latest_for_player, sort_leaderboard, top_n};
use wikirace_core::{rank_and_admit, Leaderboard, ScoreRecord};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

fn score(name: &str, pages: u32, time: f64, submitted: i64) -> ScoreRecord {
    ScoreRecord::new(name, pages, time, at(submitted))
}

/// Ten records, the worst one being {5 pages, 120s, t0}
fn full_window() -> Vec<ScoreRecord> {
    let mut top: Vec<ScoreRecord> = (0..9)
        .map(|i| score(&format!("p{}", i), 2 + (i as u32 % 3), 30.0 + i as f64, i + 1))
        .collect();
    top.push(score("worst", 5, 120.0, 0));
    sort_leaderboard(&mut top);
    top
}

#[test]
fn test_ordering_keys() {
    let fewer_pages = score("a", 3, 500.0, 10);
    let faster = score("b", 4, 10.0, 10);
    let earlier = score("c", 4, 10.0, 5);

    assert!(fewer_pages.sorts_before(&faster));
    assert!(earlier.sorts_before(&faster));
    assert!(!faster.sorts_before(&faster));

    let mut records = vec![faster.clone(), fewer_pages.clone(), earlier.clone()];
    sort_leaderboard(&mut records);
    assert_eq!(records, vec![fewer_pages, earlier, faster]);
}

#[test]
fn test_under_capacity_always_qualifies() {
    let mut existing = vec![score("a", 2, 10.0, 1), score("b", 3, 20.0, 2), score("c", 4, 30.0, 3)];
    sort_leaderboard(&mut existing);

    let hopeless = score("z", 99, 9999.0, 100);
    let result = rank_and_admit(&hopeless, &existing, 10);
    assert!(result.qualifies);
    assert_eq!(result.rank, Some(4));

    let middle = score("m", 3, 5.0, 100);
    assert_eq!(rank_and_admit(&middle, &existing, 10).rank, Some(2));

    let best = score("best", 1, 1.0, 100);
    assert_eq!(rank_and_admit(&best, &existing, 10).rank, Some(1));
}

#[test]
fn test_at_capacity_time_tiebreak_qualifies() {
    let existing = full_window();
    assert_eq!(existing.len(), 10);
    assert_eq!(existing.last().unwrap().name, "worst");

    let candidate = score("new", 5, 119.0, 50);
    let result = rank_and_admit(&candidate, &existing, 10);
    assert!(result.qualifies);
    assert_eq!(result.rank, Some(10));
}

#[test]
fn test_at_capacity_pages_dominate() {
    let existing = full_window();

    let candidate = score("new", 6, 1.0, 50);
    let result = rank_and_admit(&candidate, &existing, 10);
    assert!(!result.qualifies);
    assert_eq!(result.rank, None);
}

#[test]
fn test_exact_tie_with_worst_loses_on_submission_order() {
    let existing = full_window();

    let candidate = score("late", 5, 120.0, 500);
    assert!(!rank_and_admit(&candidate, &existing, 10).qualifies);
}

#[test]
fn test_zero_sized_window_admits_nobody() {
    let candidate = score("a", 1, 1.0, 1);
    let result = rank_and_admit(&candidate, &[], 0);
    assert!(!result.qualifies);
    assert_eq!(result.rank, None);
}

#[test]
fn test_full_corpus_rank_counts_every_better_record() {
    let corpus: Vec<ScoreRecord> = (0..25).map(|i| score("x", 2, i as f64, i)).collect();
    let candidate = score("me", 2, 12.5, 100);
    assert_eq!(full_corpus_rank(&candidate, &corpus), 14);
    assert!(!rank_and_admit(&candidate, &corpus[..10], 10).qualifies);
}

#[test]
fn test_latest_for_player_uses_most_recent_submission() {
    let mut corpus = vec![
        score("dana", 2, 10.0, 1),
        score("omer", 3, 10.0, 2),
        score("dana", 7, 80.0, 3),
    ];
    sort_leaderboard(&mut corpus);

    let standing = latest_for_player(&corpus, "dana").unwrap();
    assert_eq!(standing.record.pages_visited, 7);
    assert_eq!(standing.rank, 3);
    assert!(latest_for_player(&corpus, "nobody").is_none());
}

#[test]
fn test_leaderboard_shows_player_below_window() {
    let mut corpus: Vec<ScoreRecord> = (0..12).map(|i| score(&format!("p{}", i), 2, i as f64, i)).collect();
    corpus.push(score("dana", 9, 300.0, 50));

    let board = Leaderboard::from_corpus(corpus, 10, Some("dana"));
    assert_eq!(board.top.len(), 10);
    assert_eq!(board.top[0].name, "p0");

    let standing = board.standing_outside_window().unwrap();
    assert_eq!(standing.rank, 13);
    assert!((0..10).all(|i| !board.is_player_row(i)));
}

#[test]
fn test_leaderboard_highlights_player_inside_window() {
    let corpus = vec![score("omer", 4, 50.0, 1), score("dana", 2, 70.0, 2)];

    let board = Leaderboard::from_corpus(corpus, 10, Some("dana"));
    assert!(board.standing_outside_window().is_none());
    assert!(board.is_player_row(0));
    assert!(!board.is_player_row(1));
}

#[test]
fn top_n_keeps_the_best_records() {
    let mut corpus = vec![score("omer", 6, 80.0, 1), score("dana", 3, 41.5, 2), score("noa", 3, 12.0, 3)];
    sort_leaderboard(&mut corpus);

    let top = top_n(corpus.clone(), 2);
    assert_eq!(top.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["noa", "dana"]);
    assert_eq!(top_n(corpus.clone(), 10), corpus);
    assert!(top_n(corpus, 0).is_empty());
}
