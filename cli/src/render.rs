// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of the leaderboard and round results for the CLI.

use wikirace_core::scoring::PlayerStanding;
use wikirace_core::{AdmissionResult, Leaderboard, MatchSnapshot, ScoreRecord};

const NAME_WIDTH: usize = 20;

/// Render the leaderboard as a fixed-width table.
///
/// The player's own row is marked with `*`. When the player ranks below the
/// window their row is printed after an elision.
pub fn render_leaderboard(board: &Leaderboard) -> String {
    let mut output = String::new();

    output.push_str("  Leaderboard\n");
    output.push_str(&format!(
        "  {:>4}  {:<width$}  {:>5}  {:>10}\n",
        "Rank",
        "Name",
        "Pages",
        "Time",
        width = NAME_WIDTH
    ));

    if board.top.is_empty() {
        output.push_str("  (no scores yet)\n");
        return output;
    }

    for (index, record) in board.top.iter().enumerate() {
        output.push_str(&render_row(index + 1, record, board.is_player_row(index)));
    }

    if let Some(PlayerStanding { record, rank }) = board.standing_outside_window() {
        output.push_str("     .\n     .\n     .\n");
        output.push_str(&render_row(*rank, record, true));
    }

    output
}

fn render_row(rank: usize, record: &ScoreRecord, own: bool) -> String {
    let marker = if own { '*' } else { ' ' };
    format!(
        "{}{:>4}. {:<width$}  {:>5}  {:>9.2}s\n",
        marker,
        rank,
        truncate(&record.name, NAME_WIDTH),
        record.pages_visited,
        record.time_taken_seconds,
        width = NAME_WIDTH
    )
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut cut: String = name.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

/// One-line running clock shown while the round is in progress
pub fn render_clock(elapsed_seconds: f64, pages: u32) -> String {
    format!("Time: {:.2}s  Pages: {}", elapsed_seconds, pages)
}

/// Summary printed when the target is reached
pub fn render_finish(target: &str, snapshot: &MatchSnapshot) -> String {
    format!(
        "Well done! Reached {} in {:.2} seconds, visiting {} pages.",
        target, snapshot.time_taken_seconds, snapshot.pages_visited
    )
}

pub fn render_admission(admission: &AdmissionResult, size: usize) -> String {
    match admission.rank {
        Some(rank) if admission.qualifies => format!("New high score! You placed #{} in the top {}.", rank, size),
        _ => format!("Not in the top {} this time.", size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn score(name: &str, pages: u32, time: f64, secs: i64) -> ScoreRecord {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ScoreRecord::new(name, pages, time, t + Duration::seconds(secs))
    }

    #[test]
    fn test_marks_player_row() {
        let board = Leaderboard::from_corpus(
            vec![score("omer", 4, 50.0, 1), score("dana", 2, 70.5, 2)],
            10,
            Some("dana"),
        );
        let text = render_leaderboard(&board);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[2].starts_with("*   1. dana"));
        assert!(lines[2].ends_with("70.50s"));
        assert!(lines[3].starts_with("    2. omer"));
        assert!(!text.contains(" .\n"));
    }

    #[test]
    fn test_player_below_window() {
        let mut corpus: Vec<ScoreRecord> = (0..3).map(|i| score(&format!("p{}", i), 2, i as f64, i)).collect();
        corpus.push(score("dana", 8, 99.0, 10));

        let text = render_leaderboard(&Leaderboard::from_corpus(corpus, 2, Some("dana")));
        assert!(text.contains("     .\n"));
        assert!(text.trim_end().lines().last().unwrap().starts_with("*   4. dana"));
    }

    #[test]
    fn test_empty_board() {
        let text = render_leaderboard(&Leaderboard::from_corpus(Vec::new(), 10, None));
        assert!(text.contains("(no scores yet)"));
    }

    #[test]
    fn test_long_names_are_truncated() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("abcdefghijklmnopqrstuvwxyz", 5).chars().count(), 5);
    }

    #[test]
    fn test_admission_text() {
        let admitted = AdmissionResult { qualifies: true, rank: Some(3) };
        assert_eq!(render_admission(&admitted, 10), "New high score! You placed #3 in the top 10.");
        let rejected = AdmissionResult { qualifies: false, rank: None };
        assert_eq!(render_admission(&rejected, 10), "Not in the top 10 this time.");
    }
}
