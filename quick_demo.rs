//! Quick WikiRace Demo - plays one scripted round against an in-memory store

use anyhow::Result;
use chrono::{Duration, Utc};
use wikirace_core::scoring::SubmissionClock;
use wikirace_core::titles::RoundSetup;
use wikirace_core::{Leaderboard, MemoryScoreStore, NavigationEvent, Round, ScoreRecord, ScoreStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let started = Utc::now();
    let setup = RoundSetup::new("he.m.wikipedia.org", "Haifa", "Israel");

    // A few earlier scores so the leaderboard is not empty
    let mut store = MemoryScoreStore::with_records(vec![
        ScoreRecord::new("omer", 4, 65.0, started - Duration::hours(3)),
        ScoreRecord::new("noa", 2, 31.5, started - Duration::hours(2)),
        ScoreRecord::new("yael", 3, 12.25, started - Duration::hours(1)),
    ]);

    let mut round = Round::new("demo", setup.session(started));
    let visits = [
        (setup.start_url.clone(), 0),
        ("https://he.m.wikipedia.org/wiki/History_of_Israel".to_string(), 7),
        ("https://he.m.wikipedia.org/wiki/History_of_Israel".to_string(), 7),
        (setup.target_url.clone(), 19),
    ];

    for (url, secs) in visits {
        let now = started + Duration::seconds(secs);
        let outcome = round.observe(&NavigationEvent::new(url.as_str()), now)?;
        println!("{:>6.2}s  {:<12} {}", round.session().elapsed_seconds(now), format!("{:?}", outcome), url);
        if outcome.is_match() {
            break;
        }
    }

    let mut clock = SubmissionClock::new();
    round.submit(&mut store, clock.issue(started + Duration::seconds(20)))?;

    let top = store.query_ordered_limit(Some(10))?;
    let admission = round.rank(&top, 10)?;
    println!("\nqualifies: {}, rank: {:?}", admission.qualifies, admission.rank);

    let board = Leaderboard::from_corpus(store.query_ordered_limit(None)?, 10, Some(round.player()));
    for (i, record) in board.top.iter().enumerate() {
        let marker = if board.is_player_row(i) { '*' } else { ' ' };
        println!(
            "{}{:>3}. {:<8} {:>3} pages {:>7.2}s",
            marker,
            i + 1,
            record.name,
            record.pages_visited,
            record.time_taken_seconds
        );
    }
    round.display()?;

    Ok(())
}
