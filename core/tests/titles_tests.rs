// SPDX-License-Identifier: MIT OR Apache-2.0

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use wikirace_core::titles::{
    filter_popular_titles, load_titles, pick_round, save_titles, DailyArticles, TitlesError,
};

#[test]
fn popular_titles_drop_special_pages_and_duplicates() {
    let raw = vec![
        "Main_Page",
        "Israel",
        "Special:Search",
        "Haifa",
        "Israel",
        "Special:RecentChanges",
        "Tel_Aviv",
    ]
    .into_iter()
    .map(String::from);

    assert_eq!(filter_popular_titles(raw.clone(), 5000), vec!["Israel", "Haifa", "Tel_Aviv"]);
    assert_eq!(filter_popular_titles(raw, 2), vec!["Israel", "Haifa"]);
}

#[test]
fn titles_file_roundtrip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("top_articles.json");
    let titles = vec!["ירושלים".to_string(), "Haifa".to_string()];

    save_titles(&path, &titles)?;
    assert_eq!(load_titles(&path)?, titles);

    std::fs::write(&path, "{\"not\": \"a list\"}")?;
    assert!(matches!(load_titles(&path), Err(TitlesError::Parse(_))));
    Ok(())
}

#[test]
fn picked_round_has_distinct_articles() {
    let titles: Vec<String> = ["Israel", "Haifa", "Tel Aviv", "Eilat"].iter().map(|s| s.to_string()).collect();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let setup = pick_round("he.m.wikipedia.org", &titles, &mut rng).unwrap();
        assert_ne!(setup.start_title, setup.target_title);
        assert!(titles.contains(&setup.start_title));
        assert!(setup.target_url.starts_with("https://he.m.wikipedia.org/wiki/"));
    }
}

#[test]
fn picking_needs_two_distinct_titles() {
    let mut rng = StdRng::seed_from_u64(7);
    let titles = vec!["Israel".to_string(), "Israel".to_string()];

    assert!(matches!(
        pick_round("he.m.wikipedia.org", &titles, &mut rng),
        Err(TitlesError::NotEnoughTitles(1))
    ));

    // Both spellings name the same article
    let titles = vec!["Tel_Aviv".to_string(), "Tel Aviv".to_string()];
    assert!(matches!(
        pick_round("he.m.wikipedia.org", &titles, &mut rng),
        Err(TitlesError::NotEnoughTitles(1))
    ));
}

#[test]
fn daily_articles_document() {
    let json = r#"{"startArticleTitle": "חיפה", "targetArticleTitle": "ישראל"}"#;
    let daily: DailyArticles = serde_json::from_str(json).unwrap();

    let setup = daily.into_setup("he.m.wikipedia.org");
    assert_eq!(setup.start_title, "חיפה");
    assert_eq!(setup.session(chrono::Utc::now()).target().as_str(), "ישראל");
}
