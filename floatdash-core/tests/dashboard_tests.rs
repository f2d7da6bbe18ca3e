use std::fs;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

use floatdash_core::commands::{ContentSource, DailyContent, Dashboard, ensure_initialized};
use floatdash_core::config::CoreConfig;
use floatdash_core::services::catalog::{Catalog, CatalogKind};

fn noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

#[test]
fn init_seeds_layout_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("ws");

    let first = ensure_initialized(&root).unwrap();
    for expected in ["config.toml", "catalogs/quotes.json", "catalogs/words.json", "saved-quotes"] {
        assert!(first.created.iter().any(|c| c == expected), "missing {expected}");
    }
    assert!(root.join("logbook").is_dir());

    // Edits survive a second init.
    fs::write(root.join("catalogs/quotes.json"), r#"[{"text":"mine","author":"me"}]"#).unwrap();
    let second = ensure_initialized(&root).unwrap();
    assert!(second.created.is_empty());
    assert!(second.existed.iter().any(|e| e == "catalogs/quotes.json"));
    let cat = Catalog::load(CatalogKind::Quotes, &root.join("catalogs/quotes.json")).unwrap();
    assert_eq!(cat.items()[0].key, "mine");
}

#[test]
fn config_defaults_resolve_against_root() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CoreConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.catalog_path(CatalogKind::Words), dir.path().join("catalogs/words.json"));
    assert_eq!(
        cfg.ledger_path(CatalogKind::Quotes),
        dir.path().join("saved-quotes/used-quotes.json")
    );
    assert_eq!(cfg.logbook_file(), dir.path().join("logbook/events.jsonl"));
}

#[test]
fn config_file_overrides_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[storage]\nstate_dir = \"state\"\n[logbook]\nenabled = false\n",
    )
    .unwrap();
    let cfg = CoreConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.storage.state_dir, dir.path().join("state"));
    assert!(!cfg.logbook.enabled);
    // Untouched sections keep their defaults.
    assert_eq!(cfg.catalog_path(CatalogKind::Quotes), dir.path().join("catalogs/quotes.json"));
}

#[test]
fn quote_and_word_feeds_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let dash = Dashboard::open(dir.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(9);

    let q1 = dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    let q2 = dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    let w1 = dash.content_at(CatalogKind::Words, noon(), &mut rng);

    let quotes = Catalog::embedded(CatalogKind::Quotes).unwrap();
    let words = Catalog::embedded(CatalogKind::Words).unwrap();
    assert_eq!(q1.primary, quotes.items()[0].key);
    assert_eq!(q2.primary, quotes.items()[1].key);
    assert_eq!(q2.secondary, quotes.items()[1].payload);
    assert_eq!(w1.primary, words.items()[0].key);
    assert!([&q1, &q2, &w1].iter().all(|c| c.source == ContentSource::Picked));

    let quote_ledger = dash.ledger(CatalogKind::Quotes).unwrap().unwrap();
    assert_eq!(quote_ledger.used_keys.len(), 2);
    let word_ledger = dash.ledger(CatalogKind::Words).unwrap().unwrap();
    assert_eq!(word_ledger.used_keys, vec![w1.primary.clone()]);
}

#[test]
fn picks_write_dated_archive_files() {
    let dir = tempfile::tempdir().unwrap();
    let dash = Dashboard::open(dir.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    let last = dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    let word = dash.content_at(CatalogKind::Words, noon(), &mut rng);

    let state = dir.path().join("saved-quotes");
    let quote_file: Value =
        serde_json::from_slice(&fs::read(state.join("quotes_Sun_Oct_18_2026.json")).unwrap())
            .unwrap();
    assert_eq!(quote_file["date"], "Sun Oct 18 2026");
    assert_eq!(quote_file["quote"], last.primary.as_str());
    assert_eq!(quote_file["author"], last.secondary.as_str());
    assert_eq!(quote_file["fetchedAt"], noon().to_rfc3339().as_str());

    let word_file: Value =
        serde_json::from_slice(&fs::read(state.join("words_Sun_Oct_18_2026.json")).unwrap())
            .unwrap();
    assert_eq!(word_file["word"], word.primary.as_str());
    assert_eq!(word_file["meaning"], word.secondary.as_str());
}

#[test]
fn broken_catalog_serves_the_static_fallback() {
    let dir = tempfile::tempdir().unwrap();
    ensure_initialized(dir.path()).unwrap();
    fs::write(dir.path().join("catalogs/words.json"), "{ not json").unwrap();

    let dash = Dashboard::open(dir.path()).unwrap();
    assert!(dash.catalog(CatalogKind::Words).is_err());

    let got = dash.content_at(CatalogKind::Words, noon(), &mut StdRng::seed_from_u64(0));
    assert_eq!(
        got,
        DailyContent {
            primary: "Serendipity".into(),
            secondary: "The occurrence of events by chance in a happy or beneficial way; finding good things by luck.".into(),
            source: ContentSource::Fallback,
        }
    );
    // Quotes are unaffected.
    let quote = dash.content_at(CatalogKind::Quotes, noon(), &mut StdRng::seed_from_u64(0));
    assert_eq!(quote.source, ContentSource::Picked);
}

#[test]
fn empty_catalog_serves_the_static_fallback() {
    let dir = tempfile::tempdir().unwrap();
    ensure_initialized(dir.path()).unwrap();
    fs::write(dir.path().join("catalogs/quotes.json"), "[]").unwrap();

    let dash = Dashboard::open(dir.path()).unwrap();
    let got = dash.content_at(CatalogKind::Quotes, noon(), &mut StdRng::seed_from_u64(0));
    assert_eq!(got.source, ContentSource::Fallback);
    assert_eq!(got.secondary, "Steve Jobs");
    assert!(dash.ledger(CatalogKind::Quotes).unwrap().is_none());
}

#[test]
fn unwritable_state_dir_serves_the_static_fallback() {
    let dir = tempfile::tempdir().unwrap();
    ensure_initialized(dir.path()).unwrap();
    // A plain file where the state directory should be.
    fs::write(dir.path().join("blocker"), b"").unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[storage]\nstate_dir = \"blocker\"\n",
    )
    .unwrap();

    let dash = Dashboard::open(dir.path()).unwrap();
    let got = dash.content_at(CatalogKind::Quotes, noon(), &mut StdRng::seed_from_u64(0));
    assert_eq!(got.source, ContentSource::Fallback);
    assert!(dash.ledger(CatalogKind::Quotes).is_err());
}

#[test]
fn logbook_records_picks_and_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    ensure_initialized(dir.path()).unwrap();
    fs::write(dir.path().join("catalogs/words.json"), "[]").unwrap();

    let dash = Dashboard::open(dir.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    dash.content_at(CatalogKind::Words, noon(), &mut rng);

    let text = fs::read_to_string(dir.path().join("logbook/events.jsonl")).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "picked");
    assert_eq!(lines[0]["data"]["kind"], "quotes");
    assert_eq!(lines[1]["event"], "fallback");
    assert_eq!(lines[1]["data"]["kind"], "words");
    assert!(lines[1]["data"]["reason"].as_str().unwrap().contains("empty"));
}

#[test]
fn content_serializes_with_lowercase_source() {
    let c = DailyContent {
        primary: "Sonder".into(),
        secondary: "m".into(),
        source: ContentSource::Picked,
    };
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v, serde_json::json!({"primary": "Sonder", "secondary": "m", "source": "picked"}));
}

#[test]
fn open_existing_refuses_a_missing_root_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let typo = dir.path().join("flaotdash");

    let err = Dashboard::open_existing(&typo).err().expect("missing root must fail");
    assert!(err.to_string().contains("does not exist"), "{err}");
    assert!(!typo.exists());
}

#[test]
fn open_existing_reads_without_bootstrapping() {
    let dir = tempfile::tempdir().unwrap();
    ensure_initialized(dir.path()).unwrap();
    fs::remove_dir_all(dir.path().join("saved-quotes")).unwrap();

    let dash = Dashboard::open_existing(dir.path()).unwrap();
    let quotes = dash.catalog(CatalogKind::Quotes).unwrap();
    assert_eq!(quotes, &Catalog::embedded(CatalogKind::Quotes).unwrap());
    assert!(dash.ledger(CatalogKind::Quotes).unwrap().is_none());
    assert!(!dir.path().join("saved-quotes").exists());
}

#[test]
fn legacy_system_section_in_config_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[system]\nname = \"floatdash\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();
    let cfg = CoreConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.storage.state_dir, dir.path().join("saved-quotes"));
}

// Collects the level of every event emitted while installed.
#[derive(Clone, Default)]
struct LevelLog(std::sync::Arc<std::sync::Mutex<Vec<tracing::Level>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LevelLog {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

#[test]
fn routine_picks_log_below_info() {
    use tracing_subscriber::layer::SubscriberExt;

    let dir = tempfile::tempdir().unwrap();
    let dash = Dashboard::open(dir.path()).unwrap();
    let log = LevelLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut rng = StdRng::seed_from_u64(4);
        dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
        dash.content_at(CatalogKind::Quotes, noon(), &mut rng);
    });

    let levels = log.0.lock().unwrap().clone();
    assert_eq!(levels, vec![tracing::Level::DEBUG, tracing::Level::DEBUG]);
}
