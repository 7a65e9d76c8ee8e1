//! Loader behaviour through the public catalog API: fetch counts, cache
//! identity, failure retry and coalescing of concurrent first calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use cinedive::source::{Fetched, ResourceSource};
use cinedive::{Config, DatasetCatalog, DatasetId, LoadError};

const TITLE_OSCAR: &str = "tconst\tprimaryTitle\tstartYear\truntimeMinutes\tgenres\taverageRating\tnumVotes\toscarNominations\toscarWins\n\
tt0068646\tThe Godfather\t1972\t175\tCrime,Drama\t9.2\t2100000\t11\t3\n\
tt0056172\tLawrence of Arabia\t1962\t218\tAdventure,Biography,Drama\t8.3\t\t10\t7\n";

const PROJECT_GRAPH: &str = r#"{
  "nodes": [
    {"id": "tt0068646", "type": "movie", "title": "The Godfather"},
    {"id": "nm0000008", "type": "person", "name": "Marlon Brando"}
  ],
  "links": [
    {"source": "nm0000008", "target": "tt0068646", "role": "actor", "year": 1972}
  ]
}"#;

/// In-memory source that counts fetches per locator and can be told to
/// answer with a given status.
#[derive(Default)]
struct CountingSource {
    bodies: Mutex<HashMap<String, Fetched>>,
    fetches: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingSource {
    fn with(entries: &[(&str, Fetched)]) -> Self {
        let source = Self::default();
        for (locator, fetched) in entries {
            source.set(locator, fetched.clone());
        }
        source
    }

    fn set(&self, locator: &str, fetched: Fetched) {
        self.bodies.lock().unwrap().insert(locator.to_string(), fetched);
    }

    fn fetches(&self, locator: &str) -> usize {
        self.fetches.lock().unwrap().get(locator).copied().unwrap_or(0)
    }
}

impl ResourceSource for CountingSource {
    fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, cinedive::Result<Fetched>> {
        async move {
            *self.fetches.lock().unwrap().entry(locator.to_string()).or_default() += 1;
            self.total.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let fetched = self.bodies.lock().unwrap().get(locator).cloned();
            Ok(fetched.unwrap_or_else(Fetched::not_found))
        }
        .boxed()
    }
}

fn catalog(source: &Arc<CountingSource>) -> DatasetCatalog {
    let source: Arc<dyn ResourceSource> = Arc::clone(source) as Arc<dyn ResourceSource>;
    DatasetCatalog::new(&Config::default(), source)
}

#[tokio::test]
async fn first_call_fetches_once_then_serves_cache() {
    let source = Arc::new(CountingSource::with(&[(
        "data/title_oscar.tsv",
        Fetched::ok(TITLE_OSCAR),
    )]));
    let catalog = catalog(&source);

    let first = catalog.movies_full_data().await.unwrap();
    assert_eq!(source.fetches("data/title_oscar.tsv"), 1);

    for _ in 0..5 {
        let again = catalog.movies_full_data().await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(*again, *first);
    }
    assert_eq!(source.fetches("data/title_oscar.tsv"), 1);
    assert!(catalog.is_cached(DatasetId::MoviesFullData));
}

#[tokio::test]
async fn empty_vote_count_stays_absent() {
    let source = Arc::new(CountingSource::with(&[(
        "data/title_oscar.tsv",
        Fetched::ok(TITLE_OSCAR),
    )]));
    let movies = catalog(&source).movies_full_data().await.unwrap();

    let lawrence = &movies.records[1];
    assert_eq!(lawrence.text("primaryTitle"), Some("Lawrence of Arabia"));
    assert_eq!(lawrence.number("numVotes"), None);
    assert!(lawrence.get("numVotes").unwrap().is_absent());
    assert_eq!(lawrence.list("genres"), ["Adventure", "Biography", "Drama"]);
    assert_eq!(lawrence.number("oscarWins"), Some(7.0));
}

#[tokio::test]
async fn variants_of_one_file_are_cached_independently() {
    let source = Arc::new(CountingSource::with(&[(
        "data/title_oscar.tsv",
        Fetched::ok(TITLE_OSCAR),
    )]));
    let catalog = catalog(&source);

    let summary = catalog.movies_last_movies().await.unwrap();
    let full = catalog.movies_full_data().await.unwrap();

    assert_eq!(summary.records[0].text("genres"), Some("Crime,Drama"));
    assert_eq!(full.records[0].list("genres"), ["Crime", "Drama"]);
    assert_eq!(source.fetches("data/title_oscar.tsv"), 2);
}

#[tokio::test]
async fn missing_graph_fails_and_is_retried() {
    let source = Arc::new(CountingSource::default());
    let catalog = catalog(&source);
    let locator = "data/graph_for_project_sin_country.json";

    let err = catalog.project_graph().await.unwrap_err();
    assert_eq!(err.to_string(), "Graph JSON not found");
    assert!(matches!(
        err,
        LoadError::ResourceUnavailable { status: 404, .. }
    ));
    assert!(!catalog.is_cached(DatasetId::ProjectGraph));

    // failures are not cached: the next call fetches again
    let err = catalog.project_graph().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(source.fetches(locator), 2);

    source.set(locator, Fetched::ok(PROJECT_GRAPH));
    let graph = catalog.project_graph().await.unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.link_count(), 1);
    assert_eq!(source.fetches(locator), 3);

    catalog.project_graph().await.unwrap();
    assert_eq!(source.fetches(locator), 3);
}

#[tokio::test]
async fn server_error_on_table_is_reported_with_status() {
    let source = Arc::new(CountingSource::with(&[(
        "data/world_imdb_movies_top_movies_per_year.csv",
        Fetched {
            status: 503,
            body: "unavailable".into(),
        },
    )]));
    let err = catalog(&source).top_movies_per_year().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Table not found");
}

#[tokio::test]
async fn malformed_graph_propagates_parse_error() {
    let source = Arc::new(CountingSource::with(&[(
        "data/graph_full_cleaned.json",
        Fetched::ok("{\"nodes\": ["),
    )]));
    let catalog = catalog(&source);
    let err = catalog.full_graph().await.unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
    assert!(!catalog.is_cached(DatasetId::FullGraph));
}

#[tokio::test]
async fn concurrent_first_calls_share_one_fetch() {
    let source = Arc::new(CountingSource {
        delay: Some(Duration::from_millis(50)),
        ..CountingSource::with(&[("data/graphic_person.json", Fetched::ok(PROJECT_GRAPH))])
    });
    let catalog = Arc::new(catalog(&source));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.person_graph().await })
        })
        .collect();

    let mut graphs = Vec::new();
    for handle in handles {
        graphs.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(source.fetches("data/graphic_person.json"), 1);
    assert!(graphs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn concurrent_missing_graph_shares_one_failed_fetch() {
    let source = Arc::new(CountingSource {
        delay: Some(Duration::from_millis(50)),
        ..CountingSource::default()
    });
    let catalog = Arc::new(catalog(&source));
    let locator = "data/graph_for_project_sin_country.json";

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.project_graph().await })
        })
        .collect();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Graph JSON not found");
        assert_eq!(err.status(), Some(404));
    }
    assert_eq!(source.fetches(locator), 1);
    assert!(!catalog.is_cached(DatasetId::ProjectGraph));

    // the shared failure is not kept: a later call starts a new fetch
    catalog.project_graph().await.unwrap_err();
    assert_eq!(source.fetches(locator), 2);
}

#[tokio::test]
async fn invalidate_forces_a_refetch() {
    let source = Arc::new(CountingSource::with(&[(
        "data/graph_for_project.json",
        Fetched::ok(PROJECT_GRAPH),
    )]));
    let catalog = catalog(&source);

    let before = catalog.project_graph_with_country().await.unwrap();
    catalog.invalidate_all();
    assert!(!catalog.is_cached(DatasetId::ProjectGraphWithCountry));

    let after = catalog.project_graph_with_country().await.unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(*before, *after);
    assert_eq!(source.fetches("data/graph_for_project.json"), 2);
    assert_eq!(source.total.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn summary_reports_table_and_graph_sizes() {
    let source = Arc::new(CountingSource::with(&[
        ("data/title_oscar.tsv", Fetched::ok(TITLE_OSCAR)),
        ("data/graph_full_cleaned.json", Fetched::ok(PROJECT_GRAPH)),
    ]));
    let catalog = catalog(&source);

    assert_eq!(
        catalog.summary(DatasetId::MoviesLastMovies).await.unwrap().to_string(),
        "2 rows x 9 columns"
    );
    assert_eq!(
        catalog.summary(DatasetId::FullGraph).await.unwrap().to_string(),
        "2 nodes, 1 links"
    );
    // summary goes through the same cache
    catalog.movies_last_movies().await.unwrap();
    assert_eq!(source.fetches("data/title_oscar.tsv"), 1);
}
